//! Runs the checked-in output of the dispatch emitter against prost-shaped message types.
//!
//! The message structs mirror what `prost-build` emits for `test/v1/echo.proto` (type names
//! through heck, nested messages in a snake_case module) with the proto3 JSON mapping that
//! `pbjson` derives: lowerCamelCase field names and defaults for absent fields.

use appsync_resolve_support::{BatchItem, BatchResult, ResolveError, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EchoV2Request {
  pub message: String,
  pub reply_to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EchoV2Response {
  pub message: String,
  pub reply_to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetUrlResponse {
  pub url: String,
}

pub mod outer {
  use serde::{Deserialize, Serialize};

  #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
  #[serde(rename_all = "camelCase", default)]
  pub struct HttpInner {
    pub request_path: String,
  }
}

mod dispatch {
  include!("fixtures/echo.res.rs");
}

use dispatch::{EchoServiceResolver, RESOLVE_SELECTORS, resolve_echo_service};

struct Echo;

impl EchoServiceResolver for Echo {
  async fn echo_v2(&self, request: EchoV2Request) -> anyhow::Result<EchoV2Response> {
    if request.message == "fail" {
      anyhow::bail!("refusing to echo");
    }
    Ok(EchoV2Response {
      message: request.message,
      reply_to: request.reply_to,
    })
  }

  async fn get_url(&self, request: outer::HttpInner) -> anyhow::Result<GetUrlResponse> {
    Ok(GetUrlResponse {
      url: format!("https://example.test{}", request.request_path),
    })
  }
}

async fn dispatch_item(item: &BatchItem) -> Result<BatchResult, ResolveError> {
  let payload = item.arguments_payload()?;
  let output = resolve_echo_service(&Echo, &item.info.parent_type_name, &item.info.field_name, &payload).await?;
  BatchResult::from_payload(&item.selector(), &output)
}

fn item(parent_type: &str, field_name: &str, arguments: serde_json::Value) -> BatchItem {
  serde_json::from_value(json!({
    "arguments": arguments,
    "info": {"fieldName": field_name, "parentTypeName": parent_type},
  }))
  .unwrap()
}

#[test]
fn test_generated_selectors() {
  assert_eq!(RESOLVE_SELECTORS, &["Query.echoV2", "Query.inspect"]);
}

#[tokio::test]
async fn test_generated_dispatch_uses_json_names() {
  let result = dispatch_item(&item("Query", "echoV2", json!({"message": "hi", "replyTo": "ops"})))
    .await
    .expect("echoV2 should resolve");
  assert_eq!(result.data, json!({"message": "hi", "replyTo": "ops"}));
}

#[tokio::test]
async fn test_generated_dispatch_defaults_absent_arguments() {
  let result = dispatch_item(&item("Query", "echoV2", serde_json::Value::Null))
    .await
    .expect("echoV2 without arguments should resolve");
  assert_eq!(result.data, json!({"message": "", "replyTo": ""}));
}

#[tokio::test]
async fn test_generated_dispatch_nested_input_type() {
  let result = dispatch_item(&item("Query", "inspect", json!({"requestPath": "/posts"})))
    .await
    .expect("inspect should resolve");
  assert_eq!(result.data, json!({"url": "https://example.test/posts"}));
}

#[tokio::test]
async fn test_generated_dispatch_wraps_handler_error() {
  let err = resolve_echo_service(&Echo, "Query", "echoV2", br#"{"message":"fail"}"#)
    .await
    .unwrap_err();
  assert!(matches!(err, ResolveError::Handler { .. }), "expected handler error, got {err:?}");
  assert_eq!(err.qualifier(), "Query.echoV2");
  assert!(err.to_string().contains("refusing to echo"), "source should be kept: {err}");
}

#[tokio::test]
async fn test_generated_dispatch_rejects_malformed_arguments() {
  let err = resolve_echo_service(&Echo, "Query", "inspect", br#"{"requestPath": 7}"#)
    .await
    .unwrap_err();
  assert!(matches!(err, ResolveError::Decode { .. }), "expected decode error, got {err:?}");
  assert_eq!(err.qualifier(), "Query.inspect");
}

#[tokio::test]
async fn test_generated_dispatch_miss_is_unsupported() {
  let err = resolve_echo_service(&Echo, "Mutation", "echoV2", b"").await.unwrap_err();
  assert!(matches!(err, ResolveError::UnsupportedSelector(ref q) if q == "Mutation.echoV2"));
}
