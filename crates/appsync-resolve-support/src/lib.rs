//! Runtime support for the resolver dispatch code emitted by `protoc-gen-appsync`.
//!
//! Generated `*.res.rs` files route a `(parentTypeName, fieldName)` pair to one
//! RPC method of a resolver trait. They lean on this crate for payload decoding,
//! result encoding and the error type that names the failing selector.
//!
//! Arguments arrive keyed by GraphQL field names, which are the proto3 JSON names
//! (`post_id` becomes `postId`), and results are read back the same way. The
//! prost message types therefore need serde impls that follow the proto3 JSON
//! mapping, as generated by `pbjson-build`: lowerCamelCase field names, absent
//! fields decoding to their defaults, and enums as their proto value names
//! (`STATUS_PUBLISHED`), which are also the GraphQL enum values. Plain
//! `#[derive(Deserialize)]` on prost types keeps snake_case names and silently
//! drops camelCase arguments.

pub use anyhow;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
  #[error("unsupported selector: {0}")]
  UnsupportedSelector(String),

  #[error("failed to decode arguments of '{qualifier}': {source}")]
  Decode {
    qualifier: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("resolver of '{qualifier}' failed: {source}")]
  Handler {
    qualifier: String,
    #[source]
    source: BoxError,
  },

  #[error("failed to encode result of '{qualifier}': {source}")]
  Encode {
    qualifier: String,
    #[source]
    source: serde_json::Error,
  },
}

impl ResolveError {
  #[must_use]
  pub fn unsupported_selector(parent_type: &str, field_name: &str) -> Self {
    Self::UnsupportedSelector(selector(parent_type, field_name))
  }

  pub fn handler(qualifier: &str, source: impl Into<BoxError>) -> Self {
    Self::Handler {
      qualifier: qualifier.to_string(),
      source: source.into(),
    }
  }

  /// The `Type.field` selector the error was raised for.
  #[must_use]
  pub fn qualifier(&self) -> &str {
    match self {
      Self::UnsupportedSelector(qualifier)
      | Self::Decode { qualifier, .. }
      | Self::Handler { qualifier, .. }
      | Self::Encode { qualifier, .. } => qualifier,
    }
  }
}

#[must_use]
pub fn selector(parent_type: &str, field_name: &str) -> String {
  format!("{parent_type}.{field_name}")
}

/// Decodes the JSON argument payload of `qualifier` into the bound method's input message.
///
/// An empty payload decodes as an empty JSON object, which is what the request
/// handler receives for fields that were selected without arguments.
pub fn decode_arguments<T: DeserializeOwned>(qualifier: &str, payload: &[u8]) -> Result<T, ResolveError> {
  let payload = if payload.iter().all(u8::is_ascii_whitespace) {
    b"{}".as_slice()
  } else {
    payload
  };

  serde_json::from_slice(payload).map_err(|source| ResolveError::Decode {
    qualifier: qualifier.to_string(),
    source,
  })
}

pub fn encode_output<T: Serialize>(qualifier: &str, output: &T) -> Result<Vec<u8>, ResolveError> {
  serde_json::to_vec(output).map_err(|source| ResolveError::Encode {
    qualifier: qualifier.to_string(),
    source,
  })
}

/// Field information of one batched resolve call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveInfo {
  pub field_name: String,
  pub parent_type_name: String,
  #[serde(default, rename = "selectionSetGraphQL")]
  pub selection_set_graphql: String,
}

/// One item of a batched resolve request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
  #[serde(default)]
  pub arguments: Value,
  #[serde(default)]
  pub source: Value,
  pub info: ResolveInfo,
}

impl BatchItem {
  #[must_use]
  pub fn selector(&self) -> String {
    selector(&self.info.parent_type_name, &self.info.field_name)
  }

  /// Encodes the arguments back into the opaque payload the dispatch functions accept.
  pub fn arguments_payload(&self) -> Result<Vec<u8>, ResolveError> {
    if self.arguments.is_null() {
      return Ok(Vec::new());
    }
    encode_output(&self.selector(), &self.arguments)
  }
}

/// One item of a batched resolve response, positioned like its request item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
  pub data: Value,
}

impl BatchResult {
  /// Wraps the encoded result of a dispatch call.
  pub fn from_payload(qualifier: &str, payload: &[u8]) -> Result<Self, ResolveError> {
    let data = serde_json::from_slice(payload).map_err(|source| ResolveError::Encode {
      qualifier: qualifier.to_string(),
      source,
    })?;
    Ok(Self { data })
  }
}
