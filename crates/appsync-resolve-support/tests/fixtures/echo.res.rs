// Code generated by protoc-gen-appsync. DO NOT EDIT.
// source: test/v1/echo.proto

use appsync_resolve_support::{ResolveError, anyhow, decode_arguments, encode_output};
/// Every `Type.field` selector routed by this module, sorted.
pub const RESOLVE_SELECTORS: &[&str] = &["Query.echoV2", "Query.inspect"];
/// Methods of `test.v1.EchoService` that resolve GraphQL fields.
pub trait EchoServiceResolver: Send + Sync {
    /// `EchoService.EchoV2`, resolves `Query.echoV2`.
    fn echo_v2(
        &self,
        request: super::EchoV2Request,
    ) -> impl std::future::Future<Output = anyhow::Result<super::EchoV2Response>> + Send;
    /// `EchoService.GetURL`, resolves `Query.inspect`.
    fn get_url(
        &self,
        request: super::outer::HttpInner,
    ) -> impl std::future::Future<Output = anyhow::Result<super::GetUrlResponse>> + Send;
}
/// Routes a `(parent_type, field_name)` selector to the matching `EchoServiceResolver` method.
pub async fn resolve_echo_service<R: EchoServiceResolver>(
    resolver: &R,
    parent_type: &str,
    field_name: &str,
    arguments: &[u8],
) -> Result<Vec<u8>, ResolveError> {
    match (parent_type, field_name) {
        ("Query", "echoV2") => {
            let request: super::EchoV2Request = decode_arguments("Query.echoV2", arguments)?;
            let response = resolver
                .echo_v2(request)
                .await
                .map_err(|err| ResolveError::handler("Query.echoV2", err))?;
            encode_output("Query.echoV2", &response)
        }
        ("Query", "inspect") => {
            let request: super::outer::HttpInner = decode_arguments("Query.inspect", arguments)?;
            let response = resolver
                .get_url(request)
                .await
                .map_err(|err| ResolveError::handler("Query.inspect", err))?;
            encode_output("Query.inspect", &response)
        }
        _ => Err(ResolveError::unsupported_selector(parent_type, field_name)),
    }
}
