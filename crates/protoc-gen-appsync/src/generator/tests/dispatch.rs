use quote::{ToTokens, quote};

use super::support::*;
use crate::{descriptor::FileDescriptor, generator::emit::DispatchGenerator};

/// Checked-in output that the support crate compiles and runs against prost-shaped types.
const ECHO_DISPATCH: &str = include_str!("../../../../appsync-resolve-support/tests/fixtures/echo.res.rs");

fn dispatch_code(file: &FileDescriptor, types_path: &str) -> String {
  let generated = generate(file).unwrap();
  DispatchGenerator::new(file, &generated.resolvers, types_path)
    .and_then(|generator| generator.generate())
    .unwrap()
}

#[test]
fn test_dispatch_declares_resolver_trait() {
  let code = dispatch_code(&posts_file(), "super");

  assert!(code.contains("use appsync_resolve_support::{ResolveError, anyhow, decode_arguments, encode_output};"));
  assert!(code.contains("/// Methods of `test.v1.PostService` that resolve GraphQL fields."));
  assert!(code.contains("pub trait PostServiceResolver: Send + Sync {"));
  assert!(code.contains("fn related_posts("));
  assert!(code.contains("request: super::RelatedPostsRequest"));
  assert!(code.contains("anyhow::Result<super::RelatedPostsResponse>"));
  assert!(code.contains("/// `PostService.RelatedPosts`, resolves `Post.related`."));
}

#[test]
fn test_dispatch_routes_selectors() {
  let code = dispatch_code(&posts_file(), "super");

  assert!(code.contains("pub const RESOLVE_SELECTORS: &[&str] = &[\"Post.related\"];"));
  assert!(code.contains("pub async fn resolve_post_service<R: PostServiceResolver>("));
  assert!(code.contains("(\"Post\", \"related\") => {"));
  assert!(code.contains("decode_arguments("));
  assert!(code.contains("ResolveError::handler("));
  assert!(code.contains("encode_output("));
  // selector list, decode, handler error and encode
  assert_eq!(code.matches("\"Post.related\"").count(), 4);
  assert!(code.contains("ResolveError::unsupported_selector(parent_type, field_name)"));
}

#[test]
fn test_dispatch_selectors_are_sorted() {
  let file = posts_file().with_service(service(
    "FeedService",
    vec![method("Feed", "RelatedPostsRequest", "RelatedPostsResponse", &["Query.posts"])],
  ));
  let code = dispatch_code(&file, "super");

  assert!(code.contains("&[\"Post.related\", \"Query.posts\"]"));
  assert!(code.contains("pub trait FeedServiceResolver"));
  assert!(code.contains("pub async fn resolve_feed_service<R: FeedServiceResolver>("));
}

#[test]
fn test_dispatch_uses_types_path() {
  let file = file(vec![message("Query", vec![string("inner")])])
    .with_dependency(message("Outer.Inner", vec![string("value")]))
    .with_service(service(
      "InnerService",
      vec![method("Type", "Outer.Inner", "Outer.Inner", &["Query.inner"])],
    ));
  let code = dispatch_code(&file, "crate::pb");

  assert!(code.contains("fn r#type("));
  assert!(code.contains("request: crate::pb::outer::Inner"));
  assert!(code.contains(".r#type(request)"));
}

#[test]
fn test_dispatch_without_bindings() {
  let file = file(vec![message("Query", vec![string("ping")])]);
  let code = dispatch_code(&file, "super");

  assert!(!code.contains("use appsync_resolve_support"));
  assert!(code.contains("pub const RESOLVE_SELECTORS: &[&str] = &[];"));
  assert!(!code.contains("pub trait"));
}

#[test]
fn test_dispatch_rejects_unknown_messages() {
  let generated = generate(&posts_file()).unwrap();
  let other = file(vec![message("Query", vec![])]);

  let err = DispatchGenerator::new(&other, &generated.resolvers, "super").err().unwrap();
  assert!(
    err.to_string().contains("is not part of 'test/v1/test.proto'"),
    "unexpected error: {err}"
  );
}

/// `EchoService` with names whose prost spelling differs from the proto spelling.
fn echo_file() -> FileDescriptor {
  [
    message(
      "Query",
      vec![message_ref("echo_v2", "EchoV2Response"), message_ref("inspect", "GetURLResponse")],
    ),
    message("EchoV2Request", vec![string("message"), string("reply_to")]),
    message("EchoV2Response", vec![string("message"), string("reply_to")]),
    message("GetURLResponse", vec![string("url")]),
  ]
  .into_iter()
  .fold(FileDescriptor::new("test/v1/echo.proto", PACKAGE), FileDescriptor::with_message)
  .with_dependency(message("Outer.HTTPInner", vec![string("request_path")]))
  .with_service(service(
    "EchoService",
    vec![
      method("EchoV2", "EchoV2Request", "EchoV2Response", &["Query.echo_v2"]),
      method("GetURL", "Outer.HTTPInner", "GetURLResponse", &["Query.inspect"]),
    ],
  ))
}

fn tokens(source: &str) -> String {
  let file = syn::parse_file(source).unwrap();
  quote!(#file).to_string()
}

#[test]
fn test_dispatch_matches_checked_in_output() {
  let code = dispatch_code(&echo_file(), "super");
  assert_eq!(tokens(&code), tokens(ECHO_DISPATCH), "generated:\n{code}");
}

#[test]
fn test_dispatch_uses_prost_type_names() {
  let code = dispatch_code(&echo_file(), "super");
  let file = syn::parse_file(&code).unwrap();

  let mut signatures = vec![];
  let mut arms = vec![];
  for item in &file.items {
    match item {
      syn::Item::Trait(item) => {
        for trait_item in &item.items {
          let syn::TraitItem::Fn(method) = trait_item else {
            continue;
          };
          let Some(syn::FnArg::Typed(request)) = method.sig.inputs.iter().nth(1) else {
            panic!("{} should take a request", method.sig.ident);
          };
          signatures.push((method.sig.ident.to_string(), request.ty.to_token_stream().to_string()));
        }
      }
      syn::Item::Fn(item) => {
        let Some(syn::Stmt::Expr(syn::Expr::Match(matched), _)) = item.block.stmts.last() else {
          panic!("{} should end in a match", item.sig.ident);
        };
        for arm in &matched.arms {
          let syn::Expr::Block(block) = arm.body.as_ref() else {
            continue;
          };
          let Some(syn::Stmt::Local(local)) = block.block.stmts.first() else {
            continue;
          };
          let syn::Pat::Type(request) = &local.pat else {
            panic!("request binding should carry its type");
          };
          arms.push(request.ty.to_token_stream().to_string());
        }
      }
      _ => {}
    }
  }

  assert_eq!(
    signatures,
    vec![
      ("echo_v2".to_string(), "super :: EchoV2Request".to_string()),
      ("get_url".to_string(), "super :: outer :: HttpInner".to_string()),
    ]
  );
  assert_eq!(arms, vec!["super :: EchoV2Request", "super :: outer :: HttpInner"]);
  assert!(code.contains("anyhow::Result<super::GetUrlResponse>"));
  assert!(code.contains("(\"Query\", \"echoV2\") => {"));
}
