//! Rust routing code for the matched bindings of one file.
//!
//! For every service that participates in a binding the output contains a
//! resolver trait with one async method per bound RPC method, and a
//! `resolve_<service>` function that maps `(parentTypeName, fieldName)` onto
//! that trait. The selectors are matched textually; anything else is rejected
//! as an unsupported selector.

use anyhow::Context;
use itertools::Itertools;
use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};

use crate::{
  descriptor::FileDescriptor,
  generator::{
    bindings::{Binding, MethodRef, ResolverIndex},
    naming::{resolve_fn_name, resolver_trait_name, to_rust_method_name, to_rust_type_path},
  },
};

const SUPPORT_CRATE: &str = "appsync_resolve_support";

/// Where generated code finds the prost types of a file.
#[derive(Clone, Copy)]
struct TypeContext<'a> {
  file: &'a FileDescriptor,
  types_path: &'a str,
}

pub(crate) struct DispatchGenerator {
  selectors: SelectorsFragment,
  services: Vec<ServiceFragment>,
}

impl DispatchGenerator {
  /// Resolves every Rust path and identifier up front, so rendering cannot fail halfway.
  pub(crate) fn new(file: &FileDescriptor, resolvers: &ResolverIndex, types_path: &str) -> anyhow::Result<Self> {
    let ctx = TypeContext { file, types_path };
    let mut services = vec![];
    for service in resolvers.services.values() {
      let methods = resolvers
        .service_methods(service)
        .map(|method| ResolverMethodFragment::new(method, resolvers, ctx))
        .collect::<anyhow::Result<Vec<_>>>()?;
      let arms = resolvers
        .service_bindings(service)
        .map(|binding| DispatchArmFragment::new(binding, ctx))
        .collect::<anyhow::Result<Vec<_>>>()?;

      services.push(ServiceFragment {
        name: service.full_name.clone(),
        trait_name: format_ident!("{}", resolver_trait_name(&service.name)),
        fn_name: format_ident!("{}", resolve_fn_name(&service.name)),
        methods,
        arms,
      });
    }

    Ok(Self {
      selectors: SelectorsFragment(resolvers.selectors()),
      services,
    })
  }

  /// Formatted source of the dispatch module.
  pub(crate) fn generate(&self) -> anyhow::Result<String> {
    let syntax_tree =
      syn::parse2::<syn::File>(self.to_token_stream()).context("generated dispatch code is not valid Rust")?;
    Ok(prettyplease::unparse(&syntax_tree))
  }
}

impl ToTokens for DispatchGenerator {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let support = format_ident!("{}", SUPPORT_CRATE);
    let imports = (!self.services.is_empty()).then(|| {
      quote! {
        use #support::{ResolveError, anyhow, decode_arguments, encode_output};
      }
    });
    let selectors = &self.selectors;
    let services = &self.services;

    tokens.extend(quote! {
      #imports

      #selectors

      #(#services)*
    });
  }
}

struct SelectorsFragment(Vec<String>);

impl ToTokens for SelectorsFragment {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let selectors = &self.0;
    tokens.extend(quote! {
      /// Every `Type.field` selector routed by this module, sorted.
      pub const RESOLVE_SELECTORS: &[&str] = &[#(#selectors),*];
    });
  }
}

struct ServiceFragment {
  name: String,
  trait_name: syn::Ident,
  fn_name: syn::Ident,
  methods: Vec<ResolverMethodFragment>,
  arms: Vec<DispatchArmFragment>,
}

impl ToTokens for ServiceFragment {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let trait_name = &self.trait_name;
    let fn_name = &self.fn_name;
    let methods = &self.methods;
    let arms = &self.arms;
    let trait_doc = format!(" Methods of `{}` that resolve GraphQL fields.", self.name);
    let fn_doc = format!(" Routes a `(parent_type, field_name)` selector to the matching `{trait_name}` method.");

    tokens.extend(quote! {
      #[doc = #trait_doc]
      pub trait #trait_name: Send + Sync {
        #(#methods)*
      }

      #[doc = #fn_doc]
      pub async fn #fn_name<R: #trait_name>(
        resolver: &R,
        parent_type: &str,
        field_name: &str,
        arguments: &[u8],
      ) -> Result<Vec<u8>, ResolveError> {
        match (parent_type, field_name) {
          #(#arms)*
          _ => Err(ResolveError::unsupported_selector(parent_type, field_name)),
        }
      }
    });
  }
}

struct ResolverMethodFragment {
  name: syn::Ident,
  input: syn::Type,
  output: syn::Type,
  doc: String,
}

impl ResolverMethodFragment {
  fn new(method: &MethodRef, resolvers: &ResolverIndex, ctx: TypeContext<'_>) -> anyhow::Result<Self> {
    let qualifiers = resolvers
      .bindings
      .values()
      .filter(|binding| binding.method.full_name == method.full_name)
      .map(|binding| format!("`{}`", binding.qualifier()))
      .join(", ");

    Ok(Self {
      name: format_ident!("{}", to_rust_method_name(&method.name)),
      input: message_type(&ctx, &method.input)?,
      output: message_type(&ctx, &method.output)?,
      doc: format!(" `{}`, resolves {qualifiers}.", method.display_name()),
    })
  }
}

impl ToTokens for ResolverMethodFragment {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let Self {
      name,
      input,
      output,
      doc,
    } = self;

    tokens.extend(quote! {
      #[doc = #doc]
      fn #name(&self, request: #input) -> impl std::future::Future<Output = anyhow::Result<#output>> + Send;
    });
  }
}

struct DispatchArmFragment {
  parent_type: String,
  field_name: String,
  qualifier: String,
  method: syn::Ident,
  input: syn::Type,
}

impl DispatchArmFragment {
  fn new(binding: &Binding, ctx: TypeContext<'_>) -> anyhow::Result<Self> {
    Ok(Self {
      parent_type: binding.parent_type.clone(),
      field_name: binding.field_name.clone(),
      qualifier: binding.qualifier(),
      method: format_ident!("{}", to_rust_method_name(&binding.method.name)),
      input: message_type(&ctx, &binding.method.input)?,
    })
  }
}

impl ToTokens for DispatchArmFragment {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let Self {
      parent_type,
      field_name,
      qualifier,
      method,
      input,
    } = self;

    tokens.extend(quote! {
      (#parent_type, #field_name) => {
        let request: #input = decode_arguments(#qualifier, arguments)?;
        let response = resolver
          .#method(request)
          .await
          .map_err(|err| ResolveError::handler(#qualifier, err))?;
        encode_output(#qualifier, &response)
      }
    });
  }
}

/// Rust type of a message given by its fully qualified protobuf name.
fn message_type(ctx: &TypeContext<'_>, full_name: &str) -> anyhow::Result<syn::Type> {
  let message = ctx
    .file
    .message(full_name)
    .with_context(|| format!("message '{full_name}' is not part of '{}'", ctx.file.name))?;
  let path = to_rust_type_path(ctx.types_path, message.relative_name());
  syn::parse_str::<syn::Type>(&path)
    .with_context(|| format!("'{path}' is not a valid Rust path for message '{full_name}'"))
}
