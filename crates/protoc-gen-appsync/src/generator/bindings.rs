//! Resolver bindings between RPC methods and GraphQL fields.
//!
//! Methods declare the fields they resolve as `Message.field` qualifiers. The
//! index pass collects them as unmatched; the type mapper moves each one to the
//! matched table when it reaches that field on the output side. Whatever is left
//! unmatched once every root has been walked is a configuration error.

use indexmap::IndexMap;

use super::{
  GeneratorOptions,
  errors::{GenerateError, GenerateResult},
  options::method_options,
};
use crate::descriptor::{FileDescriptor, MethodDescriptor, ServiceDescriptor};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct ServiceRef {
  pub(crate) name: String,
  pub(crate) full_name: String,
}

impl From<&ServiceDescriptor> for ServiceRef {
  fn from(service: &ServiceDescriptor) -> Self {
    Self {
      name: service.name.clone(),
      full_name: service.full_name.clone(),
    }
  }
}

/// An RPC method that participates in at least one binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct MethodRef {
  pub(crate) service: ServiceRef,
  pub(crate) name: String,
  pub(crate) full_name: String,
  pub(crate) input: String,
  pub(crate) output: String,
  pub(crate) resolve_field: String,
}

impl MethodRef {
  fn new(service: &ServiceDescriptor, method: &MethodDescriptor, resolve_field: String) -> Self {
    Self {
      service: ServiceRef::from(service),
      name: method.name.clone(),
      full_name: method.full_name.clone(),
      input: method.input.clone(),
      output: method.output.clone(),
      resolve_field,
    }
  }

  /// `Service.Method`, as used in error messages.
  pub(crate) fn display_name(&self) -> String {
    format!("{}.{}", self.service.name, self.name)
  }
}

/// A GraphQL field bound to the method that resolves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Binding {
  pub(crate) parent_type: String,
  pub(crate) field_name: String,
  pub(crate) method: MethodRef,
}

impl Binding {
  pub(crate) fn qualifier(&self) -> String {
    format!("{}.{}", self.parent_type, self.field_name)
  }
}

#[derive(Debug, Default)]
pub(crate) struct BindingTable {
  /// Proto qualifier (`Message.field_name`) to the declaring method.
  unmatched: IndexMap<String, MethodRef>,
  /// GraphQL qualifier (`Type.jsonName`) to its binding.
  matched: IndexMap<String, Binding>,
  methods: IndexMap<String, MethodRef>,
  services: IndexMap<String, ServiceRef>,
}

impl BindingTable {
  /// Collects every binding declared by the services of `file`.
  pub(crate) fn index(file: &FileDescriptor) -> GenerateResult<Self> {
    let mut table = Self::default();
    for service in &file.services {
      for method in &service.methods {
        let Some(options) = method_options(method) else {
          continue;
        };
        let method_ref = MethodRef::new(service, method, options.resolve_field);
        for qualifier in &options.resolves {
          table.declare(qualifier, &method_ref)?;
        }
      }
    }
    Ok(table)
  }

  pub(crate) fn declare(&mut self, qualifier: &str, method: &MethodRef) -> GenerateResult<()> {
    if let Some(existing) = self.unmatched.get(qualifier)
      && existing != method
    {
      return Err(GenerateError::DuplicateBinding {
        qualifier: qualifier.to_string(),
        first: existing.display_name(),
        second: method.display_name(),
      });
    }

    self.unmatched.insert(qualifier.to_string(), method.clone());
    self
      .methods
      .entry(method.full_name.clone())
      .or_insert_with(|| method.clone());
    self
      .services
      .entry(method.service.full_name.clone())
      .or_insert_with(|| method.service.clone());
    Ok(())
  }

  /// Removes the binding declared for `qualifier`, if it is still unmatched.
  pub(crate) fn take_unmatched(&mut self, qualifier: &str) -> Option<MethodRef> {
    self.unmatched.shift_remove(qualifier)
  }

  pub(crate) fn mark_matched(&mut self, parent_type: &str, field_name: &str, method: MethodRef) {
    let binding = Binding {
      parent_type: parent_type.to_string(),
      field_name: field_name.to_string(),
      method,
    };
    self.matched.insert(binding.qualifier(), binding);
  }

  #[cfg(test)]
  pub(crate) fn unmatched(&self) -> impl Iterator<Item = (&str, &MethodRef)> {
    self.unmatched.iter().map(|(qualifier, method)| (qualifier.as_str(), method))
  }

  /// Fails on the first binding, in declaration order, that no traversal reached.
  pub(crate) fn ensure_all_matched(&self, options: &GeneratorOptions) -> GenerateResult<()> {
    match self.unmatched.first() {
      Some((qualifier, method)) => Err(GenerateError::UnmatchedBinding {
        method: method.display_name(),
        qualifier: qualifier.clone(),
        query: options.query_message.clone(),
        mutation: options.mutation_message.clone(),
        subscription: options.subscription_message.clone(),
      }),
      None => Ok(()),
    }
  }

  pub(crate) fn into_resolvers(self) -> ResolverIndex {
    ResolverIndex {
      bindings: self.matched,
      methods: self.methods,
      services: self.services,
    }
  }
}

/// Fully matched bindings of one file, input to the dispatch emitter and the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ResolverIndex {
  pub(crate) bindings: IndexMap<String, Binding>,
  pub(crate) methods: IndexMap<String, MethodRef>,
  pub(crate) services: IndexMap<String, ServiceRef>,
}

impl ResolverIndex {
  /// Every matched GraphQL qualifier, sorted.
  pub(crate) fn selectors(&self) -> Vec<String> {
    let mut selectors: Vec<String> = self.bindings.keys().cloned().collect();
    selectors.sort();
    selectors
  }

  #[cfg(test)]
  pub(crate) fn get(&self, qualifier: &str) -> Option<&Binding> {
    self.bindings.get(qualifier)
  }

  pub(crate) fn service_methods<'a>(&'a self, service: &'a ServiceRef) -> impl Iterator<Item = &'a MethodRef> {
    self
      .methods
      .values()
      .filter(move |method| method.service.full_name == service.full_name)
  }

  pub(crate) fn service_bindings<'a>(&'a self, service: &'a ServiceRef) -> impl Iterator<Item = &'a Binding> {
    self
      .bindings
      .values()
      .filter(move |binding| binding.method.service.full_name == service.full_name)
  }
}
