//! Plugin annotations, normalised.
//!
//! A descriptor without the annotation and a descriptor whose annotation sets
//! nothing are treated the same: both yield `None`.

use super::naming::to_lower_camel;
use crate::descriptor::{FieldDescriptor, MethodDescriptor};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FieldOptions {
  pub(crate) ignore: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MethodOptions {
  /// `Message.field` qualifiers this method resolves.
  pub(crate) resolves: Vec<String>,
  /// Field name the method resolves, lowerCamelCase of the method name unless declared.
  pub(crate) resolve_field: String,
}

pub(crate) fn field_options(field: &FieldDescriptor) -> Option<FieldOptions> {
  let ignore = field.annotation.as_ref()?.ignore?;
  Some(FieldOptions { ignore })
}

pub(crate) fn is_ignored(field: &FieldDescriptor) -> bool {
  field_options(field).is_some_and(|options| options.ignore)
}

pub(crate) fn method_options(method: &MethodDescriptor) -> Option<MethodOptions> {
  let annotation = method.annotation.as_ref()?;
  if annotation.resolves.is_empty() && annotation.resolve_field.is_none() {
    return None;
  }

  let resolve_field = annotation
    .resolve_field
    .clone()
    .filter(|name| !name.is_empty())
    .unwrap_or_else(|| to_lower_camel(&method.name));

  Some(MethodOptions {
    resolves: annotation.resolves.clone(),
    resolve_field,
  })
}
