//! The GraphQL type table built while walking one file.

use std::ops::Index;

use indexmap::IndexMap;
use strum::Display;

pub(crate) const STRING_SCALAR: &str = "String";

/// Which side of an operation a message is mapped for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Direction {
  /// Response shape, emitted as `type`.
  Output,
  /// Argument shape, emitted as `input`.
  Input,
}

#[derive(Debug, Clone, Copy, Display, PartialEq, Eq, Hash)]
pub(crate) enum DefinitionKind {
  #[strum(serialize = "type")]
  Object,
  #[strum(serialize = "input")]
  Input,
  #[strum(serialize = "enum")]
  Enum,
}

impl From<Direction> for DefinitionKind {
  fn from(direction: Direction) -> Self {
    match direction {
      Direction::Output => Self::Object,
      Direction::Input => Self::Input,
    }
  }
}

/// Reference to a named type, optionally wrapped in a list whose elements are never null.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub(crate) struct TypeRef {
  #[builder(into)]
  pub(crate) named: String,
  #[builder(default)]
  pub(crate) list: bool,
  #[builder(default = true)]
  pub(crate) non_null: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ArgumentDefinition {
  pub(crate) name: String,
  pub(crate) ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FieldDefinition {
  pub(crate) name: String,
  pub(crate) ty: TypeRef,
  pub(crate) arguments: Vec<ArgumentDefinition>,
}

impl FieldDefinition {
  pub(crate) fn new(name: impl Into<String>, ty: TypeRef) -> Self {
    Self {
      name: name.into(),
      ty,
      arguments: vec![],
    }
  }

  #[cfg(test)]
  pub(crate) fn argument(&self, name: &str) -> Option<&ArgumentDefinition> {
    self.arguments.iter().find(|argument| argument.name == name)
  }
}

impl From<FieldDefinition> for ArgumentDefinition {
  fn from(field: FieldDefinition) -> Self {
    Self {
      name: field.name,
      ty: field.ty,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TypeDefinition {
  pub(crate) kind: DefinitionKind,
  pub(crate) name: String,
  pub(crate) fields: Vec<FieldDefinition>,
  /// Enum values, already stripped of their prefix.
  pub(crate) values: Vec<String>,
}

impl TypeDefinition {
  pub(crate) fn new(kind: DefinitionKind, name: impl Into<String>) -> Self {
    Self {
      kind,
      name: name.into(),
      fields: vec![],
      values: vec![],
    }
  }

  pub(crate) fn enumeration(name: impl Into<String>, values: Vec<String>) -> Self {
    Self {
      values,
      ..Self::new(DefinitionKind::Enum, name)
    }
  }

  #[cfg(test)]
  pub(crate) fn field(&self, name: &str) -> Option<&FieldDefinition> {
    self.fields.iter().find(|field| field.name == name)
  }
}

/// Insertion-ordered type table. Names are unique and definitions are never replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Schema {
  types: IndexMap<String, TypeDefinition>,
}

impl Schema {
  pub(crate) fn contains(&self, name: &str) -> bool {
    self.types.contains_key(name)
  }

  /// Inserts `definition` unless its name is taken. Returns whether it was inserted.
  pub(crate) fn insert(&mut self, definition: TypeDefinition) -> bool {
    if self.types.contains_key(&definition.name) {
      return false;
    }
    self.types.insert(definition.name.clone(), definition);
    true
  }

  pub(crate) fn push_field(&mut self, type_name: &str, field: FieldDefinition) {
    if let Some(definition) = self.types.get_mut(type_name) {
      definition.fields.push(field);
    }
  }

  #[cfg(test)]
  pub(crate) fn get(&self, name: &str) -> Option<&TypeDefinition> {
    self.types.get(name)
  }

  pub(crate) fn iter(&self) -> impl Iterator<Item = &TypeDefinition> {
    self.types.values()
  }

  #[cfg(test)]
  pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
    self.types.keys().map(String::as_str)
  }

  pub(crate) fn len(&self) -> usize {
    self.types.len()
  }

  pub(crate) fn is_empty(&self) -> bool {
    self.types.is_empty()
  }

  pub(crate) fn count(&self, kind: DefinitionKind) -> usize {
    self.iter().filter(|definition| definition.kind == kind).count()
  }
}

impl Index<&str> for Schema {
  type Output = TypeDefinition;

  fn index(&self, name: &str) -> &Self::Output {
    &self.types[name]
  }
}
