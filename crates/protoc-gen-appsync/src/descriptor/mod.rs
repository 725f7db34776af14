//! Read-only model of one compiled protobuf file.
//!
//! The generator only ever looks at a file through these types. They are built
//! either from a decoded descriptor set (see [`reflect`]) or directly in memory,
//! which keeps the type mapper testable without invoking `protoc`.

pub mod reflect;


use indexmap::IndexMap;
use strum::Display;

/// Protobuf scalar kinds, displayed the way they are spelled in `.proto` files.
#[derive(Debug, Clone, Copy, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum ScalarKind {
  Double,
  Float,
  Int32,
  Int64,
  Uint32,
  Uint64,
  Sint32,
  Sint64,
  Fixed32,
  Fixed64,
  Sfixed32,
  Sfixed64,
  Bool,
  String,
  Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
  Scalar(ScalarKind),
  /// Fully qualified name of the referenced message.
  Message(String),
  /// Fully qualified name of the referenced enum.
  Enum(String),
}

impl std::fmt::Display for FieldKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Scalar(kind) => kind.fmt(f),
      Self::Message(name) => write!(f, "message {name}"),
      Self::Enum(name) => write!(f, "enum {name}"),
    }
  }
}

/// How many values a field holds. Mirrors the protobuf label, with repeated
/// fields split into plain lists and `map<K, V>` fields.
#[derive(Debug, Clone, Copy, Display, Default, PartialEq, Eq)]
#[strum(serialize_all = "kebab-case")]
pub enum Cardinality {
  /// proto2 `required`
  Singular,
  #[default]
  Optional,
  RepeatedList,
  RepeatedMap,
}

/// `appsync.v1.field` annotation as declared on a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, bon::Builder)]
pub struct FieldAnnotation {
  pub ignore: Option<bool>,
}

/// `appsync.v1.method` annotation as declared on a method.
#[derive(Debug, Clone, Default, PartialEq, Eq, bon::Builder)]
pub struct MethodAnnotation {
  #[builder(default)]
  pub resolves: Vec<String>,
  pub resolve_field: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct FieldDescriptor {
  #[builder(into)]
  pub name: String,
  #[builder(into)]
  pub json_name: String,
  pub kind: FieldKind,
  /// Declared with the explicit `optional` keyword.
  #[builder(default)]
  pub optional: bool,
  #[builder(default)]
  pub cardinality: Cardinality,
  pub annotation: Option<FieldAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct MessageDescriptor {
  #[builder(into)]
  pub full_name: String,
  #[builder(into)]
  pub name: String,
  #[builder(into, default)]
  pub package: String,
  /// Fully qualified name of the enclosing message, for nested declarations.
  pub parent: Option<String>,
  #[builder(default)]
  pub fields: Vec<FieldDescriptor>,
}

impl MessageDescriptor {
  /// Name relative to the package, e.g. `Outer.Inner`.
  pub fn relative_name(&self) -> &str {
    relative_name(&self.full_name, &self.package)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct EnumDescriptor {
  #[builder(into)]
  pub full_name: String,
  #[builder(into)]
  pub name: String,
  #[builder(into, default)]
  pub package: String,
  /// Value identifiers, prefixed with the enum name (`Status_STATUS_OK`).
  #[builder(default)]
  pub values: Vec<String>,
}

impl EnumDescriptor {
  pub fn relative_name(&self) -> &str {
    relative_name(&self.full_name, &self.package)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct MethodDescriptor {
  #[builder(into)]
  pub name: String,
  #[builder(into)]
  pub full_name: String,
  /// Fully qualified name of the request message.
  #[builder(into)]
  pub input: String,
  /// Fully qualified name of the response message.
  #[builder(into)]
  pub output: String,
  pub annotation: Option<MethodAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct ServiceDescriptor {
  #[builder(into)]
  pub name: String,
  #[builder(into)]
  pub full_name: String,
  #[builder(default)]
  pub methods: Vec<MethodDescriptor>,
}

/// One source file together with every message and enum it can reach.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileDescriptor {
  pub name: String,
  pub package: String,
  /// Top-level messages declared in this file, by fully qualified name, in declaration order.
  pub top_level_messages: Vec<String>,
  pub messages: IndexMap<String, MessageDescriptor>,
  pub enums: IndexMap<String, EnumDescriptor>,
  pub services: Vec<ServiceDescriptor>,
}

impl FileDescriptor {
  pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      package: package.into(),
      ..Self::default()
    }
  }

  /// Declares a top-level message of this file.
  #[must_use]
  pub fn with_message(mut self, message: MessageDescriptor) -> Self {
    if message.parent.is_none() {
      self.top_level_messages.push(message.full_name.clone());
    }
    self.messages.insert(message.full_name.clone(), message);
    self
  }

  /// Makes a message resolvable without declaring it at the top level of this file.
  #[must_use]
  pub fn with_dependency(mut self, message: MessageDescriptor) -> Self {
    self.messages.insert(message.full_name.clone(), message);
    self
  }

  #[must_use]
  pub fn with_enum(mut self, enumeration: EnumDescriptor) -> Self {
    self.enums.insert(enumeration.full_name.clone(), enumeration);
    self
  }

  #[must_use]
  pub fn with_service(mut self, service: ServiceDescriptor) -> Self {
    self.services.push(service);
    self
  }

  pub fn message(&self, full_name: &str) -> Option<&MessageDescriptor> {
    self.messages.get(full_name)
  }

  pub fn enumeration(&self, full_name: &str) -> Option<&EnumDescriptor> {
    self.enums.get(full_name)
  }

  pub fn root_candidates(&self) -> impl Iterator<Item = &MessageDescriptor> {
    self.top_level_messages.iter().filter_map(|name| self.messages.get(name))
  }

  pub fn has_services(&self) -> bool {
    !self.services.is_empty()
  }

  /// Output path prefix for generated artifacts: the file name without `.proto`.
  pub fn generated_filename_prefix(&self) -> &str {
    self.name.strip_suffix(".proto").unwrap_or(&self.name)
  }
}

fn relative_name<'a>(full_name: &'a str, package: &str) -> &'a str {
  if package.is_empty() {
    return full_name;
  }
  full_name
    .strip_prefix(package)
    .and_then(|rest| rest.strip_prefix('.'))
    .unwrap_or(full_name)
}
