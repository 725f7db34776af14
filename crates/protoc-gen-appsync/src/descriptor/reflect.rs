use std::collections::VecDeque;

use anyhow::{Context, bail};
use prost_reflect::{
  Cardinality as ProtoCardinality, DescriptorPool, DynamicMessage, EnumDescriptor as ProtoEnum, ExtensionDescriptor,
  FieldDescriptor as ProtoField, FileDescriptor as ProtoFile, Kind, MessageDescriptor as ProtoMessage, Syntax,
};

use super::{
  Cardinality, EnumDescriptor, FieldAnnotation, FieldDescriptor, FieldKind, FileDescriptor, MessageDescriptor,
  MethodAnnotation, MethodDescriptor, ScalarKind, ServiceDescriptor,
};

pub const FIELD_EXTENSION: &str = "appsync.v1.field";
pub const METHOD_EXTENSION: &str = "appsync.v1.method";

/// A decoded `FileDescriptorSet`, as written by `protoc --include_imports --descriptor_set_out`.
pub struct DescriptorSet {
  pool: DescriptorPool,
  field_ext: Option<ExtensionDescriptor>,
  method_ext: Option<ExtensionDescriptor>,
}

impl DescriptorSet {
  pub fn decode(bytes: &[u8]) -> anyhow::Result<Self> {
    let pool = DescriptorPool::decode(bytes).context("failed to decode file descriptor set")?;
    Ok(Self::from_pool(pool))
  }

  pub fn from_pool(pool: DescriptorPool) -> Self {
    let field_ext = pool.get_extension_by_name(FIELD_EXTENSION);
    let method_ext = pool.get_extension_by_name(METHOD_EXTENSION);
    Self {
      pool,
      field_ext,
      method_ext,
    }
  }

  /// Files that declare at least one service; the only ones worth generating for.
  pub fn files_with_services(&self) -> Vec<String> {
    self
      .pool
      .files()
      .filter(|file| file.services().next().is_some())
      .map(|file| file.name().to_string())
      .collect()
  }

  pub fn file(&self, name: &str) -> anyhow::Result<FileDescriptor> {
    let file = self
      .pool
      .get_file_by_name(name)
      .with_context(|| format!("file '{name}' is not part of the descriptor set"))?;
    self.convert_file(&file)
  }

  fn convert_file(&self, file: &ProtoFile) -> anyhow::Result<FileDescriptor> {
    let mut out = FileDescriptor::new(file.name(), file.package_name());
    let mut queue: VecDeque<ProtoMessage> = VecDeque::new();
    let mut enums: Vec<ProtoEnum> = file.enums().collect();

    for message in file.messages() {
      out.top_level_messages.push(message.full_name().to_string());
      queue.push_back(message);
    }

    for service in file.services() {
      let mut methods = Vec::new();
      for method in service.methods() {
        queue.push_back(method.input());
        queue.push_back(method.output());
        methods.push(MethodDescriptor {
          name: method.name().to_string(),
          full_name: method.full_name().to_string(),
          input: method.input().full_name().to_string(),
          output: method.output().full_name().to_string(),
          annotation: self.method_annotation(&method.options()),
        });
      }
      out.services.push(ServiceDescriptor {
        name: service.name().to_string(),
        full_name: service.full_name().to_string(),
        methods,
      });
    }

    while let Some(message) = queue.pop_front() {
      if out.messages.contains_key(message.full_name()) {
        continue;
      }

      queue.extend(message.child_messages());
      enums.extend(message.child_enums());

      let mut fields = Vec::new();
      for field in message.fields() {
        match field.kind() {
          Kind::Message(referenced) => queue.push_back(referenced),
          Kind::Enum(referenced) => enums.push(referenced),
          _ => {}
        }
        fields.push(self.convert_field(&field)?);
      }

      out.messages.insert(
        message.full_name().to_string(),
        MessageDescriptor {
          full_name: message.full_name().to_string(),
          name: message.name().to_string(),
          package: message.package_name().to_string(),
          parent: message.parent_message().map(|parent| parent.full_name().to_string()),
          fields,
        },
      );
    }

    for enumeration in enums {
      if out.enums.contains_key(enumeration.full_name()) {
        continue;
      }
      out
        .enums
        .insert(enumeration.full_name().to_string(), convert_enum(&enumeration));
    }

    Ok(out)
  }

  fn convert_field(&self, field: &ProtoField) -> anyhow::Result<FieldDescriptor> {
    let cardinality = field_cardinality(field.is_map(), field.is_list(), field.cardinality())
      .with_context(|| format!("unsupported field '{}'", field.full_name()))?;

    Ok(FieldDescriptor {
      name: field.name().to_string(),
      json_name: field.json_name().to_string(),
      kind: field_kind(field.kind()),
      optional: has_optional_keyword(field),
      cardinality,
      annotation: self.field_annotation(&field.options()),
    })
  }

  fn field_annotation(&self, options: &DynamicMessage) -> Option<FieldAnnotation> {
    let value = extension_message(options, self.field_ext.as_ref()?)?;
    Some(parse_field_annotation(&value))
  }

  fn method_annotation(&self, options: &DynamicMessage) -> Option<MethodAnnotation> {
    let value = extension_message(options, self.method_ext.as_ref()?)?;
    Some(parse_method_annotation(&value))
  }
}

pub(crate) fn field_cardinality(
  is_map: bool,
  is_list: bool,
  cardinality: ProtoCardinality,
) -> anyhow::Result<Cardinality> {
  if is_map {
    return Ok(Cardinality::RepeatedMap);
  }
  if is_list {
    return Ok(Cardinality::RepeatedList);
  }
  match cardinality {
    ProtoCardinality::Required => Ok(Cardinality::Singular),
    ProtoCardinality::Optional => Ok(Cardinality::Optional),
    ProtoCardinality::Repeated => bail!("repeated label on a field that is neither a list nor a map"),
  }
}

/// `optional` spelled out in the source: any proto3 `optional`, or a proto2 `optional` label
/// outside a oneof.
fn has_optional_keyword(field: &ProtoField) -> bool {
  if field.field_descriptor_proto().proto3_optional() {
    return true;
  }
  matches!(field.parent_file().syntax(), Syntax::Proto2)
    && matches!(field.cardinality(), ProtoCardinality::Optional)
    && !field.is_list()
    && field.containing_oneof().is_none()
}

fn extension_message(options: &DynamicMessage, ext: &ExtensionDescriptor) -> Option<DynamicMessage> {
  if !options.has_extension(ext) {
    return None;
  }
  options.get_extension(ext).as_message().cloned()
}

pub(crate) fn parse_field_annotation(message: &DynamicMessage) -> FieldAnnotation {
  let ignore = message
    .has_field_by_name("ignore")
    .then(|| message.get_field_by_name("ignore"))
    .flatten()
    .and_then(|value| value.as_bool());
  FieldAnnotation { ignore }
}

pub(crate) fn parse_method_annotation(message: &DynamicMessage) -> MethodAnnotation {
  let resolves = message
    .get_field_by_name("resolves")
    .and_then(|value| {
      value
        .as_list()
        .map(|items| items.iter().filter_map(|item| item.as_str().map(String::from)).collect())
    })
    .unwrap_or_default();

  let resolve_field = message
    .has_field_by_name("resolve_field")
    .then(|| message.get_field_by_name("resolve_field"))
    .flatten()
    .and_then(|value| value.as_str().map(String::from));

  MethodAnnotation {
    resolves,
    resolve_field,
  }
}

fn convert_enum(enumeration: &ProtoEnum) -> EnumDescriptor {
  EnumDescriptor {
    full_name: enumeration.full_name().to_string(),
    name: enumeration.name().to_string(),
    package: enumeration.package_name().to_string(),
    values: enumeration
      .values()
      .map(|value| format!("{}_{}", enumeration.name(), value.name()))
      .collect(),
  }
}

fn field_kind(kind: Kind) -> FieldKind {
  let scalar = match kind {
    Kind::Message(message) => return FieldKind::Message(message.full_name().to_string()),
    Kind::Enum(enumeration) => return FieldKind::Enum(enumeration.full_name().to_string()),
    Kind::Double => ScalarKind::Double,
    Kind::Float => ScalarKind::Float,
    Kind::Int32 => ScalarKind::Int32,
    Kind::Int64 => ScalarKind::Int64,
    Kind::Uint32 => ScalarKind::Uint32,
    Kind::Uint64 => ScalarKind::Uint64,
    Kind::Sint32 => ScalarKind::Sint32,
    Kind::Sint64 => ScalarKind::Sint64,
    Kind::Fixed32 => ScalarKind::Fixed32,
    Kind::Fixed64 => ScalarKind::Fixed64,
    Kind::Sfixed32 => ScalarKind::Sfixed32,
    Kind::Sfixed64 => ScalarKind::Sfixed64,
    Kind::Bool => ScalarKind::Bool,
    Kind::String => ScalarKind::String,
    Kind::Bytes => ScalarKind::Bytes,
  };
  FieldKind::Scalar(scalar)
}
