//! Recursive mapping of protobuf messages onto GraphQL types.

use super::{
  GeneratorOptions,
  bindings::{BindingTable, MethodRef, ResolverIndex},
  errors::{GenerateError, GenerateResult},
  naming::{graphql_type_name, input_type_name, strip_enum_prefix},
  options::is_ignored,
  schema::{ArgumentDefinition, Direction, FieldDefinition, STRING_SCALAR, Schema, TypeDefinition, TypeRef},
};
use crate::descriptor::{
  Cardinality, EnumDescriptor, FieldDescriptor, FieldKind, FileDescriptor, MessageDescriptor, ScalarKind,
};

/// Schema and bindings of one fully processed file.
#[derive(Debug, Clone)]
pub(crate) struct GeneratedTarget {
  pub(crate) schema: Schema,
  pub(crate) resolvers: ResolverIndex,
}

/// Generation context of a single file. Owns the type table and binding table,
/// neither of which outlives the file.
#[derive(Debug)]
pub(crate) struct Target<'a> {
  file: &'a FileDescriptor,
  options: &'a GeneratorOptions,
  schema: Schema,
  bindings: BindingTable,
}

impl<'a> Target<'a> {
  /// Creates the context and runs the binding index pass.
  pub(crate) fn new(file: &'a FileDescriptor, options: &'a GeneratorOptions) -> GenerateResult<Self> {
    Ok(Self {
      file,
      options,
      schema: Schema::default(),
      bindings: BindingTable::index(file)?,
    })
  }

  /// Walks every configured root on the output side, then checks that each declared binding was reached.
  pub(crate) fn generate(mut self) -> GenerateResult<GeneratedTarget> {
    let (file, options) = (self.file, self.options);
    for root in file.root_candidates().filter(|message| options.is_root(&message.name)) {
      self.generate_message(Direction::Output, root)?;
    }

    self.bindings.ensure_all_matched(options)?;

    Ok(GeneratedTarget {
      schema: self.schema,
      resolvers: self.bindings.into_resolvers(),
    })
  }

  pub(crate) fn generate_message(
    &mut self,
    direction: Direction,
    message: &MessageDescriptor,
  ) -> GenerateResult<&TypeDefinition> {
    let name = self.message_type(direction, message)?;
    Ok(&self.schema[name.as_str()])
  }

  #[cfg(test)]
  pub(crate) fn schema(&self) -> &Schema {
    &self.schema
  }

  #[cfg(test)]
  pub(crate) fn bindings(&self) -> &BindingTable {
    &self.bindings
  }

  /// Emits the type for `message` unless it exists already and returns its name.
  fn message_type(&mut self, direction: Direction, message: &MessageDescriptor) -> GenerateResult<String> {
    let name = match direction {
      Direction::Output => graphql_type_name(message.relative_name()),
      Direction::Input => input_type_name(&graphql_type_name(message.relative_name())),
    };

    // Inserted before the fields are mapped, so self references resolve to it.
    if !self.schema.insert(TypeDefinition::new(direction.into(), &name)) {
      return Ok(name);
    }

    for field in &message.fields {
      if is_ignored(field) {
        continue;
      }

      let mut definition = self.field_definition(direction, message, field)?;

      if direction == Direction::Output
        && let Some(method) = self.bindings.take_unmatched(&proto_qualifier(message, field))
      {
        definition.arguments = self.arguments(&method)?;
        self.bindings.mark_matched(&name, &field.json_name, method);
      }

      self.schema.push_field(&name, definition);
    }

    Ok(name)
  }

  fn field_definition(
    &mut self,
    direction: Direction,
    message: &MessageDescriptor,
    field: &FieldDescriptor,
  ) -> GenerateResult<FieldDefinition> {
    let qualifier = proto_qualifier(message, field);

    let list = match field.cardinality {
      Cardinality::Singular | Cardinality::Optional => false,
      Cardinality::RepeatedList => true,
      Cardinality::RepeatedMap => {
        return Err(GenerateError::UnsupportedCardinality {
          field: qualifier,
          cardinality: field.cardinality,
        });
      }
    };

    let named = self.base_type(direction, &qualifier, field)?;
    let ty = TypeRef::builder().named(named).list(list).non_null(!field.optional).build();

    Ok(FieldDefinition::new(&field.json_name, ty))
  }

  fn base_type(&mut self, direction: Direction, qualifier: &str, field: &FieldDescriptor) -> GenerateResult<String> {
    let file = self.file;
    match &field.kind {
      FieldKind::Scalar(ScalarKind::String) => Ok(STRING_SCALAR.to_string()),
      FieldKind::Scalar(kind) => Err(GenerateError::UnsupportedField {
        field: qualifier.to_string(),
        kind: kind.to_string(),
      }),
      FieldKind::Message(type_name) => {
        let referenced = file.message(type_name).ok_or_else(|| GenerateError::UnknownType {
          origin: qualifier.to_string(),
          type_name: type_name.clone(),
        })?;
        self.message_type(direction, referenced)
      }
      FieldKind::Enum(type_name) => {
        let referenced = file.enumeration(type_name).ok_or_else(|| GenerateError::UnknownType {
          origin: qualifier.to_string(),
          type_name: type_name.clone(),
        })?;
        Ok(self.enum_type(referenced))
      }
    }
  }

  /// Arguments of a bound field: the fields of the method's request message, mapped as input.
  fn arguments(&mut self, method: &MethodRef) -> GenerateResult<Vec<ArgumentDefinition>> {
    let file = self.file;
    let input = file.message(&method.input).ok_or_else(|| GenerateError::UnknownType {
      origin: method.display_name(),
      type_name: method.input.clone(),
    })?;

    let mut arguments = vec![];
    for field in &input.fields {
      if is_ignored(field) {
        continue;
      }
      arguments.push(self.field_definition(Direction::Input, input, field)?.into());
    }
    Ok(arguments)
  }

  /// Enums have no input variant; both directions share one definition.
  fn enum_type(&mut self, enumeration: &EnumDescriptor) -> String {
    let name = graphql_type_name(enumeration.relative_name());
    if !self.schema.contains(&name) {
      let values = enumeration
        .values
        .iter()
        .map(|value| strip_enum_prefix(value).to_string())
        .collect();
      self.schema.insert(TypeDefinition::enumeration(&name, values));
    }
    name
  }
}

fn proto_qualifier(message: &MessageDescriptor, field: &FieldDescriptor) -> String {
  format!("{}.{}", message.name, field.name)
}
