use std::fmt::{self, Display, Formatter};

use itertools::Itertools;

use crate::generator::schema::{ArgumentDefinition, DefinitionKind, FieldDefinition, Schema, TypeDefinition, TypeRef};

const INDENT: &str = "  ";

/// GraphQL SDL of every type in the table, in insertion order, one block per type.
pub(crate) fn render_schema(schema: &Schema) -> String {
  if schema.is_empty() {
    return String::new();
  }
  let mut out = schema.iter().join("\n\n");
  out.push('\n');
  out
}

impl Display for TypeRef {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    if self.list {
      write!(f, "[{}!]", self.named)?;
    } else {
      f.write_str(&self.named)?;
    }
    if self.non_null {
      f.write_str("!")?;
    }
    Ok(())
  }
}

impl Display for ArgumentDefinition {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.name, self.ty)
  }
}

impl Display for FieldDefinition {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str(&self.name)?;
    if !self.arguments.is_empty() {
      write!(f, "({})", self.arguments.iter().join(", "))?;
    }
    write!(f, ": {}", self.ty)
  }
}

impl Display for TypeDefinition {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", self.kind, self.name)?;

    let members: Vec<String> = match self.kind {
      DefinitionKind::Enum => self.values.clone(),
      DefinitionKind::Object | DefinitionKind::Input => self.fields.iter().map(ToString::to_string).collect(),
    };
    if members.is_empty() {
      return Ok(());
    }

    f.write_str(" {\n")?;
    for member in members {
      writeln!(f, "{INDENT}{member}")?;
    }
    f.write_str("}")
  }
}
