use std::{collections::HashSet, sync::LazyLock};

use any_ascii::any_ascii;
use heck::{ToSnakeCase, ToUpperCamelCase};
use regex::Regex;

pub(crate) const INPUT_SUFFIX: &str = "Input";
pub(crate) const RESOLVER_SUFFIX: &str = "Resolver";
pub(crate) const RESOLVE_FN_PREFIX: &str = "resolve_";
pub(crate) const ENUM_VALUE_SEPARATOR: char = '_';

static FORBIDDEN_IDENTIFIERS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  [
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for", "if", "impl", "in",
    "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while", "async", "await", "dyn", "try", "abstract", "become", "box", "do",
    "final", "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "gen",
  ]
  .into_iter()
  .collect()
});

static INVALID_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());
static MULTI_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());

/// Transliterates to ASCII, replaces invalid characters with underscores, collapses
/// consecutive underscores and trims leading or trailing underscores.
pub(crate) fn sanitize(input: &str) -> String {
  if input.is_empty() {
    return String::new();
  }

  let ascii = any_ascii(input);
  let replaced = INVALID_CHARS_RE.replace_all(&ascii, "_");
  let collapsed = MULTI_UNDERSCORE_RE.replace_all(&replaced, "_");

  collapsed.trim_matches('_').to_string()
}

/// GraphQL type name of a message or enum: the package-relative name with nesting
/// flattened (`Outer.Inner` -> `Outer_Inner`).
pub(crate) fn graphql_type_name(relative_name: &str) -> String {
  relative_name.replace('.', "_")
}

/// Name of the input-object variant, so a message can be both a response and a request shape.
pub(crate) fn input_type_name(type_name: &str) -> String {
  format!("{type_name}{INPUT_SUFFIX}")
}

/// Drops the enum-name prefix from a value identifier (`Status_STATUS_OK` -> `STATUS_OK`).
///
/// Cuts at the first separator. Values without a separator are kept whole.
pub(crate) fn strip_enum_prefix(value: &str) -> &str {
  value
    .split_once(ENUM_VALUE_SEPARATOR)
    .map_or(value, |(_, rest)| rest)
}

/// lowerCamelCase of a method name. Only the first letter is lowered, so inner
/// acronyms survive (`GetURL` -> `getURL`). Separators are dropped and the letter
/// after a separator or digit is raised.
pub(crate) fn to_lower_camel(name: &str) -> String {
  let mut out = String::with_capacity(name.len());
  let mut raise_next = false;
  for (i, c) in name.trim().chars().enumerate() {
    if c.is_ascii_alphabetic() {
      let c = if i == 0 {
        c.to_ascii_lowercase()
      } else if raise_next {
        c.to_ascii_uppercase()
      } else {
        c
      };
      out.push(c);
      raise_next = false;
    } else if c.is_ascii_digit() {
      out.push(c);
      raise_next = true;
    } else {
      raise_next = matches!(c, '_' | ' ' | '-' | '.');
    }
  }
  out
}

/// Escapes a `snake_case` identifier the way prost does: keywords become raw
/// identifiers, and the few that cannot be raw get a trailing underscore.
fn escape_snake(mut ident: String) -> String {
  match ident.as_str() {
    "_" | "super" | "self" | "crate" | "extern" => ident.push('_'),
    keyword if FORBIDDEN_IDENTIFIERS.contains(keyword) => ident.insert_str(0, "r#"),
    _ => {}
  }
  ident
}

/// Converts an RPC method name into a Rust method name, split into words like prost splits them.
pub(crate) fn to_rust_method_name(name: &str) -> String {
  let mut ident = sanitize(name).to_snake_case();

  if ident.is_empty() {
    return "method".to_string();
  }

  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, '_');
  }
  escape_snake(ident)
}

/// Module prost generates for the nested declarations of a message.
fn to_rust_module_name(name: &str) -> String {
  escape_snake(name.to_snake_case())
}

/// Type name prost generates for a message (`HTTPRequest` -> `HttpRequest`).
pub(crate) fn to_rust_type_name(name: &str) -> String {
  let mut ident = name.to_upper_camel_case();
  if ident == "Self" {
    ident.push('_');
  }
  ident
}

/// Path of the Rust type prost generates for a message, below `types_path`.
///
/// Nested messages live in a module named after their parent (`Outer.Inner` -> `outer::Inner`).
pub(crate) fn to_rust_type_path(types_path: &str, relative_name: &str) -> String {
  let mut segments: Vec<String> = Vec::new();
  if !types_path.is_empty() {
    segments.push(types_path.to_string());
  }

  let mut parts = relative_name.split('.').peekable();
  while let Some(part) = parts.next() {
    if parts.peek().is_some() {
      segments.push(to_rust_module_name(part));
    } else {
      segments.push(to_rust_type_name(part));
    }
  }

  segments.join("::")
}

pub(crate) fn resolver_trait_name(service_name: &str) -> String {
  format!("{}{RESOLVER_SUFFIX}", to_rust_type_name(service_name))
}

pub(crate) fn resolve_fn_name(service_name: &str) -> String {
  format!("{RESOLVE_FN_PREFIX}{}", service_name.to_snake_case())
}
