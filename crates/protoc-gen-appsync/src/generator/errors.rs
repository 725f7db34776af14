use crate::descriptor::Cardinality;

pub(crate) type GenerateResult<T> = Result<T, GenerateError>;

/// Fatal problems found while deriving the GraphQL schema of one file.
///
/// Every variant names the offending protobuf element so the annotation or
/// field declaration can be fixed at the source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
  #[error("unsupported field '{field}': {kind} has no GraphQL representation")]
  UnsupportedField { field: String, kind: String },

  #[error(
    "unsupported field '{field}': {cardinality} fields using the `map<K, V>` shorthand are not supported, declare a repeated key/value message instead"
  )]
  UnsupportedCardinality { field: String, cardinality: Cardinality },

  #[error("'{origin}' references '{type_name}' which is not part of the descriptor set")]
  UnknownType { origin: String, type_name: String },

  #[error(
    "{method} resolves field '{qualifier}' but it was not found under the root messages ({query}, {mutation} or {subscription})"
  )]
  UnmatchedBinding {
    method: String,
    qualifier: String,
    query: String,
    mutation: String,
    subscription: String,
  },

  #[error("field '{qualifier}' is resolved by both {first} and {second}")]
  DuplicateBinding {
    qualifier: String,
    first: String,
    second: String,
  },
}
