pub(crate) mod bindings;
pub(crate) mod cycles;
pub(crate) mod emit;
pub(crate) mod errors;
pub(crate) mod naming;
pub(crate) mod options;
pub mod orchestrator;
pub(crate) mod schema;
pub(crate) mod target;

#[cfg(test)]
mod tests;

pub(crate) const DEFAULT_QUERY_MESSAGE: &str = "Query";
pub(crate) const DEFAULT_MUTATION_MESSAGE: &str = "Mutation";
pub(crate) const DEFAULT_SUBSCRIPTION_MESSAGE: &str = "Mutation";
pub(crate) const DEFAULT_TYPES_PATH: &str = "super";

/// Settings shared by every file generated in one run.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct GeneratorOptions {
  /// Name of the message that describes the top-level Query type
  #[builder(into, default = DEFAULT_QUERY_MESSAGE.to_string())]
  pub query_message: String,
  /// Name of the message that describes the top-level Mutation type
  #[builder(into, default = DEFAULT_MUTATION_MESSAGE.to_string())]
  pub mutation_message: String,
  /// Name of the message that describes the top-level Subscription type
  #[builder(into, default = DEFAULT_SUBSCRIPTION_MESSAGE.to_string())]
  pub subscription_message: String,
  /// Rust path under which the protobuf message types live, as seen from the generated module
  #[builder(into, default = DEFAULT_TYPES_PATH.to_string())]
  pub types_path: String,
}

impl Default for GeneratorOptions {
  fn default() -> Self {
    Self::builder().build()
  }
}

impl GeneratorOptions {
  pub(crate) fn is_root(&self, message_name: &str) -> bool {
    [&self.query_message, &self.mutation_message, &self.subscription_message]
      .into_iter()
      .any(|root| root == message_name)
  }
}
