use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::colors::{ColorMode, Colors, ThemeMode};
use crate::generator::{
  DEFAULT_MUTATION_MESSAGE, DEFAULT_QUERY_MESSAGE, DEFAULT_SUBSCRIPTION_MESSAGE, DEFAULT_TYPES_PATH,
};

#[derive(Parser, Debug)]
#[command(name = "protoc-gen-appsync")]
#[command(author, version, about = "Protobuf to AppSync GraphQL schema and resolver generator")]
#[command(styles = Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List information from a descriptor set
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Generate the GraphQL schema and resolver dispatch of every file with services
  Generate(GenerateCommand),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateCommand {
  /// Path to a binary FileDescriptorSet (`protoc --include_imports --descriptor_set_out`)
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  /// Directory the generated artifacts are written to
  #[arg(short, long, value_name = "DIR")]
  pub output: PathBuf,

  /// Generate only these proto files (repeatable; default: every file declaring a service)
  #[arg(long = "file", value_name = "PROTO")]
  pub files: Vec<String>,

  /// Name of the message that describes the top-level Query type
  #[arg(long, value_name = "MESSAGE", default_value = DEFAULT_QUERY_MESSAGE)]
  pub query_message: String,

  /// Name of the message that describes the top-level Mutation type
  #[arg(long, value_name = "MESSAGE", default_value = DEFAULT_MUTATION_MESSAGE)]
  pub mutation_message: String,

  /// Name of the message that describes the top-level Subscription type
  #[arg(long, value_name = "MESSAGE", default_value = DEFAULT_SUBSCRIPTION_MESSAGE)]
  pub subscription_message: String,

  /// Rust path of the prost types, as seen from the generated dispatch module
  #[arg(long, value_name = "PATH", default_value = DEFAULT_TYPES_PATH)]
  pub types_path: String,

  /// Enable verbose output with detailed progress information
  #[arg(short, long, default_value_t = false, conflicts_with = "quiet")]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List every resolver binding declared in the descriptor set
  Bindings {
    /// Path to a binary FileDescriptorSet
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
  },
}
