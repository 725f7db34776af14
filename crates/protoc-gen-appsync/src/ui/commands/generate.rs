use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, Timelike};
use crossterm::style::Stylize;

use crate::{
  descriptor::reflect::DescriptorSet,
  generator::{
    GeneratorOptions,
    orchestrator::{GeneratedFile, GenerationStats, Orchestrator},
  },
  ui::{Colors, GenerateCommand},
  utils::DescriptorSetLoader,
};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub input: PathBuf,
  pub output: PathBuf,
  /// Proto files to generate; empty means every file declaring a service.
  pub files: Vec<String>,
  pub options: GeneratorOptions,
  pub verbose: bool,
  pub quiet: bool,
}

impl GenerateConfig {
  pub fn from_command(command: GenerateCommand) -> Self {
    let GenerateCommand {
      input,
      output,
      files,
      query_message,
      mutation_message,
      subscription_message,
      types_path,
      verbose,
      quiet,
    } = command;

    let options = GeneratorOptions::builder()
      .query_message(query_message)
      .mutation_message(mutation_message)
      .subscription_message(subscription_message)
      .types_path(types_path)
      .build();

    Self {
      input,
      output,
      files,
      options,
      verbose,
      quiet,
    }
  }

  async fn load_descriptor_set(&self) -> anyhow::Result<DescriptorSet> {
    DescriptorSetLoader::open(&self.input).await?.decode()
  }

  fn selected_files(&self, set: &DescriptorSet) -> Vec<String> {
    if self.files.is_empty() {
      set.files_with_services()
    } else {
      self.files.clone()
    }
  }

  /// Writes every artifact of `generated` below the output directory and returns their paths.
  async fn write_artifacts(&self, generated: &GeneratedFile) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = vec![];
    for (relative, content) in generated.artifacts()? {
      let path = self.output.join(relative);
      if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
          .await
          .with_context(|| format!("failed to create '{}'", parent.display()))?;
      }
      tokio::fs::write(&path, content)
        .await
        .with_context(|| format!("failed to write '{}'", path.display()))?;
      written.push(path);
    }
    Ok(written)
  }
}

struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  fn new(config: &'a GenerateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!("{} {message}", format_timestamp().with(self.colors.timestamp()));
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  fn log_loading(&self) {
    self.info(
      &format!("Loading descriptor set from: {}", self.config.input.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_no_services(&self) {
    self.info(
      &"No file in the descriptor set declares a service, nothing to generate"
        .with(self.colors.accent())
        .to_string(),
    );
  }

  fn log_generating(&self, file: &str) {
    self.info(&format!("Generating {file}...").with(self.colors.primary()).to_string());
  }

  fn log_skipped(&self, file: &str) {
    if self.config.verbose {
      self.info(
        &format!("Skipped {file}: no services")
          .with(self.colors.accent())
          .to_string(),
      );
    }
  }

  fn print_statistics(&self, stats: &GenerationStats) {
    if self.config.quiet {
      return;
    }

    self.stat("Types generated:", stats.types_generated.to_string());
    self.stat("", format!("{} types", stats.objects_generated));
    self.stat("", format!("{} inputs", stats.inputs_generated));
    self.stat("", format!("{} enums", stats.enums_generated));
    self.stat("Selectors bound:", stats.selectors_bound.to_string());
    if self.config.verbose {
      self.stat("", format!("{} services", stats.services_bound));
      self.stat("", format!("{} methods", stats.methods_bound));
    }
    self.print_cycles(stats);
  }

  fn print_cycles(&self, stats: &GenerationStats) {
    if stats.cycles_detected == 0 {
      return;
    }

    self.stat("Message cycles:", stats.cycles_detected.to_string());

    if self.config.verbose {
      for (i, cycle) in stats.cycle_details.iter().enumerate() {
        println!(
          "              {}: {}",
          format!("Cycle {}", i + 1).with(self.colors.accent()),
          cycle.join(" -> ").with(self.colors.info())
        );
      }
    }
  }

  fn log_written(&self, paths: &[PathBuf]) {
    if !self.config.verbose {
      return;
    }
    for path in paths {
      self.info(&format!("Wrote {}", path.display()).with(self.colors.info()).to_string());
    }
  }

  fn log_success(&self, generated: usize) {
    if !self.config.quiet {
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        format!("Successfully generated {generated} file(s) into {}", self.config.output.display())
          .with(self.colors.success())
      );
    }
  }
}

pub async fn generate_code(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = GenerateLogger::new(&config, colors);

  logger.log_loading();
  let set = config.load_descriptor_set().await?;

  let files = config.selected_files(&set);
  if files.is_empty() {
    logger.log_no_services();
    return Ok(());
  }

  let orchestrator = Orchestrator::new(config.options.clone());
  let mut generated_count = 0;

  for name in &files {
    logger.log_generating(name);
    let file = set.file(name)?;

    let Some(generated) = orchestrator.generate(&file)? else {
      logger.log_skipped(name);
      continue;
    };

    logger.print_statistics(&generated.stats);
    let written = config.write_artifacts(&generated).await?;
    logger.log_written(&written);
    generated_count += 1;
  }

  logger.log_success(generated_count);
  Ok(())
}

#[cfg(test)]
mod tests {
  use clap::Parser;

  use super::*;
  use crate::{
    tests::fixtures,
    ui::{Cli, Commands, colors::Theme},
  };

  fn parse_generate(args: &[&str]) -> GenerateConfig {
    let cli = Cli::try_parse_from(args).expect("arguments should parse");
    match cli.command {
      Commands::Generate(command) => GenerateConfig::from_command(command),
      Commands::List { .. } => panic!("expected generate command"),
    }
  }

  fn quiet_colors() -> Colors {
    Colors::new(false, Theme::Dark)
  }

  #[test]
  fn test_from_command_defaults() {
    let config = parse_generate(&["protoc-gen-appsync", "generate", "-i", "set.pb", "-o", "out"]);
    assert_eq!(config.input, PathBuf::from("set.pb"));
    assert_eq!(config.output, PathBuf::from("out"));
    assert!(config.files.is_empty());
    assert_eq!(config.options, GeneratorOptions::default());
    assert!(!config.verbose);
    assert!(!config.quiet);
  }

  #[test]
  fn test_from_command_overrides_roots() {
    let config = parse_generate(&[
      "protoc-gen-appsync",
      "generate",
      "-i",
      "set.pb",
      "-o",
      "out",
      "--file",
      "blog/v1/blog.proto",
      "--query-message",
      "RootQuery",
      "--subscription-message",
      "RootSubscription",
      "--types-path",
      "crate::pb",
    ]);
    assert_eq!(config.files, vec!["blog/v1/blog.proto".to_string()]);
    assert_eq!(config.options.query_message, "RootQuery");
    assert_eq!(config.options.mutation_message, "Mutation");
    assert_eq!(config.options.subscription_message, "RootSubscription");
    assert_eq!(config.options.types_path, "crate::pb");
  }

  #[test]
  fn test_verbose_conflicts_with_quiet() {
    let result = Cli::try_parse_from(["protoc-gen-appsync", "generate", "-i", "a", "-o", "b", "-v", "-q"]);
    assert!(result.is_err(), "--verbose and --quiet should conflict");
  }

  #[tokio::test]
  async fn test_generate_code_writes_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("blog.pb");
    tokio::fs::write(&input, fixtures::blog_descriptor_set_bytes()).await.unwrap();
    let output = dir.path().join("gen");

    let config = GenerateConfig {
      input,
      output: output.clone(),
      files: vec![],
      options: GeneratorOptions::default(),
      verbose: false,
      quiet: true,
    };
    generate_code(config, &quiet_colors()).await.expect("generation should succeed");

    let schema = tokio::fs::read_to_string(output.join("blog/v1/blog.graphql")).await.unwrap();
    assert!(schema.contains("type Query {"), "schema should declare Query:\n{schema}");
    assert!(schema.contains("related(postId: String!): [Post!]!"), "binding arguments:\n{schema}");

    let dispatch = tokio::fs::read_to_string(output.join("blog/v1/blog.res.rs")).await.unwrap();
    assert!(dispatch.contains("pub trait BlogServiceResolver"), "resolver trait:\n{dispatch}");

    let manifest = tokio::fs::read_to_string(output.join("blog/v1/blog.resolvers.json")).await.unwrap();
    let manifest: serde_json::Value = serde_json::from_str(&manifest).unwrap();
    assert_eq!(manifest["selectors"], serde_json::json!(["Post.related", "Query.posts"]));

    assert!(
      !output.join("appsync/v1/options.graphql").exists(),
      "files without services must be skipped"
    );
  }

  #[tokio::test]
  async fn test_generate_code_reports_unmatched_binding() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.pb");
    tokio::fs::write(&input, fixtures::unmatched_descriptor_set_bytes()).await.unwrap();
    let output = dir.path().join("gen");

    let config = GenerateConfig {
      input,
      output: output.clone(),
      files: vec![],
      options: GeneratorOptions::default(),
      verbose: false,
      quiet: true,
    };
    let err = generate_code(config, &quiet_colors()).await.unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Profile.owner"), "error should cite the qualifier: {message}");
    assert!(!output.join("account/v1/account.graphql").exists(), "no partial output on failure");
  }

  #[tokio::test]
  async fn test_generate_code_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let config = GenerateConfig {
      input: dir.path().join("missing.pb"),
      output: dir.path().join("gen"),
      files: vec![],
      options: GeneratorOptions::default(),
      verbose: false,
      quiet: true,
    };
    let err = generate_code(config, &quiet_colors()).await.unwrap_err();
    assert!(err.to_string().contains("missing.pb"), "error should name the input: {err}");
  }

  #[tokio::test]
  async fn test_write_artifacts_nests_by_proto_path() {
    let dir = tempfile::tempdir().unwrap();
    let set = DescriptorSet::from_pool(fixtures::blog_pool());
    let file = set.file("blog/v1/blog.proto").unwrap();
    let generated = Orchestrator::new(GeneratorOptions::default())
      .generate(&file)
      .unwrap()
      .expect("blog declares a service");

    let config = GenerateConfig {
      input: PathBuf::from("unused.pb"),
      output: dir.path().to_path_buf(),
      files: vec![],
      options: GeneratorOptions::default(),
      verbose: false,
      quiet: true,
    };
    let written = config.write_artifacts(&generated).await.unwrap();
    assert_eq!(
      written,
      vec![
        dir.path().join("blog/v1/blog.graphql"),
        dir.path().join("blog/v1/blog.res.rs"),
        dir.path().join("blog/v1/blog.resolvers.json"),
      ]
    );
    for path in &written {
      assert!(path.exists(), "{} should exist", path.display());
    }
  }
}
