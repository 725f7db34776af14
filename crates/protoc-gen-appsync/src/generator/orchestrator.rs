//! Per-file generation pipeline.
//!
//! [`Orchestrator`] runs the binding index pass, walks the configured root
//! messages, checks that every declared binding was reached and only then renders
//! the artifacts of the file: the GraphQL schema, the Rust dispatch module and
//! the binding manifest. Any error aborts the file without partial output.
//!
//! ```no_run
//! # fn example(set: &crate::descriptor::reflect::DescriptorSet) -> anyhow::Result<()> {
//! let orchestrator = Orchestrator::new(GeneratorOptions::default());
//! let file = set.file("blog/v1/blog.proto")?;
//! if let Some(generated) = orchestrator.generate(&file)? {
//!   std::fs::write(generated.schema_path(), &generated.schema)?;
//! }
//! # Ok(())
//! # }
//! ```

use anyhow::Context;
use serde::Serialize;

use crate::{
  descriptor::FileDescriptor,
  generator::{
    GeneratorOptions,
    bindings::ResolverIndex,
    cycles::detect_message_cycles,
    emit::{DispatchGenerator, render_schema},
    naming::{resolve_fn_name, resolver_trait_name},
    schema::{DefinitionKind, Schema},
    target::Target,
  },
};

const GENERATOR_NAME: &str = "protoc-gen-appsync";
pub const SCHEMA_EXTENSION: &str = "graphql";
pub const DISPATCH_EXTENSION: &str = "res.rs";
pub const MANIFEST_EXTENSION: &str = "resolvers.json";

pub struct Orchestrator {
  options: GeneratorOptions,
}

/// Statistics about the generation of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationStats {
  /// Total number of GraphQL types emitted
  pub types_generated: usize,
  pub objects_generated: usize,
  pub inputs_generated: usize,
  pub enums_generated: usize,
  /// Number of matched `Type.field` selectors
  pub selectors_bound: usize,
  pub services_bound: usize,
  pub methods_bound: usize,
  /// Number of message reference cycles found in the file
  pub cycles_detected: usize,
  /// Members of each cycle (for verbose logging)
  pub cycle_details: Vec<Vec<String>>,
}

impl GenerationStats {
  fn collect(schema: &Schema, resolvers: &ResolverIndex, cycle_details: Vec<Vec<String>>) -> Self {
    Self {
      types_generated: schema.len(),
      objects_generated: schema.count(DefinitionKind::Object),
      inputs_generated: schema.count(DefinitionKind::Input),
      enums_generated: schema.count(DefinitionKind::Enum),
      selectors_bound: resolvers.bindings.len(),
      services_bound: resolvers.services.len(),
      methods_bound: resolvers.methods.len(),
      cycles_detected: cycle_details.len(),
      cycle_details,
    }
  }
}

/// Binding metadata for provisioning tools, written next to the schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverManifest {
  pub source: String,
  pub selectors: Vec<String>,
  pub services: Vec<ManifestService>,
  pub methods: Vec<ManifestMethod>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestService {
  pub name: String,
  pub full_name: String,
  pub resolver_trait: String,
  pub dispatch_fn: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestMethod {
  pub service: String,
  pub name: String,
  pub full_name: String,
  pub resolve_field: String,
  pub input: String,
  pub output: String,
  pub selectors: Vec<String>,
}

impl ResolverManifest {
  fn new(source: &str, resolvers: &ResolverIndex) -> Self {
    let services = resolvers
      .services
      .values()
      .map(|service| ManifestService {
        name: service.name.clone(),
        full_name: service.full_name.clone(),
        resolver_trait: resolver_trait_name(&service.name),
        dispatch_fn: resolve_fn_name(&service.name),
      })
      .collect();

    let methods = resolvers
      .methods
      .values()
      .map(|method| {
        let mut selectors: Vec<String> = resolvers
          .bindings
          .values()
          .filter(|binding| binding.method.full_name == method.full_name)
          .map(|binding| binding.qualifier())
          .collect();
        selectors.sort();
        ManifestMethod {
          service: method.service.full_name.clone(),
          name: method.name.clone(),
          full_name: method.full_name.clone(),
          resolve_field: method.resolve_field.clone(),
          input: method.input.clone(),
          output: method.output.clone(),
          selectors,
        }
      })
      .collect();

    Self {
      source: source.to_string(),
      selectors: resolvers.selectors(),
      services,
      methods,
    }
  }

  pub fn to_json(&self) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(self).context("failed to serialize resolver manifest")?;
    json.push('\n');
    Ok(json)
  }
}

/// Artifacts of one source file.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
  /// Source path without `.proto`, e.g. `blog/v1/blog`
  pub prefix: String,
  pub schema: String,
  pub dispatch: String,
  pub manifest: ResolverManifest,
  pub stats: GenerationStats,
}

impl GeneratedFile {
  pub fn schema_path(&self) -> String {
    format!("{}.{SCHEMA_EXTENSION}", self.prefix)
  }

  pub fn dispatch_path(&self) -> String {
    format!("{}.{DISPATCH_EXTENSION}", self.prefix)
  }

  pub fn manifest_path(&self) -> String {
    format!("{}.{MANIFEST_EXTENSION}", self.prefix)
  }

  /// Relative path and content of every artifact, in write order.
  pub fn artifacts(&self) -> anyhow::Result<Vec<(String, String)>> {
    Ok(vec![
      (self.schema_path(), self.schema.clone()),
      (self.dispatch_path(), self.dispatch.clone()),
      (self.manifest_path(), self.manifest.to_json()?),
    ])
  }
}

impl Orchestrator {
  pub fn new(options: GeneratorOptions) -> Self {
    Self { options }
  }

  /// Generates the artifacts of `file`, or `None` when it declares no service.
  pub fn generate(&self, file: &FileDescriptor) -> anyhow::Result<Option<GeneratedFile>> {
    if !file.has_services() {
      return Ok(None);
    }

    let generated = Target::new(file, &self.options)
      .and_then(Target::generate)
      .with_context(|| format!("failed to generate GraphQL schema for '{}'", file.name))?;

    let schema = format!(
      "{}{}",
      header("#", &file.name),
      render_schema(&generated.schema)
    );

    let dispatch_code = DispatchGenerator::new(file, &generated.resolvers, &self.options.types_path)
      .and_then(|generator| generator.generate())
      .with_context(|| format!("failed to generate resolver dispatch for '{}'", file.name))?;
    let dispatch = format!("{}{dispatch_code}", header("//", &file.name));

    let stats = GenerationStats::collect(&generated.schema, &generated.resolvers, detect_message_cycles(file));

    Ok(Some(GeneratedFile {
      prefix: file.generated_filename_prefix().to_string(),
      schema,
      dispatch,
      manifest: ResolverManifest::new(&file.name, &generated.resolvers),
      stats,
    }))
  }
}

fn header(comment: &str, source: &str) -> String {
  format!("{comment} Code generated by {GENERATOR_NAME}. DO NOT EDIT.\n{comment} source: {source}\n\n")
}
