use std::path::Path;

use comfy_table::{Attribute, Cell, ContentArrangement, Row, Table};

use crate::{
  descriptor::reflect::DescriptorSet,
  generator::options::method_options,
  ui::{
    Colors,
    colors::comfy,
    term_width,
  },
  utils::DescriptorSetLoader,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct BindingRow {
  service: String,
  method: String,
  resolve_field: String,
  resolves: Vec<String>,
}

/// Every method carrying a binding annotation, ordered by service and method name.
fn collect_bindings(set: &DescriptorSet) -> anyhow::Result<Vec<BindingRow>> {
  let mut rows = vec![];
  for name in set.files_with_services() {
    let file = set.file(&name)?;
    for service in &file.services {
      for method in &service.methods {
        if let Some(options) = method_options(method) {
          rows.push(BindingRow {
            service: service.full_name.clone(),
            method: method.name.clone(),
            resolve_field: options.resolve_field,
            resolves: options.resolves,
          });
        }
      }
    }
  }

  rows.sort_by(|a, b| (&a.service, &a.method).cmp(&(&b.service, &b.method)));
  Ok(rows)
}

pub async fn list_bindings(input: &Path, colors: &Colors) -> anyhow::Result<()> {
  let set = DescriptorSetLoader::open(input).await?.decode()?;
  let bindings = collect_bindings(&set)?;

  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut header = Row::new();
  for title in ["SERVICE", "METHOD", "FIELD", "RESOLVES"] {
    header.add_cell(Cell::new(title).fg(comfy(colors.label())));
  }
  table.set_header(header);

  for binding in bindings {
    let mut row = Row::new();
    row.add_cell(Cell::new(binding.service).fg(comfy(colors.primary())));
    row.add_cell(
      Cell::new(binding.method)
        .fg(comfy(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(Cell::new(binding.resolve_field).fg(comfy(colors.accent())));
    row.add_cell(Cell::new(binding.resolves.join("\n")).fg(comfy(colors.info())));
    table.add_row(row);
  }

  println!("{table}");

  Ok(())
}
