//! Text rendering for exported quotations.
//!
//! The core hands over an [`ExportDocument`]; this module lays it out with an embedded Tera
//! template and writes it next to the other exports.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quotekit_core::ExportDocument;
use tera::{Context as TeraContext, Tera};

const QUOTATION_TEMPLATE: &str = r#"{% set underline = document.title | length -%}
{{ document.title }}
{{ "=" | repeat(n=underline) }}

{% for line in document.client_lines -%}
{{ line.label }}: {{ line.value }}
{% endfor %}
{{ document.items_heading }}
{% for item in document.items -%}
{{ item.position }}. {{ item.name | pad(width=48) }} {{ item.amount }}
{% endfor %}
{% for line in document.totals -%}
{{ line.label | pad(width=51) }} {{ line.value }}
{% endfor %}
{{ document.footer }}
{{ document.generated_on }}
"#;

/// Pads a string on the right to `width` characters.
fn tera_pad_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let text = value.as_str().ok_or_else(|| tera::Error::msg("pad filter expects a string"))?;
    let width = args.get("width").and_then(tera::Value::as_u64).unwrap_or(0) as usize;
    Ok(tera::Value::String(format!("{text:<width$}")))
}

/// Repeats a string `n` times; used for title underlines.
fn tera_repeat_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let text = value.as_str().ok_or_else(|| tera::Error::msg("repeat filter expects a string"))?;
    let count = args.get("n").and_then(tera::Value::as_u64).unwrap_or(1) as usize;
    Ok(tera::Value::String(text.repeat(count)))
}

pub struct QuotationRenderer {
    tera: Tera,
}

impl QuotationRenderer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.register_filter("pad", tera_pad_filter);
        tera.register_filter("repeat", tera_repeat_filter);
        tera.add_raw_template("quotation.txt", QUOTATION_TEMPLATE)
            .context("quotation template failed to compile")?;
        Ok(Self { tera })
    }

    pub fn render(&self, document: &ExportDocument) -> Result<String> {
        let mut context = TeraContext::new();
        context.insert("document", document);
        self.tera.render("quotation.txt", &context).context("quotation template failed to render")
    }

    /// Renders `document` into `dir`, named after its suggested file name with a `.txt`
    /// extension, and returns the written path.
    pub fn write_to(&self, document: &ExportDocument, dir: &Path) -> Result<PathBuf> {
        let rendered = self.render(document)?;
        fs::create_dir_all(dir)
            .with_context(|| format!("could not create export directory {}", dir.display()))?;
        let path = dir.join(Path::new(&document.file_name).with_extension("txt"));
        fs::write(&path, rendered)
            .with_context(|| format!("could not write export {}", path.display()))?;
        Ok(path)
    }
}
