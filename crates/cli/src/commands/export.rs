use std::path::Path;

use chrono::Local;
use quotekit_core::config::LoadOptions;
use quotekit_core::{Outcome, QuotationId, QuoteBuilder};
use serde::Serialize;

use crate::commands::{load_config, open_store, CommandResult};
use crate::render::QuotationRenderer;

#[derive(Debug, Serialize)]
struct ExportSummary {
    id: QuotationId,
    path: String,
    total: String,
}

pub fn run(options: &LoadOptions, id: i64, output_dir: &Path) -> CommandResult {
    let config = match load_config("export", options) {
        Ok(config) => config,
        Err(result) => return result,
    };

    let id = QuotationId(id);
    let builder = QuoteBuilder::new(open_store(&config));
    let document = match builder.export_saved(id, Local::now().date_naive()) {
        Ok(document) => document,
        Err(error) => return CommandResult::rejected("export", error),
    };

    let written =
        QuotationRenderer::new().and_then(|renderer| renderer.write_to(&document, output_dir));
    let path = match written {
        Ok(path) => path,
        Err(error) => {
            return CommandResult::failure("export", "export_write", format!("{error:#}"), 9);
        }
    };

    let summary = ExportSummary {
        id,
        path: path.display().to_string(),
        total: document.totals.last().map(|line| line.value.clone()).unwrap_or_default(),
    };
    let outcome = Outcome::success(format!("quotation {id} exported to {}", summary.path));
    CommandResult::reported("export", outcome, summary)
}
