use std::path::{Path, PathBuf};

use chrono::Local;
use quotekit_core::config::LoadOptions;
use quotekit_core::{format_amount, ClientProfile, Outcome, QuotationId, QuoteBuilder, ServiceId};
use quotekit_storage::catalog_source_for;
use serde::Serialize;

use crate::commands::{current_thread_runtime, load_config, open_store, CommandResult};
use crate::render::QuotationRenderer;

#[derive(Clone, Debug, Default)]
pub struct QuoteRequest {
    pub services: Vec<u64>,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub observations: Option<String>,
    pub export_dir: Option<PathBuf>,
}

impl QuoteRequest {
    fn client(&self) -> ClientProfile {
        let mut client = ClientProfile::new(self.name.clone(), self.email.clone());
        if let Some(company) = &self.company {
            client = client.with_company(company.clone());
        }
        if let Some(phone) = &self.phone {
            client = client.with_phone(phone.clone());
        }
        if let Some(observations) = &self.observations {
            client = client.with_observations(observations.clone());
        }
        client
    }
}

#[derive(Debug, Serialize)]
struct SavedQuotation {
    id: QuotationId,
    lines: usize,
    subtotal: String,
    tax: String,
    total: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    exported_to: Option<String>,
}

pub fn run(options: &LoadOptions, request: QuoteRequest) -> CommandResult {
    let config = match load_config("quote", options) {
        Ok(config) => config,
        Err(result) => return result,
    };
    let runtime = match current_thread_runtime("quote") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let mut builder = QuoteBuilder::new(open_store(&config));
    let source = catalog_source_for(&config.catalog);
    if let Err(error) = runtime.block_on(builder.load_catalog(&*source)) {
        return CommandResult::rejected("quote", error);
    }

    for id in &request.services {
        if let Err(error) = builder.add_service(ServiceId(*id)) {
            return CommandResult::rejected("quote", error);
        }
    }

    if let Err(error) = builder.set_client(request.client()) {
        return CommandResult::rejected("quote", error);
    }

    let saved = builder.save_quotation();
    let outcome = Outcome::of(&saved, |id| format!("quotation {id} saved"));
    let Ok(id) = saved else {
        return CommandResult::reported("quote", outcome, ());
    };

    let exported_to = match &request.export_dir {
        Some(dir) => match export_live(&builder, dir) {
            Ok(path) => Some(path.display().to_string()),
            Err(error) => {
                return CommandResult::failure(
                    "quote",
                    "export_write",
                    format!("quotation {id} was saved but could not be exported: {error:#}"),
                    9,
                );
            }
        },
        None => None,
    };

    let totals = match builder.totals() {
        Ok(totals) => totals,
        Err(error) => return CommandResult::rejected("quote", error),
    };
    CommandResult::reported(
        "quote",
        outcome,
        SavedQuotation {
            id,
            lines: builder.cart().len(),
            subtotal: format_amount(totals.subtotal),
            tax: format_amount(totals.tax),
            total: format_amount(totals.total),
            exported_to,
        },
    )
}

fn export_live(builder: &QuoteBuilder, dir: &Path) -> anyhow::Result<PathBuf> {
    let document = builder.export_quotation(Local::now().date_naive())?;
    QuotationRenderer::new()?.write_to(&document, dir)
}
