use quotekit_core::config::LoadOptions;
use quotekit_core::{ApplicationError, Outcome, QuotationId};

use crate::commands::{load_config, open_store, CommandResult};

pub fn run(options: &LoadOptions, id: i64) -> CommandResult {
    let config = match load_config("show", options) {
        Ok(config) => config,
        Err(result) => return result,
    };

    let store = open_store(&config);
    let id = QuotationId(id);
    let found = store.find_by_id(id).ok_or(ApplicationError::UnknownQuotation(id));
    let outcome = Outcome::of(&found, |record| {
        format!("quotation {} for {}", record.id(), record.client().name)
    });
    CommandResult::reported("show", outcome, found.ok())
}
