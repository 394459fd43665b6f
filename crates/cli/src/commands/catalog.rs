use quotekit_core::config::LoadOptions;
use quotekit_core::{ApplicationError, Catalog, Outcome, Service};
use quotekit_storage::catalog_source_for;
use serde::Serialize;

use crate::commands::{current_thread_runtime, load_config, CommandResult};

#[derive(Debug, Serialize)]
struct CatalogListing {
    source: String,
    total: usize,
    matched: usize,
    services: Vec<Service>,
}

pub fn run(options: &LoadOptions, filter: Option<&str>) -> CommandResult {
    let config = match load_config("catalog", options) {
        Ok(config) => config,
        Err(result) => return result,
    };
    let runtime = match current_thread_runtime("catalog") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let source = catalog_source_for(&config.catalog);
    let loaded = runtime.block_on(Catalog::load(&*source)).map_err(ApplicationError::from);
    let listing = loaded.as_ref().ok().map(|catalog| {
        let services =
            catalog.filter(filter.unwrap_or_default()).into_iter().cloned().collect::<Vec<_>>();
        CatalogListing {
            source: source.describe(),
            total: catalog.len(),
            matched: services.len(),
            services,
        }
    });

    let outcome = Outcome::of(&loaded, |catalog| {
        let matched = listing.as_ref().map_or(0, |listing| listing.matched);
        format!("{matched} of {} services", catalog.len())
    });
    CommandResult::reported("catalog", outcome, listing)
}
