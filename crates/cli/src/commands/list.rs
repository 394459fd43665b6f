use quotekit_core::config::LoadOptions;

use crate::commands::{load_config, open_store, CommandResult};

pub fn run(options: &LoadOptions) -> CommandResult {
    let config = match load_config("list", options) {
        Ok(config) => config,
        Err(result) => return result,
    };

    let store = open_store(&config);
    let summaries = store.summaries();
    CommandResult::success_with_data(
        "list",
        format!("{} saved quotations", summaries.len()),
        summaries,
    )
}
