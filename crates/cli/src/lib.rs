pub mod commands;
mod logging;
pub mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use quotekit_core::config::{AppConfig, ConfigOverrides, LoadOptions, StorageBackend};

use crate::commands::quote::QuoteRequest;

#[derive(Debug, Parser)]
#[command(
    name = "quotekit",
    about = "Quotekit audit quotation builder",
    long_about = "Browse the service catalog, build and save client quotations, and export them.",
    after_help = "Examples:\n  quotekit catalog --filter audit\n  quotekit quote --service 1 --service 3 --name \"Ana Ruiz\" --email ana@acme.test\n  quotekit export 1760000000000 --output exports"
)]
pub struct Cli {
    #[command(flatten)]
    config: ConfigArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct ConfigArgs {
    #[arg(long, global = true, value_name = "PATH", help = "Config file to load; must exist")]
    config: Option<PathBuf>,
    #[arg(long, global = true, value_name = "file|memory")]
    storage_backend: Option<StorageBackend>,
    #[arg(long, global = true, value_name = "DIR")]
    storage_dir: Option<PathBuf>,
    #[arg(long = "catalog", global = true, value_name = "PATH|URL")]
    catalog_source: Option<String>,
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,
}

impl ConfigArgs {
    fn into_load_options(self) -> LoadOptions {
        LoadOptions {
            require_file: self.config.is_some(),
            config_path: self.config,
            overrides: ConfigOverrides {
                storage_backend: self.storage_backend,
                storage_dir: self.storage_dir,
                catalog_source: self.catalog_source,
                log_level: self.log_level,
            },
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "List catalog services, optionally filtered by name")]
    Catalog {
        #[arg(long, help = "Case-insensitive substring of the service name")]
        filter: Option<String>,
    },
    #[command(about = "Build a quotation from catalog services and client details, then save it")]
    Quote {
        #[arg(long = "service", required = true, help = "Catalog service id; repeat to add more")]
        services: Vec<u64>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long, help = "Free-text notes, truncated to 500 characters")]
        observations: Option<String>,
        #[arg(long, value_name = "DIR", help = "Also export the quotation into this directory")]
        export: Option<PathBuf>,
    },
    #[command(about = "List saved quotations, newest first")]
    List,
    #[command(about = "Show one saved quotation")]
    Show { id: i64 },
    #[command(about = "Export a saved quotation as a text document")]
    Export {
        id: i64,
        #[arg(long, value_name = "DIR", default_value = ".")]
        output: PathBuf,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.config.into_load_options();

    let config = AppConfig::load(options.clone()).unwrap_or_default();
    logging::init_logging(&config);

    let result = match cli.command {
        Command::Catalog { filter } => commands::catalog::run(&options, filter.as_deref()),
        Command::Quote { services, name, email, company, phone, observations, export } => {
            commands::quote::run(
                &options,
                QuoteRequest {
                    services,
                    name,
                    email,
                    company,
                    phone,
                    observations,
                    export_dir: export,
                },
            )
        }
        Command::List => commands::list::run(&options),
        Command::Show { id } => commands::show::run(&options, id),
        Command::Export { id, output } => commands::export::run(&options, id, &output),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run(&options) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;
    use quotekit_core::config::StorageBackend;

    use super::Cli;

    #[test]
    fn global_flags_become_load_options() {
        let cli = Cli::parse_from([
            "quotekit",
            "list",
            "--config",
            "ops/quotekit.toml",
            "--storage-backend",
            "memory",
            "--catalog",
            "https://example.com/datos.json",
        ]);

        let options = cli.config.into_load_options();

        assert!(options.require_file);
        assert_eq!(options.config_path, Some(PathBuf::from("ops/quotekit.toml")));
        assert_eq!(options.overrides.storage_backend, Some(StorageBackend::Memory));
        assert_eq!(
            options.overrides.catalog_source.as_deref(),
            Some("https://example.com/datos.json")
        );
        assert_eq!(options.overrides.storage_dir, None);
    }
}
