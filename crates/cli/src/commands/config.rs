use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use quotekit_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use toml::Value;

pub fn run(options: &LoadOptions) -> String {
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path(options.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let overrides = &options.overrides;
    let source = |key_path: &str, env_keys: &[&str]| {
        if let Some(flag) = overriding_flag(overrides, key_path) {
            return format!("flag ({flag})");
        }
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let quota = config
        .storage
        .quota_bytes
        .map(|quota| quota.to_string())
        .unwrap_or_else(|| "<unlimited>".to_string());

    let lines = [
        "effective config (source precedence: flag > env > file > default):".to_string(),
        render_line(
            "storage.backend",
            &format!("{:?}", config.storage.backend),
            source("storage.backend", &["QUOTEKIT_STORAGE_BACKEND"]),
        ),
        render_line(
            "storage.dir",
            &config.storage.dir.display().to_string(),
            source("storage.dir", &["QUOTEKIT_STORAGE_DIR"]),
        ),
        render_line(
            "storage.quota_bytes",
            &quota,
            source("storage.quota_bytes", &["QUOTEKIT_STORAGE_QUOTA_BYTES"]),
        ),
        render_line(
            "catalog.source",
            &config.catalog.source,
            source("catalog.source", &["QUOTEKIT_CATALOG_SOURCE"]),
        ),
        render_line(
            "catalog.timeout_secs",
            &config.catalog.timeout_secs.to_string(),
            source("catalog.timeout_secs", &["QUOTEKIT_CATALOG_TIMEOUT_SECS"]),
        ),
        render_line(
            "logging.level",
            &config.logging.level,
            source("logging.level", &["QUOTEKIT_LOGGING_LEVEL", "QUOTEKIT_LOG_LEVEL"]),
        ),
        render_line(
            "logging.format",
            &format!("{:?}", config.logging.format),
            source("logging.format", &["QUOTEKIT_LOGGING_FORMAT", "QUOTEKIT_LOG_FORMAT"]),
        ),
    ];

    lines.join("\n")
}

fn detect_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }
    [PathBuf::from("quotekit.toml"), PathBuf::from("config/quotekit.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn overriding_flag(overrides: &ConfigOverrides, key_path: &str) -> Option<&'static str> {
    let (flag, set) = match key_path {
        "storage.backend" => ("--storage-backend", overrides.storage_backend.is_some()),
        "storage.dir" => ("--storage-dir", overrides.storage_dir.is_some()),
        "catalog.source" => ("--catalog", overrides.catalog_source.is_some()),
        "logging.level" => ("--log-level", overrides.log_level.is_some()),
        _ => return None,
    };
    set.then_some(flag)
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
