use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use quotekit_core::config::CatalogConfig;
use quotekit_core::{CatalogSource, LoadError};

#[derive(Clone, Debug)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<String, LoadError> {
        tokio::fs::read_to_string(&self.path).await.map_err(|error| LoadError::Unreachable {
            origin: self.describe(),
            message: error.to_string(),
        })
    }
}

#[derive(Clone, Debug)]
pub struct HttpCatalogSource {
    url: String,
    timeout: Duration,
}

impl HttpCatalogSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self { url: url.into(), timeout }
    }

    fn unreachable(&self, error: impl ToString) -> LoadError {
        LoadError::Unreachable { origin: self.url.clone(), message: error.to_string() }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<String, LoadError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|error| self.unreachable(error))?;

        let response = client
            .get(&self.url)
            .send()
            .await
            .map_err(|error| self.unreachable(error))?
            .error_for_status()
            .map_err(|error| self.unreachable(error))?;

        response.text().await.map_err(|error| self.unreachable(error))
    }
}

/// `http://` and `https://` sources are fetched over the network; anything else is a path.
pub fn catalog_source_for(config: &CatalogConfig) -> Box<dyn CatalogSource> {
    let source = config.source.trim();
    if source.starts_with("http://") || source.starts_with("https://") {
        Box::new(HttpCatalogSource::new(source, Duration::from_secs(config.timeout_secs)))
    } else {
        Box::new(FileCatalogSource::new(source))
    }
}
