//! Shader fetching for the CLI: HTTP(S) URLs through `reqwest`, anything
//! else from disk through `tokio::fs`.

use std::path::PathBuf;
use std::time::Duration;

use first_triangle_core::loader::NO_CACHE_HEADERS;
use first_triangle_core::{LoadError, SourceFetcher};

use crate::error::CliError;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Returns `true` if `path` should be requested over HTTP.
pub fn is_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

pub struct HttpFetcher {
    client: reqwest::Client,
    root: PathBuf,
}

impl HttpFetcher {
    /// Builds a fetcher that resolves non-URL paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, CliError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| CliError::Io(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            root: root.into(),
        })
    }
}

impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<String, LoadError> {
        if !is_url(path) {
            return tokio::fs::read_to_string(self.root.join(path))
                .await
                .map_err(|e| LoadError::Fetch {
                    path: path.to_string(),
                    reason: e.to_string(),
                });
        }

        let fail = |e: reqwest::Error| LoadError::Fetch {
            path: path.to_string(),
            reason: e.to_string(),
        };

        let mut request = self.client.get(path);
        for (name, value) in NO_CACHE_HEADERS {
            request = request.header(name, value);
        }
        let response = request.send().await.map_err(fail)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        log::debug!("GET {path} -> {status}");
        response.text().await.map_err(fail)
    }
}
