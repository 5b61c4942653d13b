//! Shader source loading.
//!
//! The vertex and fragment sources are fetched concurrently through a
//! [`SourceFetcher`] and joined: the continuation runs once, after both
//! bodies have arrived, whichever finishes first. A failed fetch is logged
//! and returned; the continuation never runs in that case.

use std::future::Future;
use std::path::PathBuf;

use futures_util::future::try_join;
use thiserror::Error;

/// Request headers that disable caching for HTTP transports.
pub const NO_CACHE_HEADERS: [(&str, &str); 2] =
    [("Pragma", "no-cache"), ("Cache-Control", "no-cache")];

/// Errors raised while fetching shader sources.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    /// The resource could not be read or requested.
    #[error("failed to fetch '{path}': {reason}")]
    Fetch { path: String, reason: String },

    /// The server answered with a non-success status.
    #[error("failed to fetch '{path}': HTTP status {status}")]
    Status { path: String, status: u16 },
}

/// Vertex and fragment shader source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

/// Retrieves a text resource by locator, without blocking the caller.
///
/// Implementations must not serve cached bodies: shader files are edited
/// while the page is open.
pub trait SourceFetcher {
    fn fetch(&self, path: &str) -> impl Future<Output = Result<String, LoadError>>;
}

/// Reads shader files from the local filesystem, relative to `root`.
///
/// Reads are synchronous: `fetch` blocks the calling thread until the file
/// is read, so it suits executors without a reactor (tests, `pollster`).
/// Hosts running on an async runtime should read through the runtime's own
/// file API instead.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for FileFetcher {
    /// Resolves paths against the current working directory.
    fn default() -> Self {
        Self::new(".")
    }
}

impl SourceFetcher for FileFetcher {
    async fn fetch(&self, path: &str) -> Result<String, LoadError> {
        std::fs::read_to_string(self.root.join(path)).map_err(|e| LoadError::Fetch {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Fetches both shader sources concurrently.
///
/// # Errors
///
/// Returns the first `LoadError` reported by either fetch. No retry.
pub async fn load_shader_source<F: SourceFetcher>(
    fetcher: &F,
    vertex_path: &str,
    fragment_path: &str,
) -> Result<ShaderSource, LoadError> {
    let (vertex, fragment) = try_join(fetcher.fetch(vertex_path), fetcher.fetch(fragment_path))
        .await
        .map_err(|e| {
            log::error!("{e}");
            e
        })?;
    log::info!("loaded {vertex_path} {fragment_path}");
    Ok(ShaderSource { vertex, fragment })
}

/// Fetches both shader sources, then hands them to `continuation`.
///
/// `continuation` runs at most once: exactly once when both fetches succeed,
/// never when either fails.
///
/// # Errors
///
/// Returns the `LoadError` of a failed fetch.
pub async fn load_shader_source_then<F, K, T>(
    fetcher: &F,
    vertex_path: &str,
    fragment_path: &str,
    continuation: K,
) -> Result<T, LoadError>
where
    F: SourceFetcher,
    K: FnOnce(ShaderSource) -> T,
{
    let source = load_shader_source(fetcher, vertex_path, fragment_path).await?;
    Ok(continuation(source))
}
