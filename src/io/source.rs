use async_trait::async_trait;
use bytes::Bytes;

use crate::error::FetchError;

/// Trait for fetching whole documents from a store location.
///
/// This abstraction lets the stats engine walk a store without knowing
/// whether it lives behind HTTP, on a local disk, or in memory.
/// Implementations must be thread-safe.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch the complete document at `location`.
    ///
    /// Returns [`FetchError::NotFound`] when nothing exists there.
    async fn fetch(&self, location: &str) -> Result<Bytes, FetchError>;

    /// Check whether a document exists at `location` without decoding it.
    async fn probe(&self, location: &str) -> Result<bool, FetchError>;

    /// Get a short identifier for this source (for logging).
    fn identifier(&self) -> &str;
}

/// Join a relative path onto a store location with a single `/`.
pub fn join_location(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

/// Whether a location should be fetched over HTTP.
pub fn is_http_location(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}
