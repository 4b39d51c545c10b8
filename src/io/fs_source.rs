use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use super::http_source::DEFAULT_FETCH_TIMEOUT;
use super::DocumentSource;
use crate::error::FetchError;

/// Local filesystem implementation of DocumentSource.
///
/// Locations are plain paths, optionally written as `file://` URLs.
#[derive(Debug, Clone)]
pub struct FilesystemSource {
    timeout: Duration,
}

impl FilesystemSource {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn path(location: &str) -> PathBuf {
        PathBuf::from(location.strip_prefix("file://").unwrap_or(location))
    }
}

impl Default for FilesystemSource {
    fn default() -> Self {
        Self::new(DEFAULT_FETCH_TIMEOUT)
    }
}

fn map_io_error(location: &str, err: std::io::Error) -> FetchError {
    match err.kind() {
        ErrorKind::NotFound => FetchError::NotFound(location.to_string()),
        _ => FetchError::Transport(format!("{}: {}", location, err)),
    }
}

#[async_trait]
impl DocumentSource for FilesystemSource {
    async fn fetch(&self, location: &str) -> Result<Bytes, FetchError> {
        let path = Self::path(location);
        let read = tokio::time::timeout(self.timeout, tokio::fs::read(path))
            .await
            .map_err(|_| FetchError::Timeout(location.to_string()))?;
        read.map(Bytes::from)
            .map_err(|e| map_io_error(location, e))
    }

    async fn probe(&self, location: &str) -> Result<bool, FetchError> {
        match tokio::fs::metadata(Self::path(location)).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(map_io_error(location, e)),
        }
    }

    fn identifier(&self) -> &str {
        "filesystem"
    }
}
