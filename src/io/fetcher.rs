//! The fetch boundary between document sources and the stats engine.
//!
//! Everything that can go wrong while fetching (transport failures,
//! timeouts, error statuses, malformed JSON, unexpected field types) is
//! logged here and turned into `None`. An empty JSON object is also `None`,
//! so callers cannot tell a missing document from an empty one.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::DocumentSource;
use crate::error::FetchError;

/// Typed, failure-absorbing access to a [`DocumentSource`].
pub struct DocumentFetcher<S> {
    source: S,
}

impl<S: DocumentSource> DocumentFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Get the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch and decode the JSON document at `location`.
    ///
    /// Returns `None` if the document is absent, empty, or unreadable.
    pub async fn json<T: DeserializeOwned>(&self, location: &str) -> Option<T> {
        debug!(location = %location, "Fetching JSON");

        let bytes = match self.source.fetch(location).await {
            Ok(bytes) => bytes,
            Err(err) => {
                log_fetch_error(self.source.identifier(), &err);
                return None;
            }
        };

        let value: Value = match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                log_fetch_error(
                    self.source.identifier(),
                    &FetchError::Parse {
                        location: location.to_string(),
                        message: e.to_string(),
                    },
                );
                return None;
            }
        };

        if value.as_object().is_some_and(|o| o.is_empty()) {
            debug!(location = %location, "Empty document");
            return None;
        }

        match serde_json::from_value(value) {
            Ok(doc) => Some(doc),
            Err(e) => {
                log_fetch_error(
                    self.source.identifier(),
                    &FetchError::Parse {
                        location: location.to_string(),
                        message: e.to_string(),
                    },
                );
                None
            }
        }
    }

    /// Whether a document exists at `location`. Errors count as absent.
    pub async fn exists(&self, location: &str) -> bool {
        match self.source.probe(location).await {
            Ok(found) => found,
            Err(err) => {
                log_fetch_error(self.source.identifier(), &err);
                false
            }
        }
    }
}

fn log_fetch_error(source: &str, err: &FetchError) {
    // Missing documents are routine (optional ro-crate, probe paths)
    if err.is_not_found() {
        debug!(source = source, "{}", err);
    } else {
        warn!(source = source, "Failed to load document: {}", err);
    }
}
