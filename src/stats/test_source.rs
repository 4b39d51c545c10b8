//! In-memory document source for unit tests.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use crate::error::FetchError;
use crate::io::DocumentSource;

/// Serves JSON documents from a map and plain files from a set of paths.
#[derive(Default)]
pub struct JsonSource {
    docs: HashMap<String, Value>,
    files: Vec<String>,
}

impl JsonSource {
    pub fn with(mut self, location: &str, doc: Value) -> Self {
        self.docs.insert(location.to_string(), doc);
        self
    }

    pub fn with_file(mut self, location: &str) -> Self {
        self.files.push(location.to_string());
        self
    }
}

#[async_trait]
impl DocumentSource for JsonSource {
    async fn fetch(&self, location: &str) -> Result<Bytes, FetchError> {
        self.docs
            .get(location)
            .map(|v| Bytes::from(v.to_string()))
            .ok_or_else(|| FetchError::NotFound(location.to_string()))
    }

    async fn probe(&self, location: &str) -> Result<bool, FetchError> {
        Ok(self.docs.contains_key(location) || self.files.iter().any(|f| f == location))
    }

    fn identifier(&self) -> &str {
        "json"
    }
}
