//! Test utilities for integration tests.
//!
//! This module provides a tracking in-memory document source and helpers
//! for building OME-Zarr metadata documents.

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use ngff_stats::error::FetchError;
use ngff_stats::io::DocumentSource;

// =============================================================================
// Mock Document Source with Request Tracking
// =============================================================================

/// A mock document source that records every fetch and probe, in order.
///
/// Clones share their tracking state.
#[derive(Clone, Default)]
pub struct TrackingMockSource {
    documents: Arc<HashMap<String, Bytes>>,
    failing: Arc<HashMap<String, FetchError>>,
    request_count: Arc<AtomicUsize>,
    requests: Arc<RwLock<Vec<String>>>,
}

impl TrackingMockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `doc` as JSON at `location`.
    pub fn with_json(self, location: impl Into<String>, doc: Value) -> Self {
        self.with_bytes(location, doc.to_string().into_bytes())
    }

    pub fn with_bytes(mut self, location: impl Into<String>, data: Vec<u8>) -> Self {
        Arc::make_mut(&mut self.documents).insert(location.into(), Bytes::from(data));
        self
    }

    /// Answer requests for `location` with `err`.
    pub fn with_failure(mut self, location: impl Into<String>, err: FetchError) -> Self {
        Arc::make_mut(&mut self.failing).insert(location.into(), err);
        self
    }

    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    pub async fn get_requests(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }

    /// Whether any request touched a location starting with `prefix`.
    pub async fn requested_prefix(&self, prefix: &str) -> bool {
        self.requests
            .read()
            .await
            .iter()
            .any(|r| r.starts_with(prefix))
    }

    async fn track(&self, location: &str) {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.write().await.push(location.to_string());
    }
}

#[async_trait]
impl DocumentSource for TrackingMockSource {
    async fn fetch(&self, location: &str) -> Result<Bytes, FetchError> {
        self.track(location).await;

        if let Some(err) = self.failing.get(location) {
            return Err(err.clone());
        }
        self.documents
            .get(location)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(location.to_string()))
    }

    async fn probe(&self, location: &str) -> Result<bool, FetchError> {
        self.track(location).await;

        if let Some(err) = self.failing.get(location) {
            return Err(err.clone());
        }
        Ok(self.documents.contains_key(location))
    }

    fn identifier(&self) -> &str {
        "tracking-mock"
    }
}

// =============================================================================
// Document Builders
// =============================================================================

/// Root of an image group with one multiscale over `paths`.
pub fn image_root(paths: &[&str]) -> Value {
    let datasets: Vec<Value> = paths.iter().map(|p| json!({"path": p})).collect();
    json!({
        "zarr_format": 3,
        "node_type": "group",
        "attributes": {"ome": {"version": "0.5", "multiscales": [{"datasets": datasets}]}}
    })
}

/// Root of a plate group.
pub fn plate_root(wells: &[&str], field_count: Option<u64>) -> Value {
    let wells: Vec<Value> = wells.iter().map(|w| json!({"path": w})).collect();
    let mut plate = json!({"wells": wells});
    if let Some(n) = field_count {
        plate["field_count"] = json!(n);
    }
    json!({
        "zarr_format": 3,
        "node_type": "group",
        "attributes": {"ome": {"version": "0.5", "plate": plate}}
    })
}

/// Array metadata with a regular chunk grid.
pub fn array_doc(shape: &[u64], dtype: &str, chunks: &[u64]) -> Value {
    json!({
        "zarr_format": 3,
        "node_type": "array",
        "shape": shape,
        "data_type": dtype,
        "chunk_grid": {"name": "regular", "configuration": {"chunk_shape": chunks}},
        "codecs": [{"name": "bytes", "configuration": {"endian": "little"}}]
    })
}

/// Array metadata whose outer grid is sharded into `inner` sub-chunks.
pub fn sharded_array_doc(shape: &[u64], dtype: &str, shards: &[u64], inner: &[u64]) -> Value {
    json!({
        "zarr_format": 3,
        "node_type": "array",
        "shape": shape,
        "data_type": dtype,
        "chunk_grid": {"name": "regular", "configuration": {"chunk_shape": shards}},
        "codecs": [{
            "name": "sharding_indexed",
            "configuration": {
                "chunk_shape": inner,
                "codecs": [{"name": "bytes"}],
                "index_codecs": [{"name": "bytes"}, {"name": "crc32c"}]
            }
        }]
    })
}

/// RO-Crate document with a dataset entry and typed biosample/acquisition items.
pub fn ro_crate(license: &str, organism: &str, fbbi: &str) -> Value {
    json!({
        "@context": "https://w3id.org/ro/crate/1.1/context",
        "@graph": [
            {"@id": "ro-crate-metadata.json", "@type": "CreativeWork"},
            {
                "@id": "./",
                "@type": "Dataset",
                "name": "Test dataset",
                "description": "A small test image",
                "license": license
            },
            {
                "@id": "#sample",
                "@type": "biosample",
                "organism_classification": {"@id": organism}
            },
            {
                "@id": "#acquisition",
                "@type": "image_acquisition",
                "fbbi_id": {"@id": fbbi}
            }
        ]
    })
}

// =============================================================================
// Filesystem Helpers
// =============================================================================

/// Write `docs` (relative path, JSON) below `root`, creating directories.
pub fn write_store(root: &Path, docs: &[(&str, Value)]) {
    for (path, doc) in docs {
        let file = root.join(path);
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(file, doc.to_string()).unwrap();
    }
}
