use async_trait::async_trait;
use bytes::Bytes;

use super::source::is_http_location;
use super::{DocumentSource, FilesystemSource, HttpSource};
use crate::error::FetchError;

/// Source that sends `http(s)://` locations over HTTP and everything else
/// to the local filesystem.
#[derive(Clone)]
pub struct RoutingSource {
    http: HttpSource,
    fs: FilesystemSource,
}

impl RoutingSource {
    pub fn new(http: HttpSource, fs: FilesystemSource) -> Self {
        Self { http, fs }
    }

    fn route(&self, location: &str) -> &dyn DocumentSource {
        if is_http_location(location) {
            &self.http
        } else {
            &self.fs
        }
    }
}

#[async_trait]
impl DocumentSource for RoutingSource {
    async fn fetch(&self, location: &str) -> Result<Bytes, FetchError> {
        self.route(location).fetch(location).await
    }

    async fn probe(&self, location: &str) -> Result<bool, FetchError> {
        self.route(location).probe(location).await
    }

    fn identifier(&self) -> &str {
        "routing"
    }
}
