//! # ngff-stats
//!
//! Size and provenance inventory of OME-Zarr (NGFF) stores.
//!
//! This library estimates the uncompressed size of a Zarr v3 store from its
//! metadata documents alone. No array chunk is ever read. Alongside the size
//! it reports the store layout, a representative shape/chunk/shard geometry,
//! and licensing and biological provenance from an RO-Crate sidecar.
//!
//! ## Features
//!
//! - **Metadata only**: one small JSON fetch per node, never chunk data
//! - **Layout aware**: images, plates (sampled and extrapolated),
//!   bioformats2raw bundles, labels
//! - **Sharding aware**: reports inner chunks and outer shards separately
//! - **Pluggable sources**: HTTP(S) and local filesystem behind one trait
//!
//! ## Architecture
//!
//! - [`io`] - Document sources and the fail-soft fetch boundary
//! - [`mod@format`] - Zarr/OME metadata records, dtype and chunk analysis, layout classifier
//! - [`stats`] - Per-store evaluation engine
//! - [`report`] - CSV rows, human-readable sizes, sample list input
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use ngff_stats::{HttpSource, StatsEngine, StatsRow, DEFAULT_FETCH_TIMEOUT};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = StatsEngine::new(HttpSource::new(DEFAULT_FETCH_TIMEOUT)?);
//!     let stats = engine.evaluate("https://example.org/image.ome.zarr").await;
//!
//!     let row = StatsRow::from(&stats);
//!     println!("{} {} {}", row.url, row.ome_zarr_kind, row.written_human_readable);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod io;
pub mod report;
pub mod stats;

// Re-export commonly used types
pub use config::Config;
pub use error::{FetchError, ReportError, StatsError};
pub use format::{
    array_bytes, byte_width, detect_kind, element_count, shape_info, ArrayMetadata, ChunkLayout,
    OmeZarrKind, RootDocument, ShapeInfo,
};
pub use io::{
    DocumentFetcher, DocumentSource, FilesystemSource, HttpSource, RoutingSource,
    DEFAULT_FETCH_TIMEOUT,
};
pub use report::{format_bytes, join_list, load_sample_urls, CsvReport, StatsRow, WriteMode};
pub use stats::{EngineOptions, Provenance, StatsEngine, StoreStats, TraversalMode};
