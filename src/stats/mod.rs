//! Size estimation and metadata collection for OME-Zarr stores.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              StatsEngine                │
//! │   (one ordered chain of fetches/store)  │
//! └────────────────────┬────────────────────┘
//!                      │
//!     ┌────────────────┼────────────────┐
//!     ▼                ▼                ▼
//! ┌─────────┐   ┌─────────────┐   ┌────────────┐
//! │  plate  │   │   series    │   │ provenance │
//! └────┬────┘   └──────┬──────┘   └────────────┘
//!      └───────┬───────┘
//!              ▼
//!      ┌──────────────┐
//!      │  multiscale  │
//!      └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use ngff_stats::io::HttpSource;
//! use ngff_stats::stats::StatsEngine;
//!
//! let engine = StatsEngine::new(HttpSource::new(timeout)?);
//! let stats = engine.evaluate("https://example.org/image.zarr").await;
//! println!("{} {}", stats.kind, stats.written);
//! ```

mod engine;
mod multiscale;
mod plate;
mod provenance;
mod series;
mod summary;

#[cfg(test)]
mod test_source;

/// Metadata document name of every Zarr v3 node.
pub const ZARR_JSON: &str = "zarr.json";

pub use engine::{EngineOptions, StatsEngine, TraversalMode};
pub use multiscale::{aggregate_multiscale, first_level_stats};
pub use plate::{estimate_plate, extrapolate, image_count, DEFAULT_SAMPLE_WELLS};
pub use provenance::{load_provenance, merge_graph, Provenance, RO_CRATE_JSON};
pub use series::{bundle_stats, resolve_series};
pub use summary::{ImageStats, StoreStats};
