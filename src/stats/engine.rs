//! Per-store orchestration.
//!
//! ```text
//!            root zarr.json
//!                  │
//!        ┌─────────┴──────────┐
//!        ▼                    ▼
//!   detect_kind        multiscales? ──► aggregate_multiscale
//!   (kind tag)         plate?       ──► estimate_plate
//!        │             bf2raw?      ──► bundle_stats
//!        │             otherwise    ──► nothing
//!        │                    │
//!        └─────────┬──────────┘
//!                  ▼
//!           load_provenance
//!                  ▼
//!              StoreStats
//! ```
//!
//! The kind tag and the aggregation branch are chosen independently and
//! use different priorities (plate outranks multiscales for the tag, not
//! for aggregation).

use tracing::{debug, error, info, warn};

use crate::format::{detect_kind, RootDocument};
use crate::io::{join_location, DocumentFetcher, DocumentSource};

use super::multiscale::{aggregate_multiscale, first_level_stats};
use super::plate::{estimate_plate, DEFAULT_SAMPLE_WELLS};
use super::provenance::load_provenance;
use super::series::bundle_stats;
use super::summary::{ImageStats, StoreStats};
use super::ZARR_JSON;

// =============================================================================
// Options
// =============================================================================

/// How deep the engine walks a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalMode {
    /// Visit every resolution level, sample plate wells, resolve bundles
    #[default]
    Deep,

    /// Read only the first resolution level and skip plate wells
    Flat,
}

/// Tunable parameters of a store evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Wells sampled per plate
    pub sample_wells: usize,

    pub mode: TraversalMode,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            sample_wells: DEFAULT_SAMPLE_WELLS,
            mode: TraversalMode::Deep,
        }
    }
}

// =============================================================================
// StatsEngine
// =============================================================================

/// Evaluates stores one at a time.
///
/// Fetches within one evaluation run strictly in order. Evaluations share
/// no mutable state, so independent stores may be evaluated concurrently
/// through `&self`.
pub struct StatsEngine<S> {
    fetcher: DocumentFetcher<S>,
    options: EngineOptions,
}

impl<S: DocumentSource> StatsEngine<S> {
    /// Create an engine with default options.
    pub fn new(source: S) -> Self {
        Self::with_options(source, EngineOptions::default())
    }

    pub fn with_options(source: S, options: EngineOptions) -> Self {
        Self {
            fetcher: DocumentFetcher::new(source),
            options,
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Get the underlying document source.
    pub fn source(&self) -> &S {
        self.fetcher.source()
    }

    /// Evaluate the store at `location`.
    ///
    /// Never fails: unreachable or malformed documents yield zero bytes and
    /// empty fields.
    pub async fn evaluate(&self, location: &str) -> StoreStats {
        info!("Loading Zarr: {}", location);

        let root = match self
            .fetcher
            .json::<RootDocument>(&join_location(location, ZARR_JSON))
            .await
        {
            Some(root) => root,
            None => {
                error!("No zarr.json found at {}", location);
                RootDocument::default()
            }
        };

        let kind = detect_kind(&root);
        let image = self.aggregate(location, &root).await;
        let provenance = load_provenance(&self.fetcher, location).await;

        debug!(
            kind = %kind,
            written = image.written,
            provenance_found = provenance.found,
            "Evaluated {}",
            location
        );

        StoreStats {
            location: location.to_string(),
            kind,
            written: image.written,
            representative: image.representative,
            dimension_names: image.dimension_names,
            provenance,
        }
    }

    /// Run the one aggregation branch the root's markers select.
    async fn aggregate(&self, location: &str, root: &RootDocument) -> ImageStats {
        let ome = root.ome();
        debug!(
            multiscales = ome.has_multiscales(),
            plate = ome.is_plate(),
            bf2raw = ome.is_bioformats2raw(),
            "Detected structure"
        );

        if let Some(multiscale) = root.first_multiscale() {
            debug!("Using multiscales data");
            return match self.options.mode {
                TraversalMode::Deep => {
                    aggregate_multiscale(&self.fetcher, location, multiscale).await
                }
                TraversalMode::Flat => first_level_stats(&self.fetcher, location, multiscale).await,
            };
        }

        if let Some(plate) = ome.plate_descriptor() {
            return match self.options.mode {
                TraversalMode::Deep => {
                    debug!("Using plate data");
                    estimate_plate(&self.fetcher, location, &plate, self.options.sample_wells).await
                }
                TraversalMode::Flat => {
                    debug!("Flat mode, not descending into plate wells");
                    ImageStats::default()
                }
            };
        }

        if ome.is_bioformats2raw() {
            debug!("Using bioformats2raw layout");
            return bundle_stats(&self.fetcher, location).await;
        }

        warn!("No recognized OME structure found in zarr.json at {}", location);
        ImageStats::default()
    }
}
