//! Tabular reporting of store statistics.
//!
//! - [`StatsRow`]: one CSV record per store
//! - [`CsvReport`]: append/overwrite CSV output
//! - [`load_sample_urls`]: YAML list of stores to evaluate

mod csv_writer;
mod samples;

use serde::{Deserialize, Serialize};

use crate::stats::StoreStats;

pub use csv_writer::{CsvReport, WriteMode};
pub use samples::{load_sample_urls, parse_sample_urls};

/// Units for human-readable byte counts.
const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count with two decimals in the largest unit below 1024.
///
/// Values of 1024 TB and above stay in TB.
pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = UNITS[0];
    for (i, u) in UNITS.iter().enumerate() {
        unit = u;
        if value < 1024.0 || i == UNITS.len() - 1 {
            break;
        }
        value /= 1024.0;
    }
    format!("{:.2} {}", value, unit)
}

/// Comma-join a list for a CSV cell.
pub fn join_list<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// One CSV record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsRow {
    pub url: String,
    pub ome_zarr_kind: String,
    pub written: u64,
    pub written_human_readable: String,
    pub shape: String,
    pub shards: String,
    pub chunks: String,
    pub dimension_names: String,
    pub license: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "organismId")]
    pub organism_id: String,
    #[serde(rename = "fbbiId")]
    pub fbbi_id: String,
}

impl From<&StoreStats> for StatsRow {
    fn from(stats: &StoreStats) -> Self {
        let p = &stats.provenance;
        Self {
            url: stats.location.clone(),
            ome_zarr_kind: stats.kind.name().to_string(),
            written: stats.written,
            written_human_readable: format_bytes(stats.written),
            shape: join_list(stats.shape()),
            shards: join_list(stats.shards().unwrap_or(&[])),
            chunks: join_list(stats.chunks().unwrap_or(&[])),
            dimension_names: join_list(&stats.dimension_names),
            license: p.license.clone().unwrap_or_default(),
            name: p.name.clone().unwrap_or_default(),
            description: p.description.clone().unwrap_or_default(),
            organism_id: p.organism_id.clone().unwrap_or_default(),
            fbbi_id: p.fbbi_id.clone().unwrap_or_default(),
        }
    }
}
