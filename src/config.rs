//! Configuration management for ngff-stats.
//!
//! Options come from the command line, with environment variables as a
//! fallback and sensible defaults for everything else.
//!
//! # Example
//!
//! ```ignore
//! use ngff_stats::config::Config;
//!
//! let config = Config::parse();
//! println!("Reading {} into {}", config.input.display(), config.output.display());
//! ```
//!
//! # Environment Variables
//!
//! - `NGFF_STATS_INPUT` - YAML sample list (default: config.yaml)
//! - `NGFF_STATS_OUTPUT` - CSV report path (default: zarrs_metadata.csv)
//! - `NGFF_STATS_SAMPLE_WELLS` - Wells sampled per plate (default: 5)
//! - `NGFF_STATS_TIMEOUT_SECS` - Per-fetch timeout (default: 10)
//! - `NGFF_STATS_CONCURRENCY` - Stores evaluated at once (default: 1)

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::stats::{EngineOptions, TraversalMode, DEFAULT_SAMPLE_WELLS};

// =============================================================================
// Default Values
// =============================================================================

/// Default sample list.
pub const DEFAULT_INPUT: &str = "config.yaml";

/// Default CSV report path.
pub const DEFAULT_OUTPUT: &str = "zarrs_metadata.csv";

/// Default per-fetch timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default number of stores evaluated at once.
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Upper bound on concurrent store evaluations.
pub const MAX_CONCURRENCY: usize = 256;

// =============================================================================
// CLI Arguments
// =============================================================================

/// ngff-stats - Size and provenance inventory of OME-Zarr stores.
///
/// Reads store URLs from a YAML file, estimates the uncompressed size of each
/// store from its metadata alone, and writes one CSV row per store.
#[derive(Parser, Debug, Clone)]
#[command(name = "ngff-stats")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Input / Output
    // =========================================================================
    /// YAML file listing the stores to evaluate.
    #[arg(default_value = DEFAULT_INPUT, env = "NGFF_STATS_INPUT")]
    pub input: PathBuf,

    /// CSV report to write.
    #[arg(short, long, default_value = DEFAULT_OUTPUT, env = "NGFF_STATS_OUTPUT")]
    pub output: PathBuf,

    /// Rewrite the report instead of appending stores not yet listed.
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    // =========================================================================
    // Traversal
    // =========================================================================
    /// Read only the first resolution level and skip plate wells.
    ///
    /// Uses the precomputed written size recorded in the array attributes
    /// when available.
    #[arg(long, default_value_t = false)]
    pub flat: bool,

    /// Number of wells sampled per plate.
    #[arg(long, default_value_t = DEFAULT_SAMPLE_WELLS, env = "NGFF_STATS_SAMPLE_WELLS")]
    pub sample_wells: usize,

    // =========================================================================
    // Fetching
    // =========================================================================
    /// Timeout for each metadata fetch, in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, env = "NGFF_STATS_TIMEOUT_SECS")]
    pub timeout_secs: u64,

    /// Number of stores evaluated at once.
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY, env = "NGFF_STATS_CONCURRENCY")]
    pub concurrency: usize,

    // =========================================================================
    // Logging
    // =========================================================================
    /// Increase verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.output.as_os_str().is_empty() {
            return Err("Output path is required. Set --output or NGFF_STATS_OUTPUT".to_string());
        }

        if self.sample_wells == 0 {
            return Err("sample_wells must be greater than 0".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.concurrency == 0 || self.concurrency > MAX_CONCURRENCY {
            return Err(format!(
                "concurrency must be between 1 and {}",
                MAX_CONCURRENCY
            ));
        }

        Ok(())
    }

    /// Per-fetch timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn traversal_mode(&self) -> TraversalMode {
        if self.flat {
            TraversalMode::Flat
        } else {
            TraversalMode::Deep
        }
    }

    /// Engine options derived from the command line.
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            sample_wells: self.sample_wells,
            mode: self.traversal_mode(),
        }
    }

    /// Default log filter for the verbosity count.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "ngff_stats=warn",
            1 => "ngff_stats=info",
            _ => "ngff_stats=debug",
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
