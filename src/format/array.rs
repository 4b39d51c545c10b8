//! Chunk/shard geometry and byte-size arithmetic for a single array.
//!
//! Sizes are computed from metadata only: `byte_width(dtype) * ∏ shape`.
//! Compression is ignored, so the result is the uncompressed footprint.

use crate::error::StatsError;

use super::metadata::ArrayMetadata;

/// Codec name that marks a sharded array.
pub const SHARDING_CODEC: &str = "sharding_indexed";

/// Literal widths tried, in order, when a data type carries no bit count.
const FALLBACK_WIDTHS: [u64; 4] = [1, 2, 4, 8];

// =============================================================================
// Chunk Layout
// =============================================================================

/// How an array partitions its shape.
///
/// Metadata describes either a legacy direct chunk shape or a chunk grid
/// (optionally sharded); the two are never mixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkLayout {
    /// Legacy `chunks` key
    Legacy { chunks: Vec<u64> },

    /// `chunk_grid` configuration, with the sharding codec's inner shape
    /// as `chunks` and the grid shape as `shards` when sharded
    Grid {
        chunks: Option<Vec<u64>>,
        shards: Option<Vec<u64>>,
    },
}

impl ChunkLayout {
    /// Chunk shape, if known.
    pub fn chunks(&self) -> Option<&[u64]> {
        match self {
            ChunkLayout::Legacy { chunks } => Some(chunks),
            ChunkLayout::Grid { chunks, .. } => chunks.as_deref(),
        }
    }

    /// Shard shape, present only for sharded arrays.
    pub fn shards(&self) -> Option<&[u64]> {
        match self {
            ChunkLayout::Legacy { .. } => None,
            ChunkLayout::Grid { shards, .. } => shards.as_deref(),
        }
    }
}

/// Shape and chunk layout of one array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeInfo {
    pub shape: Vec<u64>,
    pub layout: ChunkLayout,
}

/// Extract shape, chunks and shards from array metadata.
pub fn shape_info(array: &ArrayMetadata) -> ShapeInfo {
    if let Some(chunks) = &array.chunks {
        return ShapeInfo {
            shape: array.shape.clone(),
            layout: ChunkLayout::Legacy {
                chunks: chunks.clone(),
            },
        };
    }

    let grid_shape = array
        .chunk_grid
        .as_ref()
        .and_then(|g| g.configuration.as_ref())
        .and_then(|c| c.chunk_shape.clone());

    let inner_shape = array
        .codecs
        .iter()
        .find(|codec| codec.name == SHARDING_CODEC)
        .and_then(|codec| codec.configuration.as_ref())
        .and_then(|c| c.chunk_shape.clone());

    let layout = match inner_shape {
        Some(inner) => ChunkLayout::Grid {
            chunks: Some(inner),
            shards: grid_shape,
        },
        None => ChunkLayout::Grid {
            chunks: grid_shape,
            shards: None,
        },
    };

    ShapeInfo {
        shape: array.shape.clone(),
        layout,
    }
}

// =============================================================================
// Byte Arithmetic
// =============================================================================

/// Bytes per element for a data type name.
///
/// Names containing `int` or `float` use their first digit run as a bit
/// count (`uint16` → 2, `bfloat16` → 2). NumPy-style type strings (`u1`,
/// `<i2`, `f8`) and bit-less names are resolved by scanning for the literal
/// widths 1, 2, 4, 8 in that order.
pub fn byte_width(dtype: &str) -> Result<u64, StatsError> {
    let unsupported = || StatsError::UnsupportedDtype {
        dtype: dtype.to_string(),
    };

    if dtype.contains("int") || dtype.contains("float") {
        return match first_digit_run(dtype) {
            Some(bits) => Ok(bits / 8),
            None => fallback_width(dtype).ok_or_else(unsupported),
        };
    }

    if is_numpy_typestr(dtype) {
        return fallback_width(dtype).ok_or_else(unsupported);
    }

    Err(unsupported())
}

/// Number of elements in an array of the given shape.
pub fn element_count(shape: &[u64]) -> u64 {
    shape.iter().fold(1u64, |acc, &n| acc.saturating_mul(n))
}

/// Uncompressed byte size of an array.
pub fn array_bytes(array: &ArrayMetadata) -> Result<u64, StatsError> {
    let dtype = array.data_type.as_ref().ok_or(StatsError::MissingDtype)?;
    let width = byte_width(dtype.as_str())?;
    Ok(width.saturating_mul(element_count(&array.shape)))
}

fn first_digit_run(s: &str) -> Option<u64> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let digits: String = s[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn fallback_width(s: &str) -> Option<u64> {
    FALLBACK_WIDTHS
        .iter()
        .copied()
        .find(|n| s.contains(&n.to_string()))
}

/// `[<>|=]?[iuf]<digits>`, e.g. `u1`, `<i2`, `>f8`.
fn is_numpy_typestr(s: &str) -> bool {
    let s = s.trim_start_matches(['<', '>', '|', '=']);
    let mut chars = s.chars();
    match chars.next() {
        Some('i' | 'u' | 'f') => {}
        _ => return false,
    }
    let rest = chars.as_str();
    !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit())
}
