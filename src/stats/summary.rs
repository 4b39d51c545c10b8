use crate::format::{OmeZarrKind, ShapeInfo};

use super::provenance::Provenance;

/// Size and representative geometry of one image (or an extrapolated plate).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageStats {
    /// Total uncompressed bytes across all counted arrays
    pub written: u64,

    /// Shape and chunk layout of the representative array
    pub representative: Option<ShapeInfo>,

    /// Dimension names of the last array processed
    pub dimension_names: Vec<String>,
}

/// Result of evaluating one store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    /// Store location as given by the caller
    pub location: String,

    /// Kind assigned by the layout classifier
    pub kind: OmeZarrKind,

    /// Total (or extrapolated) uncompressed bytes
    pub written: u64,

    pub representative: Option<ShapeInfo>,

    pub dimension_names: Vec<String>,

    pub provenance: Provenance,
}

impl StoreStats {
    /// Shape of the representative array, empty if unknown.
    pub fn shape(&self) -> &[u64] {
        self.representative
            .as_ref()
            .map(|r| r.shape.as_slice())
            .unwrap_or(&[])
    }

    /// Chunk shape of the representative array.
    pub fn chunks(&self) -> Option<&[u64]> {
        self.representative.as_ref().and_then(|r| r.layout.chunks())
    }

    /// Shard shape of the representative array, present only when sharded.
    pub fn shards(&self) -> Option<&[u64]> {
        self.representative.as_ref().and_then(|r| r.layout.shards())
    }
}
