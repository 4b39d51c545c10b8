//! Layout classification for OME-Zarr root documents.
//!
//! The classifier looks only at the root `zarr.json` and assigns one kind:
//!
//! - **Plate**: HCS plate (`ome.plate`)
//! - **Well**: a single well of a plate (`ome.well`)
//! - **bioformats2raw**: multi-series bundle (`ome["bioformats2raw.layout"]`)
//! - **Image with multiscales**: `ome.multiscales`
//! - **Label**: `image-label` attribute, or a `labels` listing without multiscales
//! - **Image without multiscales**: everything else
//!
//! The kind is reported as-is and is not used to pick the size estimation
//! path, so the two can disagree for roots carrying several markers.

use std::fmt;

use super::metadata::{is_truthy, RootDocument};

// =============================================================================
// OmeZarrKind
// =============================================================================

/// Structural kind of an OME-Zarr root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OmeZarrKind {
    Plate,
    Well,
    Bioformats2Raw,
    ImageWithMultiscales,
    Label,
    #[default]
    ImageNoMultiscales,
}

impl OmeZarrKind {
    /// Tag used in reports.
    pub const fn name(&self) -> &'static str {
        match self {
            OmeZarrKind::Plate => "plate",
            OmeZarrKind::Well => "well",
            OmeZarrKind::Bioformats2Raw => "bioformats2raw",
            OmeZarrKind::ImageWithMultiscales => "image_with_multiscales",
            OmeZarrKind::Label => "label",
            OmeZarrKind::ImageNoMultiscales => "image_no_multiscales",
        }
    }
}

impl fmt::Display for OmeZarrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Detection
// =============================================================================

/// Classify a root document. First match wins:
///
/// 1. plate
/// 2. well
/// 3. bioformats2raw layout
/// 4. multiscales
/// 5. label markers
/// 6. anything else, including array roots
pub fn detect_kind(root: &RootDocument) -> OmeZarrKind {
    let ome = root.ome();
    let attrs = &root.attributes;

    if ome.is_plate() {
        return OmeZarrKind::Plate;
    }
    if ome.is_well() {
        return OmeZarrKind::Well;
    }
    if ome.is_bioformats2raw() {
        return OmeZarrKind::Bioformats2Raw;
    }

    let has_multiscales = ome.has_multiscales();
    if has_multiscales {
        return OmeZarrKind::ImageWithMultiscales;
    }

    // Key presence, so `"image-label": null` still counts
    if attrs.image_label.is_some() {
        return OmeZarrKind::Label;
    }
    if attrs.labels.as_ref().is_some_and(is_truthy) && !has_multiscales {
        return OmeZarrKind::Label;
    }

    // Bare arrays and unmarked groups alike
    OmeZarrKind::ImageNoMultiscales
}

// =============================================================================
// Tests
// =============================================================================
