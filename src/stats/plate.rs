//! Size extrapolation for HCS plates.
//!
//! Opening every field of a large plate is too slow, so the size is
//! estimated from a sample: the first field of the first N wells (in listed
//! order) is measured and the mean is scaled to the whole plate. The
//! estimate is biased toward the first wells.

use tracing::{debug, warn};

use crate::format::metadata::PlateDescriptor;
use crate::format::RootDocument;
use crate::io::{join_location, DocumentFetcher, DocumentSource};

use super::multiscale::aggregate_multiscale;
use super::summary::ImageStats;
use super::ZARR_JSON;

/// Default number of wells sampled per plate.
pub const DEFAULT_SAMPLE_WELLS: usize = 5;

/// Path of the sampled field inside a well.
const FIRST_FIELD: &str = "0";

/// Estimate the written bytes of a plate.
///
/// Returns the geometry of the last sampled field that had a non-zero size,
/// with `written` replaced by `mean(samples) * wells * field_count`. A well
/// entry without a path uses up a sample slot and is still counted in `wells`.
pub async fn estimate_plate<S: DocumentSource>(
    fetcher: &DocumentFetcher<S>,
    location: &str,
    plate: &PlateDescriptor,
    sample_wells: usize,
) -> ImageStats {
    let mut samples = Vec::new();
    let mut representative = ImageStats::default();

    for well in plate.wells.iter().take(sample_wells) {
        let Some(well_path) = well.path.as_deref() else {
            warn!("Well without a path in plate {}", location);
            continue;
        };
        let field_location = join_location(&join_location(location, well_path), FIRST_FIELD);
        let field: Option<RootDocument> = fetcher
            .json(&join_location(&field_location, ZARR_JSON))
            .await;

        let Some(multiscale) = field.as_ref().and_then(|f| f.first_multiscale()) else {
            warn!(well = %well_path, "Missing multiscales in plate image {}", field_location);
            continue;
        };

        let image = aggregate_multiscale(fetcher, &field_location, multiscale).await;
        if image.written > 0 {
            samples.push(image.written);
            representative = image;
        }
    }

    let image_count = image_count(plate);
    representative.written = extrapolate(&samples, image_count);

    debug!(
        sampled = samples.len(),
        image_count = image_count,
        written = representative.written,
        "Estimated plate at {}",
        location
    );

    representative
}

/// Number of images in a plate: wells times fields per well.
pub fn image_count(plate: &PlateDescriptor) -> u64 {
    let fields = plate.field_count.filter(|&n| n > 0).unwrap_or(1);
    (plate.wells.len() as u64).saturating_mul(fields)
}

/// `mean(samples) * image_count`, truncated to whole bytes; 0 without samples.
pub fn extrapolate(samples: &[u64], image_count: u64) -> u64 {
    if samples.is_empty() {
        return 0;
    }
    let sum: u128 = samples.iter().map(|&s| u128::from(s)).sum();
    let total = sum * u128::from(image_count) / samples.len() as u128;
    u64::try_from(total).unwrap_or(u64::MAX)
}
