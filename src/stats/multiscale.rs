//! Byte totals across the resolution levels of one multiscale image.

use tracing::{debug, warn};

use crate::format::metadata::MultiscaleDescriptor;
use crate::format::{array_bytes, shape_info, ArrayMetadata};
use crate::io::{join_location, DocumentFetcher, DocumentSource};

use super::summary::ImageStats;
use super::ZARR_JSON;

/// Sum the byte size of every dataset of `multiscale`, located under `location`.
///
/// Datasets are processed in listed order:
/// - the representative shape/chunks/shards come from dataset 0;
/// - dimension names are overwritten by every dataset, so the result holds
///   the last dataset's names;
/// - a dataset without a path, whose metadata is missing, or whose data type
///   cannot be sized contributes zero bytes and the loop continues.
pub async fn aggregate_multiscale<S: DocumentSource>(
    fetcher: &DocumentFetcher<S>,
    location: &str,
    multiscale: &MultiscaleDescriptor,
) -> ImageStats {
    let mut stats = ImageStats::default();

    for (index, dataset) in multiscale.datasets.iter().enumerate() {
        let Some(path) = dataset.path.as_deref() else {
            warn!(index, "Dataset without a path in multiscale at {}", location);
            stats.dimension_names.clear();
            continue;
        };
        let array_location = join_location(location, path);
        let array: ArrayMetadata = match fetcher
            .json(&join_location(&array_location, ZARR_JSON))
            .await
        {
            Some(array) => array,
            None => {
                warn!(dataset = %path, "Missing array metadata at {}", array_location);
                stats.dimension_names.clear();
                continue;
            }
        };

        if index == 0 {
            stats.representative = Some(shape_info(&array));
        }

        match array_bytes(&array) {
            Ok(bytes) => stats.written = stats.written.saturating_add(bytes),
            Err(e) => warn!(dataset = %path, "Skipping array at {}: {}", array_location, e),
        }

        stats.dimension_names = array.dimension_names();
    }

    debug!(
        datasets = multiscale.datasets.len(),
        written = stats.written,
        "Aggregated multiscale at {}",
        location
    );

    stats
}

/// Stats from the highest-resolution dataset only.
///
/// Uses the precomputed `_ome2024_ngff_challenge_stats.written` total when
/// the array carries one, else the byte size of that single array.
pub async fn first_level_stats<S: DocumentSource>(
    fetcher: &DocumentFetcher<S>,
    location: &str,
    multiscale: &MultiscaleDescriptor,
) -> ImageStats {
    let Some(path) = multiscale.datasets.first().and_then(|d| d.path.as_deref()) else {
        warn!("No usable first dataset in multiscale at {}", location);
        return ImageStats::default();
    };

    let array_location = join_location(location, path);
    let Some(array) = fetcher
        .json::<ArrayMetadata>(&join_location(&array_location, ZARR_JSON))
        .await
    else {
        warn!(dataset = %path, "Missing array metadata at {}", array_location);
        return ImageStats::default();
    };

    let precomputed = array
        .attributes
        .challenge_stats
        .as_ref()
        .and_then(|s| s.written);

    let written = match precomputed {
        Some(written) => written,
        None => array_bytes(&array).unwrap_or_else(|e| {
            warn!(dataset = %path, "Skipping array at {}: {}", array_location, e);
            0
        }),
    };

    ImageStats {
        written,
        representative: Some(shape_info(&array)),
        dimension_names: array.dimension_names(),
    }
}
