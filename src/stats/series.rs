//! Series resolution for bioformats2raw bundles.

use tracing::{debug, warn};

use crate::format::RootDocument;
use crate::io::{join_location, DocumentFetcher, DocumentSource};

use super::multiscale::aggregate_multiscale;
use super::summary::ImageStats;
use super::ZARR_JSON;

/// OME-XML companion; its presence means a single series `0`.
const OME_XML: &str = "OME/METADATA.ome.xml";

/// Series listing group of a bundle.
const OME_GROUP: &str = "OME";

/// List the series identifiers of a bundle.
///
/// Returns `["0"]` when the OME-XML companion is reachable, else the
/// `series` list of `OME/zarr.json`, else an empty list.
pub async fn resolve_series<S: DocumentSource>(
    fetcher: &DocumentFetcher<S>,
    location: &str,
) -> Vec<String> {
    if fetcher.exists(&join_location(location, OME_XML)).await {
        return vec!["0".to_string()];
    }

    let ome_location = join_location(&join_location(location, OME_GROUP), ZARR_JSON);
    let series = fetcher
        .json::<RootDocument>(&ome_location)
        .await
        .and_then(|doc| doc.attributes.ome.series)
        .unwrap_or_default();

    debug!(count = series.len(), "Resolved series from {}", ome_location);
    series
}

/// Size of the first image of a bundle.
pub async fn bundle_stats<S: DocumentSource>(
    fetcher: &DocumentFetcher<S>,
    location: &str,
) -> ImageStats {
    let series = resolve_series(fetcher, location).await;

    let Some(first) = series.first() else {
        warn!("No series found in bioformats2raw layout at {}", location);
        return ImageStats::default();
    };

    let image_location = join_location(location, first);
    let image: Option<RootDocument> = fetcher
        .json(&join_location(&image_location, ZARR_JSON))
        .await;

    match image.as_ref().and_then(|r| r.first_multiscale()) {
        Some(multiscale) => aggregate_multiscale(fetcher, &image_location, multiscale).await,
        None => {
            warn!(series = %first, "Missing multiscales in first series image");
            ImageStats::default()
        }
    }
}
