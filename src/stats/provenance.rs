//! Descriptive and licensing metadata from a store's RO-Crate.

use serde::Serialize;
use tracing::debug;

use crate::format::metadata::{GraphItem, TextOrRef};
use crate::format::RoCrateDocument;
use crate::io::{join_location, DocumentFetcher, DocumentSource};

/// RO-Crate document name at the store root.
pub const RO_CRATE_JSON: &str = "ro-crate-metadata.json";

const BIOSAMPLE_TYPE: &str = "biosample";
const IMAGE_ACQUISITION_TYPE: &str = "image_acquisition";

/// Provenance fields merged from an RO-Crate graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Provenance {
    pub license: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    /// NCBI taxonomy identifier of the imaged organism
    pub organism_id: Option<String>,
    /// FBbi identifier of the imaging method
    pub fbbi_id: Option<String>,
    /// Whether an RO-Crate document was found
    pub found: bool,
}

/// Load provenance for the store at `location`.
///
/// A missing or empty RO-Crate gives an empty record with `found == false`.
pub async fn load_provenance<S: DocumentSource>(
    fetcher: &DocumentFetcher<S>,
    location: &str,
) -> Provenance {
    let Some(crate_doc) = fetcher
        .json::<RoCrateDocument>(&join_location(location, RO_CRATE_JSON))
        .await
    else {
        debug!("RO-Crate metadata not found for {}", location);
        return Provenance::default();
    };

    let provenance = merge_graph(&crate_doc.graph);
    debug!(?provenance, "Loaded RO-Crate metadata");
    provenance
}

/// Merge graph items in listed order.
///
/// License, name and description take the value of the last item that
/// carries one. Organism and imaging method come from the items typed
/// `biosample` and `image_acquisition`.
pub fn merge_graph(items: &[GraphItem]) -> Provenance {
    let mut provenance = Provenance {
        found: true,
        ..Provenance::default()
    };

    for item in items {
        overwrite(&mut provenance.license, &item.license);
        overwrite(&mut provenance.name, &item.name);
        overwrite(&mut provenance.description, &item.description);

        if item.has_type(BIOSAMPLE_TYPE) {
            provenance.organism_id = id_of(&item.organism_classification);
        }
        if item.has_type(IMAGE_ACQUISITION_TYPE) {
            provenance.fbbi_id = id_of(&item.fbbi_id);
        }
    }

    provenance
}

fn overwrite(slot: &mut Option<String>, value: &Option<TextOrRef>) {
    if let Some(v) = value.as_ref().and_then(TextOrRef::value) {
        *slot = Some(v.to_string());
    }
}

fn id_of(value: &Option<TextOrRef>) -> Option<String> {
    value.as_ref().and_then(TextOrRef::value).map(str::to_string)
}
