//! Typed views of the metadata documents an OME-Zarr store exposes.
//!
//! Only the fields the stats engine reads are modelled. Every field is
//! optional or defaulted, so a document missing a field still deserializes
//! and the gap is handled where the field is used. Lists of entries decode
//! leniently: one malformed entry does not discard the whole document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

// =============================================================================
// Root document (zarr.json of a group or array)
// =============================================================================

/// Root `zarr.json` of a store or sub-store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RootDocument {
    /// User attributes, including the `ome` block
    #[serde(default)]
    pub attributes: RootAttributes,

    /// `group` or `array`
    #[serde(default)]
    pub node_type: Option<String>,
}

impl RootDocument {
    /// The `ome` attribute block.
    pub fn ome(&self) -> &OmeAttributes {
        &self.attributes.ome
    }

    /// The first declared multiscale, if any.
    ///
    /// Further declarations are ignored.
    pub fn first_multiscale(&self) -> Option<&MultiscaleDescriptor> {
        self.attributes
            .ome
            .multiscales
            .as_ref()
            .and_then(|m| m.first())
    }
}

/// Attributes of a root document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RootAttributes {
    #[serde(default)]
    pub ome: OmeAttributes,

    /// NGFF label image marker; presence alone is significant, so an
    /// explicit `null` is `Some(Value::Null)`.
    #[serde(rename = "image-label", default, deserialize_with = "present")]
    pub image_label: Option<Value>,

    /// Listing of label images under this root.
    #[serde(default)]
    pub labels: Option<Value>,
}

/// The `ome` block of a root document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OmeAttributes {
    #[serde(default, deserialize_with = "lenient_list")]
    pub multiscales: Option<Vec<MultiscaleDescriptor>>,

    /// Raw plate block. See [`OmeAttributes::is_plate`] and
    /// [`OmeAttributes::plate_descriptor`].
    #[serde(default)]
    pub plate: Option<Value>,

    #[serde(default)]
    pub well: Option<Value>,

    #[serde(rename = "bioformats2raw.layout", default)]
    pub bioformats2raw_layout: Option<Value>,

    /// Series identifiers, declared by `OME/zarr.json` of a bioformats2raw bundle.
    #[serde(default, deserialize_with = "lenient")]
    pub series: Option<Vec<String>>,
}

impl OmeAttributes {
    /// Whether at least one multiscale is declared.
    pub fn has_multiscales(&self) -> bool {
        self.multiscales.as_ref().is_some_and(|m| !m.is_empty())
    }

    /// Whether the bioformats2raw layout marker is set.
    pub fn is_bioformats2raw(&self) -> bool {
        self.bioformats2raw_layout.as_ref().is_some_and(is_truthy)
    }

    /// Whether the well marker is set.
    pub fn is_well(&self) -> bool {
        self.well.as_ref().is_some_and(is_truthy)
    }

    /// Whether the plate marker is set. An empty `plate: {}` is not a plate.
    pub fn is_plate(&self) -> bool {
        self.plate.as_ref().is_some_and(is_truthy)
    }

    /// The plate layout, for any non-null plate block.
    ///
    /// A block that is not an object yields an empty layout.
    pub fn plate_descriptor(&self) -> Option<PlateDescriptor> {
        match &self.plate {
            None | Some(Value::Null) => None,
            Some(value) => Some(serde_json::from_value(value.clone()).unwrap_or_default()),
        }
    }
}

/// A declared set of resolution levels.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MultiscaleDescriptor {
    /// Resolution levels, highest resolution first
    #[serde(default, deserialize_with = "lenient_vec")]
    pub datasets: Vec<DatasetRef>,
}

/// Reference from a multiscale to one resolution level.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetRef {
    /// Path of the array relative to the multiscale's location
    #[serde(default, deserialize_with = "lenient")]
    pub path: Option<String>,
}

/// Plate layout of an HCS store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlateDescriptor {
    /// Every declared well, including entries without a usable path
    #[serde(default, deserialize_with = "lenient_vec")]
    pub wells: Vec<WellRef>,

    /// Maximum number of fields per well
    #[serde(default, deserialize_with = "lenient")]
    pub field_count: Option<u64>,
}

/// Reference from a plate to one well, e.g. `A/1`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WellRef {
    #[serde(default, deserialize_with = "lenient")]
    pub path: Option<String>,
}

// =============================================================================
// Array metadata
// =============================================================================

/// Array `zarr.json` of one resolution level.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArrayMetadata {
    #[serde(default)]
    pub shape: Vec<u64>,

    #[serde(default)]
    pub data_type: Option<DataTypeName>,

    /// Legacy direct chunk shape
    #[serde(default)]
    pub chunks: Option<Vec<u64>>,

    #[serde(default)]
    pub chunk_grid: Option<ChunkGridMetadata>,

    #[serde(default)]
    pub codecs: Vec<CodecMetadata>,

    #[serde(default)]
    pub dimension_names: Option<Vec<Option<String>>>,

    #[serde(default)]
    pub attributes: ArrayAttributes,
}

/// A data type, either a plain name or an extension object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DataTypeName {
    Name(String),
    Extension { name: String },
}

impl DataTypeName {
    pub fn as_str(&self) -> &str {
        match self {
            DataTypeName::Name(name) => name,
            DataTypeName::Extension { name } => name,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkGridMetadata {
    #[serde(default)]
    pub configuration: Option<ChunkShapeConfiguration>,
}

/// Any configuration object that may carry a `chunk_shape`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkShapeConfiguration {
    #[serde(default)]
    pub chunk_shape: Option<Vec<u64>>,
}

/// One entry of a codec chain: `"name"` or `{"name": ..., "configuration": ...}`.
#[derive(Debug, Clone, Default)]
pub struct CodecMetadata {
    pub name: String,
    pub configuration: Option<ChunkShapeConfiguration>,
}

impl<'de> Deserialize<'de> for CodecMetadata {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct CodecNameConfiguration {
            name: String,
            #[serde(default)]
            configuration: Option<ChunkShapeConfiguration>,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum CodecIntermediate {
            Name(String),
            NameConfiguration(CodecNameConfiguration),
        }

        let codec = CodecIntermediate::deserialize(d).map_err(|_| {
            serde::de::Error::custom(
                r#"expected codec "<name>" or {"name":"<name>","configuration":{}}"#,
            )
        })?;
        match codec {
            CodecIntermediate::Name(name) => Ok(Self {
                name,
                configuration: None,
            }),
            CodecIntermediate::NameConfiguration(codec) => Ok(Self {
                name: codec.name,
                configuration: codec.configuration,
            }),
        }
    }
}

/// Array attributes read by the flat traversal mode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArrayAttributes {
    /// Precomputed statistics written by the NGFF challenge converter
    #[serde(rename = "_ome2024_ngff_challenge_stats", default)]
    pub challenge_stats: Option<ChallengeStats>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChallengeStats {
    #[serde(default)]
    pub written: Option<u64>,
}

impl ArrayMetadata {
    /// Dimension names with null entries rendered as empty strings.
    pub fn dimension_names(&self) -> Vec<String> {
        self.dimension_names
            .as_ref()
            .map(|names| {
                names
                    .iter()
                    .map(|n| n.clone().unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default()
    }
}

// =============================================================================
// Provenance graph (ro-crate-metadata.json)
// =============================================================================

/// RO-Crate metadata document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoCrateDocument {
    #[serde(rename = "@graph", default)]
    pub graph: Vec<GraphItem>,
}

/// One entity of an RO-Crate graph.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphItem {
    #[serde(rename = "@type", default)]
    pub item_type: Option<OneOrMany>,

    #[serde(default)]
    pub license: Option<TextOrRef>,

    #[serde(default)]
    pub name: Option<TextOrRef>,

    #[serde(default)]
    pub description: Option<TextOrRef>,

    #[serde(default)]
    pub organism_classification: Option<TextOrRef>,

    #[serde(default)]
    pub fbbi_id: Option<TextOrRef>,
}

impl GraphItem {
    /// Whether this item declares the given `@type`.
    pub fn has_type(&self, wanted: &str) -> bool {
        match &self.item_type {
            Some(OneOrMany::One(t)) => t == wanted,
            Some(OneOrMany::Many(ts)) => ts.iter().any(|t| t == wanted),
            Some(OneOrMany::Other(_)) | None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
    Other(Value),
}

/// A literal value or a JSON-LD `{"@id": ...}` reference.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TextOrRef {
    Text(String),
    Ref(IdRef),
    Other(Value),
}

impl TextOrRef {
    /// The textual value, or `None` when empty.
    pub fn value(&self) -> Option<&str> {
        let s = match self {
            TextOrRef::Text(s) => s.as_str(),
            TextOrRef::Ref(r) => r.id.as_deref()?,
            TextOrRef::Other(_) => return None,
        };
        (!s.is_empty()).then_some(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IdRef {
    #[serde(rename = "@id", default)]
    pub id: Option<String>,
}

// =============================================================================
// Helpers
// =============================================================================

/// JSON truthiness: null, false, zero and empty strings/arrays/objects are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Keep a present key as `Some`, even when its value is `null`.
fn present<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(d).map(Some)
}

/// Decode a value of the wrong shape as `None` instead of failing.
fn lenient<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(d)?;
    Ok(serde_json::from_value(value).ok())
}

/// Decode an array entry by entry. An entry that does not decode takes its
/// default, so the list keeps its length. A non-array is `None`.
fn lenient_list<'de, D, T>(d: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Value::deserialize(d)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .map(|item| serde_json::from_value(item).unwrap_or_default())
                .collect(),
        )),
        _ => Ok(None),
    }
}

fn lenient_vec<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    lenient_list(d).map(Option::unwrap_or_default)
}
