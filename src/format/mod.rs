//! Metadata documents and the pure logic that interprets them.
//!
//! Nothing in this module performs I/O:
//!
//! - [`metadata`]: typed `zarr.json` / `ro-crate-metadata.json` records
//! - [`detect`]: layout classification of a root document
//! - [`array`]: chunk/shard extraction and byte-size arithmetic

pub mod array;
pub mod detect;
pub mod metadata;

pub use array::{array_bytes, byte_width, element_count, shape_info, ChunkLayout, ShapeInfo};
pub use detect::{detect_kind, OmeZarrKind};
pub use metadata::{ArrayMetadata, PlateDescriptor, RoCrateDocument, RootDocument};
