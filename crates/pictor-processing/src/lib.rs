//! Pictor Processing Library
//!
//! The two derivation units of the ingestion pipeline, metadata extraction and thumbnail
//! generation, plus the helpers they share: content sniffing, the dimension-based tag
//! classifier and deadline enforcement.
//!
//! Decoding and resizing are CPU-bound and run on the blocking pool; each unit is bounded
//! by its own deadline.

mod decode;
pub mod deadline;
pub mod extractor;
pub mod metadata;
pub mod sniff;
pub mod thumbnail;
pub mod traits;

pub use deadline::{run_blocking, with_deadline};
pub use extractor::MetadataExtractor;
pub use metadata::{classify_tags, image_format_from_name, ExtractedMetadata, Orientation, SizeClass};
pub use sniff::sniff_mime_type;
pub use thumbnail::ThumbnailGenerator;
pub use traits::{MetadataExtraction, ThumbnailGeneration};
