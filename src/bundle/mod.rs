//! The transformer: collapse a document's local script and stylesheet references into
//! inline blocks.

pub mod collect;
pub mod styles;
pub mod transform;

pub use collect::{CollectedReferences, classify_reference, collect_references};
pub use styles::rewrite_stylesheet_urls;
pub use transform::{DEFAULT_SCRIPT_TYPE, DEFAULT_STYLE_TYPE, TransformOutcome, Transformer};
