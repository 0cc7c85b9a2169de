#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod builder;
pub mod bundle;
pub mod config;
pub mod error;
pub mod markup;
pub mod models;
pub mod selection;
pub mod source;

pub use builder::{BuildOptions, InlineBuilder};
pub use bundle::{TransformOutcome, Transformer};
pub use config::{BundleConfig, LinkMode};
pub use error::{BuildResult, BundleError};
pub use models::{BuildSummary, Document, DocumentReport};
pub use selection::{DocumentInclusion, SubjectSet};
pub use source::{AssetSource, LocalFiles};
