//! Helpers for classifying and re-basing asset references.
//!
//! This module splits the responsibilities into focused submodules so that the matchers
//! deciding what counts as a document or an external URL, the pure reference resolution,
//! and the relative path arithmetic used by stylesheet rewriting can be tested
//! independently of any filesystem access.

mod filters;
mod relative;
mod resolve;

pub use filters::{
    is_discardable_source, is_external_reference, is_html_document, keeps_stylesheet_url,
};
pub use relative::{relative_to, to_slash_path};
pub use resolve::{Resolution, normalize_lexically, resolve_reference};
