use regex::Regex;
use std::sync::OnceLock;

fn html_document_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\.html$").expect("invalid html regex"))
}

fn discardable_source_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\.(js|css)$").expect("invalid source regex"))
}

fn external_reference_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            vec![
                Regex::new(r"^\w+://").expect("invalid url regex"),
                Regex::new(r"^//").expect("invalid protocol-relative regex"),
                Regex::new(r"(?i)^data:").expect("invalid data URI regex"),
            ]
        })
        .as_slice()
}

fn stylesheet_url_passthrough_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            vec![
                Regex::new(r"^/").expect("invalid root regex"),
                Regex::new(r"https?:").expect("invalid http(s) regex"),
                Regex::new(r"(?i)^data:").expect("invalid data URI regex"),
                Regex::new(r"^#").expect("invalid fragment regex"),
            ]
        })
        .as_slice()
}

/// Whether a tree path names an HTML document that can be transformed.
pub fn is_html_document(path: &str) -> bool {
    html_document_pattern().is_match(path)
}

/// Whether a tree path names a script or stylesheet source.
pub fn is_discardable_source(path: &str) -> bool {
    discardable_source_pattern().is_match(path)
}

/// Determine whether a script or stylesheet reference points outside the tree.
///
/// Absolute URLs, protocol-relative URLs and data URIs can never be read from disk, so
/// they are excluded from bundles before any path resolution happens.
pub fn is_external_reference(value: &str) -> bool {
    external_reference_patterns()
        .iter()
        .any(|pattern| pattern.is_match(value))
}

/// Whether a `url()` reference inside a stylesheet must be left as written.
pub fn keeps_stylesheet_url(value: &str) -> bool {
    stylesheet_url_passthrough_patterns()
        .iter()
        .any(|pattern| pattern.is_match(value))
}
