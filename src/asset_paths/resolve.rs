use std::path::{Component, Path, PathBuf};

use super::filters::is_external_reference;

/// Outcome of resolving a reference string without touching the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The reference points outside the tree and is never bundled.
    External,
    /// The reference started with `/` and was resolved against the tree root.
    RootRelative(PathBuf),
    /// The reference was resolved against the directory of the document.
    DocRelative(PathBuf),
}

impl Resolution {
    /// Resolved path, if the reference is local.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::External => None,
            Self::RootRelative(path) | Self::DocRelative(path) => Some(path),
        }
    }
}

/// Resolve a script `src` or stylesheet `href` value.
///
/// This is a pure function of its inputs; whether the resolved path exists is decided
/// separately against an [`crate::source::AssetSource`].
pub fn resolve_reference(reference: &str, document_dir: &Path, tree_root: &Path) -> Resolution {
    if is_external_reference(reference) {
        return Resolution::External;
    }

    match reference.strip_prefix('/') {
        Some(rooted) => Resolution::RootRelative(normalize_lexically(&tree_root.join(rooted))),
        None => Resolution::DocRelative(normalize_lexically(&document_dir.join(reference))),
    }
}

/// Collapse `.` and `..` components without consulting the filesystem.
///
/// `..` never climbs above the root of an absolute path; on a relative path leading
/// `..` components are preserved.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}
