use std::path::{Component, Path};

use super::resolve::normalize_lexically;

/// Express `target` relative to the directory `base`, using forward slashes.
///
/// Both paths are normalised lexically first. The generated path always uses forward
/// slashes so that it is valid inside markup and stylesheets regardless of the native
/// directory separator. When the two paths share no common root the normalised target
/// is returned as-is.
pub fn relative_to(base: &Path, target: &Path) -> String {
    let base = normalize_lexically(base);
    let target = normalize_lexically(target);

    let base_parts: Vec<Component> = base.components().collect();
    let target_parts: Vec<Component> = target.components().collect();

    let shared = base_parts
        .iter()
        .zip(target_parts.iter())
        .take_while(|(left, right)| left == right)
        .count();

    if shared == 0 && (base.has_root() || target.has_root()) {
        return to_slash_path(&target);
    }

    let mut segments: Vec<String> = Vec::new();
    for _ in shared..base_parts.len() {
        segments.push("..".to_string());
    }
    for component in &target_parts[shared..] {
        segments.push(component.as_os_str().to_string_lossy().into_owned());
    }

    segments.join("/")
}

/// Render a path with `/` separators.
pub fn to_slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
