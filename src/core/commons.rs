// src/core/commons.rs

use std::cmp::Ordering;
use std::io;
use std::path::{Component, Path, PathBuf};

/// The case folding used for every name comparison (ordering and lookups alike).
pub fn fold_case(name: &str) -> String {
    name.to_lowercase()
}

/// Case-insensitive name ordering, with an ordinal tie-break so that names
/// differing only by case still sort deterministically.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    fold_case(a)
        .cmp(&fold_case(b))
        .then_with(|| a.cmp(b))
}

/// Whether two names are equal under [`fold_case`].
pub fn names_equal(a: &str, b: &str) -> bool {
    fold_case(a) == fold_case(b)
}

/// Makes `path` absolute against the current directory and drops `.` and `..`
/// components lexically. Symlinks are not resolved.
pub fn absolute_clean(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut cleaned = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            // `pop` is a no-op at the root, which is its own parent.
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other),
        }
    }
    Ok(cleaned)
}

/// The final path component as a `String` (empty for paths like `/`).
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// The extension with its leading dot (`.tf`), or an empty string.
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}
