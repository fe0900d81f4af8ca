//! Path normalization for module entries.
//!
//! Module entries name their source by a path-like string that may be a
//! plain file path or a `file:` URL. Normalization is purely lexical: no
//! file-system access, no symlink resolution.

use std::path::{Component, Path, PathBuf};

/// URL schemes accepted in front of an entry path.
const FILE_SCHEMES: &[&str] = &["file://", "file:"];

/// Normalize an entry name into a path.
///
/// Strips a `file:` scheme, drops `.` components and folds `..` into the
/// preceding normal component. A `..` that would climb above the root of
/// an absolute path is dropped; in a relative path it is kept.
pub fn normalize(raw: &str) -> PathBuf {
    let stripped = FILE_SCHEMES
        .iter()
        .find_map(|scheme| raw.strip_prefix(scheme))
        .unwrap_or(raw);

    let mut out = PathBuf::new();
    for component in Path::new(stripped).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Parent directory of a normalized entry path.
///
/// Returns `None` when the entry has no directory component (`a.py`) or is
/// a bare root.
pub fn parent_dir(raw: &str) -> Option<PathBuf> {
    let path = normalize(raw);
    let parent = path.parent()?;
    if parent.as_os_str().is_empty() {
        None
    } else {
        Some(parent.to_path_buf())
    }
}

#[cfg(test)]
mod tests;
