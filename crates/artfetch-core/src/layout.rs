//! Mapping remote artifact paths onto the output tree.

use std::path::{Component, Path, PathBuf};

use crate::error::FetchError;

/// Home-directory placeholder the CI platform prefixes artifact paths with.
pub const HOME_PLACEHOLDER: &str = "~/";

/// Destination of an artifact under `root`.
///
/// A leading `~/` is stripped and the rest is joined component by component:
/// root and `.` components are dropped, so absolute remote paths land inside
/// `root` too. `..` components, or a path naming no file at all, are rejected.
///
/// - `~/reports/out.txt` → `<root>/reports/out.txt`
/// - `build/out.bin` → `<root>/build/out.bin`
pub fn destination_path(root: &Path, artifact_path: &str) -> Result<PathBuf, FetchError> {
    let relative = artifact_path
        .strip_prefix(HOME_PLACEHOLDER)
        .unwrap_or(artifact_path);

    let mut dest = root.to_path_buf();
    let mut pushed = false;
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => {
                dest.push(part);
                pushed = true;
            }
            Component::RootDir | Component::Prefix(_) | Component::CurDir => {}
            Component::ParentDir => return Err(FetchError::UnsafePath(artifact_path.to_string())),
        }
    }

    if !pushed {
        return Err(FetchError::UnsafePath(artifact_path.to_string()));
    }
    Ok(dest)
}
