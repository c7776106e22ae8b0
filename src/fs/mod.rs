//! Sandboxed, read-only workspace access

mod chroot;
mod mock;
mod r#trait;

pub use chroot::ChrootFileSystem;
pub use mock::MockFileSystem;
pub use r#trait::{DirEntry, FileSystem, FileType};

use std::path::{Component, Path, PathBuf};

/// Normalizes a workspace-relative path, dropping `.` components.
///
/// Returns `None` for absolute paths and for anything containing `..`.
pub(crate) fn relative_path(path: &Path) -> Option<PathBuf> {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(normalized)
}
