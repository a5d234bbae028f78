//! Removal of version-control metadata from the embedded checkout.
//! The scaffolding tool must see the embedded application as plain files,
//! not as a nested repository.

use crate::constants::VCS_DIR;
use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Deletes `<app_dir>/.git` if present.
///
/// The metadata may be a directory or, for submodules and worktrees, a
/// gitlink file; both are removed.
///
/// # Arguments
/// * `app_dir` - Root of the embedded application checkout
///
/// # Returns
/// * `Result<bool>` - `true` if metadata was removed, `false` if none was present
///
/// # Errors
/// * `Error::NotFoundError` if `app_dir` is not a directory
pub fn strip_vcs_metadata<P: AsRef<Path>>(app_dir: P) -> Result<bool> {
    let app_dir = app_dir.as_ref();
    if !app_dir.is_dir() {
        return Err(Error::not_found(app_dir));
    }

    let vcs_path = app_dir.join(VCS_DIR);
    // symlink_metadata so a dangling symlink named .git is also caught
    let metadata = match fs::symlink_metadata(&vcs_path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No version-control metadata in {}", app_dir.display());
            return Ok(false);
        }
        Err(e) => return Err(Error::IoError(e)),
    };

    if metadata.is_dir() {
        fs::remove_dir_all(&vcs_path)?;
    } else {
        fs::remove_file(&vcs_path)?;
    }
    debug!("Removed {}", vcs_path.display());
    Ok(true)
}
