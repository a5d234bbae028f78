//! Resolution of the files a template copies without rendering.

use crate::config::TemplateConfig;
use crate::error::{Error, Result};
use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lists files under `template_dir` matched by the configuration's
/// copy-without-render patterns.
///
/// # Returns
/// * `Result<Vec<PathBuf>>` - Matching paths relative to `template_dir`, sorted
///
/// # Errors
/// * `Error::NotFoundError` if `template_dir` is not a directory
/// * `Error::ConfigParseError` if a pattern is invalid
pub fn verbatim_files<P: AsRef<Path>>(config: &TemplateConfig, template_dir: P) -> Result<Vec<PathBuf>> {
    let template_dir = template_dir.as_ref();
    if !template_dir.is_dir() {
        return Err(Error::not_found(template_dir));
    }
    let globs = config.copy_without_render_globs()?;

    let mut matched = Vec::new();
    for entry in WalkDir::new(template_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::IoError(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(template_dir)
            .map_err(|e| Error::ConfigParseError(e.to_string()))?;
        if globs.is_match(relative) {
            debug!("Copied without rendering: {}", relative.display());
            matched.push(relative.to_path_buf());
        }
    }
    Ok(matched)
}
