//! Template patching orchestration.
//! Applies the configuration, version-control and manifest edits to a
//! checked-out template and writes the build descriptor.

use crate::config::TemplateConfig;
use crate::constants::{
    workflows_glob, DEFAULT_BASE_IMAGE, DEFAULT_EMBEDDED_APP, DEFAULT_WORKDIR, DOCKERFILE,
    MANIFEST_FILE,
};
use crate::dockerfile::BuildDescriptor;
use crate::error::{Error, Result};
use crate::manifest::{Manifest, MatchMode};
use crate::renderer::TemplateRenderer;
use crate::vcs::strip_vcs_metadata;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Inputs of a patch run.
#[derive(Debug, Clone)]
pub struct PatchOptions {
    /// Template configuration file (`cookiecutter.json`)
    pub config_path: PathBuf,
    /// Project directory of the template holding the embedded checkout
    pub project_dir: PathBuf,
    /// Package name of the embedded application
    pub embedded_app: String,
    /// Manifest file name, relative to `project_dir`
    pub manifest: String,
    /// Entry point of the generated application; read from the configuration when `None`
    pub entrypoint: Option<String>,
    pub base_image: String,
    pub workdir: String,
    pub match_mode: MatchMode,
}

impl PatchOptions {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(config_path: P, project_dir: Q) -> Self {
        Self {
            config_path: config_path.into(),
            project_dir: project_dir.into(),
            embedded_app: DEFAULT_EMBEDDED_APP.to_string(),
            manifest: MANIFEST_FILE.to_string(),
            entrypoint: None,
            base_image: DEFAULT_BASE_IMAGE.to_string(),
            workdir: DEFAULT_WORKDIR.to_string(),
            match_mode: MatchMode::default(),
        }
    }

    pub fn app_dir(&self) -> PathBuf {
        self.project_dir.join(&self.embedded_app)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.project_dir.join(&self.manifest)
    }

    pub fn dockerfile_path(&self) -> PathBuf {
        self.project_dir.join(DOCKERFILE)
    }
}

/// What a patch run changed on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    /// Glob that must be listed under copy-without-render
    pub glob: String,
    /// Whether the glob had to be added
    pub glob_added: bool,
    /// Whether version-control metadata was found and removed
    pub vcs_removed: bool,
    /// Manifest lines dropped, in original order
    pub removed_requirements: Vec<String>,
    pub dockerfile: PathBuf,
    pub entrypoint: String,
}

/// Applies the patch steps in order: configuration, VCS metadata, manifest
/// and build descriptor.
pub struct TemplatePatcher<'a> {
    renderer: &'a dyn TemplateRenderer,
}

fn ensure_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(Error::not_found(path))
    }
}

impl<'a> TemplatePatcher<'a> {
    pub fn new(renderer: &'a dyn TemplateRenderer) -> Self {
        Self { renderer }
    }

    /// Runs every patch step.
    ///
    /// All paths are checked before anything is written, so a missing
    /// directory or manifest leaves the tree untouched.
    ///
    /// # Errors
    /// * `Error::NotFoundError` if the project directory, embedded checkout,
    ///   configuration or manifest is missing
    /// * `Error::ConfigParseError` if the configuration is malformed or no
    ///   entry point can be determined
    pub fn patch(&self, options: &PatchOptions) -> Result<PatchReport> {
        ensure_dir(&options.project_dir)?;
        let app_dir = options.app_dir();
        ensure_dir(&app_dir)?;

        let mut config = TemplateConfig::load(&options.config_path)?;
        let mut manifest = Manifest::load(options.manifest_path())?;

        let entrypoint = match &options.entrypoint {
            Some(entrypoint) => entrypoint.clone(),
            None => config.app_name().map(str::to_string).ok_or_else(|| {
                Error::ConfigParseError(
                    "no entry point given and the template configuration has no 'app_name'"
                        .to_string(),
                )
            })?,
        };
        let descriptor = BuildDescriptor::new(entrypoint.clone())
            .with_base_image(&options.base_image)
            .with_workdir(&options.workdir)
            .with_embedded_app(&options.embedded_app)
            .with_manifest(&options.manifest);
        // Render up front so a bad descriptor fails before the tree is modified.
        let dockerfile_content = descriptor.render(self.renderer)?;

        let glob = workflows_glob(&options.embedded_app);
        let glob_added = config.add_copy_without_render(&glob)?;
        if glob_added {
            config.save(&options.config_path)?;
            info!("Added '{}' to {}", glob, options.config_path.display());
        } else {
            debug!("'{}' already listed in {}", glob, options.config_path.display());
        }

        let vcs_removed = strip_vcs_metadata(&app_dir)?;
        if vcs_removed {
            info!("Removed version-control metadata from {}", app_dir.display());
        }

        let removed_requirements = manifest.remove_package(&options.embedded_app, options.match_mode);
        if !removed_requirements.is_empty() {
            manifest.save(options.manifest_path())?;
            info!(
                "Removed {} '{}' entr{} from {}",
                removed_requirements.len(),
                options.embedded_app,
                if removed_requirements.len() == 1 { "y" } else { "ies" },
                options.manifest_path().display()
            );
        }

        let dockerfile = options.dockerfile_path();
        std::fs::write(&dockerfile, dockerfile_content)?;
        info!("Wrote build descriptor {}", dockerfile.display());

        Ok(PatchReport {
            glob,
            glob_added,
            vcs_removed,
            removed_requirements,
            dockerfile,
            entrypoint,
        })
    }
}
