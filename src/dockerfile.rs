//! Build descriptor (Dockerfile) generation.

use crate::constants::{DEFAULT_BASE_IMAGE, DEFAULT_EMBEDDED_APP, DEFAULT_WORKDIR, MANIFEST_FILE};
use crate::error::{Error, Result};
use crate::renderer::TemplateRenderer;
use log::debug;
use serde::Serialize;
use std::path::Path;

/// Fixed layout of the descriptor. The embedded application is installed
/// from local source first, then the remaining requirements without
/// dependency resolution, then the generated application itself.
pub const DOCKERFILE_TEMPLATE: &str = r#"FROM {{ base_image }}
WORKDIR {{ workdir }}
COPY . .
RUN pip install ./{{ embedded_app }} && pip install --no-deps -r {{ manifest }} && pip install .
CMD [{{ entrypoint|tojson }}, "--help"]
"#;

/// Flag passed to the entry point by the container's default command.
pub const HELP_FLAG: &str = "--help";

/// Values substituted into [`DOCKERFILE_TEMPLATE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildDescriptor {
    pub base_image: String,
    pub workdir: String,
    pub embedded_app: String,
    pub manifest: String,
    pub entrypoint: String,
}

impl BuildDescriptor {
    /// Creates a descriptor with default image, paths and embedded app.
    pub fn new<S: Into<String>>(entrypoint: S) -> Self {
        Self {
            base_image: DEFAULT_BASE_IMAGE.to_string(),
            workdir: DEFAULT_WORKDIR.to_string(),
            embedded_app: DEFAULT_EMBEDDED_APP.to_string(),
            manifest: MANIFEST_FILE.to_string(),
            entrypoint: entrypoint.into(),
        }
    }

    pub fn with_base_image<S: Into<String>>(mut self, base_image: S) -> Self {
        self.base_image = base_image.into();
        self
    }

    pub fn with_workdir<S: Into<String>>(mut self, workdir: S) -> Self {
        self.workdir = workdir.into();
        self
    }

    pub fn with_embedded_app<S: Into<String>>(mut self, embedded_app: S) -> Self {
        self.embedded_app = embedded_app.into();
        self
    }

    pub fn with_manifest<S: Into<String>>(mut self, manifest: S) -> Self {
        self.manifest = manifest.into();
        self
    }

    /// Command the container runs when started without arguments.
    pub fn default_command(&self) -> Vec<String> {
        vec![self.entrypoint.clone(), HELP_FLAG.to_string()]
    }

    /// Renders the descriptor text.
    ///
    /// # Errors
    /// * `Error::ConfigParseError` if the entry point or base image is empty
    /// * `Error::MinijinjaError` if rendering fails
    pub fn render(&self, renderer: &dyn TemplateRenderer) -> Result<String> {
        if self.entrypoint.trim().is_empty() {
            return Err(Error::ConfigParseError("entry point name is empty".to_string()));
        }
        if self.base_image.trim().is_empty() {
            return Err(Error::ConfigParseError("base image is empty".to_string()));
        }
        let context = serde_json::to_value(self)
            .map_err(|e| Error::ConfigParseError(e.to_string()))?;
        renderer.render(DOCKERFILE_TEMPLATE, &context)
    }

    /// Renders the descriptor and writes it to `path`, replacing any existing file.
    pub fn write<P: AsRef<Path>>(&self, path: P, renderer: &dyn TemplateRenderer) -> Result<()> {
        let path = path.as_ref();
        let content = self.render(renderer)?;
        debug!("Writing build descriptor to {}", path.display());
        std::fs::write(path, content)?;
        Ok(())
    }
}
