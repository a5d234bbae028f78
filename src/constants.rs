//! Common constants used throughout the template patcher.

/// Template configuration key listing paths copied without rendering
pub const COPY_WITHOUT_RENDER_KEY: &str = "_copy_without_render";

/// Template configuration key holding the generated application's name
pub const APP_NAME_KEY: &str = "app_name";

/// Package name of the application embedded in the template
pub const DEFAULT_EMBEDDED_APP: &str = "chrisapp";

/// Version-control metadata directory removed from the embedded checkout
pub const VCS_DIR: &str = ".git";

/// Dependency manifest file name
pub const MANIFEST_FILE: &str = "requirements.txt";

/// Build descriptor file name
pub const DOCKERFILE: &str = "Dockerfile";

/// Base image written into the build descriptor
pub const DEFAULT_BASE_IMAGE: &str = "python:3.9.1-slim-buster";

/// Working directory inside the container
pub const DEFAULT_WORKDIR: &str = "/usr/local/src";

/// Returns the glob matching the embedded application's CI workflows.
pub fn workflows_glob(embedded_app: &str) -> String {
    format!("{embedded_app}/.github/workflows/*")
}
