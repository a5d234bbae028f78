//! Template patcher for the embedded-app integration job.
//! Prepares a checked-out project template so that it scaffolds and builds
//! against a local checkout of the application it embeds, and runs the CI
//! workflow that drives it.

/// Repository checkout with libgit2
pub mod checkout;

/// Command-line interface module
pub mod cli;

/// Template configuration loading, editing and persistence
/// Supports JSON and YAML formats
pub mod config;

/// Default names, paths and images
pub mod constants;

/// Build descriptor (Dockerfile) generation
pub mod dockerfile;

/// Error types and handling
pub mod error;

/// Logger initialization for the binary
pub mod logger;

/// Dependency manifest editing
pub mod manifest;

/// Patch orchestration
pub mod patcher;

/// Template rendering engine
pub mod renderer;

/// Step script execution
pub mod runner;

/// Version-control metadata removal
pub mod vcs;

/// Files copied without rendering
pub mod verbatim;

/// Workflow definitions and the sequential step runner
pub mod workflow;
