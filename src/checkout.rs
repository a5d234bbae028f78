//! Repository checkout into a destination path.
//! Clones remote (HTTPS, git, SSH) or local repositories with libgit2.

use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Represents the source location of a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoSource {
    /// Repository on the local filesystem
    FileSystem(PathBuf),
    /// Git repository URL (HTTPS or SSH)
    Git(String),
}

impl std::fmt::Display for RepoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoSource::FileSystem(path) => write!(f, "local path: '{}'", path.display()),
            RepoSource::Git(repo) => write!(f, "git repository: '{repo}'"),
        }
    }
}

impl RepoSource {
    /// Returns whether `s` looks like a remote git URL.
    pub fn is_git_url(s: &str) -> bool {
        if let Ok(url) = Url::parse(s) {
            if matches!(url.scheme(), "https" | "http" | "git" | "ssh") {
                return true;
            }
        }
        s.starts_with("git@")
    }

    /// Creates a RepoSource from a path or URL.
    pub fn from_string(s: &str) -> Self {
        if Self::is_git_url(s) {
            Self::Git(s.to_string())
        } else {
            Self::FileSystem(PathBuf::from(s))
        }
    }

    fn clone_url(&self) -> Result<String> {
        match self {
            RepoSource::Git(repo) => Ok(repo.clone()),
            RepoSource::FileSystem(path) => {
                if !path.exists() {
                    return Err(Error::not_found(path));
                }
                Ok(path.display().to_string())
            }
        }
    }
}

fn is_non_empty_dir(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    Ok(!path.is_dir() || fs::read_dir(path)?.next().is_some())
}

/// Credential callback for clones.
///
/// Offers one key or default credential per clone. libgit2 calls back after
/// each rejection; those later requests fail the clone.
fn credentials_handler(
) -> impl FnMut(&str, Option<&str>, git2::CredentialType) -> std::result::Result<git2::Cred, git2::Error> {
    let mut attempts = 0u32;
    move |_url, username_from_url, allowed_types| {
        let username = username_from_url.unwrap_or("git");
        if allowed_types.contains(git2::CredentialType::USERNAME) {
            return git2::Cred::username(username);
        }
        attempts += 1;
        if attempts > 1 {
            return Err(git2::Error::from_str("credentials rejected by the remote"));
        }
        if allowed_types.contains(git2::CredentialType::SSH_KEY) {
            git2::Cred::ssh_key_from_agent(username)
        } else {
            git2::Cred::default()
        }
    }
}

/// Clones `source` into `dest`.
///
/// # Arguments
/// * `source` - Repository to clone
/// * `dest` - Destination directory; created if missing
/// * `force` - Replace a non-empty destination instead of failing
///
/// # Errors
/// * `Error::CheckoutDestinationExists` if `dest` is non-empty and `force` is false
/// * `Error::NotFoundError` if a local source does not exist
/// * `Error::Git2Error` if the clone fails
pub fn checkout<P: AsRef<Path>>(source: &RepoSource, dest: P, force: bool) -> Result<PathBuf> {
    let dest = dest.as_ref();
    let url = source.clone_url()?;

    if is_non_empty_dir(dest)? {
        if !force {
            return Err(Error::CheckoutDestinationExists { dest: dest.display().to_string() });
        }
        debug!("Removing existing '{}'.", dest.display());
        if dest.is_dir() {
            fs::remove_dir_all(dest)?;
        } else {
            fs::remove_file(dest)?;
        }
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    debug!("Cloning {} to '{}'.", source, dest.display());

    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(credentials_handler());

    let mut fetch_opts = git2::FetchOptions::new();
    fetch_opts.remote_callbacks(callbacks);

    let mut builder = git2::build::RepoBuilder::new();
    builder.fetch_options(fetch_opts);
    builder.clone(&url, dest)?;

    Ok(dest.to_path_buf())
}
