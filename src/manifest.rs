//! Dependency manifest (`requirements.txt`) handling.
//!
//! The embedded application is installed from local source by the build
//! descriptor, so its entry has to disappear from the manifest; otherwise the
//! installer would pull a conflicting release from the public package index.

use crate::error::{Error, Result};
use log::debug;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// How manifest lines are matched against the embedded package name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum MatchMode {
    /// Remove lines whose declared requirement name equals the package name
    #[default]
    Name,
    /// Remove every line containing the package name anywhere
    Substring,
}

const VCS_SCHEMES: [&str; 4] = ["git+", "hg+", "svn+", "bzr+"];

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*([A-Za-z0-9][A-Za-z0-9._-]*)").expect("valid regex"))
}

fn direct_reference_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z0-9][A-Za-z0-9._-]*)\s*(\[[^\]]*\])?\s*@").expect("valid regex")
    })
}

fn egg_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#egg=([A-Za-z0-9][A-Za-z0-9._-]*)").expect("valid regex"))
}

fn separator_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[-_.]+").expect("valid regex"))
}

/// Normalizes a package name: lowercase, runs of `-`, `_` and `.` become `-`.
pub fn normalize_name(name: &str) -> String {
    separator_regex().replace_all(&name.to_lowercase(), "-").into_owned()
}

/// Package name of a VCS requirement (`git+https://host/org/name.git@ref`),
/// taken from the last path segment with `.git` and `@ref` stripped.
fn vcs_url_name(url: &str) -> Option<String> {
    let url = url.split('#').next()?.split('?').next()?;
    let (_, rest) = url.split_once("://")?;
    let (_, path) = rest.split_once('/')?;
    let path = path.split('@').next()?.trim_end_matches('/');
    let segment = path.rsplit('/').next()?;
    let name = segment.strip_suffix(".git").unwrap_or(segment);
    name_regex()
        .captures(name)
        .filter(|caps| caps[1].len() == name.len())
        .map(|caps| caps[1].to_string())
}

/// Extracts the requirement name declared by a manifest line.
///
/// Returns `None` for blank lines, comments, installer options such as
/// `-r other.txt` or `--index-url`, local editable paths and archive URLs. Direct references
/// (`name @ url`) use their declared name; VCS URLs use their `#egg=`
/// fragment, or else the repository name.
pub fn requirement_name(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    if let Some(caps) = direct_reference_regex().captures(trimmed) {
        return Some(caps[1].to_string());
    }
    if let Some(caps) = egg_regex().captures(trimmed) {
        return Some(caps[1].to_string());
    }
    if let Some(target) = trimmed
        .strip_prefix("--editable")
        .or_else(|| trimmed.strip_prefix("-e"))
    {
        let target = target.trim_start_matches([' ', '=']);
        return if target.contains("://") { requirement_name(target) } else { None };
    }
    if trimmed.starts_with('-') {
        return None;
    }
    if trimmed.contains("://") {
        let is_vcs = VCS_SCHEMES.iter().any(|scheme| trimmed.starts_with(scheme));
        return if is_vcs { vcs_url_name(trimmed) } else { None };
    }
    name_regex().captures(trimmed).map(|caps| caps[1].to_string())
}

/// Returns whether `line` refers to `package` under the given match mode.
pub fn line_matches(line: &str, package: &str, mode: MatchMode) -> bool {
    match mode {
        MatchMode::Substring => line.contains(package),
        MatchMode::Name => requirement_name(line)
            .map(|name| normalize_name(&name) == normalize_name(package))
            .unwrap_or(false),
    }
}

/// Ordered lines of a dependency manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    lines: Vec<String>,
    line_ending: LineEnding,
    trailing_newline: bool,
}

/// Line terminator of a manifest, kept when it is written back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

impl Manifest {
    pub fn parse(content: &str) -> Self {
        Self {
            lines: content.lines().map(str::to_string).collect(),
            line_ending: if content.contains("\r\n") { LineEnding::CrLf } else { LineEnding::Lf },
            trailing_newline: content.ends_with('\n'),
        }
    }

    /// Reads a manifest from disk.
    ///
    /// # Errors
    /// * `Error::NotFoundError` if the file does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::not_found(path));
        }
        debug!("Reading manifest {}", path.display());
        Ok(Self::parse(&std::fs::read_to_string(path)?))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.serialize())?;
        Ok(())
    }

    pub fn serialize(&self) -> String {
        let ending = self.line_ending.as_str();
        let mut content = self.lines.join(ending);
        if self.trailing_newline && !self.lines.is_empty() {
            content.push_str(ending);
        }
        content
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Drops every line referring to `package`, keeping the others in order.
    ///
    /// # Returns
    /// * `Vec<String>` - The removed lines, in their original order
    pub fn remove_package(&mut self, package: &str, mode: MatchMode) -> Vec<String> {
        let (removed, kept): (Vec<String>, Vec<String>) = std::mem::take(&mut self.lines)
            .into_iter()
            .partition(|line| line_matches(line, package, mode));
        self.lines = kept;
        for line in &removed {
            debug!("Removed manifest entry '{line}'");
        }
        removed
    }
}

impl FromIterator<String> for Manifest {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self { lines: iter.into_iter().collect(), line_ending: LineEnding::Lf, trailing_newline: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirement_name() {
        assert_eq!(requirement_name("chrisapp==1.0"), Some("chrisapp".to_string()));
        assert_eq!(requirement_name("  numpy >= 1.19 ; python_version > '3'"), Some("numpy".to_string()));
        assert_eq!(requirement_name("pkg[extra]~=2.0"), Some("pkg".to_string()));
        assert_eq!(requirement_name("chrisapp @ file:///src/chrisapp"), Some("chrisapp".to_string()));
        assert_eq!(
            requirement_name("git+https://github.com/FNNDSC/chrisapp.git#egg=chrisapp"),
            Some("chrisapp".to_string())
        );
        assert_eq!(
            requirement_name("chrisapp @ git+https://github.com/FNNDSC/chrisapp.git"),
            Some("chrisapp".to_string())
        );
        assert_eq!(
            requirement_name("chrisapp[dev] @ https://example.com/chrisapp-1.1.7.tar.gz"),
            Some("chrisapp".to_string())
        );
        assert_eq!(
            requirement_name("git+https://github.com/FNNDSC/chrisapp.git@master"),
            Some("chrisapp".to_string())
        );
        assert_eq!(
            requirement_name("git+ssh://git@github.com/FNNDSC/chrisapp.git@refs/tags/v1.1.7"),
            Some("chrisapp".to_string())
        );
        assert_eq!(
            requirement_name("-e git+https://github.com/FNNDSC/chrisapp.git@master"),
            Some("chrisapp".to_string())
        );
        assert_eq!(requirement_name("-e ./chrisapp"), None);
        assert_eq!(requirement_name("https://example.com/pkg.tar.gz"), None);
        assert_eq!(requirement_name("# pinned for chrisapp"), None);
        assert_eq!(requirement_name("-r base.txt"), None);
        assert_eq!(requirement_name(""), None);
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("ChrisApp"), "chrisapp");
        assert_eq!(normalize_name("my_pkg.name"), "my-pkg-name");
        assert_eq!(normalize_name("a__-b"), "a-b");
    }

    #[test]
    fn test_trailing_newline_is_preserved() {
        assert_eq!(Manifest::parse("a\nb\n").serialize(), "a\nb\n");
        assert_eq!(Manifest::parse("a\nb").serialize(), "a\nb");
        assert_eq!(Manifest::parse("").serialize(), "");
        assert_eq!(Manifest::parse("a\r\nb\r\n").serialize(), "a\r\nb\r\n");
    }
}
