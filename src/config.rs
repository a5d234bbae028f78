//! Template configuration handling.
//! Loads the scaffolding tool's configuration (`cookiecutter.json` or a YAML
//! equivalent), edits the copy-without-render list and writes it back in the
//! format it was read from.

use crate::constants::{APP_NAME_KEY, COPY_WITHOUT_RENDER_KEY};
use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use indexmap::IndexMap;
use log::debug;
use serde_json::Value;
use std::path::Path;

/// On-disk format of a template configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Detects the format from the file extension.
    ///
    /// Returns `None` for unknown extensions, in which case parsing tries
    /// JSON first and falls back to YAML.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("json") => Some(Self::Json),
            Some("yml") | Some("yaml") => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Ordered key/value mapping read from a template configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateConfig {
    values: IndexMap<String, Value>,
    format: ConfigFormat,
}

fn parse_json(content: &str) -> Result<IndexMap<String, Value>> {
    serde_json::from_str(content)
        .map_err(|e| Error::ConfigParseError(format!("Invalid JSON configuration: {e}")))
}

fn parse_yaml(content: &str) -> Result<IndexMap<String, Value>> {
    serde_yaml::from_str(content)
        .map_err(|e| Error::ConfigParseError(format!("Invalid YAML configuration: {e}")))
}

impl TemplateConfig {
    /// Parses configuration content.
    ///
    /// # Arguments
    /// * `content` - Raw configuration text
    /// * `format` - Known format, or `None` to try JSON then YAML
    ///
    /// # Errors
    /// * `Error::ConfigParseError` if the content is not a mapping in the given format
    pub fn parse(content: &str, format: Option<ConfigFormat>) -> Result<Self> {
        let (values, format) = match format {
            Some(ConfigFormat::Json) => (parse_json(content)?, ConfigFormat::Json),
            Some(ConfigFormat::Yaml) => (parse_yaml(content)?, ConfigFormat::Yaml),
            None => match parse_json(content) {
                Ok(values) => (values, ConfigFormat::Json),
                Err(_) => (parse_yaml(content)?, ConfigFormat::Yaml),
            },
        };
        Ok(Self { values, format })
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    /// * `Error::NotFoundError` if the file does not exist
    /// * `Error::ConfigParseError` if the file is malformed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::not_found(path));
        }
        debug!("Loading template configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, ConfigFormat::from_path(path))
    }

    /// Serializes the configuration in its original format.
    pub fn serialize(&self) -> Result<String> {
        match self.format {
            ConfigFormat::Json => serde_json::to_string_pretty(&self.values)
                .map(|mut s| {
                    s.push('\n');
                    s
                })
                .map_err(|e| Error::ConfigParseError(e.to_string())),
            ConfigFormat::Yaml => serde_yaml::to_string(&self.values)
                .map_err(|e| Error::ConfigParseError(e.to_string())),
        }
    }

    /// Writes the configuration back to `path` in its original format.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        debug!("Writing template configuration to {}", path.display());
        std::fs::write(path, self.serialize()?)?;
        Ok(())
    }

    pub fn format(&self) -> ConfigFormat {
        self.format
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn values(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    /// Name of the generated application, if the template declares one.
    pub fn app_name(&self) -> Option<&str> {
        self.values.get(APP_NAME_KEY).and_then(Value::as_str)
    }

    /// Makes sure the copy-without-render list contains `glob`.
    ///
    /// Existing entries are never removed. A missing or null key becomes a
    /// one-element list and a single string is promoted to a list.
    ///
    /// # Returns
    /// * `Result<bool>` - `true` if the glob was added, `false` if it was already present
    ///
    /// # Errors
    /// * `Error::ConfigParseError` if the key holds anything but a list, a string or null
    pub fn add_copy_without_render(&mut self, glob: &str) -> Result<bool> {
        let entry = self
            .values
            .entry(COPY_WITHOUT_RENDER_KEY.to_string())
            .or_insert(Value::Null);

        let (replacement, added) = match &mut *entry {
            Value::Array(items) => {
                if items.iter().any(|item| item.as_str() == Some(glob)) {
                    return Ok(false);
                }
                items.push(Value::String(glob.to_string()));
                return Ok(true);
            }
            Value::String(existing) => {
                let added = existing != glob;
                let mut items = vec![Value::String(existing.clone())];
                if added {
                    items.push(Value::String(glob.to_string()));
                }
                (Value::Array(items), added)
            }
            Value::Null => (Value::Array(vec![Value::String(glob.to_string())]), true),
            other => {
                return Err(Error::ConfigParseError(format!(
                    "'{COPY_WITHOUT_RENDER_KEY}' must be a list of paths, found {other}"
                )))
            }
        };

        *entry = replacement;
        Ok(added)
    }

    /// Returns the copy-without-render patterns in declaration order.
    pub fn copy_without_render(&self) -> Result<Vec<String>> {
        match self.values.get(COPY_WITHOUT_RENDER_KEY) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::String(pattern)) => Ok(vec![pattern.clone()]),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        Error::ConfigParseError(format!(
                            "'{COPY_WITHOUT_RENDER_KEY}' entries must be strings, found {item}"
                        ))
                    })
                })
                .collect(),
            Some(other) => Err(Error::ConfigParseError(format!(
                "'{COPY_WITHOUT_RENDER_KEY}' must be a list of paths, found {other}"
            ))),
        }
    }

    /// Compiles the copy-without-render patterns into a set of globs.
    ///
    /// # Errors
    /// * `Error::ConfigParseError` if a pattern is not a valid glob
    pub fn copy_without_render_globs(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in self.copy_without_render()? {
            builder.add(Glob::new(&pattern).map_err(|e| {
                Error::ConfigParseError(format!("Invalid pattern '{pattern}': {e}"))
            })?);
        }
        builder
            .build()
            .map_err(|e| Error::ConfigParseError(format!("Invalid patterns: {e}")))
    }
}
