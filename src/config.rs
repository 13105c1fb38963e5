//! Configuration for locating module files
//!
//! Loaded from TOML:
//!
//! ```toml
//! [modules]
//! directory = "Shader Templates 2/Modules"
//! prefix = "Module_"
//! extension = "txt"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

const DEFAULT_PREFIX: &str = "Module_";
const DEFAULT_EXTENSION: &str = "txt";

/// Where module files live and how they are named
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeaverConfig {
    /// Base directory for module files; relative paths resolve from the working directory
    pub modules_dir: Option<PathBuf>,
    /// File name prefix placed before the module name
    pub file_prefix: String,
    /// File extension, without the dot
    pub file_extension: String,
}

/// TOML structure for deserializing configuration
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    modules: Option<TomlModules>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlModules {
    directory: Option<PathBuf>,
    prefix: Option<String>,
    extension: Option<String>,
}

impl Default for WeaverConfig {
    fn default() -> Self {
        Self {
            modules_dir: None,
            file_prefix: DEFAULT_PREFIX.to_string(),
            file_extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl WeaverConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string; missing keys keep their defaults
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let mut config = Self::default();

        if let Some(modules) = parsed.modules {
            config.modules_dir = modules.directory;
            if let Some(prefix) = modules.prefix {
                config.file_prefix = prefix;
            }
            if let Some(extension) = modules.extension {
                config.file_extension = extension;
            }
        }
        Ok(config)
    }

    /// Set the modules directory
    pub fn with_modules_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.modules_dir = Some(dir.into());
        self
    }

    /// Set the file name prefix
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    /// Set the file extension
    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = extension.into();
        self
    }

    /// File name for a module, e.g. `Module_Rim.txt`
    pub fn file_name(&self, module: &str) -> String {
        if self.file_extension.is_empty() {
            format!("{}{}", self.file_prefix, module)
        } else {
            format!("{}{}.{}", self.file_prefix, module, self.file_extension)
        }
    }

    /// Module name for a module file path, stripping the configured prefix
    ///
    /// A file without the prefix is named after its whole stem.
    pub fn module_name(&self, path: &Path) -> String {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        match stem.strip_prefix(self.file_prefix.as_str()) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => stem,
        }
    }

    /// Full path for a module file
    pub fn module_path(&self, module: &str) -> PathBuf {
        let file_name = self.file_name(module);
        match &self.modules_dir {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}
