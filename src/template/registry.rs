//! Module registry: parse each module once, share it read-only

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::config::WeaverConfig;
use crate::error::ParseError;
use crate::parser::{parse_module, ParsedModule};

/// Errors that can occur while loading modules
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No module file for this name
    #[error("can't find module '{name}' (looked for {path})")]
    NotFound { name: String, path: PathBuf },

    /// Error reading a module file
    #[error("error reading module file {path}: {message}")]
    FileRead { path: PathBuf, message: String },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Cache of parsed modules keyed by name
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, Arc<ParsedModule>>,
    config: WeaverConfig,
}

impl ModuleRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry that loads module files according to `config`
    pub fn with_config(config: WeaverConfig) -> Self {
        Self {
            modules: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &WeaverConfig {
        &self.config
    }

    /// Parse `source` as module `name` and cache it
    ///
    /// A name that is already cached is returned as-is without re-parsing.
    pub fn register_source(&mut self, name: &str, source: &str) -> Result<Arc<ParsedModule>, RegistryError> {
        if let Some(module) = self.modules.get(name) {
            return Ok(Arc::clone(module));
        }
        let module = Arc::new(parse_module(name, source)?);
        self.modules.insert(name.to_string(), Arc::clone(&module));
        Ok(module)
    }

    /// Insert an already parsed module, replacing any module with the same name
    pub fn insert(&mut self, module: ParsedModule) -> Arc<ParsedModule> {
        let module = Arc::new(module);
        self.modules.insert(module.name.clone(), Arc::clone(&module));
        module
    }

    /// Get a cached module by name
    pub fn get(&self, name: &str) -> Option<Arc<ParsedModule>> {
        self.modules.get(name).cloned()
    }

    /// Check if a module is cached
    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Get all cached module names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(|s| s.as_str())
    }

    /// Path a module file is loaded from
    pub fn module_path(&self, name: &str) -> PathBuf {
        self.config.module_path(name)
    }

    /// Get a module, loading and parsing its file on first use
    pub fn get_module(&mut self, name: &str) -> Result<Arc<ParsedModule>, RegistryError> {
        if let Some(module) = self.get(name) {
            return Ok(module);
        }

        let path = self.module_path(name);
        let source = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => RegistryError::NotFound {
                name: name.to_string(),
                path: path.clone(),
            },
            _ => RegistryError::FileRead {
                path: path.clone(),
                message: e.to_string(),
            },
        })?;

        debug!(module = name, path = %path.display(), "loading module");
        self.register_source(name, &source)
    }
}
