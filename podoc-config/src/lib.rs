//! Shared configuration loader for the podoc toolchain.
//!
//! `defaults/podoc.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`PodocConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use podoc_babel::formats::notebook::NotebookOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/podoc.default.toml");

/// Top-level configuration consumed by podoc applications.
#[derive(Debug, Clone, Deserialize)]
pub struct PodocConfig {
    pub notebook: NotebookConfig,
    pub convert: ConvertConfig,
}

/// Kernel information used when reading and writing notebooks.
#[derive(Debug, Clone, Deserialize)]
pub struct NotebookConfig {
    pub language: String,
    pub kernel_name: String,
    pub kernel_display_name: String,
}

impl From<NotebookConfig> for NotebookOptions {
    fn from(config: NotebookConfig) -> Self {
        NotebookOptions {
            language: config.language,
            kernel_name: config.kernel_name,
            kernel_display_name: config.kernel_display_name,
        }
    }
}

impl From<&NotebookConfig> for NotebookOptions {
    fn from(config: &NotebookConfig) -> Self {
        config.clone().into()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    /// Where extracted resources go, relative to the converted file
    pub resources_dir: PathBuf,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<PodocConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<PodocConfig, ConfigError> {
    Loader::new().build()
}
