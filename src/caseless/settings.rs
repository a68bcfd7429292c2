//! Layered settings for map defaults.
//!
//! `defaults/caseless.default.toml` is embedded into the library, so a
//! [`Loader`] always starts from a complete set of values. Each later layer
//! (a file, a TOML snippet or a typed override for one [`Flavor`]) only needs
//! to name what it changes.

use super::cases::Case;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

const DEFAULT_TOML: &str = include_str!("../../defaults/caseless.default.toml");

/// Top-level settings
#[derive(Debug, Clone, Deserialize)]
pub struct MapSettings {
    /// Defaults for [`NormalizingMap::from_settings`](super::map::NormalizingMap::from_settings)
    pub map: FlavorSettings,
    /// Defaults for [`AttrMap::from_settings`](super::attr::AttrMap::from_settings)
    pub attr: FlavorSettings,
}

impl MapSettings {
    pub fn flavor(&self, flavor: Flavor) -> &FlavorSettings {
        match flavor {
            Flavor::Map => &self.map,
            Flavor::Attr => &self.attr,
        }
    }
}

/// Case family and key constraint of one kind of map
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FlavorSettings {
    pub case: Case,
    pub keys_must_be_string: bool,
}

/// The kind of map a settings section configures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    /// `[map]`: plain normalizing maps
    Map,
    /// `[attr]`: attribute-exposing maps
    Attr,
}

impl Flavor {
    fn section(self) -> &'static str {
        match self {
            Flavor::Map => "map",
            Flavor::Attr => "attr",
        }
    }
}

/// Builds [`MapSettings`] from the embedded defaults plus caller layers.
/// Later layers win.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
    layers: Vec<String>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self {
            builder,
            layers: vec!["defaults".to_string()],
        }
    }

    /// Layer a TOML settings file. Building fails if it does not exist.
    pub fn file(self, path: impl AsRef<Path>) -> Self {
        self.add_file(path.as_ref(), true)
    }

    /// Layer a TOML settings file if it exists.
    pub fn file_if_exists(self, path: impl AsRef<Path>) -> Self {
        self.add_file(path.as_ref(), false)
    }

    /// Layer settings from TOML text.
    pub fn toml(mut self, text: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(text, FileFormat::Toml));
        self.layers.push("inline toml".to_string());
        self
    }

    /// Override the case family of one flavor.
    pub fn case(self, flavor: Flavor, case: Case) -> Result<Self, ConfigError> {
        self.set(flavor, "case", case.name())
    }

    /// Override the string-key constraint of one flavor.
    pub fn keys_must_be_string(self, flavor: Flavor, on: bool) -> Result<Self, ConfigError> {
        self.set(flavor, "keys_must_be_string", on)
    }

    pub fn build(self) -> Result<MapSettings, ConfigError> {
        debug!(layers = ?self.layers, "building map settings");
        self.builder.build()?.try_deserialize()
    }

    fn add_file(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path)
            .format(FileFormat::Toml)
            .required(required);
        self.builder = self.builder.add_source(source);
        self.layers.push(path.display().to_string());
        self
    }

    fn set<V>(mut self, flavor: Flavor, field: &str, value: V) -> Result<Self, ConfigError>
    where
        V: Into<config::Value>,
    {
        let key = format!("{}.{}", flavor.section(), field);
        self.builder = self.builder.set_override(key.as_str(), value)?;
        self.layers.push(key);
        Ok(self)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings with nothing layered over the embedded defaults
pub fn load_defaults() -> Result<MapSettings, ConfigError> {
    Loader::new().build()
}
