//! Loading [`Settings`] from TOML or JSON documents and the environment.
//!
//! A document only needs the keys it changes; everything else keeps its
//! default. Environment variables are applied last by the `*_with_env`
//! loaders and by [`from_env`].
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `PARADEDB_DEBUG` | `debug` |
//! | `PARADEDB_LOG_LEVEL` | `log_level` |
//! | `PARADEDB_KEY_FIELD` | `default_key_field` |
//! | `PARADEDB_FACET_SIZE` | `facet_size` (`none` clears it) |
//! | `PARADEDB_FACET_ORDER` | `facet_order` (`none` clears it) |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use paradedb_rs_core::settings_loader;
//!
//! let settings = settings_loader::from_file("config/paradedb.toml").unwrap();
//! let settings = settings_loader::from_json_file_with_env("config/paradedb.json").unwrap();
//! ```

use std::path::Path;

use crate::error::ParadeError;
use crate::settings::Settings;

/// A settings document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Picks the format from a `.toml` or `.json` extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
        }
    }

    /// Parses a document into a JSON tree.
    fn parse(self, text: &str) -> Result<serde_json::Value, ParadeError> {
        let parsed = match self {
            Self::Toml => toml::from_str::<serde_json::Value>(text).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str::<serde_json::Value>(text).map_err(|e| e.to_string()),
        };
        parsed.map_err(|e| {
            ParadeError::ConfigurationError(format!("Failed to parse {}: {e}", self.name()))
        })
    }
}

/// Loads settings from a document in `format`.
///
/// Keys missing from the document keep their default values; nested tables
/// such as `extra` are merged key by key.
pub fn from_str(format: ConfigFormat, text: &str) -> Result<Settings, ParadeError> {
    let mut tree = serde_json::to_value(Settings::default())?;
    overlay(&mut tree, format.parse(text)?);
    serde_json::from_value(tree).map_err(|e| {
        ParadeError::ConfigurationError(format!(
            "Invalid {} settings: {e}",
            format.name()
        ))
    })
}

/// Loads settings from a `.toml` or `.json` file.
pub fn from_file(path: impl AsRef<Path>) -> Result<Settings, ParadeError> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path).ok_or_else(|| {
        ParadeError::ConfigurationError(format!(
            "Cannot tell the settings format of '{}'",
            path.display()
        ))
    })?;
    load_file(path, format)
}

/// Loads settings from a TOML string.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, ParadeError> {
    from_str(ConfigFormat::Toml, toml_str)
}

/// Loads settings from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, ParadeError> {
    load_file(path.as_ref(), ConfigFormat::Toml)
}

/// Loads settings from a TOML file, then applies environment overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, ParadeError> {
    from_toml_file(path).map(with_env)
}

/// Loads settings from a JSON string.
pub fn from_json_str(json_str: &str) -> Result<Settings, ParadeError> {
    from_str(ConfigFormat::Json, json_str)
}

/// Loads settings from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, ParadeError> {
    load_file(path.as_ref(), ConfigFormat::Json)
}

/// Loads settings from a JSON file, then applies environment overrides.
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> Result<Settings, ParadeError> {
    from_json_file(path).map(with_env)
}

/// Defaults plus environment overrides.
pub fn from_env() -> Settings {
    with_env(Settings::default())
}

/// Applies `PARADEDB_*` environment overrides.
///
/// Unparseable numbers are ignored and the previous value is kept.
pub fn apply_env_overrides(settings: &mut Settings) {
    let var = |name: &str| std::env::var(name).ok();

    if let Some(val) = var("PARADEDB_DEBUG") {
        settings.debug = matches!(val.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes");
    }
    if let Some(val) = var("PARADEDB_LOG_LEVEL") {
        settings.log_level = val;
    }
    if let Some(val) = var("PARADEDB_KEY_FIELD") {
        let val = val.trim();
        if !val.is_empty() {
            settings.default_key_field = val.to_string();
        }
    }
    if let Some(val) = var("PARADEDB_FACET_SIZE") {
        let val = val.trim();
        if is_none(val) {
            settings.facet_size = None;
        } else if let Ok(size) = val.parse::<u32>() {
            settings.facet_size = Some(size);
        }
    }
    if let Some(val) = var("PARADEDB_FACET_ORDER") {
        let val = val.trim();
        settings.facet_order = (!is_none(val)).then(|| val.to_string());
    }
}

fn with_env(mut settings: Settings) -> Settings {
    apply_env_overrides(&mut settings);
    settings
}

fn is_none(val: &str) -> bool {
    val.is_empty() || val.eq_ignore_ascii_case("none")
}

fn load_file(path: &Path, format: ConfigFormat) -> Result<Settings, ParadeError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        ParadeError::ConfigurationError(format!(
            "Failed to read {} file '{}': {e}",
            format.name(),
            path.display()
        ))
    })?;
    from_str(format, &text)
}

/// Writes `layer` over `base`. Objects merge recursively; anything else
/// replaces the base value.
fn overlay(base: &mut serde_json::Value, layer: serde_json::Value) {
    match (base, layer) {
        (serde_json::Value::Object(base_map), serde_json::Value::Object(layer_map)) => {
            for (key, value) in layer_map {
                match base_map.get_mut(&key) {
                    Some(slot) => overlay(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
