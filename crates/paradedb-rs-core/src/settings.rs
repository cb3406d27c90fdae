//! Settings for paradedb-rs.
//!
//! This module provides the [`Settings`] struct, which holds the defaults the
//! search and index builders fall back to, and [`LazySettings`], a
//! globally-accessible, lazily-initialized settings instance.
//!
//! Compilers never consult the global instance on their own. Callers either pass
//! values explicitly or opt in through a `from_settings` constructor.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// The complete set of paradedb-rs settings.
///
/// # Examples
///
/// ```
/// use paradedb_rs_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert_eq!(settings.default_key_field, "id");
/// assert_eq!(settings.facet_size, Some(10));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled. Selects pretty log output.
    pub debug: bool,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log filter (e.g. "info", "paradedb_rs_search=debug").
    pub log_level: String,

    // ── Indexes ──────────────────────────────────────────────────────

    /// Key field used by BM25 indexes and `MoreLikeThis` when none is given.
    pub default_key_field: String,

    // ── Facets ───────────────────────────────────────────────────────

    /// Default bucket count for facet requests. `None` lets the engine decide.
    pub facet_size: Option<u32>,
    /// Default bucket order: one of `count`, `-count`, `key`, `-key`.
    pub facet_order: Option<String>,
    /// Column alias for the single windowed facet aggregate.
    pub facet_alias: String,

    // ── Snippets ─────────────────────────────────────────────────────

    /// Default opening highlight tag for snippets.
    pub snippet_start_tag: Option<String>,
    /// Default closing highlight tag for snippets.
    pub snippet_end_tag: Option<String>,

    // ── Escape hatch ─────────────────────────────────────────────────

    /// Custom settings that don't fit into the above categories.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Core
            debug: true,

            // Logging
            log_level: "info".to_string(),

            // Indexes
            default_key_field: "id".to_string(),

            // Facets
            facet_size: Some(10),
            facet_order: Some("-count".to_string()),
            facet_alias: "_paradedb_facets".to_string(),

            // Snippets
            snippet_start_tag: None,
            snippet_end_tag: None,

            // Extra
            extra: HashMap::new(),
        }
    }
}

/// A lazily-initialized, globally-accessible settings container.
///
/// Call [`configure`](LazySettings::configure) once at startup to set the
/// settings, then use [`get`](LazySettings::get) to access them.
///
/// # Panics
///
/// [`get`](LazySettings::get) panics if settings have not been configured.
/// [`configure`](LazySettings::configure) panics if called more than once.
pub struct LazySettings {
    inner: OnceLock<Settings>,
    fallback: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates a new, unconfigured `LazySettings`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
            fallback: OnceLock::new(),
        }
    }

    /// Configures the global settings. Must be called exactly once.
    ///
    /// # Panics
    ///
    /// Panics if settings have already been configured.
    pub fn configure(&self, settings: Settings) {
        self.inner
            .set(settings)
            .expect("Settings have already been configured");
    }

    /// Returns a reference to the configured settings.
    ///
    /// # Panics
    ///
    /// Panics if settings have not been configured.
    pub fn get(&self) -> &Settings {
        self.inner
            .get()
            .expect("Settings have not been configured. Call SETTINGS.configure() first.")
    }

    /// Returns the configured settings, or the defaults when nothing was configured.
    pub fn get_or_default(&self) -> &Settings {
        self.inner
            .get()
            .unwrap_or_else(|| self.fallback.get_or_init(Settings::default))
    }

    /// Returns `true` if settings have been configured.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// The global settings instance.
pub static SETTINGS: LazySettings = LazySettings::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert!(s.debug);
        assert_eq!(s.log_level, "info");
        assert_eq!(s.default_key_field, "id");
        assert_eq!(s.facet_size, Some(10));
        assert_eq!(s.facet_order.as_deref(), Some("-count"));
        assert_eq!(s.facet_alias, "_paradedb_facets");
        assert!(s.snippet_start_tag.is_none());
        assert!(s.extra.is_empty());
    }

    #[test]
    fn test_lazy_settings_configure_and_get() {
        let lazy = LazySettings::new();
        assert!(!lazy.is_configured());

        let mut settings = Settings::default();
        settings.debug = false;
        settings.default_key_field = "product_id".to_string();

        lazy.configure(settings);
        assert!(lazy.is_configured());
        assert!(!lazy.get().debug);
        assert_eq!(lazy.get().default_key_field, "product_id");
    }

    #[test]
    fn test_get_or_default_unconfigured() {
        let lazy = LazySettings::new();
        assert_eq!(lazy.get_or_default().default_key_field, "id");
        assert!(!lazy.is_configured());
    }

    #[test]
    fn test_get_or_default_prefers_configured() {
        let lazy = LazySettings::new();
        let mut settings = Settings::default();
        settings.facet_size = None;
        lazy.configure(settings);
        assert_eq!(lazy.get_or_default().facet_size, None);
    }

    #[test]
    #[should_panic(expected = "already been configured")]
    fn test_lazy_settings_double_configure_panics() {
        let lazy = LazySettings::new();
        lazy.configure(Settings::default());
        lazy.configure(Settings::default());
    }

    #[test]
    #[should_panic(expected = "not been configured")]
    fn test_lazy_settings_get_before_configure_panics() {
        let lazy = LazySettings::new();
        let _ = lazy.get();
    }

    #[test]
    fn test_settings_json_roundtrip_keeps_extra() {
        let mut s = Settings::default();
        s.extra
            .insert("tenant".to_string(), serde_json::json!("acme"));
        let json = serde_json::to_string(&s).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.extra.get("tenant"), Some(&serde_json::json!("acme")));
    }
}
