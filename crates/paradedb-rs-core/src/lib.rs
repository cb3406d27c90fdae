//! # paradedb-rs-core
//!
//! Core types shared by the paradedb-rs crates: the error taxonomy, SQL
//! literal and identifier escaping, the bound-parameter [`Value`] type,
//! settings, and logging setup.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`sql`] - Literal escaping, identifier quoting, number formatting
//! - [`value`] - Bound parameters and row cells
//! - [`settings`] - Defaults and global configuration
//! - [`settings_loader`] - TOML/JSON/env loading
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod sql;
pub mod value;

// Re-export the most commonly used types at the crate root.
pub use error::{ErrorCategory, ParadeError, ParadeResult};
pub use settings::{Settings, SETTINGS};
pub use value::Value;
