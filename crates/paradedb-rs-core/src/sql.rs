//! SQL text helpers shared by every compiler in the workspace.
//!
//! All literals embedded in generated SQL pass through [`escape`] or
//! [`quote_literal`]. Escaping uses standard SQL quote doubling; backslashes
//! carry no special meaning and nothing is ever unescaped.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ParadeError, ParadeResult};

/// Doubles every single quote in `text`.
///
/// The result is safe to place between single quotes regardless of input.
///
/// # Examples
///
/// ```
/// use paradedb_rs_core::sql::escape;
///
/// assert_eq!(escape("it's"), "it''s");
/// assert_eq!(escape(r"C:\path"), r"C:\path");
/// ```
pub fn escape(text: &str) -> String {
    text.replace('\'', "''")
}

/// Escapes `text` and wraps it in single quotes.
///
/// # Examples
///
/// ```
/// use paradedb_rs_core::sql::quote_literal;
///
/// assert_eq!(quote_literal("'; DROP TABLE products; --"), "'''; DROP TABLE products; --'");
/// ```
pub fn quote_literal(text: &str) -> String {
    format!("'{}'", escape(text))
}

/// Double-quotes an identifier, doubling any embedded double quote.
///
/// # Examples
///
/// ```
/// use paradedb_rs_core::sql::quote_name;
///
/// assert_eq!(quote_name("tests_product"), "\"tests_product\"");
/// ```
pub fn quote_name(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Returns `true` if `s` is a bare SQL identifier (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn is_identifier(s: &str) -> bool {
    static IDENT: OnceLock<Regex> = OnceLock::new();
    let re = IDENT.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());
    re.is_match(s)
}

/// Validates that `s` can be spliced into SQL unquoted.
///
/// `what` names the argument in the error message.
pub fn ensure_identifier(s: &str, what: &str) -> ParadeResult<()> {
    if is_identifier(s) {
        Ok(())
    } else {
        Err(ParadeError::InvalidArgument(format!(
            "{what} must be a bare identifier, got '{s}'"
        )))
    }
}

/// Renders a float so that it always carries a decimal point.
///
/// # Examples
///
/// ```
/// use paradedb_rs_core::sql::format_float;
///
/// assert_eq!(format_float(2.0), "2.0");
/// assert_eq!(format_float(1.5), "1.5");
/// ```
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Renders a boolean as a SQL keyword.
pub const fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Joins quoted literals into `ARRAY['a', 'b']`.
pub fn literal_array<S: AsRef<str>>(items: &[S]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| quote_literal(s.as_ref())).collect();
    format!("ARRAY[{}]", quoted.join(", "))
}
