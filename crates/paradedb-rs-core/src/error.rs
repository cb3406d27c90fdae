//! Core error types for paradedb-rs.
//!
//! Every failure in this workspace is a programmer-input error raised while a
//! search expression, index definition, or facet request is being built or
//! first inspected. Nothing here is transient, so nothing is ever retried.
//! The taxonomy is a single [`ParadeError`] enum whose variants are grouped
//! into [`ErrorCategory`] buckets.

use thiserror::Error;

/// Broad classification of a [`ParadeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The shape of an argument violates a compilation rule.
    ArgumentShape,
    /// The in-progress query is missing something the operation needs.
    Precondition,
    /// Settings could not be loaded or are inconsistent.
    Configuration,
    /// A JSON payload could not be encoded or decoded.
    Serialization,
    /// Reading a settings or DSL file failed.
    Io,
}

/// The primary error type for paradedb-rs.
///
/// Messages always name the violated rule and, where one exists, the
/// offending field or argument.
#[derive(Error, Debug)]
pub enum ParadeError {
    // ── Argument shape ───────────────────────────────────────────────

    /// A wrapper-level `operator`, `tokenizer`, or scoring option was applied
    /// to something other than plain string terms.
    #[error("Incompatible operator combination: {0}")]
    IncompatibleOperatorCombination(String),

    /// Fuzzy leaves in one tree use different match operators.
    #[error("Mixed fuzzy operators: all Fuzzy terms must use the same operator (found {found})")]
    MixedFuzzyOperators {
        /// The distinct operators that were found, comma separated.
        found: String,
    },

    /// More than one bare `Proximity` leaf appeared in one tree.
    #[error(
        "Multiple proximity terms: found {count} Proximity leaves; combine them with ProximityArray"
    )]
    MultipleProximityTerms {
        /// How many bare proximity leaves the tree contained.
        count: usize,
    },

    /// Tokenizer configuration keys were supplied without an explicit tokenizer,
    /// or a tokenizer option is otherwise unusable.
    #[error("Invalid tokenizer config for field '{field}': {reason}")]
    InvalidTokenizerConfig {
        /// The field (or `field.json_key`) the configuration belongs to.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Single- and multi-tokenizer shapes were mixed for one field.
    #[error("Malformed tokenizer list for field '{field}': {reason}")]
    MalformedTokenizerList {
        /// The offending field.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A facet request named the same field twice.
    #[error("Duplicate facet field '{0}': facet fields must be unique")]
    DuplicateFacetField(String),

    /// Any other argument that fails validation (ranges, empty lists, identifiers).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ── Preconditions ────────────────────────────────────────────────

    /// Faceting with rows requires an explicit ordering and a row limit.
    #[error("Missing ordering for facets: facets with include_rows require order_by() and a LIMIT")]
    MissingOrderingForFacets,

    /// Faceting requires a ParadeDB search predicate in the WHERE clause.
    #[error(
        "Missing search operator for facets: the query must contain a ParadeDB operator in its WHERE clause"
    )]
    MissingSearchOperatorForFacets,

    // ── Configuration ────────────────────────────────────────────────

    /// A settings value is missing or could not be parsed.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Serialization ────────────────────────────────────────────────

    /// A JSON payload could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ParadeError {
    /// Returns the category this error belongs to.
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::IncompatibleOperatorCombination(_)
            | Self::MixedFuzzyOperators { .. }
            | Self::MultipleProximityTerms { .. }
            | Self::InvalidTokenizerConfig { .. }
            | Self::MalformedTokenizerList { .. }
            | Self::DuplicateFacetField(_)
            | Self::InvalidArgument(_) => ErrorCategory::ArgumentShape,
            Self::MissingOrderingForFacets | Self::MissingSearchOperatorForFacets => {
                ErrorCategory::Precondition
            }
            Self::ConfigurationError(_) => ErrorCategory::Configuration,
            Self::SerializationError(_) => ErrorCategory::Serialization,
            Self::IoError(_) => ErrorCategory::Io,
        }
    }

    /// Shorthand for [`ParadeError::InvalidArgument`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

impl From<serde_json::Error> for ParadeError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// A convenience type alias for `Result<T, ParadeError>`.
pub type ParadeResult<T> = Result<T, ParadeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_shape_category() {
        assert_eq!(
            ParadeError::DuplicateFacetField("category".into()).category(),
            ErrorCategory::ArgumentShape
        );
        assert_eq!(
            ParadeError::MultipleProximityTerms { count: 2 }.category(),
            ErrorCategory::ArgumentShape
        );
        assert_eq!(
            ParadeError::invalid("slop must be >= 0").category(),
            ErrorCategory::ArgumentShape
        );
    }

    #[test]
    fn test_precondition_category() {
        assert_eq!(
            ParadeError::MissingOrderingForFacets.category(),
            ErrorCategory::Precondition
        );
        assert_eq!(
            ParadeError::MissingSearchOperatorForFacets.category(),
            ErrorCategory::Precondition
        );
    }

    #[test]
    fn test_messages_name_the_offender() {
        let err = ParadeError::InvalidTokenizerConfig {
            field: "description".into(),
            reason: "filters given but no tokenizer".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("description"));
        assert!(msg.contains("no tokenizer"));

        let err = ParadeError::DuplicateFacetField("category".into());
        assert!(err.to_string().contains("'category'"));
        assert!(err.to_string().contains("unique"));
    }

    #[test]
    fn test_mixed_fuzzy_message() {
        let err = ParadeError::MixedFuzzyOperators {
            found: "AND, TERM".into(),
        };
        assert!(err
            .to_string()
            .contains("all Fuzzy terms must use the same operator"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: ParadeError = io_err.into();
        assert_eq!(err.category(), ErrorCategory::Io);
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ParadeError = json_err.into();
        assert_eq!(err.category(), ErrorCategory::Serialization);
    }
}
