//! # paradedb-rs
//!
//! ParadeDB full-text search for Rust.
//!
//! This is the meta-crate that re-exports the member crates behind cargo
//! features. Depend on `paradedb-rs` for everything, or on individual crates
//! for finer-grained control.
//!
//! # Examples
//!
//! ```
//! # #[cfg(feature = "full")]
//! # {
//! use paradedb_rs::prelude::*;
//!
//! let qs = SearchQuerySet::new("products")
//!     .search("description", ParadeDB::new(PQ::term("shoes") | PQ::term("boots")))
//!     .unwrap()
//!     .limit(10);
//! let (sql, _) = qs.sql().unwrap();
//! assert!(sql.contains("\"description\" ||| ARRAY['shoes', 'boots']"));
//!
//! let index = Bm25Index::new("products_idx", "id")
//!     .field("id", FieldSpec::plain())
//!     .unwrap();
//! assert!(index.create_sql("products").unwrap().starts_with("CREATE INDEX"));
//! # }
//! ```

/// Errors, escaping helpers, settings, and logging.
pub use paradedb_rs_core as core;

/// Search expressions, the query compiler, facets, and diagnostics.
#[cfg(feature = "search")]
pub use paradedb_rs_search as search;

/// BM25 index definitions and DDL.
#[cfg(feature = "indexes")]
pub use paradedb_rs_indexes as indexes;

pub use paradedb_rs_core::{ParadeError, ParadeResult, Settings, Value, SETTINGS};

/// The most commonly used types.
pub mod prelude {
    pub use paradedb_rs_core::logging::setup_logging;
    pub use paradedb_rs_core::{ParadeError, ParadeResult, Settings, Value};

    #[cfg(feature = "search")]
    pub use paradedb_rs_search::{
        All, FacetOrder, FacetRequest, FacetResult, Facets, Fuzzy, Lookup, Match, MatchOperator,
        MoreLikeThis, OrderBy, ParadeDB, Parse, Phrase, PhrasePrefix, Proximity, ProximityArray,
        ProximityRegex, RangeTerm, Regex, RegexPhrase, Score, SearchQuerySet, Snippet, Snippets,
        Term, PQ, Q,
    };

    #[cfg(feature = "indexes")]
    pub use paradedb_rs_indexes::{Bm25Index, FastKind, FieldSpec, TokenizerSpec};
}
