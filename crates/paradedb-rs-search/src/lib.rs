//! # paradedb-rs-search
//!
//! Compiles ParadeDB full-text search expressions into PostgreSQL predicate
//! text. Provides the leaf expression types, the [`PQ`](query::expressions::PQ)
//! boolean tree, the [`ParadeDB`](query::expressions::ParadeDB) predicate,
//! similarity queries, annotation functions, facets, and the SQL for the index
//! inspection functions.
//!
//! ## Architecture
//!
//! Expressions are plain values. Composition (`&`, `|`, `!`) builds a tree
//! without validating it; validation runs when the tree is wrapped into a
//! filter or compiled. A [`SearchQuerySet`](query::SearchQuerySet) collects
//! filters into a [`Query`](query::Query) snapshot, and the
//! [`SqlCompiler`](query::SqlCompiler) turns the snapshot into SQL and
//! `$n` parameters. Search text is always spliced as an escaped literal;
//! ordinary lookups bind their values.
//!
//! ## Module Overview
//!
//! - [`query`] - Expressions, lookups, the compiler and the queryset
//! - [`facets`] - Faceted aggregation planning and result extraction
//! - [`diagnostics`] - `pdb.indexes`, `pdb.index_segments`, `pdb.verify_*` SQL

#![allow(clippy::format_push_string)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

pub mod diagnostics;
pub mod facets;
pub mod query;

// Re-export the most commonly used types at the crate root.
pub use diagnostics::{index_segments_sql, indexes_sql, VerifyAllIndexes, VerifyIndex};
pub use facets::{
    Bucket, FacetBuckets, FacetOrder, FacetQuery, FacetRequest, FacetResult, Facets,
};
pub use query::expressions::{
    Agg, All, Annotation, Expr, Fuzzy, Match, MatchOperator, MoreLikeThis, ParadeDB, Parse,
    Phrase, PhrasePrefix, Proximity, ProximityArray, ProximityRegex, ProximityTarget,
    RangeRelation, RangeScalar, RangeTerm, RangeType, Regex, RegexPhrase, Score, Scoring,
    Snippet, SnippetPositions, SnippetSort, Snippets, Term, PQ,
};
pub use query::{Lookup, OrderBy, Query, Row, SearchQuerySet, SqlCompiler, WhereNode, Q};
