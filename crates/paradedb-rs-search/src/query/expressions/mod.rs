//! Search expressions, the composition tree, similarity queries and
//! annotation functions.
//!
//! # Submodules
//!
//! - [`nodes`] - Leaf search expressions (Match, Phrase, Fuzzy, Proximity, ...)
//! - [`pq`] - The `PQ` boolean composition tree and its compiler
//! - [`paradedb`] - The `ParadeDB` predicate wrapper
//! - [`more_like_this`] - Similarity queries
//! - [`functions`] - Score, snippet and aggregate annotations

pub mod functions;
pub mod more_like_this;
pub mod nodes;
pub mod paradedb;
pub mod pq;

pub use self::functions::{Agg, Annotation, Score, Snippet, SnippetPositions, SnippetSort, Snippets};
pub use self::more_like_this::MoreLikeThis;
pub use self::nodes::{
    All, Expr, Fuzzy, Match, MatchOperator, Parse, Phrase, PhrasePrefix, Proximity, ProximityArray,
    ProximityRegex, ProximityTarget, RangeRelation, RangeScalar, RangeTerm, RangeType, Regex,
    RegexPhrase, Scoring, Term,
};
pub use self::paradedb::ParadeDB;
pub use self::pq::PQ;
