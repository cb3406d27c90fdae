//! Query building and compilation.
//!
//! - [`expressions`] - Search expressions, the `PQ` tree, similarity and annotations
//! - [`lookups`] - Q objects and lookup types for filtering
//! - [`compiler`] - Query snapshot and SQL compilation
//! - [`queryset`] - `SearchQuerySet` for lazy query building

pub mod compiler;
pub mod expressions;
pub mod lookups;
pub mod queryset;

pub use compiler::{FromValue, OrderBy, Query, Row, SelectColumn, SqlCompiler, WhereNode};
pub use lookups::{Lookup, Q};
pub use queryset::SearchQuerySet;
