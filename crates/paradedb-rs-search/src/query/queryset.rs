//! A builder for search queries.
//!
//! [`SearchQuerySet`] accumulates filters, ordering, limits and annotations
//! into a [`Query`] snapshot and compiles it on demand. Search predicates are
//! validated when they are added, so a malformed search fails at the call
//! that introduced it rather than when SQL is produced.
//!
//! # Examples
//!
//! ```
//! use paradedb_rs_search::query::queryset::SearchQuerySet;
//! use paradedb_rs_search::query::compiler::OrderBy;
//! use paradedb_rs_search::query::expressions::{ParadeDB, Score};
//!
//! let qs = SearchQuerySet::new("products")
//!     .search("description", ParadeDB::new("shoes"))
//!     .unwrap()
//!     .annotate("score", Score::new("id"))
//!     .order_by(vec![OrderBy::desc("score")])
//!     .limit(5);
//! let (sql, _) = qs.sql().unwrap();
//! assert_eq!(
//!     sql,
//!     "SELECT *, pdb.score(\"id\") AS \"score\" FROM \"products\" WHERE \"description\" &&& 'shoes' ORDER BY \"score\" DESC LIMIT 5"
//! );
//! ```

use paradedb_rs_core::{ParadeResult, Settings, Value};

use super::compiler::{OrderBy, Query, SelectColumn, SqlCompiler, WhereNode};
use super::expressions::{Annotation, MoreLikeThis, ParadeDB};
use super::lookups::{Lookup, Q};
use crate::facets::{FacetQuery, FacetRequest};

/// A lazily compiled search query over one table.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuerySet {
    query: Query,
}

impl SearchQuerySet {
    /// Creates a queryset over `table` keyed on `id`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            query: Query::new(table),
        }
    }

    /// Creates a queryset using the configured default key field.
    pub fn from_settings(table: impl Into<String>, settings: &Settings) -> Self {
        Self::new(table).key_field(settings.default_key_field.clone())
    }

    /// Sets the key field used by similarity predicates.
    #[must_use]
    pub fn key_field(mut self, field: impl Into<String>) -> Self {
        self.query.key_field = field.into();
        self
    }

    fn and_where(mut self, node: WhereNode) -> ParadeResult<Self> {
        node.validate()?;
        self.query.where_clause = Some(match self.query.where_clause.take() {
            Some(existing) => WhereNode::And(vec![existing, node]),
            None => node,
        });
        Ok(self)
    }

    // ── Filtering methods ────────────────────────────────────────────

    /// Adds a lookup on one field.
    pub fn filter(self, field: impl Into<String>, lookup: Lookup) -> ParadeResult<Self> {
        self.filter_q(Q::filter(field, lookup))
    }

    /// Adds a composed filter.
    pub fn filter_q(self, q: Q) -> ParadeResult<Self> {
        self.and_where(WhereNode::from_q(&q))
    }

    /// Adds an exclusion (NOT) condition.
    pub fn exclude(self, q: Q) -> ParadeResult<Self> {
        self.and_where(WhereNode::Not(Box::new(WhereNode::from_q(&q))))
    }

    /// Adds a ParadeDB search on a field.
    pub fn search(self, field: impl Into<String>, search: impl Into<ParadeDB>) -> ParadeResult<Self> {
        self.filter_q(Q::search(field, search))
    }

    /// Adds a similarity predicate on the key field.
    pub fn more_like_this(self, mlt: MoreLikeThis) -> ParadeResult<Self> {
        self.filter_q(Q::more_like_this(mlt))
    }

    // ── Shaping methods ──────────────────────────────────────────────

    /// Sets the ordering.
    #[must_use]
    pub fn order_by(mut self, fields: Vec<OrderBy>) -> Self {
        self.query.order_by = fields;
        self
    }

    /// Selects specific columns instead of `*`.
    #[must_use]
    pub fn values(mut self, fields: Vec<&str>) -> Self {
        self.query.select = fields
            .into_iter()
            .map(|f| SelectColumn::Column(f.to_string()))
            .collect();
        self
    }

    /// Sets the LIMIT.
    #[must_use]
    pub fn limit(mut self, n: usize) -> Self {
        self.query.limit = Some(n);
        self
    }

    /// Sets the OFFSET.
    #[must_use]
    pub fn offset(mut self, n: usize) -> Self {
        self.query.offset = Some(n);
        self
    }

    /// Adds a select-list annotation under `alias`. Re-using an alias
    /// replaces the earlier annotation.
    #[must_use]
    pub fn annotate(mut self, alias: impl Into<String>, annotation: impl Into<Annotation>) -> Self {
        let alias = alias.into();
        let annotation = annotation.into();
        if let Some(slot) = self.query.annotations.iter_mut().find(|(a, _)| *a == alias) {
            slot.1 = annotation;
        } else {
            self.query.annotations.push((alias, annotation));
        }
        self
    }

    // ── Compilation ──────────────────────────────────────────────────

    /// The query snapshot.
    pub const fn query(&self) -> &Query {
        &self.query
    }

    /// Compiles the query into SQL and parameters.
    pub fn sql(&self) -> ParadeResult<(String, Vec<Value>)> {
        SqlCompiler::new().compile_select(&self.query)
    }

    /// Plans a faceted query.
    ///
    /// Fails with `MissingSearchOperatorForFacets` when no ParadeDB predicate
    /// is present, and with `MissingOrderingForFacets` when rows are requested
    /// without an ordering and limit.
    pub fn facets(&self, request: &FacetRequest) -> ParadeResult<FacetQuery> {
        FacetQuery::plan(&self.query, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::expressions::{Fuzzy, Snippet};
    use paradedb_rs_core::ParadeError;

    #[test]
    fn test_filters_are_anded() {
        let qs = SearchQuerySet::new("products")
            .search("description", ParadeDB::new("shoes"))
            .unwrap()
            .filter("rating", Lookup::Gte(Value::from(4)))
            .unwrap();
        let (sql, params) = qs.sql().unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM \"products\" WHERE (\"description\" &&& 'shoes' AND \"rating\" >= $1)"
        );
        assert_eq!(params, vec![Value::Int(4)]);
    }

    #[test]
    fn test_exclude() {
        let qs = SearchQuerySet::new("products")
            .search("description", ParadeDB::new("shoes"))
            .unwrap()
            .exclude(Q::filter("in_stock", Lookup::Exact(Value::from(false))))
            .unwrap();
        let (sql, _) = qs.sql().unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM \"products\" WHERE (\"description\" &&& 'shoes' AND NOT (\"in_stock\" = $1))"
        );
    }

    #[test]
    fn test_invalid_search_fails_at_filter_time() {
        let err = SearchQuerySet::new("products")
            .search("description", ParadeDB::new(Fuzzy::new("x").distance(7)))
            .unwrap_err();
        assert!(matches!(err, ParadeError::InvalidArgument(_)));
    }

    #[test]
    fn test_more_like_this_with_settings_key() {
        let settings = Settings {
            default_key_field: "product_id".into(),
            ..Settings::default()
        };
        let qs = SearchQuerySet::from_settings("products", &settings)
            .more_like_this(MoreLikeThis::id(7))
            .unwrap();
        let (sql, _) = qs.sql().unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM \"products\" WHERE \"product_id\" @@@ pdb.more_like_this(7)"
        );
    }

    #[test]
    fn test_values_and_annotations() {
        let qs = SearchQuerySet::new("products")
            .values(vec!["id"])
            .annotate("snippet", Snippet::new("description"))
            .annotate("snippet", Snippet::new("name"));
        let (sql, _) = qs.sql().unwrap();
        assert_eq!(
            sql,
            "SELECT \"id\", pdb.snippet(\"name\") AS \"snippet\" FROM \"products\""
        );
    }
}
