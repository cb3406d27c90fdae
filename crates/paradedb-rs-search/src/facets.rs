//! Faceted aggregation.
//!
//! A [`FacetRequest`] describes bucket counts over one or more fields (or a raw
//! aggregation). [`FacetQuery::plan`] checks it against a [`Query`] snapshot
//! and produces SQL in one of two modes:
//!
//! - **with rows** (default): the row query gains windowed
//!   `pdb.agg(...) OVER ()` columns, so rows and buckets arrive together. The
//!   query must carry an ordering and a limit.
//! - **aggregate only**: select list, ordering and limits are dropped and only
//!   the aggregate columns are returned.
//!
//! Both modes need a ParadeDB predicate in the WHERE clause.
//!
//! One requested field is aggregated into a single column and reported in the
//! `{"buckets": [...]}` shape. Several fields get one column each, named
//! `<field>_terms`, and are reported as a map keyed by field name.

use std::fmt;
use std::str::FromStr;

use paradedb_rs_core::logging::compile_span;
use paradedb_rs_core::{ParadeError, ParadeResult, Settings, Value};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};

use crate::query::compiler::{Query, Row, SqlCompiler};
use crate::query::expressions::Agg;

/// Default number of buckets per field.
pub const DEFAULT_FACET_SIZE: u32 = 10;

/// Default column alias for a single aggregate.
pub const DEFAULT_FACET_ALIAS: &str = "_paradedb_facets";

/// Bucket ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetOrder {
    /// Fewest documents first (`count`).
    Count,
    /// Most documents first (`-count`).
    CountDesc,
    /// Keys ascending (`key`).
    Key,
    /// Keys descending (`-key`).
    KeyDesc,
}

impl FacetOrder {
    /// The terms-aggregation `order` object.
    pub fn to_json(self) -> JsonValue {
        match self {
            Self::Count => json!({"_count": "asc"}),
            Self::CountDesc => json!({"_count": "desc"}),
            Self::Key => json!({"_key": "asc"}),
            Self::KeyDesc => json!({"_key": "desc"}),
        }
    }

    /// The shorthand form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::CountDesc => "-count",
            Self::Key => "key",
            Self::KeyDesc => "-key",
        }
    }
}

impl fmt::Display for FacetOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacetOrder {
    type Err = ParadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "count" => Ok(Self::Count),
            "-count" => Ok(Self::CountDesc),
            "key" => Ok(Self::Key),
            "-key" => Ok(Self::KeyDesc),
            _ => Err(ParadeError::invalid(format!(
                "Facet order must be count, -count, key, or -key (got '{s}')"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum FacetSource {
    Fields(Vec<String>),
    Agg(String),
}

/// What to aggregate and how.
///
/// # Examples
///
/// ```
/// use paradedb_rs_search::facets::{FacetOrder, FacetRequest};
///
/// let request = FacetRequest::fields(["category", "brand"])
///     .unwrap()
///     .size(5)
///     .order(FacetOrder::Key)
///     .include_rows(false);
/// assert!(FacetRequest::fields(["category", "category"]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FacetRequest {
    source: FacetSource,
    size: Option<u32>,
    order: Option<FacetOrder>,
    missing: Option<JsonValue>,
    include_rows: bool,
    alias: String,
}

impl FacetRequest {
    fn with_source(source: FacetSource) -> Self {
        Self {
            source,
            size: Some(DEFAULT_FACET_SIZE),
            order: Some(FacetOrder::CountDesc),
            missing: None,
            include_rows: true,
            alias: DEFAULT_FACET_ALIAS.to_string(),
        }
    }

    /// Terms facets over `fields`. Field names must be unique.
    pub fn fields<I, S>(fields: I) -> ParadeResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for field in fields {
            let field = field.into();
            if unique.contains(&field) {
                return Err(ParadeError::DuplicateFacetField(field));
            }
            unique.push(field);
        }
        if unique.is_empty() {
            return Err(ParadeError::invalid("facets require fields or agg"));
        }
        Ok(Self::with_source(FacetSource::Fields(unique)))
    }

    /// Terms facets using the facet defaults from `settings`.
    pub fn from_settings<I, S>(fields: I, settings: &Settings) -> ParadeResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut request = Self::fields(fields)?;
        request.size = settings.facet_size;
        request.order = settings
            .facet_order
            .as_deref()
            .map(str::parse::<FacetOrder>)
            .transpose()?;
        request.alias.clone_from(&settings.facet_alias);
        Ok(request)
    }

    /// A raw aggregation, serialized compactly and passed through.
    pub fn agg(spec: &JsonValue) -> ParadeResult<Self> {
        Ok(Self::agg_str(serde_json::to_string(spec)?))
    }

    /// A raw aggregation given as JSON text, passed through verbatim.
    pub fn agg_str(json: impl Into<String>) -> Self {
        Self::with_source(FacetSource::Agg(json.into()))
    }

    /// Maximum buckets per field. Must be positive.
    #[must_use]
    pub const fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Leaves the bucket count to the engine.
    #[must_use]
    pub const fn no_size(mut self) -> Self {
        self.size = None;
        self
    }

    /// Bucket ordering.
    #[must_use]
    pub const fn order(mut self, order: FacetOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Leaves the bucket ordering to the engine.
    #[must_use]
    pub const fn no_order(mut self) -> Self {
        self.order = None;
        self
    }

    /// Bucket key for documents without a value.
    #[must_use]
    pub fn missing(mut self, value: impl Into<JsonValue>) -> Self {
        self.missing = Some(value.into());
        self
    }

    /// Whether the plan returns rows alongside the buckets.
    #[must_use]
    pub const fn include_rows(mut self, include: bool) -> Self {
        self.include_rows = include;
        self
    }

    /// Column alias for single-column plans.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    fn validate(&self) -> ParadeResult<()> {
        if self.size == Some(0) {
            return Err(ParadeError::invalid("Facet size must be positive"));
        }
        Ok(())
    }

    fn terms_json(&self, field: &str) -> ParadeResult<String> {
        let mut terms = Map::new();
        terms.insert("field".into(), JsonValue::String(field.to_string()));
        if let Some(ref missing) = self.missing {
            terms.insert("missing".into(), missing.clone());
        }
        if let Some(order) = self.order {
            terms.insert("order".into(), order.to_json());
        }
        if let Some(size) = self.size {
            terms.insert("size".into(), JsonValue::from(size));
        }
        let mut spec = Map::new();
        spec.insert("terms".into(), JsonValue::Object(terms));
        Ok(serde_json::to_string(&spec)?)
    }

    /// The aggregate columns as `(alias, field, json)`.
    fn columns(&self) -> ParadeResult<Vec<(String, Option<String>, String)>> {
        match &self.source {
            FacetSource::Agg(json) => Ok(vec![(self.alias.clone(), None, json.clone())]),
            FacetSource::Fields(fields) if fields.len() == 1 => {
                let field = &fields[0];
                Ok(vec![(self.alias.clone(), Some(field.clone()), self.terms_json(field)?)])
            }
            FacetSource::Fields(fields) => fields
                .iter()
                .map(|field| {
                    Ok((format!("{field}_terms"), Some(field.clone()), self.terms_json(field)?))
                })
                .collect(),
        }
    }
}

/// One bucket of a terms facet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    /// The bucket key.
    pub key: JsonValue,
    /// Number of matching documents.
    pub doc_count: u64,
}

/// The buckets of one facet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacetBuckets {
    /// Buckets in engine order.
    #[serde(default)]
    pub buckets: Vec<Bucket>,
}

impl FacetBuckets {
    fn from_json(value: JsonValue) -> ParadeResult<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// Facet results.
#[derive(Debug, Clone, PartialEq)]
pub enum Facets {
    /// Buckets per requested field, in request order.
    Fields(Vec<(String, FacetBuckets)>),
    /// The raw result of an `agg` override.
    Raw(JsonValue),
}

impl Facets {
    /// Buckets for `field`, if it was requested.
    pub fn get(&self, field: &str) -> Option<&FacetBuckets> {
        match self {
            Self::Fields(fields) => fields.iter().find(|(f, _)| f == field).map(|(_, b)| b),
            Self::Raw(_) => None,
        }
    }

    /// The result as JSON: `{"buckets": [...]}` for one field, a map keyed by
    /// field name for several, the raw value for an override.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Fields(fields) if fields.len() == 1 => buckets_json(&fields[0].1),
            Self::Fields(fields) => JsonValue::Object(
                fields
                    .iter()
                    .map(|(field, buckets)| (field.clone(), buckets_json(buckets)))
                    .collect(),
            ),
            Self::Raw(value) => value.clone(),
        }
    }
}

fn buckets_json(buckets: &FacetBuckets) -> JsonValue {
    let list = buckets
        .buckets
        .iter()
        .map(|b| json!({"key": b.key, "doc_count": b.doc_count}))
        .collect();
    json!({ "buckets": JsonValue::Array(list) })
}

/// The outcome of [`FacetQuery::extract`].
#[derive(Debug, Clone, PartialEq)]
pub enum FacetResult {
    /// Rows (without facet columns) and facets.
    WithRows(Vec<Row>, Facets),
    /// Facets alone.
    FacetsOnly(Facets),
    /// The rows query matched nothing; run [`FacetQuery::fallback`] instead.
    NeedsFallback,
}

#[derive(Debug, Clone, PartialEq)]
struct FacetColumn {
    alias: String,
    field: Option<String>,
}

/// A planned faceted query.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetQuery {
    sql: String,
    params: Vec<Value>,
    include_rows: bool,
    columns: Vec<FacetColumn>,
    fallback: Option<Box<FacetQuery>>,
}

impl FacetQuery {
    /// Checks `request` against `query` and builds the SQL.
    ///
    /// # Errors
    ///
    /// - `MissingSearchOperatorForFacets` if the WHERE clause has no ParadeDB
    ///   predicate.
    /// - `MissingOrderingForFacets` if rows are requested and the query lacks
    ///   an ordering or a limit.
    /// - `InvalidArgument` for a zero `size`.
    pub fn plan(query: &Query, request: &FacetRequest) -> ParadeResult<Self> {
        let span = compile_span("facets");
        let _guard = span.enter();

        if !query.has_search_operator() {
            return Err(ParadeError::MissingSearchOperatorForFacets);
        }
        if request.include_rows && (query.order_by.is_empty() || query.limit.is_none()) {
            return Err(ParadeError::MissingOrderingForFacets);
        }
        request.validate()?;

        let specs = request.columns()?;
        let columns: Vec<FacetColumn> = specs
            .iter()
            .map(|(alias, field, _)| FacetColumn {
                alias: alias.clone(),
                field: field.clone(),
            })
            .collect();

        let mut aggregate = query.clone();
        aggregate.select.clear();
        aggregate.order_by.clear();
        aggregate.limit = None;
        aggregate.offset = None;
        aggregate.annotations = specs
            .iter()
            .map(|(alias, _, json)| (alias.clone(), Agg::new(json.clone()).into()))
            .collect();
        let (agg_sql, agg_params) = SqlCompiler::new().compile_select(&aggregate)?;
        let aggregate_only = Self {
            sql: agg_sql,
            params: agg_params,
            include_rows: false,
            columns: columns.clone(),
            fallback: None,
        };

        if !request.include_rows {
            tracing::debug!(columns = columns.len(), "planned aggregate-only facet query");
            return Ok(aggregate_only);
        }

        let mut rows = query.clone();
        for (alias, _, json) in &specs {
            rows.annotations
                .push((alias.clone(), Agg::new(json.clone()).over().into()));
        }
        let (sql, params) = SqlCompiler::new().compile_select(&rows)?;
        tracing::debug!(columns = columns.len(), "planned windowed facet query");
        Ok(Self {
            sql,
            params,
            include_rows: true,
            columns,
            fallback: Some(Box::new(aggregate_only)),
        })
    }

    /// The SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The bound parameters.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Whether this plan returns rows.
    pub const fn include_rows(&self) -> bool {
        self.include_rows
    }

    /// The facet column aliases, in order.
    pub fn aliases(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.alias.as_str()).collect()
    }

    /// The aggregate-only plan to run when a rows query matched nothing.
    pub fn fallback(&self) -> Option<&Self> {
        self.fallback.as_deref()
    }

    /// Reads facets out of the rows returned for this plan.
    pub fn extract(&self, rows: Vec<Row>) -> ParadeResult<FacetResult> {
        let Some(first) = rows.first() else {
            if self.include_rows {
                tracing::warn!("facet query returned no rows; falling back to aggregate-only query");
                return Ok(FacetResult::NeedsFallback);
            }
            return Ok(FacetResult::FacetsOnly(self.empty_facets()));
        };
        let facets = self.read_facets(first)?;
        if !self.include_rows {
            return Ok(FacetResult::FacetsOnly(facets));
        }
        let stripped = rows.into_iter().map(|row| self.strip(&row)).collect();
        Ok(FacetResult::WithRows(stripped, facets))
    }

    fn read_facets(&self, row: &Row) -> ParadeResult<Facets> {
        if let [FacetColumn { alias, field: None }] = self.columns.as_slice() {
            let raw = row.get_value(alias).map_or(JsonValue::Null, Value::to_json);
            return Ok(Facets::Raw(raw));
        }
        let mut fields = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let value = row.get_value(&column.alias).map_or(JsonValue::Null, Value::to_json);
            let field = column.field.clone().unwrap_or_else(|| column.alias.clone());
            fields.push((field, FacetBuckets::from_json(value)?));
        }
        Ok(Facets::Fields(fields))
    }

    fn empty_facets(&self) -> Facets {
        if let [FacetColumn { field: None, .. }] = self.columns.as_slice() {
            return Facets::Raw(JsonValue::Null);
        }
        Facets::Fields(
            self.columns
                .iter()
                .map(|c| {
                    let field = c.field.clone().unwrap_or_else(|| c.alias.clone());
                    (field, FacetBuckets::default())
                })
                .collect(),
        )
    }

    fn strip(&self, row: &Row) -> Row {
        let (columns, values) = row
            .columns()
            .iter()
            .filter(|name| !self.columns.iter().any(|c| &c.alias == *name))
            .filter_map(|name| row.get_value(name).map(|v| (name.clone(), v.clone())))
            .unzip();
        Row::new(columns, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::compiler::OrderBy;
    use crate::query::expressions::ParadeDB;
    use crate::query::lookups::{Lookup, Q};
    use crate::query::queryset::SearchQuerySet;

    fn searched() -> SearchQuerySet {
        SearchQuerySet::new("products")
            .search("description", ParadeDB::new("shoes"))
            .unwrap()
    }

    #[test]
    fn test_order_parse() {
        assert_eq!("-count".parse::<FacetOrder>().unwrap(), FacetOrder::CountDesc);
        assert_eq!("key".parse::<FacetOrder>().unwrap(), FacetOrder::Key);
        let err = "size".parse::<FacetOrder>().unwrap_err();
        assert!(err.to_string().contains("count, -count, key, or -key"));
    }

    #[test]
    fn test_duplicate_fields() {
        let err = FacetRequest::fields(["category", "category"]).unwrap_err();
        assert!(matches!(err, ParadeError::DuplicateFacetField(ref f) if f == "category"));
    }

    #[test]
    fn test_empty_fields() {
        assert!(FacetRequest::fields(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_terms_json_shape() {
        let request = FacetRequest::fields(["category"]).unwrap().missing("n/a");
        assert_eq!(
            request.terms_json("category").unwrap(),
            r#"{"terms":{"field":"category","missing":"n/a","order":{"_count":"desc"},"size":10}}"#
        );
        let bare = FacetRequest::fields(["category"]).unwrap().no_size().no_order();
        assert_eq!(bare.terms_json("category").unwrap(), r#"{"terms":{"field":"category"}}"#);
    }

    #[test]
    fn test_requires_search_operator() {
        let qs = SearchQuerySet::new("products")
            .filter("rating", Lookup::Gt(Value::from(3)))
            .unwrap()
            .order_by(vec![OrderBy::asc("id")])
            .limit(5);
        let request = FacetRequest::fields(["category"]).unwrap();
        assert!(matches!(
            qs.facets(&request).unwrap_err(),
            ParadeError::MissingSearchOperatorForFacets
        ));
    }

    #[test]
    fn test_requires_ordering_and_limit() {
        let request = FacetRequest::fields(["category"]).unwrap();
        let err = searched().facets(&request).unwrap_err();
        assert!(matches!(err, ParadeError::MissingOrderingForFacets));

        let err = searched().limit(5).facets(&request).unwrap_err();
        assert!(matches!(err, ParadeError::MissingOrderingForFacets));

        let ok = searched()
            .order_by(vec![OrderBy::asc("id")])
            .limit(5)
            .facets(&request);
        assert!(ok.is_ok());
    }

    #[test]
    fn test_rows_plan_sql() {
        let request = FacetRequest::fields(["category"]).unwrap();
        let plan = searched()
            .order_by(vec![OrderBy::asc("id")])
            .limit(5)
            .facets(&request)
            .unwrap();
        assert!(plan.include_rows());
        assert_eq!(
            plan.sql(),
            r#"SELECT *, pdb.agg('{"terms":{"field":"category","order":{"_count":"desc"},"size":10}}') OVER () AS "_paradedb_facets" FROM "products" WHERE "description" &&& 'shoes' ORDER BY "id" ASC LIMIT 5"#
        );
        let fallback = plan.fallback().unwrap();
        assert_eq!(
            fallback.sql(),
            r#"SELECT pdb.agg('{"terms":{"field":"category","order":{"_count":"desc"},"size":10}}') AS "_paradedb_facets" FROM "products" WHERE "description" &&& 'shoes'"#
        );
    }

    #[test]
    fn test_aggregate_only_plan_needs_no_ordering() {
        let request = FacetRequest::fields(["category", "brand"])
            .unwrap()
            .size(3)
            .include_rows(false);
        let plan = searched().facets(&request).unwrap();
        assert!(!plan.include_rows());
        assert!(plan.fallback().is_none());
        assert_eq!(plan.aliases(), vec!["category_terms", "brand_terms"]);
        assert_eq!(
            plan.sql(),
            r#"SELECT pdb.agg('{"terms":{"field":"category","order":{"_count":"desc"},"size":3}}') AS "category_terms", pdb.agg('{"terms":{"field":"brand","order":{"_count":"desc"},"size":3}}') AS "brand_terms" FROM "products" WHERE "description" &&& 'shoes'"#
        );
    }

    #[test]
    fn test_zero_size_rejected() {
        let request = FacetRequest::fields(["category"]).unwrap().size(0).include_rows(false);
        let err = searched().facets(&request).unwrap_err();
        assert!(err.to_string().contains("size must be positive"));
    }

    #[test]
    fn test_agg_override_passthrough() {
        let request = FacetRequest::agg_str(r#"{"avg":{"field":"rating"}}"#).include_rows(false);
        let plan = searched().facets(&request).unwrap();
        assert_eq!(
            plan.sql(),
            r#"SELECT pdb.agg('{"avg":{"field":"rating"}}') AS "_paradedb_facets" FROM "products" WHERE "description" &&& 'shoes'"#
        );
    }

    #[test]
    fn test_extract_single_field_with_rows() {
        let request = FacetRequest::fields(["category"]).unwrap();
        let plan = searched()
            .order_by(vec![OrderBy::asc("id")])
            .limit(5)
            .facets(&request)
            .unwrap();
        let buckets = json!({"buckets": [{"key": "Footwear", "doc_count": 3}]});
        let rows = vec![
            Row::new(
                vec!["id".into(), "_paradedb_facets".into()],
                vec![Value::Int(1), Value::Json(buckets.clone())],
            ),
            Row::new(
                vec!["id".into(), "_paradedb_facets".into()],
                vec![Value::Int(2), Value::Json(buckets.clone())],
            ),
        ];
        match plan.extract(rows).unwrap() {
            FacetResult::WithRows(rows, facets) => {
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0].columns(), &["id".to_string()]);
                assert_eq!(facets.to_json(), buckets);
                assert_eq!(facets.get("category").unwrap().buckets[0].doc_count, 3);
            }
            other => panic!("Expected WithRows, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_empty_rows_needs_fallback() {
        let request = FacetRequest::fields(["category"]).unwrap();
        let plan = searched()
            .order_by(vec![OrderBy::asc("id")])
            .limit(5)
            .facets(&request)
            .unwrap();
        assert_eq!(plan.extract(Vec::new()).unwrap(), FacetResult::NeedsFallback);
    }

    #[test]
    fn test_extract_multi_field_map() {
        let request = FacetRequest::fields(["category", "brand"]).unwrap().include_rows(false);
        let plan = searched().facets(&request).unwrap();
        let row = Row::new(
            vec!["category_terms".into(), "brand_terms".into()],
            vec![
                Value::String(r#"{"buckets":[{"key":"Shoes","doc_count":2}]}"#.into()),
                Value::Null,
            ],
        );
        let FacetResult::FacetsOnly(facets) = plan.extract(vec![row]).unwrap() else {
            panic!("Expected FacetsOnly");
        };
        assert_eq!(
            facets.to_json(),
            json!({
                "category": {"buckets": [{"key": "Shoes", "doc_count": 2}]},
                "brand": {"buckets": []}
            })
        );
    }

    #[test]
    fn test_extract_raw_override() {
        let request = FacetRequest::agg(&json!({"value_count": {"field": "id"}}))
            .unwrap()
            .include_rows(false);
        let plan = searched().facets(&request).unwrap();
        let row = Row::new(vec!["_paradedb_facets".into()], vec![Value::Json(json!({"value": 7}))]);
        assert_eq!(
            plan.extract(vec![row]).unwrap(),
            FacetResult::FacetsOnly(Facets::Raw(json!({"value": 7})))
        );
    }

    #[test]
    fn test_malformed_buckets_are_errors() {
        let request = FacetRequest::fields(["category"]).unwrap().include_rows(false);
        let plan = searched().facets(&request).unwrap();
        let row = Row::new(
            vec!["_paradedb_facets".into()],
            vec![Value::Json(json!({"buckets": "nope"}))],
        );
        assert!(matches!(
            plan.extract(vec![row]).unwrap_err(),
            ParadeError::SerializationError(_)
        ));
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            facet_size: None,
            facet_order: Some("key".into()),
            facet_alias: "facets".into(),
            ..Settings::default()
        };
        let request = FacetRequest::from_settings(["category"], &settings)
            .unwrap()
            .include_rows(false);
        let plan = searched().facets(&request).unwrap();
        assert_eq!(plan.aliases(), vec!["facets"]);
        assert!(plan.sql().contains(r#"{"terms":{"field":"category","order":{"_key":"asc"}}}"#));

        let bad = Settings {
            facet_order: Some("size".into()),
            ..Settings::default()
        };
        assert!(FacetRequest::from_settings(["category"], &bad).is_err());
    }

    #[test]
    fn test_exclude_search_still_counts() {
        let qs = SearchQuerySet::new("products")
            .exclude(Q::search("description", ParadeDB::new("boots")))
            .unwrap();
        let request = FacetRequest::fields(["category"]).unwrap().include_rows(false);
        assert!(qs.facets(&request).is_ok());
    }
}
