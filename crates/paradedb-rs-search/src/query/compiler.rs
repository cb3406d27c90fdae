//! Query snapshot and SQL compiler.
//!
//! [`Query`] is the read-only picture of a search query: table, select list,
//! WHERE tree, ordering, limit/offset and annotations. [`SqlCompiler`] turns
//! it into PostgreSQL text with `$n` placeholders. Facet planning inspects the
//! same snapshot to check its preconditions.

use paradedb_rs_core::logging::compile_span;
use paradedb_rs_core::sql::quote_name;
use paradedb_rs_core::{ParadeError, ParadeResult, Value};

use super::expressions::{Annotation, MoreLikeThis};
use super::lookups::{Lookup, Q};

/// A column ordering direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// The column or annotation alias to order by.
    pub column: String,
    /// Whether to sort in descending order.
    pub descending: bool,
    /// Whether to put nulls first or last.
    pub nulls_first: Option<bool>,
}

impl OrderBy {
    /// Creates an ascending order.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
            nulls_first: None,
        }
    }

    /// Creates a descending order.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
            nulls_first: None,
        }
    }

    /// Parses `"rating"` / `"-rating"` shorthand.
    pub fn parse(spec: &str) -> Self {
        spec.strip_prefix('-')
            .map_or_else(|| Self::asc(spec), Self::desc)
    }

    fn to_sql(&self) -> String {
        let dir = if self.descending { " DESC" } else { " ASC" };
        let nulls = match self.nulls_first {
            Some(true) => " NULLS FIRST",
            Some(false) => " NULLS LAST",
            None => "",
        };
        format!("{}{dir}{nulls}", quote_name(&self.column))
    }
}

/// A column to select in a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectColumn {
    /// A simple column name.
    Column(String),
    /// All columns (`*`).
    Star,
}

/// A WHERE clause node in the query snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum WhereNode {
    /// A single lookup.
    Condition {
        /// The column name.
        column: String,
        /// The lookup type.
        lookup: Lookup,
    },
    /// A similarity predicate on the key field.
    MoreLikeThis(MoreLikeThis),
    /// Logical AND of conditions.
    And(Vec<WhereNode>),
    /// Logical OR of conditions.
    Or(Vec<WhereNode>),
    /// Logical NOT of a condition.
    Not(Box<WhereNode>),
}

impl WhereNode {
    /// Converts a `Q` object into a `WhereNode`.
    pub fn from_q(q: &Q) -> Self {
        match q {
            Q::Filter { field, lookup } => Self::Condition {
                column: field.clone(),
                lookup: lookup.clone(),
            },
            Q::MoreLikeThis(mlt) => Self::MoreLikeThis(mlt.clone()),
            Q::And(children) => Self::And(children.iter().map(Self::from_q).collect()),
            Q::Or(children) => Self::Or(children.iter().map(Self::from_q).collect()),
            Q::Not(inner) => Self::Not(Box::new(Self::from_q(inner))),
        }
    }

    /// Returns `true` if any node is a ParadeDB search or similarity predicate.
    pub fn contains_search_operator(&self) -> bool {
        match self {
            Self::Condition { lookup, .. } => lookup.is_search(),
            Self::MoreLikeThis(_) => true,
            Self::And(children) | Self::Or(children) => {
                children.iter().any(Self::contains_search_operator)
            }
            Self::Not(inner) => inner.contains_search_operator(),
        }
    }

    /// Validates every search and similarity predicate in the tree.
    pub fn validate(&self) -> ParadeResult<()> {
        match self {
            Self::Condition {
                lookup: Lookup::Search(search),
                ..
            } => search.validate(),
            Self::Condition { .. } => Ok(()),
            Self::MoreLikeThis(mlt) => mlt.validate(),
            Self::And(children) | Self::Or(children) => {
                children.iter().try_for_each(Self::validate)
            }
            Self::Not(inner) => inner.validate(),
        }
    }
}

/// The query snapshot representing a SELECT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// The main table name.
    pub table: String,
    /// The key field used by similarity predicates.
    pub key_field: String,
    /// Columns to select.
    pub select: Vec<SelectColumn>,
    /// WHERE clause.
    pub where_clause: Option<WhereNode>,
    /// ORDER BY clauses.
    pub order_by: Vec<OrderBy>,
    /// LIMIT.
    pub limit: Option<usize>,
    /// OFFSET.
    pub offset: Option<usize>,
    /// Named annotations, in insertion order.
    pub annotations: Vec<(String, Annotation)>,
}

impl Query {
    /// Creates a new query for the given table, keyed on `id`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            key_field: "id".to_string(),
            select: vec![SelectColumn::Star],
            where_clause: None,
            order_by: Vec::new(),
            limit: None,
            offset: None,
            annotations: Vec::new(),
        }
    }

    /// Returns `true` if the WHERE clause holds a ParadeDB predicate.
    pub fn has_search_operator(&self) -> bool {
        self.where_clause
            .as_ref()
            .is_some_and(WhereNode::contains_search_operator)
    }
}

/// A row handed back by the host driver.
///
/// `Row` holds a list of column names and their corresponding values. It
/// provides typed access via the [`get`](Row::get) method.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    /// Creates a new row from column names and values.
    ///
    /// # Panics
    ///
    /// Panics if the number of columns does not match the number of values.
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        assert_eq!(
            columns.len(),
            values.len(),
            "Row column count must match value count"
        );
        Self { columns, values }
    }

    /// Returns the column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Gets a typed value by column name.
    ///
    /// # Errors
    ///
    /// Returns an error if the column does not exist or the value cannot be
    /// converted to the requested type.
    pub fn get<T: FromValue>(&self, column: &str) -> ParadeResult<T> {
        let value = self.get_value(column).ok_or_else(|| {
            ParadeError::InvalidArgument(format!("Column '{column}' not found in row"))
        })?;
        T::from_value(value)
    }

    /// Gets a typed value by column index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of bounds or the value cannot be
    /// converted to the requested type.
    pub fn get_by_index<T: FromValue>(&self, idx: usize) -> ParadeResult<T> {
        let value = self.values.get(idx).ok_or_else(|| {
            ParadeError::InvalidArgument(format!(
                "Column index {idx} out of bounds (row has {} columns)",
                self.values.len()
            ))
        })?;
        T::from_value(value)
    }

    /// Returns a reference to the raw Value at the given column name.
    pub fn get_value(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| &self.values[idx])
    }
}

/// Trait for converting a [`Value`] to a concrete Rust type.
pub trait FromValue: Sized {
    /// Attempts to convert a value reference to this type.
    fn from_value(value: &Value) -> ParadeResult<Self>;
}

fn type_mismatch(expected: &str, value: &Value) -> ParadeError {
    ParadeError::SerializationError(format!("Expected {expected}, got {value:?}"))
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> ParadeResult<Self> {
        value.as_int().ok_or_else(|| type_mismatch("Int", value))
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> ParadeResult<Self> {
        let i = value.as_int().ok_or_else(|| type_mismatch("Int", value))?;
        Self::try_from(i).map_err(|e| {
            ParadeError::SerializationError(format!("Int value out of i32 range: {e}"))
        })
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> ParadeResult<Self> {
        value.as_float().ok_or_else(|| type_mismatch("Float", value))
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> ParadeResult<Self> {
        value.as_bool().ok_or_else(|| type_mismatch("Bool", value))
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> ParadeResult<Self> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| type_mismatch("String", value))
    }
}

impl FromValue for serde_json::Value {
    fn from_value(value: &Value) -> ParadeResult<Self> {
        Ok(value.to_json())
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> ParadeResult<Self> {
        Ok(value.clone())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> ParadeResult<Self> {
        match value {
            Value::Null => Ok(None),
            _ => T::from_value(value).map(Some),
        }
    }
}

/// Translates a [`Query`] into PostgreSQL text and bound parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlCompiler;

impl SqlCompiler {
    /// Creates a new compiler.
    pub const fn new() -> Self {
        Self
    }

    /// Returns the placeholder for the given 1-based index.
    fn placeholder(index: usize) -> String {
        format!("${index}")
    }

    /// Pushes a parameter and returns its placeholder.
    fn bind(params: &mut Vec<Value>, value: &Value) -> String {
        params.push(value.clone());
        Self::placeholder(params.len())
    }

    /// Compiles a SELECT query into SQL and parameters.
    ///
    /// # Errors
    ///
    /// Returns the first validation error raised by a search or similarity
    /// predicate in the WHERE clause.
    pub fn compile_select(&self, query: &Query) -> ParadeResult<(String, Vec<Value>)> {
        let span = compile_span("select");
        let _guard = span.enter();

        let mut params: Vec<Value> = Vec::new();
        let mut select_parts: Vec<String> = query
            .select
            .iter()
            .map(|col| match col {
                SelectColumn::Column(name) => quote_name(name),
                SelectColumn::Star => "*".to_string(),
            })
            .collect();
        for (alias, annotation) in &query.annotations {
            select_parts.push(format!("{} AS {}", annotation.to_sql(), quote_name(alias)));
        }
        if select_parts.is_empty() {
            select_parts.push("*".to_string());
        }

        let mut sql = format!(
            "SELECT {} FROM {}",
            select_parts.join(", "),
            quote_name(&query.table)
        );

        if let Some(ref where_clause) = query.where_clause {
            sql.push_str(" WHERE ");
            self.compile_where_node(where_clause, &query.key_field, &mut sql, &mut params)?;
        }

        if !query.order_by.is_empty() {
            let orders: Vec<String> = query.order_by.iter().map(OrderBy::to_sql).collect();
            sql.push_str(&format!(" ORDER BY {}", orders.join(", ")));
        }

        if let Some(limit) = query.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        if let Some(offset) = query.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        tracing::debug!(
            table = query.table.as_str(),
            sql_len = sql.len(),
            params = params.len(),
            "compiled search query"
        );
        Ok((sql, params))
    }

    /// Compiles a `WhereNode` into SQL, appending to the provided string.
    fn compile_where_node(
        &self,
        node: &WhereNode,
        key_field: &str,
        sql: &mut String,
        params: &mut Vec<Value>,
    ) -> ParadeResult<()> {
        match node {
            WhereNode::Condition { column, lookup } => {
                self.compile_lookup(column, lookup, sql, params)?;
            }
            WhereNode::MoreLikeThis(mlt) => {
                let key = quote_name(mlt.key_field_name().unwrap_or(key_field));
                let predicate = mlt.compile(&key, params)?;
                push_predicate(sql, &predicate, mlt.is_compound());
            }
            WhereNode::And(children) => {
                self.compile_group(children, " AND ", "1=1", key_field, sql, params)?;
            }
            WhereNode::Or(children) => {
                self.compile_group(children, " OR ", "1=0", key_field, sql, params)?;
            }
            WhereNode::Not(inner) => {
                sql.push_str("NOT (");
                self.compile_where_node(inner, key_field, sql, params)?;
                sql.push(')');
            }
        }
        Ok(())
    }

    fn compile_group(
        &self,
        children: &[WhereNode],
        joiner: &str,
        empty: &str,
        key_field: &str,
        sql: &mut String,
        params: &mut Vec<Value>,
    ) -> ParadeResult<()> {
        if children.is_empty() {
            sql.push_str(empty);
            return Ok(());
        }
        sql.push('(');
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                sql.push_str(joiner);
            }
            self.compile_where_node(child, key_field, sql, params)?;
        }
        sql.push(')');
        Ok(())
    }

    /// Compiles a single lookup into SQL.
    fn compile_lookup(
        &self,
        column: &str,
        lookup: &Lookup,
        sql: &mut String,
        params: &mut Vec<Value>,
    ) -> ParadeResult<()> {
        let col = quote_name(column);
        match lookup {
            Lookup::Search(search) => {
                let predicate = search.compile(&col)?;
                push_predicate(sql, &predicate, search.is_compound());
            }
            Lookup::Exact(val) => {
                if val.is_null() {
                    sql.push_str(&format!("{col} IS NULL"));
                } else {
                    sql.push_str(&format!("{col} = {}", Self::bind(params, val)));
                }
            }
            Lookup::Gt(val) => sql.push_str(&format!("{col} > {}", Self::bind(params, val))),
            Lookup::Gte(val) => sql.push_str(&format!("{col} >= {}", Self::bind(params, val))),
            Lookup::Lt(val) => sql.push_str(&format!("{col} < {}", Self::bind(params, val))),
            Lookup::Lte(val) => sql.push_str(&format!("{col} <= {}", Self::bind(params, val))),
            Lookup::In(vals) => {
                if vals.is_empty() {
                    sql.push_str("1=0");
                } else {
                    let placeholders: Vec<String> =
                        vals.iter().map(|v| Self::bind(params, v)).collect();
                    sql.push_str(&format!("{col} IN ({})", placeholders.join(", ")));
                }
            }
            Lookup::IsNull(true) => sql.push_str(&format!("{col} IS NULL")),
            Lookup::IsNull(false) => sql.push_str(&format!("{col} IS NOT NULL")),
        }
        Ok(())
    }
}

fn push_predicate(sql: &mut String, predicate: &str, compound: bool) {
    if compound {
        sql.push('(');
        sql.push_str(predicate);
        sql.push(')');
    } else {
        sql.push_str(predicate);
    }
}
