//! SQL builders for the BM25 index inspection functions.
//!
//! These only build statements and bound parameters. Running them and reading
//! the resulting rows is up to the caller.

use paradedb_rs_core::{ParadeError, ParadeResult, Value};

/// `SELECT * FROM pdb.indexes()`.
pub fn indexes_sql() -> (String, Vec<Value>) {
    ("SELECT * FROM pdb.indexes()".to_string(), Vec::new())
}

/// Segment metadata for one index.
pub fn index_segments_sql(index: impl Into<String>) -> (String, Vec<Value>) {
    (
        "SELECT * FROM pdb.index_segments($1::regclass)".to_string(),
        vec![Value::String(index.into())],
    )
}

/// Accumulates `name => $n::type` arguments.
#[derive(Debug, Default)]
struct NamedArgs {
    parts: Vec<String>,
    params: Vec<Value>,
}

impl NamedArgs {
    fn positional(&mut self, value: Value, cast: &str) {
        self.params.push(value);
        self.parts.push(format!("${}::{cast}", self.params.len()));
    }

    fn push(&mut self, name: &str, value: Value, cast: &str) {
        self.params.push(value);
        self.parts
            .push(format!("{name} => ${}::{cast}", self.params.len()));
    }

    fn flag(&mut self, name: &str, enabled: bool) {
        if enabled {
            self.push(name, Value::Bool(true), "boolean");
        }
    }

    fn finish(self, function: &str) -> (String, Vec<Value>) {
        (
            format!("SELECT * FROM pdb.{function}({})", self.parts.join(", ")),
            self.params,
        )
    }
}

fn check_sample_rate(sample_rate: Option<f64>) -> ParadeResult<()> {
    match sample_rate {
        Some(rate) if !(0.0..=1.0).contains(&rate) => Err(ParadeError::invalid(format!(
            "sample_rate must be between 0.0 and 1.0, got {rate}"
        ))),
        _ => Ok(()),
    }
}

/// Options for `pdb.verify_index`.
///
/// # Examples
///
/// ```
/// use paradedb_rs_search::diagnostics::VerifyIndex;
///
/// let (sql, params) = VerifyIndex::new("products_idx")
///     .heapallindexed(true)
///     .sample_rate(0.5)
///     .to_sql()
///     .unwrap();
/// assert_eq!(
///     sql,
///     "SELECT * FROM pdb.verify_index($1::regclass, heapallindexed => $2::boolean, sample_rate => $3::double precision)"
/// );
/// assert_eq!(params.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VerifyIndex {
    index: String,
    heapallindexed: bool,
    sample_rate: Option<f64>,
    report_progress: bool,
    verbose: bool,
    on_error_stop: bool,
    segment_ids: Option<Vec<i64>>,
}

impl VerifyIndex {
    /// Verification of `index` with every option off.
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            heapallindexed: false,
            sample_rate: None,
            report_progress: false,
            verbose: false,
            on_error_stop: false,
            segment_ids: None,
        }
    }

    /// Also check that every heap tuple is indexed.
    #[must_use]
    pub const fn heapallindexed(mut self, enabled: bool) -> Self {
        self.heapallindexed = enabled;
        self
    }

    /// Fraction of documents to check, in `[0.0, 1.0]`.
    #[must_use]
    pub fn sample_rate(mut self, rate: f64) -> Self {
        self.sample_rate = Some(rate);
        self
    }

    #[must_use]
    pub const fn report_progress(mut self, enabled: bool) -> Self {
        self.report_progress = enabled;
        self
    }

    #[must_use]
    pub const fn verbose(mut self, enabled: bool) -> Self {
        self.verbose = enabled;
        self
    }

    #[must_use]
    pub const fn on_error_stop(mut self, enabled: bool) -> Self {
        self.on_error_stop = enabled;
        self
    }

    /// Restricts verification to the given segments.
    #[must_use]
    pub fn segment_ids(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.segment_ids = Some(ids.into_iter().collect());
        self
    }

    /// Builds the statement. Only enabled flags and set options are passed.
    pub fn to_sql(&self) -> ParadeResult<(String, Vec<Value>)> {
        check_sample_rate(self.sample_rate)?;
        let mut args = NamedArgs::default();
        args.positional(Value::String(self.index.clone()), "regclass");
        args.flag("heapallindexed", self.heapallindexed);
        if let Some(rate) = self.sample_rate {
            args.push("sample_rate", Value::Float(rate), "double precision");
        }
        args.flag("report_progress", self.report_progress);
        args.flag("verbose", self.verbose);
        args.flag("on_error_stop", self.on_error_stop);
        if let Some(ref ids) = self.segment_ids {
            let ids = ids.iter().copied().map(Value::Int).collect();
            args.push("segment_ids", Value::List(ids), "int[]");
        }
        Ok(args.finish("verify_index"))
    }
}

/// Options for `pdb.verify_all_indexes`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerifyAllIndexes {
    schema_pattern: Option<String>,
    index_pattern: Option<String>,
    heapallindexed: bool,
    sample_rate: Option<f64>,
    report_progress: bool,
    on_error_stop: bool,
}

impl VerifyAllIndexes {
    pub fn new() -> Self {
        Self::default()
    }

    /// `LIKE`-style pattern on schema names.
    #[must_use]
    pub fn schema_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.schema_pattern = Some(pattern.into());
        self
    }

    /// `LIKE`-style pattern on index names.
    #[must_use]
    pub fn index_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.index_pattern = Some(pattern.into());
        self
    }

    #[must_use]
    pub const fn heapallindexed(mut self, enabled: bool) -> Self {
        self.heapallindexed = enabled;
        self
    }

    #[must_use]
    pub fn sample_rate(mut self, rate: f64) -> Self {
        self.sample_rate = Some(rate);
        self
    }

    #[must_use]
    pub const fn report_progress(mut self, enabled: bool) -> Self {
        self.report_progress = enabled;
        self
    }

    #[must_use]
    pub const fn on_error_stop(mut self, enabled: bool) -> Self {
        self.on_error_stop = enabled;
        self
    }

    /// Builds the statement.
    pub fn to_sql(&self) -> ParadeResult<(String, Vec<Value>)> {
        check_sample_rate(self.sample_rate)?;
        let mut args = NamedArgs::default();
        if let Some(ref pattern) = self.schema_pattern {
            args.push("schema_pattern", Value::String(pattern.clone()), "text");
        }
        if let Some(ref pattern) = self.index_pattern {
            args.push("index_pattern", Value::String(pattern.clone()), "text");
        }
        args.flag("heapallindexed", self.heapallindexed);
        if let Some(rate) = self.sample_rate {
            args.push("sample_rate", Value::Float(rate), "double precision");
        }
        args.flag("report_progress", self.report_progress);
        args.flag("on_error_stop", self.on_error_stop);
        Ok(args.finish("verify_all_indexes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexes_sql() {
        let (sql, params) = indexes_sql();
        assert_eq!(sql, "SELECT * FROM pdb.indexes()");
        assert!(params.is_empty());
    }

    #[test]
    fn test_index_segments_sql() {
        let (sql, params) = index_segments_sql("products_idx");
        assert_eq!(sql, "SELECT * FROM pdb.index_segments($1::regclass)");
        assert_eq!(params, vec![Value::String("products_idx".into())]);
    }

    #[test]
    fn test_verify_index_minimal() {
        let (sql, params) = VerifyIndex::new("products_idx").to_sql().unwrap();
        assert_eq!(sql, "SELECT * FROM pdb.verify_index($1::regclass)");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_verify_index_all_options() {
        let (sql, params) = VerifyIndex::new("products_idx")
            .heapallindexed(true)
            .sample_rate(0.25)
            .report_progress(true)
            .verbose(true)
            .on_error_stop(true)
            .segment_ids([1, 2])
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM pdb.verify_index($1::regclass, heapallindexed => $2::boolean, \
             sample_rate => $3::double precision, report_progress => $4::boolean, \
             verbose => $5::boolean, on_error_stop => $6::boolean, segment_ids => $7::int[])"
        );
        assert_eq!(params[2], Value::Float(0.25));
        assert_eq!(params[6], Value::List(vec![Value::Int(1), Value::Int(2)]));
    }

    #[test]
    fn test_false_flags_are_omitted() {
        let (sql, _) = VerifyIndex::new("idx").verbose(false).to_sql().unwrap();
        assert!(!sql.contains("verbose"));
    }

    #[test]
    fn test_sample_rate_range() {
        assert!(VerifyIndex::new("idx").sample_rate(1.0).to_sql().is_ok());
        let err = VerifyIndex::new("idx").sample_rate(1.5).to_sql().unwrap_err();
        assert!(err.to_string().contains("sample_rate"));
        assert!(VerifyAllIndexes::new().sample_rate(-0.1).to_sql().is_err());
    }

    #[test]
    fn test_verify_all_indexes() {
        let (sql, params) = VerifyAllIndexes::new().to_sql().unwrap();
        assert_eq!(sql, "SELECT * FROM pdb.verify_all_indexes()");
        assert!(params.is_empty());

        let (sql, params) = VerifyAllIndexes::new()
            .schema_pattern("public")
            .index_pattern("%_idx")
            .on_error_stop(true)
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM pdb.verify_all_indexes(schema_pattern => $1::text, \
             index_pattern => $2::text, on_error_stop => $3::boolean)"
        );
        assert_eq!(params[1], Value::String("%_idx".into()));
    }
}
