//! Similarity queries.
//!
//! [`MoreLikeThis`] compiles to `pdb.more_like_this(...)` predicates on the
//! key field. The reference is one id, a list of ids, a JSON document, or a
//! text applied to a set of fields. A list of ids becomes an OR of one
//! predicate per id because the function takes a single reference.
//!
//! Tuning values are bound as parameters. Text-bearing arguments (field
//! names, stopwords, the document) are escaped literals.

use paradedb_rs_core::logging::compile_span;
use paradedb_rs_core::sql::{literal_array, quote_literal};
use paradedb_rs_core::{ParadeError, ParadeResult, Value};
use serde_json::{Map, Value as JsonValue};

#[derive(Debug, Clone, PartialEq)]
enum Source {
    Id(i64),
    Ids(Vec<i64>),
    Document(Map<String, JsonValue>),
    Text(String),
}

/// Optional tuning knobs, in the order they are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Tuning {
    min_term_frequency: Option<u32>,
    max_query_terms: Option<u32>,
    min_doc_frequency: Option<u32>,
    max_term_frequency: Option<u32>,
    max_doc_frequency: Option<u32>,
    min_word_length: Option<u32>,
    max_word_length: Option<u32>,
}

impl Tuning {
    const fn entries(&self) -> [(&'static str, Option<u32>); 7] {
        [
            ("min_term_frequency", self.min_term_frequency),
            ("max_query_terms", self.max_query_terms),
            ("min_doc_frequency", self.min_doc_frequency),
            ("max_term_frequency", self.max_term_frequency),
            ("max_doc_frequency", self.max_doc_frequency),
            ("min_word_length", self.min_word_length),
            ("max_word_length", self.max_word_length),
        ]
    }
}

/// A "documents similar to this one" predicate.
///
/// # Examples
///
/// ```
/// use paradedb_rs_search::query::expressions::MoreLikeThis;
///
/// let mlt = MoreLikeThis::ids([1, 2, 3]).unwrap();
/// let mut params = Vec::new();
/// assert_eq!(
///     mlt.compile("id", &mut params).unwrap(),
///     "(id @@@ pdb.more_like_this(1)) OR (id @@@ pdb.more_like_this(2)) OR (id @@@ pdb.more_like_this(3))"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MoreLikeThis {
    source: Source,
    fields: Vec<String>,
    key_field: Option<String>,
    tuning: Tuning,
    stopwords: Vec<String>,
}

impl MoreLikeThis {
    fn with_source(source: Source) -> Self {
        Self {
            source,
            fields: Vec::new(),
            key_field: None,
            tuning: Tuning::default(),
            stopwords: Vec::new(),
        }
    }

    /// Documents similar to the row with this key.
    pub fn id(id: i64) -> Self {
        Self::with_source(Source::Id(id))
    }

    /// Documents similar to any of these rows.
    pub fn ids(ids: impl IntoIterator<Item = i64>) -> ParadeResult<Self> {
        let ids: Vec<i64> = ids.into_iter().collect();
        if ids.is_empty() {
            return Err(ParadeError::invalid("MoreLikeThis ids cannot be empty"));
        }
        Ok(Self::with_source(Source::Ids(ids)))
    }

    /// Documents similar to an ad-hoc document of field -> text pairs.
    pub fn document<I, K, V>(pairs: I) -> ParadeResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let doc: Map<String, JsonValue> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), JsonValue::String(v.into())))
            .collect();
        if doc.is_empty() {
            return Err(ParadeError::invalid("MoreLikeThis document cannot be empty"));
        }
        Ok(Self::with_source(Source::Document(doc)))
    }

    /// Documents whose `fields` resemble `text`.
    pub fn text<I, S>(text: impl Into<String>, fields: I) -> ParadeResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if fields.is_empty() {
            return Err(ParadeError::invalid(
                "MoreLikeThis with text requires at least one field",
            ));
        }
        let mut mlt = Self::with_source(Source::Text(text.into()));
        mlt.fields = fields;
        Ok(mlt)
    }

    /// Overrides the key column the predicate applies to.
    #[must_use]
    pub fn key_field(mut self, field: impl Into<String>) -> Self {
        self.key_field = Some(field.into());
        self
    }

    /// The key column override, if set.
    pub fn key_field_name(&self) -> Option<&str> {
        self.key_field.as_deref()
    }

    /// Limits which fields are compared.
    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Ignores terms that appear fewer than `n` times in the reference.
    #[must_use]
    pub const fn min_term_frequency(mut self, n: u32) -> Self {
        self.tuning.min_term_frequency = Some(n);
        self
    }

    /// Caps the number of query terms.
    #[must_use]
    pub const fn max_query_terms(mut self, n: u32) -> Self {
        self.tuning.max_query_terms = Some(n);
        self
    }

    /// Ignores terms found in fewer than `n` documents.
    #[must_use]
    pub const fn min_doc_frequency(mut self, n: u32) -> Self {
        self.tuning.min_doc_frequency = Some(n);
        self
    }

    /// Ignores terms that appear more than `n` times in the reference.
    #[must_use]
    pub const fn max_term_frequency(mut self, n: u32) -> Self {
        self.tuning.max_term_frequency = Some(n);
        self
    }

    /// Ignores terms found in more than `n` documents.
    #[must_use]
    pub const fn max_doc_frequency(mut self, n: u32) -> Self {
        self.tuning.max_doc_frequency = Some(n);
        self
    }

    /// Ignores words shorter than `n`.
    #[must_use]
    pub const fn min_word_length(mut self, n: u32) -> Self {
        self.tuning.min_word_length = Some(n);
        self
    }

    /// Ignores words longer than `n`.
    #[must_use]
    pub const fn max_word_length(mut self, n: u32) -> Self {
        self.tuning.max_word_length = Some(n);
        self
    }

    /// Words never used as query terms.
    #[must_use]
    pub fn stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stopwords = words.into_iter().map(Into::into).collect();
        self
    }

    /// Returns `true` if the compiled form is an OR chain.
    pub(crate) fn is_compound(&self) -> bool {
        matches!(&self.source, Source::Ids(ids) if ids.len() > 1)
    }

    /// Checks argument combinations and tuning ranges.
    pub fn validate(&self) -> ParadeResult<()> {
        if matches!(self.source, Source::Document(_)) && !self.fields.is_empty() {
            return Err(ParadeError::invalid(
                "MoreLikeThis fields cannot be combined with document",
            ));
        }
        if matches!(self.source, Source::Text(_)) && self.fields.is_empty() {
            return Err(ParadeError::invalid(
                "MoreLikeThis with text requires at least one field",
            ));
        }
        for (name, value) in self.tuning.entries() {
            if value == Some(0) {
                return Err(ParadeError::invalid(format!(
                    "MoreLikeThis {name} must be >= 1"
                )));
            }
        }
        if let (Some(min), Some(max)) = (self.tuning.min_word_length, self.tuning.max_word_length) {
            if min > max {
                return Err(ParadeError::invalid(format!(
                    "MoreLikeThis min_word_length ({min}) must be <= max_word_length ({max})"
                )));
            }
        }
        Ok(())
    }

    /// Compiles the predicate against `key_column`, pushing tuning values
    /// onto `params` and referencing them as `$n`.
    pub fn compile(&self, key_column: &str, params: &mut Vec<Value>) -> ParadeResult<String> {
        let span = compile_span("more_like_this");
        let _guard = span.enter();

        self.validate()?;
        let sql = match &self.source {
            Source::Id(id) => self.predicate(key_column, &id.to_string(), true, params),
            Source::Ids(ids) => ids
                .iter()
                .map(|id| format!("({})", self.predicate(key_column, &id.to_string(), true, params)))
                .collect::<Vec<_>>()
                .join(" OR "),
            Source::Document(doc) => {
                let json = serde_json::to_string(doc)?;
                self.predicate(key_column, &quote_literal(&json), false, params)
            }
            Source::Text(text) => {
                let doc: Map<String, JsonValue> = self
                    .fields
                    .iter()
                    .map(|field| (field.clone(), JsonValue::String(text.clone())))
                    .collect();
                let json = serde_json::to_string(&doc)?;
                self.predicate(key_column, &quote_literal(&json), false, params)
            }
        };
        tracing::debug!(column = key_column, params = params.len(), "compiled MoreLikeThis predicate");
        Ok(sql)
    }

    fn predicate(
        &self,
        key_column: &str,
        reference: &str,
        with_fields: bool,
        params: &mut Vec<Value>,
    ) -> String {
        let mut args = vec![reference.to_string()];
        if with_fields && !self.fields.is_empty() {
            args.push(literal_array(&self.fields));
        }
        for (name, value) in self.tuning.entries() {
            if let Some(value) = value {
                params.push(Value::from(value));
                args.push(format!("{name} => ${}", params.len()));
            }
        }
        if !self.stopwords.is_empty() {
            args.push(format!("stopwords => {}", literal_array(&self.stopwords)));
        }
        format!("{key_column} @@@ pdb.more_like_this({})", args.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(mlt: &MoreLikeThis) -> (String, Vec<Value>) {
        let mut params = Vec::new();
        let sql = mlt.compile("id", &mut params).unwrap();
        (sql, params)
    }

    #[test]
    fn test_single_id() {
        let (sql, params) = compile(&MoreLikeThis::id(5));
        assert_eq!(sql, "id @@@ pdb.more_like_this(5)");
        assert!(params.is_empty());
    }

    #[test]
    fn test_ids_or_combination() {
        let (sql, _) = compile(&MoreLikeThis::ids([1, 2, 3]).unwrap());
        assert_eq!(
            sql,
            "(id @@@ pdb.more_like_this(1)) OR (id @@@ pdb.more_like_this(2)) OR (id @@@ pdb.more_like_this(3))"
        );
    }

    #[test]
    fn test_empty_ids_rejected() {
        let err = MoreLikeThis::ids(Vec::new()).unwrap_err();
        assert!(err.to_string().contains("ids cannot be empty"));
    }

    #[test]
    fn test_fields_with_id() {
        let mlt = MoreLikeThis::id(3).fields(["description", "category"]);
        let (sql, _) = compile(&mlt);
        assert_eq!(
            sql,
            "id @@@ pdb.more_like_this(3, ARRAY['description', 'category'])"
        );
    }

    #[test]
    fn test_tuning_is_bound() {
        let mlt = MoreLikeThis::id(3).min_term_frequency(2).max_query_terms(10);
        let (sql, params) = compile(&mlt);
        assert_eq!(
            sql,
            "id @@@ pdb.more_like_this(3, min_term_frequency => $1, max_query_terms => $2)"
        );
        assert_eq!(params, vec![Value::Int(2), Value::Int(10)]);
    }

    #[test]
    fn test_tuning_bound_per_id() {
        let mlt = MoreLikeThis::ids([1, 2]).unwrap().min_doc_frequency(1);
        let (sql, params) = compile(&mlt);
        assert_eq!(
            sql,
            "(id @@@ pdb.more_like_this(1, min_doc_frequency => $1)) OR (id @@@ pdb.more_like_this(2, min_doc_frequency => $2))"
        );
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_placeholders_continue_from_existing_params() {
        let mlt = MoreLikeThis::id(1).max_doc_frequency(100);
        let mut params = vec![Value::from("x")];
        let sql = mlt.compile("\"id\"", &mut params).unwrap();
        assert_eq!(sql, "\"id\" @@@ pdb.more_like_this(1, max_doc_frequency => $2)");
    }

    #[test]
    fn test_stopwords_escaped() {
        let mlt = MoreLikeThis::id(1).stopwords(["the", "it's"]);
        let (sql, _) = compile(&mlt);
        assert_eq!(
            sql,
            "id @@@ pdb.more_like_this(1, stopwords => ARRAY['the', 'it''s'])"
        );
    }

    #[test]
    fn test_document_is_compact_and_ordered() {
        let mlt = MoreLikeThis::document([("description", "running shoes"), ("category", "Footwear")]).unwrap();
        let (sql, _) = compile(&mlt);
        assert_eq!(
            sql,
            r#"id @@@ pdb.more_like_this('{"description":"running shoes","category":"Footwear"}')"#
        );
    }

    #[test]
    fn test_document_quotes_escaped() {
        let mlt = MoreLikeThis::document([("description", "it's")]).unwrap();
        let (sql, _) = compile(&mlt);
        assert_eq!(sql, r#"id @@@ pdb.more_like_this('{"description":"it''s"}')"#);
    }

    #[test]
    fn test_text_builds_document() {
        let mlt = MoreLikeThis::text("running shoes", ["description", "name"]).unwrap();
        let (sql, _) = compile(&mlt);
        assert_eq!(
            sql,
            r#"id @@@ pdb.more_like_this('{"description":"running shoes","name":"running shoes"}')"#
        );
    }

    #[test]
    fn test_text_requires_fields() {
        let err = MoreLikeThis::text("x", Vec::<String>::new()).unwrap_err();
        assert!(err.to_string().contains("requires at least one field"));
    }

    #[test]
    fn test_fields_with_document_rejected() {
        let mlt = MoreLikeThis::document([("a", "b")]).unwrap().fields(["a"]);
        assert!(mlt.validate().is_err());
    }

    #[test]
    fn test_zero_tuning_rejected() {
        let err = MoreLikeThis::id(1).max_query_terms(0).validate().unwrap_err();
        assert!(err.to_string().contains("max_query_terms must be >= 1"));
    }

    #[test]
    fn test_word_length_order() {
        let err = MoreLikeThis::id(1)
            .min_word_length(5)
            .max_word_length(3)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("min_word_length"));
        assert!(MoreLikeThis::id(1).min_word_length(3).max_word_length(3).validate().is_ok());
    }
}
