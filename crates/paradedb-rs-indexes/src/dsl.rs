//! Index definitions from JSON or TOML documents.
//!
//! A document names the index, its key field and a `fields` table mapping each
//! column to its configuration:
//!
//! ```toml
//! name = "products_idx"
//! key_field = "id"
//!
//! [fields.id]
//!
//! [fields.description]
//! tokenizer = "simple"
//! filters = ["lowercase", "stemmer"]
//! stemmer = "english"
//!
//! [fields.category]
//! tokenizer = "literal"
//! fast = "text"
//!
//! [fields.brand]
//! fast = { kind = "text", enabled = false }
//!
//! [fields.metadata.json_keys.color]
//! tokenizer = "literal"
//! ```
//!
//! Recognized field keys are `tokenizer`, `tokenizers` (a list of tokenizer
//! tables), `filters`, `stemmer`, `args`, `named_args`, `alias`, `json_keys`
//! and `fast` (a kind, or a `{ kind, enabled }` table). Fields keep document
//! order.

use std::path::Path;

use paradedb_rs_core::{ParadeError, ParadeResult};
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use crate::bm25::Bm25Index;
use crate::tokenizer::{FastKind, FieldSpec, TokenizerArg, TokenizerSpec};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawIndex {
    name: String,
    key_field: String,
    fields: Map<String, JsonValue>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawArg {
    Int(i64),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawFast {
    Kind(FastKind),
    Table(RawFastTable),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFastTable {
    kind: FastKind,
    #[serde(default = "enabled_by_default")]
    enabled: bool,
}

const fn enabled_by_default() -> bool {
    true
}

impl RawFast {
    const fn option(&self) -> (FastKind, bool) {
        match self {
            Self::Kind(kind) => (*kind, true),
            Self::Table(table) => (table.kind, table.enabled),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawField {
    tokenizer: Option<String>,
    tokenizers: Option<Vec<JsonValue>>,
    filters: Option<Vec<String>>,
    stemmer: Option<String>,
    args: Option<Vec<RawArg>>,
    named_args: Option<Map<String, JsonValue>>,
    alias: Option<String>,
    json_keys: Option<Map<String, JsonValue>>,
    fast: Option<RawFast>,
    options: Option<JsonValue>,
}

impl RawField {
    fn has_tokenizer_config(&self) -> bool {
        self.filters.is_some()
            || self.stemmer.is_some()
            || self.args.is_some()
            || self.named_args.is_some()
            || self.alias.is_some()
    }

    fn has_single_tokenizer_keys(&self) -> bool {
        self.tokenizer.is_some() || self.has_tokenizer_config()
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ParadeError {
    ParadeError::InvalidTokenizerConfig {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn malformed(field: &str, reason: impl Into<String>) -> ParadeError {
    ParadeError::MalformedTokenizerList {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn parse_raw(field: &str, value: &JsonValue) -> ParadeResult<RawField> {
    if value.is_null() {
        return Ok(RawField::default());
    }
    serde_json::from_value(value.clone())
        .map_err(|e| invalid(field, format!("unreadable configuration: {e}")))
}

fn named_arg_value(field: &str, key: &str, value: &JsonValue) -> ParadeResult<String> {
    match value {
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        JsonValue::Number(n) => Ok(n.to_string()),
        _ => Err(invalid(
            field,
            format!("named_args value for '{key}' must be a string, number or boolean"),
        )),
    }
}

/// Builds the single tokenizer described by `raw`, which must name one.
fn tokenizer_spec(field: &str, raw: RawField) -> ParadeResult<TokenizerSpec> {
    if raw.options.is_some() {
        return Err(invalid(
            field,
            "the 'options' key is no longer supported; use 'named_args'",
        ));
    }
    if raw.tokenizers.is_some() || raw.json_keys.is_some() {
        return Err(invalid(field, "nested tokenizers and json_keys are not allowed here"));
    }
    let Some(name) = raw.tokenizer else {
        return Err(invalid(
            field,
            "filters, stemmer, args, named_args or alias given without an explicit tokenizer",
        ));
    };
    let mut spec = TokenizerSpec::new(name);
    for arg in raw.args.unwrap_or_default() {
        spec = spec.arg(match arg {
            RawArg::Int(i) => TokenizerArg::Int(i),
            RawArg::Text(s) => TokenizerArg::Text(s),
        });
    }
    spec = spec.filters(raw.filters.unwrap_or_default());
    if let Some(stemmer) = raw.stemmer {
        spec = spec.stemmer(stemmer);
    }
    for (key, value) in raw.named_args.unwrap_or_default() {
        let value = named_arg_value(field, &key, &value)?;
        spec = spec.named_arg(key, value);
    }
    if let Some(alias) = raw.alias {
        spec = spec.alias(alias);
    }
    Ok(spec)
}

/// Converts one field's configuration into a [`FieldSpec`].
///
/// `null` or an empty table indexes the bare column.
pub fn field_spec(field: &str, config: &JsonValue) -> ParadeResult<FieldSpec> {
    let mut raw = parse_raw(field, config)?;
    if raw.options.is_some() {
        return Err(invalid(
            field,
            "the 'options' key is no longer supported; use 'named_args'",
        ));
    }
    let fast = raw.fast.take();

    let spec = if let Some(keys) = raw.json_keys.take() {
        if raw.has_single_tokenizer_keys() || raw.tokenizers.is_some() {
            return Err(invalid(
                field,
                "json_keys cannot be combined with tokenizer settings on the same field",
            ));
        }
        let mut entries = Vec::with_capacity(keys.len());
        for (key, value) in keys {
            let path = format!("{field}.{key}");
            let raw_key = parse_raw(&path, &value)?;
            if raw_key.tokenizer.is_none() {
                return Err(invalid(&path, "JSON keys require an explicit tokenizer"));
            }
            entries.push((key, tokenizer_spec(&path, raw_key)?));
        }
        FieldSpec::json_keys(entries)
    } else if let Some(list) = raw.tokenizers.take() {
        if raw.has_single_tokenizer_keys() {
            return Err(malformed(
                field,
                "'tokenizers' cannot be combined with single-tokenizer keys",
            ));
        }
        if list.is_empty() {
            return Err(malformed(field, "'tokenizers' list cannot be empty"));
        }
        let specs = list
            .iter()
            .map(|entry| {
                if !entry.is_object() {
                    return Err(malformed(field, "each 'tokenizers' entry must be a table"));
                }
                tokenizer_spec(field, parse_raw(field, entry)?)
            })
            .collect::<ParadeResult<Vec<_>>>()?;
        FieldSpec::multi(specs)
    } else if raw.has_single_tokenizer_keys() {
        FieldSpec::tokenized(tokenizer_spec(field, raw)?)
    } else {
        FieldSpec::plain()
    };

    Ok(match fast.as_ref().map(RawFast::option) {
        Some((kind, enabled)) => spec.fast(kind, enabled),
        None => spec,
    })
}

fn build(raw: RawIndex) -> ParadeResult<Bm25Index> {
    let mut index = Bm25Index::new(raw.name, raw.key_field);
    for (field, config) in &raw.fields {
        index = index.field(field.clone(), field_spec(field, config)?)?;
    }
    index.validate()?;
    tracing::debug!(
        index = index.name(),
        fields = index.fields().len(),
        "loaded index definition"
    );
    Ok(index)
}

/// Loads an index definition from a JSON value.
pub fn from_json_value(value: &JsonValue) -> ParadeResult<Bm25Index> {
    let raw: RawIndex = serde_json::from_value(value.clone()).map_err(|e| {
        ParadeError::ConfigurationError(format!("Failed to read index definition: {e}"))
    })?;
    build(raw)
}

/// Loads an index definition from JSON text.
pub fn from_json_str(json: &str) -> ParadeResult<Bm25Index> {
    let raw: RawIndex = serde_json::from_str(json)
        .map_err(|e| ParadeError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;
    build(raw)
}

/// Loads an index definition from TOML text.
pub fn from_toml_str(toml_str: &str) -> ParadeResult<Bm25Index> {
    let raw: RawIndex = toml::from_str(toml_str)
        .map_err(|e| ParadeError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;
    build(raw)
}

/// Loads an index definition from a `.toml` or `.json` file.
pub fn from_file(path: impl AsRef<Path>) -> ParadeResult<Bm25Index> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        ParadeError::ConfigurationError(format!(
            "Failed to read index definition {}: {e}",
            path.display()
        ))
    })?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => from_toml_str(&content),
        Some("json") => from_json_str(&content),
        _ => Err(ParadeError::ConfigurationError(format!(
            "Unsupported index definition format: {}",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_and_tokenized() {
        let index = from_json_value(&json!({
            "name": "products_idx",
            "key_field": "id",
            "fields": {
                "id": {},
                "description": {
                    "tokenizer": "simple",
                    "filters": ["lowercase", "stemmer"],
                    "stemmer": "english"
                }
            }
        }))
        .unwrap();
        assert_eq!(
            index.create_sql("products").unwrap(),
            "CREATE INDEX \"products_idx\" ON \"products\"\nUSING bm25 (\n    \"id\",\n    (\"description\"::pdb.simple('lowercase=true,stemmer=english'))\n)\nWITH (key_field='id')"
        );
    }

    #[test]
    fn test_config_without_tokenizer() {
        let err = field_spec("description", &json!({"filters": ["lowercase"]})).unwrap_err();
        assert!(matches!(err, ParadeError::InvalidTokenizerConfig { ref field, .. } if field == "description"));

        let err = field_spec("description", &json!({"stemmer": "english"})).unwrap_err();
        assert!(err.to_string().contains("without an explicit tokenizer"));
    }

    #[test]
    fn test_json_key_without_tokenizer() {
        let err = field_spec(
            "metadata",
            &json!({"json_keys": {"color": {"filters": ["lowercase"]}}}),
        )
        .unwrap_err();
        assert!(matches!(err, ParadeError::InvalidTokenizerConfig { ref field, .. } if field == "metadata.color"));
    }

    #[test]
    fn test_legacy_options_rejected() {
        let err = field_spec("title", &json!({"tokenizer": "simple", "options": {"a": 1}})).unwrap_err();
        assert!(err.to_string().contains("'options'"));
    }

    #[test]
    fn test_mixed_tokenizer_shapes() {
        let err = field_spec(
            "title",
            &json!({"tokenizer": "simple", "tokenizers": [{"tokenizer": "literal"}]}),
        )
        .unwrap_err();
        assert!(matches!(err, ParadeError::MalformedTokenizerList { .. }));

        let err = field_spec("title", &json!({"tokenizers": []})).unwrap_err();
        assert!(matches!(err, ParadeError::MalformedTokenizerList { .. }));

        let err = field_spec("title", &json!({"tokenizers": ["simple"]})).unwrap_err();
        assert!(matches!(err, ParadeError::MalformedTokenizerList { .. }));
    }

    #[test]
    fn test_multi_tokenizers_and_args() {
        let spec = field_spec(
            "title",
            &json!({"tokenizers": [
                {"tokenizer": "simple"},
                {"tokenizer": "ngram", "args": [3, 3], "alias": "title_ngram",
                 "named_args": {"prefix_only": true}}
            ]}),
        )
        .unwrap();
        assert_eq!(
            spec.expressions("title"),
            vec![
                "(\"title\"::pdb.simple)",
                "(\"title\"::pdb.ngram(3,3,'alias=title_ngram,prefix_only=true'))",
            ]
        );
    }

    #[test]
    fn test_fast_kind() {
        let spec = field_spec("rating", &json!({"fast": "numeric"})).unwrap();
        assert_eq!(spec.fast_option(), Some((FastKind::Numeric, true)));
        assert!(field_spec("rating", &json!({"fast": "quick"})).is_err());
    }

    #[test]
    fn test_fast_table_form() {
        let index = from_json_value(&json!({
            "name": "product_search_idx",
            "key_field": "id",
            "fields": {
                "id": {},
                "description": {"fast": {"kind": "text"}},
                "category": {"fast": {"kind": "text", "enabled": false}}
            }
        }))
        .unwrap();
        assert_eq!(
            index.create_sql("products").unwrap(),
            "CREATE INDEX \"product_search_idx\" ON \"products\"\nUSING bm25 (\n    \"id\",\n    \"description\",\n    \"category\"\n)\nWITH (key_field='id', text_fields='{\"description\":{\"fast\":true},\"category\":{\"fast\":false}}')"
        );
        assert!(field_spec("rating", &json!({"fast": {"enabled": false}})).is_err());
        assert!(field_spec("rating", &json!({"fast": {"kind": "numeric", "on": true}})).is_err());
    }

    #[test]
    fn test_fast_false_in_toml() {
        let index = from_toml_str(
            r#"
name = "product_search_idx"
key_field = "id"

[fields.id]

[fields.description]
fast = { kind = "text", enabled = false }
"#,
        )
        .unwrap();
        assert!(index
            .create_sql("products")
            .unwrap()
            .ends_with("WITH (key_field='id', text_fields='{\"description\":{\"fast\":false}}')"));
    }

    #[test]
    fn test_named_args_with_value_lists() {
        let index = from_json_str(
            r#"{
                "name": "product_search_idx",
                "key_field": "id",
                "fields": {
                    "id": {},
                    "description": {
                        "tokenizer": "simple",
                        "named_args": {
                            "lowercase": false,
                            "stopwords_language": "English,French",
                            "remove_long": 20,
                            "remove_short": 2
                        },
                        "stemmer": "english"
                    }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(
            index.create_sql("tests_product").unwrap(),
            "CREATE INDEX \"product_search_idx\" ON \"tests_product\"\nUSING bm25 (\n    \"id\",\n    (\"description\"::pdb.simple('lowercase=false,stopwords_language=English,French,remove_long=20,remove_short=2,stemmer=english'))\n)\nWITH (key_field='id')"
        );
    }

    #[test]
    fn test_unaliased_secondary_tokenizers() {
        let index = from_json_str(
            r#"{"name": "product_search_idx", "key_field": "id", "fields": {
                "id": {},
                "description": {"tokenizers": [{"tokenizer": "literal"}, {"tokenizer": "simple"}]}
            }}"#,
        )
        .unwrap();
        assert_eq!(
            index.create_sql("tests_product").unwrap(),
            "CREATE INDEX \"product_search_idx\" ON \"tests_product\"\nUSING bm25 (\n    \"id\",\n    (\"description\"::pdb.literal),\n    (\"description\"::pdb.simple)\n)\nWITH (key_field='id')"
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = field_spec("title", &json!({"tokeniser": "simple"})).unwrap_err();
        assert!(matches!(err, ParadeError::InvalidTokenizerConfig { .. }));
    }

    #[test]
    fn test_toml_document() {
        let index = from_toml_str(
            r#"
name = "products_idx"
key_field = "id"

[fields.id]

[fields.metadata.json_keys.color]
tokenizer = "literal"
"#,
        )
        .unwrap();
        let sql = index.create_sql("products").unwrap();
        assert!(sql.contains("\"id\""));
        assert!(sql.contains("((\"metadata\"->>'color')::pdb.literal('alias=metadata_color'))"));
    }

    #[test]
    fn test_missing_key_field_in_document() {
        let err = from_json_str(r#"{"name": "idx", "fields": {"id": {}}}"#).unwrap_err();
        assert!(matches!(err, ParadeError::ConfigurationError(_)));
    }

    #[test]
    fn test_key_field_not_indexed() {
        let err = from_json_str(r#"{"name": "idx", "key_field": "id", "fields": {"title": null}}"#)
            .unwrap_err();
        assert!(matches!(err, ParadeError::InvalidArgument(_)));
    }
}
