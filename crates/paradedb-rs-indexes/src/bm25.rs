//! BM25 index definitions and their DDL.

use paradedb_rs_core::logging::compile_span;
use paradedb_rs_core::sql::{quote_literal, quote_name};
use paradedb_rs_core::{ParadeError, ParadeResult};
use serde_json::{Map, Value as JsonValue};

use crate::tokenizer::{FastKind, FieldSpec};

/// A ParadeDB BM25 index over one table.
///
/// Fields are rendered in the order they were added, so the generated DDL is
/// stable across runs.
///
/// # Examples
///
/// ```
/// use paradedb_rs_indexes::bm25::Bm25Index;
/// use paradedb_rs_indexes::tokenizer::{FieldSpec, TokenizerSpec};
///
/// let index = Bm25Index::new("product_search_idx", "id")
///     .field("id", FieldSpec::plain())
///     .unwrap()
///     .field(
///         "description",
///         FieldSpec::tokenized(TokenizerSpec::new("simple").filters(["lowercase", "stemmer"]).stemmer("english")),
///     )
///     .unwrap();
/// assert_eq!(
///     index.create_sql("products").unwrap(),
///     "CREATE INDEX \"product_search_idx\" ON \"products\"\n\
///      USING bm25 (\n    \"id\",\n    (\"description\"::pdb.simple('lowercase=true,stemmer=english'))\n)\n\
///      WITH (key_field='id')"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bm25Index {
    name: String,
    key_field: String,
    fields: Vec<(String, FieldSpec)>,
}

impl Bm25Index {
    /// An index named `name` keyed on `key_field`, with no fields yet.
    pub fn new(name: impl Into<String>, key_field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_field: key_field.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a field, validating its spec.
    ///
    /// Fails with `InvalidTokenizerConfig` or `MalformedTokenizerList` for a
    /// bad spec and `InvalidArgument` for a repeated field name.
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> ParadeResult<Self> {
        let name = name.into();
        if self.fields.iter().any(|(existing, _)| *existing == name) {
            return Err(ParadeError::invalid(format!(
                "field '{name}' is already part of index '{}'",
                self.name
            )));
        }
        spec.validate(&name)?;
        self.fields.push((name, spec));
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    /// The fields in DDL order.
    pub fn fields(&self) -> &[(String, FieldSpec)] {
        &self.fields
    }

    /// Checks the index as a whole: it must have fields and index its key.
    pub fn validate(&self) -> ParadeResult<()> {
        if self.fields.is_empty() {
            return Err(ParadeError::invalid(format!(
                "index '{}' has no fields",
                self.name
            )));
        }
        let key_indexed = self
            .fields
            .iter()
            .any(|(name, spec)| *name == self.key_field && spec.indexes_column());
        if !key_indexed {
            return Err(ParadeError::invalid(format!(
                "key_field '{}' must be one of the indexed fields of '{}'",
                self.key_field, self.name
            )));
        }
        Ok(())
    }

    /// `WITH (...)` options: the key field, then fast-field groups.
    fn with_options(&self) -> ParadeResult<Vec<String>> {
        let mut options = vec![format!("key_field={}", quote_literal(&self.key_field))];
        for kind in FastKind::ALL {
            let mut group = Map::new();
            for (name, spec) in &self.fields {
                if let Some((k, enabled)) = spec.fast_option() {
                    if k == kind {
                        let mut entry = Map::new();
                        entry.insert("fast".into(), JsonValue::Bool(enabled));
                        group.insert(name.clone(), JsonValue::Object(entry));
                    }
                }
            }
            if !group.is_empty() {
                let json = serde_json::to_string(&group)?;
                options.push(format!("{}={}", kind.option_name(), quote_literal(&json)));
            }
        }
        Ok(options)
    }

    /// Renders `CREATE INDEX ... USING bm25 (...) WITH (...)` for `table`.
    pub fn create_sql(&self, table: &str) -> ParadeResult<String> {
        let span = compile_span("ddl");
        let _guard = span.enter();

        self.validate()?;
        let expressions: Vec<String> = self
            .fields
            .iter()
            .flat_map(|(name, spec)| spec.expressions(name))
            .collect();
        let sql = format!(
            "CREATE INDEX {} ON {}\nUSING bm25 (\n    {}\n)\nWITH ({})",
            quote_name(&self.name),
            quote_name(table),
            expressions.join(",\n    "),
            self.with_options()?.join(", ")
        );
        tracing::debug!(
            index = self.name.as_str(),
            expressions = expressions.len(),
            sql_len = sql.len(),
            "compiled BM25 index DDL"
        );
        Ok(sql)
    }

    /// `DROP INDEX IF EXISTS "<name>"`.
    pub fn drop_sql(&self) -> String {
        format!("DROP INDEX IF EXISTS {}", quote_name(&self.name))
    }
}
