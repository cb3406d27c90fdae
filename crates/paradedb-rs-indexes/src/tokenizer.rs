//! Tokenizer and field specifications for BM25 indexes.
//!
//! A [`FieldSpec`] says how one column is indexed: as-is, through one or
//! more tokenizers, or as a set of tokenized JSON keys. Specs are checked when
//! they are attached to a [`Bm25Index`](crate::bm25::Bm25Index), so an index
//! definition that exists is one that renders.

use paradedb_rs_core::sql::{is_identifier, quote_literal, quote_name};
use paradedb_rs_core::{ParadeError, ParadeResult};

/// A positional tokenizer argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizerArg {
    /// Rendered bare.
    Int(i64),
    /// Rendered as a quoted literal.
    Text(String),
}

impl TokenizerArg {
    fn to_sql(&self) -> String {
        match self {
            Self::Int(i) => i.to_string(),
            Self::Text(s) => quote_literal(s),
        }
    }
}

impl From<i64> for TokenizerArg {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for TokenizerArg {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<&str> for TokenizerArg {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for TokenizerArg {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// One tokenizer cast: `pdb.<tokenizer>(<args>, '<options>')`.
///
/// # Examples
///
/// ```
/// use paradedb_rs_indexes::tokenizer::TokenizerSpec;
///
/// let spec = TokenizerSpec::new("simple")
///     .filters(["lowercase", "stemmer"])
///     .stemmer("english");
/// assert_eq!(spec.to_sql(None), "pdb.simple('lowercase=true,stemmer=english')");
///
/// let ngram = TokenizerSpec::new("ngram").arg(3).arg(3).named_arg("prefix_only", "true");
/// assert_eq!(ngram.to_sql(Some("title_ngram")), "pdb.ngram(3,3,'alias=title_ngram,prefix_only=true')");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerSpec {
    tokenizer: String,
    args: Vec<TokenizerArg>,
    filters: Vec<String>,
    stemmer: Option<String>,
    named_args: Vec<(String, String)>,
    alias: Option<String>,
}

impl TokenizerSpec {
    pub fn new(tokenizer: impl Into<String>) -> Self {
        Self {
            tokenizer: tokenizer.into(),
            args: Vec::new(),
            filters: Vec::new(),
            stemmer: None,
            named_args: Vec::new(),
            alias: None,
        }
    }

    /// Appends a positional argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<TokenizerArg>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends a token filter, rendered as `<name>=true`.
    #[must_use]
    pub fn filter(mut self, name: impl Into<String>) -> Self {
        self.filters.push(name.into());
        self
    }

    #[must_use]
    pub fn filters<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.extend(names.into_iter().map(Into::into));
        self
    }

    /// Stemmer language. Takes the place of a `stemmer` filter when one is
    /// listed, and is appended last otherwise.
    #[must_use]
    pub fn stemmer(mut self, language: impl Into<String>) -> Self {
        self.stemmer = Some(language.into());
        self
    }

    /// Appends a `key=value` option. Re-using a key replaces its value.
    #[must_use]
    pub fn named_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.named_args.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.named_args.push((key, value));
        }
        self
    }

    /// Name under which this tokenization is addressable.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn tokenizer(&self) -> &str {
        &self.tokenizer
    }

    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Checks that every name spliced into the DDL is a bare identifier and
    /// that named-argument values are non-empty.
    pub fn validate(&self, field: &str) -> ParadeResult<()> {
        let invalid = |reason: String| ParadeError::InvalidTokenizerConfig {
            field: field.to_string(),
            reason,
        };
        if !is_identifier(&self.tokenizer) {
            return Err(invalid(format!(
                "tokenizer name '{}' is not a bare identifier",
                self.tokenizer
            )));
        }
        let names = self
            .filters
            .iter()
            .chain(self.named_args.iter().map(|(k, _)| k))
            .chain(self.alias.iter())
            .chain(self.stemmer.iter());
        for name in names {
            if !is_identifier(name) {
                return Err(invalid(format!("'{name}' is not a bare identifier")));
            }
        }
        for (key, value) in &self.named_args {
            if value.is_empty() {
                return Err(invalid(format!("value for '{key}' must be non-empty")));
            }
        }
        Ok(())
    }

    /// The unquoted option string, or `None` when there are no options.
    ///
    /// `alias` overrides the spec's own alias.
    pub fn options(&self, alias: Option<&str>) -> Option<String> {
        let mut parts: Vec<String> = Vec::new();
        if let Some(alias) = alias.or(self.alias.as_deref()) {
            parts.push(format!("alias={alias}"));
        }
        let mut stemmer_listed = false;
        for name in &self.filters {
            match (name.as_str(), &self.stemmer) {
                ("stemmer", Some(language)) => {
                    stemmer_listed = true;
                    parts.push(format!("stemmer={language}"));
                }
                _ => parts.push(format!("{name}=true")),
            }
        }
        for (key, value) in &self.named_args {
            parts.push(format!("{key}={value}"));
        }
        if let (Some(language), false) = (&self.stemmer, stemmer_listed) {
            parts.push(format!("stemmer={language}"));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(","))
        }
    }

    /// Renders the cast target, e.g. `pdb.simple('lowercase=true')`.
    pub fn to_sql(&self, alias: Option<&str>) -> String {
        let mut args: Vec<String> = self.args.iter().map(TokenizerArg::to_sql).collect();
        if let Some(options) = self.options(alias) {
            args.push(quote_literal(&options));
        }
        if args.is_empty() {
            format!("pdb.{}", self.tokenizer)
        } else {
            format!("pdb.{}({})", self.tokenizer, args.join(","))
        }
    }
}

/// Column kind for fast-field options in the `WITH` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FastKind {
    Text,
    Numeric,
    Boolean,
    Datetime,
    Json,
}

impl FastKind {
    /// All kinds in the order their options are rendered.
    pub const ALL: [Self; 5] = [
        Self::Text,
        Self::Numeric,
        Self::Boolean,
        Self::Datetime,
        Self::Json,
    ];

    /// The index option name, e.g. `text_fields`.
    pub const fn option_name(self) -> &'static str {
        match self {
            Self::Text => "text_fields",
            Self::Numeric => "numeric_fields",
            Self::Boolean => "boolean_fields",
            Self::Datetime => "datetime_fields",
            Self::Json => "json_fields",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldShape {
    Plain,
    Tokenized(Vec<TokenizerSpec>),
    JsonKeys(Vec<(String, TokenizerSpec)>),
}

/// How one column is indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    shape: FieldShape,
    fast: Option<(FastKind, bool)>,
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self::plain()
    }
}

impl FieldSpec {
    /// The bare column.
    pub const fn plain() -> Self {
        Self {
            shape: FieldShape::Plain,
            fast: None,
        }
    }

    /// The column through one tokenizer.
    pub fn tokenized(spec: TokenizerSpec) -> Self {
        Self {
            shape: FieldShape::Tokenized(vec![spec]),
            fast: None,
        }
    }

    /// The column through several tokenizers, one cast each.
    ///
    /// The list must be non-empty and at most one entry may omit an alias.
    pub fn multi(specs: impl IntoIterator<Item = TokenizerSpec>) -> Self {
        Self {
            shape: FieldShape::Tokenized(specs.into_iter().collect()),
            fast: None,
        }
    }

    /// Tokenized JSON keys. A key without an alias is addressable as
    /// `<field>_<key>`.
    pub fn json_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = (K, TokenizerSpec)>,
        K: Into<String>,
    {
        Self {
            shape: FieldShape::JsonKeys(keys.into_iter().map(|(k, s)| (k.into(), s)).collect()),
            fast: None,
        }
    }

    /// Marks the column as a fast field of `kind`. Has no effect on JSON-key
    /// fields.
    #[must_use]
    pub const fn fast(mut self, kind: FastKind, enabled: bool) -> Self {
        self.fast = Some((kind, enabled));
        self
    }

    pub const fn fast_option(&self) -> Option<(FastKind, bool)> {
        match self.shape {
            FieldShape::JsonKeys(_) => None,
            _ => self.fast,
        }
    }

    /// Returns `true` for a bare column or tokenized column (the column itself
    /// is indexed).
    pub const fn indexes_column(&self) -> bool {
        !matches!(self.shape, FieldShape::JsonKeys(_))
    }

    /// Checks the spec for `field`.
    pub fn validate(&self, field: &str) -> ParadeResult<()> {
        match &self.shape {
            FieldShape::Plain => Ok(()),
            FieldShape::Tokenized(specs) => {
                if specs.is_empty() {
                    return Err(ParadeError::MalformedTokenizerList {
                        field: field.to_string(),
                        reason: "tokenizers list cannot be empty".into(),
                    });
                }
                specs.iter().try_for_each(|s| s.validate(field))
            }
            FieldShape::JsonKeys(keys) => {
                if keys.is_empty() {
                    return Err(ParadeError::InvalidTokenizerConfig {
                        field: field.to_string(),
                        reason: "json_keys cannot be empty".into(),
                    });
                }
                for (key, spec) in keys {
                    let path = format!("{field}.{key}");
                    spec.validate(&path)?;
                    if spec.alias.is_none() && !is_identifier(&format!("{field}_{key}")) {
                        return Err(ParadeError::InvalidTokenizerConfig {
                            field: path,
                            reason: "the default alias is not a bare identifier; set one".into(),
                        });
                    }
                }
                Ok(())
            }
        }
    }

    /// The index expressions for `field`, in order.
    pub fn expressions(&self, field: &str) -> Vec<String> {
        let column = quote_name(field);
        match &self.shape {
            FieldShape::Plain => vec![column],
            FieldShape::Tokenized(specs) => specs
                .iter()
                .map(|spec| format!("({column}::{})", spec.to_sql(None)))
                .collect(),
            FieldShape::JsonKeys(keys) => keys
                .iter()
                .map(|(key, spec)| {
                    let alias = spec
                        .alias
                        .clone()
                        .unwrap_or_else(|| format!("{field}_{key}"));
                    format!(
                        "(({column}->>{})::{})",
                        quote_literal(key),
                        spec.to_sql(Some(&alias))
                    )
                })
                .collect(),
        }
    }
}
