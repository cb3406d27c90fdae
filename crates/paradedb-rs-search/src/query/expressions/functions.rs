//! Annotation functions: scores, snippets and aggregates.
//!
//! These render SQL expressions for the select list. Field names are quoted
//! as identifiers; tags and JSON are escaped literals.

use std::fmt;
use std::str::FromStr;

use paradedb_rs_core::sql::{quote_literal, quote_name};
use paradedb_rs_core::{ParadeError, ParadeResult, Settings};

/// Default highlight tags used when only a later positional argument is set.
pub const DEFAULT_START_TAG: &str = "<b>";
/// See [`DEFAULT_START_TAG`].
pub const DEFAULT_END_TAG: &str = "</b>";

/// The BM25 score of each row (`pdb.score(key)`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    key_field: String,
}

impl Score {
    /// Scores rows by their key field.
    pub fn new(key_field: impl Into<String>) -> Self {
        Self {
            key_field: key_field.into(),
        }
    }

    /// Renders the SQL expression.
    pub fn to_sql(&self) -> String {
        format!("pdb.score({})", quote_name(&self.key_field))
    }
}

/// A highlighted fragment of a field (`pdb.snippet`).
///
/// `start_tag`, `end_tag` and `max_num_chars` are positional in SQL, so
/// setting a later one fills the earlier tags with `<b>` / `</b>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    field: String,
    start_tag: Option<String>,
    end_tag: Option<String>,
    max_num_chars: Option<u32>,
}

impl Snippet {
    /// Highlights matches in `field`.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            start_tag: None,
            end_tag: None,
            max_num_chars: None,
        }
    }

    /// Uses the snippet tags configured in `settings`.
    pub fn from_settings(field: impl Into<String>, settings: &Settings) -> Self {
        Self {
            field: field.into(),
            start_tag: settings.snippet_start_tag.clone(),
            end_tag: settings.snippet_end_tag.clone(),
            max_num_chars: None,
        }
    }

    /// Text inserted before each match.
    #[must_use]
    pub fn start_tag(mut self, tag: impl Into<String>) -> Self {
        self.start_tag = Some(tag.into());
        self
    }

    /// Text inserted after each match.
    #[must_use]
    pub fn end_tag(mut self, tag: impl Into<String>) -> Self {
        self.end_tag = Some(tag.into());
        self
    }

    /// Maximum fragment length.
    #[must_use]
    pub const fn max_num_chars(mut self, n: u32) -> Self {
        self.max_num_chars = Some(n);
        self
    }

    /// Renders the SQL expression.
    pub fn to_sql(&self) -> String {
        let mut args = vec![quote_name(&self.field)];
        let needs_end = self.end_tag.is_some() || self.max_num_chars.is_some();
        if self.start_tag.is_some() || needs_end {
            args.push(quote_literal(self.start_tag.as_deref().unwrap_or(DEFAULT_START_TAG)));
        }
        if needs_end {
            args.push(quote_literal(self.end_tag.as_deref().unwrap_or(DEFAULT_END_TAG)));
        }
        if let Some(n) = self.max_num_chars {
            args.push(n.to_string());
        }
        format!("pdb.snippet({})", args.join(", "))
    }
}

/// Sort order for [`Snippets`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetSort {
    /// Best-scoring fragments first.
    Score,
    /// Fragments in document order.
    Position,
}

impl SnippetSort {
    /// The value passed to `sort_by`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::Position => "position",
        }
    }
}

impl fmt::Display for SnippetSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SnippetSort {
    type Err = ParadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "score" => Ok(Self::Score),
            "position" => Ok(Self::Position),
            other => Err(ParadeError::invalid(format!(
                "sort_by must be one of 'score', 'position', got '{other}'"
            ))),
        }
    }
}

/// Every highlighted fragment of a field (`pdb.snippets`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippets {
    field: String,
    start_tag: Option<String>,
    end_tag: Option<String>,
    max_num_chars: Option<u32>,
    limit: Option<u32>,
    offset: Option<u32>,
    sort_by: Option<SnippetSort>,
}

impl Snippets {
    /// Collects fragments of `field`.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            start_tag: None,
            end_tag: None,
            max_num_chars: None,
            limit: None,
            offset: None,
            sort_by: None,
        }
    }

    /// Text inserted before each match.
    #[must_use]
    pub fn start_tag(mut self, tag: impl Into<String>) -> Self {
        self.start_tag = Some(tag.into());
        self
    }

    /// Text inserted after each match.
    #[must_use]
    pub fn end_tag(mut self, tag: impl Into<String>) -> Self {
        self.end_tag = Some(tag.into());
        self
    }

    /// Maximum length of each fragment.
    #[must_use]
    pub const fn max_num_chars(mut self, n: u32) -> Self {
        self.max_num_chars = Some(n);
        self
    }

    /// Maximum number of fragments.
    #[must_use]
    pub const fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n);
        self
    }

    /// Fragments to skip.
    #[must_use]
    pub const fn offset(mut self, n: u32) -> Self {
        self.offset = Some(n);
        self
    }

    /// Fragment ordering.
    #[must_use]
    pub const fn sort_by(mut self, sort: SnippetSort) -> Self {
        self.sort_by = Some(sort);
        self
    }

    /// Renders the SQL expression.
    pub fn to_sql(&self) -> String {
        let mut args = vec![quote_name(&self.field)];
        if let Some(ref tag) = self.start_tag {
            args.push(format!("start_tag => {}", quote_literal(tag)));
        }
        if let Some(ref tag) = self.end_tag {
            args.push(format!("end_tag => {}", quote_literal(tag)));
        }
        if let Some(n) = self.max_num_chars {
            args.push(format!("max_num_chars => {n}"));
        }
        // limit and offset are reserved words
        if let Some(n) = self.limit {
            args.push(format!("\"limit\" => {n}"));
        }
        if let Some(n) = self.offset {
            args.push(format!("\"offset\" => {n}"));
        }
        if let Some(sort) = self.sort_by {
            args.push(format!("sort_by => {}", quote_literal(sort.as_str())));
        }
        format!("pdb.snippets({})", args.join(", "))
    }
}

/// Byte offsets of each match in a field (`pdb.snippet_positions`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetPositions {
    field: String,
}

impl SnippetPositions {
    /// Reports match positions in `field`.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Renders the SQL expression.
    pub fn to_sql(&self) -> String {
        format!("pdb.snippet_positions({})", quote_name(&self.field))
    }
}

/// A ParadeDB aggregate (`pdb.agg`), optionally windowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agg {
    json: String,
    exact: Option<bool>,
    windowed: bool,
}

impl Agg {
    /// An aggregate from its JSON text. The text is passed through escaped.
    pub fn new(json: impl Into<String>) -> Self {
        Self {
            json: json.into(),
            exact: None,
            windowed: false,
        }
    }

    /// An aggregate from a JSON value, serialized compactly.
    pub fn from_json(spec: &serde_json::Value) -> ParadeResult<Self> {
        Ok(Self::new(serde_json::to_string(spec)?))
    }

    /// `exact(false)` allows the engine to approximate bucket counts.
    #[must_use]
    pub const fn exact(mut self, exact: bool) -> Self {
        self.exact = Some(exact);
        self
    }

    /// Computes the aggregate over the whole result set (`OVER ()`).
    #[must_use]
    pub const fn over(mut self) -> Self {
        self.windowed = true;
        self
    }

    /// The JSON text of the aggregate.
    pub fn json(&self) -> &str {
        &self.json
    }

    /// Renders the SQL expression.
    pub fn to_sql(&self) -> String {
        let mut sql = if self.exact == Some(false) {
            format!("pdb.agg({}, false)", quote_literal(&self.json))
        } else {
            format!("pdb.agg({})", quote_literal(&self.json))
        };
        if self.windowed {
            sql.push_str(" OVER ()");
        }
        sql
    }
}

/// Any select-list function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// BM25 score.
    Score(Score),
    /// Single highlighted fragment.
    Snippet(Snippet),
    /// All highlighted fragments.
    Snippets(Snippets),
    /// Match byte offsets.
    SnippetPositions(SnippetPositions),
    /// Aggregate.
    Agg(Agg),
}

impl Annotation {
    /// Renders the SQL expression.
    pub fn to_sql(&self) -> String {
        match self {
            Self::Score(s) => s.to_sql(),
            Self::Snippet(s) => s.to_sql(),
            Self::Snippets(s) => s.to_sql(),
            Self::SnippetPositions(s) => s.to_sql(),
            Self::Agg(a) => a.to_sql(),
        }
    }

    /// Returns `true` for aggregates without a window, which turn the
    /// query into a single-row aggregate.
    pub const fn is_plain_aggregate(&self) -> bool {
        matches!(self, Self::Agg(a) if !a.windowed)
    }
}

impl From<Score> for Annotation {
    fn from(v: Score) -> Self {
        Self::Score(v)
    }
}

impl From<Snippet> for Annotation {
    fn from(v: Snippet) -> Self {
        Self::Snippet(v)
    }
}

impl From<Snippets> for Annotation {
    fn from(v: Snippets) -> Self {
        Self::Snippets(v)
    }
}

impl From<SnippetPositions> for Annotation {
    fn from(v: SnippetPositions) -> Self {
        Self::SnippetPositions(v)
    }
}

impl From<Agg> for Annotation {
    fn from(v: Agg) -> Self {
        Self::Agg(v)
    }
}
