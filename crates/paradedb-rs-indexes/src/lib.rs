//! # paradedb-rs-indexes
//!
//! BM25 index definitions for ParadeDB. A [`Bm25Index`] maps columns to
//! [`FieldSpec`]s and renders the `CREATE INDEX ... USING bm25` statement a
//! migration runs. Definitions can also be loaded from JSON or TOML documents
//! through [`dsl`].
//!
//! ## Module Overview
//!
//! - [`tokenizer`] - Tokenizer casts, field shapes and fast-field kinds
//! - [`bm25`] - The index definition and its DDL
//! - [`dsl`] - JSON/TOML index documents

#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::option_if_let_else)]

pub mod bm25;
pub mod dsl;
pub mod tokenizer;

pub use bm25::Bm25Index;
pub use tokenizer::{FastKind, FieldSpec, TokenizerArg, TokenizerSpec};
