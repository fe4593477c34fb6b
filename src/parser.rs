// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Schema detection and decoding of collection exports.
//!
//! A [`Parser`] holds an ordered list of [`Dialect`]s. Each dialect
//! recognises its own exports from the raw text and decodes them into a
//! [`Document`], something with a name that can render itself as Markdown.
//! The first dialect whose signature matches wins; when none match the
//! input is rejected with [`ParseError::UnsupportedSchema`].
//!
//! Only Postman v2.1 is built in ([`PostmanV21`]).
//!
//! # Example
//!
//! ```
//! use pm2md::parser::Parser;
//!
//! let json = r#"{
//!     "info": {
//!         "name": "Pets",
//!         "schema": "https://schema.getpostman.com/json/collection/v2.1.0/collection.json"
//!     },
//!     "item": []
//! }"#;
//!
//! let doc = Parser::default().parse(json).unwrap();
//! assert_eq!(doc.name(), "Pets");
//! assert!(doc.render().starts_with("# Pets"));
//! ```

use crate::model::Collection;
use crate::renderer;
use snafu::prelude::*;

/// Schema URL that identifies a Postman v2.1 collection.
pub const POSTMAN_V21_SCHEMA: &str =
    "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

/// Error type for parsing failures.
#[derive(Debug, Snafu)]
pub enum ParseError {
    /// No registered dialect recognised the input.
    #[snafu(display("unsupported schema"))]
    UnsupportedSchema,

    /// The input matched a dialect but could not be decoded.
    #[snafu(display("failed to parse JSON: {source}"))]
    Json {
        /// The underlying JSON parsing error.
        source: serde_json::Error,
    },
}

/// A decoded export that can be written out as Markdown.
pub trait Document {
    /// The document name, used as heading and output file stem.
    fn name(&self) -> &str;

    /// Renders the whole document as Markdown.
    fn render(&self) -> String;
}

impl Document for Collection {
    fn name(&self) -> &str {
        &self.info.name
    }

    fn render(&self) -> String {
        renderer::render_collection(self)
    }
}

/// One supported export format.
pub trait Dialect {
    /// Short human-readable format name, for logs.
    fn name(&self) -> &'static str;

    /// Returns `true` if `raw` looks like this format.
    fn matches(&self, raw: &str) -> bool;

    /// Decodes `raw`, which [`matches`](Self::matches) accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` cannot be decoded.
    fn parse(&self, raw: &str) -> Result<Box<dyn Document>, ParseError>;
}

/// The Postman collection v2.1 format.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostmanV21;

impl Dialect for PostmanV21 {
    fn name(&self) -> &'static str {
        "Postman v2.1"
    }

    fn matches(&self, raw: &str) -> bool {
        raw.contains(POSTMAN_V21_SCHEMA)
    }

    fn parse(&self, raw: &str) -> Result<Box<dyn Document>, ParseError> {
        let collection: Collection = serde_json::from_str(raw).context(JsonSnafu)?;
        Ok(Box::new(collection))
    }
}

/// Picks a dialect for each input and decodes it.
pub struct Parser {
    dialects: Vec<Box<dyn Dialect>>,
}

impl Default for Parser {
    /// A parser that knows every built-in dialect.
    fn default() -> Self {
        Self::empty().with_dialect(PostmanV21)
    }
}

impl Parser {
    /// Creates a parser with no dialects. It rejects every input.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            dialects: Vec::new(),
        }
    }

    /// Registers another dialect after the existing ones.
    #[must_use]
    pub fn with_dialect(mut self, dialect: impl Dialect + 'static) -> Self {
        self.dialects.push(Box::new(dialect));
        self
    }

    /// Decodes `raw` with the first dialect that recognises it.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnsupportedSchema`] if no dialect matches, or
    /// the matching dialect's decode error.
    pub fn parse(&self, raw: &str) -> Result<Box<dyn Document>, ParseError> {
        let dialect = self
            .dialects
            .iter()
            .find(|dialect| dialect.matches(raw))
            .context(UnsupportedSchemaSnafu)?;

        log::debug!("detected {} export", dialect.name());
        dialect.parse(raw)
    }
}

/// Decodes a Postman v2.1 export into its typed model.
///
/// # Errors
///
/// Returns [`ParseError::UnsupportedSchema`] if the text does not mention the
/// v2.1 schema URL, or [`ParseError::Json`] if it is not a valid collection.
pub fn parse_collection(raw: &str) -> Result<Collection, ParseError> {
    ensure!(PostmanV21.matches(raw), UnsupportedSchemaSnafu);
    serde_json::from_str(raw).context(JsonSnafu)
}
