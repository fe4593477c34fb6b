// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Markdown pipe-table builder.
//!
//! [`FormTable`] is a plain grid of strings. Row 0 is the header row; every
//! other row is data. The grid renders to a GitHub-flavoured pipe table via
//! its [`Display`](std::fmt::Display) implementation.
//!
//! # Example
//!
//! ```
//! use pm2md::table::{FormTable, Justify};
//!
//! let mut table = FormTable::with_header(["field", "type"]);
//! table.set_justify(1, Justify::Center);
//! table.push_row(["id", "integer"]);
//!
//! assert_eq!(
//!     table.to_string(),
//!     "\n| field | type |\n| -- | :--: |\n| id | integer |\n\n"
//! );
//! ```

use std::fmt;

/// Column alignment, expressed in the separator line under the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Justify {
    /// Renderer default (`--`).
    #[default]
    Default,
    /// Left aligned (`:--`).
    Left,
    /// Centered (`:--:`).
    Center,
    /// Right aligned (`--:`).
    Right,
}

impl Justify {
    /// Returns the separator-line marker for this alignment.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Default => "--",
            Self::Left => ":--",
            Self::Center => ":--:",
            Self::Right => "--:",
        }
    }
}

/// A rectangular grid of cells rendered as a Markdown table.
///
/// Every row always holds exactly [`columns`](Self::columns) cells, and there
/// is one [`Justify`] setting per column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormTable {
    columns: usize,
    justify: Vec<Justify>,
    rows: Vec<Vec<String>>,
}

impl FormTable {
    /// Creates a table of `rows` x `columns` blank cells.
    #[must_use]
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            columns,
            justify: vec![Justify::Default; columns],
            rows: vec![vec![String::new(); columns]; rows],
        }
    }

    /// Creates a table whose only row is the given header.
    #[must_use]
    pub fn with_header<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let header: Vec<String> = header.into_iter().map(Into::into).collect();
        Self {
            columns: header.len(),
            justify: vec![Justify::Default; header.len()],
            rows: vec![header],
        }
    }

    /// Number of rows, header included.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows below the header.
    #[must_use]
    pub const fn data_rows(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// Returns `true` when the table has no data rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data_rows() == 0
    }

    /// Returns the text of a cell, if it exists.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Appends `count` blank rows.
    pub fn add_rows(&mut self, count: usize) {
        self.insert_rows(self.rows.len(), count);
    }

    /// Inserts `count` blank rows before row `at`.
    ///
    /// Positions past the end append.
    pub fn insert_rows(&mut self, at: usize, count: usize) {
        let at = at.min(self.rows.len());
        let blank = vec![String::new(); self.columns];
        self.rows.splice(at..at, std::iter::repeat_n(blank, count));
    }

    /// Appends `count` blank columns.
    pub fn add_columns(&mut self, count: usize) {
        self.insert_columns(self.columns, count);
    }

    /// Inserts `count` blank columns before column `at`.
    ///
    /// Positions past the end append. New columns use [`Justify::Default`].
    pub fn insert_columns(&mut self, at: usize, count: usize) {
        let at = at.min(self.columns);
        for row in &mut self.rows {
            row.splice(at..at, std::iter::repeat_n(String::new(), count));
        }
        self.justify
            .splice(at..at, std::iter::repeat_n(Justify::Default, count));
        self.columns += count;
    }

    /// Sets the alignment of one column.
    ///
    /// # Panics
    ///
    /// Panics if `column` is out of range.
    pub fn set_justify(&mut self, column: usize, justify: Justify) {
        self.justify[column] = justify;
    }

    /// Overwrites the text of one cell.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `column` is out of range.
    pub fn set_text(&mut self, row: usize, column: usize, text: impl Into<String>) {
        self.rows[row][column] = text.into();
    }

    /// Appends a row filled from `cells`.
    ///
    /// Missing trailing cells stay blank and cells beyond the column count are
    /// dropped.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells
            .into_iter()
            .take(self.columns)
            .map(Into::into)
            .collect();
        row.resize(self.columns, String::new());
        self.rows.push(row);
    }
}

impl fmt::Display for FormTable {
    /// Writes the table surrounded by blank lines.
    ///
    /// A table holding nothing but its header row writes nothing at all, so
    /// callers can detect an empty table from an empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }

        f.write_str("\n")?;
        for (i, row) in self.rows.iter().enumerate() {
            write_line(f, row.iter().map(|cell| escape_cell(cell)))?;
            if i == 0 {
                write_line(f, self.justify.iter().map(|j| j.marker().into()))?;
            }
        }
        f.write_str("\n")
    }
}

fn write_line<I>(f: &mut fmt::Formatter<'_>, cells: I) -> fmt::Result
where
    I: Iterator<Item = String>,
{
    let mut first = true;
    for cell in cells {
        if first {
            write!(f, "| {cell}")?;
            first = false;
        } else {
            write!(f, " | {cell}")?;
        }
    }
    if first {
        f.write_str("\n")
    } else {
        f.write_str(" |\n")
    }
}

/// Keeps a cell on one line and stops stray pipes from splitting it.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', "<br />")
}
