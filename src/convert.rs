// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Loading exports from disk and writing the rendered documents.
//!
//! Every step stops at the first failure. Documents written before the
//! failure stay on disk.
//!
//! # Example
//!
//! ```no_run
//! use pm2md::{convert, parser::Parser};
//!
//! let written = convert::convert_dir("exports", true, &Parser::default(), ".").unwrap();
//! println!("wrote {} files", written.len());
//! ```

use crate::parser::{Document, ParseError, Parser};
use snafu::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Error type for conversion failures.
#[derive(Debug, Snafu)]
pub enum ConvertError {
    /// Failed to list a directory.
    #[snafu(display("failed to read directory {}: {source}", path.display()))]
    ReadDir {
        /// The directory being listed.
        path: PathBuf,
        /// The underlying traversal error.
        source: walkdir::Error,
    },

    /// Failed to read an input file.
    #[snafu(display("failed to read {}: {source}", path.display()))]
    ReadFile {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An input file could not be parsed.
    #[snafu(display("failed to parse {}: {source}", path.display()))]
    Parse {
        /// The file being parsed.
        path: PathBuf,
        /// The underlying parse error.
        source: ParseError,
    },

    /// Failed to create the output directory.
    #[snafu(display("failed to create output directory {}: {source}", path.display()))]
    CreateOutputDir {
        /// The directory being created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write an output file.
    #[snafu(display("failed to write {}: {source}", path.display()))]
    WriteFile {
        /// The file being written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// The text of one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Where the text was read from.
    pub path: PathBuf,
    /// The file contents.
    pub text: String,
}

/// Reads one input file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not UTF-8.
pub fn load_file(path: impl AsRef<Path>) -> Result<Source, ConvertError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).context(ReadFileSnafu { path })?;
    Ok(Source {
        path: path.to_path_buf(),
        text,
    })
}

/// Reads every file in a directory, sorted by file name.
///
/// Subdirectories are never descended into. With `recursive` set, each
/// subdirectory instead triggers a non-recursive re-read of `path` itself,
/// appended at the subdirectory's position in the listing. Symbolic links are
/// followed.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed or any file cannot be
/// read.
pub fn load_dir(path: impl AsRef<Path>, recursive: bool) -> Result<Vec<Source>, ConvertError> {
    let path = path.as_ref();

    let mut sources = Vec::new();
    for entry in WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.context(ReadDirSnafu { path })?;
        if entry.file_type().is_dir() {
            if recursive {
                log::debug!(
                    "{} is a subdirectory, re-reading {}",
                    entry.path().display(),
                    path.display()
                );
                sources.extend(load_dir(path, false)?);
            }
        } else {
            sources.push(load_file(entry.path())?);
        }
    }

    log::debug!("read {} files from {}", sources.len(), path.display());
    Ok(sources)
}

/// Parses every source in order.
///
/// # Errors
///
/// Returns the first parse failure; nothing after it is parsed.
pub fn parse_all(
    sources: &[Source],
    parser: &Parser,
) -> Result<Vec<Box<dyn Document>>, ConvertError> {
    sources
        .iter()
        .map(|source| {
            parser
                .parse(&source.text)
                .context(ParseSnafu { path: &source.path })
        })
        .collect()
}

/// Returns the output path for a document: `<out_dir>/<name>.md`.
#[must_use]
pub fn output_path(out_dir: &Path, doc: &dyn Document) -> PathBuf {
    out_dir.join(format!("{}.md", doc.name()))
}

/// Renders and writes each document to `<out_dir>/<name>.md`.
///
/// The directory is created if needed. Documents with the same name
/// overwrite each other.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a file cannot be
/// written.
pub fn write_documents(
    docs: &[Box<dyn Document>],
    out_dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, ConvertError> {
    let out_dir = out_dir.as_ref();
    std::fs::create_dir_all(out_dir).context(CreateOutputDirSnafu { path: out_dir })?;

    let mut written = Vec::with_capacity(docs.len());
    for doc in docs {
        let path = output_path(out_dir, doc.as_ref());
        if doc.name().is_empty() {
            log::warn!("collection has no name, writing {}", path.display());
        }

        std::fs::write(&path, doc.render()).context(WriteFileSnafu { path: &path })?;
        log::info!("Wrote {}", path.display());
        written.push(path);
    }

    Ok(written)
}

/// Converts one export file.
///
/// # Errors
///
/// Returns an error if reading, parsing or writing fails.
pub fn convert_file(
    path: impl AsRef<Path>,
    parser: &Parser,
    out_dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, ConvertError> {
    let source = load_file(path)?;
    let docs = parse_all(std::slice::from_ref(&source), parser)?;
    write_documents(&docs, out_dir)
}

/// Converts every export file in a directory.
///
/// All files are parsed before anything is written, so a parse failure
/// leaves the output directory untouched.
///
/// # Errors
///
/// Returns an error if listing, reading, parsing or writing fails.
pub fn convert_dir(
    path: impl AsRef<Path>,
    recursive: bool,
    parser: &Parser,
    out_dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, ConvertError> {
    let sources = load_dir(path, recursive)?;
    let docs = parse_all(&sources, parser)?;
    write_documents(&docs, out_dir)
}
