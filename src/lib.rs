// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Convert Postman collection exports to Markdown API documentation.
//!
//! This crate provides parsing and rendering functionality for turning a
//! Postman v2.1 collection into a readable Markdown reference: one heading
//! per folder, one section per request with its path, headers, parameters and
//! saved example responses.
//!
//! # Overview
//!
//! 1. [`parser`] detects the export format and decodes it into [`model`] types
//! 2. [`renderer`] walks the collection tree and produces Markdown, using the
//!    helpers in [`markdown`] and [`table`]
//! 3. [`convert`] ties both to the filesystem
//!
//! # Example
//!
//! ```no_run
//! use pm2md::parser::Parser;
//!
//! let json = std::fs::read_to_string("api.postman_collection.json").unwrap();
//! let doc = Parser::default().parse(&json).unwrap();
//!
//! std::fs::write(format!("{}.md", doc.name()), doc.render()).unwrap();
//! ```
//!
//! # Modules
//!
//! - [`model`]: typed Postman v2.1 collection model
//! - [`parser`]: format detection and decoding
//! - [`renderer`]: Markdown generation for collections
//! - [`table`]: Markdown pipe-table builder
//! - [`markdown`]: Markdown string helpers
//! - [`convert`]: reading exports and writing documents

#![deny(missing_docs)]

pub mod convert;
pub mod markdown;
pub mod model;
pub mod parser;
pub mod renderer;
pub mod table;
