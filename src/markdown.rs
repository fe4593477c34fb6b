// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Markdown building blocks.
//!
//! Small string helpers shared by the renderer. None of them escape their
//! input; callers pass text that is already safe to embed.

/// Deepest heading level Markdown supports.
pub const MAX_HEADING_LEVEL: usize = 6;

/// Returns `text` as an ATX heading of the given level.
///
/// Levels 1 through 6 produce `#` through `######`. Any other level has no
/// heading form, so the text is emphasised with [`bold`] instead.
///
/// ```
/// use pm2md::markdown::heading;
///
/// assert_eq!(heading(2, "Users"), "## Users");
/// assert_eq!(heading(7, "Deep"), "**Deep**");
/// ```
#[must_use]
pub fn heading(level: usize, text: &str) -> String {
    if (1..=MAX_HEADING_LEVEL).contains(&level) {
        format!("{} {text}", "#".repeat(level))
    } else {
        bold(text)
    }
}

/// Wraps `text` in strong emphasis.
#[must_use]
pub fn bold(text: &str) -> String {
    format!("**{text}**")
}

/// Wraps `text` in emphasis.
#[must_use]
pub fn italic(text: &str) -> String {
    format!("*{text}*")
}

/// Wraps `text` in an inline code span.
///
/// ```
/// use pm2md::markdown::code;
///
/// assert_eq!(code("limit"), "`limit`");
/// ```
#[must_use]
pub fn code(text: &str) -> String {
    format!("`{text}`")
}

/// Prefixes `text` with a block quote marker.
///
/// Only the first line is quoted.
#[must_use]
pub fn quote(text: &str) -> String {
    format!("> {text}")
}

/// Wraps `text` in a fenced code block tagged with `language`.
///
/// An empty `language` yields an untagged fence.
///
/// ```
/// use pm2md::markdown::code_block;
///
/// assert_eq!(code_block("GET /users", "http"), "```http\nGET /users\n```");
/// ```
#[must_use]
pub fn code_block(text: &str, language: &str) -> String {
    format!("```{language}\n{text}\n```")
}
