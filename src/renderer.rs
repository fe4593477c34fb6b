// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Markdown rendering for parsed collections.
//!
//! The collection tree is walked depth first. Folders become headings one
//! level deeper than their parent; every request becomes a section with its
//! path, headers, parameters and, when examples were saved, a request example,
//! response parameters and the raw example responses.
//!
//! # Output Format
//!
//! ````text
//! # Collection
//! ## Folder
//! ### Request
//! **Request path:**
//! ```http
//! GET /users/{id}
//! ```
//! **Request headers:**
//! | field | required | value | description |
//! ...
//! ````
//!
//! Tables that would have no data rows are replaced with `none`.

use crate::markdown::{bold, code_block, heading};
use crate::model::{self, Body, Collection, Item, ItemKind, Kvtd, Request, Response};
use crate::table::FormTable;
use regex::Regex;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt::Write;
use std::sync::LazyLock;

/// Placeholder for an empty section.
const NONE: &str = "none";

/// Every documented parameter is listed as required.
const REQUIRED: &str = "yes";

const COMPLEX_TYPE: &str = "complex type";
const ARRAY_SUFFIX: &str = " array";
const INLINED_DATA: &str = "data (inlined at top level)";

/// Example names containing one of these mark the canonical success case.
const SUCCESS_MARKERS: &[&str] = &["success", "成功", "正常"];

const HTTP_OK: u16 = 200;

/// Postman variables such as `{{userId}}`.
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{.*?\}\}").unwrap());

/// Renders a whole collection as a Markdown document.
///
/// The collection name becomes the level-1 heading and top-level items start
/// at level 2.
///
/// ```
/// use pm2md::model::{Collection, Info, Item, Request};
/// use pm2md::renderer::render_collection;
///
/// let collection = Collection {
///     info: Info { name: "Pets".into(), ..Info::default() },
///     items: vec![Item::leaf("List pets", Request::default(), vec![])],
/// };
///
/// let markdown = render_collection(&collection);
/// assert!(markdown.starts_with("# Pets\n## List pets\n"));
/// ```
#[must_use]
pub fn render_collection(collection: &Collection) -> String {
    let mut out = String::new();
    writeln!(out, "{}", heading(1, &collection.info.name)).unwrap();
    writeln!(out, "{}", render_items(&collection.items, 2)).unwrap();
    out
}

fn render_items(items: &[Item], depth: usize) -> String {
    let mut out = String::new();
    for item in items {
        write!(out, "{}\n\n", render_item(item, depth)).unwrap();
    }
    out
}

/// Renders one item, and for folders everything below it.
///
/// `depth` is the heading level of the item itself; past level 6 names are
/// shown in bold instead.
#[must_use]
pub fn render_item(item: &Item, depth: usize) -> String {
    let mut out = String::new();
    writeln!(out, "{}", heading(depth, &item.name)).unwrap();

    match &item.kind {
        ItemKind::Folder(children) => {
            write!(out, "{}\n\n", render_items(children, depth + 1)).unwrap();
        }
        ItemKind::Leaf { request, responses } => render_leaf(&mut out, request, responses),
    }

    out
}

fn render_leaf(out: &mut String, request: &Request, responses: &[Response]) {
    section(out, "Request path:", &request_path(request));
    section(out, "Request headers:", &or_none(&header_table(request)));
    section(out, "Request parameters:", &request_parameters(request));

    if let Some(selected) = select_response(responses) {
        if let Some(example) = request_example(selected) {
            section(out, "Request example:", &example);
        }
        section(
            out,
            "Response parameters:",
            &or_none(&response_parameter_table(selected)),
        );
        section(out, "Response examples:", &response_examples(responses));
    }

    out.push('\n');
}

fn section(out: &mut String, label: &str, body: &str) {
    writeln!(out, "{}", bold(label)).unwrap();
    writeln!(out, "{body}").unwrap();
}

fn or_none(table: &FormTable) -> String {
    if table.is_empty() {
        NONE.to_owned()
    } else {
        table.to_string()
    }
}

fn labelled(label: &str, table: &FormTable) -> String {
    format!("{}\n{table}", bold(label))
}

/// The standard four-column parameter table, header only.
fn parameter_table() -> FormTable {
    FormTable::with_header(["field", "required", "type", "description"])
}

fn push_kvtd(table: &mut FormTable, entries: &[Kvtd]) {
    for entry in entries {
        table.push_row([
            entry.key.as_str(),
            REQUIRED,
            entry.kind.as_str(),
            entry.description.as_str(),
        ]);
    }
}

fn push_inferred(table: &mut FormTable, fields: &Map<String, Value>) {
    for (key, value) in fields {
        table.push_row([key.as_str(), REQUIRED, infer_type(value).as_str(), ""]);
    }
}

fn request_path(request: &Request) -> String {
    let path: Vec<&str> = request
        .url
        .path
        .iter()
        .map(String::as_str)
        .filter(|segment| !segment.is_empty())
        .collect();
    code_block(&format!("{} /{}", request.method, path.join("/")), "http")
}

fn header_table(request: &Request) -> FormTable {
    let mut table = parameter_table();
    table.set_text(0, 2, "value");

    if request.auth.is_some() {
        table.push_row(["Authorization", REQUIRED, "Bearer $token", "access token"]);
    }
    for header in &request.headers {
        table.push_row([header.key.as_str(), REQUIRED, "/", ""]);
    }

    table
}

/// Query parameters win over path variables, which win over the body.
fn request_parameters(request: &Request) -> String {
    if !request.url.query.is_empty() {
        let mut table = parameter_table();
        push_kvtd(&mut table, &request.url.query);
        return labelled("query parameters", &table);
    }

    let variables: Vec<&str> = request
        .url
        .path
        .iter()
        .filter_map(|segment| path_variable(segment))
        .collect();
    if !variables.is_empty() {
        let mut table = parameter_table();
        for name in variables {
            table.push_row([name, REQUIRED]);
        }
        return labelled("path parameters", &table);
    }

    request.body.as_ref().map_or_else(|| NONE.to_owned(), body_parameters)
}

/// Returns the variable name of a `{name}` path segment.
fn path_variable(segment: &str) -> Option<&str> {
    if segment.len() <= 2 {
        return None;
    }
    segment.strip_prefix('{')?.strip_suffix('}')
}

fn body_parameters(body: &Body) -> String {
    let mut table = parameter_table();
    let label: Cow<'_, str> = match body {
        Body::Raw(text) => {
            push_inferred(&mut table, &decode_object(text));
            "json parameters".into()
        }
        Body::UrlEncoded(fields) => {
            push_kvtd(&mut table, fields);
            "x-www-form-urlencoded".into()
        }
        Body::FormData(fields) => {
            push_kvtd(&mut table, fields);
            "form parameters".into()
        }
        Body::Other { mode, payload } => {
            match payload {
                Some(Value::String(text)) => push_inferred(&mut table, &decode_object(text)),
                Some(entries @ Value::Array(_)) => {
                    push_kvtd(&mut table, &model::kvtd_list(entries));
                }
                _ => {}
            }
            format!("{mode} parameters").into()
        }
    };

    if table.is_empty() {
        NONE.to_owned()
    } else {
        labelled(&label, &table)
    }
}

/// Replaces every `{{...}}` variable with `0` so the text can be decoded.
///
/// ```
/// use pm2md::renderer::replace_placeholders;
///
/// assert_eq!(replace_placeholders(r#"{"id":"{{userId}}","n":{{n}}}"#), r#"{"id":"0","n":0}"#);
/// ```
#[must_use]
pub fn replace_placeholders(text: &str) -> Cow<'_, str> {
    PLACEHOLDER_RE.replace_all(text, "0")
}

/// Decodes text as a JSON object, yielding an empty map on failure.
fn decode_object(text: &str) -> Map<String, Value> {
    serde_json::from_str(&replace_placeholders(text)).unwrap_or_else(|err| {
        log::debug!("body is not a JSON object: {err}");
        Map::new()
    })
}

/// Names the type of a JSON value for the parameter tables.
///
/// Arrays are named after their first element with an ` array` suffix per
/// nesting level; objects are a `complex type`.
///
/// ```
/// use pm2md::renderer::infer_type;
/// use serde_json::json;
///
/// assert_eq!(infer_type(&json!("x")), "string");
/// assert_eq!(infer_type(&json!([[1, 2], [3, 4]])), "integer array array");
/// assert_eq!(infer_type(&json!({ "a": 1 })), "complex type");
/// ```
#[must_use]
pub fn infer_type(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(_) => "boolean".to_owned(),
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer".to_owned(),
        Value::Number(_) => "number".to_owned(),
        Value::String(_) => "string".to_owned(),
        Value::Object(_) => COMPLEX_TYPE.to_owned(),
        Value::Array(items) => {
            let element = items
                .first()
                .map_or_else(|| COMPLEX_TYPE.to_owned(), infer_type);
            element + ARRAY_SUFFIX
        }
    }
}

/// Picks the example that documents a request's response.
///
/// A single example is always used. Otherwise the first `200` example whose
/// name marks it as the success case wins, then the first `200` example, then
/// the first example of all. Returns `None` when there are no examples.
#[must_use]
pub fn select_response(responses: &[Response]) -> Option<&Response> {
    if let [only] = responses {
        return Some(only);
    }

    responses
        .iter()
        .find(|r| r.code == HTTP_OK && is_success_name(&r.name))
        .or_else(|| responses.iter().find(|r| r.code == HTTP_OK))
        .or_else(|| responses.first())
}

fn is_success_name(name: &str) -> bool {
    let name = name.to_lowercase();
    SUCCESS_MARKERS.iter().any(|marker| name.contains(marker))
}

/// The raw body sent with the example's original request, if it had one.
fn request_example(response: &Response) -> Option<String> {
    match response.original_request.as_ref()?.body.as_ref()? {
        Body::Raw(text) => Some(code_block(text, "json")),
        _ => None,
    }
}

/// Fields of the `data` member of the example body.
fn response_parameter_table(response: &Response) -> FormTable {
    let mut table = parameter_table();
    match decode_object(&response.body).get("data") {
        Some(Value::Object(fields)) => push_inferred(&mut table, fields),
        Some(other) => table.push_row([INLINED_DATA, REQUIRED, infer_type(other).as_str(), ""]),
        None => {}
    }
    table
}

fn response_examples(responses: &[Response]) -> String {
    let mut out = String::new();
    for response in responses {
        writeln!(out, "{}", response.name).unwrap();
        writeln!(
            out,
            "{}",
            code_block(&response.body, &response.preview_language)
        )
        .unwrap();
    }
    out
}
