// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Typed model of a Postman v2.1 collection.
//!
//! Only the parts of the schema that end up in documentation are kept.
//! Postman is loose about shapes (a URL may be a string or an object, a
//! description may be a string or an object, most fields may be `null`), so
//! decoding is lenient: anything missing or `null` becomes its default.
//!
//! Two places where the JSON uses an implicit discriminator are turned into
//! enums while decoding:
//!
//! - an item is a folder when it carries an `item` list, otherwise a request
//!   ([`ItemKind`]);
//! - a request body is selected by its `mode` key ([`Body`]).
//!
//! # Example
//!
//! ```
//! use pm2md::model::{Collection, ItemKind};
//!
//! let json = r#"{
//!     "info": { "name": "Pets", "schema": "" },
//!     "item": [{
//!         "name": "List pets",
//!         "request": { "method": "GET", "url": "https://api.example.com/pets" }
//!     }]
//! }"#;
//!
//! let collection: Collection = serde_json::from_str(json).unwrap();
//! match &collection.items[0].kind {
//!     ItemKind::Leaf { request, .. } => assert_eq!(request.url.path, ["pets"]),
//!     ItemKind::Folder(_) => unreachable!(),
//! }
//! ```

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// The root of a collection export.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Collection {
    /// Collection metadata.
    #[serde(default, deserialize_with = "or_default")]
    pub info: Info,

    /// Top-level folders and requests, in display order.
    #[serde(rename = "item", default, deserialize_with = "or_default")]
    pub items: Vec<Item>,
}

/// Collection metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Info {
    /// Opaque identifier assigned by Postman.
    #[serde(rename = "_postman_id", deserialize_with = "text")]
    pub id: String,

    /// Display name, used for the document heading and output file name.
    #[serde(deserialize_with = "text")]
    pub name: String,

    /// Schema URL the export claims to follow.
    #[serde(deserialize_with = "text")]
    pub schema: String,
}

/// A node of the collection tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawItem")]
pub struct Item {
    /// Display name.
    pub name: String,

    /// Whether this is a folder or a request.
    pub kind: ItemKind,
}

/// The two shapes an [`Item`] can take.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    /// A folder holding further items, in display order.
    Folder(Vec<Item>),

    /// A single request with its saved example responses.
    Leaf {
        /// The request as configured in the collection.
        request: Request,
        /// Saved example responses, in declaration order.
        responses: Vec<Response>,
    },
}

impl Item {
    /// Creates a folder item.
    #[must_use]
    pub fn folder(name: impl Into<String>, children: Vec<Self>) -> Self {
        Self {
            name: name.into(),
            kind: ItemKind::Folder(children),
        }
    }

    /// Creates a request item.
    #[must_use]
    pub fn leaf(name: impl Into<String>, request: Request, responses: Vec<Response>) -> Self {
        Self {
            name: name.into(),
            kind: ItemKind::Leaf { request, responses },
        }
    }

    /// Returns `true` if this item is a folder.
    #[must_use]
    pub const fn is_folder(&self) -> bool {
        matches!(self.kind, ItemKind::Folder(_))
    }
}

#[derive(Deserialize)]
struct RawItem {
    #[serde(default, deserialize_with = "text")]
    name: String,
    #[serde(default)]
    item: Option<Vec<Item>>,
    #[serde(default)]
    request: Option<Request>,
    #[serde(default, deserialize_with = "or_default")]
    response: Vec<Response>,
}

impl From<RawItem> for Item {
    fn from(raw: RawItem) -> Self {
        // The presence of `item` decides, even when the list is empty.
        let kind = match raw.item {
            Some(children) => ItemKind::Folder(children),
            None => ItemKind::Leaf {
                request: raw.request.unwrap_or_default(),
                responses: raw.response,
            },
        };
        Self {
            name: raw.name,
            kind,
        }
    }
}

/// An HTTP request definition.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawRequest")]
pub struct Request {
    /// HTTP method, e.g. `GET`.
    pub method: String,

    /// Declared headers, in order.
    pub headers: Vec<Kvtd>,

    /// Target URL.
    pub url: Url,

    /// Request payload, if any.
    pub body: Option<Body>,

    /// Authentication settings, if any.
    pub auth: Option<Auth>,
}

/// Postman writes a request either as a full object or as a bare URL string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRequest {
    Url(String),
    Fields(RequestFields),
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RequestFields {
    #[serde(deserialize_with = "text")]
    method: String,
    #[serde(alias = "headers", deserialize_with = "header_list")]
    header: Vec<Kvtd>,
    #[serde(deserialize_with = "or_default")]
    url: Url,
    #[serde(deserialize_with = "body")]
    body: Option<Body>,
    auth: Option<Auth>,
}

impl From<RawRequest> for Request {
    fn from(raw: RawRequest) -> Self {
        match raw {
            RawRequest::Url(raw) => Self {
                method: "GET".into(),
                url: Url::from_raw(&raw),
                ..Self::default()
            },
            RawRequest::Fields(fields) => Self {
                method: fields.method,
                headers: fields.header,
                url: fields.url,
                body: fields.body,
                auth: fields.auth,
            },
        }
    }
}

/// A request URL broken into parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawUrl")]
pub struct Url {
    /// The URL as typed by the user, variables unexpanded.
    pub raw: String,

    /// Scheme without `://`.
    pub protocol: String,

    /// Host name segments.
    pub host: Vec<String>,

    /// Path segments.
    pub path: Vec<String>,

    /// Query parameters, in order.
    pub query: Vec<Kvtd>,
}

impl Url {
    /// Splits a raw URL string into its parts.
    ///
    /// Postman variables such as `{{baseUrl}}` are kept as literal segments.
    ///
    /// ```
    /// use pm2md::model::Url;
    ///
    /// let url = Url::from_raw("https://api.example.com/users/{id}?verbose=1");
    /// assert_eq!(url.protocol, "https");
    /// assert_eq!(url.host, ["api", "example", "com"]);
    /// assert_eq!(url.path, ["users", "{id}"]);
    /// assert_eq!(url.query[0].key, "verbose");
    /// ```
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        let (protocol, rest) = raw.split_once("://").unwrap_or(("", raw));
        let rest = rest.split_once('#').map_or(rest, |(before, _)| before);
        let (location, query) = rest.split_once('?').unwrap_or((rest, ""));
        let (host, path) = location.split_once('/').unwrap_or((location, ""));

        Self {
            raw: raw.to_owned(),
            protocol: protocol.to_owned(),
            host: split_segments(host, '.'),
            path: split_segments(path, '/'),
            query: query
                .split('&')
                .filter(|pair| !pair.is_empty())
                .map(|pair| {
                    let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                    Kvtd {
                        key: key.to_owned(),
                        value: value.to_owned(),
                        ..Kvtd::default()
                    }
                })
                .collect(),
        }
    }
}

fn split_segments(s: &str, separator: char) -> Vec<String> {
    s.split(separator)
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUrl {
    Raw(String),
    Fields(UrlFields),
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct UrlFields {
    #[serde(deserialize_with = "text")]
    raw: String,
    #[serde(deserialize_with = "text")]
    protocol: String,
    #[serde(deserialize_with = "host_segments")]
    host: Vec<String>,
    #[serde(deserialize_with = "path_segments")]
    path: Vec<String>,
    #[serde(deserialize_with = "or_default")]
    query: Vec<Kvtd>,
}

impl From<RawUrl> for Url {
    fn from(raw: RawUrl) -> Self {
        match raw {
            RawUrl::Raw(raw) => Self::from_raw(&raw),
            RawUrl::Fields(fields) => Self {
                raw: fields.raw,
                protocol: fields.protocol,
                host: fields.host,
                path: fields.path,
                query: fields.query,
            },
        }
    }
}

/// A request payload, selected by the body `mode`.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// `raw`: free text, usually JSON.
    Raw(String),

    /// `urlencoded`: form fields sent as `application/x-www-form-urlencoded`.
    UrlEncoded(Vec<Kvtd>),

    /// `formdata`: multipart form fields.
    FormData(Vec<Kvtd>),

    /// Any other mode (`file`, `graphql`, ...), kept as-is.
    Other {
        /// The mode name.
        mode: String,
        /// The value stored under the mode name, if present.
        payload: Option<Value>,
    },
}

impl Body {
    /// Builds a body from its JSON object.
    ///
    /// Returns `None` when the object has no `mode`.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let mode = value.get("mode")?.as_str()?;
        let payload = value.get(mode);

        Some(match mode {
            "raw" => Self::Raw(payload.map(value_text).unwrap_or_default()),
            "urlencoded" => Self::UrlEncoded(payload.map(kvtd_list).unwrap_or_default()),
            "formdata" => Self::FormData(payload.map(kvtd_list).unwrap_or_default()),
            _ => Self::Other {
                mode: mode.to_owned(),
                payload: payload.cloned(),
            },
        })
    }

    /// Returns the Postman mode name.
    #[must_use]
    pub fn mode(&self) -> &str {
        match self {
            Self::Raw(_) => "raw",
            Self::UrlEncoded(_) => "urlencoded",
            Self::FormData(_) => "formdata",
            Self::Other { mode, .. } => mode,
        }
    }
}

/// Decodes every object in a JSON array as a [`Kvtd`], skipping the rest.
pub(crate) fn kvtd_list(value: &Value) -> Vec<Kvtd> {
    value
        .as_array()
        .into_iter()
        .flatten()
        .filter(|entry| entry.is_object())
        .filter_map(|entry| Kvtd::deserialize(entry).ok())
        .collect()
}

/// Authentication settings. Only the scheme name is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Auth {
    /// Scheme name, e.g. `bearer`.
    #[serde(rename = "type", deserialize_with = "text")]
    pub kind: String,
}

/// A key/value/type/description entry.
///
/// Used for headers, query parameters and form fields alike.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Kvtd {
    /// Field name.
    #[serde(deserialize_with = "text")]
    pub key: String,

    /// Example value.
    #[serde(deserialize_with = "text")]
    pub value: String,

    /// Declared type (`text`, `file`, ...).
    #[serde(rename = "type", deserialize_with = "text")]
    pub kind: String,

    /// Free-form description.
    #[serde(deserialize_with = "text")]
    pub description: String,
}

impl Kvtd {
    /// Creates an entry from its four parts.
    #[must_use]
    pub fn new(key: &str, value: &str, kind: &str, description: &str) -> Self {
        Self {
            key: key.to_owned(),
            value: value.to_owned(),
            kind: kind.to_owned(),
            description: description.to_owned(),
        }
    }
}

/// A saved example response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Response {
    /// Example name.
    #[serde(deserialize_with = "text")]
    pub name: String,

    /// The request that produced this response.
    #[serde(rename = "originalRequest")]
    pub original_request: Option<Request>,

    /// HTTP reason phrase, e.g. `OK`.
    #[serde(deserialize_with = "text")]
    pub status: String,

    /// HTTP status code, `0` when not recorded.
    #[serde(deserialize_with = "or_default")]
    pub code: u16,

    /// Language hint for fencing the body (`json`, `html`, ...).
    #[serde(rename = "_postman_previewlanguage", deserialize_with = "text")]
    pub preview_language: String,

    /// The captured body, verbatim.
    #[serde(deserialize_with = "text")]
    pub body: String,
}

/// Deserializes `T`, treating `null` as the default.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserializes any JSON value as display text.
fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_text(&Value::deserialize(deserializer)?))
}

/// Converts a loosely typed JSON value to text.
///
/// Descriptions may be `{ "content": ... }` objects and path segments may be
/// `{ "value": ... }` objects; both collapse to their inner text.
fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("content")
            .or_else(|| map.get("value"))
            .map(value_text)
            .unwrap_or_default(),
        other => other.to_string(),
    }
}

fn segments<'de, D>(deserializer: D, separator: char) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::String(s) => split_segments(&s, separator),
        Value::Array(items) => items.iter().map(value_text).collect(),
        other => vec![value_text(&other)],
    })
}

fn host_segments<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    segments(deserializer, '.')
}

fn path_segments<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    segments(deserializer, '/')
}

/// Headers are a list of entries or a block of `Key: value` lines.
fn header_list<'de, D>(deserializer: D) -> Result<Vec<Kvtd>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(block) => block
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                let (key, value) = line.split_once(':').unwrap_or((line, ""));
                Kvtd {
                    key: key.trim_end().to_owned(),
                    value: value.trim_start().to_owned(),
                    ..Kvtd::default()
                }
            })
            .collect(),
        other => kvtd_list(&other),
    })
}

fn body<'de, D>(deserializer: D) -> Result<Option<Body>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(Body::from_value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: Value) -> Item {
        serde_json::from_value(value).unwrap()
    }

    fn request(value: Value) -> Request {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn collection_without_info_decodes() {
        let collection: Collection =
            serde_json::from_value(json!({ "item": [{ "name": "Ping" }] })).unwrap();

        assert_eq!(collection.info, Info::default());
        assert_eq!(collection.items.len(), 1);
    }

    #[test]
    fn item_with_children_is_folder() {
        let folder = item(json!({
            "name": "Users",
            "item": [{ "name": "Get user", "request": { "method": "GET" } }],
            "request": { "method": "POST" }
        }));

        assert!(folder.is_folder());
        match folder.kind {
            ItemKind::Folder(children) => {
                assert_eq!(children.len(), 1);
                assert_eq!(children[0].name, "Get user");
                assert!(!children[0].is_folder());
            }
            ItemKind::Leaf { .. } => panic!("expected folder"),
        }
    }

    #[test]
    fn empty_item_list_is_still_folder() {
        assert!(item(json!({ "name": "Empty", "item": [] })).is_folder());
    }

    #[test]
    fn item_without_children_is_leaf() {
        let leaf = item(json!({
            "name": "Ping",
            "request": { "method": "HEAD" },
            "response": null
        }));

        match leaf.kind {
            ItemKind::Leaf { request, responses } => {
                assert_eq!(request.method, "HEAD");
                assert!(responses.is_empty());
            }
            ItemKind::Folder(_) => panic!("expected leaf"),
        }
    }

    #[test]
    fn request_reads_header_key_and_alias() {
        let a = request(json!({ "header": [{ "key": "Accept" }] }));
        let b = request(json!({ "headers": [{ "key": "Accept" }] }));

        assert_eq!(a.headers, b.headers);
        assert_eq!(a.headers[0].key, "Accept");
    }

    #[test]
    fn request_header_as_string_block() {
        let req = request(json!({
            "method": "GET",
            "header": "X-Trace: abc\nAccept:application/json\n\nDNT",
            "url": "http://h/a"
        }));

        assert_eq!(
            req.headers,
            [
                Kvtd::new("X-Trace", "abc", "", ""),
                Kvtd::new("Accept", "application/json", "", ""),
                Kvtd::new("DNT", "", "", ""),
            ]
        );
        assert_eq!(req.url.path, ["a"]);
    }

    #[test]
    fn request_header_null_is_empty() {
        assert!(request(json!({ "header": null })).headers.is_empty());
    }

    #[test]
    fn request_from_bare_string() {
        let req = request(json!("https://example.com/a/b"));

        assert_eq!(req.method, "GET");
        assert_eq!(req.url.path, ["a", "b"]);
        assert!(req.body.is_none());
    }

    #[test]
    fn url_object_accepts_string_segments() {
        let req = request(json!({
            "url": { "raw": "x", "host": "api.example.com", "path": "v1/users" }
        }));

        assert_eq!(req.url.host, ["api", "example", "com"]);
        assert_eq!(req.url.path, ["v1", "users"]);
    }

    #[test]
    fn url_path_segment_objects_use_value() {
        let req = request(json!({
            "url": { "path": [{ "type": "string", "value": "users" }, "list"] }
        }));

        assert_eq!(req.url.path, ["users", "list"]);
    }

    #[test]
    fn url_from_raw_without_scheme_or_path() {
        let url = Url::from_raw("{{baseUrl}}");

        assert_eq!(url.protocol, "");
        assert_eq!(url.host, ["{{baseUrl}}"]);
        assert!(url.path.is_empty());
        assert!(url.query.is_empty());
    }

    #[test]
    fn url_from_raw_drops_fragment() {
        let url = Url::from_raw("http://h/p?a=1&b#frag");

        assert_eq!(url.path, ["p"]);
        assert_eq!(url.query.len(), 2);
        assert_eq!(url.query[0].value, "1");
        assert_eq!(url.query[1].key, "b");
    }

    #[test]
    fn raw_body() {
        let req = request(json!({ "body": { "mode": "raw", "raw": "{\"a\":1}" } }));
        assert_eq!(req.body, Some(Body::Raw("{\"a\":1}".into())));
    }

    #[test]
    fn form_bodies() {
        let urlencoded = request(json!({
            "body": { "mode": "urlencoded", "urlencoded": [{ "key": "a", "value": "1" }] }
        }));
        let formdata = request(json!({
            "body": {
                "mode": "formdata",
                "formdata": [{ "key": "a", "value": "1", "type": "text", "description": "x" }]
            }
        }));

        assert_eq!(
            urlencoded.body,
            Some(Body::UrlEncoded(vec![Kvtd::new("a", "1", "", "")]))
        );
        assert_eq!(
            formdata.body,
            Some(Body::FormData(vec![Kvtd::new("a", "1", "text", "x")]))
        );
    }

    #[test]
    fn unknown_body_mode_keeps_payload() {
        let req = request(json!({
            "body": { "mode": "graphql", "graphql": { "query": "{ me }" } }
        }));

        let body = req.body.unwrap();
        assert_eq!(body.mode(), "graphql");
        assert_eq!(
            body,
            Body::Other {
                mode: "graphql".into(),
                payload: Some(json!({ "query": "{ me }" })),
            }
        );
    }

    #[test]
    fn body_without_mode_is_absent() {
        assert!(request(json!({ "body": {} })).body.is_none());
        assert!(request(json!({ "body": null })).body.is_none());
    }

    #[test]
    fn auth_presence_is_kept() {
        let req = request(json!({ "auth": { "type": "bearer", "bearer": [] } }));
        assert_eq!(req.auth.map(|a| a.kind), Some("bearer".into()));
    }

    #[test]
    fn kvtd_description_object_and_nulls() {
        let kvtd: Kvtd = serde_json::from_value(json!({
            "key": "limit",
            "value": null,
            "description": { "content": "Page size", "type": "text/plain" }
        }))
        .unwrap();

        assert_eq!(kvtd, Kvtd::new("limit", "", "", "Page size"));
    }

    #[test]
    fn response_fields() {
        let resp: Response = serde_json::from_value(json!({
            "name": "OK",
            "originalRequest": { "method": "POST" },
            "status": "OK",
            "code": 200,
            "_postman_previewlanguage": "json",
            "header": null,
            "body": "{}"
        }))
        .unwrap();

        assert_eq!(resp.code, 200);
        assert_eq!(resp.preview_language, "json");
        assert_eq!(resp.original_request.unwrap().method, "POST");
    }

    #[test]
    fn response_nulls_become_defaults() {
        let resp: Response =
            serde_json::from_value(json!({ "name": "x", "code": null, "body": null })).unwrap();

        assert_eq!(resp.code, 0);
        assert_eq!(resp.body, "");
        assert!(resp.original_request.is_none());
    }
}
