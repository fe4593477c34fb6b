// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Integration tests for pm2md parsing, rendering and conversion.

use pm2md::convert::{self, ConvertError};
use pm2md::parser::{self, POSTMAN_V21_SCHEMA, ParseError, Parser};
use pm2md::renderer;
use std::fs;
use std::path::{Path, PathBuf};

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/petstore.postman_collection.json")
}

fn fixture_markdown() -> String {
    let json = fs::read_to_string(fixture_path()).unwrap();
    let collection = parser::parse_collection(&json).unwrap();
    renderer::render_collection(&collection)
}

/// Returns the text of the item section that starts with `heading`.
fn section<'a>(markdown: &'a str, heading: &str) -> &'a str {
    let start = markdown
        .find(heading)
        .unwrap_or_else(|| panic!("missing {heading}"));
    let rest = &markdown[start + heading.len()..];
    if rest.starts_with('#') {
        return "";
    }
    let end = rest.find("\n#").unwrap_or(rest.len());
    &rest[..end]
}

#[test]
fn renders_folder_tree() {
    let markdown = fixture_markdown();

    assert!(markdown.starts_with("# Petstore\n"));
    assert!(markdown.contains("\n## Pets\n"));
    assert!(markdown.contains("\n### List pets\n"));
    assert!(markdown.contains("\n### Get pet\n"));
    assert!(markdown.contains("\n### Create pet\n"));
    assert!(markdown.contains("\n## Upload avatar\n"));

    // A folder heading is followed directly by its first child.
    assert!(section(&markdown, "## Pets\n").is_empty());
}

#[test]
fn query_parameters_and_success_example() {
    let markdown = fixture_markdown();
    let list = section(&markdown, "### List pets\n");

    assert!(list.contains("```http\nGET /pets\n```"));
    assert!(list.contains("**Request headers:**\nnone\n"));
    assert!(list.contains("**query parameters**"));
    assert!(list.contains("| limit | yes |  | Maximum number of pets to return |"));
    // The named success example is documented, not the 401.
    assert!(list.contains("| data (inlined at top level) | yes | complex type array |  |"));
    assert!(list.contains("Unauthorized\n```json\n{\"message\":\"missing token\"}\n```"));
    assert!(!list.contains("Request example:"));
}

#[test]
fn auth_header_and_path_parameters() {
    let markdown = fixture_markdown();
    let get = section(&markdown, "### Get pet\n");

    assert!(get.contains("| Authorization | yes | Bearer $token | access token |"));
    assert!(get.contains("| Accept | yes | / |  |"));
    assert!(get.contains("**path parameters**"));
    assert!(get.contains("| petId | yes |  |  |"));
    assert!(get.contains("| id | yes | string |  |"));
    assert!(get.contains("| tags | yes | string array |  |"));
    assert!(get.contains("| owner | yes | complex type |  |"));
}

#[test]
fn raw_body_parameters_and_request_example() {
    let markdown = fixture_markdown();
    let create = section(&markdown, "### Create pet\n");

    assert!(create.contains("POST /pets"));
    assert!(create.contains("**json parameters**"));
    assert!(create.contains("| name | yes | string |  |"));
    assert!(create.contains("| age | yes | integer |  |"));
    assert!(create.contains("| vaccinated | yes | boolean |  |"));
    assert!(create.contains(
        "**Request example:**\n```json\n{\n  \"name\": \"Rex\",\n  \"age\": 3,\n  \"vaccinated\": true\n}\n```"
    ));
    assert!(create.contains("| data (inlined at top level) | yes | integer |  |"));
}

#[test]
fn form_data_without_examples() {
    let markdown = fixture_markdown();
    let upload = section(&markdown, "## Upload avatar\n");

    assert!(upload.contains("**form parameters**"));
    assert!(upload.contains("| file | yes | file | PNG image |"));
    assert!(upload.contains("| caption | yes | text | Shown under the image |"));
    assert!(!upload.contains("Response"));
}

#[test]
fn heading_count_matches_leaf_count() {
    let json = format!(
        r#"{{
            "info": {{ "name": "Flat", "schema": "{POSTMAN_V21_SCHEMA}" }},
            "item": [
                {{ "name": "A", "request": {{ "method": "GET", "url": "http://h/a" }} }},
                {{ "name": "B", "request": {{ "method": "GET", "url": "http://h/b" }} }},
                {{ "name": "C", "request": {{ "method": "GET", "url": "http://h/c" }} }}
            ]
        }}"#
    );

    let doc = Parser::default().parse(&json).unwrap();
    let markdown = doc.render();
    let headings = markdown.lines().filter(|l| l.starts_with('#')).count();

    assert_eq!(headings, 1 + 3);
}

#[test]
fn placeholder_in_response_body_decodes() {
    let json = format!(
        r#"{{
            "info": {{ "name": "Users", "schema": "{POSTMAN_V21_SCHEMA}" }},
            "item": [{{
                "name": "Get user",
                "request": {{ "method": "GET", "url": "http://h/user" }},
                "response": [{{
                    "name": "ok",
                    "code": 200,
                    "_postman_previewlanguage": "json",
                    "body": "{{\"data\":{{\"id\":\"{{{{userId}}}}\"}}}}"
                }}]
            }}]
        }}"#
    );

    let markdown = Parser::default().parse(&json).unwrap().render();
    let params = markdown
        .split("**Response parameters:**")
        .nth(1)
        .unwrap()
        .split("**Response examples:**")
        .next()
        .unwrap();

    assert!(params.contains("| id | yes | string |  |"));
    assert_eq!(params.matches("| yes |").count(), 1);
}

#[test]
fn rejects_other_schemas() {
    let json = r#"{ "info": { "name": "Old", "schema": "https://schema.getpostman.com/json/collection/v2.0.0/collection.json" } }"#;
    assert!(matches!(
        Parser::default().parse(json),
        Err(ParseError::UnsupportedSchema)
    ));
}

#[test]
fn converts_fixture_file_to_named_markdown() {
    let out = tempfile::tempdir().unwrap();

    let written = convert::convert_file(fixture_path(), &Parser::default(), out.path()).unwrap();

    assert_eq!(written, [out.path().join("Petstore.md")]);
    assert_eq!(fs::read_to_string(&written[0]).unwrap(), fixture_markdown());
}

#[test]
fn directory_with_foreign_file_aborts() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    fs::copy(fixture_path(), input.path().join("petstore.json")).unwrap();
    fs::write(input.path().join("README.md"), "# notes").unwrap();

    let result = convert::convert_dir(input.path(), false, &Parser::default(), out.path());

    assert!(matches!(result, Err(ConvertError::Parse { .. })));
}

#[test]
fn recursive_flag_rereads_top_level_exports() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    fs::copy(fixture_path(), input.path().join("petstore.json")).unwrap();
    let nested = input.path().join("v1");
    fs::create_dir(&nested).unwrap();
    // Never read: subdirectories are not descended into.
    fs::write(nested.join("notes.txt"), "not an export").unwrap();

    let flat = convert::convert_dir(input.path(), false, &Parser::default(), out.path()).unwrap();
    assert_eq!(flat, [out.path().join("Petstore.md")]);

    let rescanned =
        convert::convert_dir(input.path(), true, &Parser::default(), out.path()).unwrap();
    assert_eq!(
        rescanned,
        [out.path().join("Petstore.md"), out.path().join("Petstore.md")]
    );
    assert_eq!(
        fs::read_to_string(out.path().join("Petstore.md")).unwrap(),
        fixture_markdown()
    );
}
