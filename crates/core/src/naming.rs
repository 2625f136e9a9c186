//! Identifier and file-name case conversion.
//!
//! Every name transform in the crate goes through this module so that file
//! names, class names and generated identifiers always agree.

use std::sync::LazyLock;

use regex::Regex;

/// `httpServer` -> `http-Server`
#[allow(clippy::expect_used)]
static LOWER_UPPER_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").expect("static regex is valid"));

/// `HTTPServer` -> `HTTP-Server`
#[allow(clippy::expect_used)]
static ACRONYM_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("static regex is valid"));

/// Fallback identifier when an operation id normalizes to nothing.
pub const FALLBACK_OPERATION_ID: &str = "operation";

/// Sanitized form of the sentinel tag given to untagged operations.
pub const DEFAULT_TAG: &str = "Default";

/// Suffix appended to the Pascal-cased tag to form the service class name.
pub const API_CLASS_SUFFIX: &str = "Api";

/// Convert a name to its kebab-case file slug.
///
/// Boundaries are inserted between a lowercase letter and an uppercase
/// letter, and before the last capital of an uppercase run that is
/// followed by a lowercase letter. The result is lowercased, so applying
/// the function twice yields the same slug.
pub fn to_file_slug(name: &str) -> String {
    let split = LOWER_UPPER_BOUNDARY.replace_all(name, "${1}-${2}");
    let split = ACRONYM_BOUNDARY.replace_all(&split, "${1}-${2}");
    split.to_lowercase()
}

/// Convert `snake_case` / `kebab-case` names to camelCase.
///
/// Separators (`-`, `_`) are dropped and the following character is
/// uppercased; the first character is always lowercased. Empty input is
/// returned unchanged.
pub fn to_identifier_camel(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }

    let mut result = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == '-' || c == '_' {
            upper_next = true;
            continue;
        }
        if upper_next {
            result.extend(c.to_uppercase());
            upper_next = false;
        } else {
            result.push(c);
        }
    }

    lowercase_first(&result)
}

/// Convert a name to PascalCase: camelCase with the first character uppercased.
pub fn to_identifier_pascal(name: &str) -> String {
    capitalize_first(&to_identifier_camel(name))
}

/// Capitalize the first letter of a string.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

/// Replace every character that cannot appear in an identifier with `_`.
fn sanitize_word_chars(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Sanitize a tag into the Pascal-cased key used for artifact grouping.
///
/// `pet store` -> `PetStore`, `orders` -> `Orders`. Tags that start with a
/// digit are prefixed with `Tag`; tags with no usable characters become
/// [`DEFAULT_TAG`].
pub fn sanitize_tag(tag: &str) -> String {
    let pascal = to_identifier_pascal(&sanitize_word_chars(tag));
    if pascal.is_empty() {
        return DEFAULT_TAG.to_string();
    }
    if pascal.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("Tag{pascal}");
    }
    pascal
}

/// Service class name for a tag (e.g. `Orders` -> `OrdersApi`).
pub fn api_class_name(tag: &str) -> String {
    format!("{}{API_CLASS_SUFFIX}", to_identifier_pascal(tag))
}

/// Normalize a declared operation id into a camelCase method name.
///
/// Leading underscores and a trailing run of digits are removed
/// (`_listItems2` -> `listItems`). Empty results fall back to
/// [`FALLBACK_OPERATION_ID`].
pub fn normalize_operation_id(operation_id: &str) -> String {
    let camel = to_identifier_camel(&sanitize_word_chars(operation_id));
    let normalized = camel
        .trim_start_matches('_')
        .trim_end_matches(|c: char| c.is_ascii_digit());
    if normalized.trim().is_empty() {
        FALLBACK_OPERATION_ID.to_string()
    } else {
        lowercase_first(normalized)
    }
}

/// Derive an operation id for an operation that declares none.
///
/// Uses the lowercase verb plus every non-placeholder path segment:
/// `GET /orders/{id}/lines` -> `getOrdersLines`.
pub fn synthesize_operation_id(verb: &str, path: &str) -> String {
    let segments: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty() && !s.starts_with('{'))
        .collect();
    let raw = format!("{}_{}", verb.to_lowercase(), segments.join("_"));
    normalize_operation_id(&raw)
}
