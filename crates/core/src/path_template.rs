//! URL path template synthesis.
//!
//! Rewrites the placeholders of a raw path into `${variable}` interpolations
//! for generated TypeScript. Two placeholder forms are recognised:
//!
//! - the document form `{name}`, where `name` is any run of characters
//!   other than `{`, `}` and `/`;
//! - the pre-encoded host form
//!   `${this.configuration.encodeParam({name: "x", value: x, ...})}`, where
//!   the variable is whatever follows `value: ` up to the next `,` or `}`.
//!
//! Anything else in the path is copied through unchanged.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

use crate::descriptor::{ParamLocation, ParameterDescriptor};

#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\$\{this\.configuration\.encodeParam\([^)]*?value: ([^,}]+)[^)]*\)\}|\{([^{}/]+)\}",
    )
    .expect("static regex is valid")
});

/// Parameter-substitution convention for a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PathDialect {
    /// Imperative call sites: numeric `x` stays `x`, anything else is `xPath`.
    Plain,
    /// Resource bodies reading signals: numeric `x` is `xValue`, anything else is `xPath`.
    Value,
}

impl PathDialect {
    /// Replacement variable for a parameter identifier in this dialect.
    pub fn variable_for(self, identifier: &str, is_numeric: bool) -> String {
        match (self, is_numeric) {
            (PathDialect::Plain, true) => identifier.to_string(),
            (PathDialect::Value, true) => format!("{identifier}Value"),
            (_, false) => format!("{identifier}Path"),
        }
    }
}

/// Result of rewriting one raw path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathTemplate {
    /// Template literal body, without backticks.
    pub template: String,
    /// Placeholders copied through verbatim because no parameter matched.
    pub unresolved: Vec<String>,
}

/// Undo the HTML escaping some documents carry into paths.
pub fn unescape_html_entities(value: &str) -> String {
    value.replace("&quot;", "\"").replace("&#39;", "'")
}

/// Rewrite every placeholder in `raw` into `${variable}`.
///
/// `resolve` maps a placeholder name to its replacement variable. When it
/// returns `None` the name itself is used and recorded as unresolved.
pub fn rewrite_placeholders<F>(raw: &str, mut resolve: F) -> PathTemplate
where
    F: FnMut(&str) -> Option<String>,
{
    let mut unresolved = Vec::new();
    let template = PLACEHOLDER
        .replace_all(raw, |caps: &Captures<'_>| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map_or("", |m| m.as_str().trim());
            let variable = resolve(name).unwrap_or_else(|| {
                unresolved.push(name.to_string());
                name.to_string()
            });
            format!("${{{variable}}}")
        })
        .into_owned();

    PathTemplate {
        template,
        unresolved,
    }
}

/// Build the template for `raw_path` in one dialect.
///
/// Placeholders match a path parameter by its declared name, or by its
/// generated identifier (the pre-encoded form refers to identifiers).
/// The parameter list is only read.
pub fn build_path_template(
    raw_path: &str,
    params: &[ParameterDescriptor],
    dialect: PathDialect,
) -> PathTemplate {
    let raw = unescape_html_entities(raw_path);
    let path_params = || params.iter().filter(|p| p.location == ParamLocation::Path);
    rewrite_placeholders(&raw, |name| {
        path_params()
            .find(|p| p.raw_name == name)
            .or_else(|| path_params().find(|p| p.identifier == name))
            .map(|p| dialect.variable_for(&p.identifier, p.is_numeric))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn path_param(raw_name: &str, identifier: &str, is_numeric: bool) -> ParameterDescriptor {
        ParameterDescriptor {
            raw_name: raw_name.to_string(),
            location: ParamLocation::Path,
            required: true,
            data_type: if is_numeric { "number" } else { "string" }.to_string(),
            base_type: None,
            is_integer: is_numeric,
            is_number: false,
            identifier: identifier.to_string(),
            is_numeric,
        }
    }

    #[test]
    fn test_numeric_param_dialects() {
        let params = [path_param("courseId", "courseId", true)];
        let plain = build_path_template("/courses/{courseId}", &params, PathDialect::Plain);
        let value = build_path_template("/courses/{courseId}", &params, PathDialect::Value);
        assert_eq!(plain.template, "/courses/${courseId}");
        assert_eq!(value.template, "/courses/${courseIdValue}");
        assert!(plain.unresolved.is_empty());
    }

    #[test]
    fn test_non_numeric_param_uses_path_suffix_in_both_dialects() {
        let params = [path_param("fileName", "fileName", false)];
        for dialect in [PathDialect::Plain, PathDialect::Value] {
            let built = build_path_template("/files/{fileName}", &params, dialect);
            assert_eq!(built.template, "/files/${fileNamePath}");
        }
    }

    #[test]
    fn test_raw_name_maps_to_camel_identifier() {
        let params = [
            path_param("course_id", "courseId", true),
            path_param("lecture-slug", "lectureSlug", false),
        ];
        let built = build_path_template(
            "/courses/{course_id}/lectures/{lecture-slug}",
            &params,
            PathDialect::Value,
        );
        assert_eq!(
            built.template,
            "/courses/${courseIdValue}/lectures/${lectureSlugPath}"
        );
    }

    #[test]
    fn test_unresolved_placeholder_is_copied() {
        let params = [path_param("courseId", "courseId", true)];
        let built = build_path_template(
            "/courses/{courseId}/units/{unitId}",
            &params,
            PathDialect::Plain,
        );
        assert_eq!(built.template, "/courses/${courseId}/units/${unitId}");
        assert_eq!(built.unresolved, vec!["unitId".to_string()]);
    }

    #[test]
    fn test_encoded_host_form() {
        let params = [path_param("course-id", "courseId", true)];
        let raw = "/courses/${this.configuration.encodeParam({name: &quot;courseId&quot;, value: courseId, in: &quot;path&quot;, style: &quot;simple&quot;, explode: false, dataType: &quot;number&quot;, dataFormat: undefined})}/units";
        let plain = build_path_template(raw, &params, PathDialect::Plain);
        let value = build_path_template(raw, &params, PathDialect::Value);
        assert_eq!(plain.template, "/courses/${courseId}/units");
        assert_eq!(value.template, "/courses/${courseIdValue}/units");
    }

    #[test]
    fn test_path_without_placeholders_is_unchanged() {
        let built = build_path_template("/health", &[], PathDialect::Value);
        assert_eq!(built.template, "/health");
        assert!(built.unresolved.is_empty());
    }

    #[test]
    fn test_rewrite_placeholders_custom_resolver() {
        let built = rewrite_placeholders("/a/{x}/b/{y}", |name| {
            (name == "x").then(|| "resolvedX".to_string())
        });
        assert_eq!(built.template, "/a/${resolvedX}/b/${y}");
        assert_eq!(built.unresolved, vec!["y".to_string()]);
    }
}
