//! Generator options.
//!
//! Options come from three layers, lowest precedence first: defaults, an
//! optional TOML file, and `key=value` additional properties.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Option key enabling signal-based resources for GET operations.
pub const USE_REACTIVE_RESOURCE: &str = "useReactiveResource";
/// Option key enabling `inject()` instead of constructor injection.
pub const USE_INJECTED_DEPENDENCY: &str = "useInjectedDependency";
/// Option key enabling separate resource files for GET operations.
pub const SPLIT_RESOURCE_ARTIFACTS: &str = "splitResourceArtifacts";
/// Option key enabling `readonly` on output model properties.
pub const READONLY_OUTPUT_MODELS: &str = "readonlyOutputModels";
/// Option key turning unresolved path placeholders into hard errors.
pub const STRICT_PATH_PARAMETERS: &str = "strictPathParameters";

/// Table name accepted as a wrapper in option files.
const CONFIG_TABLE: &str = "generator";

/// Flags consumed by the annotators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorOptions {
    /// GET operations become `httpResource` factories.
    #[serde(alias = "useHttpResource")]
    pub use_reactive_resource: bool,
    /// Services obtain `HttpClient` through `inject()`.
    #[serde(alias = "useInjectFunction")]
    pub use_injected_dependency: bool,
    /// Resource factories go to their own `-resources.ts` file.
    #[serde(alias = "separateResources")]
    pub split_resource_artifacts: bool,
    /// Output model properties are `readonly`.
    #[serde(alias = "readonlyModels")]
    pub readonly_output_models: bool,
    /// Unresolved path placeholders fail the run instead of degrading.
    pub strict_path_parameters: bool,
    /// Unrecognised `key=value` pairs, passed through to templates.
    #[serde(skip_deserializing)]
    pub additional_properties: BTreeMap<String, String>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            use_reactive_resource: true,
            use_injected_dependency: true,
            split_resource_artifacts: true,
            readonly_output_models: true,
            strict_path_parameters: false,
            additional_properties: BTreeMap::new(),
        }
    }
}

impl GeneratorOptions {
    /// Parse options from TOML, either top-level keys or a `[generator]` table.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let value: toml::Value = contents
            .parse()
            .map_err(|e| Error::Config(format!("Failed to parse options: {e}")))?;

        let table = match value.get(CONFIG_TABLE) {
            Some(inner) => inner.clone(),
            None => value,
        };

        table
            .try_into()
            .map_err(|e| Error::Config(format!("Invalid options: {e}")))
    }

    /// Read options from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading generator options.");
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&contents)
    }

    /// Apply a `key=value` override. Known keys use the host's boolean rule:
    /// true only when the value equals `true` ignoring case.
    pub fn apply_property(&mut self, key: &str, value: &str) {
        let flag = parse_flag(value);
        match key {
            USE_REACTIVE_RESOURCE | "useHttpResource" => self.use_reactive_resource = flag,
            USE_INJECTED_DEPENDENCY | "useInjectFunction" => self.use_injected_dependency = flag,
            SPLIT_RESOURCE_ARTIFACTS | "separateResources" => self.split_resource_artifacts = flag,
            READONLY_OUTPUT_MODELS | "readonlyModels" => self.readonly_output_models = flag,
            STRICT_PATH_PARAMETERS => self.strict_path_parameters = flag,
            _ => {
                self.additional_properties
                    .insert(key.to_string(), value.to_string());
            }
        }
    }

    /// Apply every override in order; later pairs win.
    pub fn apply_properties<'a, I>(&mut self, properties: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in properties {
            self.apply_property(key, value);
        }
    }

    /// Resource artifacts exist only when resources are on and split into their own files.
    pub fn resource_artifacts_enabled(&self) -> bool {
        self.use_reactive_resource && self.split_resource_artifacts
    }

    /// Log the effective options once at startup.
    pub fn log_summary(&self, generator: &str) {
        info!(
            generator,
            use_reactive_resource = self.use_reactive_resource,
            use_injected_dependency = self.use_injected_dependency,
            split_resource_artifacts = self.split_resource_artifacts,
            readonly_output_models = self.readonly_output_models,
            strict_path_parameters = self.strict_path_parameters,
            "Generator initialized."
        );
    }
}

fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enable_everything_but_strict() {
        let options = GeneratorOptions::default();
        assert!(options.use_reactive_resource);
        assert!(options.use_injected_dependency);
        assert!(options.split_resource_artifacts);
        assert!(options.readonly_output_models);
        assert!(!options.strict_path_parameters);
        assert!(options.resource_artifacts_enabled());
    }

    #[test]
    fn test_from_toml_top_level() {
        let options = GeneratorOptions::from_toml_str("readonlyOutputModels = false\n").unwrap();
        assert!(!options.readonly_output_models);
        assert!(options.use_reactive_resource);
    }

    #[test]
    fn test_from_toml_table_with_legacy_names() {
        let options = GeneratorOptions::from_toml_str(
            "[generator]\nuseHttpResource = false\nseparateResources = false\n",
        )
        .unwrap();
        assert!(!options.use_reactive_resource);
        assert!(!options.split_resource_artifacts);
        assert!(!options.resource_artifacts_enabled());
    }

    #[test]
    fn test_from_toml_rejects_wrong_types() {
        let err =
            GeneratorOptions::from_toml_str("readonlyOutputModels = \"maybe\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_apply_property_boolean_rule() {
        let mut options = GeneratorOptions::default();
        options.apply_property("readonlyModels", "yes");
        assert!(!options.readonly_output_models);
        options.apply_property(READONLY_OUTPUT_MODELS, "TRUE");
        assert!(options.readonly_output_models);
        options.apply_property(STRICT_PATH_PARAMETERS, "true");
        assert!(options.strict_path_parameters);
    }

    #[test]
    fn test_unknown_properties_are_kept() {
        let mut options = GeneratorOptions::default();
        options.apply_properties([("npmName", "@acme/client"), ("useInjectFunction", "false")]);
        assert_eq!(
            options.additional_properties.get("npmName").map(String::as_str),
            Some("@acme/client")
        );
        assert!(!options.use_injected_dependency);
    }
}
