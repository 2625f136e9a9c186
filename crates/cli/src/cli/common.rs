//! Arguments and document loading shared by the subcommands.

use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use ngen_core::{GenerationPlan, GeneratorOptions, generate};

use crate::error::{CliError, Result};

/// Input document and option sources shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// OpenAPI document (JSON or YAML)
    #[arg(value_name = "SPEC")]
    pub input: PathBuf,

    /// TOML file with generator options
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Option overrides, e.g. `-p useReactiveResource=false,readonlyOutputModels=true`
    #[arg(
        long = "additional-properties",
        short = 'p',
        value_name = "KEY=VALUE",
        value_delimiter = ',',
        value_parser = parse_property
    )]
    pub additional_properties: Vec<(String, String)>,
}

impl SourceArgs {
    /// Defaults, then the config file, then `--additional-properties` in order.
    pub fn options(&self) -> Result<GeneratorOptions> {
        let mut options = match &self.config {
            Some(path) => GeneratorOptions::load(path)?,
            None => GeneratorOptions::default(),
        };
        options.apply_properties(
            self.additional_properties
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str())),
        );
        Ok(options)
    }

    /// Read the document and plan it.
    pub fn plan(&self) -> Result<GenerationPlan> {
        let options = self.options()?;
        let source = read_source(&self.input)?;
        Ok(generate(&source, options)?)
    }
}

fn read_source(path: &Path) -> Result<String> {
    debug!(path = %path.display(), "Reading OpenAPI document.");
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse one `key=value` pair; the value may itself contain `=`.
pub fn parse_property(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_property() {
        assert_eq!(
            parse_property("useReactiveResource=false").unwrap(),
            ("useReactiveResource".to_string(), "false".to_string())
        );
        assert_eq!(
            parse_property("banner=a=b").unwrap(),
            ("banner".to_string(), "a=b".to_string())
        );
        assert!(parse_property("noValue").is_err());
        assert!(parse_property("=true").is_err());
    }

    #[test]
    fn test_properties_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("ngen.toml");
        fs::write(
            &config,
            "[generator]\nuseHttpResource = false\nreadonlyModels = false\n",
        )
        .unwrap();

        let args = SourceArgs {
            input: dir.path().join("openapi.json"),
            config: Some(config),
            additional_properties: vec![
                ("readonlyModels".to_string(), "TRUE".to_string()),
                ("banner".to_string(), "hello".to_string()),
            ],
        };
        let options = args.options().unwrap();
        assert!(!options.use_reactive_resource);
        assert!(options.readonly_output_models);
        assert_eq!(options.additional_properties["banner"], "hello");
    }

    #[test]
    fn test_missing_input_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = SourceArgs {
            input: dir.path().join("missing.yaml"),
            config: None,
            additional_properties: Vec::new(),
        };
        assert!(matches!(args.plan(), Err(CliError::Read { .. })));
    }
}
