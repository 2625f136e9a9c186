//! `ngen` command line: plans an OpenAPI document with `ngen-core` and
//! renders the Angular client through tera templates.

use clap::{CommandFactory, Parser, Subcommand};
use std::ffi::OsString;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub mod cli;
pub mod error;
pub mod render;

pub use error::{CliError, Result};

/// Crates whose logs a plain `NGEN_LOG` level applies to.
const LOG_TARGETS: [&str; 3] = ["ngen", "ngen_core", "ngen_cli"];

#[derive(Parser, Debug)]
#[command(
    name = "ngen",
    version,
    about = "Angular client generator for OpenAPI documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate models, services and resources into a directory
    Generate(cli::generate::GenerateArgs),
    /// Print the decorated generation plan as JSON
    Plan(cli::plan::PlanArgs),
}

/// Parse `args` (including the program name) and run the chosen command.
pub fn run_cli<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => {
            init_tracing();
            match cli.command {
                Some(Commands::Generate(args)) => cli::generate::run(args),
                Some(Commands::Plan(args)) => cli::plan::run(args),
                None => {
                    let mut cmd = Cli::command();
                    let _ = cmd.print_help();
                    println!();
                    0
                }
            }
        }
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

/// Install the stderr fmt subscriber.
///
/// NGEN_LOG takes a plain level ("debug") applied to the ngen crates, or a
/// full filter spec like "ngen_core=trace,ngen_cli=warn".
pub fn init_tracing() {
    let filter = log_filter(std::env::var("NGEN_LOG").ok().as_deref());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn log_filter(value: Option<&str>) -> String {
    match value {
        Some(level) if is_plain_level(level) => directives(level),
        Some(spec) if !spec.trim().is_empty() => spec.to_string(),
        _ => directives("info"),
    }
}

fn directives(level: &str) -> String {
    let level = level.to_ascii_lowercase();
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter() {
        assert_eq!(log_filter(None), "ngen=info,ngen_core=info,ngen_cli=info");
        assert_eq!(
            log_filter(Some("DEBUG")),
            "ngen=debug,ngen_core=debug,ngen_cli=debug"
        );
        assert_eq!(log_filter(Some("ngen_core=trace")), "ngen_core=trace");
        assert_eq!(log_filter(Some("  ")), "ngen=info,ngen_core=info,ngen_cli=info");
    }

    #[test]
    fn test_cli_parses_repeated_and_delimited_properties() {
        let cli = Cli::try_parse_from([
            "ngen",
            "plan",
            "openapi.yaml",
            "-p",
            "useReactiveResource=false,readonlyOutputModels=false",
            "--additional-properties",
            "strictPathParameters=true",
        ])
        .unwrap();
        let Some(Commands::Plan(args)) = cli.command else {
            panic!("expected plan command");
        };
        let keys: Vec<_> = args
            .source
            .additional_properties
            .iter()
            .map(|(key, _)| key.as_str())
            .collect();
        assert_eq!(
            keys,
            ["useReactiveResource", "readonlyOutputModels", "strictPathParameters"]
        );
    }

    #[test]
    fn test_cli_rejects_malformed_property() {
        assert!(Cli::try_parse_from(["ngen", "plan", "openapi.yaml", "-p", "oops"]).is_err());
    }
}
