//! `ngen generate`: render the plan into files.

use clap::Args;
use console::style;
use std::path::{Path, PathBuf};

use crate::cli::common::SourceArgs;
use crate::error::Result;
use crate::render::Renderer;

/// Arguments of `ngen generate`.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Document and options
    #[command(flatten)]
    pub source: SourceArgs,

    /// Directory the `models/` and `api/` folders are written into
    #[arg(long, short = 'o', value_name = "DIR", default_value = "generated")]
    pub output: PathBuf,

    /// Directory with template overrides (model.ts.tera, api-service.ts.tera, api-resource.ts.tera)
    #[arg(long, short = 't', value_name = "DIR")]
    pub templates: Option<PathBuf>,
}

/// Run `ngen generate`, printing a summary; returns the exit code.
pub fn run(args: GenerateArgs) -> i32 {
    match generate_files(&args) {
        Ok(summary) => {
            print_summary(&summary, &args.output);
            0
        }
        Err(err) => {
            eprintln!("{} {err}", style("error:").red().bold());
            1
        }
    }
}

/// Written and skipped output paths of one run.
#[derive(Debug, Default)]
pub struct GenerateSummary {
    /// Files written, under the output directory
    pub written: Vec<PathBuf>,
    /// Relative paths left out by the skip set
    pub skipped: Vec<String>,
}

/// Plan the document and render every planned file under `--output`.
pub fn generate_files(args: &GenerateArgs) -> Result<GenerateSummary> {
    let plan = args.source.plan()?;
    let renderer = Renderer::new(args.templates.as_deref())?;
    let written = renderer.write_all(&plan, &args.output)?;
    Ok(GenerateSummary {
        written,
        skipped: plan.skip_set.iter().map(str::to_string).collect(),
    })
}

fn print_summary(summary: &GenerateSummary, output: &Path) {
    for path in &summary.written {
        let shown = path.strip_prefix(output).unwrap_or(path);
        println!("{} {}", style("✓").green(), shown.display());
    }
    for path in &summary.skipped {
        println!("{} {path}", style("-").dim());
    }
    println!(
        "{} {} files written to {}, {} skipped",
        style("done:").bold(),
        summary.written.len(),
        output.display(),
        summary.skipped.len()
    );
}
