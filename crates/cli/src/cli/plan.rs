//! `ngen plan`: print the decorated plan.

use clap::Args;

use crate::cli::common::SourceArgs;
use crate::error::Result;

/// Arguments of `ngen plan`.
#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// Document and options
    #[command(flatten)]
    pub source: SourceArgs,

    /// Emit compact JSON on a single line
    #[arg(long)]
    pub compact: bool,
}

/// Run `ngen plan`, printing the plan JSON; returns the exit code.
pub fn run(args: PlanArgs) -> i32 {
    match plan_json(&args) {
        Ok(json) => {
            println!("{json}");
            0
        }
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

/// The decorated plan as JSON, as handed to renderers.
pub fn plan_json(args: &PlanArgs) -> Result<String> {
    let plan = args.source.plan()?;
    let json = if args.compact {
        serde_json::to_string(&plan)?
    } else {
        serde_json::to_string_pretty(&plan)?
    };
    Ok(json)
}
