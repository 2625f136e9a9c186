//! Subcommand arguments and entry points.

pub mod common;
pub mod generate;
pub mod plan;
