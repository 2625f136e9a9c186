//! `ngen` binary entry point.

fn main() {
    std::process::exit(ngen_cli::run_cli(std::env::args_os()));
}
