use archivist::cli::{Cli, run};
use archivist::logging::init_logging;
use clap::Parser;

fn main() -> std::process::ExitCode {
    init_logging();
    run(Cli::parse())
}
