use clap::Parser;
use domain_tally::{app, utils, Args};
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = utils::setup_logging(args.verbose) {
        eprintln!("{e:#}");
    }

    match app::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(action = "fail", component = "application", error = %format!("{e:#}"), "Application error");
            ExitCode::FAILURE
        }
    }
}
