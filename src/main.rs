//! Filewalker CLI: walk a directory, filter files, and report, copy, or move the matches.

use clap::Parser;
use colored::Colorize;
use filewalker::engine::arg_parser::Cli;
use filewalker::engine::handle_run;
use std::process::ExitCode;
use std::time::Instant;

fn main() -> ExitCode {
    let start_time = Instant::now();
    let cli = Cli::parse();
    if let Err(e) = handle_run(&cli) {
        eprintln!("{} {:#}", "error:".red(), e);
        return ExitCode::FAILURE;
    }
    log::debug!("Total time: {:?}", start_time.elapsed());
    ExitCode::SUCCESS
}
