//! stderr logging. Our crate logs at info (debug with `--verbose`); dependencies only warn.

use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter, Record};
use std::io::Write;

/// Last segment of the record's module path: `filewalker::executor::copy` -> `copy`.
fn stage<'a>(record: &'a Record<'a>) -> &'a str {
    let target = record.target();
    target.rsplit("::").next().unwrap_or(target)
}

/// Install the global logger. A second call (tests, embedding) keeps the first logger.
pub fn setup_logging(verbose: bool) {
    let name = env!("CARGO_PKG_NAME");
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(name, level)
        .format(move |buf, record| {
            let line = match record.level() {
                Level::Error => format!("[{} {}] {}", name.cyan(), "ERROR".red(), record.args()),
                Level::Warn => format!(
                    "[{} {} {}] {}",
                    name.cyan(),
                    "WARN".yellow(),
                    stage(record).white(),
                    record.args()
                ),
                Level::Info => format!("[{}] {}", name.cyan(), record.args()),
                Level::Debug | Level::Trace => {
                    format!("[{} {}] {}", name.cyan(), stage(record).dimmed(), record.args())
                }
            };
            writeln!(buf, "{}", line)
        })
        .try_init();
}
