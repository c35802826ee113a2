//! CLI command handler: merge defaults, config file, and flags, then run the pipeline.

use anyhow::{Context, Result};
use log::debug;

use crate::Opts;
use crate::engine::arg_parser::Cli;
use crate::executor::ExecutorMethods;
use crate::filter::FilterMethods;
use crate::pipeline::{CancelToken, run_pipeline};
use crate::utils::config::PackagePaths;
use crate::utils::{apply_file_to_opts, load_filewalker_toml, setup_logging};

/// Overwrite opts field from a CLI flag when given.
macro_rules! apply_cli_opt {
    ($cli:expr, $opts:expr, $cli_field:ident => $opts_field:ident) => {
        if let Some(v) = $cli.$cli_field.clone() {
            $opts.$opts_field = v;
        }
    };
}

/// Defaults, then `<DIR>/.filewalker.toml`, then CLI flags.
pub fn build_opts(cli: &Cli) -> Result<Opts> {
    let mut opts = Opts {
        root: cli.dir.clone(),
        ..Opts::default()
    };
    if let Some(file) = load_filewalker_toml(&cli.dir)? {
        apply_file_to_opts(&file, &mut opts);
    }
    if cli.workers.is_some() {
        opts.workers = cli.workers;
    }
    if cli.out.is_some() {
        opts.output = cli.out.clone();
    }
    apply_cli_opt!(cli, opts, filter => filter);
    apply_cli_opt!(cli, opts, pattern => pattern);
    apply_cli_opt!(cli, opts, action => action);
    apply_cli_opt!(cli, opts, on_collision => collision);
    apply_cli_opt!(cli, opts, follow_links => follow_links);
    apply_cli_opt!(cli, opts, strict => strict);
    apply_cli_opt!(cli, opts, verbose => verbose);
    Ok(opts)
}

/// Run the pipeline with the standard registries. Ctrl+C cancels the pipeline.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = build_opts(cli)?;
    setup_logging(opts.verbose);
    debug!(
        "{} CONFIG:{:#?}",
        PackagePaths::get().pkg_name().to_uppercase(),
        opts
    );

    let cancel = CancelToken::new();
    let cancel_handler = cancel.clone();
    ctrlc::set_handler(move || cancel_handler.cancel()).context("set Ctrl+C handler")?;

    run_pipeline(
        &opts,
        &FilterMethods::default(),
        &ExecutorMethods::default(),
        &cancel,
    )?;
    Ok(())
}
