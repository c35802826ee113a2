use clap::Parser;
use std::path::PathBuf;

use crate::CollisionPolicy;

struct DefaultArgs;

impl DefaultArgs {
    pub const DIR: &'static str = ".";
}

/// Walk a directory, filter its files concurrently, and report, copy, or move the matches.
#[derive(Clone, Debug, Parser)]
#[command(name = "filewalker")]
#[command(
    about = "Walk DIR, match each file with a filter, and run an action on the matches.",
    after_help = "Filters: contains, glob, path-contains, prefix, regex, suffix.\nActions: copy, move, report."
)]
pub struct Cli {
    /// Base directory to walk. Default: current directory.
    #[arg(value_name = "DIR", default_value = DefaultArgs::DIR)]
    pub dir: PathBuf,

    /// Number of concurrent filtering workers. Default: detected CPUs.
    #[arg(long, short = 'w', value_name = "N")]
    pub workers: Option<usize>,

    /// Filter method used for matching. Default: glob.
    #[arg(long, short = 'f', value_name = "NAME")]
    pub filter: Option<String>,

    /// Pattern string used by the filter. Default: "*".
    #[arg(long, short = 'p')]
    pub pattern: Option<String>,

    /// Output file (report) or destination directory (copy, move).
    #[arg(long, short = 'o', value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Action run on matched files. Default: report.
    #[arg(long, short = 'a', value_name = "NAME")]
    pub action: Option<String>,

    /// What copy and move do when the destination already has a file with the same name.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub on_collision: Option<CollisionPolicy>,

    /// Follow symbolic links.
    #[arg(long, short = 'L', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// Strict mode: fail on first traversal error instead of skipping.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub strict: Option<bool>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}
