//! Public and internal types for the filewalker API and pipeline.

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::Deserialize;

/// What copy/move do when `dest/<basename>` already exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Replace the existing file.
    #[default]
    Overwrite,
    /// Halt the action with an error.
    Fail,
}

/// Options handed to an action when it is started.
#[derive(Clone, Debug, Default)]
pub struct ActionOpts {
    /// Output file (report) or destination directory (copy/move).
    /// `None` or empty means the action's default.
    pub output: Option<PathBuf>,
    pub collision: CollisionPolicy,
}

impl ActionOpts {
    /// The configured output, treating an empty path the same as no path.
    pub fn output(&self) -> Option<&std::path::Path> {
        self.output
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

/// Full run configuration (CLI, config file, or lib caller).
#[derive(Clone, Debug)]
pub struct Opts {
    /// Base directory to walk.
    pub root: PathBuf,
    /// Filter worker count. When None, uses detected parallelism.
    pub workers: Option<usize>,
    /// Registry name of the filter method.
    pub filter: String,
    /// Pattern handed to the filter constructor.
    pub pattern: String,
    /// Registry name of the action.
    pub action: String,
    pub output: Option<PathBuf>,
    pub collision: CollisionPolicy,
    /// Follow symbolic links during the walk.
    pub follow_links: bool,
    /// Strict mode: fail on first traversal error instead of skipping.
    pub strict: bool,
    pub verbose: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            workers: None,
            filter: "glob".to_string(),
            pattern: "*".to_string(),
            action: "report".to_string(),
            output: None,
            collision: CollisionPolicy::default(),
            follow_links: false,
            strict: false,
            verbose: false,
        }
    }
}

impl From<&Opts> for ActionOpts {
    fn from(o: &Opts) -> Self {
        ActionOpts {
            output: o.output.clone(),
            collision: o.collision,
        }
    }
}

/// Counts from a successful run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Regular-file paths sent into the pipeline.
    pub walked: usize,
    /// Entries the walk could not read (permission errors, non-UTF-8 names).
    pub skipped: usize,
}

/// Marker error for stages that stopped because the pipeline was cancelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("pipeline cancelled")
    }
}

impl std::error::Error for Cancelled {}
