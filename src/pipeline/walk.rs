//! Producer: walks the base directory and sends regular-file paths into the path channel.

use crossbeam_channel::Sender;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use walkdir::WalkDir;

use super::cancel::{CancelToken, send_or_cancel};
use super::context::{WalkContext, WalkStats};

/// One result from a directory walk.
pub enum WalkOutcome {
    /// A regular file.
    File(PathBuf),
    /// Directories, symlinks, and anything else that is not a regular file.
    Other,
    Err { msg: String, path: Option<PathBuf> },
}

/// Convert a walkdir result into [`WalkOutcome`].
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> WalkOutcome {
    match r {
        Ok(entry) if entry.file_type().is_file() => WalkOutcome::File(entry.into_path()),
        Ok(_) => WalkOutcome::Other,
        Err(err) => WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        },
    }
}

/// True if `path` is the action's own output.
///
/// The canonicalize is skipped when both paths have differing file names. Paths with no file
/// name (`.`, `..`, `x/..`) are always canonicalized, since they can name the target too.
pub fn is_excluded(path: &Path, exclude: Option<&Path>) -> bool {
    let Some(exclude) = exclude else {
        return false;
    };
    if let (Some(name), Some(target)) = (path.file_name(), exclude.file_name())
        && name != target
    {
        return false;
    }
    path.canonicalize().is_ok_and(|p| p == exclude)
}

/// Path string handed to the filters: the walked path with a leading `./` removed.
/// Non-UTF-8 paths come back as `Err` with the original path.
pub fn to_path_string(path: PathBuf) -> Result<String, PathBuf> {
    let rel = path
        .strip_prefix(".")
        .ok()
        .filter(|rel| !rel.as_os_str().is_empty())
        .map(Path::to_path_buf);
    rel.unwrap_or(path)
        .into_os_string()
        .into_string()
        .map_err(PathBuf::from)
}

fn walkdir_iter(ctx: &WalkContext) -> Box<dyn Iterator<Item = WalkOutcome>> {
    let exclude = ctx.exclude.clone();
    Box::new(
        WalkDir::new(&ctx.root)
            .follow_links(ctx.follow_links)
            .into_iter()
            .filter_entry(move |e| !is_excluded(e.path(), exclude.as_deref()))
            .map(to_outcome_walkdir),
    )
}

pub fn spawn_walk_thread(
    path_tx: Sender<String>,
    ctx: WalkContext,
    cancel: CancelToken,
) -> JoinHandle<WalkStats> {
    thread::spawn(move || {
        let iter = walkdir_iter(&ctx);
        run_walk_loop(path_tx, &ctx, iter, &cancel)
    })
}

/// Run the walk loop: consume `iter`, send file paths to `path_tx`, handle errors.
/// Strict mode records the first error, cancels the pipeline, and stops.
/// Otherwise errors are logged and counted as skipped.
/// Drops `path_tx` when done, which closes the path channel.
pub fn run_walk_loop<I>(
    path_tx: Sender<String>,
    ctx: &WalkContext,
    iter: I,
    cancel: &CancelToken,
) -> WalkStats
where
    I: Iterator<Item = WalkOutcome>,
{
    let mut stats = WalkStats::default();
    for outcome in iter {
        match outcome {
            WalkOutcome::File(path) => match to_path_string(path) {
                Ok(path) => {
                    if send_or_cancel(&path_tx, path, cancel).is_err() {
                        break;
                    }
                    stats.sent += 1;
                }
                Err(path) => {
                    log::warn!("Skipping non UTF-8 path: {}", path.display());
                    stats.skipped.push((path, "path is not valid UTF-8".to_string()));
                }
            },
            WalkOutcome::Other => {}
            WalkOutcome::Err { msg, path } => {
                if ctx.strict {
                    stats.first_error = Some(msg);
                    cancel.cancel();
                    break;
                }
                log::warn!("Permission denied or error accessing path: {}", msg);
                stats
                    .skipped
                    .push((path.unwrap_or_else(|| PathBuf::from("<no-path>")), msg));
            }
        }
    }
    drop(path_tx);
    stats
}
