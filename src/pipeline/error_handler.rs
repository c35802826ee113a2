use anyhow::{Result, bail};

use super::context::WalkStats;

/// Check the walk result: a recorded strict-mode error is returned.
/// Otherwise skipped paths are logged.
/// Call after joining the walk thread.
pub fn check_for_initial_error_or_skipped_paths(stats: &WalkStats, verbose: bool) -> Result<()> {
    if let Some(msg) = &stats.first_error {
        bail!("traversal: {}", msg);
    }
    let skipped = stats.skipped.len();
    if skipped > 0 {
        log::warn!(
            "Skipped {} paths due to permission errors or access issues",
            skipped
        );
        if verbose {
            for (p, reason) in &stats.skipped {
                eprintln!("  skipped: {} ({})", p.display(), reason);
            }
        }
    }
    Ok(())
}
