//! Destination directory resolution shared by copy and move.

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::utils::config::{PackagePaths, SYNTHESIZED_DIR_ATTEMPTS};

/// `<pkg>-<unix nanos>`, with `-<attempt>` appended on retries.
pub fn synthesized_dir_name(nanos: u128, attempt: u32) -> String {
    let prefix = PackagePaths::get().dest_dir_prefix();
    match attempt {
        0 => format!("{prefix}-{nanos}"),
        n => format!("{prefix}-{nanos}-{n}"),
    }
}

fn now_nanos() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0)
}

/// Create the destination directory and return it.
///
/// A configured directory is created with its parents and may already exist. Without one, a new
/// directory is created in the current directory under a timestamped name; `create_dir` fails on
/// an existing name, so a directory made by another run is never reused.
pub fn resolve_destination(configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = configured {
        fs::create_dir_all(dir)
            .with_context(|| format!("create destination directory {}", dir.display()))?;
        return Ok(dir.to_path_buf());
    }

    let mut last_err = None;
    for attempt in 0..SYNTHESIZED_DIR_ATTEMPTS {
        let dir = PathBuf::from(synthesized_dir_name(now_nanos(), attempt));
        match fs::create_dir(&dir) {
            Ok(()) => {
                log::debug!("Created destination directory {}", dir.display());
                return Ok(dir);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => last_err = Some(e),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("create destination directory {}", dir.display()));
            }
        }
    }
    Err(anyhow::anyhow!(
        "could not create a unique destination directory after {} attempts: {}",
        SYNTHESIZED_DIR_ATTEMPTS,
        last_err.map(|e| e.to_string()).unwrap_or_default()
    ))
}

/// `dir/<base name of path>`.
pub(crate) fn destination_for(dir: &Path, path: &str) -> Result<PathBuf> {
    let name = Path::new(path)
        .file_name()
        .with_context(|| format!("{path} has no file name"))?;
    Ok(dir.join(name))
}
