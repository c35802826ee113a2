//! Move matched files into a destination directory under their base names.

use anyhow::{Context, Result, bail};
use crossbeam_channel::Receiver;
use std::fs;
use std::path::Path;

use super::ActionHandle;
use super::destination::{destination_for, resolve_destination};
use crate::pipeline::{CancelToken, recv_or_cancel};
use crate::{ActionOpts, CollisionPolicy};

/// Rename `src` to `dest`. With [`CollisionPolicy::Fail`] an existing `dest` is an error.
/// The existence check and the rename are two steps; a file created in between is overwritten.
pub fn move_file(src: &Path, dest: &Path, collision: CollisionPolicy) -> Result<()> {
    if collision == CollisionPolicy::Fail && fs::symlink_metadata(dest).is_ok() {
        bail!("{} already exists", dest.display());
    }
    fs::rename(src, dest)
        .with_context(|| format!("rename {} -> {}", src.display(), dest.display()))
}

/// Move each matched file into `opts.output` (or a fresh directory). Halts on the first error.
pub fn move_executor(
    inputs: Receiver<String>,
    opts: &ActionOpts,
    cancel: CancelToken,
) -> ActionHandle {
    let dir = match resolve_destination(opts.output()) {
        Ok(dir) => dir,
        Err(e) => return ActionHandle::failed(e.context("move"), &cancel),
    };
    let collision = opts.collision;

    ActionHandle::spawn(Some(dir.clone()), cancel.clone(), move || {
        let mut moved = 0_usize;
        while let Some(path) = recv_or_cancel(&inputs, &cancel).context("move")? {
            let dest = destination_for(&dir, &path).context("move")?;
            move_file(Path::new(&path), &dest, collision)
                .with_context(|| format!("move: {path}"))?;
            moved += 1;
        }
        log::debug!("Moved {} files to {}", moved, dir.display());
        Ok(())
    })
}
