//! Copy matched files into a destination directory under their base names.

use anyhow::{Context, Result, bail};
use crossbeam_channel::Receiver;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use super::ActionHandle;
use super::destination::{destination_for, resolve_destination};
use crate::pipeline::{CancelToken, recv_or_cancel};
use crate::utils::config::COPY_BUFFER_SIZE;
use crate::{ActionOpts, CollisionPolicy};

/// Open the destination for writing. Overwrite truncates, so a re-run leaves identical content.
fn open_destination(dest: &Path, collision: CollisionPolicy) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true);
    match collision {
        CollisionPolicy::Overwrite => options.create(true).truncate(true),
        CollisionPolicy::Fail => options.create_new(true),
    };
    match options.open(dest) {
        Ok(f) => Ok(f),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            bail!("{} already exists", dest.display())
        }
        Err(e) => Err(e).with_context(|| format!("open destination {}", dest.display())),
    }
}

/// True if `dest` exists and resolves to the same file as `src`.
fn is_same_file(src: &Path, dest: &Path) -> bool {
    match (src.canonicalize(), dest.canonicalize()) {
        (Ok(s), Ok(d)) => s == d,
        _ => false,
    }
}

/// Copy `src` to `dest` through `buf`. Returns bytes copied.
///
/// A `dest` that is `src` itself is refused before anything is opened, so the source is never
/// truncated by its own copy.
pub fn copy_file_with_buffer(
    src: &Path,
    dest: &Path,
    collision: CollisionPolicy,
    buf: &mut [u8],
) -> Result<u64> {
    if is_same_file(src, dest) {
        bail!("{} is the source file itself", dest.display());
    }
    let mut reader = File::open(src).with_context(|| format!("open source {}", src.display()))?;
    let mut writer = open_destination(dest, collision)?;
    let mut total = 0_u64;
    loop {
        let n = match reader.read(buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).with_context(|| format!("read {}", src.display())),
        };
        writer
            .write_all(&buf[..n])
            .with_context(|| format!("write {}", dest.display()))?;
        total += n as u64;
    }
    writer
        .flush()
        .with_context(|| format!("write {}", dest.display()))?;
    Ok(total)
}

/// Copy each matched file into `opts.output` (or a fresh directory). Halts on the first error.
pub fn copy_executor(
    inputs: Receiver<String>,
    opts: &ActionOpts,
    cancel: CancelToken,
) -> ActionHandle {
    let dir = match resolve_destination(opts.output()) {
        Ok(dir) => dir,
        Err(e) => return ActionHandle::failed(e.context("copy"), &cancel),
    };
    let collision = opts.collision;

    ActionHandle::spawn(Some(dir.clone()), cancel.clone(), move || {
        let mut buf = vec![0_u8; COPY_BUFFER_SIZE];
        let mut copied = 0_usize;
        while let Some(path) = recv_or_cancel(&inputs, &cancel).context("copy")? {
            let dest = destination_for(&dir, &path).context("copy")?;
            copy_file_with_buffer(Path::new(&path), &dest, collision, &mut buf)
                .with_context(|| format!("copy: {path}"))?;
            copied += 1;
        }
        log::debug!("Copied {} files to {}", copied, dir.display());
        Ok(())
    })
}
