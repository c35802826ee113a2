//! Sorted report: collect every matched path, then write them in byte-wise lexicographic order.
//!
//! The whole matched set is held in memory until the input closes. That is the memory bound of
//! this action; very large result sets need an external sort instead.

use anyhow::{Context, Result};
use crossbeam_channel::Receiver;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::ActionHandle;
use crate::ActionOpts;
use crate::pipeline::{CancelToken, recv_or_cancel};

/// Min-heap of path strings. `String` orders byte-wise, which is the report order.
#[derive(Default)]
pub struct SortBuffer(BinaryHeap<Reverse<String>>);

impl SortBuffer {
    pub fn push(&mut self, path: String) {
        self.0.push(Reverse(path));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Write all buffered paths in ascending order, one per line, and flush.
    pub fn drain_to<W: Write>(mut self, out: W) -> io::Result<usize> {
        let mut out = BufWriter::new(out);
        let mut written = 0;
        while let Some(Reverse(path)) = self.0.pop() {
            out.write_all(path.as_bytes())?;
            out.write_all(b"\n")?;
            written += 1;
        }
        out.flush()?;
        Ok(written)
    }
}

/// Create (or truncate) the report file.
fn open_report_file(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("open {}", path.display()))
}

/// Sort matched paths and write them to `opts.output`, or stdout when no output is configured.
pub fn report_executor(
    inputs: Receiver<String>,
    opts: &ActionOpts,
    cancel: CancelToken,
) -> ActionHandle {
    let (sink, target): (Box<dyn Write + Send>, _) = match opts.output() {
        None => (Box::new(io::stdout()), None),
        Some(path) => match open_report_file(path) {
            Ok(file) => (Box::new(file), Some(path.to_path_buf())),
            Err(e) => return ActionHandle::failed(e.context("report"), &cancel),
        },
    };

    ActionHandle::spawn(target, cancel.clone(), move || {
        let mut buffer = SortBuffer::default();
        while let Some(path) = recv_or_cancel(&inputs, &cancel).context("report")? {
            buffer.push(path);
        }
        if buffer.is_empty() {
            log::debug!("No paths matched; report is empty");
        } else {
            log::debug!("Sorting {} matched paths", buffer.len());
        }
        let written = buffer.drain_to(sink).context("report: write output")?;
        log::debug!("Reported {} paths", written);
        Ok(())
    })
}
