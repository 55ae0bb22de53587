//! Read → process → write over a file, parallel across chunks.
//!
//! The input is split into at most `max_chunks` chunks of `chunk_size` bytes
//! (the last may be shorter). The chunk function runs in parallel on the
//! rayon pool; results are written contiguously in index order, so the output
//! bytes are independent of worker count and scheduling.
//!
//! The full input is read before anything is written, and the output lands in
//! a dot-prefixed temp file that is renamed over the destination. That makes
//! in-place processing (`input == output`, used by store rotation) safe, and
//! lets callers stage several files and commit the renames together.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use plsd_core::{PlsdError, PlsdResult};

/// A fully written temp file waiting to be renamed over its destination.
#[derive(Debug)]
pub struct StagedFile {
    tmp: PathBuf,
    dest: PathBuf,
}

impl StagedFile {
    /// Atomically replace the destination with the staged content.
    pub fn commit(self) -> PlsdResult<()> {
        fs::rename(&self.tmp, &self.dest)?;
        Ok(())
    }
}

/// Process `input` into `output` and commit immediately.
///
/// `f` receives the chunk index and the chunk bytes and must return an output
/// chunk of the same length.
pub fn process_file<F>(
    input: &Path,
    output: &Path,
    f: F,
    max_chunks: usize,
    chunk_size: usize,
) -> PlsdResult<()>
where
    F: Fn(usize, &[u8]) -> PlsdResult<Vec<u8>> + Sync,
{
    process_file_staged(input, output, f, max_chunks, chunk_size)?.commit()
}

/// Process `input` into a staged temp file next to `output`.
///
/// Fails with `FileTooLarge` before any byte is written if the input needs
/// more than `max_chunks` chunks. Any I/O or chunk failure aborts the whole
/// pipeline.
pub fn process_file_staged<F>(
    input: &Path,
    output: &Path,
    f: F,
    max_chunks: usize,
    chunk_size: usize,
) -> PlsdResult<StagedFile>
where
    F: Fn(usize, &[u8]) -> PlsdResult<Vec<u8>> + Sync,
{
    assert!(chunk_size > 0, "chunk size must be positive");

    let data = fs::read(input)?;
    let chunks = data.len().div_ceil(chunk_size);
    if chunks > max_chunks {
        return Err(PlsdError::FileTooLarge {
            chunks,
            max_shards: max_chunks,
        });
    }

    let results: Vec<Vec<u8>> = data
        .par_chunks(chunk_size)
        .enumerate()
        .map(|(index, chunk)| f(index, chunk))
        .collect::<PlsdResult<_>>()?;

    let tmp = stage_path(output);
    let mut file = fs::File::create(&tmp)?;
    for piece in &results {
        file.write_all(piece)?;
    }

    Ok(StagedFile {
        tmp,
        dest: output.to_path_buf(),
    })
}

fn stage_path(dest: &Path) -> PathBuf {
    let parent = dest.parent().unwrap_or(Path::new("."));
    parent.join(format!(
        ".{}.tmp",
        dest.file_name().unwrap_or_default().to_string_lossy()
    ))
}
