//! The encapsulated-key store: an append-only file of 64-byte compressed G2
//! points, one per published block.

use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use plsd_chunks::{pipeline, StagedFile};
use plsd_core::PlsdResult;
use plsd_crypto::{g2_from_bytes, g2_to_bytes, key_update, Exp, G2Affine, G2_BYTES};

#[derive(Debug, Clone)]
pub struct KeyStore {
    path: PathBuf,
}

impl KeyStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of keys on disk. A store that does not exist yet is empty.
    pub fn len(&self) -> PlsdResult<u64> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len() / G2_BYTES as u64),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    pub fn is_empty(&self) -> PlsdResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Append one key and return its zero-based index, computed from the file
    /// size before the write.
    pub fn append(&self, key: &G2Affine) -> PlsdResult<u64> {
        let mut file = fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        let index = file.metadata()?.len() / G2_BYTES as u64;
        file.write_all(&g2_to_bytes(key))?;
        debug!(index, "encapsulated key appended");
        Ok(index)
    }

    /// Random-access read of key `index`.
    pub fn get(&self, index: u64) -> PlsdResult<G2Affine> {
        let mut file = fs::File::open(&self.path)?;
        file.seek(SeekFrom::Start(index * G2_BYTES as u64))?;
        let mut record = [0u8; G2_BYTES];
        file.read_exact(&mut record)?;
        g2_from_bytes(&record)
    }

    /// Rewrite every key under the new time-key, staged for a later rename.
    ///
    /// Keys carry the inverse factor of the shards, so pads survive rotation.
    pub fn rotate_staged(&self, s: &Exp, s_new: &Exp) -> PlsdResult<StagedFile> {
        // a ledger with no published blocks still rotates cleanly
        fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        let count = self.len()? as usize;
        pipeline::process_file_staged(
            &self.path,
            &self.path,
            |_, record| {
                let key = g2_from_bytes(record)?;
                Ok(g2_to_bytes(&key_update(&key, s, s_new)).to_vec())
            },
            count,
            G2_BYTES,
        )
    }
}
