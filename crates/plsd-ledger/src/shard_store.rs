//! The masking-shard store: exactly `max_shards` compressed G1 points,
//! 32 bytes each, no header. Record `i` sits at offset `i * 32`.

use std::fs;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::debug;

use plsd_chunks::{pipeline, StagedFile};
use plsd_core::{PlsdError, PlsdResult};
use plsd_crypto::{g1_from_bytes, g1_to_bytes, new_shard, shard_update, Exp, G1Affine, G1_BYTES};

#[derive(Debug, Clone)]
pub struct ShardStore {
    path: PathBuf,
    max_shards: usize,
}

impl ShardStore {
    pub fn new(path: PathBuf, max_shards: usize) -> Self {
        Self { path, max_shards }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Generate all `max_shards` shards under the time-key `s` and write the
    /// store. Generation is parallel; records land in index order regardless.
    pub fn populate(&self, s: &Exp) -> PlsdResult<()> {
        let records: Vec<[u8; G1_BYTES]> = (0..self.max_shards)
            .into_par_iter()
            .map(|_| g1_to_bytes(&new_shard(s)))
            .collect();

        let mut buf = Vec::with_capacity(self.max_shards * G1_BYTES);
        for record in &records {
            buf.extend_from_slice(record);
        }
        fs::write(&self.path, buf)?;
        debug!(shards = self.max_shards, path = %self.path.display(), "shard store populated");
        Ok(())
    }

    /// Read the first `n` shards into memory.
    pub fn get_all(&self, n: usize) -> PlsdResult<Vec<G1Affine>> {
        let data = fs::read(&self.path)?;
        if data.len() < n * G1_BYTES {
            return Err(PlsdError::FileTooShort {
                wanted: n,
                have: data.len() / G1_BYTES,
            });
        }
        data.chunks_exact(G1_BYTES)
            .take(n)
            .map(g1_from_bytes)
            .collect()
    }

    /// Random-access read of shard `index`.
    pub fn get_one(&self, index: usize) -> PlsdResult<G1Affine> {
        let mut file = fs::File::open(&self.path)?;
        file.seek(SeekFrom::Start((index * G1_BYTES) as u64))?;
        let mut record = [0u8; G1_BYTES];
        file.read_exact(&mut record)?;
        g1_from_bytes(&record)
    }

    /// Rewrite every shard under the new time-key, staged for a later rename.
    pub fn rotate_staged(&self, s: &Exp, s_new: &Exp) -> PlsdResult<StagedFile> {
        pipeline::process_file_staged(
            &self.path,
            &self.path,
            |_, record| {
                let shard = g1_from_bytes(record)?;
                Ok(g1_to_bytes(&shard_update(&shard, s, s_new)).to_vec())
            },
            self.max_shards,
            G1_BYTES,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plsd_crypto::gen_exp;

    fn store(dir: &tempfile::TempDir, max_shards: usize) -> ShardStore {
        ShardStore::new(dir.path().join("shards.bin"), max_shards)
    }

    #[test]
    fn populate_writes_exactly_max_shards_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir, 4);
        store.populate(&gen_exp()).unwrap();

        let len = fs::metadata(store.path()).unwrap().len();
        assert_eq!(len, 4 * G1_BYTES as u64);
    }

    #[test]
    fn get_one_matches_get_all() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir, 4);
        store.populate(&gen_exp()).unwrap();

        let all = store.get_all(4).unwrap();
        for (i, shard) in all.iter().enumerate() {
            assert_eq!(&store.get_one(i).unwrap(), shard);
        }
    }

    #[test]
    fn get_all_beyond_count_is_too_short() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir, 2);
        store.populate(&gen_exp()).unwrap();

        let err = store.get_all(3).unwrap_err();
        assert!(matches!(err, PlsdError::FileTooShort { wanted: 3, have: 2 }));
    }

    #[test]
    fn rotation_rewrites_every_record_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir, 3);
        let s = gen_exp();
        let s_new = gen_exp();
        store.populate(&s).unwrap();

        let before = store.get_all(3).unwrap();
        store.rotate_staged(&s, &s_new).unwrap().commit().unwrap();
        let after = store.get_all(3).unwrap();

        for (old, new) in before.iter().zip(&after) {
            assert_ne!(old, new);
            assert_eq!(&shard_update(old, &s, &s_new), new);
        }
    }

    #[test]
    fn corrupt_record_surfaces_as_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir, 1);
        fs::write(store.path(), [0xFFu8; G1_BYTES]).unwrap();

        assert!(matches!(
            store.get_one(0).unwrap_err(),
            PlsdError::Decode(_)
        ));
        let s = gen_exp();
        let s_new = gen_exp();
        assert!(store.rotate_staged(&s, &s_new).is_err());
    }
}
