//! The ledger state machine: init, add-block, decrypt-block, rotation, and
//! the consistency check tying the three on-disk components together.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use plsd_chunks::{digest_file, DIGEST_LEN};
use plsd_core::{PlsdError, PlsdResult, Settings};
use plsd_crypto::{block_key, gen_exp, pairing_pad, Exp, G2Affine, User};

use crate::chain::{BlockChain, BlockRecord};
use crate::encrypt::encrypt_file;
use crate::key_store::KeyStore;
use crate::shard_store::ShardStore;

/// The filekeeper's ledger. Single-writer; every operation opens the store
/// files fresh.
#[derive(Debug)]
pub struct Ledger {
    settings: Settings,
    shards: ShardStore,
    keys: KeyStore,
    chain: BlockChain,
}

impl Ledger {
    pub fn new(settings: Settings) -> Self {
        let shards = ShardStore::new(settings.shards_file.clone(), settings.max_shards);
        let keys = KeyStore::new(settings.keys_file.clone());
        let chain = BlockChain::new(settings.root_path.clone(), settings.encrypt_path.clone());
        Self {
            settings,
            shards,
            keys,
            chain,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn shard_store(&self) -> &ShardStore {
        &self.shards
    }

    pub fn key_store(&self) -> &KeyStore {
        &self.keys
    }

    pub fn chain(&self) -> &BlockChain {
        &self.chain
    }

    /// Set up a fresh ledger: drop any previous stores, write the empty
    /// block-0 anchor, draw a time-key and populate the shard store with it.
    ///
    /// Returns the time-key; it exists nowhere else.
    pub fn init(&self) -> PlsdResult<Exp> {
        for prefix_path in [self.chain.block_path(0), self.chain.ciphertext_path(0)] {
            if let Some(parent) = prefix_path.parent() {
                fs::create_dir_all(parent)?;
            }
        }
        for store_path in [self.shards.path(), self.keys.path()] {
            if let Some(parent) = store_path.parent() {
                fs::create_dir_all(parent)?;
            }
            remove_if_present(store_path)?;
        }

        self.chain.create_anchor()?;
        let s = gen_exp();
        self.shards.populate(&s)?;
        info!(shards = self.settings.max_shards, "ledger initialised");
        Ok(s)
    }

    /// Publish a file as the next block.
    ///
    /// The ciphertext and the block record are written first; appending the
    /// encapsulated key commits the block. A failure before the append leaves
    /// only orphan files that no consistency check references.
    pub fn add_block(&self, user: &User, token: &G2Affine, plaintext: &Path) -> PlsdResult<u64> {
        let pt_len = fs::metadata(plaintext)?.len() as usize;
        let chunks = pt_len.div_ceil(self.settings.pad_size);
        if chunks > self.settings.max_shards {
            return Err(PlsdError::FileTooLarge {
                chunks,
                max_shards: self.settings.max_shards,
            });
        }

        let k = gen_exp();
        let key = block_key(token, &k);
        let kappa = user.encapsulate(&key);

        let index = self.keys.len()?;
        let ciphertext = self.chain.ciphertext_path(index);
        let shards = self.shards.get_all(chunks)?;
        encrypt_file(plaintext, &ciphertext, &shards, &key, self.settings.pad_size)?;

        let prev_hash = digest_file(&self.chain.block_path(index))?;
        let ct_hash = digest_file(&ciphertext)?;
        let pt_hash = digest_file(plaintext)?;

        let control_index = (index as usize) % self.settings.max_shards;
        let control_shard = match shards.get(control_index) {
            Some(shard) => *shard,
            None => self.shards.get_one(control_index)?,
        };
        let control = pairing_pad(&control_shard, &kappa, self.settings.pad_size);

        let record = BlockRecord::new(prev_hash, ct_hash, pt_hash, &control);
        self.chain.append(index + 1, &record)?;
        self.keys.append(&kappa)?;

        info!(index, bytes = pt_len, "block published");
        Ok(index)
    }

    /// The encapsulated key of block `index`, for the owner to unlock.
    pub fn encapsulated_key(&self, index: u64) -> PlsdResult<G2Affine> {
        self.keys.get(index)
    }

    /// Decrypt block `index` to `out` with an unlocked key.
    ///
    /// The pad is self-inverse, so decryption re-runs the encryption
    /// pipeline. The result is only trusted after the chain before this
    /// block verifies and the block's recorded plaintext digest matches the
    /// freshly computed one; otherwise the output must be discarded.
    pub fn decrypt_block(&self, index: u64, unlocked: &G2Affine, out: &Path) -> PlsdResult<()> {
        let shards = self.shards.get_all(self.settings.max_shards)?;
        encrypt_file(
            &self.chain.ciphertext_path(index),
            out,
            &shards,
            unlocked,
            self.settings.pad_size,
        )?;

        let pt_digest = digest_file(out)?;
        if !self.verify_block(index, &pt_digest) {
            return Err(PlsdError::Inconsistent);
        }
        Ok(())
    }

    /// Rotate the time-key: every shard gains a factor `s_new/s`, every
    /// encapsulated key the inverse, and all pads stay fixed.
    ///
    /// Both stores are staged to temp files before either is renamed, so the
    /// window in which they disagree is two renames wide; a crash inside it
    /// leaves a mismatch that [`verify_chain`](Self::verify_chain) detects.
    pub fn rotate(&self, s: &Exp) -> PlsdResult<Exp> {
        let s_new = gen_exp();
        let staged_shards = self.shards.rotate_staged(s, &s_new)?;
        let staged_keys = self.keys.rotate_staged(s, &s_new)?;
        staged_shards.commit()?;
        staged_keys.commit()?;
        info!("time-key rotated");
        Ok(s_new)
    }

    /// Check every published block. An initialised ledger with no blocks
    /// verifies trivially.
    pub fn verify_chain(&self) -> bool {
        let total = match self.keys.len() {
            Ok(n) => n,
            Err(e) => {
                warn!(error = %e, "cannot size the key store");
                return false;
            }
        };
        self.verify_blocks(total)
    }

    /// Check the blocks before `target`, then compare `target`'s recorded
    /// plaintext digest against `pt_digest`.
    ///
    /// The target block contributes only its plaintext digest here; its own
    /// linkage, ciphertext and control fields are checked once a later block
    /// is verified past it (or by [`verify_chain`](Self::verify_chain)).
    pub fn verify_block(&self, target: u64, pt_digest: &[u8]) -> bool {
        if !self.verify_blocks(target) {
            return false;
        }
        let record = match self.chain.read(target + 1) {
            Ok(record) => record,
            Err(e) => {
                warn!(block = target + 1, error = %e, "unreadable block record");
                return false;
            }
        };
        if record.pt_hash[..] != pt_digest[..] {
            warn!(block = target + 1, "plaintext digest mismatch");
            return false;
        }
        true
    }

    /// Full structural walk over the first `total` blocks. Soft-fails: any
    /// I/O or decode problem is a `false` verdict, reported via the log.
    fn verify_blocks(&self, total: u64) -> bool {
        if total == 0 {
            return true;
        }
        let shards = match self.shards.get_all(self.settings.max_shards) {
            Ok(shards) => shards,
            Err(e) => {
                warn!(error = %e, "cannot load the shard store");
                return false;
            }
        };
        // pads longer than the control slot are compared truncated
        let tag_len = self.settings.pad_size.min(DIGEST_LEN);

        for i in 0..total {
            let record = match self.chain.read(i + 1) {
                Ok(record) => record,
                Err(e) => {
                    warn!(block = i + 1, error = %e, "unreadable block record");
                    return false;
                }
            };

            let prev = match digest_file(&self.chain.block_path(i)) {
                Ok(digest) => digest,
                Err(e) => {
                    warn!(block = i, error = %e, "unreadable previous block");
                    return false;
                }
            };
            if record.prev_hash != prev {
                warn!(block = i + 1, "chain link broken");
                return false;
            }

            let ct = match digest_file(&self.chain.ciphertext_path(i)) {
                Ok(digest) => digest,
                Err(e) => {
                    warn!(block = i + 1, error = %e, "unreadable ciphertext");
                    return false;
                }
            };
            if record.ct_hash != ct {
                warn!(block = i + 1, "ciphertext digest mismatch");
                return false;
            }

            let key = match self.keys.get(i) {
                Ok(key) => key,
                Err(e) => {
                    warn!(index = i, error = %e, "unreadable encapsulated key");
                    return false;
                }
            };
            let shard = &shards[(i % self.settings.max_shards as u64) as usize];
            let tag = pairing_pad(shard, &key, self.settings.pad_size);
            if record.control[..tag_len] != tag[..tag_len] {
                warn!(block = i + 1, "control tag mismatch");
                return false;
            }
        }
        true
    }
}

fn remove_if_present(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_settings(dir: &Path, pad_size: usize, max_shards: usize) -> Settings {
        Settings {
            pad_size,
            max_shards,
            shards_file: dir.join("shards.bin"),
            keys_file: dir.join("keys.bin"),
            root_path: format!("{}/block-", dir.display()),
            encrypt_path: format!("{}/payload-", dir.display()),
        }
    }

    #[test]
    fn init_creates_anchor_and_shard_store() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::new(test_settings(dir.path(), 64, 4));
        ledger.init().unwrap();

        assert_eq!(
            fs::metadata(ledger.chain().block_path(0)).unwrap().len(),
            0
        );
        assert_eq!(ledger.shard_store().get_all(4).unwrap().len(), 4);
        assert_eq!(ledger.key_store().len().unwrap(), 0);
    }

    #[test]
    fn empty_ledger_verifies() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::new(test_settings(dir.path(), 64, 2));
        ledger.init().unwrap();
        assert!(ledger.verify_chain());
    }

    #[test]
    fn reinit_resets_the_key_store() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::new(test_settings(dir.path(), 64, 2));
        let s = ledger.init().unwrap();

        let user = User::generate();
        let token = plsd_crypto::token_gen(user.public_key(), &s);
        let plaintext = dir.path().join("pt");
        fs::write(&plaintext, [1u8; 50]).unwrap();
        ledger.add_block(&user, &token, &plaintext).unwrap();
        assert_eq!(ledger.key_store().len().unwrap(), 1);

        ledger.init().unwrap();
        assert_eq!(ledger.key_store().len().unwrap(), 0);
    }

    #[test]
    fn rotation_with_no_blocks_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::new(test_settings(dir.path(), 64, 2));
        let s = ledger.init().unwrap();

        let s_new = ledger.rotate(&s).unwrap();
        assert_ne!(s_new, s);
        assert!(ledger.verify_chain());
    }
}
