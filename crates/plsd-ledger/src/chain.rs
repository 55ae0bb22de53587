//! Block records and their on-disk naming.
//!
//! Block `i` lives at the path `<root_path><hex(i)>` (lowercase, no padding;
//! block 10 is `...a`). Block 0 is an empty anchor file; every other block
//! is exactly 256 bytes:
//!
//! ```text
//! [64: prev_hash][64: ct_hash][64: pt_hash][64: control, zero-padded]
//! ```
//!
//! Only the first `pad_size` bytes of the control slot carry the pairing tag
//! (capped at the slot width when pads are longer than 64 bytes).

use std::fs;
use std::path::PathBuf;

use plsd_chunks::DIGEST_LEN;
use plsd_core::{PlsdError, PlsdResult};

/// Fixed block record width: four digest-sized fields.
pub const BLOCK_LEN: usize = 4 * DIGEST_LEN;

/// One parsed block record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRecord {
    /// Digest of the previous block file
    pub prev_hash: [u8; DIGEST_LEN],
    /// Digest of this block's ciphertext file
    pub ct_hash: [u8; DIGEST_LEN],
    /// Digest of this block's plaintext
    pub pt_hash: [u8; DIGEST_LEN],
    /// Pairing control tag, left-aligned and zero-padded
    pub control: [u8; DIGEST_LEN],
}

impl BlockRecord {
    /// Assemble a record, left-aligning the control tag into its slot.
    pub fn new(
        prev_hash: [u8; DIGEST_LEN],
        ct_hash: [u8; DIGEST_LEN],
        pt_hash: [u8; DIGEST_LEN],
        control_tag: &[u8],
    ) -> Self {
        let mut control = [0u8; DIGEST_LEN];
        let n = control_tag.len().min(DIGEST_LEN);
        control[..n].copy_from_slice(&control_tag[..n]);
        Self {
            prev_hash,
            ct_hash,
            pt_hash,
            control,
        }
    }

    pub fn to_bytes(&self) -> [u8; BLOCK_LEN] {
        let mut bytes = [0u8; BLOCK_LEN];
        bytes[..64].copy_from_slice(&self.prev_hash);
        bytes[64..128].copy_from_slice(&self.ct_hash);
        bytes[128..192].copy_from_slice(&self.pt_hash);
        bytes[192..].copy_from_slice(&self.control);
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != BLOCK_LEN {
            return None;
        }
        let field = |range: std::ops::Range<usize>| -> [u8; DIGEST_LEN] {
            let mut out = [0u8; DIGEST_LEN];
            out.copy_from_slice(&bytes[range]);
            out
        };
        Some(Self {
            prev_hash: field(0..64),
            ct_hash: field(64..128),
            pt_hash: field(128..192),
            control: field(192..256),
        })
    }
}

/// Path naming and record I/O for the chain.
#[derive(Debug, Clone)]
pub struct BlockChain {
    root_prefix: String,
    encrypt_prefix: String,
}

impl BlockChain {
    pub fn new(root_prefix: String, encrypt_prefix: String) -> Self {
        Self {
            root_prefix,
            encrypt_prefix,
        }
    }

    /// `<root_path><hex(index)>`
    pub fn block_path(&self, index: u64) -> PathBuf {
        PathBuf::from(format!("{}{:x}", self.root_prefix, index))
    }

    /// `<encrypt_path><hex(index)>.enc`
    pub fn ciphertext_path(&self, index: u64) -> PathBuf {
        PathBuf::from(format!("{}{:x}.enc", self.encrypt_prefix, index))
    }

    /// Create the empty block-0 anchor, truncating any previous one.
    pub fn create_anchor(&self) -> PlsdResult<()> {
        fs::File::create(self.block_path(0))?;
        Ok(())
    }

    pub fn append(&self, index: u64, record: &BlockRecord) -> PlsdResult<()> {
        fs::write(self.block_path(index), record.to_bytes())?;
        Ok(())
    }

    pub fn read(&self, index: u64) -> PlsdResult<BlockRecord> {
        let bytes = fs::read(self.block_path(index))?;
        BlockRecord::from_bytes(&bytes).ok_or_else(|| {
            PlsdError::Decode(format!(
                "block {index} is {} bytes, expected {BLOCK_LEN}",
                bytes.len()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_roundtrip() {
        let record = BlockRecord::new([1u8; 64], [2u8; 64], [3u8; 64], &[4u8; 32]);
        let bytes = record.to_bytes();
        assert_eq!(bytes.len(), BLOCK_LEN);
        assert_eq!(BlockRecord::from_bytes(&bytes).unwrap(), record);
    }

    #[test]
    fn test_control_tag_is_zero_padded() {
        let record = BlockRecord::new([0u8; 64], [0u8; 64], [0u8; 64], &[0xAA; 16]);
        assert_eq!(&record.control[..16], &[0xAA; 16]);
        assert_eq!(&record.control[16..], &[0u8; 48]);
    }

    #[test]
    fn test_oversized_control_tag_is_truncated() {
        let record = BlockRecord::new([0u8; 64], [0u8; 64], [0u8; 64], &[0xBB; 100]);
        assert_eq!(record.control, [0xBB; 64]);
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(BlockRecord::from_bytes(&[0u8; BLOCK_LEN - 1]).is_none());
        assert!(BlockRecord::from_bytes(&[0u8; BLOCK_LEN + 1]).is_none());
        assert!(BlockRecord::from_bytes(&[]).is_none());
    }

    #[test]
    fn test_hex_paths_are_lowercase_and_unpadded() {
        let chain = BlockChain::new("test/block-".into(), "test/payload-".into());
        assert_eq!(chain.block_path(0), PathBuf::from("test/block-0"));
        assert_eq!(chain.block_path(10), PathBuf::from("test/block-a"));
        assert_eq!(chain.block_path(255), PathBuf::from("test/block-ff"));
        assert_eq!(
            chain.ciphertext_path(10),
            PathBuf::from("test/payload-a.enc")
        );
    }

    #[test]
    fn test_anchor_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let chain = BlockChain::new(
            format!("{}/block-", dir.path().display()),
            format!("{}/payload-", dir.path().display()),
        );
        chain.create_anchor().unwrap();
        assert_eq!(fs::metadata(chain.block_path(0)).unwrap().len(), 0);
    }

    #[test]
    fn test_append_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let chain = BlockChain::new(format!("{}/b", dir.path().display()), String::new());
        let record = BlockRecord::new([9u8; 64], [8u8; 64], [7u8; 64], &[6u8; 64]);

        chain.append(1, &record).unwrap();
        assert_eq!(chain.read(1).unwrap(), record);
    }
}
