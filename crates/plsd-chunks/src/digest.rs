//! SHA3-512 content digests for blocks, ciphertexts and plaintexts.

use std::path::Path;

use sha3::{Digest, Sha3_512};

use plsd_core::PlsdResult;

/// SHA3-512 digest length in bytes.
pub const DIGEST_LEN: usize = 64;

/// Digest a byte slice in memory.
pub fn digest_bytes(data: &[u8]) -> [u8; DIGEST_LEN] {
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&Sha3_512::digest(data));
    out
}

/// Digest a whole file from disk.
pub fn digest_file(path: &Path) -> PlsdResult<[u8; DIGEST_LEN]> {
    let data = std::fs::read(path)?;
    Ok(digest_bytes(&data))
}
