//! The pairing-derived one-time pad.
//!
//! `pairing_pad(shard, key)` pairs a G1 masking shard with a G2 key, applies
//! the final exponentiation explicitly, serialises the GT element, and hashes
//! it down to `pad_size` bytes. XORing data with the pad encrypts; XORing
//! again decrypts. The same construction also produces the per-block control
//! tag stored in the chain.

use ark_bn254::{Bn254, G1Affine, G2Affine};
use ark_ec::pairing::Pairing;
use ark_serialize::CanonicalSerialize;
use sha3::{Digest, Sha3_512, Shake256};

use crate::{GT_BYTES, HASH_LEN};

/// Derive a `pad_size`-byte pad from `e(shard, key)`.
///
/// Pads up to 64 bytes are truncated SHA3-512; anything longer squeezes
/// SHAKE256, since a fixed-width hash cannot cover it.
pub fn pairing_pad(shard: &G1Affine, key: &G2Affine, pad_size: usize) -> Vec<u8> {
    // The Miller loop alone is not well-defined across implementations; the
    // final exponentiation must be applied before hashing.
    let miller = Bn254::multi_miller_loop([*shard], [*key]);
    let Some(gt) = Bn254::final_exponentiation(miller) else {
        unreachable!("Miller loop output of curve points is invertible")
    };

    let mut gt_bytes = [0u8; GT_BYTES];
    let Ok(()) = gt.serialize_compressed(&mut gt_bytes[..]) else {
        unreachable!("GT element always fits {GT_BYTES} bytes")
    };

    if pad_size <= HASH_LEN {
        let digest = Sha3_512::digest(gt_bytes);
        digest[..pad_size].to_vec()
    } else {
        shake_pad(&gt_bytes, pad_size)
    }
}

fn shake_pad(input: &[u8], len: usize) -> Vec<u8> {
    use sha3::digest::{ExtendableOutput, Update, XofReader};
    let mut hasher = Shake256::default();
    hasher.update(input);
    let mut out = vec![0u8; len];
    hasher.finalize_xof().read(&mut out);
    out
}

/// XOR two byte slices, truncating to the shorter one. Total.
pub fn trunc_xor(a: &[u8], b: &[u8]) -> Vec<u8> {
    a.iter().zip(b).map(|(x, y)| x ^ y).collect()
}
