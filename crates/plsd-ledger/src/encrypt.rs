//! One-time-pad file encryption over the chunk pipeline.
//!
//! Chunk `i` of the input is XORed with the pad derived from masking shard
//! `i` and the block key. The pad is self-inverse, so running the same
//! function over a ciphertext decrypts it.

use std::path::Path;

use plsd_chunks::pipeline;
use plsd_core::PlsdResult;
use plsd_crypto::{pairing_pad, trunc_xor, G1Affine, G2Affine};

/// Encrypt (or decrypt) `input` into `output` under `key`, one shard per
/// `pad_size`-byte chunk.
///
/// Fails with `FileTooLarge` when the input needs more chunks than there are
/// shards, before anything is written. The ciphertext has exactly the length
/// of the input.
pub fn encrypt_file(
    input: &Path,
    output: &Path,
    shards: &[G1Affine],
    key: &G2Affine,
    pad_size: usize,
) -> PlsdResult<()> {
    pipeline::process_file(
        input,
        output,
        |index, chunk| Ok(trunc_xor(chunk, &pairing_pad(&shards[index], key, pad_size))),
        shards.len(),
        pad_size,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use plsd_core::PlsdError;
    use plsd_crypto::{block_key, gen_exp, new_shard, token_gen, User};

    fn setup(max_shards: usize) -> (Vec<G1Affine>, G2Affine) {
        let s = gen_exp();
        let shards: Vec<G1Affine> = (0..max_shards).map(|_| new_shard(&s)).collect();
        let user = User::generate();
        let token = token_gen(user.public_key(), &s);
        let key = block_key(&token, &gen_exp());
        (shards, key)
    }

    #[test]
    fn encrypt_then_encrypt_restores_plaintext() {
        let dir = tempfile::tempdir().unwrap();
        let plaintext = dir.path().join("pt");
        let ciphertext = dir.path().join("ct");
        let recovered = dir.path().join("rec");

        let data = vec![0xABu8; 200];
        std::fs::write(&plaintext, &data).unwrap();

        let (shards, key) = setup(4);
        encrypt_file(&plaintext, &ciphertext, &shards, &key, 64).unwrap();

        let ct = std::fs::read(&ciphertext).unwrap();
        assert_eq!(ct.len(), 200, "ciphertext length equals plaintext length");
        assert_ne!(ct, data);

        encrypt_file(&ciphertext, &recovered, &shards, &key, 64).unwrap();
        assert_eq!(std::fs::read(&recovered).unwrap(), data);
    }

    #[test]
    fn oversize_input_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let plaintext = dir.path().join("pt");
        std::fs::write(&plaintext, vec![1u8; 2 * 16 + 1]).unwrap();

        let (shards, key) = setup(2);
        let err = encrypt_file(&plaintext, &dir.path().join("ct"), &shards, &key, 16).unwrap_err();
        assert!(matches!(err, PlsdError::FileTooLarge { .. }));
    }

    #[test]
    fn wrong_key_garbles_the_output() {
        let dir = tempfile::tempdir().unwrap();
        let plaintext = dir.path().join("pt");
        let ciphertext = dir.path().join("ct");
        let recovered = dir.path().join("rec");

        let data = vec![0x55u8; 100];
        std::fs::write(&plaintext, &data).unwrap();

        let (shards, key) = setup(2);
        let (_, wrong_key) = setup(2);

        encrypt_file(&plaintext, &ciphertext, &shards, &key, 64).unwrap();
        encrypt_file(&ciphertext, &recovered, &shards, &wrong_key, 64).unwrap();
        assert_ne!(std::fs::read(&recovered).unwrap(), data);
    }
}
