//! plsd-crypto: the pairing-based engine behind the plsd ledger
//!
//! Everything here is algebra over BN254 (via arkworks). The filekeeper holds
//! a secret time-key `s`; users hold a keypair `(mu, nu)` with public point
//! `P = mu * B2`.
//!
//! ```text
//! token     = (1/s) * P                       handed to the user
//! raw key   = k * token                       per-block, k fresh
//! kappa     = (nu/mu) * raw key               encapsulated, stored on ledger
//! shard_i   = s * r_i * B1                    masking shard, stored on ledger
//! pad       = H( e(shard_i, key) )            one-time pad, self-inverse
//! ```
//!
//! Rotating the time-key `s -> s'` multiplies every shard by `s'/s` and every
//! encapsulated key by `s/s'`; bilinearity of the pairing cancels the two
//! factors, so every pad (and hence every ciphertext) survives rotation.
//!
//! Shards live in G1, user keys and encapsulations in G2, and the pairing is
//! always `e(G1, G2)` in that order.

pub mod codec;
pub mod pad;
pub mod protocol;
pub mod scalar;
pub mod user;

pub use ark_bn254::{Fr, G1Affine, G2Affine};

pub use codec::{g1_from_bytes, g1_to_bytes, g2_from_bytes, g2_to_bytes};
pub use pad::{pairing_pad, trunc_xor};
pub use protocol::{block_key, frac_mul, key_update, new_shard, shard_update, token_gen};
pub use scalar::{gen_exp, Exp};
pub use user::User;

/// Width of a serialised scalar (the MODBYTES of the curve).
pub const SCALAR_BYTES: usize = 32;

/// Compressed G1 point: one masking-shard record.
pub const G1_BYTES: usize = 32;

/// Compressed G2 point: one encapsulated-key record.
pub const G2_BYTES: usize = 64;

/// Serialised GT (Fq12) element fed to the pad hash.
pub const GT_BYTES: usize = 384;

/// SHA3-512 output length; pads longer than this use SHAKE256 instead.
pub const HASH_LEN: usize = 64;
