//! Protocol algebra: pure functions over group elements and exponents.
//!
//! | op | formula |
//! |---|---|
//! | `token_gen(P, s)` | `(1/s) * P` |
//! | `frac_mul(x, den, num)` | `(num/den) * x` |
//! | `shard_update(e, s, s')` | `(s'/s) * e` |
//! | `key_update(k, s, s')` | `(s/s') * k` |
//! | `new_shard(s)` | `s * r * B1`, fresh `r` |
//! | `block_key(token, k)` | `k * token` |
//!
//! Every inversion is total because `Exp` is nonzero by construction.

use ark_bn254::{G1Affine, G2Affine};
use ark_ec::{AffineRepr, CurveGroup};

use crate::scalar::{gen_exp, Exp};

/// Encryption token for a user: `(1/s) * P` where `P` is their public key.
///
/// The token lets the user derive per-block keys without learning `s`.
pub fn token_gen(public_key: &G2Affine, s: &Exp) -> G2Affine {
    (public_key.into_group() * s.inverse()).into_affine()
}

/// `(num/den) * x` in the key group.
///
/// Used for encapsulating and unlocking keys and for the key half of a
/// rotation.
pub fn frac_mul(x: &G2Affine, den: &Exp, num: &Exp) -> G2Affine {
    (x.into_group() * (den.inverse() * num.as_fr())).into_affine()
}

/// Rotate one masking shard: `(s_new/s) * shard`.
pub fn shard_update(shard: &G1Affine, s: &Exp, s_new: &Exp) -> G1Affine {
    (shard.into_group() * (s.inverse() * s_new.as_fr())).into_affine()
}

/// Rotate one encapsulated key: `(s/s_new) * key`, the inverse factor of
/// [`shard_update`] so the pairing pad stays fixed.
pub fn key_update(key: &G2Affine, s: &Exp, s_new: &Exp) -> G2Affine {
    frac_mul(key, s_new, s)
}

/// Generate a fresh masking shard `s * r * B1`.
pub fn new_shard(s: &Exp) -> G1Affine {
    let r = gen_exp();
    (G1Affine::generator().into_group() * (*r.as_fr() * s.as_fr())).into_affine()
}

/// Per-block raw key: `k * token`.
pub fn block_key(token: &G2Affine, k: &Exp) -> G2Affine {
    (token.into_group() * k.as_fr()).into_affine()
}
