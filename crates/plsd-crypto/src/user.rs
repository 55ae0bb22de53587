//! A ledger user: two secret exponents and a published key-group point.

use ark_bn254::G2Affine;
use ark_ec::{AffineRepr, CurveGroup};

use crate::protocol::frac_mul;
use crate::scalar::{gen_exp, Exp};

/// User keypair `(mu, nu, P = mu * B2)`.
///
/// The secrets never leave this struct and are zeroized when it drops (each
/// [`Exp`] zeroizes itself). Only `P` is shared with the filekeeper.
pub struct User {
    public_key: G2Affine,
    mu: Exp,
    nu: Exp,
}

impl User {
    /// Sample a fresh keypair from the OS CSPRNG.
    pub fn generate() -> Self {
        let mu = gen_exp();
        let nu = gen_exp();
        let public_key = (G2Affine::generator().into_group() * mu.as_fr()).into_affine();
        Self {
            public_key,
            mu,
            nu,
        }
    }

    pub fn public_key(&self) -> &G2Affine {
        &self.public_key
    }

    /// Wrap a per-block key for storage on the ledger: `(nu/mu) * key`.
    pub fn encapsulate(&self, key: &G2Affine) -> G2Affine {
        frac_mul(key, &self.mu, &self.nu)
    }

    /// Undo [`encapsulate`](Self::encapsulate): `(mu/nu) * wrapped`.
    pub fn unlock(&self, wrapped: &G2Affine) -> G2Affine {
        frac_mul(wrapped, &self.nu, &self.mu)
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("public_key", &self.public_key)
            .field("mu", &"[REDACTED]")
            .field("nu", &"[REDACTED]")
            .finish()
    }
}
