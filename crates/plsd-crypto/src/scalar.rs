//! Secret exponents in `[2, q-1]`, sampled from the OS CSPRNG.

use ark_bn254::Fr;
use ark_ff::{Field, One, PrimeField, Zero};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

use crate::SCALAR_BYTES;

/// A secret exponent, guaranteed nonzero (in fact `>= 2`) by construction.
///
/// Time-keys and user secrets are all `Exp`s; the bound makes every modular
/// inverse in the protocol total. Zeroized on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Exp(Fr);

impl Exp {
    /// Wrap a field element, rejecting 0 and 1.
    pub fn new(value: Fr) -> Option<Self> {
        if value.is_zero() || value.is_one() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_fr(&self) -> &Fr {
        &self.0
    }

    /// Modular inverse mod the subgroup order.
    pub fn inverse(&self) -> Fr {
        let Some(inv) = self.0.inverse() else {
            unreachable!("exponents are nonzero by construction")
        };
        inv
    }
}

impl Drop for Exp {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for Exp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Exp").field(&"[REDACTED]").finish()
    }
}

/// Sample a uniform exponent in `[2, q-1]`.
///
/// Draws `SCALAR_BYTES` bytes from the OS CSPRNG, decodes them big-endian
/// reduced mod the subgroup order, and resamples while the result is 0 or 1.
///
/// # Panics
///
/// When the OS generator itself reports an error. A failing CSPRNG cannot be
/// recovered from; every key in the system depends on it.
pub fn gen_exp() -> Exp {
    let mut entropy = [0u8; SCALAR_BYTES];
    loop {
        OsRng
            .try_fill_bytes(&mut entropy)
            .expect("OS random generator failure");
        let candidate = Fr::from_be_bytes_mod_order(&entropy);
        entropy.zeroize();
        if let Some(exp) = Exp::new(candidate) {
            return exp;
        }
    }
}
