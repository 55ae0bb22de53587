//! Compressed point encoding, the only wire/disk format of the scheme.
//!
//! Both stores hold raw concatenations of canonically compressed points:
//! 32 bytes per G1 shard, 64 bytes per G2 key. Decoding validates that the
//! point is on the curve and in the prime-order subgroup.

use ark_bn254::{G1Affine, G2Affine};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

use plsd_core::{PlsdError, PlsdResult};

use crate::{G1_BYTES, G2_BYTES};

pub fn g1_to_bytes(point: &G1Affine) -> [u8; G1_BYTES] {
    let mut buf = [0u8; G1_BYTES];
    let Ok(()) = point.serialize_compressed(&mut buf[..]) else {
        unreachable!("compressed G1 always fits {G1_BYTES} bytes")
    };
    buf
}

pub fn g1_from_bytes(bytes: &[u8]) -> PlsdResult<G1Affine> {
    G1Affine::deserialize_compressed(bytes)
        .map_err(|e| PlsdError::Decode(format!("G1 point: {e}")))
}

pub fn g2_to_bytes(point: &G2Affine) -> [u8; G2_BYTES] {
    let mut buf = [0u8; G2_BYTES];
    let Ok(()) = point.serialize_compressed(&mut buf[..]) else {
        unreachable!("compressed G2 always fits {G2_BYTES} bytes")
    };
    buf
}

pub fn g2_from_bytes(bytes: &[u8]) -> PlsdResult<G2Affine> {
    G2Affine::deserialize_compressed(bytes)
        .map_err(|e| PlsdError::Decode(format!("G2 point: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ec::{AffineRepr, CurveGroup};

    #[test]
    fn test_g1_roundtrip() {
        let point = (G1Affine::generator().into_group() * ark_bn254::Fr::from(7u64)).into_affine();
        let bytes = g1_to_bytes(&point);
        assert_eq!(g1_from_bytes(&bytes).unwrap(), point);
    }

    #[test]
    fn test_g2_roundtrip() {
        let point = (G2Affine::generator().into_group() * ark_bn254::Fr::from(11u64)).into_affine();
        let bytes = g2_to_bytes(&point);
        assert_eq!(g2_from_bytes(&bytes).unwrap(), point);
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(g1_from_bytes(&[0xFFu8; G1_BYTES]).is_err());
        assert!(g2_from_bytes(&[0xFFu8; G2_BYTES]).is_err());
    }

    #[test]
    fn test_short_input_rejected() {
        assert!(g1_from_bytes(&[0u8; 5]).is_err());
    }
}
