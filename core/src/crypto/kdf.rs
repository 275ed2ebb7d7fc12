//! crypto/kdf.rs
//! Maps the caller's secret key string onto a fixed 32-byte symmetric key.
//!
//! Design:
//! - key = SHA-512/256(secret_key bytes)
//! - Deterministic and unsalted: the secret is expected to already carry
//!   full entropy. Password stretching would need its own scheme id.
//! - Every string maps to a key, the empty one included. Refusing weak
//!   secrets is left to the front end.

use sha2::{Digest, Sha512_256};
use zeroize::Zeroizing;

use crate::crypto::types::KEY_LEN_32;

/// Derive the 32-byte key for a scheme from `secret_key`.
///
/// The returned buffer is wiped on drop.
#[inline]
pub fn derive_key_32(secret_key: &str) -> Zeroizing<[u8; KEY_LEN_32]> {
    let digest = Sha512_256::digest(secret_key.as_bytes());
    let mut key = Zeroizing::new([0u8; KEY_LEN_32]);
    key.copy_from_slice(&digest[..]);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_secret_same_key() {
        let k1 = derive_key_32("secret key");
        let k2 = derive_key_32("secret key");
        assert_eq!(*k1, *k2);
    }

    #[test]
    fn different_secret_different_key() {
        let k1 = derive_key_32("secret key");
        let k2 = derive_key_32("secret kez");
        assert_ne!(*k1, *k2);
    }

    #[test]
    fn empty_secret_still_derives_a_key() {
        // SHA-512/256 of the empty string
        assert_eq!(
            hex::encode(*derive_key_32("")),
            "c672b8d1ef56ed28ab87c3622c5114069bdd3ad7b8f9737498d0c01ecef0967a"
        );
    }
}
