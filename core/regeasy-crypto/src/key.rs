//! Key and IV derivation.
//!
//! The AES key is `SHA-256(password)`. The IV is the first 16 bytes of
//! `SHA-256(password + "salt")`. Both are fixed by the format of issued codes.

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of the AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;

/// Size of the CBC initialization vector in bytes.
pub const IV_SIZE: usize = 16;

/// Literal appended to the password before hashing it into the IV.
pub const IV_SUFFIX: &str = "salt";

/// Key material derived from a registration password, zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CipherKey {
    key: [u8; KEY_SIZE],
    iv: [u8; IV_SIZE],
}

impl CipherKey {
    /// Derives the key and IV from `password`.
    #[must_use]
    pub fn derive(password: &str) -> Self {
        let key: [u8; KEY_SIZE] = Sha256::digest(password.as_bytes()).into();

        let mut salted = String::with_capacity(password.len() + IV_SUFFIX.len());
        salted.push_str(password);
        salted.push_str(IV_SUFFIX);
        let iv_digest = Sha256::digest(salted.as_bytes());
        salted.zeroize();

        let mut iv = [0u8; IV_SIZE];
        iv.copy_from_slice(&iv_digest[..IV_SIZE]);

        Self { key, iv }
    }

    /// Creates key material from raw parts.
    #[must_use]
    pub fn from_parts(key: [u8; KEY_SIZE], iv: [u8; IV_SIZE]) -> Self {
        Self { key, iv }
    }

    /// Returns the key bytes.
    #[must_use]
    pub fn key(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }

    /// Returns the IV bytes.
    #[must_use]
    pub fn iv(&self) -> &[u8; IV_SIZE] {
        &self.iv
    }
}

impl std::fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherKey")
            .field("key", &"[REDACTED]")
            .field("iv", &"[REDACTED]")
            .finish()
    }
}
