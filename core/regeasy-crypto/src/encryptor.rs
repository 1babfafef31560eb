//! Text cipher interface used by the payload codec.
//!
//! The verifying side depends on `&dyn TextCipher` and never sees key
//! material. `PasswordCipher` is the production implementation;
//! `PassthroughCipher` lets tests feed plaintext payloads straight in.

use crate::cipher::{open_with_key, seal_with_key};
use crate::error::CipherResult;
use crate::key::CipherKey;

/// Trait for sealing and opening registration text.
pub trait TextCipher: Send + Sync {
    /// Seals `plaintext` into transport text.
    fn seal(&self, plaintext: &str) -> String;

    /// Opens transport text produced by `seal`.
    fn open(&self, sealed: &str) -> CipherResult<String>;
}

/// AES-256-CBC cipher keyed from a registration password.
///
/// Derives the key once, so repeated opens do not rehash the password.
#[derive(Debug, Clone)]
pub struct PasswordCipher {
    key: CipherKey,
}

impl PasswordCipher {
    /// Creates a cipher for `password`.
    #[must_use]
    pub fn new(password: &str) -> Self {
        Self {
            key: CipherKey::derive(password),
        }
    }
}

impl TextCipher for PasswordCipher {
    fn seal(&self, plaintext: &str) -> String {
        seal_with_key(&self.key, plaintext)
    }

    fn open(&self, sealed: &str) -> CipherResult<String> {
        open_with_key(&self.key, sealed)
    }
}

/// No-op cipher for tests. Text passes through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughCipher;

impl TextCipher for PassthroughCipher {
    fn seal(&self, plaintext: &str) -> String {
        plaintext.to_string()
    }

    fn open(&self, sealed: &str) -> CipherResult<String> {
        Ok(sealed.to_string())
    }
}
