//! Cipher codec for RegEasy registration codes.
//!
//! This crate handles:
//! - Key and IV derivation from the registration password (SHA-256)
//! - AES-256-CBC sealing and opening of payload text (PKCS#7 padding)
//! - Base64 transport encoding of the sealed bytes
//! - Sealing and opening whole text files for the issuing tool
//!
//! # Compatibility
//!
//! Key and IV depend on the password alone. Sealing the same plaintext twice
//! with the same password produces the same code. Every code already in the
//! field was produced this way, so the derivation is fixed.

mod cipher;
mod encryptor;
mod error;
mod file;
mod key;

pub use cipher::{decrypt, encrypt, open, seal, BLOCK_SIZE};
pub use encryptor::{PassthroughCipher, PasswordCipher, TextCipher};
pub use error::{CipherError, CipherResult};
pub use file::{open_file, seal_file, SealReport};
pub use key::{CipherKey, IV_SIZE, IV_SUFFIX, KEY_SIZE};
