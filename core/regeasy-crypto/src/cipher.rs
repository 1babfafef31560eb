//! Registration code sealing using AES-256-CBC with PKCS#7 padding.
//!
//! Sealed bytes travel as standard base64 with padding.

use crate::error::{CipherError, CipherResult};
use crate::key::CipherKey;
use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::Aes256;
use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::debug;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// Encrypts `plaintext` with the derived key and IV.
///
/// The output length is always a positive multiple of [`BLOCK_SIZE`].
#[must_use]
pub fn encrypt(key: &CipherKey, plaintext: &[u8]) -> Vec<u8> {
    let (k, iv) = (*key.key(), *key.iv());
    Aes256CbcEnc::new(&k.into(), &iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

/// Decrypts `ciphertext` with the derived key and IV.
///
/// Fails when the length is not a whole number of blocks or the padding does
/// not verify, which is what a wrong key almost always produces.
pub fn decrypt(key: &CipherKey, ciphertext: &[u8]) -> CipherResult<Vec<u8>> {
    let (k, iv) = (*key.key(), *key.iv());
    Aes256CbcDec::new(&k.into(), &iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| {
            debug!(len = ciphertext.len(), "padding check failed");
            CipherError::Decode
        })
}

/// Seals `plaintext` under `password` and returns the base64 text.
#[must_use]
pub fn seal(plaintext: &str, password: &str) -> String {
    seal_with_key(&CipherKey::derive(password), plaintext)
}

/// Opens base64 text produced by [`seal`].
///
/// Whitespace inside the text (line breaks from copy and paste) is ignored.
/// Every failure is reported as [`CipherError::Decode`].
pub fn open(sealed: &str, password: &str) -> CipherResult<String> {
    open_with_key(&CipherKey::derive(password), sealed)
}

pub(crate) fn seal_with_key(key: &CipherKey, plaintext: &str) -> String {
    STANDARD.encode(encrypt(key, plaintext.as_bytes()))
}

pub(crate) fn open_with_key(key: &CipherKey, sealed: &str) -> CipherResult<String> {
    let compact: String = sealed.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(compact.as_bytes()).map_err(|e| {
        debug!("invalid base64: {e}");
        CipherError::Decode
    })?;

    let plaintext = decrypt(key, &bytes)?;

    String::from_utf8(plaintext).map_err(|e| {
        debug!("invalid UTF-8 after decryption: {e}");
        CipherError::Decode
    })
}
