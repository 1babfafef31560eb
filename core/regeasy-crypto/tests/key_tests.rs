use regeasy_crypto::{CipherKey, IV_SIZE, IV_SUFFIX, KEY_SIZE};

#[test]
fn key_is_sha256_of_password() {
    let key = CipherKey::derive("secret");
    assert_eq!(
        hex::encode(key.key()),
        "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b"
    );
}

#[test]
fn iv_is_prefix_of_salted_hash() {
    let key = CipherKey::derive("secret");
    assert_eq!(hex::encode(key.iv()), "f84fa2149dbb62ed4e0cf1f550d2949b");
}

#[test]
fn derivation_is_deterministic() {
    let k1 = CipherKey::derive("password123");
    let k2 = CipherKey::derive("password123");
    assert_eq!(k1.key(), k2.key());
    assert_eq!(k1.iv(), k2.iv());
}

#[test]
fn different_passwords_different_keys() {
    let k1 = CipherKey::derive("password1");
    let k2 = CipherKey::derive("password2");
    assert_ne!(k1.key(), k2.key());
    assert_ne!(k1.iv(), k2.iv());
}

#[test]
fn empty_password_still_derives() {
    let key = CipherKey::derive("");
    assert_eq!(key.key().len(), KEY_SIZE);
    assert_eq!(key.iv().len(), IV_SIZE);
}

#[test]
fn iv_differs_from_key_prefix() {
    let key = CipherKey::derive("secret");
    assert_ne!(&key.key()[..IV_SIZE], key.iv());
    assert_eq!(IV_SUFFIX, "salt");
}

#[test]
fn unicode_password_uses_utf8_bytes() {
    let key = CipherKey::derive("密码");
    let again = CipherKey::derive("密码");
    assert_eq!(key.key(), again.key());
}

#[test]
fn from_parts_roundtrip() {
    let key = CipherKey::from_parts([7u8; KEY_SIZE], [9u8; IV_SIZE]);
    assert_eq!(key.key(), &[7u8; KEY_SIZE]);
    assert_eq!(key.iv(), &[9u8; IV_SIZE]);
}

#[test]
fn debug_redacts_material() {
    let key = CipherKey::derive("secret");
    let dbg = format!("{key:?}");
    assert!(dbg.contains("REDACTED"));
    assert!(!dbg.contains("2bb80d"));
}
