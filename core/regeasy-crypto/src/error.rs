//! Error types for the cipher codec.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for cipher operations.
pub type CipherResult<T> = Result<T, CipherError>;

/// Errors that can occur while sealing or opening registration text.
#[derive(Debug, Error)]
pub enum CipherError {
    /// Opening failed: malformed base64, wrong password or truncated data.
    ///
    /// The causes are deliberately not distinguished; a wrong password looks
    /// exactly like corruption.
    #[error("cipher failure")]
    Decode,

    /// Reading or writing a sealed file failed.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
