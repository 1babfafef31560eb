//! Sealing and opening whole text files.
//!
//! Used by the issuing tool to protect payload files at rest. The sealed file
//! holds the same base64 text a registration code would.

use crate::cipher::{open, seal};
use crate::error::{CipherError, CipherResult};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;
use tracing::info;

/// Outcome of [`seal_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealReport {
    /// Character count of the input text.
    pub original_size: usize,
    /// Character count of the sealed base64 text.
    pub sealed_size: usize,
    /// When sealing finished.
    pub completed_at: DateTime<Utc>,
}

/// Seals the UTF-8 text file at `input` and writes the base64 text to `output`.
pub fn seal_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    password: &str,
) -> CipherResult<SealReport> {
    let (input, output) = (input.as_ref(), output.as_ref());

    let text = read_text(input)?;
    let sealed = seal(&text, password);
    write_text(output, &sealed)?;

    let report = SealReport {
        original_size: text.chars().count(),
        sealed_size: sealed.len(),
        completed_at: Utc::now(),
    };
    info!(
        "sealed {} ({} chars -> {} chars)",
        input.display(),
        report.original_size,
        report.sealed_size
    );
    Ok(report)
}

/// Opens a file written by [`seal_file`] and writes the plaintext to `output`.
pub fn open_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    password: &str,
) -> CipherResult<()> {
    let (input, output) = (input.as_ref(), output.as_ref());

    let sealed = read_text(input)?;
    let text = open(sealed.trim(), password)?;
    write_text(output, &text)?;

    info!("opened {}", input.display());
    Ok(())
}

fn read_text(path: &Path) -> CipherResult<String> {
    fs::read_to_string(path).map_err(|source| CipherError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_text(path: &Path, text: &str) -> CipherResult<()> {
    fs::write(path, text).map_err(|source| CipherError::Io {
        path: path.to_path_buf(),
        source,
    })
}
