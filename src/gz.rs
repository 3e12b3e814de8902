//! Gzip container decompression.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::io::Read;

/// Decompresses a gzip-framed payload into its raw bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not a valid gzip stream.
pub fn gunzip(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(bytes);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .context("payload is not valid gzip")?;
    Ok(out)
}
