//! Handler for Deflate compressed data

use std::io::{Read, Write};
use flate2::read::{DeflateDecoder, ZlibDecoder};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::debug;

use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;

/// Deflate handler for both the Adobe code (8) and the legacy code (32946)
///
/// Writers are supposed to emit zlib streams, but raw deflate turns up in
/// the wild, so decoding falls back to it when the zlib header is bad.
pub struct DeflateHandler {
    code: u64,
}

impl DeflateHandler {
    /// Adobe Deflate, compression code 8
    pub fn adobe() -> Self {
        DeflateHandler { code: 8 }
    }

    /// Legacy PKZIP-style Deflate, compression code 32946
    pub fn legacy() -> Self {
        DeflateHandler { code: 32946 }
    }
}

impl CompressionHandler for DeflateHandler {
    fn decompress(&self, data: &[u8], expected_len: usize) -> TiffResult<Vec<u8>> {
        let mut decompressed = Vec::with_capacity(expected_len);
        let mut decoder = ZlibDecoder::new(data);
        if decoder.read_to_end(&mut decompressed).is_ok() {
            return Ok(decompressed);
        }

        debug!("Zlib header rejected, retrying {} bytes as raw deflate", data.len());
        decompressed.clear();
        let mut raw = DeflateDecoder::new(data);
        raw.read_to_end(&mut decompressed).map_err(TiffError::IoError)?;
        Ok(decompressed)
    }

    fn compress(&self, data: &[u8]) -> TiffResult<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data)?;
        Ok(encoder.finish()?)
    }

    fn name(&self) -> &'static str {
        if self.code == 8 { "Adobe Deflate" } else { "Deflate" }
    }

    fn code(&self) -> u64 {
        self.code
    }
}
