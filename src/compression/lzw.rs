//! Handler for LZW compressed data

use log::debug;
use weezl::{decode, encode, BitOrder};

use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;

/// TIFF flavoured LZW (compression code 5): MSB bit order with the early
/// code size switch
pub struct LzwHandler;

impl CompressionHandler for LzwHandler {
    fn decompress(&self, data: &[u8], expected_len: usize) -> TiffResult<Vec<u8>> {
        let mut decoder = decode::Decoder::with_tiff_size_switch(BitOrder::Msb, 8);
        let mut decompressed = Vec::with_capacity(expected_len);
        let result = decoder.into_vec(&mut decompressed).decode_all(data);

        // Some writers omit the end-of-information code; keep what decoded.
        if let Err(e) = result.status {
            if decompressed.is_empty() {
                return Err(TiffError::GenericError(format!("LZW decode failure: {}", e)));
            }
            debug!("LZW stream ended with {} after {} bytes", e, decompressed.len());
        }

        Ok(decompressed)
    }

    fn compress(&self, data: &[u8]) -> TiffResult<Vec<u8>> {
        let mut encoder = encode::Encoder::with_tiff_size_switch(BitOrder::Msb, 8);
        encoder
            .encode(data)
            .map_err(|e| TiffError::GenericError(format!("LZW encode failure: {}", e)))
    }

    fn name(&self) -> &'static str {
        "LZW"
    }

    fn code(&self) -> u64 {
        5
    }
}
