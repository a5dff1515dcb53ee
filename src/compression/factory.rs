//! Factory for creating compression handlers

use crate::tiff::errors::{TiffError, TiffResult};
use super::deflate::DeflateHandler;
use super::handler::CompressionHandler;
use super::lzw::LzwHandler;
use super::packbits::PackBitsHandler;
use super::uncompressed::UncompressedHandler;
use super::zstd::ZstdHandler;

/// Factory for creating compression handlers
pub struct CompressionFactory;

impl CompressionFactory {
    /// Create a compression handler for the given compression code
    pub fn create_handler(compression: u64) -> TiffResult<Box<dyn CompressionHandler>> {
        match compression {
            1 => Ok(Box::new(UncompressedHandler)),
            5 => Ok(Box::new(LzwHandler)),
            8 => Ok(Box::new(DeflateHandler::adobe())),
            14 => Ok(Box::new(ZstdHandler::new())),
            32773 => Ok(Box::new(PackBitsHandler)),
            32946 => Ok(Box::new(DeflateHandler::legacy())),
            _ => Err(TiffError::UnsupportedCompression(compression)),
        }
    }

    /// Whether `compression` can be decoded
    pub fn is_supported(compression: u64) -> bool {
        Self::create_handler(compression).is_ok()
    }
}
