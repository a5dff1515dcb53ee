//! Error types for container parsing and tile decoding

use std::fmt;
use std::io;

/// TIFF-specific error types
#[derive(Debug)]
pub enum TiffError {
    /// I/O error
    IoError(io::Error),
    /// The connection could not be opened
    StreamOpen(String, io::Error),
    /// Invalid TIFF header
    InvalidHeader,
    /// Invalid byte order marker
    InvalidByteOrder(u16),
    /// Invalid BigTIFF header
    InvalidBigTIFFHeader,
    /// Unsupported TIFF version
    UnsupportedVersion(u16),
    /// The container holds no directories
    NoDirectories,
    /// Tag not found
    TagNotFound(u16),
    /// Unsupported field type
    UnsupportedFieldType(u16),
    /// Unsupported compression method
    UnsupportedCompression(u64),
    /// No directory carries usable image dimensions
    MissingDimensions,
    /// Bits per sample and sample format do not map to a scalar type
    UnsupportedScalarType { bits: u16, sample_format: u16 },
    /// The directory cannot be read with any of the decode strategies
    UnsupportedReadMethod(usize),
    /// A strip or tile was shorter than its layout requires
    ShortRead { expected: usize, actual: usize },
    /// The scratch buffer could not be sized
    AllocationFailure(usize),
    /// Operation requires an open container
    NotOpen,
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for TiffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TiffError::IoError(e) => write!(f, "I/O error: {}", e),
            TiffError::StreamOpen(connection, e) => write!(f, "Cannot open {}: {}", connection, e),
            TiffError::InvalidHeader => write!(f, "Invalid TIFF header"),
            TiffError::InvalidByteOrder(v) => write!(f, "Invalid byte order marker: {:#06x}", v),
            TiffError::InvalidBigTIFFHeader => write!(f, "Invalid BigTIFF header"),
            TiffError::UnsupportedVersion(v) => write!(f, "Unsupported TIFF version: {}", v),
            TiffError::NoDirectories => write!(f, "Container has no image directories"),
            TiffError::TagNotFound(tag) => write!(f, "Tag not found: {}", tag),
            TiffError::UnsupportedFieldType(ft) => write!(f, "Unsupported field type: {}", ft),
            TiffError::UnsupportedCompression(c) => write!(f, "Unsupported compression method: {}", c),
            TiffError::MissingDimensions => write!(f, "Image dimensions not found"),
            TiffError::UnsupportedScalarType { bits, sample_format } => write!(
                f,
                "Unsupported sample layout: {} bits per sample, sample format {}",
                bits, sample_format
            ),
            TiffError::UnsupportedReadMethod(dir) => {
                write!(f, "No read method for directory {}", dir)
            }
            TiffError::ShortRead { expected, actual } => {
                write!(f, "Short read: expected {} bytes, got {}", expected, actual)
            }
            TiffError::AllocationFailure(size) => {
                write!(f, "Cannot allocate {} byte decode buffer", size)
            }
            TiffError::NotOpen => write!(f, "No container is open"),
            TiffError::GenericError(msg) => write!(f, "TIFF error: {}", msg),
        }
    }
}

impl std::error::Error for TiffError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TiffError::IoError(e) | TiffError::StreamOpen(_, e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TiffError {
    fn from(error: io::Error) -> Self {
        TiffError::IoError(error)
    }
}

impl From<String> for TiffError {
    fn from(msg: String) -> Self {
        TiffError::GenericError(msg)
    }
}

/// Result type for TIFF operations
pub type TiffResult<T> = Result<T, TiffError>;
