//! TIFF tag utilities
//!
//! Name lookups for logging plus decoding of raw tag payloads into
//! integer, floating point and ASCII values.

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::{compression, field_types, photometric, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::field_type_size;

/// Decodes a raw tag payload into unsigned integers
///
/// Signed types are sign-extended and reinterpreted, rationals are packed
/// numerator-high. Floating point types are rejected; use
/// [`decode_f64_values`] for those.
pub fn decode_u64_values(bytes: &[u8], field_type: u16, count: usize, byte_order: ByteOrder) -> TiffResult<Vec<u64>> {
    let size = field_type_size(field_type);
    let mut values = Vec::with_capacity(count);

    for chunk in bytes.chunks_exact(size).take(count) {
        let value = match field_type {
            field_types::BYTE | field_types::UNDEFINED => chunk[0] as u64,
            field_types::SBYTE => chunk[0] as i8 as i64 as u64,
            field_types::SHORT => byte_order.decode_u16(chunk) as u64,
            field_types::SSHORT => byte_order.decode_i16(chunk) as i64 as u64,
            field_types::LONG => byte_order.decode_u32(chunk) as u64,
            field_types::SLONG => byte_order.decode_i32(chunk) as i64 as u64,
            field_types::RATIONAL | field_types::SRATIONAL => {
                let num = byte_order.decode_u32(&chunk[0..4]) as u64;
                let den = byte_order.decode_u32(&chunk[4..8]) as u64;
                (num << 32) | den
            }
            field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => byte_order.decode_u64(chunk),
            _ => return Err(TiffError::UnsupportedFieldType(field_type)),
        };
        values.push(value);
    }

    Ok(values)
}

/// Decodes a raw tag payload of any numeric type into `f64`
pub fn decode_f64_values(bytes: &[u8], field_type: u16, count: usize, byte_order: ByteOrder) -> TiffResult<Vec<f64>> {
    let size = field_type_size(field_type);
    let mut values = Vec::with_capacity(count);

    for chunk in bytes.chunks_exact(size).take(count) {
        let value = match field_type {
            field_types::BYTE | field_types::UNDEFINED => chunk[0] as f64,
            field_types::SBYTE => chunk[0] as i8 as f64,
            field_types::SHORT => byte_order.decode_u16(chunk) as f64,
            field_types::SSHORT => byte_order.decode_i16(chunk) as f64,
            field_types::LONG => byte_order.decode_u32(chunk) as f64,
            field_types::SLONG => byte_order.decode_i32(chunk) as f64,
            field_types::FLOAT => byte_order.decode_f32(chunk) as f64,
            field_types::DOUBLE => byte_order.decode_f64(chunk),
            field_types::RATIONAL => {
                let num = byte_order.decode_u32(&chunk[0..4]) as f64;
                let den = byte_order.decode_u32(&chunk[4..8]) as f64;
                if den == 0.0 { f64::NAN } else { num / den }
            }
            field_types::SRATIONAL => {
                let num = byte_order.decode_i32(&chunk[0..4]) as f64;
                let den = byte_order.decode_i32(&chunk[4..8]) as f64;
                if den == 0.0 { f64::NAN } else { num / den }
            }
            field_types::LONG8 | field_types::IFD8 => byte_order.decode_u64(chunk) as f64,
            field_types::SLONG8 => byte_order.decode_u64(chunk) as i64 as f64,
            _ => return Err(TiffError::UnsupportedFieldType(field_type)),
        };
        values.push(value);
    }

    Ok(values)
}

/// Get the name of a TIFF tag
pub fn get_tag_name(tag: u16) -> &'static str {
    match tag {
        tags::NEW_SUBFILE_TYPE => "NewSubfileType",
        tags::IMAGE_WIDTH => "ImageWidth",
        tags::IMAGE_LENGTH => "ImageLength",
        tags::BITS_PER_SAMPLE => "BitsPerSample",
        tags::COMPRESSION => "Compression",
        tags::PHOTOMETRIC_INTERPRETATION => "PhotometricInterpretation",
        tags::STRIP_OFFSETS => "StripOffsets",
        tags::SAMPLES_PER_PIXEL => "SamplesPerPixel",
        tags::ROWS_PER_STRIP => "RowsPerStrip",
        tags::STRIP_BYTE_COUNTS => "StripByteCounts",
        tags::MIN_SAMPLE_VALUE => "MinSampleValue",
        tags::MAX_SAMPLE_VALUE => "MaxSampleValue",
        tags::PLANAR_CONFIGURATION => "PlanarConfiguration",
        tags::PREDICTOR => "Predictor",
        tags::COLOR_MAP => "ColorMap",
        tags::TILE_WIDTH => "TileWidth",
        tags::TILE_LENGTH => "TileLength",
        tags::TILE_OFFSETS => "TileOffsets",
        tags::TILE_BYTE_COUNTS => "TileByteCounts",
        tags::EXTRA_SAMPLES => "ExtraSamples",
        tags::SAMPLE_FORMAT => "SampleFormat",
        tags::YCBCR_SUBSAMPLING => "YCbCrSubSampling",
        tags::GEO_KEY_DIRECTORY_TAG => "GeoKeyDirectory",
        tags::GEO_DOUBLE_PARAMS_TAG => "GeoDoubleParams",
        tags::GEO_ASCII_PARAMS_TAG => "GeoAsciiParams",
        tags::GDAL_NODATA => "GDALNoData",
        _ => "Unknown",
    }
}

/// Get the name of a TIFF field type
pub fn get_field_type_name(field_type: u16) -> &'static str {
    match field_type {
        field_types::BYTE => "BYTE",
        field_types::ASCII => "ASCII",
        field_types::SHORT => "SHORT",
        field_types::LONG => "LONG",
        field_types::RATIONAL => "RATIONAL",
        field_types::SBYTE => "SBYTE",
        field_types::UNDEFINED => "UNDEFINED",
        field_types::SSHORT => "SSHORT",
        field_types::SLONG => "SLONG",
        field_types::SRATIONAL => "SRATIONAL",
        field_types::FLOAT => "FLOAT",
        field_types::DOUBLE => "DOUBLE",
        field_types::LONG8 => "LONG8",
        field_types::SLONG8 => "SLONG8",
        field_types::IFD8 => "IFD8",
        _ => "Unknown",
    }
}

/// Get the name of a compression method
pub fn get_compression_name(compression_code: u64) -> &'static str {
    match compression_code as u16 {
        compression::NONE => "None",
        compression::LZW => "LZW",
        compression::JPEG_OLD => "Old JPEG",
        compression::JPEG => "JPEG",
        compression::ADOBE_DEFLATE => "Adobe Deflate",
        compression::DEFLATE => "Deflate",
        compression::ZSTD => "Zstandard",
        compression::PACKBITS => "PackBits",
        _ => "Unknown",
    }
}

/// Get the name of a photometric interpretation
pub fn get_photometric_name(photometric_code: u64) -> &'static str {
    match photometric_code as u16 {
        photometric::WHITE_IS_ZERO => "WhiteIsZero",
        photometric::BLACK_IS_ZERO => "BlackIsZero",
        photometric::RGB => "RGB",
        photometric::PALETTE => "Palette",
        photometric::TRANSPARENCY_MASK => "TransparencyMask",
        photometric::YCBCR => "YCbCr",
        _ => "Unknown",
    }
}
