//! Codec and predictor tests

extern crate std;

use std::io::Write;

use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::compression::predictor::{undo_predictor, PredictorLayout};
use crate::compression::{CompressionFactory, CompressionHandler, DeflateHandler, LzwHandler, PackBitsHandler};
use crate::io::byte_order::ByteOrder;
use crate::tiff::errors::TiffError;

#[test]
fn test_packbits_reference_vector() {
    let encoded = [
        0xFE, 0xAA, 0x02, 0x80, 0x00, 0x2A, 0xFD, 0xAA, 0x03, 0x80, 0x00, 0x2A, 0x22, 0xF7, 0xAA,
    ];
    let expected = [
        0xAA, 0xAA, 0xAA, 0x80, 0x00, 0x2A, 0xAA, 0xAA, 0xAA, 0xAA, 0x80, 0x00, 0x2A, 0x22,
        0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA,
    ];

    let decoded = PackBitsHandler.decompress(&encoded, expected.len()).unwrap();
    std::assert_eq!(decoded, expected.to_vec());
}

#[test]
fn test_packbits_encoder_output_decodes() {
    let mut data = vec![7u8; 300];
    data.extend((0..50).map(|v| v as u8));
    data.extend(vec![9u8; 3]);

    let encoded = PackBitsHandler.compress(&data).unwrap();
    std::assert!(encoded.len() < data.len());
    std::assert_eq!(PackBitsHandler.decompress(&encoded, data.len()).unwrap(), data);
}

#[test]
fn test_packbits_ignores_noop_header() {
    let decoded = PackBitsHandler.decompress(&[0x80, 0x00, 0x05], 1).unwrap();
    std::assert_eq!(decoded, vec![5]);
}

#[test]
fn test_deflate_accepts_zlib_and_raw_streams() {
    let data: Vec<u8> = (0..1000u32).map(|v| (v % 13) as u8).collect();
    let handler = DeflateHandler::adobe();

    let zlib = handler.compress(&data).unwrap();
    std::assert_eq!(handler.decompress(&zlib, data.len()).unwrap(), data);

    let mut raw = DeflateEncoder::new(Vec::new(), Compression::default());
    raw.write_all(&data).unwrap();
    let raw = raw.finish().unwrap();
    std::assert_eq!(DeflateHandler::legacy().decompress(&raw, data.len()).unwrap(), data);
}

#[test]
fn test_lzw_decodes_tiff_stream() {
    let data: Vec<u8> = b"TOBEORNOTTOBEORTOBEORNOT#".iter().cycle().take(2048).copied().collect();
    let encoded = LzwHandler.compress(&data).unwrap();
    std::assert_eq!(LzwHandler.decompress(&encoded, data.len()).unwrap(), data);
}

#[test]
fn test_factory_codes() {
    for code in [1u64, 5, 8, 14, 32773, 32946] {
        let handler = CompressionFactory::create_handler(code).unwrap();
        std::assert_eq!(handler.code(), code);
    }

    match CompressionFactory::create_handler(7) {
        Err(TiffError::UnsupportedCompression(7)) => {}
        other => panic!("expected unsupported JPEG, got {:?}", other.map(|h| h.name())),
    }
    std::assert!(!CompressionFactory::is_supported(6));
}

#[test]
fn test_zstd_through_factory() {
    let data = vec![42u8; 4096];
    let handler = CompressionFactory::create_handler(14).unwrap();
    let encoded = handler.compress(&data).unwrap();
    std::assert_eq!(handler.decompress(&encoded, data.len()).unwrap(), data);
}

#[test]
fn test_horizontal_predictor_u8_interleaved() {
    // Two pixels of RGB per row, two rows.
    let mut data = vec![10, 20, 30, 1, 2, 3, 5, 5, 5, 250, 10, 0];
    let layout = PredictorLayout {
        width: 2,
        rows: 2,
        samples: 3,
        bits_per_sample: 8,
        byte_order: ByteOrder::LittleEndian,
    };

    undo_predictor(&mut data, 2, layout).unwrap();
    std::assert_eq!(data, vec![10, 20, 30, 11, 22, 33, 5, 5, 5, 255, 15, 5]);
}

#[test]
fn test_horizontal_predictor_u16_big_endian() {
    let mut data = vec![0x01, 0x00, 0x00, 0x02, 0xFF, 0xFF];
    let layout = PredictorLayout {
        width: 3,
        rows: 1,
        samples: 1,
        bits_per_sample: 16,
        byte_order: ByteOrder::BigEndian,
    };

    undo_predictor(&mut data, 2, layout).unwrap();
    // 256, 258, 257 (wrapping)
    std::assert_eq!(data, vec![0x01, 0x00, 0x01, 0x02, 0x01, 0x01]);
}

#[test]
fn test_predictor_rejects_unknown_scheme() {
    let layout = PredictorLayout {
        width: 1,
        rows: 1,
        samples: 1,
        bits_per_sample: 32,
        byte_order: ByteOrder::LittleEndian,
    };
    std::assert!(undo_predictor(&mut [0u8; 4], 3, layout).is_err());
    std::assert!(undo_predictor(&mut [0u8; 4], 1, layout).is_ok());
}
