//! Output tile loading and validation

extern crate std;

use crate::engine::rect::Region;
use crate::engine::scalar::{SampleStats, ScalarType};
use crate::engine::tile::{DataStatus, Interleave, OutputTile, TileData};
use crate::io::byte_order::ByteOrder;

fn u8_stats() -> SampleStats {
    let mut stats = SampleStats::new(None, None);
    stats.validate(ScalarType::U8);
    stats
}

#[test]
fn test_new_tile_is_blank() {
    let tile = OutputTile::new(Region::new(0, 0, 4, 4), 2, ScalarType::U8, &u8_stats());
    std::assert_eq!(tile.status(), DataStatus::Empty);
    std::assert_eq!(tile.data().len(), 32);
    std::assert!(tile.band_values(1).iter().all(|&v| v == 0.0));
    std::assert_eq!(tile.min_value(0), 1.0);
    std::assert_eq!(tile.max_value(1), 255.0);
}

#[test]
fn test_validate_status() {
    let mut tile = OutputTile::new(Region::new(0, 0, 2, 2), 1, ScalarType::U8, &u8_stats());
    std::assert_eq!(tile.validate(), DataStatus::Empty);

    let src = [7u8, 0, 0, 0];
    tile.load_tile(&src, &Region::new(0, 0, 2, 2), &Region::new(0, 0, 2, 2), 1, Interleave::Bip, ByteOrder::LittleEndian);
    std::assert_eq!(tile.validate(), DataStatus::Partial);

    let src = [1u8, 2, 3, 4];
    tile.load_tile(&src, &Region::new(0, 0, 2, 2), &Region::new(0, 0, 2, 2), 1, Interleave::Bip, ByteOrder::LittleEndian);
    std::assert_eq!(tile.validate(), DataStatus::Full);

    tile.make_blank();
    std::assert_eq!(tile.status(), DataStatus::Empty);
}

#[test]
fn test_load_tile_interleaved_by_pixel() {
    let mut tile = OutputTile::new(Region::new(10, 10, 2, 2), 2, ScalarType::U8, &u8_stats());
    // 4x4 source at (8, 8), two bands, pixel interleaved; band 0 = x, band 1 = y
    let src_rect = Region::new(8, 8, 4, 4);
    let mut src = std::vec![0u8; 32];
    for y in 0..4 {
        for x in 0..4 {
            let idx = (y * 4 + x) * 2;
            src[idx] = (8 + x) as u8;
            src[idx + 1] = (8 + y) as u8;
        }
    }

    tile.load_tile(&src, &src_rect, &tile.region(), 2, Interleave::Bip, ByteOrder::LittleEndian);
    std::assert_eq!(tile.value(0, 10, 10), Some(10.0));
    std::assert_eq!(tile.value(0, 11, 11), Some(11.0));
    std::assert_eq!(tile.value(1, 10, 11), Some(11.0));
    std::assert_eq!(tile.value(0, 12, 10), None);
    std::assert_eq!(tile.value(2, 10, 10), None);
}

#[test]
fn test_load_band_sequential_u16() {
    let stats = {
        let mut stats = SampleStats::new(None, None);
        stats.validate(ScalarType::U16);
        stats
    };
    let mut tile = OutputTile::new(Region::new(0, 0, 2, 1), 2, ScalarType::U16, &stats);

    // two bands of a 2x1 rect, big endian
    let src = [0x01, 0x00, 0x01, 0x01, 0x00, 0x02, 0x00, 0x03];
    let rect = Region::new(0, 0, 2, 1);
    tile.load_tile(&src, &rect, &rect, 2, Interleave::Bsq, ByteOrder::BigEndian);

    std::assert_eq!(tile.band_values(0), std::vec![256.0, 257.0]);
    std::assert_eq!(tile.band_values(1), std::vec![2.0, 3.0]);
    std::assert!(std::matches!(tile.data(), TileData::U16(_)));

    tile.load_band(&[0x00, 0x09, 0x00, 0x0A], &rect, &rect, 1, ByteOrder::BigEndian);
    std::assert_eq!(tile.band_values(1), std::vec![9.0, 10.0]);
    std::assert_eq!(tile.band_values(0), std::vec![256.0, 257.0]);
}

#[test]
fn test_load_tile_clips_to_request() {
    let mut tile = OutputTile::new(Region::new(0, 0, 4, 1), 1, ScalarType::U8, &u8_stats());
    let src = [9u8; 4];
    let src_rect = Region::new(0, 0, 4, 1);
    tile.load_tile(&src, &src_rect, &Region::new(1, 0, 2, 1), 1, Interleave::Bip, ByteOrder::LittleEndian);
    std::assert_eq!(tile.band_values(0), std::vec![0.0, 9.0, 9.0, 0.0]);
}

#[test]
fn test_copy_line_by_line() {
    let mut tile = OutputTile::new(Region::new(0, 5, 3, 1), 2, ScalarType::U8, &u8_stats());
    // band interleaved by line: R R R G G G
    let line = [1u8, 2, 3, 4, 5, 6];
    tile.copy_line(&line, 5, 0, 2, 2, Interleave::Bil, ByteOrder::LittleEndian);
    std::assert_eq!(tile.band_values(0), std::vec![1.0, 2.0, 3.0]);
    std::assert_eq!(tile.band_values(1), std::vec![4.0, 5.0, 6.0]);

    // lines outside the tile are ignored
    tile.copy_line(&[9u8; 6], 6, 0, 2, 2, Interleave::Bil, ByteOrder::LittleEndian);
    std::assert_eq!(tile.band_values(0), std::vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_float_null_survives_storage() {
    let mut stats = SampleStats::new(None, None);
    stats.validate(ScalarType::F32);
    let mut tile = OutputTile::new(Region::new(0, 0, 1, 1), 1, ScalarType::F32, &stats);
    std::assert_eq!(tile.validate(), DataStatus::Empty);
    std::assert_eq!(tile.value(0, 0, 0), Some(tile.null_value(0)));
}

#[test]
fn test_set_region_keeps_or_resets_samples() {
    let mut tile = OutputTile::new(Region::new(0, 0, 2, 1), 1, ScalarType::U8, &u8_stats());
    let rect = Region::new(0, 0, 2, 1);
    tile.load_tile(&[4, 5], &rect, &rect, 1, Interleave::Bip, ByteOrder::LittleEndian);

    tile.set_region(Region::new(2, 0, 2, 1));
    std::assert_eq!(tile.value(0, 2, 0), Some(4.0));

    tile.set_region(Region::new(0, 0, 3, 1));
    std::assert_eq!(tile.status(), DataStatus::Empty);
    std::assert_eq!(tile.band_values(0), std::vec![0.0, 0.0, 0.0]);
}
