//! End to end tile reads through the public API

extern crate std;

mod common;

use std::sync::Arc;

use common::*;
use rastertile::tiff::constants::{compression, sample_format};
use rastertile::{
    DataStatus, EngineOptions, HandlerState, MemoryStreamOpener, RasterTile, Region, ScalarType, TiffError,
    TiffTileSource,
};

fn ramp(n: usize) -> std::vec::Vec<f64> {
    (1..=n).map(|v| v as f64).collect()
}

#[test]
fn test_full_tile_from_scanlines() {
    let mut source = open(&[gray_8x8()]);

    std::assert!(source.is_open());
    std::assert_eq!(source.read_method_name(0), "READ_SCAN_LINE");
    std::assert_eq!(source.scalar_type(), ScalarType::U8);
    std::assert_eq!(source.number_of_input_bands(), 1);
    std::assert_eq!(source.number_of_output_bands(), 1);
    std::assert_eq!((source.tile_width(), source.tile_height()), (64, 64));
    std::assert_eq!(source.image_tile_width(), 0);

    let tile = source.get_tile(Region::new(0, 0, 8, 8), 0);
    std::assert_eq!(tile.status(), DataStatus::Full);
    std::assert_eq!(tile.band_values(0), ramp(64));
}

#[test]
fn test_partial_coverage() {
    let mut source = open(&[gray_8x8()]);

    let tile = source.get_tile(Region::new(4, 4, 8, 8), 0);
    std::assert_eq!(tile.status(), DataStatus::Partial);
    std::assert_eq!(tile.value(0, 4, 4), Some(37.0));
    std::assert_eq!(tile.value(0, 7, 7), Some(64.0));
    std::assert_eq!(tile.value(0, 8, 8), Some(0.0));
    std::assert_eq!(tile.value(0, 11, 4), Some(0.0));

    let tile = source.get_tile(Region::new(-4, -4, 8, 8), 0);
    std::assert_eq!(tile.status(), DataStatus::Partial);
    std::assert_eq!(tile.value(0, 0, 0), Some(1.0));
    std::assert_eq!(tile.value(0, -1, -1), Some(0.0));
}

#[test]
fn test_requests_outside_the_image_are_blank() {
    let mut source = open(&[gray_8x8()]);

    std::assert_eq!(source.get_tile(Region::new(100, 100, 8, 8), 0).status(), DataStatus::Empty);
    std::assert_eq!(source.get_tile(Region::new(-20, -20, 8, 8), 0).status(), DataStatus::Empty);
}

#[test]
fn test_repeated_requests_are_identical() {
    let mut source = open(&[gray_8x8()]);
    let rect = Region::new(2, 3, 5, 4);

    let first = source.get_tile(rect, 0).clone();
    source.get_tile(Region::new(0, 0, 8, 8), 0);
    let second = source.get_tile(rect, 0).clone();
    std::assert_eq!(first, second);
}

#[test]
fn test_unbuffered_scanlines_match_buffered() {
    let rect = Region::new(2, 1, 5, 6);
    let mut buffered = open(&[gray_8x8()]);

    let options = EngineOptions { buffer_scan_line_reads: false, ..EngineOptions::default() };
    let mut unbuffered = open_with(&[gray_8x8()], options);

    let expected = buffered.get_tile(rect, 0).band_values(0);
    std::assert_eq!(unbuffered.get_tile(rect, 0).band_values(0), expected);
    std::assert_eq!(expected[0], 11.0);
}

#[test]
fn test_invalid_levels_give_blank_tiles() {
    let mut source = open(&[gray_8x8()]);

    std::assert_eq!(source.number_of_levels(), 1);
    std::assert!(!source.is_valid_level(1));
    std::assert_eq!(source.number_of_lines(1), 0);
    std::assert_eq!(source.image_rect(1), Region::new(0, 0, 0, 0));
    std::assert_eq!(source.get_tile(Region::new(0, 0, 8, 8), 1).status(), DataStatus::Empty);
}

#[test]
fn test_closed_source() {
    let mut source = TiffTileSource::new(Arc::new(MemoryStreamOpener::new()));
    std::assert!(!source.is_open());

    let mut tile = source.get_tile(Region::new(0, 0, 4, 4), 0).clone();
    std::assert_eq!(tile.status(), DataStatus::Empty);

    let err = source.fill_tile(&mut tile, 0).unwrap_err();
    std::assert!(std::matches!(err, TiffError::NotOpen));
}

#[test]
fn test_open_failures_leave_the_source_closed() {
    let opener = MemoryStreamOpener::new();
    opener.insert("junk.tif", std::vec![0u8; 16]);
    let mut source = TiffTileSource::new(Arc::new(opener));

    let err = source.open("missing.tif").unwrap_err();
    std::assert!(std::matches!(err, TiffError::StreamOpen(_, _)));
    std::assert!(!source.is_open());

    std::assert!(source.open("junk.tif").is_err());
    std::assert!(!source.is_open());
    std::assert!(source.open("").is_err());
    std::assert_eq!(source.number_of_directories(), 0);
}

#[test]
fn test_disabled_source() {
    let mut source = open(&[gray_8x8()]);
    source.set_enabled(false);
    std::assert!(!source.is_enabled());

    let mut tile = source.get_tile(Region::new(0, 0, 8, 8), 0).clone();
    std::assert_eq!(tile.status(), DataStatus::Empty);
    std::assert!(source.fill_tile(&mut tile, 0).is_ok());

    source.set_enabled(true);
    std::assert_eq!(source.get_tile(Region::new(0, 0, 8, 8), 0).status(), DataStatus::Full);
}

fn level_one() -> Page {
    let image = image_u8(4, 4, 1, |x, _, _| (200 + x) as u8);
    Page::strips(4, 4, 8, 1, 4, split_strips(&image, 4, 4)).reduced()
}

#[test]
fn test_reduced_resolution_levels() {
    let mut source = open(&[gray_8x8(), level_one()]);

    std::assert_eq!(source.number_of_levels(), 2);
    std::assert!(source.has_r0());
    std::assert_eq!(source.number_of_samples(1), 4);
    std::assert_eq!(source.number_of_lines(1), 4);

    let tile = source.get_tile(Region::new(0, 0, 4, 4), 1);
    std::assert_eq!(tile.status(), DataStatus::Full);
    std::assert_eq!(tile.value(0, 3, 2), Some(203.0));

    std::assert_eq!(source.get_tile(Region::new(0, 0, 8, 8), 1).status(), DataStatus::Partial);
    std::assert_eq!(source.get_tile(Region::new(0, 0, 8, 8), 0).value(0, 7, 7), Some(64.0));

    source.set_starting_res_level(1);
    std::assert_eq!(source.number_of_levels(), 1);
    std::assert!(source.is_valid_level(1));
    std::assert_eq!(source.number_of_samples(1), 4);
}

#[test]
fn test_thumbnail_is_not_a_level() {
    let image = image_u8(3, 3, 1, |_, _, _| 9);
    let thumbnail = Page::strips(3, 3, 8, 1, 3, split_strips(&image, 3, 3)).reduced();
    let source = open(&[gray_8x8(), thumbnail]);

    std::assert_eq!(source.number_of_levels(), 1);
    std::assert_eq!(source.page_index().levels, std::vec![0]);
}

#[test]
fn test_masks_are_indexed_separately() {
    let mask = gray_8x8().subfile(4);
    let source = open(&[gray_8x8(), level_one(), mask]);

    std::assert_eq!(source.page_index().levels, std::vec![0, 1]);
    std::assert_eq!(source.page_index().masks, std::vec![2]);
    std::assert_eq!(source.number_of_directories(), 3);
}

#[test]
fn test_short_strip_blanks_the_tile_and_recovers() {
    let mut bytes = build_tiff(&[gray_8x8()], false);
    let len = bytes.len();
    bytes.truncate(len - 10);
    let mut source = RasterTile::open_bytes("short.tif", bytes, EngineOptions::default()).unwrap();

    let mut tile = source.get_tile(Region::new(0, 0, 8, 8), 0).clone();
    std::assert_eq!(tile.status(), DataStatus::Empty);

    let err = source.fill_tile(&mut tile, 0).unwrap_err();
    std::assert!(std::matches!(err, TiffError::ShortRead { .. }));
    std::assert_eq!(tile.status(), DataStatus::Empty);

    let tile = source.get_tile(Region::new(0, 0, 8, 4), 0);
    std::assert_eq!(tile.status(), DataStatus::Full);
    std::assert_eq!(tile.band_values(0), ramp(32));
}

fn u16_page(big_endian: bool) -> Page {
    let values: std::vec::Vec<u16> = (1000..1016).collect();
    let image = u16_bytes(&values, big_endian);
    Page::strips(4, 4, 16, 1, 2, split_strips(&image, 8, 2))
}

#[test]
fn test_whole_strip_reads_of_16_bit_data() {
    for big_endian in [false, true] {
        let bytes = build_tiff(&[u16_page(big_endian)], big_endian);
        let mut source = RasterTile::open_bytes("u16.tif", bytes, EngineOptions::default()).unwrap();

        std::assert_eq!(source.read_method_name(0), "READ_U16_STRIP");
        std::assert_eq!(source.scalar_type(), ScalarType::U16);

        let tile = source.get_tile(Region::new(0, 0, 4, 4), 0);
        std::assert_eq!(tile.status(), DataStatus::Full);
        let expected: std::vec::Vec<f64> = (1000..1016).map(|v| v as f64).collect();
        std::assert_eq!(tile.band_values(0), expected);
        std::assert_eq!(tile.value(0, 3, 3), Some(1015.0));
    }
}

#[test]
fn test_short_16_bit_strip() {
    let mut bytes = build_tiff(&[u16_page(false)], false);
    let len = bytes.len();
    bytes.truncate(len - 4);
    let mut source = RasterTile::open_bytes("u16.tif", bytes, EngineOptions::default()).unwrap();

    let mut tile = source.get_tile(Region::new(0, 0, 4, 4), 0).clone();
    std::assert_eq!(tile.status(), DataStatus::Empty);
    std::assert!(source.fill_tile(&mut tile, 0).is_err());

    // the first strip is intact
    std::assert_eq!(source.get_tile(Region::new(0, 0, 4, 2), 0).status(), DataStatus::Full);
}

#[test]
fn test_max_sample_value_narrows_16_bit_type() {
    let source = open(&[u16_page(false).max_sample(2047)]);

    std::assert_eq!(source.scalar_type(), ScalarType::U11);
    std::assert_eq!(source.max_pixel_value(), 2047.0);
    std::assert_eq!(source.min_pixel_value(), 1.0);
    std::assert_eq!(source.null_pixel_value(), 0.0);
}

fn float_page() -> Page {
    let image = f32_bytes(&[1.5, -9999.0, 2.5, 3.5]);
    Page::strips(2, 2, 32, 1, 2, std::vec![image])
        .sample_format(sample_format::IEEEFP)
        .citation("Null: -32767, Non-Null Min: 10.5, Non-Null Avg: 20, Non-Null Max: 30.25")
}

#[test]
fn test_float_statistics_from_tags() {
    let mut source = open(&[float_page().nodata("-9999")]);

    std::assert_eq!(source.scalar_type(), ScalarType::F32);
    std::assert_eq!(source.null_pixel_value(), -9999.0);
    std::assert_eq!(source.min_pixel_value(), 10.5);
    std::assert_eq!(source.max_pixel_value(), 30.25);

    let tile = source.get_tile(Region::new(0, 0, 2, 2), 0);
    std::assert_eq!(tile.status(), DataStatus::Partial);
    std::assert_eq!(tile.value(0, 0, 0), Some(1.5));
    std::assert_eq!(tile.value(0, 1, 0), Some(-9999.0));

    let citation_only = open(&[float_page()]);
    std::assert_eq!(citation_only.null_pixel_value(), -32767.0);
}

fn separate_tiled() -> Page {
    let mut units = std::vec::Vec::new();
    for band in 0..3u32 {
        let plane = image_u8(8, 8, 1, |x, y, _| (band * 64 + y * 8 + x + 1) as u8);
        units.extend(split_tiles(&plane, 8, 8, 1, 4, 4));
    }
    Page::tiles(8, 8, 8, 3, (4, 4), units).planar()
}

#[test]
fn test_band_selection_on_separate_tiles() {
    let mut source = open(&[separate_tiled()]);

    std::assert_eq!(source.read_method_name(0), "READ_TILE");
    std::assert!(source.is_band_selector());
    std::assert_eq!((source.tile_width(), source.tile_height()), (4, 4));
    std::assert_eq!(source.output_band_list(), std::vec![0, 1, 2]);

    std::assert!(!source.set_output_band_list(&[3]));
    std::assert!(!source.set_output_band_list(&[]));
    std::assert!(source.set_output_band_list(&[2, 0]));
    std::assert_eq!(source.number_of_output_bands(), 2);
    std::assert_eq!(source.output_band_list(), std::vec![2, 0]);

    let tile = source.get_tile(Region::new(0, 0, 8, 8), 0);
    std::assert_eq!(tile.band_count(), 2);
    std::assert_eq!(tile.status(), DataStatus::Full);
    let band2: std::vec::Vec<f64> = (1..=64).map(|v| (v + 128) as f64).collect();
    std::assert_eq!(tile.band_values(0), band2);
    std::assert_eq!(tile.band_values(1), ramp(64));

    std::assert_eq!(source.save_options().bands, Some(std::vec![2, 0]));
}

#[test]
fn test_band_list_ignored_for_strips() {
    let mut source = open(&[gray_8x8()]);
    std::assert!(!source.is_band_selector());
    std::assert!(!source.set_output_band_list(&[0]));
    std::assert_eq!(source.save_options().bands, None);
}

#[test]
fn test_contiguous_tiles_with_edge_padding() {
    let image = image_u8(6, 6, 1, |x, y, _| (y * 6 + x + 1) as u8);
    let page = Page::tiles(6, 6, 8, 1, (4, 4), split_tiles(&image, 6, 6, 1, 4, 4));
    let mut source = open(&[page]);

    std::assert_eq!(source.image_tile_width(), 4);
    std::assert!(!source.is_band_selector());

    let tile = source.get_tile(Region::new(0, 0, 8, 8), 0);
    std::assert_eq!(tile.status(), DataStatus::Partial);
    std::assert_eq!(tile.value(0, 3, 4), Some(28.0));
    std::assert_eq!(tile.value(0, 5, 5), Some(36.0));
    std::assert_eq!(tile.value(0, 6, 6), Some(0.0));
}

fn palette_strips() -> Page {
    let image = image_u8(4, 4, 1, |x, y, _| (y * 4 + x + 1) as u8);
    Page::strips(4, 4, 8, 1, 4, split_strips(&image, 4, 4)).color_map(ramp_color_map())
}

#[test]
fn test_palette_expansion_and_toggle() {
    let mut source = open(&[palette_strips()]);

    std::assert!(source.is_color_mapped());
    std::assert!(source.apply_color_palette());
    std::assert_eq!(source.read_method_name(0), "READ_RGBA_U8_STRIP");
    std::assert_eq!(source.number_of_output_bands(), 3);
    std::assert_eq!(source.lut().map(|lut| lut.len()), Some(256));

    let tile = source.get_tile(Region::new(0, 0, 4, 4), 0);
    std::assert_eq!(tile.status(), DataStatus::Full);
    std::assert_eq!(tile.band_values(0), ramp(16));
    let green: std::vec::Vec<f64> = (1..=16).map(|v| (255 - v) as f64).collect();
    std::assert_eq!(tile.band_values(1), green);
    std::assert_eq!(tile.band_values(2), std::vec![128.0; 16]);

    source.set_apply_color_palette(false);
    std::assert_eq!(source.number_of_output_bands(), 1);
    std::assert_eq!(source.read_method_name(0), "READ_SCAN_LINE");
    std::assert_eq!(source.property("apply_color_palette_flag"), Some("false".to_string()));
    std::assert_eq!(source.get_tile(Region::new(0, 0, 4, 4), 0).band_values(0), ramp(16));

    std::assert!(source.set_property("apply_color_palette_flag", "on"));
    std::assert!(!source.set_property("apply_color_palette_flag", "maybe"));
    std::assert_eq!(source.number_of_output_bands(), 3);
    std::assert_eq!(source.get_tile(Region::new(0, 0, 4, 4), 0).band_count(), 3);
}

#[test]
fn test_palette_off_at_open() {
    let options = EngineOptions { apply_color_palette_flag: false, ..EngineOptions::default() };
    let source = open_with(&[palette_strips()], options);

    std::assert_eq!(source.number_of_input_bands(), 1);
    std::assert_eq!(source.property("file_type"), Some("TIFF".to_string()));
}

#[test]
fn test_palette_tiles_through_rgba() {
    let image = image_u8(8, 8, 1, |x, y, _| (y * 8 + x + 1) as u8);
    let page = Page::tiles(8, 8, 8, 1, (4, 4), split_tiles(&image, 8, 8, 1, 4, 4)).color_map(ramp_color_map());
    let mut source = open(&[page]);

    std::assert_eq!(source.read_method_name(0), "READ_RGBA_U8_TILE");

    let tile = source.get_tile(Region::new(2, 2, 4, 4), 0);
    std::assert_eq!(tile.status(), DataStatus::Full);
    std::assert_eq!(tile.value(0, 2, 2), Some(19.0));
    std::assert_eq!(tile.value(0, 5, 2), Some(22.0));
    std::assert_eq!(tile.value(1, 5, 5), Some(209.0));
    std::assert_eq!(tile.value(2, 3, 3), Some(128.0));
}

#[test]
fn test_bilevel_strips_remap_zero() {
    let page = Page::strips(8, 2, 1, 1, 2, std::vec![std::vec![0b1010_1010, 0b1111_0000]]);
    let mut source = open(&[page]);

    std::assert_eq!(source.read_method_name(0), "READ_RGBA_U8A_STRIP");
    std::assert_eq!(source.scalar_type(), ScalarType::U8);

    let tile = source.get_tile(Region::new(0, 0, 8, 2), 0);
    std::assert_eq!(tile.status(), DataStatus::Full);
    std::assert_eq!(
        tile.band_values(0),
        std::vec![
            255.0, 1.0, 255.0, 1.0, 255.0, 1.0, 255.0, 1.0,
            255.0, 255.0, 255.0, 255.0, 1.0, 1.0, 1.0, 1.0,
        ]
    );
}

#[test]
fn test_unreadable_layout_gives_blank_tiles() {
    let page = Page::strips(4, 4, 32, 1, 2, split_strips(&[7u8; 64], 16, 2)).compressed(compression::LZW);
    let mut source = open(&[page]);

    std::assert_eq!(source.scalar_type(), ScalarType::U32);
    std::assert_eq!(source.read_method_name(0), "UNKNOWN");

    let mut tile = source.get_tile(Region::new(0, 0, 4, 4), 0).clone();
    std::assert_eq!(tile.status(), DataStatus::Empty);
    let err = source.fill_tile(&mut tile, 0).unwrap_err();
    std::assert!(std::matches!(err, TiffError::UnsupportedReadMethod(0)));
}

#[test]
fn test_handler_state_round_trip() {
    let opener = MemoryStreamOpener::new();
    opener.insert("pyramid.tif", build_tiff(&[gray_8x8(), level_one()], false));

    let mut parsed = TiffTileSource::new(Arc::new(opener.clone()));
    parsed.open("pyramid.tif").unwrap();
    let state = parsed.state().unwrap().clone();
    std::assert_eq!(state.connection, "pyramid.tif");
    std::assert_eq!(state.number_of_directories(), 2);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.toml");
    state.save(&path).unwrap();
    let loaded = HandlerState::load(&path).unwrap();
    std::assert_eq!(loaded, state);

    let mut restored = TiffTileSource::new(Arc::new(opener));
    restored.open_with_state("pyramid.tif", loaded).unwrap();
    for level in 0..2 {
        let rect = Region::new(0, 0, 8, 8);
        let expected = parsed.get_tile(rect, level).clone();
        std::assert_eq!(restored.get_tile(rect, level), &expected);
    }
}

#[test]
fn test_engine_options_round_trip() {
    std::assert_eq!(EngineOptions::from_toml_str("").unwrap(), EngineOptions::default());

    let options = EngineOptions {
        apply_color_palette_flag: false,
        bands: Some(std::vec![1, 0]),
        starting_res_level: 2,
        buffer_scan_line_reads: false,
        enabled: true,
    };
    std::assert!(options.to_toml_string().unwrap().contains("apply_color_palette_flag = false"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("options.toml");
    options.save(&path).unwrap();
    std::assert_eq!(EngineOptions::load(&path).unwrap(), options);

    std::assert!(EngineOptions::from_toml_str("enabled = \"sometimes\"").is_err());
}

#[test]
fn test_load_options_reopens() {
    let opener = MemoryStreamOpener::new();
    opener.insert("palette.tif", build_tiff(&[palette_strips()], false));
    let mut source = TiffTileSource::new(Arc::new(opener));

    source.open("palette.tif").unwrap();
    std::assert_eq!(source.number_of_output_bands(), 3);

    let options = EngineOptions { apply_color_palette_flag: false, ..EngineOptions::default() };
    source.load_options(options, "palette.tif").unwrap();
    std::assert_eq!(source.number_of_output_bands(), 1);
    std::assert_eq!(source.connection(), Some("palette.tif"));

    source.close();
    std::assert!(!source.is_open());
    std::assert!(source.state().is_none());
}

#[test]
fn test_three_bit_scanlines() {
    let page = Page::strips(8, 1, 3, 1, 1, std::vec![std::vec![0b0000_0101, 0b0011_1001, 0b0111_0111]]);
    let mut source = open(&[page]);

    std::assert_eq!(source.read_method_name(0), "READ_SCAN_LINE");
    std::assert_eq!(source.scalar_type(), ScalarType::U8);

    let tile = source.get_tile(Region::new(0, 0, 8, 1), 0);
    std::assert_eq!(tile.band_values(0), std::vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    std::assert_eq!(tile.status(), DataStatus::Partial);
}

#[test]
fn test_scanline_nulls_are_not_remapped() {
    let image = image_u8(8, 8, 1, |x, y, _| if x < 2 && y < 2 { 0 } else { 100 });
    let mut source = open(&[Page::strips(8, 8, 8, 1, 4, split_strips(&image, 8, 4))]);

    std::assert_eq!(source.read_method_name(0), "READ_SCAN_LINE");
    std::assert_eq!(source.min_pixel_value(), 1.0);
    std::assert_eq!(source.null_pixel_value(), 0.0);

    let tile = source.get_tile(Region::new(0, 0, 8, 8), 0);
    std::assert_eq!(tile.status(), DataStatus::Partial);
    let values = tile.band_values(0);
    std::assert_eq!(&values[..8], &[0.0, 0.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0]);
    std::assert_eq!(&values[8..10], &[0.0, 0.0]);
    std::assert!(values[16..].iter().all(|&v| v == 100.0));
}

#[test]
fn test_bilevel_gray_alpha_bands() {
    // (gray, alpha) bit pairs, eight pixels
    let page = Page::strips(8, 1, 1, 2, 1, std::vec![std::vec![0b1011_1011, 0b0010_0010]]);
    let mut source = open(&[page]);

    std::assert_eq!(source.read_method_name(0), "READ_RGBA_U8A_STRIP");
    std::assert_eq!(source.number_of_output_bands(), 2);

    let tile = source.get_tile(Region::new(0, 0, 8, 1), 0);
    std::assert_eq!(
        tile.band_values(0),
        std::vec![255.0, 255.0, 255.0, 255.0, 1.0, 255.0, 1.0, 255.0]
    );
    std::assert_eq!(
        tile.band_values(1),
        std::vec![1.0, 255.0, 1.0, 255.0, 1.0, 1.0, 1.0, 1.0]
    );
}

#[test]
fn test_allocation_failure_blanks_only_that_request() {
    let huge_tiles = Page::tiles(4, 4, 8, 1, (0xF000_0000, 0xF000_0000), std::vec![std::vec![0u8; 16]]).reduced();
    let mut source = open(&[gray_8x8(), huge_tiles]);
    std::assert_eq!(source.number_of_levels(), 2);
    std::assert_eq!(source.read_method_name(1), "READ_TILE");

    let mut tile = source.get_tile(Region::new(0, 0, 4, 4), 1).clone();
    std::assert_eq!(tile.status(), DataStatus::Empty);
    let err = source.fill_tile(&mut tile, 1).unwrap_err();
    std::assert!(std::matches!(err, TiffError::AllocationFailure(_)));

    let tile = source.get_tile(Region::new(0, 0, 8, 8), 0);
    std::assert_eq!(tile.status(), DataStatus::Full);
    std::assert_eq!(tile.band_values(0), ramp(64));
}
