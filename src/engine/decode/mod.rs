//! Decode routines
//!
//! One routine per read method. Each fills the part of an output tile
//! covered by a clip rectangle, using the engine's scratch buffer and
//! unit reader. The source picks the routine with a plain `match` on the
//! directory's [`ReadMethod`](crate::engine::strategy::ReadMethod).

pub mod tiled;
pub mod scanline;
pub mod rgba;
pub mod u16_strip;

use crate::engine::palette::Palette;
use crate::engine::rect::{adjust_to_start_of_tile, Region};
use crate::tiff::directory::DirectoryState;

/// What a decode routine needs to know about the active directory
pub struct DecodeContext<'a> {
    pub page: &'a DirectoryState,
    /// Resolution level the directory serves
    pub level: u32,
    /// Input bands after color map and complex sample handling
    pub samples_per_pixel: usize,
    pub bytes_per_sample: usize,
    /// Output band order, only honored by separate-plane tiles
    pub band_list: &'a [u32],
    pub palette: Option<&'a Palette>,
    /// Whether scanline reads buffer a whole block of lines
    pub buffered: bool,
}

/// Native tile rectangles covering `clip`, row by row
///
/// The grid starts at the tile boundary at or above and left of the
/// clip's upper left corner.
pub fn native_tiles(clip: &Region, tile_width: u32, tile_length: u32) -> Vec<Region> {
    if clip.is_empty() || tile_width == 0 || tile_length == 0 {
        return Vec::new();
    }

    let origin_x = adjust_to_start_of_tile(clip.x, tile_width);
    let origin_y = adjust_to_start_of_tile(clip.y, tile_length);

    let span_x = (clip.lr_x() as i64 - origin_x as i64 + 1) as u64;
    let span_y = (clip.lr_y() as i64 - origin_y as i64 + 1) as u64;
    let across = (span_x + tile_width as u64 - 1) / tile_width as u64;
    let down = (span_y + tile_length as u64 - 1) / tile_length as u64;

    let mut tiles = Vec::with_capacity((across * down) as usize);
    for v in 0..down {
        for u in 0..across {
            let x = origin_x as i64 + (u * tile_width as u64) as i64;
            let y = origin_y as i64 + (v * tile_length as u64) as i64;
            tiles.push(Region::new(x as i32, y as i32, tile_width, tile_length));
        }
    }
    tiles
}

/// Strip numbers holding lines `clip.y..=clip.lr_y()`
pub fn strip_range(clip: &Region, rows_per_strip: u32) -> std::ops::RangeInclusive<u32> {
    let rows = rows_per_strip.max(1);
    let first = clip.y.max(0) as u32 / rows;
    let last = clip.lr_y().max(0) as u32 / rows;
    first..=last
}
