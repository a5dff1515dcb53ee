//! Reads through the packed RGBA intermediate
//!
//! The raster produced by [`crate::engine::rgba`] is bottom-up, so every
//! routine here walks raster rows in reverse while writing output rows
//! forward. Components are unpacked with shifts: byte `n` of a word is
//! red, green, blue and alpha for `n` = 0, 1, 2, 3.

use log::{trace, warn};

use crate::engine::buffer::ScratchBuffer;
use crate::engine::decode::{native_tiles, strip_range, DecodeContext};
use crate::engine::raw::UnitReader;
use crate::engine::rect::Region;
use crate::engine::rgba::{read_rgba_strip, read_rgba_tile, word};
use crate::engine::tile::OutputTile;
use crate::tiff::errors::{TiffError, TiffResult};

fn component(value: u32, n: usize) -> u8 {
    ((value >> (8 * n)) & 0xFF) as u8
}

/// Word component feeding output `band` of a strip read
///
/// Three or more bands take red, green, blue and alpha in order. Two
/// bands are gray plus alpha and a single band takes the red byte.
fn strip_component(samples_per_pixel: usize, band: usize) -> Option<usize> {
    match samples_per_pixel {
        0 => None,
        1 => if band == 0 { Some(0) } else { None },
        2 => match band {
            0 => Some(0),
            1 => Some(3),
            _ => None,
        },
        _ => if band < samples_per_pixel.min(4) { Some(band) } else { None },
    }
}

/// Copies `area` of a bottom-up raster into band `band` of `tile`
///
/// `raster_rect` is the image region the raster covers and `raster_width`
/// its row length in words.
fn unpack_rows<F>(
    tile: &mut OutputTile,
    band: usize,
    raster: &[u8],
    raster_rect: &Region,
    raster_width: usize,
    area: &Region,
    mut map: F,
) where
    F: FnMut(u32) -> u8,
{
    let region = tile.region();
    let out_width = region.width as usize;
    let plane = match tile.band_u8_mut(band) {
        Some(plane) => plane,
        None => return,
    };

    for y in area.y..=area.lr_y() {
        let raster_row = (raster_rect.lr_y() - y) as usize;
        let out_row = (y - region.y) as usize;
        for x in area.x..=area.lr_x() {
            let raster_col = (x - raster_rect.x) as usize;
            let value = word(raster, raster_row * raster_width + raster_col);
            plane[out_row * out_width + (x - region.x) as usize] = map(value);
        }
    }
}

/// Loads `clip` from tiles decoded to RGBA
///
/// Fills the red, green and blue bands. The last decoded tile stays in
/// the buffer, so neighbouring requests inside it skip the decode.
pub fn load_from_rgba_tile(
    ctx: &DecodeContext,
    units: &mut UnitReader,
    buffer: &mut ScratchBuffer,
    clip: &Region,
    tile: &mut OutputTile,
) -> TiffResult<()> {
    let page = ctx.page;
    if ctx.samples_per_pixel != 3 || ctx.bytes_per_sample != 1 {
        warn!("RGBA tile read of directory {} with {} bands of {} bytes",
              page.index, ctx.samples_per_pixel, ctx.bytes_per_sample);
    }

    for tiff_tile in native_tiles(clip, page.tile_width, page.tile_length) {
        let cached = buffer.region == Some(tiff_tile) && buffer.level == Some(ctx.level);
        if !cached {
            trace!("Decoding RGBA tile {}", tiff_tile);
            buffer.invalidate();
            read_rgba_tile(units, page, ctx.palette, tiff_tile.x as u32, tiff_tile.y as u32, buffer.as_mut_slice())
                .map_err(|e| {
                    warn!("Read error on RGBA tile {}: {}", tiff_tile, e);
                    e
                })?;
            buffer.mark(tiff_tile, ctx.level);
        }

        let tile_clip = clip.clip_to(&tiff_tile);
        if tile_clip.is_empty() {
            continue;
        }
        for band in 0..3.min(tile.band_count()) {
            unpack_rows(tile, band, buffer.as_slice(), &tiff_tile, page.tile_width as usize, &tile_clip,
                        |v| component(v, band));
        }
    }

    Ok(())
}

/// Decodes strip `strip` into the buffer unless it already holds it
fn ensure_strip(
    ctx: &DecodeContext,
    units: &mut UnitReader,
    buffer: &mut ScratchBuffer,
    strip: u32,
    cache: bool,
) -> TiffResult<Region> {
    let page = ctx.page;
    let rows = page.rows_in_strip(strip);
    let strip_rect = Region::new(0, (strip * page.rows_per_strip) as i32, page.width, rows);

    if cache && buffer.holds(&strip_rect, ctx.level) {
        return Ok(strip_rect);
    }

    trace!("Decoding RGBA strip {} of directory {}", strip, page.index);
    buffer.invalidate();
    let decoded = read_rgba_strip(units, page, ctx.palette, strip, buffer.as_mut_slice()).map_err(|e| {
        warn!("Error reading strip {} of directory {}: {}", strip, page.index, e);
        e
    })?;
    if decoded != rows {
        return Err(TiffError::ShortRead { expected: rows as usize, actual: decoded as usize });
    }
    if cache {
        buffer.mark(strip_rect, ctx.level);
    }
    Ok(strip_rect)
}

/// Loads `clip` from strips decoded to RGBA
pub fn load_from_rgba_strip(
    ctx: &DecodeContext,
    units: &mut UnitReader,
    buffer: &mut ScratchBuffer,
    clip: &Region,
    tile: &mut OutputTile,
) -> TiffResult<()> {
    let page = ctx.page;
    if ctx.samples_per_pixel > 4 || ctx.bytes_per_sample != 1 {
        warn!("RGBA strip read of directory {} with {} bands of {} bytes",
              page.index, ctx.samples_per_pixel, ctx.bytes_per_sample);
    }

    for strip in strip_range(clip, page.rows_per_strip) {
        let strip_rect = ensure_strip(ctx, units, buffer, strip, true)?;
        let area = clip.clip_to(&strip_rect);
        if area.is_empty() {
            continue;
        }

        for band in 0..tile.band_count() {
            if let Some(n) = strip_component(ctx.samples_per_pixel, band) {
                unpack_rows(tile, band, buffer.as_slice(), &strip_rect, page.width as usize, &area,
                            |v| component(v, n));
            }
        }
    }

    Ok(())
}

/// Loads `clip` from bilevel strips decoded to RGBA
///
/// A byte equal to the tile's null value is written as the minimum
/// instead, so decoded zeros never read back as null. Strips are decoded
/// fresh on every call.
pub fn load_from_rgba_strip_null_remap(
    ctx: &DecodeContext,
    units: &mut UnitReader,
    buffer: &mut ScratchBuffer,
    clip: &Region,
    tile: &mut OutputTile,
) -> TiffResult<()> {
    let page = ctx.page;
    let null = tile.null_value(0) as u8;
    let min = tile.min_value(0) as u8;

    for strip in strip_range(clip, page.rows_per_strip) {
        let strip_rect = ensure_strip(ctx, units, buffer, strip, false)?;
        let area = clip.clip_to(&strip_rect);
        if area.is_empty() {
            continue;
        }

        for band in 0..tile.band_count() {
            if let Some(n) = strip_component(ctx.samples_per_pixel, band) {
                unpack_rows(tile, band, buffer.as_slice(), &strip_rect, page.width as usize, &area, |v| {
                    let pix = component(v, n);
                    if pix != null { pix } else { min }
                });
            }
        }
    }

    Ok(())
}
