//! Whole-strip reads of 16-bit directories

use log::{trace, warn};

use crate::engine::buffer::ScratchBuffer;
use crate::engine::decode::{strip_range, DecodeContext};
use crate::engine::raw::UnitReader;
use crate::engine::rect::Region;
use crate::engine::tile::{Interleave, OutputTile};
use crate::tiff::errors::{TiffError, TiffResult};

/// Loads `clip` from 16-bit strips, one encoded strip per band
///
/// Band `b` of strip `s` is strip `s + b * strips_per_band` in the
/// directory. Every band must decode to exactly the strip's size; a short
/// strip blanks the tile and fails the request.
pub fn load_from_u16_strip(
    ctx: &DecodeContext,
    units: &mut UnitReader,
    buffer: &mut ScratchBuffer,
    clip: &Region,
    tile: &mut OutputTile,
) -> TiffResult<()> {
    let page = ctx.page;
    let order = units.byte_order();
    let strips_per_band = page.strips_per_plane() as usize;

    for strip in strip_range(clip, page.rows_per_strip) {
        let rows = page.rows_in_strip(strip);
        let strip_rect = Region::new(0, (strip * page.rows_per_strip) as i32, page.width, rows);

        if !buffer.holds(clip, ctx.level) {
            let bytes_per_strip = rows as usize * page.width as usize * ctx.bytes_per_sample;
            if bytes_per_strip * ctx.samples_per_pixel > buffer.len() {
                tile.make_blank();
                return Err(TiffError::GenericError(format!(
                    "Strip {} needs {} bytes, buffer holds {}",
                    strip, bytes_per_strip * ctx.samples_per_pixel, buffer.len()
                )));
            }
            buffer.invalidate();

            for band in 0..ctx.samples_per_pixel {
                let unit = strip as usize + band * strips_per_band;
                let offset = band * bytes_per_strip;

                let read = units.read_encoded(page, unit).and_then(|data| {
                    if data.len() != bytes_per_strip {
                        return Err(TiffError::ShortRead { expected: bytes_per_strip, actual: data.len() });
                    }
                    Ok(data)
                });
                let data = match read {
                    Ok(data) => data,
                    Err(e) => {
                        warn!("Read error on strip {} of directory {}: {}", unit, page.index, e);
                        tile.make_blank();
                        return Err(e);
                    }
                };

                buffer.as_mut_slice()[offset..offset + bytes_per_strip].copy_from_slice(data);
            }

            trace!("Buffered strip {} of directory {} ({} bands)", strip, page.index, ctx.samples_per_pixel);
            buffer.mark(strip_rect, ctx.level);
        }

        if let Some(held) = buffer.region {
            tile.load_tile(buffer.as_slice(), &held, &held, ctx.samples_per_pixel, Interleave::Bsq, order);
        }
    }

    Ok(())
}
