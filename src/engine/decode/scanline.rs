//! Scanline reads from strip organized directories

use log::trace;

use crate::engine::buffer::ScratchBuffer;
use crate::engine::decode::DecodeContext;
use crate::engine::raw::UnitReader;
use crate::engine::rect::Region;
use crate::engine::tile::{Interleave, OutputTile};
use crate::tiff::errors::{TiffError, TiffResult};

/// Copies the lines under `clip` into `tile`
///
/// Buffered mode reads every line of the clip into one block of
/// image-width lines and keeps it for later requests that fall inside
/// the same block. Unbuffered mode reads and copies one line at a time.
pub fn load_from_scan_line(
    ctx: &DecodeContext,
    units: &mut UnitReader,
    buffer: &mut ScratchBuffer,
    clip: &Region,
    tile: &mut OutputTile,
) -> TiffResult<()> {
    let page = ctx.page;
    let interleave = if page.is_separate() { Interleave::Bil } else { Interleave::Bip };
    let order = units.byte_order();
    let spp = ctx.samples_per_pixel;
    let sample_bytes = page.width as usize * ctx.bytes_per_sample;
    let line_bytes = sample_bytes * spp;
    let planes = page.planes();

    if clip.is_empty() {
        return Ok(());
    }
    let first_line = clip.y.max(0) as u32;
    let last_line = clip.lr_y().max(0) as u32;

    if ctx.buffered {
        if !buffer.holds(clip, ctx.level) {
            let lines = (last_line - first_line + 1) as usize;
            if lines * line_bytes > buffer.len() {
                return Err(TiffError::GenericError(format!(
                    "{} lines of {} bytes do not fit the {} byte buffer", lines, line_bytes, buffer.len()
                )));
            }
            trace!("Buffering lines {}..={} of directory {}", first_line, last_line, page.index);
            buffer.invalidate();

            let data = buffer.as_mut_slice();
            let mut offset = 0;
            for line in first_line..=last_line {
                if planes == 1 {
                    units.read_scanline(page, line, 0, &mut data[offset..offset + line_bytes])?;
                    offset += line_bytes;
                } else {
                    for plane in 0..planes {
                        units.read_scanline(page, line, plane, &mut data[offset..offset + sample_bytes])?;
                        offset += sample_bytes;
                    }
                }
            }

            let block = Region::new(0, first_line as i32, page.width, last_line - first_line + 1);
            buffer.mark(block, ctx.level);
        }

        if let Some(block) = buffer.region {
            tile.load_tile(buffer.as_slice(), &block, clip, spp, interleave, order);
        }
        return Ok(());
    }

    if line_bytes > buffer.len() {
        return Err(TiffError::GenericError(format!(
            "A {} byte line does not fit the {} byte buffer", line_bytes, buffer.len()
        )));
    }
    let stop = page.width as i32 - 1;
    for line in first_line..=last_line {
        let data = buffer.as_mut_slice();
        if planes == 1 {
            units.read_scanline(page, line, 0, &mut data[..line_bytes])?;
        } else {
            for plane in 0..planes {
                let start = plane * sample_bytes;
                units.read_scanline(page, line, plane, &mut data[start..start + sample_bytes])?;
            }
        }
        tile.copy_line(buffer.as_slice(), line as i32, 0, stop, spp, interleave, order);
    }

    Ok(())
}
