//! Native tile reads

use log::{trace, warn};

use crate::engine::buffer::ScratchBuffer;
use crate::engine::decode::{native_tiles, DecodeContext};
use crate::engine::raw::UnitReader;
use crate::engine::rect::Region;
use crate::engine::tile::{Interleave, OutputTile};
use crate::tiff::errors::{TiffError, TiffResult};

/// Copies the native tiles under `clip` into `tile`
///
/// Contiguous directories take one read per native tile. Separate-plane
/// directories take one read per native tile and output band, following
/// the band list.
pub fn load_from_tile(
    ctx: &DecodeContext,
    units: &mut UnitReader,
    buffer: &mut ScratchBuffer,
    clip: &Region,
    tile: &mut OutputTile,
) -> TiffResult<()> {
    let page = ctx.page;
    let order = units.byte_order();

    for tiff_tile in native_tiles(clip, page.tile_width, page.tile_length) {
        if !tiff_tile.intersects(clip) {
            continue;
        }
        let tile_clip = tiff_tile.clip_to(clip);
        let (x, y) = (tiff_tile.x as u32, tiff_tile.y as u32);
        trace!("Reading native tile {} for clip {}", tiff_tile, tile_clip);

        if page.is_separate() {
            for (dest_band, &band) in ctx.band_list.iter().enumerate() {
                let unit = UnitReader::tile_index(page, x, y, band as usize);
                let data = units.read_unit(page, unit).map_err(|e| {
                    warn!("Read error on tile {} band {}: {}", tiff_tile, band, e);
                    e
                })?;
                fill(buffer, &data)?;
                tile.load_band(buffer.as_slice(), &tiff_tile, &tile_clip, dest_band, order);
            }
        } else {
            let unit = UnitReader::tile_index(page, x, y, 0);
            let data = units.read_unit(page, unit).map_err(|e| {
                warn!("Read error on tile {}: {}", tiff_tile, e);
                e
            })?;
            fill(buffer, &data)?;
            tile.load_tile(buffer.as_slice(), &tiff_tile, &tile_clip, ctx.samples_per_pixel, Interleave::Bip, order);
        }
    }

    Ok(())
}

/// Copies a decoded unit into the scratch buffer
fn fill(buffer: &mut ScratchBuffer, data: &[u8]) -> TiffResult<()> {
    if data.len() > buffer.len() {
        return Err(TiffError::GenericError(format!(
            "Decoded tile of {} bytes does not fit the {} byte buffer", data.len(), buffer.len()
        )));
    }
    buffer.as_mut_slice()[..data.len()].copy_from_slice(data);
    Ok(())
}
