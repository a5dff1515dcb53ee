//! Packed RGBA conversion
//!
//! Strips and tiles read through this module come back as 32-bit words,
//! red in the low byte then green, blue and alpha, stored little endian.
//! Rows are bottom-up: the first row of the raster is the last row of the
//! strip or tile. Partial edge tiles keep their full-tile layout, with
//! the part outside the image zeroed.

use crate::engine::palette::Palette;
use crate::engine::raw::UnitReader;
use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::photometric;
use crate::tiff::directory::DirectoryState;
use crate::tiff::errors::{TiffError, TiffResult};

/// Red component of a packed word
pub fn unpack_r(v: u32) -> u8 {
    (v & 0xFF) as u8
}

pub fn unpack_g(v: u32) -> u8 {
    ((v >> 8) & 0xFF) as u8
}

pub fn unpack_b(v: u32) -> u8 {
    ((v >> 16) & 0xFF) as u8
}

pub fn unpack_a(v: u32) -> u8 {
    (v >> 24) as u8
}

pub fn pack(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (r as u32) | ((g as u32) << 8) | ((b as u32) << 16) | ((a as u32) << 24)
}

/// Word `index` of a raster
pub fn word(raster: &[u8], index: usize) -> u32 {
    let at = index * 4;
    match raster.get(at..at + 4) {
        Some(bytes) => ByteOrder::LittleEndian.decode_u32(bytes),
        None => 0,
    }
}

enum ColorModel<'a> {
    Gray { invert: bool },
    Rgb,
    Palette(&'a Palette),
    /// Color mapped data with the palette switched off
    Index,
    YCbCr,
}

struct Converter<'a> {
    model: ColorModel<'a>,
    bits: u16,
    samples: usize,
    byte_order: ByteOrder,
}

impl<'a> Converter<'a> {
    fn new(page: &DirectoryState, palette: Option<&'a Palette>, byte_order: ByteOrder) -> TiffResult<Self> {
        if !matches!(page.bits_per_sample, 1 | 2 | 4 | 8 | 16) {
            return Err(TiffError::GenericError(format!(
                "Cannot convert {}-bit samples to RGBA", page.bits_per_sample
            )));
        }

        let model = if page.has_color_map() {
            match palette {
                Some(palette) => ColorModel::Palette(palette),
                None => ColorModel::Index,
            }
        } else {
            match page.photometric {
                photometric::WHITE_IS_ZERO => ColorModel::Gray { invert: true },
                photometric::BLACK_IS_ZERO => ColorModel::Gray { invert: false },
                photometric::RGB if page.samples_per_pixel >= 3 => ColorModel::Rgb,
                photometric::YCBCR if page.samples_per_pixel >= 3 => {
                    if page.ycbcr_subsampling != [1, 1] {
                        return Err(TiffError::GenericError(format!(
                            "YCbCr subsampling {:?} is not supported", page.ycbcr_subsampling
                        )));
                    }
                    ColorModel::YCbCr
                }
                other => {
                    return Err(TiffError::GenericError(format!(
                        "Cannot convert photometric {} with {} samples to RGBA", other, page.samples_per_pixel
                    )))
                }
            }
        };

        Ok(Converter {
            model,
            bits: page.bits_per_sample,
            samples: page.samples_per_pixel as usize,
            byte_order,
        })
    }

    fn to8(&self, v: u16) -> u8 {
        match self.bits {
            1 => if v != 0 { 255 } else { 0 },
            2 => (v * 85) as u8,
            4 => (v * 17) as u8,
            16 => (v >> 8) as u8,
            _ => v as u8,
        }
    }

    /// Sample `s` of pixel `pixel` from per-plane unit data
    fn sample(&self, planes: &[Vec<u8>], separate: bool, pixel: usize, s: usize) -> u16 {
        let (plane, index) = if separate { (s, pixel) } else { (0, pixel * self.samples + s) };
        let data = match planes.get(plane) {
            Some(data) => data,
            None => return 0,
        };

        if self.bits == 16 {
            data.get(index * 2..index * 2 + 2)
                .map(|bytes| self.byte_order.decode_u16(bytes))
                .unwrap_or(0)
        } else {
            data.get(index).copied().unwrap_or(0) as u16
        }
    }

    fn pixel(&self, planes: &[Vec<u8>], separate: bool, pixel: usize) -> u32 {
        let s = |i: usize| self.sample(planes, separate, pixel, i);

        match &self.model {
            ColorModel::Gray { invert } => {
                let mut g = self.to8(s(0));
                if *invert {
                    g = 255 - g;
                }
                let a = if self.samples >= 2 { self.to8(s(1)) } else { 255 };
                pack(g, g, g, a)
            }
            ColorModel::Rgb => {
                let a = if self.samples >= 4 { self.to8(s(3)) } else { 255 };
                pack(self.to8(s(0)), self.to8(s(1)), self.to8(s(2)), a)
            }
            ColorModel::Palette(palette) => {
                let [r, g, b] = palette.rgb(s(0) as usize);
                pack(r, g, b, 255)
            }
            ColorModel::Index => {
                let v = s(0).min(255) as u8;
                pack(v, v, v, 255)
            }
            ColorModel::YCbCr => {
                let y = self.to8(s(0)) as f64;
                let cb = self.to8(s(1)) as f64 - 128.0;
                let cr = self.to8(s(2)) as f64 - 128.0;
                let clamp = |v: f64| v.round().clamp(0.0, 255.0) as u8;
                pack(
                    clamp(y + 1.402 * cr),
                    clamp(y - 0.344136 * cb - 0.714136 * cr),
                    clamp(y + 1.772 * cb),
                    255,
                )
            }
        }
    }
}

fn store(raster: &mut [u8], index: usize, value: u32) {
    let at = index * 4;
    if let Some(bytes) = raster.get_mut(at..at + 4) {
        ByteOrder::LittleEndian.encode_u32(bytes, value);
    }
}

/// Converts strip `strip` into a `width x rows` bottom-up raster
///
/// Returns the number of rows in the strip.
pub fn read_rgba_strip(
    units: &mut UnitReader,
    page: &DirectoryState,
    palette: Option<&Palette>,
    strip: u32,
    raster: &mut [u8],
) -> TiffResult<u32> {
    let converter = Converter::new(page, palette, units.byte_order())?;
    let rows = page.rows_in_strip(strip);
    let width = page.width as usize;
    let separate = page.is_separate();

    let first_line = strip * page.rows_per_strip.max(1);
    let mut planes = Vec::with_capacity(page.planes());
    for plane in 0..page.planes() {
        let unit = UnitReader::strip_index(page, first_line, plane);
        planes.push(units.read_unit(page, unit)?);
    }

    let needed = width * rows as usize * 4;
    if raster.len() < needed {
        return Err(TiffError::ShortRead { expected: needed, actual: raster.len() });
    }

    for row in 0..rows as usize {
        let out_row = rows as usize - 1 - row;
        for col in 0..width {
            let value = converter.pixel(&planes, separate, row * width + col);
            store(raster, out_row * width + col, value);
        }
    }

    Ok(rows)
}

/// Converts the tile containing (`x`, `y`) into a full `tile_width x
/// tile_length` bottom-up raster
pub fn read_rgba_tile(
    units: &mut UnitReader,
    page: &DirectoryState,
    palette: Option<&Palette>,
    x: u32,
    y: u32,
    raster: &mut [u8],
) -> TiffResult<()> {
    let converter = Converter::new(page, palette, units.byte_order())?;
    let tw = page.tile_width as usize;
    let th = page.tile_length as usize;
    let separate = page.is_separate();

    let needed = tw * th * 4;
    if raster.len() < needed {
        return Err(TiffError::ShortRead { expected: needed, actual: raster.len() });
    }

    let mut planes = Vec::with_capacity(page.planes());
    for plane in 0..page.planes() {
        let unit = UnitReader::tile_index(page, x, y, plane);
        planes.push(units.read_unit(page, unit)?);
    }

    let origin_x = (x / page.tile_width) * page.tile_width;
    let origin_y = (y / page.tile_length) * page.tile_length;
    let valid_cols = (page.width - origin_x).min(page.tile_width) as usize;
    let valid_rows = (page.length - origin_y).min(page.tile_length) as usize;

    raster[..needed].fill(0);
    for row in 0..valid_rows {
        let out_row = th - 1 - row;
        for col in 0..valid_cols {
            let value = converter.pixel(&planes, separate, row * tw + col);
            store(raster, out_row * tw + col, value);
        }
    }

    Ok(())
}
