//! Read method selection
//!
//! Each directory is read with exactly one method, picked from its tiling,
//! photometric interpretation, sample layout and compression.

use std::fmt;

use crate::tiff::constants::{compression, photometric, planar_config};
use crate::tiff::directory::DirectoryState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadMethod {
    /// Native tiles copied straight into the output tile
    Tile,
    /// Strips read one line at a time
    ScanLine,
    /// Tiles converted through the packed RGBA intermediate
    RgbaU8Tile,
    /// Strips converted through the packed RGBA intermediate
    RgbaU8Strip,
    /// RGBA strips with null values flipped to the minimum (bilevel data)
    RgbaU8aStrip,
    /// Whole 16-bit strips, one per band
    U16Strip,
    Unknown,
}

impl ReadMethod {
    pub fn name(&self) -> &'static str {
        match self {
            ReadMethod::Tile => "READ_TILE",
            ReadMethod::ScanLine => "READ_SCAN_LINE",
            ReadMethod::RgbaU8Tile => "READ_RGBA_U8_TILE",
            ReadMethod::RgbaU8Strip => "READ_RGBA_U8_STRIP",
            ReadMethod::RgbaU8aStrip => "READ_RGBA_U8A_STRIP",
            ReadMethod::U16Strip => "READ_U16_STRIP",
            ReadMethod::Unknown => "UNKNOWN",
        }
    }

    /// Whether the method decodes through packed RGBA words
    pub fn is_rgba(&self) -> bool {
        matches!(self, ReadMethod::RgbaU8Tile | ReadMethod::RgbaU8Strip | ReadMethod::RgbaU8aStrip)
    }
}

impl fmt::Display for ReadMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The attributes of a directory that decide its read method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub tiled: bool,
    /// Photometric after color map handling
    pub photometric: u16,
    /// Samples per pixel after color map handling
    pub samples_per_pixel: u16,
    pub bits_per_sample: u16,
    pub planar_config: u16,
    pub rows_per_strip: u32,
    pub compression: u16,
}

impl PageLayout {
    /// Describes `page` as the engine will decode it
    ///
    /// A color mapped page reads as a 3-band palette image when the
    /// palette is applied, and as its raw 1-band indexes otherwise.
    pub fn from_directory(page: &DirectoryState, apply_palette: bool, samples_per_pixel: u16) -> Self {
        let (photometric, samples) = if page.has_color_map() {
            if apply_palette {
                (photometric::PALETTE, 3)
            } else {
                (photometric::BLACK_IS_ZERO, 1)
            }
        } else {
            (page.photometric, samples_per_pixel)
        };

        PageLayout {
            tiled: page.is_tiled(),
            photometric,
            samples_per_pixel: samples,
            bits_per_sample: page.bits_per_sample,
            planar_config: page.planar_config,
            rows_per_strip: page.rows_per_strip,
            compression: page.compression,
        }
    }
}

/// Picks the read method for a directory; first matching rule wins
pub fn select_read_method(layout: &PageLayout) -> ReadMethod {
    let color_converted = layout.photometric == photometric::YCBCR || layout.photometric == photometric::PALETTE;
    let spp = layout.samples_per_pixel;
    let bits = layout.bits_per_sample;

    if layout.tiled {
        return if color_converted && spp <= 3 && bits <= 8 {
            ReadMethod::RgbaU8Tile
        } else {
            ReadMethod::Tile
        };
    }

    if color_converted && spp <= 3 && bits <= 8 {
        ReadMethod::RgbaU8Strip
    } else if bits == 16
        && layout.rows_per_strip > 1
        && (layout.planar_config == planar_config::PLANAR
            || (layout.planar_config == planar_config::CHUNKY && spp == 1))
    {
        ReadMethod::U16Strip
    } else if spp <= 3 && bits == 1 {
        ReadMethod::RgbaU8aStrip
    } else if layout.compression == compression::NONE || layout.rows_per_strip == 1 {
        ReadMethod::ScanLine
    } else if spp <= 4 && bits <= 8 {
        ReadMethod::RgbaU8Strip
    } else {
        ReadMethod::Unknown
    }
}
