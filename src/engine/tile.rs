//! Output tiles
//!
//! An `OutputTile` is a rectangle of the image at one resolution level,
//! stored band sequential in the engine's scalar type. Decoders write
//! into it through `load_tile`, `load_band` and `copy_line`, which take
//! raw sample bytes in the container's byte order.

use std::fmt;

use crate::engine::rect::Region;
use crate::engine::scalar::{SampleStats, ScalarType};
use crate::io::byte_order::ByteOrder;

/// How much of a tile holds real data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataStatus {
    /// Nothing has been loaded yet
    Null,
    /// Every sample is the null value
    Empty,
    /// Some samples are null
    Partial,
    /// No sample is null
    Full,
}

impl fmt::Display for DataStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataStatus::Null => "null",
            DataStatus::Empty => "empty",
            DataStatus::Partial => "partial",
            DataStatus::Full => "full",
        };
        f.write_str(name)
    }
}

/// Sample layout of a source buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interleave {
    /// Band interleaved by pixel
    Bip,
    /// Band interleaved by line
    Bil,
    /// Band sequential
    Bsq,
}

/// Band sequential sample storage
#[derive(Debug, Clone, PartialEq)]
pub enum TileData {
    U8(Vec<u8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    U32(Vec<u32>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl TileData {
    fn allocate(scalar: ScalarType, len: usize) -> TileData {
        match scalar {
            ScalarType::U8 => TileData::U8(vec![0; len]),
            ScalarType::U11
            | ScalarType::U12
            | ScalarType::U13
            | ScalarType::U14
            | ScalarType::U15
            | ScalarType::U16 => TileData::U16(vec![0; len]),
            ScalarType::I16 => TileData::I16(vec![0; len]),
            ScalarType::U32 => TileData::U32(vec![0; len]),
            ScalarType::I32 => TileData::I32(vec![0; len]),
            ScalarType::F32 => TileData::F32(vec![0.0; len]),
            ScalarType::F64 => TileData::F64(vec![0.0; len]),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TileData::U8(v) => v.len(),
            TileData::U16(v) => v.len(),
            TileData::I16(v) => v.len(),
            TileData::U32(v) => v.len(),
            TileData::I32(v) => v.len(),
            TileData::F32(v) => v.len(),
            TileData::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample `idx` widened to f64
    pub fn get(&self, idx: usize) -> f64 {
        match self {
            TileData::U8(v) => v[idx] as f64,
            TileData::U16(v) => v[idx] as f64,
            TileData::I16(v) => v[idx] as f64,
            TileData::U32(v) => v[idx] as f64,
            TileData::I32(v) => v[idx] as f64,
            TileData::F32(v) => v[idx] as f64,
            TileData::F64(v) => v[idx],
        }
    }

    /// Stores `value`, saturating to the storage type
    pub fn set(&mut self, idx: usize, value: f64) {
        match self {
            TileData::U8(v) => v[idx] = value as u8,
            TileData::U16(v) => v[idx] = value as u16,
            TileData::I16(v) => v[idx] = value as i16,
            TileData::U32(v) => v[idx] = value as u32,
            TileData::I32(v) => v[idx] = value as i32,
            TileData::F32(v) => v[idx] = value as f32,
            TileData::F64(v) => v[idx] = value,
        }
    }

    fn fill(&mut self, start: usize, end: usize, value: f64) {
        match self {
            TileData::U8(v) => v[start..end].fill(value as u8),
            TileData::U16(v) => v[start..end].fill(value as u16),
            TileData::I16(v) => v[start..end].fill(value as i16),
            TileData::U32(v) => v[start..end].fill(value as u32),
            TileData::I32(v) => v[start..end].fill(value as i32),
            TileData::F32(v) => v[start..end].fill(value as f32),
            TileData::F64(v) => v[start..end].fill(value),
        }
    }

    /// Decodes one raw sample into slot `idx`
    fn set_from_bytes(&mut self, idx: usize, bytes: &[u8], order: ByteOrder) {
        match self {
            TileData::U8(v) => v[idx] = bytes[0],
            TileData::U16(v) => v[idx] = order.decode_u16(bytes),
            TileData::I16(v) => v[idx] = order.decode_i16(bytes),
            TileData::U32(v) => v[idx] = order.decode_u32(bytes),
            TileData::I32(v) => v[idx] = order.decode_i32(bytes),
            TileData::F32(v) => v[idx] = order.decode_f32(bytes),
            TileData::F64(v) => v[idx] = order.decode_f64(bytes),
        }
    }
}

/// A typed, multi-band rectangle of image data
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTile {
    region: Region,
    bands: usize,
    scalar: ScalarType,
    null: Vec<f64>,
    min: Vec<f64>,
    max: Vec<f64>,
    data: TileData,
    status: DataStatus,
}

impl OutputTile {
    /// Creates a tile covering `region`, filled with the null value
    pub fn new(region: Region, bands: usize, scalar: ScalarType, stats: &SampleStats) -> Self {
        let mut tile = OutputTile {
            region,
            bands,
            scalar,
            null: vec![representable(scalar, stats.null); bands],
            min: vec![stats.min; bands],
            max: vec![stats.max; bands],
            data: TileData::allocate(scalar, region.area() * bands),
            status: DataStatus::Null,
        };
        tile.make_blank();
        tile
    }

    /// Moves the tile to `region`, reallocating if its size changed
    pub fn set_region(&mut self, region: Region) {
        let resized = region.width != self.region.width || region.height != self.region.height;
        self.region = region;
        if resized {
            self.data = TileData::allocate(self.scalar, region.area() * self.bands);
            self.make_blank();
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn width(&self) -> u32 {
        self.region.width
    }

    pub fn height(&self) -> u32 {
        self.region.height
    }

    pub fn band_count(&self) -> usize {
        self.bands
    }

    pub fn scalar_type(&self) -> ScalarType {
        self.scalar
    }

    pub fn status(&self) -> DataStatus {
        self.status
    }

    pub fn data(&self) -> &TileData {
        &self.data
    }

    pub fn null_value(&self, band: usize) -> f64 {
        self.null.get(band).copied().unwrap_or(f64::NAN)
    }

    pub fn min_value(&self, band: usize) -> f64 {
        self.min.get(band).copied().unwrap_or(f64::NAN)
    }

    pub fn max_value(&self, band: usize) -> f64 {
        self.max.get(band).copied().unwrap_or(f64::NAN)
    }

    fn plane_len(&self) -> usize {
        self.region.area()
    }

    /// Sample at image coordinates (`x`, `y`), if inside the tile
    pub fn value(&self, band: usize, x: i32, y: i32) -> Option<f64> {
        if band >= self.bands || !self.region.contains(x, y) {
            return None;
        }
        let col = (x as i64 - self.region.x as i64) as usize;
        let row = (y as i64 - self.region.y as i64) as usize;
        Some(self.data.get(band * self.plane_len() + row * self.region.width as usize + col))
    }

    /// All samples of one band, row major
    pub fn band_values(&self, band: usize) -> Vec<f64> {
        if band >= self.bands {
            return Vec::new();
        }
        let plane = self.plane_len();
        (band * plane..(band + 1) * plane).map(|i| self.data.get(i)).collect()
    }

    /// Mutable view of one 8-bit band, used by the RGBA decoders
    pub fn band_u8_mut(&mut self, band: usize) -> Option<&mut [u8]> {
        let plane = self.plane_len();
        match &mut self.data {
            TileData::U8(v) if band < self.bands => Some(&mut v[band * plane..(band + 1) * plane]),
            _ => None,
        }
    }

    /// Fills every band with its null value
    pub fn make_blank(&mut self) {
        let plane = self.plane_len();
        for band in 0..self.bands {
            self.data.fill(band * plane, (band + 1) * plane, self.null[band]);
        }
        self.status = DataStatus::Empty;
    }

    /// Recomputes the status from the samples
    pub fn validate(&mut self) -> DataStatus {
        let plane = self.plane_len();
        let total = plane * self.bands;
        let mut nulls = 0usize;

        for band in 0..self.bands {
            let null = self.null[band];
            nulls += (band * plane..(band + 1) * plane)
                .filter(|&i| self.data.get(i) == null)
                .count();
        }

        self.status = if total == 0 || nulls == total {
            DataStatus::Empty
        } else if nulls == 0 {
            DataStatus::Full
        } else {
            DataStatus::Partial
        };
        self.status
    }

    /// Copies the part of `clip` covered by `src_rect` out of `src`
    ///
    /// `src` holds `src_bands` bands of `src_rect` laid out per
    /// `interleave`. Bands beyond the tile's band count are skipped.
    pub fn load_tile(
        &mut self,
        src: &[u8],
        src_rect: &Region,
        clip: &Region,
        src_bands: usize,
        interleave: Interleave,
        order: ByteOrder,
    ) {
        let bands = src_bands.min(self.bands);
        for band in 0..bands {
            self.copy_samples(src, src_rect, clip, band, band, src_bands, interleave, order);
        }
    }

    /// Copies a single-band source into band `dest_band`
    pub fn load_band(&mut self, src: &[u8], src_rect: &Region, clip: &Region, dest_band: usize, order: ByteOrder) {
        if dest_band < self.bands {
            self.copy_samples(src, src_rect, clip, 0, dest_band, 1, Interleave::Bsq, order);
        }
    }

    /// Copies one image line holding samples `start..=stop`
    pub fn copy_line(
        &mut self,
        src: &[u8],
        line: i32,
        start: i32,
        stop: i32,
        src_bands: usize,
        interleave: Interleave,
        order: ByteOrder,
    ) {
        let line_rect = Region::from_corners(start, line, stop, line);
        self.load_tile(src, &line_rect, &line_rect, src_bands, interleave, order);
    }

    #[allow(clippy::too_many_arguments)]
    fn copy_samples(
        &mut self,
        src: &[u8],
        src_rect: &Region,
        clip: &Region,
        src_band: usize,
        dest_band: usize,
        src_bands: usize,
        interleave: Interleave,
        order: ByteOrder,
    ) {
        let area = clip.clip_to(src_rect).clip_to(&self.region);
        if area.is_empty() {
            return;
        }

        let bytes = self.scalar.bytes_per_sample();
        let src_w = src_rect.width as usize;
        let src_h = src_rect.height as usize;
        let dst_w = self.region.width as usize;
        let dst_base = dest_band * self.plane_len();

        for y in area.y..=area.lr_y() {
            let sy = (y - src_rect.y) as usize;
            let dy = (y - self.region.y) as usize;
            for x in area.x..=area.lr_x() {
                let sx = (x - src_rect.x) as usize;
                let dx = (x - self.region.x) as usize;

                let idx = match interleave {
                    Interleave::Bip => (sy * src_w + sx) * src_bands + src_band,
                    Interleave::Bil => (sy * src_bands + src_band) * src_w + sx,
                    Interleave::Bsq => (src_band * src_h + sy) * src_w + sx,
                };
                let offset = idx * bytes;
                if let Some(sample) = src.get(offset..offset + bytes) {
                    self.data.set_from_bytes(dst_base + dy * dst_w + dx, sample, order);
                }
            }
        }
    }
}

/// `value` as it reads back after storing it in `scalar`
fn representable(scalar: ScalarType, value: f64) -> f64 {
    let mut probe = TileData::allocate(scalar, 1);
    probe.set(0, value);
    probe.get(0)
}
