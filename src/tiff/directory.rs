//! Typed per-directory tag state
//!
//! `DirectoryState` is everything the engine needs to know about one page,
//! pulled out of the raw IFD once at open time. It is serializable so a
//! whole container's worth can be cached and handed back on a later open.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{compression, new_subfile_type, photometric, planar_config, predictor, sample_format, tags};
use crate::tiff::errors::TiffResult;
use crate::tiff::geo_keys;
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;

/// Tag values of a single directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryState {
    pub index: usize,
    /// 0 when the tag is missing
    pub width: u32,
    /// 0 when the tag is missing
    pub length: u32,
    pub bits_per_sample: u16,
    pub samples_per_pixel: u16,
    pub sample_format: u16,
    pub planar_config: u16,
    pub photometric: u16,
    pub compression: u16,
    pub predictor: u16,
    pub subfile_type: u32,
    /// 0 for strip organized directories
    pub tile_width: u32,
    pub tile_length: u32,
    pub rows_per_strip: u32,
    pub min_sample_value: Option<f64>,
    pub max_sample_value: Option<f64>,
    pub extra_samples: Vec<u16>,
    pub ycbcr_subsampling: [u16; 2],
    /// Red, green and blue ramps of 2^bits entries each
    pub color_map: Option<Vec<u16>>,
    /// Strip or tile offsets, plane-major for separate planes
    pub data_offsets: Vec<u64>,
    pub data_byte_counts: Vec<u64>,
    pub gdal_nodata: Option<String>,
    pub vertical_citation: Option<String>,
}

impl Default for DirectoryState {
    fn default() -> Self {
        DirectoryState {
            index: 0,
            width: 0,
            length: 0,
            bits_per_sample: 1,
            samples_per_pixel: 1,
            sample_format: sample_format::UNSIGNED,
            planar_config: planar_config::CHUNKY,
            photometric: photometric::BLACK_IS_ZERO,
            compression: compression::NONE,
            predictor: predictor::NONE,
            subfile_type: 0,
            tile_width: 0,
            tile_length: 0,
            rows_per_strip: 0,
            min_sample_value: None,
            max_sample_value: None,
            extra_samples: Vec::new(),
            ycbcr_subsampling: [2, 2],
            color_map: None,
            data_offsets: Vec::new(),
            data_byte_counts: Vec::new(),
            gdal_nodata: None,
            vertical_citation: None,
        }
    }
}

impl DirectoryState {
    /// Builds the typed state from a parsed IFD
    ///
    /// Missing optional tags fall back to their TIFF defaults. Missing
    /// dimensions are logged and left at 0 so the page index can skip the
    /// directory.
    pub fn from_ifd(reader: &mut dyn SeekableReader, tiff_reader: &TiffReader, ifd: &IFD) -> TiffResult<Self> {
        let mut state = DirectoryState {
            index: ifd.number,
            ..DirectoryState::default()
        };

        let first = |reader: &mut dyn SeekableReader, tag: u16| -> Option<u64> {
            if !ifd.has_tag(tag) {
                return None;
            }
            match tiff_reader.read_tag_values(reader, ifd, tag) {
                Ok(values) => values.first().copied(),
                Err(e) => {
                    warn!("Directory {}: cannot read tag {}: {}", ifd.number, tag, e);
                    None
                }
            }
        };

        match first(reader, tags::IMAGE_WIDTH) {
            Some(width) => state.width = width as u32,
            None => warn!("Directory {}: cannot determine image width", ifd.number),
        }
        match first(reader, tags::IMAGE_LENGTH) {
            Some(length) => state.length = length as u32,
            None => warn!("Directory {}: cannot determine image length", ifd.number),
        }

        if let Some(bits) = first(reader, tags::BITS_PER_SAMPLE) {
            state.bits_per_sample = bits as u16;
        }
        if let Some(spp) = first(reader, tags::SAMPLES_PER_PIXEL) {
            state.samples_per_pixel = (spp as u16).max(1);
        }
        if let Some(format) = first(reader, tags::SAMPLE_FORMAT) {
            state.sample_format = format as u16;
        }
        match first(reader, tags::PLANAR_CONFIGURATION) {
            Some(0) | None => {}
            Some(planar) => state.planar_config = planar as u16,
        }
        if let Some(photo) = first(reader, tags::PHOTOMETRIC_INTERPRETATION) {
            state.photometric = photo as u16;
        }
        if let Some(comp) = first(reader, tags::COMPRESSION) {
            state.compression = comp as u16;
        }
        if let Some(pred) = first(reader, tags::PREDICTOR) {
            state.predictor = pred as u16;
        }
        if let Some(subfile) = first(reader, tags::NEW_SUBFILE_TYPE) {
            state.subfile_type = subfile as u32;
        }

        let tiled = ifd.has_tag(tags::TILE_WIDTH);
        if tiled {
            state.tile_width = first(reader, tags::TILE_WIDTH).unwrap_or(0) as u32;
            state.tile_length = first(reader, tags::TILE_LENGTH).unwrap_or(0) as u32;
            if state.tile_width == 0 {
                warn!("Directory {}: cannot determine tile width", ifd.number);
            }
            if state.tile_length == 0 {
                warn!("Directory {}: cannot determine tile length", ifd.number);
            }
        } else {
            state.rows_per_strip = match first(reader, tags::ROWS_PER_STRIP) {
                Some(0) => 1,
                Some(rows) => rows.min(state.length.max(1) as u64) as u32,
                None => state.length.max(1),
            };
        }

        if ifd.has_tag(tags::MIN_SAMPLE_VALUE) {
            state.min_sample_value = tiff_reader
                .read_tag_f64_values(reader, ifd, tags::MIN_SAMPLE_VALUE)
                .ok()
                .and_then(|v| v.first().copied());
        }
        if ifd.has_tag(tags::MAX_SAMPLE_VALUE) {
            state.max_sample_value = tiff_reader
                .read_tag_f64_values(reader, ifd, tags::MAX_SAMPLE_VALUE)
                .ok()
                .and_then(|v| v.first().copied());
        }

        if ifd.has_tag(tags::EXTRA_SAMPLES) {
            state.extra_samples = tiff_reader
                .read_tag_values(reader, ifd, tags::EXTRA_SAMPLES)?
                .into_iter()
                .map(|v| v as u16)
                .collect();
        }
        if ifd.has_tag(tags::YCBCR_SUBSAMPLING) {
            let values = tiff_reader.read_tag_values(reader, ifd, tags::YCBCR_SUBSAMPLING)?;
            if values.len() >= 2 {
                state.ycbcr_subsampling = [values[0] as u16, values[1] as u16];
            }
        }

        if ifd.has_tag(tags::COLOR_MAP) {
            let values = tiff_reader.read_tag_values(reader, ifd, tags::COLOR_MAP)?;
            state.color_map = Some(values.into_iter().map(|v| v as u16).collect());
        }

        let (offsets_tag, counts_tag) = if tiled {
            (tags::TILE_OFFSETS, tags::TILE_BYTE_COUNTS)
        } else {
            (tags::STRIP_OFFSETS, tags::STRIP_BYTE_COUNTS)
        };
        if ifd.has_tag(offsets_tag) {
            state.data_offsets = tiff_reader.read_tag_values(reader, ifd, offsets_tag)?;
        } else {
            warn!("Directory {}: no {} offsets", ifd.number, if tiled { "tile" } else { "strip" });
        }
        if ifd.has_tag(counts_tag) {
            state.data_byte_counts = tiff_reader.read_tag_values(reader, ifd, counts_tag)?;
        }

        if ifd.has_tag(tags::GDAL_NODATA) {
            match tiff_reader.read_tag_ascii(reader, ifd, tags::GDAL_NODATA) {
                Ok(nodata) => state.gdal_nodata = Some(nodata.trim().to_string()),
                Err(e) => debug!("Directory {}: unreadable GDAL nodata tag: {}", ifd.number, e),
            }
        }
        match geo_keys::read_vertical_citation(reader, tiff_reader, ifd) {
            Ok(citation) => state.vertical_citation = citation,
            Err(e) => debug!("Directory {}: unreadable GeoKey directory: {}", ifd.number, e),
        }

        debug!("Directory {}: {}x{}, {} bps, {} spp, {}, compression {}",
               state.index, state.width, state.length, state.bits_per_sample,
               state.samples_per_pixel, if tiled { "tiled" } else { "stripped" }, state.compression);

        Ok(state)
    }

    pub fn is_tiled(&self) -> bool {
        self.tile_width > 0 && self.tile_length > 0
    }

    pub fn has_dimensions(&self) -> bool {
        self.width > 0 && self.length > 0
    }

    /// Reduced resolution image; reduced masks do not count
    pub fn is_reduced(&self) -> bool {
        self.subfile_type & new_subfile_type::REDUCED_RESOLUTION != 0 && !self.is_mask()
    }

    pub fn is_mask(&self) -> bool {
        self.subfile_type == new_subfile_type::TRANSPARENCY_MASK
            || self.subfile_type == new_subfile_type::REDUCED_MASK
    }

    pub fn has_color_map(&self) -> bool {
        self.color_map.is_some()
    }

    pub fn is_separate(&self) -> bool {
        self.planar_config == planar_config::PLANAR
    }

    /// Bytes used to store one sample, rounded up
    pub fn bytes_per_sample(&self) -> usize {
        ((self.bits_per_sample as usize) + 7) / 8
    }

    /// Number of planes data units are split into
    pub fn planes(&self) -> usize {
        if self.is_separate() { self.samples_per_pixel as usize } else { 1 }
    }

    /// Samples interleaved within one plane
    pub fn samples_per_plane_pixel(&self) -> usize {
        if self.is_separate() { 1 } else { self.samples_per_pixel as usize }
    }

    pub fn tiles_across(&self) -> u32 {
        if self.tile_width == 0 { 0 } else { (self.width + self.tile_width - 1) / self.tile_width }
    }

    pub fn tiles_down(&self) -> u32 {
        if self.tile_length == 0 { 0 } else { (self.length + self.tile_length - 1) / self.tile_length }
    }

    pub fn strips_per_plane(&self) -> u32 {
        if self.rows_per_strip == 0 { 0 } else { (self.length + self.rows_per_strip - 1) / self.rows_per_strip }
    }

    /// Byte length of one row of `width` pixels in one plane
    pub fn row_bytes(&self, width: u32) -> usize {
        let bits = width as usize * self.samples_per_plane_pixel() * self.bits_per_sample as usize;
        (bits + 7) / 8
    }

    /// Rows held by strip `strip` (the last strip may be partial)
    pub fn rows_in_strip(&self, strip: u32) -> u32 {
        let start = strip.saturating_mul(self.rows_per_strip);
        self.rows_per_strip.min(self.length.saturating_sub(start))
    }
}
