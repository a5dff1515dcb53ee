//! Raw strip and tile access
//!
//! `UnitReader` owns the container stream and turns strip or tile indexes
//! into decoded bytes: read, decompress, undo the predictor, and expand
//! sub-byte samples to one byte each. The most recently decoded unit is
//! kept so consecutive scanline reads from one compressed strip decode it
//! only once.

use log::{debug, trace};

use crate::compression::predictor::{undo_predictor, PredictorLayout};
use crate::compression::CompressionFactory;
use crate::io::byte_order::ByteOrder;
use crate::io::seekable::{read_at, SeekableReader};
use crate::tiff::constants::compression;
use crate::tiff::directory::DirectoryState;
use crate::tiff::errors::{TiffError, TiffResult};

struct DecodedUnit {
    directory: usize,
    unit: usize,
    data: Vec<u8>,
}

/// Decodes strips and tiles from an open container
pub struct UnitReader {
    stream: Box<dyn SeekableReader>,
    byte_order: ByteOrder,
    last: Option<DecodedUnit>,
}

/// Pixel geometry of one encoded unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitGeometry {
    /// Pixels per row as stored
    pub width: u32,
    pub rows: u32,
    /// Samples interleaved per pixel within the unit
    pub samples: usize,
}

impl UnitReader {
    pub fn new(stream: Box<dyn SeekableReader>, byte_order: ByteOrder) -> Self {
        UnitReader {
            stream,
            byte_order,
            last: None,
        }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Forgets the cached unit
    pub fn clear_cache(&mut self) {
        self.last = None;
    }

    /// Geometry of strip or tile `unit`
    pub fn geometry(page: &DirectoryState, unit: usize) -> UnitGeometry {
        let samples = page.samples_per_plane_pixel();
        if page.is_tiled() {
            UnitGeometry { width: page.tile_width, rows: page.tile_length, samples }
        } else {
            let strips = page.strips_per_plane().max(1) as usize;
            let strip = (unit % strips) as u32;
            UnitGeometry { width: page.width, rows: page.rows_in_strip(strip), samples }
        }
    }

    /// Size of a unit once decoded, before sub-byte expansion
    pub fn decoded_len(page: &DirectoryState, unit: usize) -> usize {
        let geometry = Self::geometry(page, unit);
        page.row_bytes(geometry.width) * geometry.rows as usize
    }

    /// Index of the tile containing pixel (`x`, `y`) in `plane`
    pub fn tile_index(page: &DirectoryState, x: u32, y: u32, plane: usize) -> usize {
        let across = page.tiles_across() as usize;
        let down = page.tiles_down() as usize;
        let col = (x / page.tile_width.max(1)) as usize;
        let row = (y / page.tile_length.max(1)) as usize;
        plane * across * down + row * across + col
    }

    /// Index of the strip containing `line` in `plane`
    pub fn strip_index(page: &DirectoryState, line: u32, plane: usize) -> usize {
        let rows = page.rows_per_strip.max(1);
        plane * page.strips_per_plane() as usize + (line / rows) as usize
    }

    /// Reads and decodes `unit`, packed as stored (predictor undone)
    ///
    /// Fails with `ShortRead` when the unit decodes to fewer bytes than
    /// its geometry requires.
    pub fn read_encoded(&mut self, page: &DirectoryState, unit: usize) -> TiffResult<&[u8]> {
        let cached = matches!(&self.last, Some(last) if last.directory == page.index && last.unit == unit);
        if !cached {
            let data = self.decode(page, unit)?;
            self.last = Some(DecodedUnit { directory: page.index, unit, data });
        }

        match &self.last {
            Some(last) => Ok(&last.data),
            None => Err(TiffError::GenericError("decoded unit cache is empty".to_string())),
        }
    }

    fn decode(&mut self, page: &DirectoryState, unit: usize) -> TiffResult<Vec<u8>> {
        let offset = *page.data_offsets.get(unit).ok_or_else(|| {
            TiffError::GenericError(format!("Directory {} has no data unit {}", page.index, unit))
        })?;

        let expected = Self::decoded_len(page, unit);
        let stored = match page.data_byte_counts.get(unit) {
            Some(&count) if count > 0 => count as usize,
            _ if page.compression == compression::NONE => expected,
            _ => {
                return Err(TiffError::GenericError(format!(
                    "Directory {} has no byte count for unit {}", page.index, unit
                )))
            }
        };

        let mut raw = Vec::new();
        raw.try_reserve_exact(stored).map_err(|_| TiffError::AllocationFailure(stored))?;
        raw.resize(stored, 0);
        let got = read_at(self.stream.as_mut(), offset, &mut raw)?;
        if got < stored {
            debug!("Directory {} unit {}: read {} of {} bytes", page.index, unit, got, stored);
            raw.truncate(got);
        }
        trace!("Directory {} unit {}: {} stored bytes at {}", page.index, unit, got, offset);

        let handler = CompressionFactory::create_handler(page.compression as u64)?;
        let mut data = handler.decompress(&raw, expected)?;
        if data.len() < expected {
            return Err(TiffError::ShortRead { expected, actual: data.len() });
        }
        data.truncate(expected);

        let geometry = Self::geometry(page, unit);
        let layout = PredictorLayout {
            width: geometry.width as usize,
            rows: geometry.rows as usize,
            samples: geometry.samples,
            bits_per_sample: page.bits_per_sample,
            byte_order: self.byte_order,
        };
        if page.bits_per_sample >= 8 {
            undo_predictor(&mut data, page.predictor, layout)?;
        }

        Ok(data)
    }

    /// Decodes `unit` with sub-byte samples expanded to one byte each
    pub fn read_unit(&mut self, page: &DirectoryState, unit: usize) -> TiffResult<Vec<u8>> {
        let geometry = Self::geometry(page, unit);
        let bits = page.bits_per_sample;
        let data = self.read_encoded(page, unit)?;

        if bits < 8 {
            let row_samples = geometry.width as usize * geometry.samples;
            Ok(unpack_samples(data, bits, row_samples, geometry.rows as usize))
        } else {
            Ok(data.to_vec())
        }
    }

    /// Reads image line `line` of `plane` into `out`
    ///
    /// `out` receives the whole line with sub-byte samples expanded.
    /// Uncompressed lines are read in place; compressed ones come from
    /// their decoded strip.
    pub fn read_scanline(&mut self, page: &DirectoryState, line: u32, plane: usize, out: &mut [u8]) -> TiffResult<()> {
        if line >= page.length {
            return Err(TiffError::GenericError(format!("Line {} is past the image end", line)));
        }

        let rows = page.rows_per_strip.max(1);
        let unit = Self::strip_index(page, line, plane);
        let row_in_strip = (line % rows) as usize;
        let row_bytes = page.row_bytes(page.width);
        let bits = page.bits_per_sample;
        let row_samples = page.width as usize * page.samples_per_plane_pixel();

        let packed: Vec<u8> = if page.compression == compression::NONE && page.predictor <= 1 {
            let base = *page.data_offsets.get(unit).ok_or_else(|| {
                TiffError::GenericError(format!("Directory {} has no strip {}", page.index, unit))
            })?;
            let mut row = vec![0u8; row_bytes];
            let got = read_at(self.stream.as_mut(), base + (row_in_strip * row_bytes) as u64, &mut row)?;
            if got < row_bytes {
                return Err(TiffError::ShortRead { expected: row_bytes, actual: got });
            }
            row
        } else {
            let data = self.read_encoded(page, unit)?;
            let start = row_in_strip * row_bytes;
            data.get(start..start + row_bytes)
                .ok_or(TiffError::ShortRead { expected: start + row_bytes, actual: data.len() })?
                .to_vec()
        };

        let expanded = if bits < 8 { unpack_samples(&packed, bits, row_samples, 1) } else { packed };
        let n = expanded.len().min(out.len());
        out[..n].copy_from_slice(&expanded[..n]);
        Ok(())
    }
}

/// Expands `bits`-deep packed samples to one byte per sample
///
/// Samples are packed most significant bit first and may straddle byte
/// boundaries. Each row starts on a byte boundary.
pub fn unpack_samples(data: &[u8], bits: u16, row_samples: usize, rows: usize) -> Vec<u8> {
    let bits = bits.clamp(1, 8) as usize;
    let row_bytes = (row_samples * bits + 7) / 8;
    let mask = ((1u16 << bits) - 1) as u32;
    let mut out = Vec::with_capacity(row_samples * rows);

    for row in 0..rows {
        let start = row * row_bytes;
        let row_data = match data.get(start..start + row_bytes) {
            Some(row_data) => row_data,
            None => break,
        };

        let mut acc = 0u32;
        let mut held = 0usize;
        let mut bytes = row_data.iter();
        for _ in 0..row_samples {
            while held < bits {
                match bytes.next() {
                    Some(&byte) => {
                        acc = (acc << 8) | byte as u32;
                        held += 8;
                    }
                    None => break,
                }
            }
            if held < bits {
                out.push(0);
                continue;
            }
            held -= bits;
            out.push(((acc >> held) & mask) as u8);
            acc &= (1u32 << held) - 1;
        }
    }

    out
}
