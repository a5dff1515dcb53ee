//! Reusable decode buffer
//!
//! One raw buffer per engine, sized for the read method of the active
//! directory. It remembers which image region and level it currently
//! holds so strip and scanline reads can be reused across requests.

use log::{debug, warn};

use crate::engine::rect::Region;
use crate::engine::strategy::ReadMethod;
use crate::tiff::directory::DirectoryState;
use crate::tiff::errors::{TiffError, TiffResult};

#[derive(Debug, Default)]
pub struct ScratchBuffer {
    data: Vec<u8>,
    /// Image region held, in the coordinates of `level`
    pub region: Option<Region>,
    pub level: Option<u32>,
}

impl ScratchBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the buffer exactly `size` bytes, forgetting what it held
    ///
    /// Memory is only reallocated when the size changes.
    pub fn ensure(&mut self, size: usize) -> TiffResult<()> {
        self.invalidate();

        if size == self.data.len() {
            return Ok(());
        }

        let mut data = Vec::new();
        if data.try_reserve_exact(size).is_err() {
            warn!("Not enough memory for a {} byte decode buffer", size);
            self.data = Vec::new();
            return Err(TiffError::AllocationFailure(size));
        }
        data.resize(size, 0);
        self.data = data;

        debug!("Allocated {} byte decode buffer", size);
        Ok(())
    }

    pub fn invalidate(&mut self) {
        self.region = None;
        self.level = None;
    }

    /// Drops the allocation entirely
    pub fn release(&mut self) {
        self.invalidate();
        self.data = Vec::new();
    }

    /// Whether the buffer holds `clip` of `level`
    pub fn holds(&self, clip: &Region, level: u32) -> bool {
        match (self.region, self.level) {
            (Some(region), Some(held)) => held == level && clip.completely_within(&region),
            _ => false,
        }
    }

    pub fn mark(&mut self, region: Region, level: u32) {
        self.region = Some(region);
        self.level = Some(level);
    }

    pub fn is_allocated(&self) -> bool {
        !self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

/// Bytes needed to decode one unit of `page` with `method`
///
/// `bytes_per_sample` and `samples_per_pixel` are the engine's output
/// values, not the raw tags. Returns `None` for unreadable pages.
pub fn buffer_size(
    method: ReadMethod,
    page: &DirectoryState,
    bytes_per_sample: usize,
    samples_per_pixel: usize,
    output_tile_height: u32,
    buffered: bool,
) -> Option<usize> {
    let width = page.width as usize;
    let tile_w = page.tile_width as usize;
    let tile_h = page.tile_length as usize;
    let rows = page.rows_per_strip as usize;

    let size = match method {
        ReadMethod::RgbaU8Tile => product(&[tile_w, tile_h, 4]),
        ReadMethod::Tile if page.is_separate() => product(&[tile_w, tile_h, bytes_per_sample]),
        ReadMethod::Tile => product(&[tile_w, tile_h, bytes_per_sample, samples_per_pixel]),
        ReadMethod::RgbaU8Strip | ReadMethod::RgbaU8aStrip => product(&[width, rows, 4]),
        ReadMethod::U16Strip => product(&[width, rows, bytes_per_sample, samples_per_pixel]),
        ReadMethod::ScanLine if buffered => {
            product(&[width, bytes_per_sample, samples_per_pixel, output_tile_height as usize])
        }
        ReadMethod::ScanLine => product(&[width, bytes_per_sample, samples_per_pixel]),
        ReadMethod::Unknown => return None,
    };

    Some(size)
}

/// Saturates at `usize::MAX`, which `ScratchBuffer::ensure` always rejects
fn product(factors: &[usize]) -> usize {
    factors
        .iter()
        .try_fold(1usize, |acc, &f| acc.checked_mul(f))
        .unwrap_or(usize::MAX)
}
