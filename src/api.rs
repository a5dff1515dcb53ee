//! Convenience entry points
//!
//! Shortcuts for the common ways of getting an open [`TiffTileSource`]
//! without wiring up a stream opener by hand.

use std::fmt::Write;
use std::sync::Arc;

use crate::engine::{EngineOptions, TiffTileSource};
use crate::io::stream::{FileStreamOpener, MemoryStreamOpener};
use crate::tiff::errors::TiffResult;

/// Main interface to the rastertile library
pub struct RasterTile;

impl RasterTile {
    /// Opens a file with default options
    pub fn open(path: &str) -> TiffResult<TiffTileSource> {
        Self::open_with_options(path, EngineOptions::default())
    }

    pub fn open_with_options(path: &str, options: EngineOptions) -> TiffResult<TiffTileSource> {
        let mut source = TiffTileSource::with_options(Arc::new(FileStreamOpener::new()), options);
        source.open(path)?;
        Ok(source)
    }

    /// Opens a container held in memory under `name`
    pub fn open_bytes(name: &str, bytes: Vec<u8>, options: EngineOptions) -> TiffResult<TiffTileSource> {
        let opener = MemoryStreamOpener::new();
        opener.insert(name, bytes);

        let mut source = TiffTileSource::with_options(Arc::new(opener), options);
        source.open(name)?;
        Ok(source)
    }

    /// One line per directory plus the level and sample summary
    pub fn summarize(source: &TiffTileSource) -> String {
        let mut result = String::new();
        let state = match source.state() {
            Some(state) => state,
            None => return "closed\n".to_string(),
        };

        let _ = writeln!(result, "{}: {} directories, {} levels",
                         state.connection, state.number_of_directories(), source.number_of_levels());
        for page in &state.directories {
            let _ = writeln!(result, "  #{} {}x{} {}", page.index, page.width, page.length,
                             source.read_method_name(page.index));
        }
        let _ = writeln!(result, "  {} x {} band(s), min {} max {} null {}",
                         source.scalar_type(), source.number_of_output_bands(),
                         source.min_pixel_value(), source.max_pixel_value(), source.null_pixel_value());
        result
    }
}
