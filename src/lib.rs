pub mod io;
pub mod tiff;
pub mod utils;
pub mod compression;
pub mod engine;
pub mod commands;
pub mod api;

pub use crate::api::RasterTile;

pub use engine::{DataStatus, EngineOptions, OutputTile, ReadMethod, Region, ScalarType, TiffTileSource};
pub use io::stream::{FileStreamOpener, MemoryStreamOpener, StreamOpener};
pub use tiff::{HandlerState, TiffError, TiffResult};
