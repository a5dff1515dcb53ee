//! Tile engine
//!
//! Everything between parsed directory tags and filled output tiles:
//! level classification, sample type resolution, read method selection,
//! the scratch buffer, raw unit decoding and the decode routines, tied
//! together by [`TiffTileSource`].

pub mod rect;
pub mod scalar;
pub mod citation;
pub mod page_index;
pub mod strategy;
pub mod buffer;
pub mod palette;
pub mod tile;
pub mod raw;
pub mod rgba;
pub mod decode;
pub mod options;
pub mod source;
#[cfg(test)]
mod tests;

pub use options::EngineOptions;
pub use page_index::PageIndex;
pub use rect::Region;
pub use scalar::{SampleStats, ScalarType};
pub use source::TiffTileSource;
pub use strategy::ReadMethod;
pub use tile::{DataStatus, OutputTile, TileData};
