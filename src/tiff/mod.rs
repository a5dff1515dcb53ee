//! TIFF container parsing
//!
//! Header and IFD chain parsing for TIFF and BigTIFF, and the typed
//! per-directory state the tile engine consumes.

pub mod errors;
pub mod ifd;
pub mod types;
pub mod reader;
pub mod constants;
pub mod geo_keys;
pub mod directory;
pub mod state;

pub use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use directory::DirectoryState;
pub use errors::{TiffError, TiffResult};
pub use ifd::{IFD, IFDEntry};
pub use reader::TiffReader;
pub use state::HandlerState;
pub use types::TIFF;
