//! Container handler state
//!
//! A snapshot of every directory's tag values. Building it means walking
//! the whole IFD chain; a saved snapshot lets a later open of the same
//! resource skip that walk.

use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::io::byte_order::ByteOrder;
use crate::io::seekable::SeekableReader;
use crate::tiff::directory::DirectoryState;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::reader::TiffReader;

/// Parsed tag state of a whole container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlerState {
    /// Connection string the state was built from
    pub connection: String,
    pub byte_order: ByteOrder,
    pub big_tiff: bool,
    pub directories: Vec<DirectoryState>,
}

impl HandlerState {
    /// Parses every directory of the container behind `reader`
    pub fn read(reader: &mut dyn SeekableReader, connection: &str) -> TiffResult<Self> {
        let mut tiff_reader = TiffReader::new();
        let tiff = tiff_reader.read(reader)?;

        let mut directories = Vec::with_capacity(tiff.ifds.len());
        for ifd in &tiff.ifds {
            directories.push(DirectoryState::from_ifd(reader, &tiff_reader, ifd)?);
        }

        debug!("Built handler state for {} with {} directories", connection, directories.len());

        Ok(HandlerState {
            connection: connection.to_string(),
            byte_order: tiff.byte_order,
            big_tiff: tiff.is_big_tiff,
            directories,
        })
    }

    pub fn number_of_directories(&self) -> usize {
        self.directories.len()
    }

    pub fn directory(&self, index: usize) -> Option<&DirectoryState> {
        self.directories.get(index)
    }

    pub fn to_toml_string(&self) -> TiffResult<String> {
        toml::to_string(self)
            .map_err(|e| TiffError::GenericError(format!("Cannot serialize handler state: {}", e)))
    }

    pub fn from_toml_str(content: &str) -> TiffResult<Self> {
        toml::from_str(content)
            .map_err(|e| TiffError::GenericError(format!("Invalid handler state: {}", e)))
    }

    /// Writes the snapshot as TOML
    pub fn save<P: AsRef<Path>>(&self, path: P) -> TiffResult<()> {
        let content = self.to_toml_string()?;
        fs::write(path.as_ref(), content)?;
        info!("Saved handler state to {}", path.as_ref().display());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> TiffResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }
}
