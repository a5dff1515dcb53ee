//! Engine options
//!
//! The persisted settings of a tile source. Missing keys take their
//! defaults, so an empty document is a valid configuration.

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::tiff::errors::{TiffError, TiffResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Expand color mapped pages to RGB
    pub apply_color_palette_flag: bool,
    /// Output band order; only honored for band-selectable containers
    pub bands: Option<Vec<u32>>,
    /// Level offset when the container serves as an overview
    pub starting_res_level: u32,
    /// Read scanline directories a block of lines at a time
    pub buffer_scan_line_reads: bool,
    /// A disabled source serves blank tiles
    pub enabled: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            apply_color_palette_flag: true,
            bands: None,
            starting_res_level: 0,
            buffer_scan_line_reads: true,
            enabled: true,
        }
    }
}

impl EngineOptions {
    pub fn from_toml_str(content: &str) -> TiffResult<Self> {
        toml::from_str(content).map_err(|e| TiffError::GenericError(format!("Invalid engine options: {}", e)))
    }

    pub fn to_toml_string(&self) -> TiffResult<String> {
        toml::to_string(self).map_err(|e| TiffError::GenericError(format!("Cannot serialize engine options: {}", e)))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> TiffResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let options = Self::from_toml_str(&content)?;
        info!("Loaded engine options from {}", path.as_ref().display());
        Ok(options)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> TiffResult<()> {
        fs::write(path.as_ref(), self.to_toml_string()?)?;
        Ok(())
    }
}
