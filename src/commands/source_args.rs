//! Arguments shared by every command
//!
//! Turns the input, option file, handler state and band flags into an
//! opened [`TiffTileSource`].

use std::str::FromStr;
use std::sync::Arc;

use clap::ArgMatches;
use log::{info, warn};

use crate::engine::{EngineOptions, TiffTileSource};
use crate::io::stream::FileStreamOpener;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::state::HandlerState;

/// How to open the input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceArgs {
    pub input: String,
    pub config: Option<String>,
    pub state: Option<String>,
    pub save_state: Option<String>,
    pub bands: Option<Vec<u32>>,
    pub no_palette: bool,
    pub starting_res_level: Option<u32>,
}

impl SourceArgs {
    pub fn from_matches(args: &ArgMatches) -> TiffResult<Self> {
        let input = args.get_one::<String>("input")
            .ok_or_else(|| TiffError::GenericError("Missing input file".to_string()))?
            .clone();

        let bands = match args.get_one::<String>("bands") {
            Some(value) => Some(parse_list::<u32>(value, "band list")?),
            None => None,
        };

        let starting_res_level = match args.get_one::<String>("starting-res-level") {
            Some(value) => Some(parse_value::<u32>(value, "starting resolution level")?),
            None => None,
        };

        Ok(SourceArgs {
            input,
            config: args.get_one::<String>("config").cloned(),
            state: args.get_one::<String>("state").cloned(),
            save_state: args.get_one::<String>("save-state").cloned(),
            bands,
            no_palette: args.get_flag("no-palette"),
            starting_res_level,
        })
    }

    /// Engine options from the config file with the flags applied on top
    pub fn options(&self) -> TiffResult<EngineOptions> {
        let mut options = match &self.config {
            Some(path) => EngineOptions::load(path)?,
            None => EngineOptions::default(),
        };

        if self.no_palette {
            options.apply_color_palette_flag = false;
        }
        if let Some(level) = self.starting_res_level {
            options.starting_res_level = level;
        }

        Ok(options)
    }

    /// Opens the input, reusing a saved handler state when one is given
    pub fn open(&self) -> TiffResult<TiffTileSource> {
        let options = self.options()?;
        let mut source = TiffTileSource::with_options(Arc::new(FileStreamOpener::new()), options);

        match &self.state {
            Some(path) => {
                let state = HandlerState::load(path)?;
                source.open_with_state(&self.input, state)?;
            }
            None => source.open(&self.input)?,
        }

        if let Some(bands) = &self.bands {
            if !source.set_output_band_list(bands) {
                warn!("Band list {:?} ignored; {} is not band selectable", bands, self.input);
            }
        }

        if let (Some(path), Some(state)) = (&self.save_state, source.state()) {
            state.save(path)?;
            info!("Saved handler state to {}", path);
        }

        Ok(source)
    }
}

/// Parses one value of a CLI option
pub fn parse_value<T: FromStr>(value: &str, what: &str) -> TiffResult<T> {
    value.trim().parse::<T>()
        .map_err(|_| TiffError::GenericError(format!("Invalid {}: '{}'", what, value)))
}

/// Parses a comma separated CLI list such as `2,1,0`
pub fn parse_list<T: FromStr>(value: &str, what: &str) -> TiffResult<Vec<T>> {
    value.split(',')
        .map(|part| parse_value(part, what))
        .collect()
}
