//! CLI command implementations
//!
//! Each mode of the `rastertile` binary is a [`Command`] built by
//! [`RastertileCommandFactory`] from the parsed arguments.

pub mod command_traits;
pub mod source_args;
pub mod info_command;
pub mod tile_command;
pub mod scan_command;

pub use command_traits::{Command, CommandFactory};
pub use info_command::InfoCommand;
pub use scan_command::ScanCommand;
pub use source_args::SourceArgs;
pub use tile_command::TileCommand;

use clap::ArgMatches;

use crate::tiff::errors::TiffResult;
use crate::utils::logger::Logger;

/// Picks the command for a set of CLI arguments
pub struct RastertileCommandFactory;

impl RastertileCommandFactory {
    pub fn new() -> Self {
        RastertileCommandFactory
    }
}

impl Default for RastertileCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CommandFactory<'a> for RastertileCommandFactory {
    fn create_command(&self, args: &ArgMatches, logger: &'a Logger) -> TiffResult<Box<dyn Command + 'a>> {
        if args.get_one::<String>("tile").is_some() {
            Ok(Box::new(TileCommand::new(args, logger)?))
        } else if args.get_flag("scan") {
            Ok(Box::new(ScanCommand::new(args, logger)?))
        } else {
            // --info and no mode at all both summarize the container
            Ok(Box::new(InfoCommand::new(args, logger)?))
        }
    }
}
