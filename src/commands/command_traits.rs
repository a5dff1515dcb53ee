//! Command pattern interfaces
//!
//! Every CLI mode is a `Command`; the factory picks one from the parsed
//! arguments.

use crate::tiff::errors::TiffResult;
use crate::utils::logger::Logger;

/// An executable CLI operation
pub trait Command {
    fn execute(&self) -> TiffResult<()>;
}

/// Creates the command matching a set of CLI arguments
pub trait CommandFactory<'a> {
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger recording command outcomes
    fn create_command(&self, args: &clap::ArgMatches, logger: &'a Logger) -> TiffResult<Box<dyn Command + 'a>>;
}
