//! Utility modules for common functionality
//!
//! Logging, progress reporting and tag helpers shared by the parser and
//! the command line front end.

pub mod logger;
pub mod progress;
pub mod tag_utils;
