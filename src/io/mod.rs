//! I/O plumbing
//!
//! Seekable readers, byte order strategies and the connection openers the
//! engine is constructed with.

pub mod seekable;
pub mod byte_order;
pub mod stream;

pub use stream::{FileStreamOpener, MemoryStreamOpener, StreamOpener};
