//! Seekable reader trait
//!
//! Every byte the engine pulls out of a container goes through a
//! `SeekableReader`, whether it is backed by a file, an in-memory
//! buffer or anything else a [`StreamOpener`](crate::io::stream::StreamOpener)
//! hands back.

use std::io::{Read, Seek, SeekFrom};

/// Trait for readers that can both read and seek
pub trait SeekableReader: Read + Seek + Send + Sync {}

impl<T: Read + Seek + Send + Sync> SeekableReader for T {}

/// Reads exactly `len` bytes at `offset`, returning how many bytes were
/// actually available.
///
/// A short count is not an error here; callers decide whether a partial
/// unit is fatal.
pub fn read_at(reader: &mut dyn SeekableReader, offset: u64, buf: &mut [u8]) -> std::io::Result<usize> {
    reader.seek(SeekFrom::Start(offset))?;

    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(filled)
}
