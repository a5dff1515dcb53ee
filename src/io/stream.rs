//! Connection openers
//!
//! The engine never opens files on its own. It is constructed with a
//! `StreamOpener` and asks it for a reader whenever a connection string
//! has to be turned into bytes.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Cursor};
use std::sync::{Arc, RwLock};

use log::debug;

use crate::io::seekable::SeekableReader;

/// Turns a connection string into a seekable byte stream
pub trait StreamOpener: Send + Sync {
    /// Opens the connection, failing if it does not exist or cannot be read
    fn open(&self, connection: &str) -> io::Result<Box<dyn SeekableReader>>;
}

/// Opens connections as paths on the local file system
#[derive(Debug, Default, Clone)]
pub struct FileStreamOpener {
    buffer_capacity: usize,
}

impl FileStreamOpener {
    pub fn new() -> Self {
        FileStreamOpener { buffer_capacity: 1024 * 1024 }
    }

    /// Uses a custom read buffer size (0 disables buffering)
    pub fn with_buffer_capacity(buffer_capacity: usize) -> Self {
        FileStreamOpener { buffer_capacity }
    }
}

impl StreamOpener for FileStreamOpener {
    fn open(&self, connection: &str) -> io::Result<Box<dyn SeekableReader>> {
        debug!("Opening file stream: {}", connection);
        let file = File::open(connection)?;

        if self.buffer_capacity == 0 {
            Ok(Box::new(file))
        } else {
            Ok(Box::new(BufReader::with_capacity(self.buffer_capacity, file)))
        }
    }
}

/// Serves named in-memory buffers; handy for tests and for data that
/// already lives in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryStreamOpener {
    buffers: Arc<RwLock<HashMap<String, Arc<Vec<u8>>>>>,
}

impl MemoryStreamOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `bytes` under `name`, replacing any previous buffer
    pub fn insert(&self, name: &str, bytes: Vec<u8>) {
        if let Ok(mut buffers) = self.buffers.write() {
            buffers.insert(name.to_string(), Arc::new(bytes));
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.buffers
            .read()
            .map(|buffers| buffers.contains_key(name))
            .unwrap_or(false)
    }
}

/// Read-only view over a shared buffer
struct SharedBytes(Arc<Vec<u8>>);

impl AsRef<[u8]> for SharedBytes {
    fn as_ref(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl StreamOpener for MemoryStreamOpener {
    fn open(&self, connection: &str) -> io::Result<Box<dyn SeekableReader>> {
        let buffers = self.buffers
            .read()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "memory stream registry poisoned"))?;

        match buffers.get(connection) {
            Some(bytes) => {
                debug!("Opening memory stream: {} ({} bytes)", connection, bytes.len());
                Ok(Box::new(Cursor::new(SharedBytes(Arc::clone(bytes)))))
            }
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no in-memory stream named {}", connection),
            )),
        }
    }
}
