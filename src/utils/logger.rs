//! Logger utility for application-wide logging
//!
//! A `log` backend that mirrors every record to the console and,
//! optionally, to a log file. The CLI installs it when a log file is
//! requested and falls back to `env_logger` otherwise.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use log::{LevelFilter, Log, Metadata, Record};

/// Console logger with an optional file copy
pub struct Logger {
    file: Mutex<Option<File>>,
    level: LevelFilter,
}

impl Logger {
    /// Creates a logger appending to `log_file`
    pub fn new(log_file: &str, level: LevelFilter) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(Path::new(log_file))?;

        Ok(Logger {
            file: Mutex::new(Some(file)),
            level,
        })
    }

    /// Creates a logger that only writes to the console
    pub fn console(level: LevelFilter) -> Self {
        Logger {
            file: Mutex::new(None),
            level,
        }
    }

    fn file(&self) -> MutexGuard<'_, Option<File>> {
        // A panic while holding the lock leaves the file usable.
        match self.file.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Writes a message to the log file, if there is one
    pub fn log(&self, message: &str) -> io::Result<()> {
        if let Some(file) = self.file().as_mut() {
            writeln!(file, "{}", message)?;
            file.flush()?;
        }
        Ok(())
    }

    pub fn has_file(&self) -> bool {
        self.file().is_some()
    }

    /// Installs a logger writing to `log_file` as the global `log` backend
    pub fn init_global_logger(log_file: &str, level: LevelFilter) -> io::Result<()> {
        let global_logger = Logger::new(log_file, level)?;

        if log::set_boxed_logger(Box::new(global_logger)).is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }

        log::set_max_level(level);
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("[{}] {}", record.level(), record.args());
            let _ = Logger::log(self, &message);

            println!("{}", message);
        }
    }

    fn flush(&self) {
        if let Some(file) = self.file().as_mut() {
            let _ = file.flush();
        }
    }
}
