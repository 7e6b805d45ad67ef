// SiteLog - platform/file_log.rs
//
// Hourly log file persistence. Each write is an independent
// open-append-close cycle: the file is opened in append mode and the whole
// line goes out in a single `write_all`, so concurrent writers interleave
// whole lines only.

use crate::core::rotation::{self, LogFileHandle};
use crate::platform::config::FileLogConfig;
use crate::util::error::FileLogError;
use chrono::NaiveDateTime;
use std::fs::OpenOptions;
use std::io::{self, Write};

/// Appends lines to `<directory>/<prefix><yyyy-MM-dd_HH>.log`.
#[derive(Debug, Clone)]
pub struct FileLogWriter {
    config: FileLogConfig,
}

impl FileLogWriter {
    pub fn new(config: FileLogConfig) -> Self {
        Self { config }
    }

    /// The file for a write at local time `at`.
    pub fn handle_at(&self, at: &NaiveDateTime) -> LogFileHandle {
        LogFileHandle::resolve(self.config.directory(), self.config.prefix(), at)
    }

    /// Create the bucket file if it does not exist yet.
    ///
    /// Returns `true` when this call created it. Losing a creation race to
    /// another writer counts as already existing.
    pub fn ensure_file(&self, handle: &LogFileHandle) -> Result<bool, FileLogError> {
        if handle.path.exists() {
            return Ok(false);
        }
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&handle.path)
        {
            Ok(_) => {
                tracing::debug!(path = %handle.path.display(), "Created log file");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(source) => Err(FileLogError::Create {
                path: handle.path.clone(),
                source,
            }),
        }
    }

    /// Append one already formatted line.
    pub fn append(&self, handle: &LogFileHandle, line: &str) -> Result<(), FileLogError> {
        let to_err = |source| FileLogError::Append {
            path: handle.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .append(true)
            .open(&handle.path)
            .map_err(to_err)?;
        file.write_all(line.as_bytes()).map_err(to_err)
    }

    /// Format and append a record written at `at`.
    pub fn write_at(
        &self,
        handle: &LogFileHandle,
        at: &NaiveDateTime,
        header: &str,
        body: &str,
    ) -> Result<(), FileLogError> {
        self.append(handle, &rotation::format_line(at, header, body))
    }
}
