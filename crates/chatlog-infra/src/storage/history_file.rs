//! Binary history file store.
//!
//! Implements the `HistoryStore` trait from `chatlog-core` on top of the
//! fixed-record codec in [`record`](super::record).

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chatlog_core::repository::history::HistoryStore;
use chatlog_types::error::StorageError;
use chatlog_types::message::Message;
use tracing::debug;

use super::record::{RecordReader, write_records};

/// History store backed by a single binary file.
///
/// Saving truncates and rewrites the whole file. There is no partial-write
/// recovery: a crash mid-save can leave a shorter file, whose trailing
/// partial record is ignored on the next load.
#[derive(Debug, Clone)]
pub struct HistoryFile {
    path: PathBuf,
}

impl HistoryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Read every record. With `exact`, an open failure other than a missing
    /// file, or a read error mid-stream, is [`StorageError::Unreadable`].
    fn read(&self, exact: bool) -> Result<Vec<Message>, StorageError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if exact && err.kind() != ErrorKind::NotFound => {
                return Err(self.unreadable(err));
            }
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "history file not opened");
                return Err(StorageError::NoSaveFile {
                    path: self.path.clone(),
                });
            }
        };

        let mut reader = RecordReader::new(BufReader::new(file));
        let messages: Vec<Message> = reader.by_ref().collect();
        if let Some(err) = reader.take_error().filter(|_| exact) {
            return Err(self.unreadable(err));
        }

        debug!(path = %self.path.display(), count = messages.len(), "history file read");
        Ok(messages)
    }

    fn unreadable(&self, source: std::io::Error) -> StorageError {
        StorageError::Unreadable {
            path: self.path.clone(),
            source,
        }
    }
}

impl HistoryStore for HistoryFile {
    fn save<'a, I>(&self, messages: I) -> Result<usize, StorageError>
    where
        I: IntoIterator<Item = &'a Message>,
    {
        let file = File::create(&self.path).map_err(|e| self.io_error(e))?;
        let mut writer = BufWriter::new(file);
        let written = write_records(&mut writer, messages).map_err(|e| self.io_error(e))?;
        writer.flush().map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), written, "history file written");
        Ok(written)
    }

    fn load(&self) -> Result<Vec<Message>, StorageError> {
        self.read(false)
    }

    fn load_exact(&self) -> Result<Vec<Message>, StorageError> {
        self.read(true)
    }
}
