//! Append-only durable log store.
//!
//! # Responsibility
//! - Append one formatted record line per mutation, in insertion order.
//! - Sync per record so a crash loses at most the record in flight.
//!
//! # Invariants
//! - Strict append only: no rewrite, no deletion, no reordering.
//! - Single-writer: the store assumes the log file is exclusively owned by
//!   this process; cross-process locking is out of scope.

use crate::wal::record::WalRecord;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub type WalResult<T> = Result<T, WalError>;

/// Errors from durable log access.
#[derive(Debug)]
pub enum WalError {
    Io(io::Error),
}

impl Display for WalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "write-ahead log I/O error: {err}"),
        }
    }
}

impl Error for WalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for WalError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Append-only text log backed by one UTF-8 file.
#[derive(Debug)]
pub struct WalStore {
    path: PathBuf,
}

impl WalStore {
    /// Prepares a store at the given path, creating parent directories.
    ///
    /// The file itself is created lazily on first append, so a fresh boot
    /// with no mutations leaves no log behind.
    pub fn open(path: &Path) -> WalResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record as a single line and syncs it to disk.
    ///
    /// Failures surface to the mutating caller; the in-memory mutation may
    /// already be applied at that point, an accepted divergence window.
    pub fn append(&mut self, record: &WalRecord) -> WalResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(format!("{record}\n").as_bytes())?;
        file.sync_data()?;
        Ok(())
    }
}
