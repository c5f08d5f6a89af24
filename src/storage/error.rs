//! Typed storage failures
//!
//! The two cases callers must tell apart: `Corrupt` means the bytes on disk
//! are unreadable as records (operator decision: restore a backup or
//! reinitialize), `Io` means the filesystem refused us (operation not
//! committed).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Persisted data failed to parse or validate; nothing was loaded
    #[error("{}: corrupt record at line {line}: {reason}", path.display())]
    Corrupt {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// Filesystem operation failed; the write is not committed
    #[error("{}: {op} failed", path.display())]
    Io {
        path: PathBuf,
        op: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn corrupt(path: &std::path::Path, line: usize, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: &std::path::Path, op: &'static str, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            op,
            source,
        }
    }

    /// True for the corruption case (operator intervention needed)
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}
