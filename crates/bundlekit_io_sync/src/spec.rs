//! Sync specification models and top-level error types.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Input options for `sync_tree`.
#[derive(Debug, Clone)]
pub struct SpecSyncOptions {
    /// Descend into subdirectories of a directory source.
    pub if_recursive: bool,
    /// Allow replacing destination files that already exist.
    pub if_overwrite: bool,
    /// Skip destination files that are already up to date (mtime + size).
    pub if_incremental: bool,
    /// Maximum worker threads for the file-copy stage.
    /// `None` keeps the reference sequential behavior.
    pub num_workers_max: Option<usize>,
    /// Do not recreate source directories that contain no files.
    pub if_skip_empty_dirs: bool,
}

impl Default for SpecSyncOptions {
    fn default() -> Self {
        Self {
            if_recursive: true,
            if_overwrite: true,
            if_incremental: false,
            num_workers_max: None,
            if_skip_empty_dirs: false,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Filesystem operation a failure occurred in, for error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumSyncOp {
    /// Initial stat of the source path.
    SourceStat,
    /// Stat/classification of one enumerated entry.
    EntryStat,
    /// Destination directory creation.
    DirCreate,
    /// File byte-content copy.
    FileCopy,
}

impl fmt::Display for EnumSyncOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceStat => write!(f, "source existence check"),
            Self::EntryStat => write!(f, "entry inspection"),
            Self::DirCreate => write!(f, "directory creation"),
            Self::FileCopy => write!(f, "content copy"),
        }
    }
}

/// "Whole call failed" errors; any of these aborts the sync run.
#[derive(Debug)]
pub enum SyncTreeError {
    /// Source path does not exist.
    SourceNotFound(PathBuf),
    /// Source side could not be read.
    PermissionDenied {
        /// Path the access failed on.
        path: PathBuf,
        /// Operation being attempted.
        op: EnumSyncOp,
    },
    /// Destination directory/file could not be created or written.
    DestinationUnwritable {
        /// Destination path that failed.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
    /// Any other IO failure, kept with path and operation context.
    Io {
        /// Path the operation failed on.
        path: PathBuf,
        /// Operation being attempted.
        op: EnumSyncOp,
        /// Underlying IO error text.
        message: String,
    },
}

impl SyncTreeError {
    /// Classify a failed initial source stat.
    pub(crate) fn from_source_stat(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::SourceNotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.to_path_buf(),
                op: EnumSyncOp::SourceStat,
            },
            _ => Self::Io {
                path: path.to_path_buf(),
                op: EnumSyncOp::SourceStat,
                message: error.to_string(),
            },
        }
    }

    /// Classify a failed read-side operation (listing, entry stat).
    pub(crate) fn from_read(path: &Path, op: EnumSyncOp, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.to_path_buf(),
                op,
            },
            _ => Self::Io {
                path: path.to_path_buf(),
                op,
                message: error.to_string(),
            },
        }
    }

    /// Classify a failed write-side operation (mkdir, copy).
    pub(crate) fn from_write(path: &Path, op: EnumSyncOp, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => Self::DestinationUnwritable {
                path: path.to_path_buf(),
                message: format!("{op} blocked ({error})"),
            },
            _ => Self::Io {
                path: path.to_path_buf(),
                op,
                message: error.to_string(),
            },
        }
    }
}

impl fmt::Display for SyncTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceNotFound(path) => {
                write!(f, "Source path not found: {}", path.display())
            }
            Self::PermissionDenied { path, op } => {
                write!(f, "Permission denied during {op}: {}", path.display())
            }
            Self::DestinationUnwritable { path, message } => {
                write!(
                    f,
                    "Failed to write destination {}: {message}",
                    path.display()
                )
            }
            Self::Io { path, op, message } => {
                write!(f, "I/O error during {op} ({}): {message}", path.display())
            }
        }
    }
}

impl std::error::Error for SyncTreeError {}

// #endregion
////////////////////////////////////////////////////////////////////////////////
