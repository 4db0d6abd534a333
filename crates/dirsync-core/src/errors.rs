//! Typed errors surfaced by every fallible sync operation.
//!
//! The kinds map onto the failure surface callers care about:
//! - BadArgument: rejected configuration (block size, strategy mismatch)
//! - PathRefused: the strategy will not write through a symlink destination
//! - IoFailure: any underlying read/write/rename/stat error
//! - MissingSource: the source is absent or not a directory

use std::fmt;
use std::io;
use std::path::Path;

/// Kind of sync failure, for callers that dispatch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncErrorKind {
    BadArgument,
    PathRefused,
    IoFailure,
    MissingSource,
}

/// Error type for all sync operations.
#[derive(Debug)]
pub struct SyncError {
    kind: SyncErrorKind,
    message: String,
}

impl SyncError {
    pub fn new(kind: SyncErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn bad_argument(message: impl Into<String>) -> Self {
        Self::new(SyncErrorKind::BadArgument, message)
    }

    pub fn path_refused(path: &Path) -> Self {
        Self::new(
            SyncErrorKind::PathRefused,
            format!("refusing to write through symbolic link: {}", path.display()),
        )
    }

    pub fn missing_source(message: impl Into<String>) -> Self {
        Self::new(SyncErrorKind::MissingSource, message)
    }

    pub fn kind(&self) -> SyncErrorKind {
        self.kind
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SyncError {}

impl From<io::Error> for SyncError {
    fn from(err: io::Error) -> Self {
        Self::new(SyncErrorKind::IoFailure, err.to_string())
    }
}

/// Result type for sync operations.
pub type SyncResult<T> = std::result::Result<T, SyncError>;

/// Attach the offending path when an io result crosses into the sync layer.
pub(crate) trait IoResultExt<T> {
    fn with_path(self, path: &Path) -> SyncResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path(self, path: &Path) -> SyncResult<T> {
        self.map_err(|err| {
            SyncError::new(
                SyncErrorKind::IoFailure,
                format!("{}: {}", path.display(), err),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn path_refused_names_the_link() {
        let err = SyncError::path_refused(&PathBuf::from("/tmp/link"));
        assert_eq!(err.kind(), SyncErrorKind::PathRefused);
        assert!(err.to_string().contains("/tmp/link"));
    }

    #[test]
    fn io_errors_become_io_failures() {
        let io = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = SyncError::from(io);
        assert_eq!(err.kind(), SyncErrorKind::IoFailure);
    }

    #[test]
    fn with_path_prefixes_the_message() {
        let res: io::Result<()> = Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let err = res.with_path(&PathBuf::from("a/b.txt")).unwrap_err();
        assert!(err.to_string().starts_with("a/b.txt: "));
    }
}
