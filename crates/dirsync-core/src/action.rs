//! Actions reported while the walker reconciles the trees.

use std::path::PathBuf;

/// What the walker did (or, on a dry run, would do) to one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncActionKind {
    CreateDir,
    CopyFile,
    UpdateFile,
    CreateSymlink,
    UpdateSymlink,
    RemoveFile,
    RemoveDir,
    SkipFile,
    SkipDir,
    SkipSymlink,
}

impl SyncActionKind {
    /// Stable lowercase verb for display.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::CreateDir => "create_dir",
            Self::CopyFile => "copy_file",
            Self::UpdateFile => "update_file",
            Self::CreateSymlink => "create_symlink",
            Self::UpdateSymlink => "update_symlink",
            Self::RemoveFile => "remove_file",
            Self::RemoveDir => "remove_dir",
            Self::SkipFile => "skip_file",
            Self::SkipDir => "skip_dir",
            Self::SkipSymlink => "skip_symlink",
        }
    }
}

/// One reported action. `path` is relative to the destination root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncAction {
    pub kind: SyncActionKind,
    pub path: PathBuf,
}

impl SyncAction {
    pub fn new(kind: SyncActionKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}
