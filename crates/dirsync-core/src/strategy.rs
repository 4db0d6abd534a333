//! File-level sync strategies.
//!
//! A `FileSyncer` owns the chosen mode and the stats ledger, and exposes the
//! single `sync_file` entry point the tree walker drives. Whole-copy mirrors
//! files wholesale; delta reuses unchanged destination blocks.

use std::fs;
use std::path::Path;

use log::debug;

use crate::compare::files_identical;
use crate::delta::delta_sync;
use crate::errors::{IoResultExt, SyncError, SyncResult};
use crate::metadata::preserve_metadata;
use crate::stats::{StatsLedger, SyncStats};

/// Default block size for the delta mode, in bytes.
pub const DEFAULT_BLOCK_SIZE: usize = 64 * 1024;

/// How individual files are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    WholeCopy,
    Delta { block_size: usize },
}

/// Strategy selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyChoice {
    Copy,
    Delta,
}

/// Per-file synchroniser: mode dispatch plus the byte-accounting ledger.
#[derive(Debug)]
pub struct FileSyncer {
    mode: SyncMode,
    ledger: StatsLedger,
}

impl FileSyncer {
    pub fn whole_copy() -> Self {
        Self {
            mode: SyncMode::WholeCopy,
            ledger: StatsLedger::new(),
        }
    }

    pub fn delta(block_size: usize) -> SyncResult<Self> {
        if block_size == 0 {
            return Err(SyncError::bad_argument(
                "--block-size must be a positive integer",
            ));
        }
        Ok(Self {
            mode: SyncMode::Delta { block_size },
            ledger: StatsLedger::new(),
        })
    }

    /// Build a syncer from the CLI surface, validating the combination.
    pub fn from_options(strategy: StrategyChoice, block_size: Option<i64>) -> SyncResult<Self> {
        match strategy {
            StrategyChoice::Copy => {
                if block_size.is_some() {
                    return Err(SyncError::bad_argument(
                        "--block-size can only be used with --strategy delta",
                    ));
                }
                Ok(Self::whole_copy())
            }
            StrategyChoice::Delta => match block_size {
                Some(size) if size <= 0 => Err(SyncError::bad_argument(
                    "--block-size must be a positive integer",
                )),
                Some(size) => Self::delta(size as usize),
                None => Self::delta(DEFAULT_BLOCK_SIZE),
            },
        }
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    pub fn is_delta(&self) -> bool {
        matches!(self.mode, SyncMode::Delta { .. })
    }

    pub fn ledger(&self) -> &StatsLedger {
        &self.ledger
    }

    /// Bring `destination` up to date with `source`.
    ///
    /// On success the destination holds the source's bytes and metadata and
    /// the ledger holds one entry for it. Symlink destinations are refused
    /// before anything is touched.
    pub fn sync_file(&mut self, source: &Path, destination: &Path) -> SyncResult<()> {
        let dest_is_symlink = destination
            .symlink_metadata()
            .map(|md| md.file_type().is_symlink())
            .unwrap_or(false);
        if dest_is_symlink {
            return Err(SyncError::path_refused(destination));
        }

        match self.mode {
            SyncMode::WholeCopy => self.copy_sync(source, destination),
            SyncMode::Delta { block_size } => {
                delta_sync(source, destination, block_size, &mut self.ledger)
            }
        }
    }

    fn copy_sync(&mut self, source: &Path, destination: &Path) -> SyncResult<()> {
        if !destination.exists() || !files_identical(source, destination)? {
            let copied = fs::copy(source, destination).with_path(destination)?;
            preserve_metadata(source, destination)?;
            self.ledger
                .record(destination, SyncStats::new(copied, copied, 0));
            return Ok(());
        }

        debug!("unchanged {}", destination.display());
        let len = fs::metadata(source).with_path(source)?.len();
        preserve_metadata(source, destination)?;
        self.ledger
            .record(destination, SyncStats::new(len, 0, len));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SyncErrorKind;
    use tempfile::tempdir;

    #[test]
    fn copy_mode_rejects_block_size() {
        let err = FileSyncer::from_options(StrategyChoice::Copy, Some(4096)).unwrap_err();
        assert_eq!(err.kind(), SyncErrorKind::BadArgument);
    }

    #[test]
    fn delta_mode_rejects_non_positive_block_size() {
        for size in [0, -1] {
            let err = FileSyncer::from_options(StrategyChoice::Delta, Some(size)).unwrap_err();
            assert_eq!(err.kind(), SyncErrorKind::BadArgument);
        }
    }

    #[test]
    fn delta_mode_defaults_the_block_size() {
        let syncer = FileSyncer::from_options(StrategyChoice::Delta, None).unwrap();
        assert_eq!(
            syncer.mode(),
            SyncMode::Delta {
                block_size: DEFAULT_BLOCK_SIZE
            }
        );
    }

    #[cfg(unix)]
    #[test]
    fn whole_copy_refuses_symlink_destination() {
        let tmp = tempdir().unwrap();
        let source = tmp.path().join("src.txt");
        let target = tmp.path().join("target.txt");
        let link = tmp.path().join("link.txt");
        std::fs::write(&source, b"data").unwrap();
        std::fs::write(&target, b"original").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let mut syncer = FileSyncer::whole_copy();
        let err = syncer.sync_file(&source, &link).unwrap_err();
        assert_eq!(err.kind(), SyncErrorKind::PathRefused);
        // Neither the link nor its target moved.
        assert_eq!(std::fs::read(&target).unwrap(), b"original");
        assert_eq!(std::fs::read_link(&link).unwrap(), target);
    }

    #[test]
    fn whole_copy_skips_identical_content() {
        let tmp = tempdir().unwrap();
        let source = tmp.path().join("src.txt");
        let destination = tmp.path().join("dst.txt");
        std::fs::write(&source, b"same").unwrap();
        std::fs::write(&destination, b"same").unwrap();

        let mut syncer = FileSyncer::whole_copy();
        syncer.sync_file(&source, &destination).unwrap();

        let stats = syncer.ledger().get(&destination).unwrap();
        assert_eq!(stats.bytes_transferred, 0);
        assert_eq!(stats.bytes_reused, 4);
    }

    #[test]
    fn whole_copy_transfers_changed_content() {
        let tmp = tempdir().unwrap();
        let source = tmp.path().join("src.txt");
        let destination = tmp.path().join("dst.txt");
        std::fs::write(&source, b"new content").unwrap();
        std::fs::write(&destination, b"old content").unwrap();

        let mut syncer = FileSyncer::whole_copy();
        syncer.sync_file(&source, &destination).unwrap();

        assert_eq!(std::fs::read(&destination).unwrap(), b"new content");
        let stats = syncer.ledger().get(&destination).unwrap();
        assert_eq!(stats.bytes_transferred, 11);
    }
}
