//! Per-destination byte accounting.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Byte accounting for one synced destination file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub total_bytes: u64,
    pub bytes_transferred: u64,
    pub bytes_reused: u64,
}

impl SyncStats {
    pub fn new(total_bytes: u64, bytes_transferred: u64, bytes_reused: u64) -> Self {
        Self {
            total_bytes,
            bytes_transferred,
            bytes_reused,
        }
    }

    /// Bytes that did not need transferring, floored at zero.
    pub fn bytes_saved(&self) -> u64 {
        self.total_bytes.saturating_sub(self.bytes_transferred)
    }
}

/// Mapping of canonical destination path to its latest `SyncStats`.
///
/// Owned by a single syncer; not safe to share across threads without
/// external synchronisation. Keys are canonicalised so lookups are stable
/// regardless of how the caller spells the path.
#[derive(Debug, Default)]
pub struct StatsLedger {
    entries: HashMap<PathBuf, SyncStats>,
}

impl StatsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn canonical(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
    }

    /// Record stats for `destination`, replacing any earlier entry.
    pub fn record(&mut self, destination: &Path, stats: SyncStats) {
        self.entries.insert(Self::canonical(destination), stats);
    }

    pub fn get(&self, destination: &Path) -> Option<&SyncStats> {
        self.entries.get(&Self::canonical(destination))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read-only copy of the full map.
    pub fn snapshot(&self) -> HashMap<PathBuf, SyncStats> {
        self.entries.clone()
    }
}
