//! Local directory mirroring with whole-copy and block-delta strategies.

pub mod action;
pub mod checksum;
pub mod compare;
mod delta;
pub mod errors;
pub mod logger;
pub mod metadata;
pub mod signature;
pub mod stats;
pub mod strategy;
pub mod walker;

pub use action::{SyncAction, SyncActionKind};
pub use errors::{SyncError, SyncErrorKind, SyncResult};
pub use stats::{StatsLedger, SyncStats};
pub use strategy::{FileSyncer, StrategyChoice, SyncMode, DEFAULT_BLOCK_SIZE};
pub use walker::{mirror, MirrorOptions, MirrorSummary};
