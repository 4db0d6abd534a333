//! End-of-run reporting: completion summary and the delta stats table.

use std::path::{Path, PathBuf};
use std::time::Duration;

use dirsync_core::{MirrorSummary, StatsLedger, SyncAction, SyncStats};

/// Print one reported walker action, verb first.
pub fn print_action(action: &SyncAction) {
    println!("{:<14} {}", action.kind.verb(), action.path.display());
}

/// Print the one-line completion summary.
pub fn print_summary(summary: &MirrorSummary, dry_run: bool, elapsed: Duration) {
    println!(
        "Mirror{} complete: {} file(s), {} dir(s) created, {} symlink(s) in {:.2?}",
        if dry_run { " (dry run)" } else { "" },
        summary.files_synced,
        summary.dirs_created,
        summary.symlinks_synced,
        elapsed
    );
    if summary.files_removed > 0 || summary.dirs_removed > 0 {
        println!(
            "• Deleted: {} file(s), {} dir(s)",
            summary.files_removed, summary.dirs_removed
        );
    }
}

/// Print per-file delta accounting sorted by path, then a totals line.
pub fn print_delta_stats(ledger: &StatsLedger, destination: &Path) {
    let snapshot = ledger.snapshot();
    if snapshot.is_empty() {
        println!("Delta transfer stats: no files processed.");
        return;
    }

    let dest_root = destination
        .canonicalize()
        .unwrap_or_else(|_| destination.to_path_buf());

    let mut entries: Vec<(PathBuf, SyncStats)> = snapshot.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut total = SyncStats::default();
    println!("Delta transfer stats:");
    for (path, stats) in &entries {
        total.total_bytes += stats.total_bytes;
        total.bytes_transferred += stats.bytes_transferred;
        total.bytes_reused += stats.bytes_reused;

        let display = path.strip_prefix(&dest_root).unwrap_or(path);
        println!(
            "  {}: transferred {} bytes, reused {} bytes, saved {} bytes",
            display.display(),
            stats.bytes_transferred,
            stats.bytes_reused,
            stats.bytes_saved()
        );
    }
    println!(
        "Total: transferred {} bytes, reused {} bytes, saved {} bytes ({})",
        total.bytes_transferred,
        total.bytes_reused,
        total.bytes_saved(),
        format_bytes(total.bytes_saved())
    );
}

pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    if bytes == 0 {
        return "0 B".to_owned();
    }
    let mut value = bytes as f64;
    let mut unit = 0usize;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[unit])
    } else {
        format!("{:.2} {}", value, UNITS[unit])
    }
}
