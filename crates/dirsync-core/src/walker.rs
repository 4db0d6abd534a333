//! Directory tree reconciliation.
//!
//! Walks the source tree creating directories, dispatching regular files to
//! the strategy, and replicating symlinks, then removes whatever the
//! destination holds that the source does not. Kind conflicts (a directory
//! or symlink standing where a file belongs, and vice versa) are resolved in
//! favour of the source before the strategy runs, so `sync_file` only ever
//! sees a regular file or an absent path at the destination.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::action::{SyncAction, SyncActionKind};
use crate::compare::files_identical;
use crate::errors::{IoResultExt, SyncError, SyncErrorKind, SyncResult};
use crate::strategy::FileSyncer;

/// Walk behaviour switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct MirrorOptions {
    /// Report every action without touching the filesystem.
    pub dry_run: bool,
}

/// Counters for one mirror run, grouped by action family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorSummary {
    pub files_synced: usize,
    pub dirs_created: usize,
    pub symlinks_synced: usize,
    pub files_removed: usize,
    pub dirs_removed: usize,
}

/// Mirror `source` into `destination` using `syncer` for file content.
///
/// Every action taken (or planned, on a dry run) is passed to `report` with
/// a destination-relative path, in walk order.
pub fn mirror(
    source: &Path,
    destination: &Path,
    syncer: &mut FileSyncer,
    options: MirrorOptions,
    mut report: impl FnMut(&SyncAction),
) -> SyncResult<MirrorSummary> {
    let src_md = fs::symlink_metadata(source).map_err(|_| {
        SyncError::missing_source(format!(
            "source directory does not exist: {}",
            source.display()
        ))
    })?;
    if !src_md.is_dir() {
        return Err(SyncError::missing_source(format!(
            "source path is not a directory: {}",
            source.display()
        )));
    }

    let mut summary = MirrorSummary::default();

    if !options.dry_run {
        fs::create_dir_all(destination).with_path(destination)?;
    }

    copy_missing_and_updated(
        source,
        destination,
        syncer,
        options,
        &mut summary,
        &mut report,
    )?;
    remove_extraneous(source, destination, options, &mut summary, &mut report)?;

    Ok(summary)
}

fn copy_missing_and_updated(
    source: &Path,
    destination: &Path,
    syncer: &mut FileSyncer,
    options: MirrorOptions,
    summary: &mut MirrorSummary,
    report: &mut impl FnMut(&SyncAction),
) -> SyncResult<()> {
    for entry in WalkDir::new(source).follow_links(false).min_depth(1) {
        let entry =
            entry.map_err(|err| SyncError::new(SyncErrorKind::IoFailure, err.to_string()))?;
        let rel = relative(entry.path(), source);
        let target = destination.join(rel);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            sync_dir(rel, &target, options, summary, report)?;
        } else if file_type.is_symlink() {
            sync_symlink(entry.path(), rel, &target, options, summary, report)?;
        } else {
            sync_regular_file(entry.path(), rel, &target, syncer, options, summary, report)?;
        }
    }
    Ok(())
}

fn sync_dir(
    rel: &Path,
    target: &Path,
    options: MirrorOptions,
    summary: &mut MirrorSummary,
    report: &mut impl FnMut(&SyncAction),
) -> SyncResult<()> {
    match fs::symlink_metadata(target) {
        Ok(md) if md.is_dir() => {
            report(&SyncAction::new(SyncActionKind::SkipDir, rel));
            return Ok(());
        }
        Ok(_) => {
            // A file or symlink occupies the directory's spot.
            if !options.dry_run {
                fs::remove_file(target).with_path(target)?;
            }
        }
        Err(_) => {}
    }

    if !options.dry_run {
        fs::create_dir_all(target).with_path(target)?;
    }
    report(&SyncAction::new(SyncActionKind::CreateDir, rel));
    summary.dirs_created += 1;
    Ok(())
}

fn sync_regular_file(
    source: &Path,
    rel: &Path,
    target: &Path,
    syncer: &mut FileSyncer,
    options: MirrorOptions,
    summary: &mut MirrorSummary,
    report: &mut impl FnMut(&SyncAction),
) -> SyncResult<()> {
    let kind = match fs::symlink_metadata(target) {
        Err(_) => SyncActionKind::CopyFile,
        Ok(md) if md.file_type().is_symlink() => {
            if !options.dry_run {
                fs::remove_file(target).with_path(target)?;
            }
            SyncActionKind::UpdateFile
        }
        Ok(md) if md.is_dir() => {
            if !options.dry_run {
                fs::remove_dir_all(target).with_path(target)?;
            }
            SyncActionKind::UpdateFile
        }
        Ok(_) => {
            if files_identical(source, target)? {
                SyncActionKind::SkipFile
            } else {
                SyncActionKind::UpdateFile
            }
        }
    };

    if !options.dry_run {
        syncer.sync_file(source, target)?;
    }
    report(&SyncAction::new(kind, rel));
    summary.files_synced += 1;
    Ok(())
}

fn sync_symlink(
    source: &Path,
    rel: &Path,
    target: &Path,
    options: MirrorOptions,
    summary: &mut MirrorSummary,
    report: &mut impl FnMut(&SyncAction),
) -> SyncResult<()> {
    let link_target = fs::read_link(source).with_path(source)?;

    let kind = match fs::symlink_metadata(target) {
        Err(_) => SyncActionKind::CreateSymlink,
        Ok(md) if md.file_type().is_symlink() => {
            if fs::read_link(target).with_path(target)? == link_target {
                report(&SyncAction::new(SyncActionKind::SkipSymlink, rel));
                summary.symlinks_synced += 1;
                return Ok(());
            }
            if !options.dry_run {
                fs::remove_file(target).with_path(target)?;
            }
            SyncActionKind::UpdateSymlink
        }
        Ok(md) if md.is_dir() => {
            if !options.dry_run {
                fs::remove_dir_all(target).with_path(target)?;
            }
            SyncActionKind::UpdateSymlink
        }
        Ok(_) => {
            if !options.dry_run {
                fs::remove_file(target).with_path(target)?;
            }
            SyncActionKind::UpdateSymlink
        }
    };

    if !options.dry_run && !create_symlink(&link_target, target)? {
        report(&SyncAction::new(SyncActionKind::SkipSymlink, rel));
        return Ok(());
    }
    report(&SyncAction::new(kind, rel));
    summary.symlinks_synced += 1;
    Ok(())
}

/// Returns whether a link was actually created.
#[cfg(unix)]
fn create_symlink(link_target: &Path, target: &Path) -> SyncResult<bool> {
    std::os::unix::fs::symlink(link_target, target).with_path(target)?;
    Ok(true)
}

#[cfg(not(unix))]
fn create_symlink(link_target: &Path, target: &Path) -> SyncResult<bool> {
    let _ = link_target;
    log::warn!(
        "symlink replication is not supported here, skipping {}",
        target.display()
    );
    Ok(false)
}

fn remove_extraneous(
    source: &Path,
    destination: &Path,
    options: MirrorOptions,
    summary: &mut MirrorSummary,
    report: &mut impl FnMut(&SyncAction),
) -> SyncResult<()> {
    if fs::symlink_metadata(destination).is_err() {
        return Ok(());
    }

    let mut files: Vec<PathBuf> = Vec::new();
    let mut dirs: Vec<PathBuf> = Vec::new();

    for entry in WalkDir::new(destination).follow_links(false).min_depth(1) {
        let entry =
            entry.map_err(|err| SyncError::new(SyncErrorKind::IoFailure, err.to_string()))?;
        let rel = relative(entry.path(), destination);
        if fs::symlink_metadata(source.join(rel)).is_ok() {
            continue;
        }
        if entry.file_type().is_dir() {
            dirs.push(rel.to_path_buf());
        } else {
            files.push(rel.to_path_buf());
        }
    }

    // Files go first so directories are empty by the time they are removed,
    // deepest first.
    for rel in &files {
        if !options.dry_run {
            let path = destination.join(rel);
            fs::remove_file(&path).with_path(&path)?;
        }
        report(&SyncAction::new(SyncActionKind::RemoveFile, rel.clone()));
        summary.files_removed += 1;
    }

    dirs.sort_by_key(|rel| rel.components().count());
    dirs.reverse();
    for rel in &dirs {
        if !options.dry_run {
            let path = destination.join(rel);
            fs::remove_dir(&path).with_path(&path)?;
        }
        report(&SyncAction::new(SyncActionKind::RemoveDir, rel.clone()));
        summary.dirs_removed += 1;
    }

    Ok(())
}

fn relative<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}
