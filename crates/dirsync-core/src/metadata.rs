//! Source metadata propagation onto freshly synced destinations.

use std::fs;
use std::path::Path;

use filetime::FileTime;
use log::debug;

use crate::errors::{IoResultExt, SyncResult};

/// Copy mode, atime and mtime from `src` onto `dst`.
///
/// The source is stat'ed without following symlinks. A failure to apply the
/// permissions or timestamps is logged and tolerated; only the stat itself
/// is fatal.
pub fn preserve_metadata(src: &Path, dst: &Path) -> SyncResult<()> {
    let md = fs::symlink_metadata(src).with_path(src)?;

    if fs::set_permissions(dst, md.permissions()).is_err() {
        debug!("could not preserve permissions for {}", dst.display());
    }

    let atime = FileTime::from_last_access_time(&md);
    let mtime = FileTime::from_last_modification_time(&md);
    if filetime::set_file_times(dst, atime, mtime).is_err() {
        debug!("could not preserve timestamps for {}", dst.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn mtime_follows_the_source() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("src.txt");
        let dst = tmp.path().join("dst.txt");
        std::fs::write(&src, b"data").unwrap();
        std::fs::write(&dst, b"data").unwrap();

        let old = FileTime::from_unix_time(1_000_000_000, 0);
        filetime::set_file_times(&src, old, old).unwrap();

        preserve_metadata(&src, &dst).unwrap();

        let dst_md = std::fs::metadata(&dst).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&dst_md), old);
    }

    #[cfg(unix)]
    #[test]
    fn mode_follows_the_source() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempdir().unwrap();
        let src = tmp.path().join("src.txt");
        let dst = tmp.path().join("dst.txt");
        std::fs::write(&src, b"data").unwrap();
        std::fs::write(&dst, b"data").unwrap();

        std::fs::set_permissions(&src, std::fs::Permissions::from_mode(0o640)).unwrap();
        preserve_metadata(&src, &dst).unwrap();

        let mode = std::fs::metadata(&dst).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }
}
