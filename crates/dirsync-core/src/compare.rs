//! Cheap byte-equality check between two files.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::errors::{IoResultExt, SyncResult};

const COMPARE_BUF_SIZE: usize = 64 * 1024;

/// True when both files hold identical bytes. Sizes gate the comparison so
/// mismatched lengths never read content.
pub fn files_identical(a: &Path, b: &Path) -> SyncResult<bool> {
    let meta_a = a.metadata().with_path(a)?;
    let meta_b = b.metadata().with_path(b)?;
    if meta_a.len() != meta_b.len() {
        return Ok(false);
    }

    let mut file_a = File::open(a).with_path(a)?;
    let mut file_b = File::open(b).with_path(b)?;
    let mut buf_a = vec![0u8; COMPARE_BUF_SIZE];
    let mut buf_b = vec![0u8; COMPARE_BUF_SIZE];

    loop {
        let read_a = file_a.read(&mut buf_a).with_path(a)?;
        if read_a == 0 {
            return Ok(true);
        }
        let mut filled = 0;
        while filled < read_a {
            let read_b = file_b.read(&mut buf_b[filled..read_a]).with_path(b)?;
            if read_b == 0 {
                return Ok(false);
            }
            filled += read_b;
        }
        if buf_a[..read_a] != buf_b[..read_a] {
            return Ok(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn identical_content_compares_equal() {
        let tmp = tempdir().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        std::fs::write(&a, b"same bytes").unwrap();
        std::fs::write(&b, b"same bytes").unwrap();
        assert!(files_identical(&a, &b).unwrap());
    }

    #[test]
    fn same_length_different_content_compares_unequal() {
        let tmp = tempdir().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        std::fs::write(&a, b"aaaa").unwrap();
        std::fs::write(&b, b"aaab").unwrap();
        assert!(!files_identical(&a, &b).unwrap());
    }

    #[test]
    fn different_lengths_short_circuit() {
        let tmp = tempdir().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        std::fs::write(&a, b"short").unwrap();
        std::fs::write(&b, b"much longer").unwrap();
        assert!(!files_identical(&a, &b).unwrap());
    }
}
