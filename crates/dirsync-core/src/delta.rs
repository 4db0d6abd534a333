//! Block-delta reconstruction of a destination file.
//!
//! The destination's existing blocks are indexed by weak checksum, then a
//! window slides over the source one byte at a time. Matched blocks are
//! copied out of the destination buffer; everything between matches is
//! emitted as literal spans. Output goes to a sibling temp file that is
//! renamed over the destination once fully written, so observers never see a
//! partial state.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::debug;
use tempfile::NamedTempFile;

use crate::checksum::RollingChecksum;
use crate::errors::{IoResultExt, SyncError, SyncErrorKind, SyncResult};
use crate::metadata::preserve_metadata;
use crate::signature::SignatureIndex;
use crate::stats::{StatsLedger, SyncStats};

/// Chunk size for streaming literal and copy spans to the temp file.
const SPAN_CHUNK_SIZE: usize = 1 << 20;

/// Reconcile `destination` with `source` using block reuse, recording the
/// byte accounting in `ledger`.
///
/// The caller has already rejected symlink destinations.
pub(crate) fn delta_sync(
    source: &Path,
    destination: &Path,
    block_size: usize,
    ledger: &mut StatsLedger,
) -> SyncResult<()> {
    if !destination.exists() {
        let copied = fs::copy(source, destination).with_path(destination)?;
        preserve_metadata(source, destination)?;
        ledger.record(destination, SyncStats::new(copied, copied, 0));
        return Ok(());
    }

    let src_len = fs::metadata(source).with_path(source)?.len();

    if src_len == 0 {
        if fs::metadata(destination).with_path(destination)?.len() != 0 {
            fs::write(destination, b"").with_path(destination)?;
        }
        preserve_metadata(source, destination)?;
        ledger.record(destination, SyncStats::default());
        return Ok(());
    }

    if crate::compare::files_identical(source, destination)? {
        preserve_metadata(source, destination)?;
        ledger.record(destination, SyncStats::new(src_len, 0, src_len));
        return Ok(());
    }

    let src_buf = fs::read(source).with_path(source)?;
    let dst_buf = fs::read(destination).with_path(destination)?;
    let total = src_buf.len() as u64;

    // The temp file is deleted on drop, which covers every error path below
    // up to the rename.
    let parent = destination.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(parent).with_path(destination)?;
    let literal_bytes = {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        let written =
            write_delta(&mut writer, &src_buf, &dst_buf, block_size).with_path(destination)?;
        writer.flush().with_path(destination)?;
        written
    };

    tmp.persist(destination).map_err(|err| {
        SyncError::new(
            SyncErrorKind::IoFailure,
            format!("{}: {}", destination.display(), err.error),
        )
    })?;

    preserve_metadata(source, destination)?;

    let reused = total.saturating_sub(literal_bytes);
    debug!(
        "delta {}: {} literal, {} reused of {} bytes",
        destination.display(),
        literal_bytes,
        reused,
        total
    );
    ledger.record(destination, SyncStats::new(total, literal_bytes, reused));
    Ok(())
}

/// Emit the delta of `source` against `dest` into `writer`, returning the
/// number of literal bytes written.
///
/// Only full-size windows participate in matching; the scan never considers
/// a window shorter than `block_size`, so the source tail past the last
/// aligned match always leaves as a literal span.
fn write_delta<W: Write>(
    writer: &mut W,
    source: &[u8],
    dest: &[u8],
    block_size: usize,
) -> io::Result<u64> {
    let index = SignatureIndex::build(dest, block_size);

    if index.is_empty() || source.len() < block_size {
        return write_span(writer, source);
    }

    let mut literal_bytes = 0u64;
    let mut idx = 0usize;
    let mut last_emitted = 0usize;
    let mut checksum = RollingChecksum::new(&source[..block_size], block_size);

    while idx + block_size <= source.len() {
        let window = &source[idx..idx + block_size];

        if let Some(sig) = index.find(checksum.digest(), window) {
            if last_emitted < idx {
                literal_bytes += write_span(writer, &source[last_emitted..idx])?;
            }

            let start = sig.offset as usize;
            let end = start + sig.length as usize;
            write_span(writer, &dest[start..end])?;

            idx += block_size;
            last_emitted = idx;

            if idx + block_size <= source.len() {
                checksum = RollingChecksum::new(&source[idx..idx + block_size], block_size);
                continue;
            }
            break;
        }

        if idx + block_size >= source.len() {
            break;
        }
        checksum.roll(source[idx], source[idx + block_size]);
        idx += 1;
    }

    if last_emitted < source.len() {
        literal_bytes += write_span(writer, &source[last_emitted..])?;
    }

    Ok(literal_bytes)
}

fn write_span<W: Write>(writer: &mut W, bytes: &[u8]) -> io::Result<u64> {
    for chunk in bytes.chunks(SPAN_CHUNK_SIZE) {
        writer.write_all(chunk)?;
    }
    Ok(bytes.len() as u64)
}
