//! Block signature index over the destination file.
//!
//! The destination is partitioned into consecutive non-overlapping blocks;
//! each block is keyed by its weak checksum with the strong digest held for
//! confirmation. Weak collisions are expected and kept in insertion order so
//! that `find` resolves ties to the lowest offset.

use std::collections::HashMap;

use crate::checksum::{strong_digest, RollingChecksum};

/// Signature of one destination block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSignature {
    pub weak: u32,
    pub strong: [u8; 16],
    pub offset: u64,
    pub length: u32,
}

/// Weak-checksum index over all destination blocks.
#[derive(Debug, Default)]
pub struct SignatureIndex {
    buckets: HashMap<u32, Vec<BlockSignature>>,
}

impl SignatureIndex {
    /// Index `data` in blocks of `block_size` bytes. The final block may be
    /// shorter but is never empty; empty input produces an empty index.
    #[allow(clippy::cast_possible_truncation)]
    pub fn build(data: &[u8], block_size: usize) -> Self {
        let mut buckets: HashMap<u32, Vec<BlockSignature>> = HashMap::new();
        let mut offset = 0usize;

        while offset < data.len() {
            let end = usize::min(offset + block_size, data.len());
            let block = &data[offset..end];
            let weak = RollingChecksum::new(block, block.len()).digest();
            buckets.entry(weak).or_default().push(BlockSignature {
                weak,
                strong: strong_digest(block),
                offset: offset as u64,
                length: block.len() as u32,
            });
            offset += block_size;
        }

        Self { buckets }
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Look up the window by weak checksum, confirming with a single MD5 of
    /// the window bytes. Returns the earliest-inserted candidate on a
    /// collision.
    pub fn find(&self, weak: u32, window: &[u8]) -> Option<&BlockSignature> {
        let candidates = self.buckets.get(&weak)?;
        let strong = strong_digest(window);
        candidates.iter().find(|sig| sig.strong == strong)
    }
}
