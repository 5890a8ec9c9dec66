//! Scanline blocks for parallel rendering.
//!
//! The image is split into blocks of whole rows. Workers claim blocks from a
//! shared cursor, so faster workers simply claim more of them.

use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};

use lumen_math::Color;

/// Default number of rows per block.
pub const DEFAULT_BLOCK_ROWS: usize = 4;

/// A run of consecutive image rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBlock {
    /// First row of the block
    pub start: usize,
    /// One past the last row
    pub end: usize,
    /// Claim order of this block
    pub index: usize,
}

impl RowBlock {
    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Shared cursor handing out row blocks with atomic fetch-and-add.
#[derive(Debug)]
pub struct BlockCursor {
    next_row: AtomicUsize,
    height: usize,
    block_rows: usize,
}

impl BlockCursor {
    /// Cursor over `height` rows in blocks of `block_rows` (at least 1).
    pub fn new(height: usize, block_rows: usize) -> Self {
        Self {
            next_row: AtomicUsize::new(0),
            height,
            block_rows: block_rows.max(1),
        }
    }

    /// Claim the next block, or `None` once every row has been handed out.
    pub fn next_block(&self) -> Option<RowBlock> {
        let start = self.next_row.fetch_add(self.block_rows, Ordering::Relaxed);
        if start >= self.height {
            return None;
        }

        Some(RowBlock {
            start,
            end: (start + self.block_rows).min(self.height),
            index: start / self.block_rows,
        })
    }

    /// Total number of blocks the cursor will hand out.
    pub fn block_count(&self) -> usize {
        self.height.div_ceil(self.block_rows)
    }
}

/// A finished row of linear colors.
#[derive(Debug, Clone)]
pub struct RowResult {
    pub row: usize,
    pub pixels: Vec<Color>,
}
