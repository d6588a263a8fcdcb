//! The block table: every block currently carved out of the address space.
//!
//! Records are keyed by start address in a hash map, so `lookup` is a single
//! probe. Free blocks are additionally indexed per order in ordered sets; the
//! best fit is then the lowest address in the first non-empty set at or above
//! the requested order.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use hashbrown::HashMap;

use crate::block::{Block, BlockStatus};
use crate::buddy::{order_of, size_of_order};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BlockRecord {
    size: usize,
    status: BlockStatus,
}

#[derive(Debug)]
pub(crate) struct BlockTable {
    blocks: HashMap<usize, BlockRecord>,
    // `free_lists[order]` holds the start addresses of free blocks of size 2^order
    free_lists: Vec<BTreeSet<usize>>,
}

impl BlockTable {
    /// A table holding a single free block covering `[0, capacity)`.
    pub(crate) fn new(capacity: usize) -> Self {
        let max_order = order_of(capacity);
        let mut table = Self {
            blocks: HashMap::new(),
            free_lists: (0..=max_order).map(|_| BTreeSet::new()).collect(),
        };
        table.insert(0, capacity, BlockStatus::Free);
        table
    }

    pub(crate) fn lookup(&self, start: usize) -> Option<Block> {
        self.blocks.get(&start).map(|record| Block {
            start,
            size: record.size,
            status: record.status,
        })
    }

    /// Start of the smallest free block of at least `min_size`, lowest address
    /// first among equals.
    pub(crate) fn find_free(&self, min_size: usize) -> Option<usize> {
        let order = order_of(min_size.max(1).checked_next_power_of_two()?);
        self.free_lists
            .get(order..)?
            .iter()
            .find_map(|starts| starts.first().copied())
    }

    pub(crate) fn largest_free(&self) -> Option<usize> {
        self.free_lists
            .iter()
            .rposition(|starts| !starts.is_empty())
            .map(size_of_order)
    }

    pub(crate) fn len(&self) -> usize {
        self.blocks.len()
    }

    pub(crate) fn free_size(&self) -> usize {
        self.free_lists
            .iter()
            .enumerate()
            .map(|(order, starts)| starts.len() * size_of_order(order))
            .sum()
    }

    /// All blocks ordered by start address.
    pub(crate) fn snapshot(&self) -> Vec<Block> {
        let mut blocks: Vec<Block> = self
            .blocks
            .iter()
            .map(|(&start, record)| Block {
                start,
                size: record.size,
                status: record.status,
            })
            .collect();
        blocks.sort_unstable_by_key(|block| block.start);
        blocks
    }

    pub(crate) fn set_status(&mut self, start: usize, status: BlockStatus) {
        debug_assert!(self.blocks.contains_key(&start), "untracked block {}", start);
        let Some(record) = self.blocks.get_mut(&start) else {
            return;
        };
        let previous = core::mem::replace(&mut record.status, status);
        let order = order_of(record.size);
        match (previous, status) {
            (BlockStatus::Allocated, BlockStatus::Free) => {
                self.free_lists[order].insert(start);
            }
            (BlockStatus::Free, BlockStatus::Allocated) => {
                self.free_lists[order].remove(&start);
            }
            _ => {}
        }
    }

    /// Replaces the free block at `start` of `size` with two free halves.
    /// Returns the start of the upper half.
    pub(crate) fn split(&mut self, start: usize, size: usize) -> usize {
        debug_assert!(size > 1);
        let removed = self.remove(start);
        debug_assert_eq!(
            removed,
            Some(BlockRecord {
                size,
                status: BlockStatus::Free
            }),
            "split of a block that is not free or has the wrong size"
        );

        let half = size / 2;
        let upper = start + half;
        self.insert(start, half, BlockStatus::Free);
        self.insert(upper, half, BlockStatus::Free);
        upper
    }

    /// Replaces the free buddies at `start` and `buddy`, both of `size`, with
    /// their free parent. Returns the parent's start.
    pub(crate) fn merge(&mut self, start: usize, buddy: usize, size: usize) -> usize {
        let lower = start.min(buddy);
        for addr in [start, buddy] {
            let removed = self.remove(addr);
            debug_assert_eq!(
                removed,
                Some(BlockRecord {
                    size,
                    status: BlockStatus::Free
                }),
                "merge of a block that is not free or has the wrong size"
            );
        }
        self.insert(lower, size * 2, BlockStatus::Free);
        lower
    }

    fn insert(&mut self, start: usize, size: usize, status: BlockStatus) {
        debug_assert_eq!(start % size, 0, "block at {} not aligned to {}", start, size);
        if status == BlockStatus::Free {
            self.free_lists[order_of(size)].insert(start);
        }
        self.blocks.insert(start, BlockRecord { size, status });
    }

    fn remove(&mut self, start: usize) -> Option<BlockRecord> {
        let record = self.blocks.remove(&start)?;
        if record.status == BlockStatus::Free {
            self.free_lists[order_of(record.size)].remove(&start);
        }
        Some(record)
    }
}
