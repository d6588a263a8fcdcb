//! A simulated buddy allocator over an abstract linear address space.
//!
//! The allocator hands out offsets into `[0, capacity)`; no memory backs them.
//! Blocks are powers of two aligned to their own size, split on allocation
//! and coalesced with their buddy on deallocation, so the tracked blocks
//! always partition the whole space.
//!
//! ```
//! use chopsim::{BlockStatus, BuddyAllocator};
//!
//! let allocator = BuddyAllocator::new(16).unwrap();
//! let a = allocator.allocate(3).unwrap(); // rounded to 4
//! let b = allocator.allocate(2).unwrap();
//! assert_eq!((a, b), (0, 4));
//!
//! allocator.deallocate(b).unwrap();
//! allocator.deallocate(a).unwrap();
//! let blocks = allocator.snapshot();
//! assert_eq!(blocks.len(), 1);
//! assert_eq!(blocks[0].status, BlockStatus::Free);
//! ```
#![cfg_attr(not(test), no_std)]
extern crate alloc;

mod block;
mod buddy;
mod config;
mod errors;
mod raw_spin_lock;
mod table;

use alloc::vec::Vec;
use log::{debug, trace};
use raw_spin_lock::SpinMutex;
use table::BlockTable;

pub use block::{Block, BlockStatus};
pub use buddy::buddy_of;
pub use config::BuddyConfig;
pub use errors::{BuddyAllocatorError, Result};

// Main allocator structure
pub struct BuddyAllocator {
    inner: SpinMutex<BlockTable>,
    requested_size: usize,
    total_size: usize,
    min_block_size: usize,
}

impl BuddyAllocator {
    /// Builds an allocator over `total_size` units, rounded up to a power of
    /// two. The whole space starts out as one free block.
    pub fn new(total_size: usize) -> Result<Self> {
        Self::with_config(BuddyConfig::new(total_size))
    }

    pub fn with_config(config: BuddyConfig) -> Result<Self> {
        let total_size = config.validate_configuration()?;
        if total_size != config.total_size {
            debug!(
                "address space of {} rounded up to {}",
                config.total_size, total_size
            );
        }
        debug!(
            "buddy allocator initialized: capacity {}, min block {}",
            total_size, config.min_block_size
        );

        Ok(Self {
            inner: SpinMutex::new(BlockTable::new(total_size)),
            requested_size: config.total_size,
            total_size,
            min_block_size: config.min_block_size,
        })
    }

    /// Allocates a block of at least `requested_size` units and returns its
    /// start address.
    ///
    /// The smallest free block that fits is chosen (lowest address among
    /// equals) and its lower half is split repeatedly until it matches the
    /// rounded size. On failure the table is left untouched.
    pub fn allocate(&self, requested_size: usize) -> Result<usize> {
        if requested_size == 0 {
            return Err(BuddyAllocatorError::InvalidSize {
                reason: "allocation size must be greater than zero",
            });
        }

        let rounded = buddy::block_size_for(requested_size, self.min_block_size);
        let mut table = self.inner.lock();

        let found = rounded.and_then(|size| {
            let start = table.find_free(size)?;
            table.lookup(start).map(|block| (block, size))
        });
        let Some((block, needed_size)) = found else {
            let err = BuddyAllocatorError::OutOfMemory {
                requested_size,
                needed_size: rounded,
                largest_available: table.largest_free(),
            };
            debug!("allocate({}) failed: {}", requested_size, err);
            return Err(err);
        };

        Self::split_block_down_to(&mut table, block, needed_size);
        table.set_status(block.start, BlockStatus::Allocated);

        debug!(
            "allocated {} units at {} (requested {})",
            needed_size, block.start, requested_size
        );
        Ok(block.start)
    }

    /// Frees the block starting at `start` and coalesces it with its buddy for
    /// as long as the buddy is a free block of the same size.
    pub fn deallocate(&self, start: usize) -> Result<()> {
        let mut table = self.inner.lock();

        let block = table
            .lookup(start)
            .ok_or(BuddyAllocatorError::InvalidAddress { addr: start })?;
        if block.is_free() {
            return Err(BuddyAllocatorError::DoubleFree {
                addr: start,
                size: block.size,
            });
        }

        table.set_status(start, BlockStatus::Free);
        let (merged_start, merged_size) = self.coalesce(&mut table, start, block.size);

        debug!(
            "freed {} units at {}, now part of free block {}..{}",
            block.size,
            start,
            merged_start,
            merged_start + merged_size
        );
        Ok(())
    }

    /// Start of the best-fit free block for `min_size`, without allocating it.
    pub fn find_free(&self, min_size: usize) -> Option<usize> {
        self.inner.lock().find_free(min_size)
    }

    pub fn lookup(&self, start: usize) -> Option<Block> {
        self.inner.lock().lookup(start)
    }

    pub fn is_allocated(&self, start: usize) -> bool {
        self.lookup(start)
            .is_some_and(|block| block.status == BlockStatus::Allocated)
    }

    /// Every block, ordered by start address.
    pub fn snapshot(&self) -> Vec<Block> {
        self.inner.lock().snapshot()
    }

    /// Effective size of the address space (a power of two).
    pub fn capacity(&self) -> usize {
        self.total_size
    }

    /// Size passed at construction, before rounding.
    pub fn requested_size(&self) -> usize {
        self.requested_size
    }

    pub fn max_order(&self) -> usize {
        buddy::order_of(self.total_size)
    }

    pub fn min_block_size(&self) -> usize {
        self.min_block_size
    }

    pub fn free_size(&self) -> usize {
        self.inner.lock().free_size()
    }

    pub fn allocated_size(&self) -> usize {
        self.total_size - self.free_size()
    }

    pub fn largest_free_block(&self) -> Option<usize> {
        self.inner.lock().largest_free()
    }

    pub fn block_count(&self) -> usize {
        self.inner.lock().len()
    }

    /// True when the space has coalesced back into a single free block.
    pub fn is_fully_free(&self) -> bool {
        self.largest_free_block() == Some(self.total_size)
    }

    /// Split a free block down to `to_size`, always keeping the lower half
    fn split_block_down_to(table: &mut BlockTable, block: Block, to_size: usize) {
        let mut size = block.size;
        while size > to_size {
            let upper = table.split(block.start, size);
            size /= 2;
            trace!(
                "split {}..{} into {} + {} (size {})",
                block.start,
                block.start + size * 2,
                block.start,
                upper,
                size
            );
        }
    }

    /// Buddy merging loop; returns the start and size of the resulting block
    fn coalesce(&self, table: &mut BlockTable, start: usize, size: usize) -> (usize, usize) {
        let mut current_start = start;
        let mut current_size = size;

        while current_size < self.total_size {
            let buddy_start = buddy_of(current_start, current_size);
            match table.lookup(buddy_start) {
                Some(buddy) if buddy.is_free() && buddy.size == current_size => {}
                _ => break,
            }

            current_start = table.merge(current_start, buddy_start, current_size);
            debug_assert_eq!(current_start, buddy::parent_of(buddy_start, current_size));
            current_size *= 2;
            trace!(
                "merged buddies into {}..{}",
                current_start,
                current_start + current_size
            );
        }

        (current_start, current_size)
    }
}

impl core::fmt::Debug for BuddyAllocator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BuddyAllocator")
            .field("capacity", &self.total_size)
            .field("requested_size", &self.requested_size)
            .field("min_block_size", &self.min_block_size)
            .field("blocks", &self.block_count())
            .finish()
    }
}
