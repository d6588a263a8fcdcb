//! Address arithmetic shared by the allocation and deallocation paths.
//!
//! Every block is aligned to its own size, so flipping the size bit of the
//! start address yields the other half of the parent block.

/// Start address of the buddy of the block at `start` with `size`.
///
/// Only meaningful when `start % size == 0`, which every block in the table
/// satisfies.
#[inline]
pub const fn buddy_of(start: usize, size: usize) -> usize {
    start ^ size
}

/// Start address of the parent block formed by merging `start` with its buddy.
#[inline]
pub(crate) const fn parent_of(start: usize, size: usize) -> usize {
    start & !size
}

/// `log2(size)` for a power-of-two `size`.
#[inline]
pub(crate) fn order_of(size: usize) -> usize {
    debug_assert!(size.is_power_of_two());
    size.trailing_zeros() as usize
}

#[inline]
pub(crate) const fn size_of_order(order: usize) -> usize {
    1 << order
}

/// Rounds `size` up to a power of two no smaller than `floor`.
///
/// Returns `None` when the rounded size does not fit in a `usize`.
#[inline]
pub(crate) fn block_size_for(size: usize, floor: usize) -> Option<usize> {
    size.checked_next_power_of_two().map(|rounded| rounded.max(floor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buddy_of_flips_size_bit() {
        assert_eq!(buddy_of(0, 4), 4);
        assert_eq!(buddy_of(4, 4), 0);
        assert_eq!(buddy_of(6, 2), 4);
        assert_eq!(buddy_of(8, 8), 0);
        assert_eq!(buddy_of(12, 4), 8);
    }

    #[test]
    fn test_parent_is_lower_buddy() {
        assert_eq!(parent_of(6, 2), 4);
        assert_eq!(parent_of(4, 2), 4);
        assert_eq!(parent_of(8, 8), 0);
        assert_eq!(parent_of(12, 4), 8);
    }

    #[test]
    fn test_order_round_trip() {
        for order in 0..usize::BITS as usize {
            assert_eq!(order_of(size_of_order(order)), order);
        }
    }

    #[test]
    fn test_block_size_for() {
        assert_eq!(block_size_for(3, 1), Some(4));
        assert_eq!(block_size_for(4, 1), Some(4));
        assert_eq!(block_size_for(1, 1), Some(1));
        assert_eq!(block_size_for(3, 16), Some(16));
        assert_eq!(block_size_for(17, 16), Some(32));
        assert_eq!(block_size_for(usize::MAX, 1), None);
    }
}
