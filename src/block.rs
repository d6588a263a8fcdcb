use core::fmt;

/// Allocation state of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockStatus {
    Free,
    Allocated,
}

impl fmt::Display for BlockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => f.write_str("Free"),
            Self::Allocated => f.write_str("Allocated"),
        }
    }
}

/// A block carved out of the address space, as seen from outside the table.
///
/// Blocks are values: the table owns the authoritative record and hands out
/// copies, so holding a `Block` never pins anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
    pub start: usize,
    pub size: usize,
    pub status: BlockStatus,
}

impl Block {
    /// One past the last address covered by this block.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.size
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.status == BlockStatus::Free
    }

    /// `log2(size)`.
    #[inline]
    pub fn order(&self) -> usize {
        self.size.trailing_zeros() as usize
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Address: {}, Size: {}, Status: {}",
            self.start, self.size, self.status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_block_display() {
        let block = Block {
            start: 4,
            size: 2,
            status: BlockStatus::Allocated,
        };
        assert_eq!(block.to_string(), "Address: 4, Size: 2, Status: Allocated");
        assert_eq!(block.end(), 6);
        assert_eq!(block.order(), 1);
        assert!(!block.is_free());
    }
}
