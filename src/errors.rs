use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuddyAllocatorError {
    /// A total or requested size of zero
    InvalidSize { reason: &'static str },
    /// Allocator configuration cannot describe a buddy address space
    InvalidConfiguration {
        total_size: usize,
        min_block_size: usize,
        reason: &'static str,
    },
    /// Out of memory - no free block is large enough
    OutOfMemory {
        requested_size: usize,
        /// Power-of-two block size the request rounds to, if representable
        needed_size: Option<usize>,
        largest_available: Option<usize>,
    },
    /// Invalid deallocation - no block starts at this address
    InvalidAddress { addr: usize },
    /// Invalid deallocation - block already free (double-free)
    DoubleFree { addr: usize, size: usize },
}

impl fmt::Display for BuddyAllocatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSize { reason } => write!(f, "Invalid size: {}", reason),
            Self::InvalidConfiguration {
                total_size,
                min_block_size,
                reason,
            } => write!(
                f,
                "Invalid configuration (total {}, min block {}): {}",
                total_size, min_block_size, reason
            ),
            Self::OutOfMemory {
                requested_size,
                needed_size,
                largest_available,
            } => {
                match needed_size {
                    Some(needed) => write!(
                        f,
                        "Out of memory: requested {} (block of {})",
                        requested_size, needed
                    )?,
                    None => write!(f, "Out of memory: requested {}", requested_size)?,
                }
                match largest_available {
                    Some(largest) => write!(f, ", largest available {}", largest),
                    None => write!(f, ", no free blocks available"),
                }
            }
            Self::InvalidAddress { addr } => {
                write!(f, "Invalid address: no block starts at {}", addr)
            }
            Self::DoubleFree { addr, size } => {
                write!(f, "Double free: block at {} (size {}) is already free", addr, size)
            }
        }
    }
}

pub type Result<T> = core::result::Result<T, BuddyAllocatorError>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_out_of_memory_message() {
        let err = BuddyAllocatorError::OutOfMemory {
            requested_size: 17,
            needed_size: Some(32),
            largest_available: Some(16),
        };
        assert_eq!(
            err.to_string(),
            "Out of memory: requested 17 (block of 32), largest available 16"
        );

        let err = BuddyAllocatorError::OutOfMemory {
            requested_size: 1,
            needed_size: Some(1),
            largest_available: None,
        };
        assert_eq!(
            err.to_string(),
            "Out of memory: requested 1 (block of 1), no free blocks available"
        );
    }

    #[test]
    fn test_deallocation_messages() {
        assert_eq!(
            BuddyAllocatorError::InvalidAddress { addr: 99 }.to_string(),
            "Invalid address: no block starts at 99"
        );
        assert_eq!(
            BuddyAllocatorError::DoubleFree { addr: 0, size: 4 }.to_string(),
            "Double free: block at 0 (size 4) is already free"
        );
    }
}
