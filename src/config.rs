use crate::buddy::block_size_for;
use crate::errors::*;

/// Parameters of a simulated address space.
///
/// `total_size` need not be a power of two: it is rounded up once, when the
/// allocator is built, and the tail above the requested size is handed out
/// like any other free space. `min_block_size` is the smallest block the
/// allocator will split down to; requests below it are served with a block
/// of exactly that size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuddyConfig {
    pub total_size: usize,
    pub min_block_size: usize,
}

impl BuddyConfig {
    pub const fn new(total_size: usize) -> Self {
        Self {
            total_size,
            min_block_size: 1,
        }
    }

    pub const fn with_min_block_size(mut self, min_block_size: usize) -> Self {
        self.min_block_size = min_block_size;
        self
    }

    /// Effective capacity after rounding, or the reason the configuration is
    /// rejected.
    pub fn capacity(&self) -> Result<usize> {
        self.validate_configuration()
    }

    pub(crate) fn validate_configuration(&self) -> Result<usize> {
        if self.total_size == 0 {
            return Err(BuddyAllocatorError::InvalidSize {
                reason: "total size must be greater than zero",
            });
        }

        if !self.min_block_size.is_power_of_two() {
            return Err(self.invalid("minimum block size must be a non-zero power of two"));
        }

        let capacity = block_size_for(self.total_size, 1)
            .ok_or_else(|| self.invalid("total size cannot be rounded to a power of two"))?;

        if self.min_block_size > capacity {
            return Err(self.invalid("minimum block size exceeds the address space"));
        }

        Ok(capacity)
    }

    fn invalid(&self, reason: &'static str) -> BuddyAllocatorError {
        BuddyAllocatorError::InvalidConfiguration {
            total_size: self.total_size,
            min_block_size: self.min_block_size,
            reason,
        }
    }
}

impl Default for BuddyConfig {
    /// A 1 KiB address space with unit-sized minimum blocks.
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_rounds_up() {
        assert_eq!(BuddyConfig::new(16).capacity(), Ok(16));
        assert_eq!(BuddyConfig::new(17).capacity(), Ok(32));
        assert_eq!(BuddyConfig::new(1).capacity(), Ok(1));
        assert_eq!(BuddyConfig::new(1000).capacity(), Ok(1024));
    }

    #[test]
    fn test_rejects_zero_total() {
        assert!(matches!(
            BuddyConfig::new(0).capacity(),
            Err(BuddyAllocatorError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_min_block_size() {
        for min in [0, 3, 12] {
            assert!(matches!(
                BuddyConfig::new(64).with_min_block_size(min).capacity(),
                Err(BuddyAllocatorError::InvalidConfiguration { .. })
            ));
        }
        assert!(matches!(
            BuddyConfig::new(64).with_min_block_size(128).capacity(),
            Err(BuddyAllocatorError::InvalidConfiguration { .. })
        ));
        assert_eq!(BuddyConfig::new(64).with_min_block_size(64).capacity(), Ok(64));
    }

    #[test]
    fn test_rejects_unroundable_total() {
        assert!(matches!(
            BuddyConfig::new(usize::MAX).capacity(),
            Err(BuddyAllocatorError::InvalidConfiguration { .. })
        ));
    }
}
