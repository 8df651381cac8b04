use crate::constants::*;
use crate::error::{MmuError, Result};

/// Simulator configuration, fixed for the lifetime of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub page_size: u32,
    pub memory_size: u32,
    pub verbose: bool,
}

impl Config {
    pub fn new(page_size: u32) -> Self {
        Config {
            page_size,
            memory_size: DEFAULT_MEMORY_SIZE,
            verbose: false,
        }
    }

    pub fn with_memory_size(mut self, memory_size: u32) -> Self {
        self.memory_size = memory_size;
        self
    }

    /// Page size must be a power of two strictly between 1024 and 32768,
    /// and memory must hold a whole, non-zero number of frames.
    pub fn validate(&self) -> Result<()> {
        let page_size = self.page_size;
        if !page_size.is_power_of_two() || page_size < MIN_PAGE_SIZE || page_size > MAX_PAGE_SIZE {
            return Err(MmuError::InvalidPageSize(page_size));
        }
        if self.memory_size == 0 || self.memory_size % page_size != 0 {
            return Err(MmuError::InvalidMemorySize(self.memory_size));
        }
        Ok(())
    }

    #[inline]
    pub fn frame_count(&self) -> u32 {
        self.memory_size / self.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_page_sizes() {
        for size in [2048, 4096, 8192, 16384] {
            assert_eq!(Config::new(size).validate(), Ok(()), "size {}", size);
        }
    }

    #[test]
    fn test_rejected_page_sizes() {
        for size in [0, 1, 1000, 1024, 3000, 32768, 65536] {
            assert_eq!(
                Config::new(size).validate(),
                Err(MmuError::InvalidPageSize(size)),
                "size {}",
                size
            );
        }
    }

    #[test]
    fn test_memory_size_must_be_whole_frames() {
        assert_eq!(
            Config::new(4096).with_memory_size(4096 * 3 + 1).validate(),
            Err(MmuError::InvalidMemorySize(4096 * 3 + 1))
        );
        assert_eq!(
            Config::new(4096).with_memory_size(0).validate(),
            Err(MmuError::InvalidMemorySize(0))
        );
        let config = Config::new(4096).with_memory_size(1_048_576);
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.frame_count(), 256);
    }

    #[test]
    fn test_default_memory_size() {
        assert_eq!(Config::new(2048).memory_size, 64 * 1024 * 1024);
        assert_eq!(Config::new(2048).frame_count(), 32768);
    }
}
