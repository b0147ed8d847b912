//! Stack allocator configuration

use crate::error::{AllocError, AllocResult};

/// Configuration for stack allocator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackConfig {
    /// Byte written over freshly handed-out memory
    pub alloc_pattern: Option<u8>,

    /// Byte written over memory returned to the region
    pub dealloc_pattern: Option<u8>,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            alloc_pattern: if cfg!(debug_assertions) { Some(0xCC) } else { None },
            dealloc_pattern: if cfg!(debug_assertions) { Some(0xDD) } else { None },
        }
    }
}

impl StackConfig {
    /// Production configuration - no fill overhead
    pub fn production() -> Self {
        Self {
            alloc_pattern: None,
            dealloc_pattern: None,
        }
    }

    /// Debug configuration - fresh and released bytes are recognizable
    pub fn debug() -> Self {
        Self {
            alloc_pattern: Some(0xCC),
            dealloc_pattern: Some(0xDD),
        }
    }

    /// Checks that the configuration is usable
    pub fn validate(&self) -> AllocResult<()> {
        match (self.alloc_pattern, self.dealloc_pattern) {
            (Some(alloc), Some(dealloc)) if alloc == dealloc => Err(AllocError::invalid_config(
                "alloc and dealloc fill patterns must differ",
            )),
            _ => Ok(()),
        }
    }
}
