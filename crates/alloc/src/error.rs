//! Error types for nebula-alloc
//!
//! The allocator operations themselves never fail loudly: they return the
//! null [`Allocation`](crate::Allocation) sentinel or `false`. [`AllocError`]
//! is the opt-in `Result` surface used by construction and by the
//! `try_*` helpers on [`AllocatorExt`](crate::allocator::AllocatorExt).

use thiserror::Error;

#[cfg(feature = "logging")]
use tracing::warn;

// ============================================================================
// Main Error Type
// ============================================================================

/// Allocator errors
#[must_use = "errors should be handled"]
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocError {
    /// The allocator answered with the null sentinel
    #[error("Allocation of {requested} bytes could not be satisfied")]
    Exhausted {
        /// Requested size in bytes
        requested: usize,
    },

    /// `2^align_log2` is not representable
    #[error("Invalid alignment exponent: 2^{align_log2} does not fit in usize")]
    InvalidAlignment {
        /// Rejected exponent
        align_log2: u32,
    },

    /// Construction parameters were rejected
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// What was wrong
        reason: String,
    },
}

impl AllocError {
    /// Check if retrying later (after frees or a reset) could succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }

    /// Get error code for categorization
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Exhausted { .. } => "ALLOC:EXHAUSTED",
            Self::InvalidAlignment { .. } => "ALLOC:ALIGN",
            Self::InvalidConfig { .. } => "ALLOC:CONFIG",
        }
    }

    // ========================================================================
    // Convenience Constructors
    // ========================================================================

    /// Create capacity exhaustion error
    pub fn exhausted(requested: usize) -> Self {
        Self::Exhausted { requested }
    }

    /// Create invalid alignment error
    pub fn invalid_alignment(align_log2: u32) -> Self {
        Self::InvalidAlignment { align_log2 }
    }

    /// Create invalid config error
    pub fn invalid_config(reason: &str) -> Self {
        #[cfg(feature = "logging")]
        warn!(target: "nebula_alloc", reason, "rejected allocator configuration");

        Self::InvalidConfig {
            reason: reason.to_string(),
        }
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// Result type for fallible allocator operations
pub type AllocResult<T> = Result<T, AllocError>;
