//! # nebula-alloc
//!
//! Composable allocator building blocks.
//!
//! Small allocators with narrow jobs are combined into one allocator with
//! the desired policy:
//! - [`StackAllocator`](allocator::StackAllocator) - a fixed region with LIFO reclamation
//! - [`TryAllocator`](allocator::TryAllocator) - try a primary, fall back to a secondary
//! - [`ManagedAllocator`](allocator::ManagedAllocator) - report every operation to an observer
//! - [`LimitedAllocator`](allocator::LimitedAllocator) - serve only a band of request sizes
//!
//! Every operation beyond allocate/deallocate is a separate capability
//! trait. A composite offers a capability only when its components do, so
//! asking for an unsupported operation does not compile.
//!
//! ## Quick Start
//!
//! ```rust
//! use nebula_alloc::prelude::*;
//!
//! // Small requests from a scratch region, the rest from a larger one,
//! // with every operation counted.
//! let small = StackAllocator::new(1024)?.limited::<1, 128>();
//! let large = StackAllocator::new(64 * 1024)?;
//! let mut alloc = small.fallback(large).managed(StatsObserver::new());
//!
//! let mut a = alloc.try_allocate(64)?;
//! let b = alloc.try_allocate(4096)?;
//! assert!(alloc.inner().secondary().owns(b));
//!
//! assert!(alloc.resize(&mut a, 96));
//! alloc.deallocate(b);
//! alloc.deallocate_all();
//! assert!(!alloc.owns(a));
//! assert_eq!(alloc.observer().stats().allocation_count, 2);
//! # Ok::<(), nebula_alloc::AllocError>(())
//! ```
//!
//! ## Features
//!
//! - `logging` (default): `tracing` events from allocators and the
//!   [`TracingObserver`](observer::TracingObserver)
//!
//! ## Threading
//!
//! Allocators are single-threaded: every operation takes `&mut self`.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(missing_docs)]
// Precision loss in usize -> f64 casts is acceptable for stats
#![allow(clippy::cast_precision_loss)]
// Address arithmetic goes through usize on purpose
#![allow(clippy::cast_possible_truncation)]

// Error types
pub mod error;

// Core modules
pub mod allocation;
pub mod allocator;
pub mod observer;
pub mod utils;

pub use crate::allocation::Allocation;
pub use crate::error::{AllocError, AllocResult};

// Public API exports
pub mod prelude {
    //! Convenient re-exports of commonly used types and traits.

    pub use crate::allocation::Allocation;
    pub use crate::error::{AllocError, AllocResult};

    // Capabilities
    pub use crate::allocator::{
        AlignedAllocator, AllocateAll, Allocator, AllocatorExt, DeallocateAll, Owns,
        ResizableAllocator,
    };

    // Allocators
    pub use crate::allocator::{
        LimitedAllocator, ManagedAllocator, MaxAllocator, MinAllocator, StackAllocator,
        StackConfig, StackFrame, StackMarker, TryAllocator,
    };

    // Observers
    #[cfg(feature = "logging")]
    pub use crate::observer::TracingObserver;
    pub use crate::observer::{AllocationObserver, AllocatorStats, NoopObserver, StatsObserver};
}
