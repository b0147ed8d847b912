//! Fallback composition: try a primary allocator, then a secondary
//!
//! # Routing
//!
//! - Allocation requests go to the primary first; the secondary only sees
//!   requests the primary answered with the null sentinel
//! - Deallocation and resize go to whichever component owns the record,
//!   primary checked first
//! - Records neither component owns are ignored
//!
//! Ownership routing is why both components must implement [`Owns`]: a
//! record carries no tag saying where it came from.

use crate::allocation::Allocation;
use crate::allocator::{
    AlignedAllocator, AllocateAll, Allocator, DeallocateAll, Owns, ResizableAllocator,
};

/// Allocator that falls back to `F` when `P` cannot satisfy a request
///
/// Chains of more than two allocators nest to the right, see
/// [`try_chain!`](crate::try_chain).
#[derive(Debug, Default)]
pub struct TryAllocator<P, F> {
    primary: P,
    secondary: F,
}

impl<P, F> TryAllocator<P, F> {
    /// Composes `primary` with `secondary`
    pub const fn new(primary: P, secondary: F) -> Self {
        Self { primary, secondary }
    }

    /// Allocator tried first
    pub fn primary(&self) -> &P {
        &self.primary
    }

    /// Allocator tried when the primary fails
    pub fn secondary(&self) -> &F {
        &self.secondary
    }

    /// Mutable access to the primary allocator
    pub fn primary_mut(&mut self) -> &mut P {
        &mut self.primary
    }

    /// Mutable access to the secondary allocator
    pub fn secondary_mut(&mut self) -> &mut F {
        &mut self.secondary
    }

    /// Splits the composite back into its components
    pub fn into_parts(self) -> (P, F) {
        (self.primary, self.secondary)
    }
}

impl<P, F> Allocator for TryAllocator<P, F>
where
    P: Allocator + Owns,
    F: Allocator + Owns,
{
    fn allocate(&mut self, size: usize) -> Allocation {
        let allocation = self.primary.allocate(size);
        if !allocation.is_null() {
            return allocation;
        }
        self.secondary.allocate(size)
    }

    fn deallocate(&mut self, allocation: Allocation) {
        if self.primary.owns(allocation) {
            self.primary.deallocate(allocation);
        } else if self.secondary.owns(allocation) {
            self.secondary.deallocate(allocation);
        }
    }
}

impl<P: Owns, F: Owns> Owns for TryAllocator<P, F> {
    fn owns(&self, allocation: Allocation) -> bool {
        self.primary.owns(allocation) || self.secondary.owns(allocation)
    }
}

impl<P, F> AlignedAllocator for TryAllocator<P, F>
where
    P: AlignedAllocator + Owns,
    F: AlignedAllocator + Owns,
{
    fn allocate_aligned(&mut self, size: usize, align_log2: u32) -> Allocation {
        let allocation = self.primary.allocate_aligned(size, align_log2);
        if !allocation.is_null() {
            return allocation;
        }
        self.secondary.allocate_aligned(size, align_log2)
    }
}

impl<P, F> AllocateAll for TryAllocator<P, F>
where
    P: AllocateAll + Owns,
    F: AllocateAll + Owns,
{
    fn allocate_all(&mut self) -> Allocation {
        let allocation = self.primary.allocate_all();
        if !allocation.is_null() {
            return allocation;
        }
        self.secondary.allocate_all()
    }
}

impl<P, F> DeallocateAll for TryAllocator<P, F>
where
    P: DeallocateAll + Owns,
    F: DeallocateAll + Owns,
{
    fn deallocate_all(&mut self) {
        self.primary.deallocate_all();
        self.secondary.deallocate_all();
    }
}

impl<P, F> ResizableAllocator for TryAllocator<P, F>
where
    P: ResizableAllocator + Owns,
    F: ResizableAllocator + Owns,
{
    fn resize(&mut self, allocation: &mut Allocation, new_size: usize) -> bool {
        if self.primary.owns(*allocation) {
            self.primary.resize(allocation, new_size)
        } else if self.secondary.owns(*allocation) {
            self.secondary.resize(allocation, new_size)
        } else {
            false
        }
    }
}

/// Builds a right-nested [`TryAllocator`] chain
///
/// `try_chain![a, b, c]` is `TryAllocator::new(a, TryAllocator::new(b, c))`;
/// a single argument is returned as is.
///
/// ```rust
/// use nebula_alloc::prelude::*;
/// use nebula_alloc::try_chain;
///
/// let mut chain = try_chain![
///     StackAllocator::new(16)?,
///     StackAllocator::new(64)?,
///     StackAllocator::new(256)?,
/// ];
/// let a = chain.allocate(100);
/// assert!(chain.secondary().secondary().owns(a));
/// # Ok::<(), nebula_alloc::AllocError>(())
/// ```
#[macro_export]
macro_rules! try_chain {
    ($single:expr $(,)?) => {
        $single
    };
    ($first:expr, $($rest:expr),+ $(,)?) => {
        $crate::allocator::TryAllocator::new($first, $crate::try_chain!($($rest),+))
    };
}
