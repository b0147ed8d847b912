//! Size-filtered allocator wrapper
//!
//! `LimitedAllocator<A, MIN, MAX>` forwards only requests whose size is in
//! `MIN..=MAX`; anything else fails with the null sentinel before reaching
//! the inner allocator. Combined with [`TryAllocator`](super::TryAllocator)
//! this routes small and large requests to different backends.
//!
//! The bounds are part of the type, so they cannot change while records
//! produced under them are still live.

use crate::allocation::Allocation;
use crate::allocator::{AlignedAllocator, Allocator, DeallocateAll, Owns, ResizableAllocator};

/// Allocator that only serves requests of `MIN..=MAX` bytes
///
/// `MIN > MAX` is rejected at compile time when the wrapper is constructed.
///
/// Does not implement `AllocateAll`: the size of "everything left" is only
/// known after the inner allocator has handed it out.
#[derive(Debug)]
pub struct LimitedAllocator<A, const MIN: usize, const MAX: usize> {
    inner: A,
}

/// Allocator that only serves requests of at least `MIN` bytes
pub type MinAllocator<A, const MIN: usize> = LimitedAllocator<A, MIN, { usize::MAX }>;

/// Allocator that only serves requests of at most `MAX` bytes
pub type MaxAllocator<A, const MAX: usize> = LimitedAllocator<A, 0, MAX>;

impl<A, const MIN: usize, const MAX: usize> LimitedAllocator<A, MIN, MAX> {
    const BOUNDS_OK: () = assert!(MIN <= MAX, "LimitedAllocator requires MIN <= MAX");

    /// Wraps `inner`
    pub const fn new(inner: A) -> Self {
        let () = Self::BOUNDS_OK;
        Self { inner }
    }

    /// Smallest size this allocator serves
    pub const fn min_size(&self) -> usize {
        MIN
    }

    /// Largest size this allocator serves
    pub const fn max_size(&self) -> usize {
        MAX
    }

    /// Checks whether `size` is within the bounds
    #[inline]
    pub const fn accepts(size: usize) -> bool {
        MIN <= size && size <= MAX
    }

    /// Get a reference to the inner allocator
    pub fn inner(&self) -> &A {
        &self.inner
    }

    /// Mutable access to the inner allocator, bypassing the bounds
    pub fn inner_mut(&mut self) -> &mut A {
        &mut self.inner
    }

    /// Unwraps the inner allocator
    pub fn into_inner(self) -> A {
        self.inner
    }
}

impl<A: Default, const MIN: usize, const MAX: usize> Default for LimitedAllocator<A, MIN, MAX> {
    fn default() -> Self {
        Self::new(A::default())
    }
}

impl<A: Allocator, const MIN: usize, const MAX: usize> Allocator for LimitedAllocator<A, MIN, MAX> {
    fn allocate(&mut self, size: usize) -> Allocation {
        if !Self::accepts(size) {
            return Allocation::null();
        }
        self.inner.allocate(size)
    }

    fn deallocate(&mut self, allocation: Allocation) {
        self.inner.deallocate(allocation);
    }
}

impl<A: Owns, const MIN: usize, const MAX: usize> Owns for LimitedAllocator<A, MIN, MAX> {
    fn owns(&self, allocation: Allocation) -> bool {
        Self::accepts(allocation.size()) && self.inner.owns(allocation)
    }
}

impl<A: AlignedAllocator, const MIN: usize, const MAX: usize> AlignedAllocator
    for LimitedAllocator<A, MIN, MAX>
{
    fn allocate_aligned(&mut self, size: usize, align_log2: u32) -> Allocation {
        if !Self::accepts(size) {
            return Allocation::null();
        }
        self.inner.allocate_aligned(size, align_log2)
    }
}

impl<A: DeallocateAll, const MIN: usize, const MAX: usize> DeallocateAll
    for LimitedAllocator<A, MIN, MAX>
{
    fn deallocate_all(&mut self) {
        self.inner.deallocate_all();
    }
}

impl<A: ResizableAllocator, const MIN: usize, const MAX: usize> ResizableAllocator
    for LimitedAllocator<A, MIN, MAX>
{
    fn resize(&mut self, allocation: &mut Allocation, new_size: usize) -> bool {
        if !Self::accepts(new_size) {
            return false;
        }
        self.inner.resize(allocation, new_size)
    }
}
