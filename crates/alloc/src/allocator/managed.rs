//! Observer-instrumented allocator wrapper
//!
//! Every operation is bracketed by a before-hook and an after-hook on the
//! wrapped [`AllocationObserver`]. Results pass through untouched: the
//! wrapper never alters what the inner allocator returns, and hooks cannot
//! veto an operation. `owns` is a pure query and is forwarded without hooks.

use crate::allocation::Allocation;
use crate::allocator::{
    AlignedAllocator, AllocateAll, Allocator, DeallocateAll, Owns, ResizableAllocator,
};
use crate::observer::{AllocationObserver, NoopObserver};

/// Allocator wrapper that reports every operation to an observer
#[derive(Debug, Default)]
pub struct ManagedAllocator<A, M = NoopObserver> {
    inner: A,
    observer: M,
}

impl<A> ManagedAllocator<A> {
    /// Wraps `inner` with the no-op observer
    pub const fn new(inner: A) -> Self {
        Self {
            inner,
            observer: NoopObserver,
        }
    }
}

impl<A, M> ManagedAllocator<A, M> {
    /// Wraps `inner` and reports its operations to `observer`
    pub const fn with_observer(inner: A, observer: M) -> Self {
        Self { inner, observer }
    }

    /// Get a reference to the inner allocator
    pub fn inner(&self) -> &A {
        &self.inner
    }

    /// Mutable access to the inner allocator
    ///
    /// Operations issued through this reference bypass the observer.
    pub fn inner_mut(&mut self) -> &mut A {
        &mut self.inner
    }

    /// Get a reference to the observer
    pub fn observer(&self) -> &M {
        &self.observer
    }

    /// Mutable access to the observer
    pub fn observer_mut(&mut self) -> &mut M {
        &mut self.observer
    }

    /// Splits the wrapper into allocator and observer
    pub fn into_parts(self) -> (A, M) {
        (self.inner, self.observer)
    }
}

impl<A: Allocator, M: AllocationObserver> Allocator for ManagedAllocator<A, M> {
    fn allocate(&mut self, size: usize) -> Allocation {
        self.observer.before_allocate(size);
        let allocation = self.inner.allocate(size);
        self.observer.after_allocate(size, allocation);
        allocation
    }

    fn deallocate(&mut self, allocation: Allocation) {
        self.observer.before_deallocate(allocation);
        self.inner.deallocate(allocation);
        self.observer.after_deallocate(allocation);
    }
}

impl<A: Owns, M> Owns for ManagedAllocator<A, M> {
    #[inline]
    fn owns(&self, allocation: Allocation) -> bool {
        self.inner.owns(allocation)
    }
}

impl<A: AlignedAllocator, M: AllocationObserver> AlignedAllocator for ManagedAllocator<A, M> {
    fn allocate_aligned(&mut self, size: usize, align_log2: u32) -> Allocation {
        self.observer.before_allocate_aligned(size, align_log2);
        let allocation = self.inner.allocate_aligned(size, align_log2);
        self.observer
            .after_allocate_aligned(size, align_log2, allocation);
        allocation
    }
}

impl<A: AllocateAll, M: AllocationObserver> AllocateAll for ManagedAllocator<A, M> {
    fn allocate_all(&mut self) -> Allocation {
        self.observer.before_allocate_all();
        let allocation = self.inner.allocate_all();
        self.observer.after_allocate_all(allocation);
        allocation
    }
}

impl<A: DeallocateAll, M: AllocationObserver> DeallocateAll for ManagedAllocator<A, M> {
    fn deallocate_all(&mut self) {
        self.observer.before_deallocate_all();
        self.inner.deallocate_all();
        self.observer.after_deallocate_all();
    }
}

impl<A: ResizableAllocator, M: AllocationObserver> ResizableAllocator for ManagedAllocator<A, M> {
    fn resize(&mut self, allocation: &mut Allocation, new_size: usize) -> bool {
        let original = *allocation;
        self.observer.before_resize(original, new_size);
        let resized = self.inner.resize(allocation, new_size);
        self.observer.after_resize(original, new_size, resized);
        resized
    }
}
