//! Capability traits for composable allocators
//!
//! Every operation beyond plain allocate/deallocate is its own trait, so a
//! component only implements what it can actually do:
//! - `Allocator`: allocate and deallocate a block
//! - `Owns`: structural ownership query
//! - `AlignedAllocator`: allocation with a power-of-two alignment
//! - `AllocateAll` / `DeallocateAll`: bulk operations
//! - `ResizableAllocator`: in-place grow and shrink
//!
//! Composites forward a capability only when every component they wrap has
//! it. Asking a composite for an operation its components lack is a compile
//! error, not a runtime failure.
//!
//! # Failure model
//!
//! Operations never panic and never return `Result`: failed allocations are
//! the null [`Allocation`] sentinel and failed resizes return `false`. A
//! deallocation the allocator cannot honor is ignored. The `try_*` helpers on
//! [`AllocatorExt`] convert sentinels into [`AllocError`] for callers that
//! prefer `?`.
//!
//! # Threading
//!
//! All operations take `&mut self`. Nothing here synchronizes; sharing one
//! composed allocator between threads needs an external lock around the
//! whole thing.

use core::alloc::Layout;
use core::ptr;

use super::{LimitedAllocator, ManagedAllocator, TryAllocator};
use crate::allocation::Allocation;
use crate::error::{AllocError, AllocResult};
use crate::observer::{AllocationObserver, NoopObserver};
use crate::utils::{alignment_from_log2, is_aligned};

/// Basic allocation capability
pub trait Allocator {
    /// Allocates `size` bytes
    ///
    /// Returns [`Allocation::null`] when the request cannot be satisfied.
    fn allocate(&mut self, size: usize) -> Allocation;

    /// Returns an allocation to the allocator
    ///
    /// Allocators that cannot reclaim the given block treat the call as a
    /// no-op. Passing a record that was never produced by this allocator
    /// must not corrupt its state.
    fn deallocate(&mut self, allocation: Allocation);
}

/// Structural ownership query
///
/// `owns` answers whether the record's address lies inside the allocator's
/// currently live range. It does not prove the record was actually handed
/// out: a fabricated record pointing into a live range is reported as owned.
pub trait Owns {
    /// Returns `true` if `allocation` lies in this allocator's live range
    fn owns(&self, allocation: Allocation) -> bool;
}

/// Allocation with a power-of-two alignment
pub trait AlignedAllocator: Allocator {
    /// Allocates `size` bytes aligned to `2^align_log2`
    ///
    /// Exponents whose alignment does not fit in `usize` fail with the
    /// sentinel.
    fn allocate_aligned(&mut self, size: usize, align_log2: u32) -> Allocation;
}

/// Bulk allocation of everything that is left
pub trait AllocateAll: Allocator {
    /// Hands out all remaining capacity as one allocation
    fn allocate_all(&mut self) -> Allocation;
}

/// Bulk release of every outstanding allocation
pub trait DeallocateAll: Allocator {
    /// Releases every outstanding allocation at once
    ///
    /// All records previously returned by this allocator become stale.
    fn deallocate_all(&mut self);
}

/// In-place resizing
pub trait ResizableAllocator: Allocator {
    /// Grows or shrinks `allocation` in place
    ///
    /// On success the record's size is updated and `true` is returned. On
    /// failure the record is left untouched and the caller decides whether
    /// to fall back to allocate + copy + deallocate (see
    /// [`AllocatorExt::reallocate`]).
    fn resize(&mut self, allocation: &mut Allocation, new_size: usize) -> bool;
}

// ============================================================================
// Blanket implementations for mutable references
// ============================================================================

impl<A: Allocator + ?Sized> Allocator for &mut A {
    #[inline]
    fn allocate(&mut self, size: usize) -> Allocation {
        (**self).allocate(size)
    }

    #[inline]
    fn deallocate(&mut self, allocation: Allocation) {
        (**self).deallocate(allocation);
    }
}

impl<A: Owns + ?Sized> Owns for &A {
    #[inline]
    fn owns(&self, allocation: Allocation) -> bool {
        (**self).owns(allocation)
    }
}

impl<A: Owns + ?Sized> Owns for &mut A {
    #[inline]
    fn owns(&self, allocation: Allocation) -> bool {
        (**self).owns(allocation)
    }
}

impl<A: AlignedAllocator + ?Sized> AlignedAllocator for &mut A {
    #[inline]
    fn allocate_aligned(&mut self, size: usize, align_log2: u32) -> Allocation {
        (**self).allocate_aligned(size, align_log2)
    }
}

impl<A: AllocateAll + ?Sized> AllocateAll for &mut A {
    #[inline]
    fn allocate_all(&mut self) -> Allocation {
        (**self).allocate_all()
    }
}

impl<A: DeallocateAll + ?Sized> DeallocateAll for &mut A {
    #[inline]
    fn deallocate_all(&mut self) {
        (**self).deallocate_all();
    }
}

impl<A: ResizableAllocator + ?Sized> ResizableAllocator for &mut A {
    #[inline]
    fn resize(&mut self, allocation: &mut Allocation, new_size: usize) -> bool {
        (**self).resize(allocation, new_size)
    }
}

// ============================================================================
// Extension trait
// ============================================================================

/// Convenience layer over the capability traits
///
/// Adds `Result`-returning variants of the core operations, a
/// resize-or-move `reallocate`, and builder methods for wrapping an
/// allocator in the crate's composites:
///
/// ```rust
/// use nebula_alloc::prelude::*;
///
/// let small = StackAllocator::new(256)?.limited::<1, 64>();
/// let large = StackAllocator::new(4096)?;
/// let mut chain = small.fallback(large).managed(StatsObserver::new());
///
/// let a = chain.try_allocate(32)?;
/// let b = chain.try_allocate(512)?;
/// assert!(chain.inner().primary().owns(a));
/// assert!(chain.inner().secondary().owns(b));
/// assert_eq!(chain.observer().stats().allocation_count, 2);
/// # Ok::<(), nebula_alloc::AllocError>(())
/// ```
pub trait AllocatorExt: Allocator {
    /// Allocates `size` bytes, mapping the sentinel to [`AllocError::Exhausted`]
    #[inline]
    fn try_allocate(&mut self, size: usize) -> AllocResult<Allocation> {
        let allocation = self.allocate(size);
        if allocation.is_null() {
            Err(AllocError::exhausted(size))
        } else {
            Ok(allocation)
        }
    }

    /// Aligned variant of [`try_allocate`](Self::try_allocate)
    ///
    /// Distinguishes an unrepresentable alignment
    /// ([`AllocError::InvalidAlignment`]) from exhaustion.
    #[inline]
    fn try_allocate_aligned(&mut self, size: usize, align_log2: u32) -> AllocResult<Allocation>
    where
        Self: AlignedAllocator,
    {
        if alignment_from_log2(align_log2).is_none() {
            return Err(AllocError::invalid_alignment(align_log2));
        }

        let allocation = self.allocate_aligned(size, align_log2);
        if allocation.is_null() {
            Err(AllocError::exhausted(size))
        } else {
            Ok(allocation)
        }
    }

    /// Allocates a block satisfying `layout`
    ///
    /// `Layout` alignments are always powers of two, so the exponent is the
    /// number of trailing zeros.
    #[inline]
    fn allocate_layout(&mut self, layout: Layout) -> Allocation
    where
        Self: AlignedAllocator,
    {
        self.allocate_aligned(layout.size(), layout.align().trailing_zeros())
    }

    /// Resizes `allocation` in place if possible, otherwise moves it
    ///
    /// A null record is treated as a fresh allocation. When moving, the
    /// first `min(old, new)` bytes are copied and the old block is
    /// deallocated. The new block gets no particular alignment, see
    /// [`reallocate_aligned`](Self::reallocate_aligned). On error the record
    /// and the memory it describes are unchanged.
    ///
    /// # Safety
    ///
    /// `allocation` must be null or a live record produced by this
    /// allocator, and nothing may hold a reference into its bytes.
    unsafe fn reallocate(&mut self, allocation: &mut Allocation, new_size: usize) -> AllocResult<()>
    where
        Self: ResizableAllocator,
    {
        if allocation.is_null() {
            *allocation = self.try_allocate(new_size)?;
            return Ok(());
        }

        if self.resize(allocation, new_size) {
            return Ok(());
        }

        let moved = self.try_allocate(new_size)?;
        // SAFETY: forwarded caller contract; `moved` is a fresh live block.
        unsafe { relocate(self, allocation, moved) };
        Ok(())
    }

    /// Aligned variant of [`reallocate`](Self::reallocate)
    ///
    /// The block keeps an address aligned to `2^align_log2`. Resizing in
    /// place is only attempted when the current address already satisfies
    /// the alignment; otherwise the block moves to a fresh aligned
    /// allocation.
    ///
    /// # Safety
    ///
    /// Same contract as [`reallocate`](Self::reallocate).
    unsafe fn reallocate_aligned(
        &mut self,
        allocation: &mut Allocation,
        new_size: usize,
        align_log2: u32,
    ) -> AllocResult<()>
    where
        Self: ResizableAllocator + AlignedAllocator,
    {
        let Some(alignment) = alignment_from_log2(align_log2) else {
            return Err(AllocError::invalid_alignment(align_log2));
        };

        if allocation.is_null() {
            *allocation = self.try_allocate_aligned(new_size, align_log2)?;
            return Ok(());
        }

        if is_aligned(allocation.addr(), alignment) && self.resize(allocation, new_size) {
            return Ok(());
        }

        let moved = self.try_allocate_aligned(new_size, align_log2)?;
        // SAFETY: forwarded caller contract; `moved` is a fresh live block.
        unsafe { relocate(self, allocation, moved) };
        Ok(())
    }

    /// Composes `self` with a secondary allocator tried when `self` fails
    #[inline]
    fn fallback<F>(self, secondary: F) -> TryAllocator<Self, F>
    where
        Self: Sized,
    {
        TryAllocator::new(self, secondary)
    }

    /// Wraps `self` with an observer notified around every operation
    #[inline]
    fn managed<M>(self, observer: M) -> ManagedAllocator<Self, M>
    where
        Self: Sized,
        M: AllocationObserver,
    {
        ManagedAllocator::with_observer(self, observer)
    }

    /// Wraps `self` with the no-op observer
    #[inline]
    fn unmanaged(self) -> ManagedAllocator<Self, NoopObserver>
    where
        Self: Sized,
    {
        ManagedAllocator::new(self)
    }

    /// Restricts `self` to requests of `MIN..=MAX` bytes
    #[inline]
    fn limited<const MIN: usize, const MAX: usize>(self) -> LimitedAllocator<Self, MIN, MAX>
    where
        Self: Sized,
    {
        LimitedAllocator::new(self)
    }
}

impl<A: Allocator + ?Sized> AllocatorExt for A {}

/// Copies the live prefix of `allocation` into `moved`, frees the old block
/// and points `allocation` at the new one
///
/// # Safety
///
/// `allocation` is a live record of `allocator` with no outstanding
/// references into it, and `moved` is a live block distinct from it.
unsafe fn relocate<A: Allocator + ?Sized>(
    allocator: &mut A,
    allocation: &mut Allocation,
    moved: Allocation,
) {
    let count = allocation.size().min(moved.size());
    if count > 0 {
        // SAFETY: Copying between two live allocations.
        // - both blocks are at least `count` bytes
        // - two live allocations never overlap
        unsafe {
            ptr::copy_nonoverlapping(allocation.as_ptr(), moved.as_ptr(), count);
        }
    }

    allocator.deallocate(*allocation);
    *allocation = moved;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::StackAllocator;

    #[test]
    fn try_allocate_maps_sentinel() {
        let mut stack = StackAllocator::new(64).unwrap();

        assert!(stack.try_allocate(64).is_ok());
        assert_eq!(stack.try_allocate(1), Err(AllocError::exhausted(1)));
    }

    #[test]
    fn try_allocate_aligned_rejects_huge_exponent() {
        let mut stack = StackAllocator::new(64).unwrap();

        assert_eq!(
            stack.try_allocate_aligned(8, usize::BITS),
            Err(AllocError::invalid_alignment(usize::BITS))
        );
        assert_eq!(stack.used(), 0);
    }

    #[test]
    fn allocate_layout_honors_alignment() {
        let mut stack = StackAllocator::new(256).unwrap();
        let _ = stack.allocate(3);

        let a = stack.allocate_layout(Layout::new::<u64>());
        assert!(!a.is_null());
        assert_eq!(a.size(), 8);
        assert_eq!(a.addr() % align_of::<u64>(), 0);
    }

    #[test]
    fn reallocate_grows_in_place_when_topmost() {
        let mut stack = StackAllocator::new(128).unwrap();
        let mut a = stack.allocate(16);
        let before = a.addr();

        unsafe { stack.reallocate(&mut a, 48).unwrap() };
        assert_eq!(a.addr(), before);
        assert_eq!(a.size(), 48);
        assert_eq!(stack.used(), 48);
    }

    #[test]
    fn reallocate_moves_and_copies_when_buried() {
        let mut stack = StackAllocator::new(128).unwrap();
        let mut a = stack.allocate(4);
        unsafe { ptr::copy_nonoverlapping([1u8, 2, 3, 4].as_ptr(), a.as_ptr(), 4) };
        let _b = stack.allocate(8);

        let old = a;
        unsafe { stack.reallocate(&mut a, 16).unwrap() };
        assert_ne!(a.addr(), old.addr());
        assert_eq!(a.size(), 16);

        let mut copied = [0u8; 4];
        unsafe { ptr::copy_nonoverlapping(a.as_ptr(), copied.as_mut_ptr(), 4) };
        assert_eq!(copied, [1, 2, 3, 4]);
    }

    #[test]
    fn reallocate_failure_leaves_record_untouched() {
        let mut stack = StackAllocator::new(32).unwrap();
        let mut a = stack.allocate(8);
        let _b = stack.allocate(8);
        let snapshot = a;

        let result = unsafe { stack.reallocate(&mut a, 64) };
        assert_eq!(result, Err(AllocError::exhausted(64)));
        assert_eq!(a, snapshot);
        assert_eq!(stack.used(), 16);
    }

    #[test]
    fn reallocate_null_allocates() {
        let mut stack = StackAllocator::new(32).unwrap();
        let mut a = Allocation::null();

        unsafe { stack.reallocate(&mut a, 8).unwrap() };
        assert!(!a.is_null());
        assert_eq!(a.size(), 8);
    }

    #[test]
    fn reallocate_aligned_keeps_alignment_when_moving() {
        let mut stack = StackAllocator::new(1024).unwrap();
        let mut a = stack.allocate_layout(Layout::from_size_align(64, 64).unwrap());
        unsafe { ptr::write_bytes(a.as_ptr(), 0x7E, 64) };
        let _pin = stack.allocate(1);

        unsafe { stack.reallocate_aligned(&mut a, 128, 6).unwrap() };
        assert_eq!(a.addr() % 64, 0);
        assert_eq!(a.size(), 128);

        let mut copied = [0u8; 64];
        unsafe { ptr::copy_nonoverlapping(a.as_ptr(), copied.as_mut_ptr(), 64) };
        assert!(copied.iter().all(|&byte| byte == 0x7E));
    }

    #[test]
    fn reallocate_aligned_grows_in_place_when_aligned() {
        let mut stack = StackAllocator::new(1024).unwrap();
        let mut a = stack.allocate_aligned(32, 4);
        let before = a.addr();

        unsafe { stack.reallocate_aligned(&mut a, 96, 4).unwrap() };
        assert_eq!(a.addr(), before);
        assert_eq!(a.size(), 96);
    }

    #[test]
    fn reallocate_aligned_moves_misaligned_topmost_block() {
        let mut stack = StackAllocator::new(1024).unwrap();
        let _ = stack.allocate_aligned(0, 6);
        let _ = stack.allocate(1);
        let mut a = stack.allocate(8);
        assert_ne!(a.addr() % 64, 0);

        unsafe { stack.reallocate_aligned(&mut a, 16, 6).unwrap() };
        assert_eq!(a.addr() % 64, 0);
        assert_eq!(a.size(), 16);
    }

    #[test]
    fn reallocate_aligned_rejects_huge_exponent() {
        let mut stack = StackAllocator::new(64).unwrap();
        let mut a = stack.allocate(8);
        let snapshot = a;

        let result = unsafe { stack.reallocate_aligned(&mut a, 16, usize::BITS) };
        assert_eq!(result, Err(AllocError::invalid_alignment(usize::BITS)));
        assert_eq!(a, snapshot);

        let mut fresh = Allocation::null();
        unsafe { stack.reallocate_aligned(&mut fresh, 8, 3).unwrap() };
        assert_eq!(fresh.addr() % 8, 0);
    }

    #[test]
    fn works_through_mutable_reference() {
        fn fill<A: Allocator>(mut alloc: A) -> usize {
            let mut count = 0;
            while !alloc.allocate(8).is_null() {
                count += 1;
            }
            count
        }

        let mut stack = StackAllocator::new(64).unwrap();
        assert_eq!(fill(&mut stack), 8);
        assert_eq!(stack.available(), 0);
    }
}
