//! Main stack allocator implementation
//!
//! # Safety
//!
//! This module implements a single-threaded LIFO region allocator:
//! - The buffer is allocated once and owned through a raw pointer, so its
//!   address survives moves of the allocator
//! - No reference to the buffer is formed after construction; fill patterns
//!   are written through the raw pointer
//! - Deallocations only reclaim the most recent allocation
//!
//! ## Invariants
//!
//! - `0 <= top <= capacity` at all times
//! - Every live allocation lies in `[base, base + top)`
//! - Allocations are carved in address order, so two live allocations
//!   never overlap

use core::ptr::{self, NonNull};

#[cfg(feature = "logging")]
use tracing::{debug, trace};

use super::{StackConfig, StackMarker};
use crate::allocation::Allocation;
use crate::allocator::{
    AlignedAllocator, AllocateAll, Allocator, DeallocateAll, Owns, ResizableAllocator,
};
use crate::error::{AllocError, AllocResult};
use crate::utils::{alignment_from_log2, padding_needed};

/// Stack allocator that supports LIFO allocation and deallocation
///
/// The region owns a fixed buffer and a cursor. Allocation bumps the cursor;
/// only the block directly below the cursor can be freed or resized.
/// Out-of-order frees are silently ignored, wasting the block until the
/// region is reset.
///
/// # Memory Layout
/// ```text
/// [base]----[alloc1]----[alloc2]----[alloc3]----[top]----[free]----[end]
///            <------ allocated ------>         <-- available -->
/// ```
///
/// Deallocations must happen in reverse order: alloc3, then alloc2, then alloc1.
pub struct StackAllocator {
    /// Owned buffer, released in `Drop`
    memory: NonNull<[u8]>,

    /// Configuration
    config: StackConfig,

    /// Offset of the first unused byte
    top: usize,
}

impl StackAllocator {
    /// Creates a new stack allocator with custom configuration
    pub fn with_config(capacity: usize, config: StackConfig) -> AllocResult<Self> {
        if capacity == 0 {
            return Err(AllocError::invalid_config("capacity cannot be zero"));
        }
        config.validate()?;

        let mut buffer = vec![0u8; capacity];
        if let Some(pattern) = config.alloc_pattern {
            buffer.fill(pattern);
        }
        let memory = NonNull::from(Box::leak(buffer.into_boxed_slice()));

        #[cfg(feature = "logging")]
        debug!(target: "nebula_alloc", capacity, "created stack allocator");

        Ok(Self {
            memory,
            config,
            top: 0,
        })
    }

    /// Creates a new stack allocator with default configuration
    pub fn new(capacity: usize) -> AllocResult<Self> {
        Self::with_config(capacity, StackConfig::default())
    }

    /// Returns the total capacity of the allocator
    pub fn capacity(&self) -> usize {
        self.memory.len()
    }

    /// Returns the amount of memory currently allocated, padding included
    pub fn used(&self) -> usize {
        self.top
    }

    /// Returns the amount of memory available for allocation
    pub fn available(&self) -> usize {
        self.capacity() - self.top
    }

    /// Returns the configuration
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    #[inline]
    fn base(&self) -> *mut u8 {
        self.memory.as_ptr().cast::<u8>()
    }

    #[inline]
    fn base_addr(&self) -> usize {
        self.base() as usize
    }

    /// Offset of the record's address inside the buffer, if it is inside
    #[inline]
    fn offset_of(&self, allocation: Allocation) -> Option<usize> {
        if allocation.is_null() {
            return None;
        }
        allocation
            .addr()
            .checked_sub(self.base_addr())
            .filter(|&offset| offset <= self.capacity())
    }

    /// Checks whether `allocation` is the block directly below the cursor
    ///
    /// Only such a block can be deallocated or resized.
    pub fn is_topmost(&self, allocation: Allocation) -> bool {
        self.offset_of(allocation)
            .and_then(|offset| offset.checked_add(allocation.size()))
            .is_some_and(|end| end == self.top)
    }

    /// Creates a marker at the current cursor position
    ///
    /// The marker can be released later to free every allocation made
    /// after this point at once.
    pub fn mark(&self) -> StackMarker {
        StackMarker {
            position: self.base_addr() + self.top,
        }
    }

    /// Rewinds the cursor to a previously taken marker
    ///
    /// Returns `false` and changes nothing if the marker lies ahead of the
    /// cursor (for example after a reset) or outside this buffer's live
    /// range. Records handed out after the marker become stale.
    ///
    /// Markers are plain positions, like ownership checks: a marker from
    /// another allocator whose position happens to fall in
    /// `[base, base + used]` is accepted.
    pub fn release(&mut self, marker: StackMarker) -> bool {
        match marker.position.checked_sub(self.base_addr()) {
            Some(offset) if offset <= self.top => {
                self.fill(offset, self.top - offset, self.config.dealloc_pattern);
                self.top = offset;
                true
            }
            _ => false,
        }
    }

    /// Writes `pattern` over `len` bytes at `offset`
    #[inline]
    fn fill(&mut self, offset: usize, len: usize, pattern: Option<u8>) {
        if let Some(pattern) = pattern {
            debug_assert!(offset + len <= self.capacity());
            // SAFETY: Writing a fill pattern inside the owned buffer.
            // - offset + len <= capacity (callers pass ranges within the buffer)
            // - The buffer is exclusively owned and `&mut self` is held
            unsafe {
                ptr::write_bytes(self.base().add(offset), pattern, len);
            }
        }
    }

    /// Carves `size` bytes at `offset` and moves the cursor past them
    #[inline]
    fn carve(&mut self, offset: usize, size: usize) -> Allocation {
        debug_assert!(offset + size <= self.capacity());
        self.fill(offset, size, self.config.alloc_pattern);
        self.top = offset + size;
        // SAFETY: offset <= capacity, so the pointer stays inside the buffer
        // (or one past its end for a zero-sized block at the very end).
        let ptr = unsafe { NonNull::new_unchecked(self.base().add(offset)) };
        Allocation::new(ptr, size)
    }

    #[cold]
    #[cfg_attr(not(feature = "logging"), allow(unused_variables))]
    fn exhausted(&self, requested: usize) -> Allocation {
        #[cfg(feature = "logging")]
        trace!(
            target: "nebula_alloc",
            requested,
            available = self.available(),
            "stack allocator exhausted"
        );
        Allocation::null()
    }
}

impl Allocator for StackAllocator {
    fn allocate(&mut self, size: usize) -> Allocation {
        if size > self.available() {
            return self.exhausted(size);
        }
        self.carve(self.top, size)
    }

    fn deallocate(&mut self, allocation: Allocation) {
        if !self.is_topmost(allocation) {
            #[cfg(feature = "logging")]
            trace!(
                target: "nebula_alloc",
                ?allocation,
                "ignored deallocation of a block below the top"
            );
            return;
        }

        let offset = self.top - allocation.size();
        self.fill(offset, allocation.size(), self.config.dealloc_pattern);
        self.top = offset;
    }
}

impl AlignedAllocator for StackAllocator {
    fn allocate_aligned(&mut self, size: usize, align_log2: u32) -> Allocation {
        let Some(alignment) = alignment_from_log2(align_log2) else {
            return self.exhausted(size);
        };
        let Some(padding) = padding_needed(self.base_addr() + self.top, alignment) else {
            return self.exhausted(size);
        };

        match padding.checked_add(size) {
            Some(needed) if needed <= self.available() => self.carve(self.top + padding, size),
            _ => self.exhausted(size),
        }
    }
}

impl AllocateAll for StackAllocator {
    fn allocate_all(&mut self) -> Allocation {
        match self.available() {
            0 => self.exhausted(0),
            remaining => self.carve(self.top, remaining),
        }
    }
}

impl DeallocateAll for StackAllocator {
    fn deallocate_all(&mut self) {
        #[cfg(feature = "logging")]
        debug!(target: "nebula_alloc", released = self.top, "stack allocator reset");

        self.fill(0, self.top, self.config.dealloc_pattern);
        self.top = 0;
    }
}

impl ResizableAllocator for StackAllocator {
    fn resize(&mut self, allocation: &mut Allocation, new_size: usize) -> bool {
        if !self.is_topmost(*allocation) {
            return false;
        }

        let offset = self.top - allocation.size();
        let new_top = match offset.checked_add(new_size) {
            Some(new_top) if new_top <= self.capacity() => new_top,
            _ => return false,
        };

        if new_top > self.top {
            self.fill(self.top, new_top - self.top, self.config.alloc_pattern);
        } else {
            self.fill(new_top, self.top - new_top, self.config.dealloc_pattern);
        }

        self.top = new_top;
        allocation.set_size(new_size);
        true
    }
}

impl Owns for StackAllocator {
    fn owns(&self, allocation: Allocation) -> bool {
        self.offset_of(allocation)
            .is_some_and(|offset| offset < self.top)
    }
}

impl Drop for StackAllocator {
    fn drop(&mut self) {
        // SAFETY: `memory` came from `Box::leak` in `with_config` and is
        // reclaimed exactly once, here.
        unsafe {
            drop(Box::from_raw(self.memory.as_ptr()));
        }
    }
}

impl core::fmt::Debug for StackAllocator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StackAllocator")
            .field("capacity", &self.capacity())
            .field("used", &self.top)
            .field("config", &self.config)
            .finish()
    }
}

// SAFETY: StackAllocator can be sent between threads.
// - The buffer is exclusively owned, nothing else points into it except
//   allocation records, which are not dereferenced by the allocator
// - All mutation requires `&mut self`
unsafe impl Send for StackAllocator {}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(capacity: usize) -> StackAllocator {
        StackAllocator::with_config(capacity, StackConfig::production()).unwrap()
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(
            StackAllocator::new(0),
            Err(AllocError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn allocations_are_contiguous() {
        let mut stack = region(64);
        let a = stack.allocate(10);
        let b = stack.allocate(20);

        assert_eq!(b.addr(), a.addr() + 10);
        assert_eq!(stack.used(), 30);
        assert_eq!(stack.available(), 34);
    }

    #[test]
    fn exhaustion_returns_sentinel_without_moving_cursor() {
        let mut stack = region(16);
        let _ = stack.allocate(10);

        assert!(stack.allocate(7).is_null());
        assert_eq!(stack.used(), 10);
        assert!(!stack.allocate(6).is_null());
    }

    #[test]
    fn zero_sized_allocation_sits_at_cursor() {
        let mut stack = region(16);
        let _ = stack.allocate(4);
        let z = stack.allocate(0);

        assert!(!z.is_null());
        assert_eq!(z.addr(), stack.base_addr() + 4);
        assert!(!stack.owns(z));
        assert_eq!(stack.used(), 4);
    }

    #[test]
    fn aligned_allocation_pads_cursor() {
        let mut stack = region(128);
        let _ = stack.allocate(1);
        let a = stack.allocate_aligned(8, 4);

        assert!(!a.is_null());
        assert_eq!(a.addr() % 16, 0);
        assert_eq!(stack.used(), a.addr() - stack.base_addr() + 8);
    }

    #[test]
    fn aligned_allocation_fails_when_padding_does_not_fit() {
        let mut stack = region(16);
        let _ = stack.allocate(1);

        // 2^63 alignment can never be satisfied inside a small buffer
        let before = stack.used();
        assert!(stack.allocate_aligned(1, usize::BITS - 1).is_null());
        assert!(stack.allocate_aligned(1, usize::BITS).is_null());
        assert_eq!(stack.used(), before);
    }

    #[test]
    fn allocate_all_takes_the_rest() {
        let mut stack = region(32);
        let _ = stack.allocate(12);

        let rest = stack.allocate_all();
        assert_eq!(rest.size(), 20);
        assert_eq!(stack.available(), 0);
        assert!(stack.allocate_all().is_null());
    }

    #[test]
    fn forged_record_before_buffer_is_ignored() {
        let mut stack = region(32);
        let _ = stack.allocate(8);

        // address + size lands on the cursor, but the address precedes the buffer
        let forged = Allocation::from_raw((stack.base_addr() - 8) as *mut u8, 16);
        stack.deallocate(forged);
        assert_eq!(stack.used(), 8);

        let mut forged = forged;
        assert!(!stack.resize(&mut forged, 4));
        assert_eq!(forged.size(), 16);
    }

    #[test]
    fn marker_release() {
        let mut stack = region(64);
        let _ = stack.allocate(8);
        let marker = stack.mark();
        let _ = stack.allocate(16);
        let _ = stack.allocate(16);

        assert!(stack.release(marker));
        assert_eq!(stack.used(), 8);

        stack.deallocate_all();
        assert!(!stack.release(marker), "marker ahead of the cursor");
        assert_eq!(stack.used(), 0);
    }

    #[test]
    fn marker_from_another_region_is_rejected() {
        let mut first = region(64);
        let mut second = region(64);
        let _ = first.allocate(16);
        let _ = second.allocate(8);

        // Strictly inside `second`'s buffer, so never inside `first`'s
        let foreign = second.mark();
        assert!(!first.release(foreign));
        assert_eq!(first.used(), 16);
        assert!(second.release(foreign));
        assert_eq!(second.used(), 8);
    }

    #[test]
    fn fill_patterns_are_applied() {
        let mut stack = StackAllocator::with_config(16, StackConfig::debug()).unwrap();
        let a = stack.allocate(4);
        let byte = unsafe { *a.as_ptr() };
        assert_eq!(byte, 0xCC);

        stack.deallocate(a);
        let byte = unsafe { *a.as_ptr() };
        assert_eq!(byte, 0xDD);
    }

    #[test]
    fn buffer_survives_moves() {
        let mut stack = region(32);
        let a = stack.allocate(8);

        let moved = Box::new(stack);
        assert!(moved.owns(a));
    }
}
