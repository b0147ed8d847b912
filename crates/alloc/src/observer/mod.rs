//! Observers for [`ManagedAllocator`](crate::allocator::ManagedAllocator)
//!
//! An observer receives a before-hook and an after-hook around every
//! operation of the allocator it is attached to. Every hook has an empty
//! default body, so an observer only overrides the events it cares about.
//!
//! ## Modules
//! - `stats` - `StatsObserver`, counters and byte totals
//! - `logging` - `TracingObserver`, emits `tracing` events (feature `logging`)

#[cfg(feature = "logging")]
pub mod logging;
pub mod stats;

#[cfg(feature = "logging")]
pub use logging::TracingObserver;
pub use stats::{AllocatorStats, StatsObserver};

use crate::allocation::Allocation;

/// Hooks invoked around allocator operations
///
/// After-hooks receive the operation's result, or for `after_resize` the
/// record as it was before the call plus whether the resize succeeded.
/// Observers see results; they cannot change them.
pub trait AllocationObserver {
    /// Called before `allocate`
    fn before_allocate(&mut self, _size: usize) {}

    /// Called with the result of `allocate`
    fn after_allocate(&mut self, _size: usize, _result: Allocation) {}

    /// Called before `allocate_aligned`
    fn before_allocate_aligned(&mut self, _size: usize, _align_log2: u32) {}

    /// Called with the result of `allocate_aligned`
    fn after_allocate_aligned(&mut self, _size: usize, _align_log2: u32, _result: Allocation) {}

    /// Called before `allocate_all`
    fn before_allocate_all(&mut self) {}

    /// Called with the result of `allocate_all`
    fn after_allocate_all(&mut self, _result: Allocation) {}

    /// Called before `deallocate`
    fn before_deallocate(&mut self, _allocation: Allocation) {}

    /// Called after `deallocate` with the record that was freed
    fn after_deallocate(&mut self, _allocation: Allocation) {}

    /// Called before `deallocate_all`
    fn before_deallocate_all(&mut self) {}

    /// Called after `deallocate_all`
    fn after_deallocate_all(&mut self) {}

    /// Called before `resize`
    fn before_resize(&mut self, _allocation: Allocation, _new_size: usize) {}

    /// Called after `resize` with the original record and the outcome
    fn after_resize(&mut self, _original: Allocation, _new_size: usize, _success: bool) {}
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoopObserver;

impl AllocationObserver for NoopObserver {}

impl<M: AllocationObserver + ?Sized> AllocationObserver for &mut M {
    fn before_allocate(&mut self, size: usize) {
        (**self).before_allocate(size);
    }

    fn after_allocate(&mut self, size: usize, result: Allocation) {
        (**self).after_allocate(size, result);
    }

    fn before_allocate_aligned(&mut self, size: usize, align_log2: u32) {
        (**self).before_allocate_aligned(size, align_log2);
    }

    fn after_allocate_aligned(&mut self, size: usize, align_log2: u32, result: Allocation) {
        (**self).after_allocate_aligned(size, align_log2, result);
    }

    fn before_allocate_all(&mut self) {
        (**self).before_allocate_all();
    }

    fn after_allocate_all(&mut self, result: Allocation) {
        (**self).after_allocate_all(result);
    }

    fn before_deallocate(&mut self, allocation: Allocation) {
        (**self).before_deallocate(allocation);
    }

    fn after_deallocate(&mut self, allocation: Allocation) {
        (**self).after_deallocate(allocation);
    }

    fn before_deallocate_all(&mut self) {
        (**self).before_deallocate_all();
    }

    fn after_deallocate_all(&mut self) {
        (**self).after_deallocate_all();
    }

    fn before_resize(&mut self, allocation: Allocation, new_size: usize) {
        (**self).before_resize(allocation, new_size);
    }

    fn after_resize(&mut self, original: Allocation, new_size: usize, success: bool) {
        (**self).after_resize(original, new_size, success);
    }
}

/// Pairs two observers
///
/// Before-hooks run `A` then `B`; after-hooks run `B` then `A`, so the pair
/// nests like two stacked [`ManagedAllocator`](crate::allocator::ManagedAllocator)s.
impl<A: AllocationObserver, B: AllocationObserver> AllocationObserver for (A, B) {
    fn before_allocate(&mut self, size: usize) {
        self.0.before_allocate(size);
        self.1.before_allocate(size);
    }

    fn after_allocate(&mut self, size: usize, result: Allocation) {
        self.1.after_allocate(size, result);
        self.0.after_allocate(size, result);
    }

    fn before_allocate_aligned(&mut self, size: usize, align_log2: u32) {
        self.0.before_allocate_aligned(size, align_log2);
        self.1.before_allocate_aligned(size, align_log2);
    }

    fn after_allocate_aligned(&mut self, size: usize, align_log2: u32, result: Allocation) {
        self.1.after_allocate_aligned(size, align_log2, result);
        self.0.after_allocate_aligned(size, align_log2, result);
    }

    fn before_allocate_all(&mut self) {
        self.0.before_allocate_all();
        self.1.before_allocate_all();
    }

    fn after_allocate_all(&mut self, result: Allocation) {
        self.1.after_allocate_all(result);
        self.0.after_allocate_all(result);
    }

    fn before_deallocate(&mut self, allocation: Allocation) {
        self.0.before_deallocate(allocation);
        self.1.before_deallocate(allocation);
    }

    fn after_deallocate(&mut self, allocation: Allocation) {
        self.1.after_deallocate(allocation);
        self.0.after_deallocate(allocation);
    }

    fn before_deallocate_all(&mut self) {
        self.0.before_deallocate_all();
        self.1.before_deallocate_all();
    }

    fn after_deallocate_all(&mut self) {
        self.1.after_deallocate_all();
        self.0.after_deallocate_all();
    }

    fn before_resize(&mut self, allocation: Allocation, new_size: usize) {
        self.0.before_resize(allocation, new_size);
        self.1.before_resize(allocation, new_size);
    }

    fn after_resize(&mut self, original: Allocation, new_size: usize, success: bool) {
        self.1.after_resize(original, new_size, success);
        self.0.after_resize(original, new_size, success);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::{Allocator, AllocatorExt, StackAllocator};

    struct Tagged(&'static str, Vec<String>);

    impl AllocationObserver for Tagged {
        fn before_allocate(&mut self, _size: usize) {
            self.1.push(format!("{}:before", self.0));
        }

        fn after_allocate(&mut self, _size: usize, _result: Allocation) {
            self.1.push(format!("{}:after", self.0));
        }
    }

    #[test]
    fn pair_nests_hooks() {
        let mut first = Tagged("a", Vec::new());
        let mut second = Tagged("b", Vec::new());
        {
            let mut alloc = StackAllocator::new(32)
                .unwrap()
                .managed((&mut first, &mut second));
            let _ = alloc.allocate(8);
        }

        assert_eq!(first.1, ["a:before", "a:after"]);
        assert_eq!(second.1, ["b:before", "b:after"]);
    }

    #[test]
    fn pair_order_is_symmetric() {
        use std::cell::RefCell;

        struct Shared<'a>(&'static str, &'a RefCell<Vec<String>>);
        impl AllocationObserver for Shared<'_> {
            fn before_allocate(&mut self, _size: usize) {
                self.1.borrow_mut().push(format!("{}:before", self.0));
            }
            fn after_allocate(&mut self, _size: usize, _result: Allocation) {
                self.1.borrow_mut().push(format!("{}:after", self.0));
            }
        }

        let log = RefCell::new(Vec::new());
        let mut alloc = StackAllocator::new(32)
            .unwrap()
            .managed((Shared("a", &log), Shared("b", &log)));
        let _ = alloc.allocate(8);

        assert_eq!(*log.borrow(), ["a:before", "b:before", "b:after", "a:after"]);
    }

    #[test]
    fn noop_observer_is_default() {
        let alloc = StackAllocator::new(8).unwrap().unmanaged();
        assert_eq!(*alloc.observer(), NoopObserver);
    }
}
