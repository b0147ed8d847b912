//! `tracing` integration
//!
//! [`TracingObserver`] emits one event per completed operation under the
//! `nebula_alloc` target. Successes are `debug`, failures are `warn`.

use tracing::{debug, warn};

use super::AllocationObserver;
use crate::allocation::Allocation;

/// Observer that logs every allocator operation through `tracing`
///
/// The label tells apart several managed allocators in one log stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracingObserver {
    label: &'static str,
}

impl TracingObserver {
    /// Creates an observer tagging every event with `label`
    pub const fn new(label: &'static str) -> Self {
        Self { label }
    }

    /// Label attached to every event as the `allocator` field
    pub const fn label(&self) -> &'static str {
        self.label
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("allocator")
    }
}

impl AllocationObserver for TracingObserver {
    fn after_allocate(&mut self, size: usize, result: Allocation) {
        if result.is_null() {
            warn!(target: "nebula_alloc", allocator = self.label, size, "allocation failed");
        } else {
            debug!(
                target: "nebula_alloc",
                allocator = self.label,
                size,
                address = result.addr(),
                "allocated"
            );
        }
    }

    fn after_allocate_aligned(&mut self, size: usize, align_log2: u32, result: Allocation) {
        if result.is_null() {
            warn!(
                target: "nebula_alloc",
                allocator = self.label,
                size,
                align_log2,
                "aligned allocation failed"
            );
        } else {
            debug!(
                target: "nebula_alloc",
                allocator = self.label,
                size,
                align_log2,
                address = result.addr(),
                "allocated aligned"
            );
        }
    }

    fn after_allocate_all(&mut self, result: Allocation) {
        if result.is_null() {
            warn!(target: "nebula_alloc", allocator = self.label, "nothing left to allocate");
        } else {
            debug!(
                target: "nebula_alloc",
                allocator = self.label,
                size = result.size(),
                address = result.addr(),
                "allocated remaining capacity"
            );
        }
    }

    fn after_deallocate(&mut self, allocation: Allocation) {
        debug!(
            target: "nebula_alloc",
            allocator = self.label,
            size = allocation.size(),
            address = allocation.addr(),
            "deallocated"
        );
    }

    fn after_deallocate_all(&mut self) {
        debug!(target: "nebula_alloc", allocator = self.label, "deallocated all");
    }

    fn after_resize(&mut self, original: Allocation, new_size: usize, success: bool) {
        if success {
            debug!(
                target: "nebula_alloc",
                allocator = self.label,
                from = original.size(),
                to = new_size,
                address = original.addr(),
                "resized in place"
            );
        } else {
            warn!(
                target: "nebula_alloc",
                allocator = self.label,
                from = original.size(),
                to = new_size,
                "resize rejected"
            );
        }
    }
}
