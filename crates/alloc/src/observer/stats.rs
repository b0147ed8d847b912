//! Allocator statistics tracking
//!
//! [`StatsObserver`] turns the hook stream of a managed allocator into
//! [`AllocatorStats`]. Counts are derived from what callers request and what
//! the allocator returns; the observer has no view into the allocator
//! itself. A deallocation the allocator ignores (for example an out-of-order
//! free on a stack) is still counted and its bytes still subtracted.

use core::fmt;

use super::AllocationObserver;
use crate::allocation::Allocation;

/// Statistics for memory allocators
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocatorStats {
    /// Bytes handed out and not yet handed back
    pub allocated_bytes: usize,
    /// Peak of `allocated_bytes`
    pub peak_allocated_bytes: usize,
    /// Successful allocations, aligned and bulk included
    pub allocation_count: usize,
    /// Allocations answered with the null sentinel
    pub failed_allocations: usize,
    /// Deallocation requests
    pub deallocation_count: usize,
    /// Bulk releases
    pub reset_count: usize,
    /// Successful in-place resizes
    pub resize_count: usize,
    /// Rejected resizes
    pub failed_resizes: usize,
    /// Total bytes ever allocated (cumulative, growth by resize included)
    pub total_bytes_allocated: usize,
    /// Total bytes ever deallocated (cumulative, shrink by resize included)
    pub total_bytes_deallocated: usize,
}

impl AllocatorStats {
    /// Creates a new empty stats object
    pub const fn new() -> Self {
        Self {
            allocated_bytes: 0,
            peak_allocated_bytes: 0,
            allocation_count: 0,
            failed_allocations: 0,
            deallocation_count: 0,
            reset_count: 0,
            resize_count: 0,
            failed_resizes: 0,
            total_bytes_allocated: 0,
            total_bytes_deallocated: 0,
        }
    }

    /// Reset all statistics to zero
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Calculate the average allocation size
    pub fn average_allocation_size(&self) -> Option<f64> {
        if self.allocation_count > 0 {
            Some(self.total_bytes_allocated as f64 / self.allocation_count as f64)
        } else {
            None
        }
    }

    /// Share of allocation requests that succeeded (0.0 to 1.0)
    pub fn allocation_efficiency(&self) -> f64 {
        let total_attempts = self.allocation_count + self.failed_allocations;
        if total_attempts > 0 {
            self.allocation_count as f64 / total_attempts as f64
        } else {
            1.0
        }
    }

    /// Check if there are any bytes still handed out
    pub fn has_active_allocations(&self) -> bool {
        self.allocated_bytes > 0
    }

    fn record_allocation(&mut self, result: Allocation) {
        if result.is_null() {
            self.failed_allocations += 1;
            return;
        }
        self.allocation_count += 1;
        self.grow(result.size());
    }

    fn grow(&mut self, bytes: usize) {
        self.allocated_bytes = self.allocated_bytes.saturating_add(bytes);
        self.total_bytes_allocated = self.total_bytes_allocated.saturating_add(bytes);
        self.peak_allocated_bytes = self.peak_allocated_bytes.max(self.allocated_bytes);
    }

    fn shrink(&mut self, bytes: usize) {
        let released = bytes.min(self.allocated_bytes);
        self.allocated_bytes -= released;
        self.total_bytes_deallocated = self.total_bytes_deallocated.saturating_add(released);
    }
}

impl fmt::Display for AllocatorStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Allocator Statistics:")?;
        writeln!(f, "  Current allocated: {} bytes", self.allocated_bytes)?;
        writeln!(f, "  Peak allocated: {} bytes", self.peak_allocated_bytes)?;
        writeln!(f, "  Allocations: {}", self.allocation_count)?;
        writeln!(f, "  Failed allocations: {}", self.failed_allocations)?;
        writeln!(f, "  Deallocations: {}", self.deallocation_count)?;
        writeln!(f, "  Resets: {}", self.reset_count)?;
        writeln!(
            f,
            "  Resizes: {} ({} failed)",
            self.resize_count, self.failed_resizes
        )?;

        if let Some(avg) = self.average_allocation_size() {
            writeln!(f, "  Average allocation size: {avg:.2} bytes")?;
        }

        writeln!(
            f,
            "  Allocation efficiency: {:.2}%",
            self.allocation_efficiency() * 100.0
        )
    }
}

/// Observer that accumulates [`AllocatorStats`]
#[derive(Debug, Clone, Default)]
pub struct StatsObserver {
    stats: AllocatorStats,
}

impl StatsObserver {
    /// Creates an observer with all counters at zero
    pub const fn new() -> Self {
        Self {
            stats: AllocatorStats::new(),
        }
    }

    /// Snapshot of the counters so far
    pub fn stats(&self) -> &AllocatorStats {
        &self.stats
    }

    /// Reset all counters to zero
    pub fn reset(&mut self) {
        self.stats.reset();
    }
}

impl AllocationObserver for StatsObserver {
    fn after_allocate(&mut self, _size: usize, result: Allocation) {
        self.stats.record_allocation(result);
    }

    fn after_allocate_aligned(&mut self, _size: usize, _align_log2: u32, result: Allocation) {
        self.stats.record_allocation(result);
    }

    fn after_allocate_all(&mut self, result: Allocation) {
        self.stats.record_allocation(result);
    }

    fn after_deallocate(&mut self, allocation: Allocation) {
        self.stats.deallocation_count += 1;
        self.stats.shrink(allocation.size());
    }

    fn after_deallocate_all(&mut self) {
        self.stats.reset_count += 1;
        self.stats.shrink(self.stats.allocated_bytes);
    }

    fn after_resize(&mut self, original: Allocation, new_size: usize, success: bool) {
        if !success {
            self.stats.failed_resizes += 1;
            return;
        }
        self.stats.resize_count += 1;
        if new_size >= original.size() {
            self.stats.grow(new_size - original.size());
        } else {
            self.stats.shrink(original.size() - new_size);
        }
    }
}
