//! RAII-based stack frame for automatic restoration

use core::ops::{Deref, DerefMut};

use super::{StackAllocator, StackMarker};

/// RAII helper for stack-based scoped allocation
///
/// Marks the cursor on creation and rewinds to it when dropped, so every
/// allocation made through the frame is released at the end of the scope.
///
/// ```rust
/// use nebula_alloc::prelude::*;
///
/// let mut stack = StackAllocator::new(128)?;
/// {
///     let mut frame = StackFrame::new(&mut stack);
///     let scratch = frame.allocate(100);
///     assert!(!scratch.is_null());
/// }
/// assert_eq!(stack.used(), 0);
/// # Ok::<(), nebula_alloc::AllocError>(())
/// ```
pub struct StackFrame<'a> {
    allocator: &'a mut StackAllocator,
    marker: StackMarker,
}

impl<'a> StackFrame<'a> {
    /// Creates a new stack frame that will restore to the current position
    /// when dropped
    pub fn new(allocator: &'a mut StackAllocator) -> Self {
        let marker = allocator.mark();
        Self { allocator, marker }
    }

    /// Marker this frame rewinds to
    pub fn marker(&self) -> StackMarker {
        self.marker
    }

    /// Manually restore and consume this frame
    pub fn restore(self) {
        drop(self);
    }
}

impl Deref for StackFrame<'_> {
    type Target = StackAllocator;

    fn deref(&self) -> &StackAllocator {
        self.allocator
    }
}

impl DerefMut for StackFrame<'_> {
    fn deref_mut(&mut self) -> &mut StackAllocator {
        self.allocator
    }
}

impl Drop for StackFrame<'_> {
    fn drop(&mut self) {
        // A reset inside the frame leaves the marker ahead of the cursor; that
        // release is rejected and the cursor stays where the reset put it.
        let _ = self.allocator.release(self.marker);
    }
}
