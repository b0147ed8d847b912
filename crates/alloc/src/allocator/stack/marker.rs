//! Stack marker for position tracking

/// Marker representing a cursor position in a [`StackAllocator`](super::StackAllocator)
///
/// Releasing a marker rewinds the cursor to this position, deallocating
/// every allocation made after the marker was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StackMarker {
    pub(super) position: usize,
}
