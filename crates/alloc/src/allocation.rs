//! The allocation record shared by every allocator in the crate

use core::fmt;
use core::ptr::{self, NonNull};

/// Descriptor of a contiguous memory region: start address plus size
///
/// A record with no address is the universal failure sentinel, see
/// [`Allocation::null`]. Records carry no ownership tag; which allocator a
/// record belongs to is decided structurally by
/// [`Owns::owns`](crate::allocator::Owns::owns), which checks whether the
/// address falls inside that allocator's live range.
///
/// Records are plain values. Creating, copying or comparing them is safe;
/// reading or writing the bytes they describe is not, and is only sound
/// while the record is live (returned by an allocator and not yet freed or
/// reset away).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Allocation {
    ptr: Option<NonNull<u8>>,
    size: usize,
}

impl Allocation {
    /// The failure sentinel: no address, size zero
    #[inline]
    pub const fn null() -> Self {
        Self { ptr: None, size: 0 }
    }

    /// Creates a record describing `size` bytes starting at `ptr`
    #[inline]
    pub const fn new(ptr: NonNull<u8>, size: usize) -> Self {
        Self {
            ptr: Some(ptr),
            size,
        }
    }

    /// Creates a record from a raw pointer; a null pointer yields the sentinel
    #[inline]
    pub fn from_raw(ptr: *mut u8, size: usize) -> Self {
        match NonNull::new(ptr) {
            Some(ptr) => Self::new(ptr, size),
            None => Self::null(),
        }
    }

    /// Returns `true` for the failure sentinel
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.ptr.is_none()
    }

    /// Start of the region, if any
    #[inline]
    pub const fn ptr(&self) -> Option<NonNull<u8>> {
        self.ptr
    }

    /// Start of the region as a raw pointer, null for the sentinel
    #[inline]
    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr.map_or(ptr::null_mut(), NonNull::as_ptr)
    }

    /// Start address as an integer, `0` for the sentinel
    #[inline]
    pub fn addr(&self) -> usize {
        self.ptr.map_or(0, |p| p.as_ptr() as usize)
    }

    /// One past the last byte, `None` for the sentinel or on overflow
    #[inline]
    pub fn end_addr(&self) -> Option<usize> {
        self.ptr
            .and_then(|p| (p.as_ptr() as usize).checked_add(self.size))
    }

    /// Number of bytes described by the record
    #[inline]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// The region as a slice pointer, `None` for the sentinel
    #[inline]
    pub fn as_non_null_slice(&self) -> Option<NonNull<[u8]>> {
        self.ptr
            .map(|p| NonNull::slice_from_raw_parts(p, self.size))
    }

    /// Overwrites the recorded size; used by in-place resizing
    #[inline]
    pub(crate) fn set_size(&mut self, size: usize) {
        self.size = size;
    }
}

impl Default for Allocation {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Debug for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ptr {
            Some(ptr) => f
                .debug_struct("Allocation")
                .field("address", &ptr)
                .field("size", &self.size)
                .finish(),
            None => f.write_str("Allocation(null)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_the_sentinel() {
        let a = Allocation::null();
        assert!(a.is_null());
        assert_eq!(a.size(), 0);
        assert_eq!(a.addr(), 0);
        assert!(a.as_ptr().is_null());
        assert_eq!(a.end_addr(), None);
        assert_eq!(Allocation::default(), a);
        assert_eq!(Allocation::from_raw(ptr::null_mut(), 16), a);
    }

    #[test]
    fn accessors_describe_the_region() {
        let mut bytes = [0u8; 32];
        let ptr = NonNull::new(bytes.as_mut_ptr()).unwrap();
        let a = Allocation::new(ptr, 32);

        assert!(!a.is_null());
        assert_eq!(a.addr(), bytes.as_ptr() as usize);
        assert_eq!(a.end_addr(), Some(bytes.as_ptr() as usize + 32));
        assert_eq!(a.as_non_null_slice().unwrap().len(), 32);
    }

    #[test]
    fn debug_output() {
        assert_eq!(format!("{:?}", Allocation::null()), "Allocation(null)");

        let mut byte = 0u8;
        let a = Allocation::new(NonNull::from(&mut byte), 1);
        assert!(format!("{a:?}").contains("size: 1"));
    }
}
