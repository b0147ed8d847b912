//! Alignment arithmetic shared by the allocators

/// Converts an alignment exponent into a byte alignment
///
/// Returns `None` when `2^align_log2` does not fit in `usize`.
///
/// # Examples
/// ```
/// use nebula_alloc::utils::alignment_from_log2;
///
/// assert_eq!(alignment_from_log2(0), Some(1));
/// assert_eq!(alignment_from_log2(4), Some(16));
/// assert_eq!(alignment_from_log2(usize::BITS), None);
/// ```
#[inline]
pub const fn alignment_from_log2(align_log2: u32) -> Option<usize> {
    1usize.checked_shl(align_log2)
}

/// Aligns a value up to the nearest multiple of `alignment`, `None` on overflow
///
/// # Examples
/// ```
/// use nebula_alloc::utils::checked_align_up;
///
/// assert_eq!(checked_align_up(7, 8), Some(8));
/// assert_eq!(checked_align_up(8, 8), Some(8));
/// assert_eq!(checked_align_up(usize::MAX, 8), None);
/// ```
#[inline]
pub const fn checked_align_up(value: usize, alignment: usize) -> Option<usize> {
    debug_assert!(alignment.is_power_of_two());
    match value.checked_add(alignment - 1) {
        Some(bumped) => Some(bumped & !(alignment - 1)),
        None => None,
    }
}

/// Checks whether a value is a multiple of `alignment`
#[inline]
pub const fn is_aligned(value: usize, alignment: usize) -> bool {
    debug_assert!(alignment.is_power_of_two());
    value & (alignment - 1) == 0
}

/// Calculates the padding needed to align a value, `None` on overflow
///
/// # Examples
/// ```
/// use nebula_alloc::utils::padding_needed;
///
/// assert_eq!(padding_needed(7, 8), Some(1));
/// assert_eq!(padding_needed(8, 8), Some(0));
/// ```
#[inline]
pub const fn padding_needed(value: usize, alignment: usize) -> Option<usize> {
    match checked_align_up(value, alignment) {
        Some(aligned) => Some(aligned - value),
        None => None,
    }
}
