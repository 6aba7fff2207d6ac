//! Missing-range detection.

use std::ops::Range;

/// Window `[from, to)` widened by `buffer` on both sides, clamped to `[0, len)`.
pub(crate) fn padded(from: usize, to: usize, buffer: usize, len: usize) -> Range<usize> {
    let lo = from.saturating_sub(buffer).min(len);
    let hi = to.saturating_add(buffer).min(len);
    lo..hi.max(lo)
}

/// Smallest sub-range of `span` covering every index that is not resident.
///
/// Scans right from the left edge and left from the right edge, stopping at the
/// first missing index on each side. Resident islands in the middle are
/// covered too; one request fills the whole gap. `None` if nothing is missing.
pub(crate) fn missing_span(
    span: Range<usize>,
    is_resident: impl Fn(usize) -> bool,
) -> Option<Range<usize>> {
    let start = span.clone().find(|&i| !is_resident(i))?;
    let last = (start..span.end).rev().find(|&i| !is_resident(i))?;
    Some(start..last + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_clamps() {
        assert_eq!(padded(20, 30, 5, 100), 15..35);
        assert_eq!(padded(0, 5, 10, 100), 0..15);
        assert_eq!(padded(95, 100, 5, 100), 90..100);
        assert_eq!(padded(3, 3, 0, 100), 3..3);
        assert_eq!(padded(150, 160, 5, 100), 100..100);
        assert_eq!(padded(0, usize::MAX, 1, 7), 0..7);
    }

    #[test]
    fn test_missing_span() {
        let resident = |i: usize| (10..20).contains(&i) || (40..45).contains(&i);

        assert_eq!(missing_span(0..10, resident), Some(0..10));
        assert_eq!(missing_span(10..20, resident), None);
        assert_eq!(missing_span(12..25, resident), Some(20..25));
        assert_eq!(missing_span(5..15, resident), Some(5..10));
        // Island at 40..45 is swallowed by one coalesced span.
        assert_eq!(missing_span(15..50, resident), Some(20..50));
        assert_eq!(missing_span(30..30, resident), None);
    }
}
