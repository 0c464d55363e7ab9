//! Element identifiers and the symmetric pair key.
//!
//! Element ids are zero-based positions in a savefile's element sequence.

use crate::limits::MAX_PAIR_ID;

/// Positional identifier of an element within its savefile.
pub type ElementId = usize;

/// Order-independent key for an unordered pair of element ids.
pub type PairKey = u64;

/// Packs an unordered id pair into a single integer.
///
/// The larger id occupies the bits above 24, the smaller one the low 24 bits,
/// so `pair_key(a, b) == pair_key(b, a)`. Both ids must be at most
/// [`MAX_PAIR_ID`]; larger ids are masked and may collide. Use
/// [`checked_pair_key`] for ids that are not known to fit.
///
/// ```text
/// key = (max(a, b) << 24) | min(a, b)
/// ```
#[inline]
pub fn pair_key(a: ElementId, b: ElementId) -> PairKey {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    ((hi as u64) << 24) | (lo & MAX_PAIR_ID) as u64
}

/// Packs an unordered id pair, or returns `None` when either id does not fit
/// in 24 bits.
#[inline]
pub fn checked_pair_key(a: ElementId, b: ElementId) -> Option<PairKey> {
    (a <= MAX_PAIR_ID && b <= MAX_PAIR_ID).then(|| pair_key(a, b))
}

/// Splits a pair key back into `(min, max)`.
#[inline]
pub fn split_pair_key(key: PairKey) -> (ElementId, ElementId) {
    ((key & MAX_PAIR_ID as u64) as ElementId, (key >> 24) as ElementId)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_symmetric() {
        assert_eq!(pair_key(3, 17), pair_key(17, 3));
        assert_eq!(pair_key(0, 0), 0);
        assert_ne!(pair_key(1, 2), pair_key(1, 3));
    }

    #[test]
    fn test_pair_key_layout() {
        assert_eq!(pair_key(1, 2), (2 << 24) | 1);
        assert_eq!(pair_key(MAX_PAIR_ID, 0), (MAX_PAIR_ID as u64) << 24);
    }

    #[test]
    fn test_checked_pair_key_boundary() {
        assert_eq!(checked_pair_key(MAX_PAIR_ID, 0), Some(pair_key(MAX_PAIR_ID, 0)));
        assert_eq!(checked_pair_key(MAX_PAIR_ID, MAX_PAIR_ID), Some(pair_key(MAX_PAIR_ID, MAX_PAIR_ID)));
        assert_eq!(checked_pair_key(MAX_PAIR_ID + 1, 0), None);
        assert_eq!(checked_pair_key(0, MAX_PAIR_ID + 1), None);
        // Unchecked keys collide once the smaller id needs more than 24 bits.
        assert_eq!(
            pair_key(1 << 24, (1 << 24) + 1),
            pair_key(0, (1 << 24) + 1)
        );
        assert_eq!(checked_pair_key(1 << 24, (1 << 24) + 1), None);
    }

    #[test]
    fn test_split_pair_key() {
        assert_eq!(split_pair_key(pair_key(42, 7)), (7, 42));
        assert_eq!(split_pair_key(pair_key(MAX_PAIR_ID, MAX_PAIR_ID)), (MAX_PAIR_ID, MAX_PAIR_ID));
    }
}
