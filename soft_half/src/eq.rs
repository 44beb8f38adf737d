use std::hash::{Hash, Hasher};

use crate::SoftFloat16;

impl SoftFloat16 {
    // Bits with `-0` folded onto `+0`; two values are equal exactly when these match.
    pub(crate) const fn canonical_bits(v: Self) -> u16 {
        if Self::is_zero(v) {
            0
        } else {
            Self::to_bits(v)
        }
    }
}

// Encodings compare bit for bit, except that `+0 == -0`. A NaN equals a NaN with the same
// encoding, so the relation is reflexive and `Eq` holds.
impl PartialEq for SoftFloat16 {
    fn eq(&self, other: &Self) -> bool {
        Self::canonical_bits(*self) == Self::canonical_bits(*other)
    }
}

impl Eq for SoftFloat16 {}

impl Hash for SoftFloat16 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Self::canonical_bits(*self).hash(state);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::soft_float16::{NAN, NEG_ZERO, ONE, POS_ZERO};

    #[test]
    fn test_eq() {
        assert_eq!(POS_ZERO, NEG_ZERO);
        assert_eq!(NAN, NAN);
        assert_ne!(NAN, -NAN);
        assert_ne!(NAN, SoftFloat16::from_bits(0x7e01));
        assert_ne!(ONE, -ONE);
        assert_ne!(SoftFloat16::from_bits(0x0001), POS_ZERO);
    }

    #[test]
    fn test_hash_agrees_with_eq() {
        let set: HashSet<SoftFloat16> = [POS_ZERO, NEG_ZERO, ONE, -ONE, NAN].into_iter().collect();
        assert_eq!(set.len(), 4);
        assert!(set.contains(&NEG_ZERO));
    }

    #[test]
    #[ignore]
    fn test_all_eq() {
        for i in 0..u16::MAX {
            for j in 0..u16::MAX {
                let x0 = SoftFloat16::from_bits(i);
                let x1 = SoftFloat16::from_bits(j);
                if SoftFloat16::is_nan(x0) || SoftFloat16::is_nan(x1) {
                    continue;
                }
                let y = x0 == x1;
                let y_f = f32::from(x0) == f32::from(x1);
                assert_eq!(y, y_f, "{:?}", (i, j));
            }
        }
    }
}
