use std::cmp::Ordering;

use crate::soft_float16::NAN;
use crate::SoftFloat16;

impl SoftFloat16 {
    // Signed magnitude of the encoding; orders by sign, then exponent, then mantissa.
    const fn order_key(v: Self) -> i32 {
        let magnitude = (Self::to_bits(v) & 0x7fff) as i32;
        if Self::is_sign_negative(v) {
            -magnitude
        } else {
            magnitude
        }
    }

    /// The larger of two values; NaN if either is NaN. `+0` wins over `-0`.
    pub fn max(v0: Self, v1: Self) -> Self {
        if Self::is_nan(v0) || Self::is_nan(v1) {
            return NAN;
        }
        match v0.cmp(&v1) {
            Ordering::Less => v1,
            Ordering::Greater => v0,
            Ordering::Equal if Self::is_sign_negative(v0) => v1,
            Ordering::Equal => v0,
        }
    }

    /// The smaller of two values; NaN if either is NaN. `-0` wins over `+0`.
    pub fn min(v0: Self, v1: Self) -> Self {
        if Self::is_nan(v0) || Self::is_nan(v1) {
            return NAN;
        }
        match v0.cmp(&v1) {
            Ordering::Less => v0,
            Ordering::Greater => v1,
            Ordering::Equal if Self::is_sign_negative(v0) => v0,
            Ordering::Equal => v1,
        }
    }
}

// A total order over encodings: negative values below positive ones, `-0 == +0`, and NaN
// encodings beyond the infinity of their sign.
impl Ord for SoftFloat16 {
    fn cmp(&self, other: &Self) -> Ordering {
        Self::order_key(*self).cmp(&Self::order_key(*other))
    }
}

impl PartialOrd for SoftFloat16 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
