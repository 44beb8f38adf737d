use crate::pack::{round_pack_half, Unpacked};
use crate::round::{RoundingMode, Truncated};
use crate::soft_float16::{NAN, POS_ZERO};
use crate::SoftFloat16;

pub(crate) fn halve(v: SoftFloat16, mode: RoundingMode) -> SoftFloat16 {
    if SoftFloat16::is_nan(v) {
        return NAN;
    } else if SoftFloat16::is_infinite(v) {
        return v;
    }

    // only a denormal result loses a bit
    let Unpacked {
        sign,
        exponent,
        mantissa,
    } = Unpacked::from_half(v);
    let value = Unpacked {
        sign,
        exponent: exponent - 1,
        mantissa,
    };
    round_pack_half(value, Truncated::EXACT, mode)
}

impl SoftFloat16 {
    /// Clears the sign bit, NaN included.
    pub const fn abs(v: Self) -> Self {
        Self::from_bits(Self::to_bits(v) & 0x7fff)
    }

    /// `v` when the sign bit is clear, `+0` otherwise (`-0`, `-oo` and negative NaN
    /// included).
    pub const fn relu(v: Self) -> Self {
        if Self::is_sign_negative(v) {
            POS_ZERO
        } else {
            v
        }
    }

    /// `v / 2`, exact unless the result is denormal, where ties go to even.
    pub fn halve(v: Self) -> Self {
        halve(v, RoundingMode::default())
    }
}
