use crate::pack::{round_pack_half, Unpacked};
use crate::round::{round_one, RoundingMode, Truncated};
use crate::soft_float16::{trace_invalid, Fields, NAN};
use crate::SoftFloat16;

const MAGNITUDE_MASK: u32 = 0x7fff_ffff;

// Significant bits the magnitude is rounded to before scaling, as many as a half value
// carries.
const KEPT_BITS: u32 = 11;

// sign-magnitude 1/14/17 fixed point times `scale`, rounded to half
pub(crate) fn deq(fixed: u32, scale: SoftFloat16, mode: RoundingMode) -> SoftFloat16 {
    trace_invalid("deq", &[scale]);

    let fixed_sign = (fixed >> 31) as u16;
    let sign = fixed_sign ^ SoftFloat16::sign(scale);
    let magnitude = fixed & MAGNITUDE_MASK;

    if SoftFloat16::is_nan(scale) {
        return NAN;
    } else if magnitude == 0 {
        return SoftFloat16::zero(sign);
    } else if SoftFloat16::is_infinite(scale) {
        return SoftFloat16::saturated(sign);
    }

    // round to the width of a half mantissa; a carry out only bumps the exponent
    let width = 32 - magnitude.leading_zeros();
    let shift_out = width.saturating_sub(KEPT_BITS);
    let mantissa = (magnitude >> shift_out) as u64
        + round_one(fixed_sign, magnitude as u64, shift_out, mode) as u64;

    // scaling up by 2^17 cancels the fraction bits, leaving mantissa * 2^shift_out
    let Fields {
        exponent: scale_exp,
        mantissa: scale_mantissa,
        ..
    } = SoftFloat16::extract(scale);
    let value = Unpacked {
        sign,
        exponent: shift_out as i32 + scale_exp,
        mantissa: mantissa as u128 * scale_mantissa as u128,
    };
    round_pack_half(value, Truncated::EXACT, mode)
}

impl SoftFloat16 {
    /// Fixed-point to half conversion scaled by `scale`, rounded to nearest even.
    pub fn deq(fixed: u32, scale: Self) -> Self {
        deq(fixed, scale, RoundingMode::default())
    }
}
