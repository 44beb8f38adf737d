use std::ops::Div;

use crate::pack::{round_pack_half, Unpacked};
use crate::round::{RoundingMode, Truncated};
use crate::soft_float16::{trace_invalid, NAN};
use crate::SoftFloat16;

// Fraction bits the dividend is widened by before the integer division; leaves at least
// 29 quotient bits, well beyond the 11 kept plus guard.
const QUOTIENT_SHIFT: u32 = 40;

pub(crate) fn div(v0: SoftFloat16, v1: SoftFloat16, mode: RoundingMode) -> SoftFloat16 {
    trace_invalid("div", &[v0, v1]);

    let sign = SoftFloat16::sign(v0) ^ SoftFloat16::sign(v1);

    if SoftFloat16::is_zero(v1) {
        // _ / 0, including 0 / 0
        return SoftFloat16::infinity(sign);
    } else if SoftFloat16::is_nan(v0) || SoftFloat16::is_nan(v1) {
        return NAN;
    }
    match (SoftFloat16::is_infinite(v0), SoftFloat16::is_infinite(v1)) {
        (true, true) => return NAN,
        (true, false) => return SoftFloat16::infinity(sign),
        (false, true) => return SoftFloat16::zero(sign),
        (false, false) => {}
    }
    if SoftFloat16::is_zero(v0) {
        return SoftFloat16::zero(sign);
    }

    let a = Unpacked::from_half(v0);
    let b = Unpacked::from_half(v1);

    // one wide integer division; a nonzero remainder only matters as a sticky bit
    let dividend = a.mantissa << QUOTIENT_SHIFT;
    let quotient = dividend / b.mantissa;
    let truncated = if dividend % b.mantissa != 0 {
        Truncated::inexact()
    } else {
        Truncated::EXACT
    };

    let value = Unpacked {
        sign,
        exponent: a.exponent - b.exponent + 25 - QUOTIENT_SHIFT as i32,
        mantissa: quotient,
    };
    round_pack_half(value, truncated, mode)
}

impl Div for SoftFloat16 {
    type Output = Self;

    fn div(self, other: Self) -> Self {
        div(self, other, RoundingMode::default())
    }
}
