use crate::pack::{add_unpacked, Unpacked, HALF, SINGLE};
use crate::round::RoundingMode;
use crate::soft_float16::{trace_invalid, NAN};
use crate::SoftFloat16;

// a zero multiplicand returns the addend untouched, whatever it is
pub(crate) fn mul_add(
    v0: SoftFloat16,
    v1: SoftFloat16,
    v2: SoftFloat16,
    mode: RoundingMode,
) -> SoftFloat16 {
    trace_invalid("mul_add", &[v0, v1, v2]);

    if SoftFloat16::is_zero(v0) || SoftFloat16::is_zero(v1) {
        return v2;
    }
    if SoftFloat16::is_nan(v0) || SoftFloat16::is_nan(v1) || SoftFloat16::is_nan(v2) {
        return NAN;
    }

    let sign = SoftFloat16::sign(v0) ^ SoftFloat16::sign(v1);
    if SoftFloat16::is_infinite(v0) || SoftFloat16::is_infinite(v1) {
        // oo * _ + -oo
        if SoftFloat16::is_infinite(v2) && SoftFloat16::sign(v2) != sign {
            return NAN;
        }
        return SoftFloat16::infinity(sign);
    } else if SoftFloat16::is_infinite(v2) {
        return v2;
    }

    let bits = add_unpacked(
        HALF,
        Unpacked::half_product(v0, v1),
        Unpacked::from_half(v2),
        mode,
    );
    SoftFloat16::from_bits(bits as u16)
}

pub(crate) fn mul_add_f32(v0: SoftFloat16, v1: SoftFloat16, acc: f32, mode: RoundingMode) -> f32 {
    trace_invalid("mul_add_f32", &[v0, v1]);

    if SoftFloat16::is_zero(v0) || SoftFloat16::is_zero(v1) {
        return acc;
    }
    if SoftFloat16::is_nan(v0) || SoftFloat16::is_nan(v1) || acc.is_nan() {
        return f32::NAN;
    }

    let sign = SoftFloat16::sign(v0) ^ SoftFloat16::sign(v1);
    if SoftFloat16::is_infinite(v0) || SoftFloat16::is_infinite(v1) {
        let product = if sign == 0 {
            f32::INFINITY
        } else {
            f32::NEG_INFINITY
        };
        if acc.is_infinite() && acc.is_sign_negative() != (sign == 1) {
            return f32::NAN;
        }
        return product;
    } else if acc.is_infinite() {
        return acc;
    }

    let bits = add_unpacked(
        SINGLE,
        Unpacked::half_product(v0, v1).rebias_to_single(),
        Unpacked::from_single(acc),
        mode,
    );
    f32::from_bits(bits as u32)
}

pub(crate) fn add_f32(v0: SoftFloat16, v1: SoftFloat16, mode: RoundingMode) -> f32 {
    trace_invalid("add_f32", &[v0, v1]);

    if SoftFloat16::is_nan(v0) || SoftFloat16::is_nan(v1) {
        return f32::NAN;
    }
    match (SoftFloat16::is_infinite(v0), SoftFloat16::is_infinite(v1)) {
        (true, true) if SoftFloat16::sign(v0) != SoftFloat16::sign(v1) => return f32::NAN,
        (true, _) => return f32::from(v0),
        (false, true) => return f32::from(v1),
        (false, false) => {}
    }

    let bits = add_unpacked(
        SINGLE,
        Unpacked::from_half_as_single(v0),
        Unpacked::from_half_as_single(v1),
        mode,
    );
    f32::from_bits(bits as u32)
}

impl SoftFloat16 {
    /// Fused `v0 * v1 + v2` rounded to nearest even.
    pub fn mul_add(v0: Self, v1: Self, v2: Self) -> Self {
        mul_add(v0, v1, v2, RoundingMode::default())
    }
}
