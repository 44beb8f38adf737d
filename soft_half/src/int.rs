use crate::pack::{round_pack_half, Unpacked};
use crate::round::{round_one, RoundingMode, Truncated};
use crate::soft_float16::{trace_invalid, Fields, EXP_BIAS, MAN_LEN, POS_ZERO};
use crate::SoftFloat16;

// exponent at which the extracted mantissa counts whole units
const INTEGER_EXP: i32 = EXP_BIAS + MAN_LEN as i32;

// Infinity and NaN saturate by sign; denormals are 0 when `flush_denormals` is set and
// are rounded like any other value otherwise.
fn to_int_clamped(
    v: SoftFloat16,
    mode: RoundingMode,
    min: i64,
    max: i64,
    flush_denormals: bool,
) -> i64 {
    let sign = SoftFloat16::sign(v);
    if SoftFloat16::is_invalid(v) {
        trace_invalid("to_int", &[v]);
        return if sign == 0 { max } else { min };
    } else if flush_denormals && SoftFloat16::is_denormal(v) {
        return 0;
    }

    let Fields {
        exponent, mantissa, ..
    } = SoftFloat16::extract(v);
    let mantissa = mantissa as u64;

    let magnitude = if exponent >= INTEGER_EXP {
        mantissa << (exponent - INTEGER_EXP)
    } else {
        let shift_out = (INTEGER_EXP - exponent) as u32;
        (mantissa >> shift_out) + round_one(sign, mantissa, shift_out, mode) as u64
    };

    let value = if sign == 0 {
        magnitude as i64
    } else {
        -(magnitude as i64)
    };
    value.clamp(min, max)
}

fn from_magnitude(sign: u16, magnitude: u64, mode: RoundingMode) -> SoftFloat16 {
    if magnitude == 0 {
        return POS_ZERO;
    }
    let value = Unpacked {
        sign,
        exponent: INTEGER_EXP,
        mantissa: magnitude as u128,
    };
    round_pack_half(value, Truncated::EXACT, mode)
}

macro_rules! int_conversions {
    ($(($to:ident, $from:ident, $t:ty, $flush:expr)),* $(,)?) => {
        impl SoftFloat16 {
            $(
                #[doc = concat!("Rounds to `", stringify!($t), "`, saturating at its bounds.")]
                pub fn $to(v: Self, mode: RoundingMode) -> $t {
                    to_int_clamped(v, mode, <$t>::MIN as i64, <$t>::MAX as i64, $flush) as $t
                }

                #[doc = concat!("Converts an `", stringify!($t), "`, saturating above 65504.")]
                pub fn $from(value: $t, mode: RoundingMode) -> Self {
                    #[allow(unused_comparisons)]
                    let sign = (value < 0) as u16;
                    from_magnitude(sign, (value as i64).unsigned_abs(), mode)
                }
            )*
        }

        $(
            impl From<$t> for SoftFloat16 {
                fn from(value: $t) -> Self {
                    Self::$from(value, RoundingMode::default())
                }
            }
        )*
    };
}

int_conversions!(
    (to_i8, from_i8, i8, true),
    (to_u8, from_u8, u8, true),
    (to_i16, from_i16, i16, true),
    (to_u16, from_u16, u16, true),
    (to_i32, from_i32, i32, false),
    (to_u32, from_u32, u32, true),
);

impl SoftFloat16 {
    /// `to_i32` rounding toward positive infinity.
    pub fn to_i32_ceil(v: Self) -> i32 {
        Self::to_i32(v, RoundingMode::TowardPositiveInfinity)
    }

    /// `to_i32` rounding toward negative infinity.
    pub fn to_i32_floor(v: Self) -> i32 {
        Self::to_i32(v, RoundingMode::TowardNegativeInfinity)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::soft_float16::strategy;

    fn h(v: f32) -> SoftFloat16 {
        SoftFloat16::from(v)
    }

    #[test]
    fn test_to_i8() {
        use RoundingMode::*;
        for (v, mode, expected) in [
            (200.0, NearestEven, 127),
            (127.0, NearestEven, 127),
            (127.5, NearestEven, 127),
            (-127.5, NearestEven, -128),
            (-128.0, NearestEven, -128),
            (-129.0, NearestEven, -128),
            (-65504.0, NearestEven, -128),
            (2.5, NearestEven, 2),
            (3.5, NearestEven, 4),
            (-2.5, NearestEven, -2),
            (2.5, TowardPositiveInfinity, 3),
            (-2.5, TowardPositiveInfinity, -2),
            (-2.5, TowardNegativeInfinity, -3),
            (-2.5, TowardZero, -2),
            (0.25, NearestEven, 0),
            (-0.0, NearestEven, 0),
        ] {
            assert_eq!(SoftFloat16::to_i8(h(v), mode), expected, "{} {}", v, mode);
        }
    }

    #[test]
    fn test_saturation_bounds() {
        use RoundingMode::NearestEven;
        assert_eq!(SoftFloat16::to_u8(h(256.0), NearestEven), 255);
        assert_eq!(SoftFloat16::to_u8(h(255.5), NearestEven), 255);
        assert_eq!(SoftFloat16::to_u8(h(-1.0), NearestEven), 0);
        assert_eq!(SoftFloat16::to_u8(h(-0.7), RoundingMode::TowardNegativeInfinity), 0);
        assert_eq!(SoftFloat16::to_i16(h(32768.0), NearestEven), 32767);
        assert_eq!(SoftFloat16::to_i16(h(-32768.0), NearestEven), -32768);
        assert_eq!(SoftFloat16::to_i16(h(-32800.0), NearestEven), -32768);
        assert_eq!(SoftFloat16::to_u16(h(65504.0), NearestEven), 65504);
        assert_eq!(SoftFloat16::to_u16(h(-3.0), NearestEven), 0);
        assert_eq!(SoftFloat16::to_i32(h(-65504.0), NearestEven), -65504);
        assert_eq!(SoftFloat16::to_u32(h(65504.0), NearestEven), 65504);
    }

    #[test]
    fn test_non_finite_saturates_by_sign() {
        use RoundingMode::NearestEven;
        for (v, positive) in [(0x7c00, true), (0xfc00, false), (0x7e00, true), (0xfe00, false)] {
            let x = SoftFloat16::from_bits(v);
            let (hi, lo) = if positive { (true, false) } else { (false, true) };
            assert_eq!(SoftFloat16::to_i8(x, NearestEven) == i8::MAX, hi);
            assert_eq!(SoftFloat16::to_i8(x, NearestEven) == i8::MIN, lo);
            assert_eq!(SoftFloat16::to_i32(x, NearestEven) == i32::MAX, hi);
            assert_eq!(SoftFloat16::to_i32(x, NearestEven) == i32::MIN, lo);
            assert_eq!(SoftFloat16::to_u16(x, NearestEven) == u16::MAX, hi);
            assert_eq!(SoftFloat16::to_u32(x, NearestEven) == 0, lo);
        }
    }

    #[test]
    fn test_to_i32_modes() {
        let x = h(-1.5);
        assert_eq!(SoftFloat16::to_i32(x, RoundingMode::NearestEven), -2);
        assert_eq!(SoftFloat16::to_i32_ceil(x), -1);
        assert_eq!(SoftFloat16::to_i32_floor(x), -2);
        assert_eq!(SoftFloat16::to_i32(x, RoundingMode::TowardZero), -1);

        let tiny = SoftFloat16::from_bits(0x0001);
        assert_eq!(SoftFloat16::to_i32(tiny, RoundingMode::NearestEven), 0);
        assert_eq!(SoftFloat16::to_i32_ceil(tiny), 1);
        assert_eq!(SoftFloat16::to_i32_floor(-tiny), -1);
    }

    #[test]
    fn test_denormal_to_narrow_int_is_zero() {
        use RoundingMode::*;
        for bits in [0x0001, 0x8001, 0x03ff, 0x83ff] {
            let x = SoftFloat16::from_bits(bits);
            for mode in [TowardPositiveInfinity, TowardNegativeInfinity] {
                assert_eq!(SoftFloat16::to_i8(x, mode), 0, "{:#06x} {}", bits, mode);
                assert_eq!(SoftFloat16::to_u8(x, mode), 0, "{:#06x} {}", bits, mode);
                assert_eq!(SoftFloat16::to_i16(x, mode), 0, "{:#06x} {}", bits, mode);
                assert_eq!(SoftFloat16::to_u16(x, mode), 0, "{:#06x} {}", bits, mode);
                assert_eq!(SoftFloat16::to_u32(x, mode), 0, "{:#06x} {}", bits, mode);
            }
        }
        // the smallest normal still rounds away from zero
        let min_normal = SoftFloat16::from_bits(0x0400);
        assert_eq!(SoftFloat16::to_u8(min_normal, TowardPositiveInfinity), 1);
        assert_eq!(SoftFloat16::to_i8(-min_normal, TowardNegativeInfinity), -1);
        // i32 rounds denormals
        assert_eq!(SoftFloat16::to_i32(SoftFloat16::from_bits(0x0001), TowardPositiveInfinity), 1);
        assert_eq!(SoftFloat16::to_i32(SoftFloat16::from_bits(0x8001), TowardNegativeInfinity), -1);
    }

    #[test]
    fn test_from_int() {
        for (v, expected) in [
            (0_i32, 0x0000),
            (1, 0x3c00),
            (-1, 0xbc00),
            (200, 0x5a40),
            (2049, 0x6800),  // tie, rounds to even 2048
            (2051, 0x6802),  // tie, rounds to even 2052
            (65504, 0x7bff),
            (65519, 0x7bff),
            (65520, 0x7bff), // saturates
            (i32::MAX, 0x7bff),
            (i32::MIN, 0xfbff),
        ] {
            assert_eq!(SoftFloat16::to_bits(SoftFloat16::from(v)), expected, "{}", v);
        }
        assert_eq!(SoftFloat16::to_bits(SoftFloat16::from(-128_i8)), 0xd800);
        assert_eq!(SoftFloat16::to_bits(SoftFloat16::from(255_u8)), 0x5bf8);
        assert_eq!(SoftFloat16::to_bits(SoftFloat16::from(u16::MAX)), 0x7bff);
        assert_eq!(SoftFloat16::to_bits(SoftFloat16::from(u32::MAX)), 0x7bff);
        assert_eq!(
            SoftFloat16::to_bits(SoftFloat16::from_i32(2049, RoundingMode::TowardPositiveInfinity)),
            0x6801
        );
        assert_eq!(
            SoftFloat16::to_bits(SoftFloat16::from_i16(
                -2049,
                RoundingMode::TowardNegativeInfinity
            )),
            0xe801
        );
    }

    proptest! {
        #[test]
        fn to_int_matches_f32(x in strategy::finite()) {
            use RoundingMode::*;
            let f = f32::from(x);
            let even = f.round_ties_even();
            prop_assert_eq!(SoftFloat16::to_i32(x, NearestEven), even as i32);
            prop_assert_eq!(SoftFloat16::to_i32(x, TowardPositiveInfinity), f.ceil() as i32);
            prop_assert_eq!(SoftFloat16::to_i32(x, TowardNegativeInfinity), f.floor() as i32);
            prop_assert_eq!(SoftFloat16::to_i32(x, TowardZero), f.trunc() as i32);
            prop_assert_eq!(SoftFloat16::to_i8(x, NearestEven), even as i8);
            prop_assert_eq!(SoftFloat16::to_u8(x, NearestEven), even as u8);
            prop_assert_eq!(SoftFloat16::to_i16(x, TowardZero), f.trunc() as i16);
            prop_assert_eq!(SoftFloat16::to_u16(x, NearestEven), even as u16);
        }

        #[test]
        fn from_int_matches_f64(v in any::<i32>(), u in any::<u32>()) {
            for mode in RoundingMode::ALL {
                prop_assert_eq!(
                    SoftFloat16::to_bits(SoftFloat16::from_i32(v, mode)),
                    SoftFloat16::to_bits(SoftFloat16::from_f64(v as f64, mode))
                );
                prop_assert_eq!(
                    SoftFloat16::to_bits(SoftFloat16::from_u32(u, mode)),
                    SoftFloat16::to_bits(SoftFloat16::from_f64(u as f64, mode))
                );
            }
        }
    }
}
