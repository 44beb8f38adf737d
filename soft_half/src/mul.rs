use std::ops::Mul;

use crate::pack::{round_pack_half, Unpacked};
use crate::round::{RoundingMode, Truncated};
use crate::soft_float16::{trace_invalid, NAN};
use crate::SoftFloat16;

pub(crate) fn mul(v0: SoftFloat16, v1: SoftFloat16, mode: RoundingMode) -> SoftFloat16 {
    trace_invalid("mul", &[v0, v1]);

    let sign = SoftFloat16::sign(v0) ^ SoftFloat16::sign(v1);
    let (inf0, inf1) = (SoftFloat16::is_infinite(v0), SoftFloat16::is_infinite(v1));
    let (zero0, zero1) = (SoftFloat16::is_zero(v0), SoftFloat16::is_zero(v1));

    if SoftFloat16::is_nan(v0) || SoftFloat16::is_nan(v1) {
        return NAN;
    } else if (inf0 && zero1) || (zero0 && inf1) {
        // oo * 0
        return NAN;
    } else if inf0 || inf1 {
        return SoftFloat16::infinity(sign);
    } else if zero0 || zero1 {
        return SoftFloat16::zero(sign);
    }

    // the 22 bit product is exact, a single rounding happens when packing
    round_pack_half(Unpacked::half_product(v0, v1), Truncated::EXACT, mode)
}

impl Mul for SoftFloat16 {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        mul(self, other, RoundingMode::default())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::soft_float16::{strategy, MAX, ONE};

    #[test]
    fn test_mul() {
        for (v0, v1) in [
            (0x200, 0x200),
            (0x3c04, 0x3c04),
            (513, 5117),
            (1025, 4095),
            (1025, 16383),
            (1057, 14305),
            (15362, 31742),
            (16384, 30721),
            (0x0001, 0x3800),
            (0x0003, 0x3800),
            (0x83ff, 0x4000),
        ] {
            let x0 = SoftFloat16::from_bits(v0);
            let x1 = SoftFloat16::from_bits(v1);
            let y = x0 * x1;
            let y_f = SoftFloat16::from(f32::from(x0) * f32::from(x1));
            assert_eq!(
                SoftFloat16::to_bits(y),
                SoftFloat16::to_bits(y_f),
                "\n{:?}\n  {:016b}\n  {:016b}",
                (v0, v1),
                SoftFloat16::to_bits(y),
                SoftFloat16::to_bits(y_f),
            );
        }
    }

    #[test]
    fn test_mul_special() {
        for (v0, v1, expected) in [
            (0x7c00, 0x0000, 0x7e00),
            (0x8000, 0xfc00, 0x7e00),
            (0x7c00, 0xbc00, 0xfc00),
            (0x7e00, 0x3c00, 0x7e00),
            (0x8000, 0x3c00, 0x8000),
            (0x8000, 0x8001, 0x0000),
            (0x7bff, 0x4000, 0x7bff), // saturates
            (0x0001, 0x0001, 0x0000), // underflows
        ] {
            let y = SoftFloat16::from_bits(v0) * SoftFloat16::from_bits(v1);
            assert_eq!(SoftFloat16::to_bits(y), expected, "{:#06x} * {:#06x}", v0, v1);
        }
        let tiny = SoftFloat16::from_bits(0x0001);
        assert_eq!(
            SoftFloat16::to_bits(mul(tiny, tiny, RoundingMode::TowardPositiveInfinity)),
            0x0001
        );
        assert_eq!(SoftFloat16::to_bits(mul(MAX, MAX, RoundingMode::TowardZero)), 0x7bff);
    }

    #[test]
    fn test_mul_non_finite_operands_are_not_saturated() {
        let two = SoftFloat16::from_bits(0x4000);
        let inf = SoftFloat16::from_bits(0x7c00);
        for mode in RoundingMode::ALL {
            assert_eq!(SoftFloat16::to_bits(mul(inf, SoftFloat16::from_bits(0), mode)), 0x7e00);
            assert_eq!(SoftFloat16::to_bits(mul(inf, two, mode)), 0x7c00, "{}", mode);
            assert_eq!(SoftFloat16::to_bits(mul(-inf, two, mode)), 0xfc00, "{}", mode);
            assert_eq!(SoftFloat16::to_bits(mul(NAN, two, mode)), 0x7e00, "{}", mode);
            assert_eq!(SoftFloat16::to_bits(mul(MAX, two, mode)), 0x7bff, "{}", mode);
        }
    }

    #[test]
    #[ignore]
    fn test_all_mul() {
        for i in 0..u16::MAX {
            for j in 0..u16::MAX {
                let x0 = SoftFloat16::from_bits(i);
                let x1 = SoftFloat16::from_bits(j);
                if !SoftFloat16::is_finite(x0) || !SoftFloat16::is_finite(x1) {
                    continue;
                }
                let y = x0 * x1;
                let y_f = SoftFloat16::from(f32::from(x0) * f32::from(x1));
                assert_eq!(SoftFloat16::to_bits(y), SoftFloat16::to_bits(y_f), "{:?}", (i, j));
            }
        }
    }

    proptest! {
        #[test]
        fn mul_matches_f32(x0 in strategy::finite(), x1 in strategy::finite()) {
            let y = x0 * x1;
            let y_f = SoftFloat16::from(f32::from(x0) * f32::from(x1));
            prop_assert_eq!(SoftFloat16::to_bits(y), SoftFloat16::to_bits(y_f));
        }

        #[test]
        fn mul_directed_matches_f64(x0 in strategy::finite(), x1 in strategy::finite()) {
            let exact = f64::from(x0) * f64::from(x1);
            for mode in RoundingMode::ALL {
                prop_assert_eq!(mul(x0, x1, mode), SoftFloat16::from_f64(exact, mode), "{}", mode);
            }
        }

        #[test]
        fn mul_commutes(x0 in strategy::finite(), x1 in strategy::finite()) {
            prop_assert_eq!(SoftFloat16::to_bits(x0 * x1), SoftFloat16::to_bits(x1 * x0));
        }

        #[test]
        fn mul_one_is_identity(x in strategy::finite()) {
            prop_assert_eq!(SoftFloat16::to_bits(x * ONE), SoftFloat16::to_bits(x));
        }
    }
}
