use std::ops::Sub;

use crate::add::add;
use crate::round::RoundingMode;
use crate::SoftFloat16;

// `v0 - v1` as `v0 + (-v1)`; the sign of the subtrahend is flipped even for NaN.
pub(crate) fn sub(v0: SoftFloat16, v1: SoftFloat16, mode: RoundingMode) -> SoftFloat16 {
    add(v0, -v1, mode)
}

impl Sub for SoftFloat16 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        sub(self, other, RoundingMode::default())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::soft_float16::strategy;

    #[test]
    fn test_sub() {
        for (v0, v1, expected) in [
            (0x4000, 0x3c00, 0x3c00), // 2 - 1
            (0x3c00, 0x3c01, 0x9400), // 1 - (1 + ulp)
            (0x0400, 0x0001, 0x03ff), // smallest normal minus smallest denormal
            (0x3c00, 0x3c00, 0x0000),
            (0xfbff, 0x7bff, 0xfbff), // saturates
            (0x7c00, 0x7c00, 0x7e00),
        ] {
            let y = SoftFloat16::from_bits(v0) - SoftFloat16::from_bits(v1);
            assert_eq!(SoftFloat16::to_bits(y), expected, "{:#06x} - {:#06x}", v0, v1);
        }
    }

    proptest! {
        #[test]
        fn sub_matches_f32(x0 in strategy::finite(), x1 in strategy::finite()) {
            let y = x0 - x1;
            let y_f = SoftFloat16::from(f32::from(x0) - f32::from(x1));
            prop_assert_eq!(SoftFloat16::to_bits(y), SoftFloat16::to_bits(y_f));
        }

        #[test]
        fn sub_directed_matches_f64(x0 in strategy::finite(), x1 in strategy::finite()) {
            let exact = f64::from(x0) - f64::from(x1);
            for mode in RoundingMode::ALL {
                prop_assert_eq!(sub(x0, x1, mode), SoftFloat16::from_f64(exact, mode), "{}", mode);
            }
        }
    }
}
