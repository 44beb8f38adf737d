use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ParseRoundingModeError;

/// Direction applied whenever a result has more bits than the destination can hold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Round to nearest, ties to even.
    #[default]
    NearestEven,
    TowardPositiveInfinity,
    TowardNegativeInfinity,
    TowardZero,
}

impl RoundingMode {
    pub const ALL: [RoundingMode; 4] = [
        RoundingMode::NearestEven,
        RoundingMode::TowardPositiveInfinity,
        RoundingMode::TowardNegativeInfinity,
        RoundingMode::TowardZero,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            RoundingMode::NearestEven => "nearest_even",
            RoundingMode::TowardPositiveInfinity => "toward_positive_infinity",
            RoundingMode::TowardNegativeInfinity => "toward_negative_infinity",
            RoundingMode::TowardZero => "toward_zero",
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoundingMode {
    type Err = ParseRoundingModeError;

    // Accepts the snake_case names as well as the spellings used by testfloat
    // (`near_even`, `max`, `min`, `minMag`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nearest_even" | "near_even" | "rne" => Ok(RoundingMode::NearestEven),
            "toward_positive_infinity" | "max" | "ceil" => Ok(RoundingMode::TowardPositiveInfinity),
            "toward_negative_infinity" | "min" | "floor" => {
                Ok(RoundingMode::TowardNegativeInfinity)
            }
            "toward_zero" | "minMag" | "trunc" => Ok(RoundingMode::TowardZero),
            _ => Err(ParseRoundingModeError(s.to_owned())),
        }
    }
}

/// Bits discarded below the least significant kept bit of a mantissa.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Truncated {
    // guard bit at bit 63
    word: u64,
    // anything that fell more than 64 places below the kept part
    lost: bool,
}

impl Truncated {
    pub const EXACT: Truncated = Truncated {
        word: 0,
        lost: false,
    };

    // Something nonzero below every position the word can describe.
    pub(crate) const fn inexact() -> Self {
        Truncated {
            word: 0,
            lost: true,
        }
    }

    pub const fn guard(self) -> bool {
        self.word >> 63 != 0
    }

    pub const fn sticky(self) -> bool {
        self.word << 1 != 0 || self.lost
    }

    pub const fn is_exact(self) -> bool {
        self.word == 0 && !self.lost
    }

    /// Shifts `mantissa` right by `n`, moving the bits that fall off in above the bits
    /// already held.
    pub fn shift_right(&mut self, mantissa: u128, n: u32) -> u128 {
        if n == 0 {
            return mantissa;
        }

        // older bits move further down
        if n >= 64 {
            self.lost |= self.word != 0;
            self.word = 0;
        } else {
            self.lost |= self.word & ((1 << n) - 1) != 0;
            self.word >>= n;
        }

        let (discarded, kept) = if n >= 128 {
            (mantissa, 0)
        } else {
            (mantissa & ((1 << n) - 1), mantissa >> n)
        };

        // bit i of the discarded part lands at bit 64 - n + i of the word
        if n <= 64 {
            self.word |= (discarded as u64) << (64 - n);
        } else {
            let below = n - 64;
            if below >= 128 {
                self.lost |= discarded != 0;
            } else {
                self.lost |= discarded & ((1 << below) - 1) != 0;
                self.word |= (discarded >> below) as u64;
            }
        }

        kept
    }

    /// Takes the guard bit back out, for a mantissa that is being doubled.
    pub fn pop(&mut self) -> bool {
        let top = self.guard();
        self.word <<= 1;
        top
    }

    /// Complement `1 - t` of the discarded fraction, used when the discarded bits belong to
    /// a subtrahend. The flag reports whether one unit has to be borrowed from the kept part.
    pub fn negate(self) -> (Self, bool) {
        if self.is_exact() {
            (self, false)
        } else if self.lost {
            (
                Truncated {
                    word: !self.word,
                    lost: true,
                },
                true,
            )
        } else {
            (
                Truncated {
                    word: (!self.word).wrapping_add(1),
                    lost: false,
                },
                true,
            )
        }
    }

    /// Whether the kept part has to be incremented, given its sign and its least
    /// significant bit.
    pub fn round_up(self, sign: u16, last_kept: bool, mode: RoundingMode) -> bool {
        match mode {
            RoundingMode::NearestEven => self.guard() && (self.sticky() || last_kept),
            RoundingMode::TowardPositiveInfinity => sign == 0 && !self.is_exact(),
            RoundingMode::TowardNegativeInfinity => sign != 0 && !self.is_exact(),
            RoundingMode::TowardZero => false,
        }
    }
}

/// Rounding decision for `mantissa` losing its low `k` bits: bit `k` is the last kept bit,
/// bit `k - 1` the guard bit and everything below it sticky.
pub fn round_one(sign: u16, mantissa: u64, k: u32, mode: RoundingMode) -> bool {
    let mut truncated = Truncated::EXACT;
    let kept = truncated.shift_right(mantissa as u128, k);
    truncated.round_up(sign, kept & 1 != 0, mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_one_nearest_even() {
        for (mantissa, k, expected) in [
            (0b1011, 2, true),  // guard and sticky
            (0b0110, 2, true),  // tie, odd kept part
            (0b0010, 2, false), // tie, even kept part
            (0b0101, 2, false), // below half
            (0b0111, 3, true),
            (0b1000, 3, false),
            (0b1100, 3, true),
            (0b0001, 1, false), // tie at k = 1, even
            (0b0011, 1, true),  // tie at k = 1, odd
            (0b1111, 0, false), // nothing truncated
        ] {
            assert_eq!(
                round_one(0, mantissa, k, RoundingMode::NearestEven),
                expected,
                "{:b} >> {}",
                mantissa,
                k
            );
        }
    }

    #[test]
    fn test_round_one_directed() {
        use RoundingMode::*;
        for (sign, mantissa, k, mode, expected) in [
            (0, 0b0001, 2, TowardPositiveInfinity, true),
            (1, 0b0001, 2, TowardPositiveInfinity, false),
            (0, 0b0100, 2, TowardPositiveInfinity, false),
            (1, 0b0001, 2, TowardNegativeInfinity, true),
            (0, 0b0011, 2, TowardNegativeInfinity, false),
            (1, 0b0100, 2, TowardNegativeInfinity, false),
            (0, 0b0011, 2, TowardZero, false),
            (1, 0b0011, 2, TowardZero, false),
        ] {
            assert_eq!(
                round_one(sign, mantissa, k, mode),
                expected,
                "{} {:b} >> {} {}",
                sign,
                mantissa,
                k,
                mode
            );
        }
    }

    #[test]
    fn test_shift_right_tracks_discarded_bits() {
        let mut t = Truncated::EXACT;
        assert_eq!(t.shift_right(0x1234, 8), 0x12);
        assert!(!t.guard());
        assert!(t.sticky());

        let mut t = Truncated::EXACT;
        assert_eq!(t.shift_right(0x180, 8), 0x1);
        assert!(t.guard());
        assert!(!t.sticky());

        // a second shift moves the first discarded bits below the new ones
        assert_eq!(t.shift_right(0x1, 1), 0);
        assert!(t.guard());
        assert!(t.sticky());
    }

    #[test]
    fn test_shift_right_far() {
        let mut t = Truncated::EXACT;
        assert_eq!(t.shift_right(1 << 100, 101), 0);
        assert!(t.guard());
        assert!(!t.sticky());

        let mut t = Truncated::EXACT;
        assert_eq!(t.shift_right(1, 200), 0);
        assert!(!t.guard());
        assert!(t.sticky());

        let mut t = Truncated::EXACT;
        assert_eq!(t.shift_right(0b11, 66), 0);
        assert!(!t.guard());
        assert!(t.sticky());
    }

    #[test]
    fn test_pop_restores_bits() {
        let mut t = Truncated::EXACT;
        let kept = t.shift_right(0b1011, 3);
        assert_eq!(kept, 1);
        assert!(!t.pop());
        assert!(t.pop());
        assert!(t.pop());
        assert!(t.is_exact());
    }

    #[test]
    fn test_negate() {
        let mut t = Truncated::EXACT;
        t.shift_right(0b10, 2);
        let (n, borrow) = t.negate();
        assert!(borrow);
        assert!(n.guard());
        assert!(!n.sticky());

        let mut t = Truncated::EXACT;
        t.shift_right(0b01, 2);
        let (n, borrow) = t.negate();
        assert!(borrow);
        assert!(n.guard());
        assert!(n.sticky());

        assert_eq!(Truncated::EXACT.negate(), (Truncated::EXACT, false));
        let (n, borrow) = Truncated::inexact().negate();
        assert!(borrow);
        assert!(n.guard() && n.sticky());
    }

    #[test]
    fn test_parse_rounding_mode() {
        assert_eq!("near_even".parse(), Ok(RoundingMode::NearestEven));
        assert_eq!("minMag".parse(), Ok(RoundingMode::TowardZero));
        assert_eq!("max".parse(), Ok(RoundingMode::TowardPositiveInfinity));
        assert_eq!("floor".parse(), Ok(RoundingMode::TowardNegativeInfinity));
        for mode in RoundingMode::ALL {
            assert_eq!(mode.to_string().parse(), Ok(mode));
        }
        assert_eq!(
            "odd".parse::<RoundingMode>(),
            Err(ParseRoundingModeError("odd".to_owned()))
        );
    }

    #[test]
    fn test_rounding_mode_serde() {
        let mode: RoundingMode = serde_json::from_str("\"toward_zero\"").unwrap();
        assert_eq!(mode, RoundingMode::TowardZero);
        assert_eq!(
            serde_json::to_string(&RoundingMode::TowardPositiveInfinity).unwrap(),
            "\"toward_positive_infinity\""
        );
        assert!(serde_json::from_str::<RoundingMode>("\"sideways\"").is_err());
    }
}
