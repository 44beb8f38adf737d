use crate::round::{RoundingMode, Truncated};
use crate::soft_float16::{Fields, EXP_BIAS, MAN_LEN};
use crate::SoftFloat16;

// Field widths of a destination encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Format {
    pub man_len: u32,
    pub exp_len: u32,
}

pub(crate) const HALF: Format = Format {
    man_len: 10,
    exp_len: 5,
};

pub(crate) const SINGLE: Format = Format {
    man_len: 23,
    exp_len: 8,
};

pub(crate) const DOUBLE: Format = Format {
    man_len: 52,
    exp_len: 11,
};

impl Format {
    pub const fn bias(self) -> i32 {
        (1 << (self.exp_len - 1)) - 1
    }

    pub const fn max_exp(self) -> i32 {
        (1 << self.exp_len) - 1
    }

    const fn hidden_bit(self) -> u128 {
        1 << self.man_len
    }

    /// Packs the fields; `mantissa` loses everything above `man_len` bits.
    pub fn pack(self, sign: u16, exponent: i32, mantissa: u128) -> u64 {
        let man_mask = (1u64 << self.man_len) - 1;
        (sign as u64) << (self.man_len + self.exp_len)
            | (exponent as u64) << self.man_len
            | (mantissa as u64 & man_mask)
    }

    pub fn zero(self, sign: u16) -> u64 {
        self.pack(sign, 0, 0)
    }

    pub fn max_finite(self, sign: u16) -> u64 {
        self.pack(sign, self.max_exp() - 1, self.hidden_bit() - 1)
    }
}

// A finite value `(-1)^sign * mantissa * 2^(exponent - bias - man_len)` in the convention
// of some `Format`, with a mantissa of any width up to 127 bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Unpacked {
    pub sign: u16,
    pub exponent: i32,
    pub mantissa: u128,
}

impl Unpacked {
    pub fn from_half(v: SoftFloat16) -> Self {
        let Fields {
            sign,
            exponent,
            mantissa,
        } = SoftFloat16::extract(v);
        Self {
            sign,
            exponent,
            mantissa: mantissa as u128,
        }
    }

    /// A half value in the single-precision convention, mantissa widened to 24 bits.
    pub fn from_half_as_single(v: SoftFloat16) -> Self {
        let Self {
            sign,
            exponent,
            mantissa,
        } = Self::from_half(v);
        Self {
            sign,
            exponent: exponent - EXP_BIAS + SINGLE.bias(),
            mantissa: mantissa << (SINGLE.man_len - MAN_LEN),
        }
    }

    pub fn from_single(v: f32) -> Self {
        let bits = v.to_bits();
        let exponent = ((bits >> 23) & 0xff) as i32;
        let significand = bits & 0x7f_ffff;
        let (exponent, mantissa) = if exponent == 0 {
            (1, significand)
        } else {
            (exponent, significand | 0x80_0000)
        };
        Self {
            sign: (bits >> 31) as u16,
            exponent,
            mantissa: mantissa as u128,
        }
    }

    /// Product of two half values, exact, in the half convention.
    pub fn half_product(v0: SoftFloat16, v1: SoftFloat16) -> Self {
        let a = Self::from_half(v0);
        let b = Self::from_half(v1);
        Self {
            sign: a.sign ^ b.sign,
            exponent: a.exponent + b.exponent - EXP_BIAS - MAN_LEN as i32,
            mantissa: a.mantissa * b.mantissa,
        }
    }

    /// Moves a half-convention value into the single-precision convention.
    pub fn rebias_to_single(self) -> Self {
        Self {
            exponent: self.exponent - HALF.bias() - HALF.man_len as i32
                + SINGLE.bias()
                + SINGLE.man_len as i32,
            ..self
        }
    }

    // Shifts the mantissa left until its leading one sits at bit `NORMALIZED_MSB`.
    fn normalized(self) -> Self {
        let shift = self.mantissa.leading_zeros() - (127 - NORMALIZED_MSB);
        Self {
            exponent: self.exponent - shift as i32,
            mantissa: self.mantissa << shift,
            ..self
        }
    }
}

// Leading bit position both operands of an aligned add are moved to; leaves room for the
// carry of the sum.
const NORMALIZED_MSB: u32 = 125;

// normalizes, rounds once and packs into the raw bits of `fmt`, saturating on overflow
pub(crate) fn round_pack(
    fmt: Format,
    value: Unpacked,
    mut truncated: Truncated,
    mode: RoundingMode,
) -> u64 {
    let Unpacked {
        sign,
        mut exponent,
        mut mantissa,
    } = value;

    if mantissa == 0 && truncated.is_exact() {
        return fmt.zero(sign);
    }

    let hidden_bit = fmt.hidden_bit();
    while mantissa < hidden_bit && exponent > 1 {
        mantissa = mantissa << 1 | truncated.pop() as u128;
        exponent -= 1;
    }

    let width = 128 - mantissa.leading_zeros();
    let mut shift = width.saturating_sub(fmt.man_len + 1) as i32;
    if exponent + shift < 1 {
        shift = 1 - exponent;
    }
    mantissa = truncated.shift_right(mantissa, shift as u32);
    exponent += shift;

    if truncated.round_up(sign, mantissa & 1 != 0, mode) {
        mantissa += 1;
        if mantissa >> (fmt.man_len + 1) != 0 {
            mantissa >>= 1;
            exponent += 1;
        }
    }

    if exponent >= fmt.max_exp() {
        log::trace!("result saturated (exponent {exponent})");
        return fmt.max_finite(sign);
    }

    if mantissa < hidden_bit {
        exponent = 0;
    }
    fmt.pack(sign, exponent, mantissa)
}

pub(crate) fn round_pack_half(
    value: Unpacked,
    truncated: Truncated,
    mode: RoundingMode,
) -> SoftFloat16 {
    SoftFloat16::from_bits(round_pack(HALF, value, truncated, mode) as u16)
}

// exact aligned sum of two finite values, rounded once into the raw bits of `fmt`
pub(crate) fn add_unpacked(fmt: Format, a: Unpacked, b: Unpacked, mode: RoundingMode) -> u64 {
    let exact_zero_sign = (mode == RoundingMode::TowardNegativeInfinity) as u16;

    match (a.mantissa == 0, b.mantissa == 0) {
        (true, true) => {
            let sign = if a.sign == b.sign { a.sign } else { exact_zero_sign };
            return fmt.zero(sign);
        }
        (true, false) => return round_pack(fmt, b, Truncated::EXACT, mode),
        (false, true) => return round_pack(fmt, a, Truncated::EXACT, mode),
        (false, false) => {}
    }

    let (a, b) = (a.normalized(), b.normalized());

    // make sure that first operand has the larger magnitude
    let (big, small) = if (a.exponent, a.mantissa) >= (b.exponent, b.mantissa) {
        (a, b)
    } else {
        (b, a)
    };

    let mut truncated = Truncated::EXACT;
    let aligned = truncated.shift_right(small.mantissa, (big.exponent - small.exponent) as u32);

    let mantissa = if big.sign == small.sign {
        big.mantissa + aligned
    } else {
        let (complement, borrow) = truncated.negate();
        truncated = complement;
        big.mantissa - aligned - borrow as u128
    };

    if mantissa == 0 && truncated.is_exact() {
        return fmt.zero(exact_zero_sign);
    }

    let sum = Unpacked {
        sign: big.sign,
        exponent: big.exponent,
        mantissa,
    };
    round_pack(fmt, sum, truncated, mode)
}
