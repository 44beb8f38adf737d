use crate::pack::{round_pack_half, Format, Unpacked, DOUBLE, SINGLE};
use crate::round::{RoundingMode, Truncated};
use crate::soft_float16::{Class, Fields, EXP_BIAS, HIDDEN_BIT, MAN_LEN, MAN_MASK};
use crate::SoftFloat16;

impl SoftFloat16 {
    /// Rounds a single precision value to half precision. Values beyond the half range,
    /// infinities included, saturate to the largest finite value; NaN stays NaN.
    pub fn from_f32(value: f32, mode: RoundingMode) -> Self {
        let bits = value.to_bits();
        narrow(
            SINGLE,
            (bits >> 31) as u16,
            ((bits >> 23) & 0xff) as i32,
            (bits & 0x7f_ffff) as u64,
            mode,
        )
    }

    /// Rounds a double precision value to half precision, like [`SoftFloat16::from_f32`].
    pub fn from_f64(value: f64, mode: RoundingMode) -> Self {
        let bits = value.to_bits();
        narrow(
            DOUBLE,
            (bits >> 63) as u16,
            ((bits >> 52) & 0x7ff) as i32,
            bits & 0xf_ffff_ffff_ffff,
            mode,
        )
    }

    /// Exact widening; NaN payloads move into the top of the wider mantissa.
    pub fn to_f32(v: Self) -> f32 {
        f32::from_bits(widen(SINGLE, v) as u32)
    }

    /// Exact widening; NaN payloads move into the top of the wider mantissa.
    pub fn to_f64(v: Self) -> f64 {
        f64::from_bits(widen(DOUBLE, v))
    }
}

fn narrow(
    fmt: Format,
    sign: u16,
    exponent: i32,
    significand: u64,
    mode: RoundingMode,
) -> SoftFloat16 {
    if exponent == fmt.max_exp() {
        return if significand != 0 {
            SoftFloat16::quiet_nan(sign)
        } else {
            SoftFloat16::saturated(sign)
        };
    }

    // handle denormals and implicit bit
    let (exponent, mantissa) = if exponent == 0 {
        (1, significand)
    } else {
        (exponent, significand | 1 << fmt.man_len)
    };

    // re-bias; the weight of the mantissa's last bit stays the same
    let value = Unpacked {
        sign,
        exponent: exponent - fmt.bias() - fmt.man_len as i32 + EXP_BIAS + MAN_LEN as i32,
        mantissa: mantissa as u128,
    };
    round_pack_half(value, Truncated::EXACT, mode)
}

fn widen(fmt: Format, v: SoftFloat16) -> u64 {
    let sign = SoftFloat16::sign(v);
    let shift = fmt.man_len - MAN_LEN;

    match SoftFloat16::classify(v) {
        Class::Zero => fmt.zero(sign),
        Class::Infinite | Class::Nan => fmt.pack(
            sign,
            fmt.max_exp(),
            (SoftFloat16::significand(v) as u128) << shift,
        ),
        Class::Denormal | Class::Normal => {
            let Fields {
                mut exponent,
                mut mantissa,
                ..
            } = SoftFloat16::extract(v);
            while mantissa & HIDDEN_BIT == 0 {
                // realign decimal point (only happens for denormal numbers)
                mantissa <<= 1;
                exponent -= 1;
            }
            fmt.pack(
                sign,
                exponent - EXP_BIAS + fmt.bias(),
                ((mantissa & MAN_MASK) as u128) << shift,
            )
        }
    }
}

impl From<f32> for SoftFloat16 {
    fn from(value: f32) -> Self {
        Self::from_f32(value, RoundingMode::default())
    }
}

impl From<f64> for SoftFloat16 {
    fn from(value: f64) -> Self {
        Self::from_f64(value, RoundingMode::default())
    }
}

impl From<SoftFloat16> for f32 {
    fn from(value: SoftFloat16) -> Self {
        SoftFloat16::to_f32(value)
    }
}

impl From<SoftFloat16> for f64 {
    fn from(value: SoftFloat16) -> Self {
        SoftFloat16::to_f64(value)
    }
}
