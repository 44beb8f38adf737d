use std::fmt;

/// IEEE-754 binary16 value held as its raw encoding: sign (bit 15), biased exponent
/// (bits 14-10, bias 15) and mantissa (bits 9-0).
#[derive(Clone, Copy, Debug, Default)]
pub struct SoftFloat16(u16);

pub const POS_INFINITY: SoftFloat16 = SoftFloat16(0x7c00);
pub const NEG_INFINITY: SoftFloat16 = SoftFloat16(0xfc00);
pub const NAN: SoftFloat16 = SoftFloat16(0x7e00);
pub const POS_ZERO: SoftFloat16 = SoftFloat16(0x0);
pub const NEG_ZERO: SoftFloat16 = SoftFloat16(0x8000);
pub const ONE: SoftFloat16 = SoftFloat16(0x3c00);
/// Largest finite value, 65504.
pub const MAX: SoftFloat16 = SoftFloat16(0x7bff);
/// Most negative finite value, -65504.
pub const MIN: SoftFloat16 = SoftFloat16(0xfbff);

pub(crate) const EXP_BIAS: i32 = 15;
pub(crate) const MAN_LEN: u32 = 10;
pub(crate) const MAX_EXP: u16 = 0x1f;
pub(crate) const MAX_VALID_EXP: u16 = 0x1e;
pub(crate) const MAN_MASK: u16 = 0x3ff;
pub(crate) const HIDDEN_BIT: u16 = 0x400;
const SIGN_MASK: u16 = 0x8000;
const EXP_MASK: u16 = 0x7c00;
const ABS_MASK: u16 = 0x7fff;

/// Kind of value an encoding stands for. Every encoding has exactly one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Class {
    Zero,
    Denormal,
    Normal,
    Infinite,
    Nan,
}

/// Decoded fields of an encoding.
///
/// `exponent` is the biased exponent field, except that denormals report 1 instead of 0 so
/// that `mantissa * 2^(exponent - 25)` is the magnitude in both cases. `mantissa` carries
/// the implicit bit (0x400) for normals and infinities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fields {
    pub sign: u16,
    pub exponent: i32,
    pub mantissa: u16,
}

impl SoftFloat16 {
    /// Reinterprets a raw encoding. Every bit pattern is kept as is, NaN payloads included.
    pub const fn from_bits(v: u16) -> Self {
        Self(v)
    }

    pub const fn to_bits(v: Self) -> u16 {
        v.0
    }

    pub const fn sign(v: Self) -> u16 {
        v.0 >> 15
    }

    pub const fn exponent(v: Self) -> u16 {
        (v.0 >> MAN_LEN) & MAX_EXP
    }

    pub const fn significand(v: Self) -> u16 {
        v.0 & MAN_MASK
    }

    pub fn extract(v: Self) -> Fields {
        let exponent = Self::exponent(v);
        let significand = Self::significand(v);

        // handle denormals and implicit bit
        let (exponent, mantissa) = if exponent == 0 {
            (1, significand)
        } else {
            (exponent as i32, significand | HIDDEN_BIT)
        };

        Fields {
            sign: Self::sign(v),
            exponent,
            mantissa,
        }
    }

    /// Packs the three fields. The mantissa is cut to its low 10 bits (dropping an implicit
    /// bit if present) and the exponent to 5 bits.
    pub const fn construct(sign: u16, exponent: u16, mantissa: u16) -> Self {
        Self((sign & 1) << 15 | (exponent & MAX_EXP) << MAN_LEN | (mantissa & MAN_MASK))
    }

    pub fn classify(v: Self) -> Class {
        match (Self::exponent(v), Self::significand(v)) {
            (0, 0) => Class::Zero,
            (0, _) => Class::Denormal,
            (MAX_EXP, 0) => Class::Infinite,
            (MAX_EXP, _) => Class::Nan,
            _ => Class::Normal,
        }
    }

    pub const fn is_zero(v: Self) -> bool {
        v.0 & ABS_MASK == 0
    }

    /// Exponent field 0 with a nonzero mantissa; zeros are not denormal.
    pub const fn is_denormal(v: Self) -> bool {
        v.0 & EXP_MASK == 0 && v.0 & MAN_MASK != 0
    }

    pub const fn is_infinite(v: Self) -> bool {
        v.0 & ABS_MASK == EXP_MASK
    }

    pub const fn is_nan(v: Self) -> bool {
        v.0 & EXP_MASK == EXP_MASK && v.0 & MAN_MASK != 0
    }

    /// Exponent field all ones: infinity or NaN.
    pub const fn is_invalid(v: Self) -> bool {
        v.0 & EXP_MASK == EXP_MASK
    }

    pub const fn is_finite(v: Self) -> bool {
        !Self::is_invalid(v)
    }

    pub const fn is_sign_negative(v: Self) -> bool {
        v.0 & SIGN_MASK != 0
    }

    pub(crate) const fn zero(sign: u16) -> Self {
        Self::construct(sign, 0, 0)
    }

    pub(crate) const fn infinity(sign: u16) -> Self {
        Self::construct(sign, MAX_EXP, 0)
    }

    // Largest finite magnitude with the given sign; overflow lands here instead of on
    // infinity.
    pub(crate) const fn saturated(sign: u16) -> Self {
        Self::construct(sign, MAX_VALID_EXP, MAN_MASK)
    }

    pub(crate) const fn quiet_nan(sign: u16) -> Self {
        Self((sign & 1) << 15 | NAN.0)
    }
}

pub(crate) fn trace_invalid(op: &str, operands: &[SoftFloat16]) {
    if log::log_enabled!(log::Level::Trace) {
        for v in operands.iter().filter(|v| SoftFloat16::is_invalid(**v)) {
            log::trace!("{op}: non-finite operand {:#06x}", v.0);
        }
    }
}

impl fmt::Display for SoftFloat16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&f32::from(*self), f)
    }
}

impl fmt::LowerHex for SoftFloat16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}
