use serde::{Deserialize, Serialize};

use crate::dot::MATRIX_LENGTH;
use crate::round::RoundingMode;
use crate::SoftFloat16;

/// Rounding configuration handed to every operation that can lose bits. The operator
/// traits on [`SoftFloat16`] behave like `Context::default()`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Context {
    pub rounding: RoundingMode,
}

impl Context {
    pub const fn new(rounding: RoundingMode) -> Self {
        Self { rounding }
    }

    pub fn add(&self, v0: SoftFloat16, v1: SoftFloat16) -> SoftFloat16 {
        crate::add::add(v0, v1, self.rounding)
    }

    pub fn sub(&self, v0: SoftFloat16, v1: SoftFloat16) -> SoftFloat16 {
        crate::sub::sub(v0, v1, self.rounding)
    }

    pub fn mul(&self, v0: SoftFloat16, v1: SoftFloat16) -> SoftFloat16 {
        crate::mul::mul(v0, v1, self.rounding)
    }

    pub fn div(&self, v0: SoftFloat16, v1: SoftFloat16) -> SoftFloat16 {
        crate::div::div(v0, v1, self.rounding)
    }

    /// `v0 * v1 + v2` with one rounding; a zero multiplicand returns `v2` as is.
    pub fn mul_add(&self, v0: SoftFloat16, v1: SoftFloat16, v2: SoftFloat16) -> SoftFloat16 {
        crate::mul_add::mul_add(v0, v1, v2, self.rounding)
    }

    /// `v0 * v1 + acc`, accumulated and rounded in single precision.
    pub fn mul_add_f32(&self, v0: SoftFloat16, v1: SoftFloat16, acc: f32) -> f32 {
        crate::mul_add::mul_add_f32(v0, v1, acc, self.rounding)
    }

    /// `v0 + v1` rounded once to single precision.
    pub fn add_f32(&self, v0: SoftFloat16, v1: SoftFloat16) -> f32 {
        crate::mul_add::add_f32(v0, v1, self.rounding)
    }

    pub fn dot(
        &self,
        a: &[SoftFloat16; MATRIX_LENGTH],
        b: &[SoftFloat16; MATRIX_LENGTH],
        c: SoftFloat16,
    ) -> SoftFloat16 {
        crate::dot::dot(a, b, c, self.rounding)
    }

    pub fn dot_f32(
        &self,
        a: &[SoftFloat16; MATRIX_LENGTH],
        b: &[SoftFloat16; MATRIX_LENGTH],
        c: f32,
    ) -> f32 {
        crate::dot::dot_f32(a, b, c, self.rounding)
    }

    pub fn recip(&self, v: SoftFloat16) -> SoftFloat16 {
        crate::recip::recip(v, self.rounding)
    }

    pub fn recip_sqrt(&self, v: SoftFloat16) -> SoftFloat16 {
        crate::recip::recip_sqrt(v, self.rounding)
    }

    pub fn deq(&self, fixed: u32, scale: SoftFloat16) -> SoftFloat16 {
        crate::fixed::deq(fixed, scale, self.rounding)
    }

    pub fn halve(&self, v: SoftFloat16) -> SoftFloat16 {
        crate::unary::halve(v, self.rounding)
    }

    pub fn from_f32(&self, value: f32) -> SoftFloat16 {
        SoftFloat16::from_f32(value, self.rounding)
    }

    pub fn from_f64(&self, value: f64) -> SoftFloat16 {
        SoftFloat16::from_f64(value, self.rounding)
    }

    pub fn to_i8(&self, v: SoftFloat16) -> i8 {
        SoftFloat16::to_i8(v, self.rounding)
    }

    pub fn to_u8(&self, v: SoftFloat16) -> u8 {
        SoftFloat16::to_u8(v, self.rounding)
    }

    pub fn to_i16(&self, v: SoftFloat16) -> i16 {
        SoftFloat16::to_i16(v, self.rounding)
    }

    pub fn to_u16(&self, v: SoftFloat16) -> u16 {
        SoftFloat16::to_u16(v, self.rounding)
    }

    pub fn to_i32(&self, v: SoftFloat16) -> i32 {
        SoftFloat16::to_i32(v, self.rounding)
    }

    pub fn to_u32(&self, v: SoftFloat16) -> u32 {
        SoftFloat16::to_u32(v, self.rounding)
    }

    pub fn from_i8(&self, value: i8) -> SoftFloat16 {
        SoftFloat16::from_i8(value, self.rounding)
    }

    pub fn from_u8(&self, value: u8) -> SoftFloat16 {
        SoftFloat16::from_u8(value, self.rounding)
    }

    pub fn from_i16(&self, value: i16) -> SoftFloat16 {
        SoftFloat16::from_i16(value, self.rounding)
    }

    pub fn from_u16(&self, value: u16) -> SoftFloat16 {
        SoftFloat16::from_u16(value, self.rounding)
    }

    pub fn from_i32(&self, value: i32) -> SoftFloat16 {
        SoftFloat16::from_i32(value, self.rounding)
    }

    pub fn from_u32(&self, value: u32) -> SoftFloat16 {
        SoftFloat16::from_u32(value, self.rounding)
    }
}

impl From<RoundingMode> for Context {
    fn from(rounding: RoundingMode) -> Self {
        Self::new(rounding)
    }
}
