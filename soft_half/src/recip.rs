use crate::round::RoundingMode;
use crate::soft_float16::{trace_invalid, Fields, MAX, NAN, POS_ZERO};
use crate::SoftFloat16;

// Coarse `1/sqrt` mantissas, indexed by exponent parity and the top seven fraction bits.
#[rustfmt::skip]
const RECIP_SQRT_ESTIMATE: [u8; 256] = [
    255, 253, 251, 249, 247, 245, 243, 242, 240, 238, 236, 234, 233, 231, 229, 228,
    226, 224, 223, 221, 219, 218, 216, 215, 213, 212, 210, 209, 207, 206, 204, 203,
    201, 200, 198, 197, 196, 194, 193, 192, 190, 189, 188, 186, 185, 184, 183, 181,
    180, 179, 178, 176, 175, 174, 173, 172, 170, 169, 168, 167, 166, 165, 164, 163,
    162, 160, 159, 158, 157, 156, 155, 154, 153, 152, 151, 150, 149, 148, 147, 146,
    145, 144, 143, 142, 141, 140, 140, 139, 138, 137, 136, 135, 134, 133, 132, 131,
    131, 130, 129, 128, 127, 126, 126, 125, 124, 123, 122, 121, 121, 120, 119, 118,
    118, 117, 116, 115, 114, 114, 113, 112, 111, 111, 110, 109, 109, 108, 107, 106,
    105, 104, 103, 101, 100, 99, 97, 96, 95, 93, 92, 91, 90, 88, 87, 86,
    85, 84, 82, 81, 80, 79, 78, 77, 76, 75, 74, 72, 71, 70, 69, 68,
    67, 66, 65, 64, 63, 62, 61, 60, 60, 59, 58, 57, 56, 55, 54, 53,
    52, 51, 51, 50, 49, 48, 47, 46, 46, 45, 44, 43, 42, 42, 41, 40,
    39, 38, 38, 37, 36, 35, 35, 34, 33, 33, 32, 31, 30, 30, 29, 28,
    28, 27, 26, 26, 25, 24, 24, 23, 22, 22, 21, 20, 20, 19, 19, 18,
    17, 17, 16, 16, 15, 14, 14, 13, 13, 12, 11, 11, 10, 10, 9, 9,
    8, 8, 7, 6, 6, 5, 5, 4, 4, 3, 3, 2, 2, 1, 1, 0,
];

// Denormal mantissas up to this have reciprocals beyond the half range.
const RECIP_TINY_LIMIT: u16 = 256;

// `1/sqrt` of the smallest denormal, 2^12.
const RECIP_SQRT_MIN_DENORMAL: SoftFloat16 = SoftFloat16::from_bits(0x6c00);

const REFINEMENT_STEPS: usize = 2;

// Exponent and mantissa with the leading one moved to bit 15; the exponent is offset by
// 5 so a normal input keeps its biased exponent.
fn normalize(exponent: i32, mantissa: u16) -> (i32, u16) {
    let shift = mantissa.leading_zeros();
    (exponent + 5 - shift as i32, mantissa << shift)
}

fn recip_estimate(v: SoftFloat16) -> SoftFloat16 {
    let Fields {
        sign,
        exponent,
        mantissa,
    } = SoftFloat16::extract(v);

    if exponent > 29 {
        // the result is denormal: divide 2^(49 - e) by the mantissa, rounding the
        // remainder half to even
        let dividend = 1u32 << (49 - exponent);
        let divisor = mantissa as u32;
        let mut quotient = (dividend - 1) / divisor;
        let remainder = dividend - quotient * divisor;
        if 2 * remainder > divisor || (2 * remainder == divisor && quotient & 1 != 0) {
            quotient += 1;
        }
        return SoftFloat16::construct(sign, 0, quotient as u16);
    }

    let (exponent, mantissa) = normalize(exponent, mantissa);
    let estimate_exp = 29 - exponent;
    let mut estimate = ((((1u32 << 19) / ((mantissa >> 6) as u32 | 1)) + 1) >> 1) << 2;
    if estimate_exp == 0 {
        estimate >>= 1;
    }
    SoftFloat16::construct(sign, estimate_exp as u16, estimate as u16)
}

fn recip_sqrt_estimate(v: SoftFloat16) -> SoftFloat16 {
    let Fields {
        sign,
        exponent,
        mantissa,
    } = SoftFloat16::extract(v);

    let (exponent, mantissa) = normalize(exponent, mantissa);
    let index = ((!exponent & 1) << 7) as usize | ((mantissa >> 8) & 127) as usize;
    let estimate = (RECIP_SQRT_ESTIMATE[index] as u16) << 2;
    SoftFloat16::construct(sign, ((44 - exponent) >> 1) as u16, estimate)
}

// zero and denormals too small to invert saturate with the input's sign
pub(crate) fn recip(v: SoftFloat16, mode: RoundingMode) -> SoftFloat16 {
    trace_invalid("recip", &[v]);

    let sign = SoftFloat16::sign(v);
    if SoftFloat16::is_nan(v) {
        return NAN;
    } else if SoftFloat16::is_infinite(v) {
        return SoftFloat16::zero(sign);
    } else if SoftFloat16::is_zero(v)
        || (SoftFloat16::exponent(v) == 0 && SoftFloat16::significand(v) <= RECIP_TINY_LIMIT)
    {
        return SoftFloat16::saturated(sign);
    }

    let x = f32::from(v);
    let mut t = f32::from(recip_estimate(v));
    for _ in 0..REFINEMENT_STEPS {
        t *= 2.0 - x * t;
    }
    SoftFloat16::from_f32(t, mode)
}

// zero and negative inputs give the largest finite value
pub(crate) fn recip_sqrt(v: SoftFloat16, mode: RoundingMode) -> SoftFloat16 {
    trace_invalid("recip_sqrt", &[v]);

    if SoftFloat16::is_nan(v) {
        return NAN;
    } else if SoftFloat16::is_zero(v) || SoftFloat16::is_sign_negative(v) {
        return MAX;
    } else if SoftFloat16::is_infinite(v) {
        return POS_ZERO;
    } else if SoftFloat16::to_bits(v) == 1 {
        return RECIP_SQRT_MIN_DENORMAL;
    }

    let x = f32::from(v);
    let mut t = f32::from(recip_sqrt_estimate(v));
    for _ in 0..REFINEMENT_STEPS {
        t = 0.5 * (t * (3.0 - x * t * t));
    }
    SoftFloat16::from_f32(t, mode)
}

impl SoftFloat16 {
    /// `1/v`, rounded to nearest even after refinement.
    pub fn recip(v: Self) -> Self {
        recip(v, RoundingMode::default())
    }

    /// `1/sqrt(v)`, rounded to nearest even after refinement.
    pub fn recip_sqrt(v: Self) -> Self {
        recip_sqrt(v, RoundingMode::default())
    }
}
