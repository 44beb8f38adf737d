use crate::pack::{add_unpacked, Format, Unpacked, HALF, SINGLE};
use crate::round::RoundingMode;
use crate::soft_float16::{Fields, HIDDEN_BIT, MAN_MASK, MAX_VALID_EXP};
use crate::SoftFloat16;

/// Number of products summed by one dot product accumulate.
pub const MATRIX_LENGTH: usize = 16;

// headroom below the largest product, products up to 58 binades smaller keep every bit
const WINDOW: i32 = 64;

// (sign, weight of the last bit, mantissa); oo counts as max finite and NaN as zero
fn lane(v: SoftFloat16) -> (u16, i32, u64) {
    let Fields {
        sign,
        exponent,
        mantissa,
    } = SoftFloat16::extract(v);
    let (exponent, mantissa) = if SoftFloat16::is_infinite(v) {
        (MAX_VALID_EXP as i32, (HIDDEN_BIT | MAN_MASK) as u64)
    } else if SoftFloat16::is_nan(v) {
        (1, 0)
    } else {
        (exponent, mantissa as u64)
    };
    (sign, exponent - 25, mantissa)
}

// exact sum in units of 2^weight, None when every product is zero
fn product_sum(
    a: &[SoftFloat16; MATRIX_LENGTH],
    b: &[SoftFloat16; MATRIX_LENGTH],
) -> Option<(i128, i32)> {
    let products = a.iter().zip(b.iter()).map(|(&x, &y)| {
        let (sx, ex, mx) = lane(x);
        let (sy, ey, my) = lane(y);
        (sx ^ sy, ex + ey, mx * my)
    });

    let max_weight = products
        .clone()
        .filter(|&(_, _, m)| m != 0)
        .map(|(_, e, _)| e)
        .max()?;

    let sum: i128 = products
        .filter(|&(_, _, m)| m != 0)
        .map(|(sign, e, m)| {
            let aligned = ((m as i128) << WINDOW) >> (max_weight - e);
            if sign == 0 {
                aligned
            } else {
                -aligned
            }
        })
        .sum();
    Some((sum, max_weight - WINDOW))
}

fn unpacked_sum(fmt: Format, sum: i128, weight: i32, mode: RoundingMode) -> Unpacked {
    // products cancelling exactly give -0 only when rounding toward -oo
    let sign = if sum == 0 {
        (mode == RoundingMode::TowardNegativeInfinity) as u16
    } else {
        (sum < 0) as u16
    };
    Unpacked {
        sign,
        exponent: weight + fmt.bias() + fmt.man_len as i32,
        mantissa: sum.unsigned_abs(),
    }
}

// sum(a[i] * b[i]) + c rounded once; oo lanes count as max finite, NaN lanes as zero
pub(crate) fn dot(
    a: &[SoftFloat16; MATRIX_LENGTH],
    b: &[SoftFloat16; MATRIX_LENGTH],
    c: SoftFloat16,
    mode: RoundingMode,
) -> SoftFloat16 {
    let c = if SoftFloat16::is_infinite(c) {
        SoftFloat16::saturated(SoftFloat16::sign(c))
    } else if SoftFloat16::is_nan(c) {
        log::trace!("dot: NaN accumulator replaced by zero");
        SoftFloat16::zero(0)
    } else {
        c
    };

    let Some((sum, weight)) = product_sum(a, b) else {
        return c;
    };

    let bits = add_unpacked(
        HALF,
        unpacked_sum(HALF, sum, weight, mode),
        Unpacked::from_half(c),
        mode,
    );
    SoftFloat16::from_bits(bits as u16)
}

pub(crate) fn dot_f32(
    a: &[SoftFloat16; MATRIX_LENGTH],
    b: &[SoftFloat16; MATRIX_LENGTH],
    c: f32,
    mode: RoundingMode,
) -> f32 {
    let c = if c.is_infinite() {
        f32::from_bits(SINGLE.max_finite(c.is_sign_negative() as u16) as u32)
    } else if c.is_nan() {
        log::trace!("dot_f32: NaN accumulator replaced by zero");
        0.0
    } else {
        c
    };

    let Some((sum, weight)) = product_sum(a, b) else {
        return c;
    };

    let bits = add_unpacked(
        SINGLE,
        unpacked_sum(SINGLE, sum, weight, mode),
        Unpacked::from_single(c),
        mode,
    );
    f32::from_bits(bits as u32)
}

impl SoftFloat16 {
    /// Dot product of two lanes of [`MATRIX_LENGTH`] values accumulated onto `c`, rounded
    /// to nearest even.
    pub fn dot(a: &[Self; MATRIX_LENGTH], b: &[Self; MATRIX_LENGTH], c: Self) -> Self {
        dot(a, b, c, RoundingMode::default())
    }
}
