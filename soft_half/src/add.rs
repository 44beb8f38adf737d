use std::ops::Add;

use crate::pack::{add_unpacked, Unpacked, HALF};
use crate::round::RoundingMode;
use crate::soft_float16::{trace_invalid, NAN};
use crate::SoftFloat16;

pub(crate) fn add(v0: SoftFloat16, v1: SoftFloat16, mode: RoundingMode) -> SoftFloat16 {
    trace_invalid("add", &[v0, v1]);

    if SoftFloat16::is_nan(v0) || SoftFloat16::is_nan(v1) {
        // NAN + _ or _ + NAN
        return NAN;
    }
    match (SoftFloat16::is_infinite(v0), SoftFloat16::is_infinite(v1)) {
        // oo + oo
        (true, true) if SoftFloat16::sign(v0) == SoftFloat16::sign(v1) => return v0,
        (true, true) => return NAN,
        // oo + _
        (true, false) => return v0,
        // _ + oo
        (false, true) => return v1,
        (false, false) => {}
    }

    let bits = add_unpacked(
        HALF,
        Unpacked::from_half(v0),
        Unpacked::from_half(v1),
        mode,
    );
    SoftFloat16::from_bits(bits as u16)
}

impl Add for SoftFloat16 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        add(self, other, RoundingMode::default())
    }
}
