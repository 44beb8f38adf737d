use std::ops::Neg;

use crate::SoftFloat16;

impl Neg for SoftFloat16 {
    type Output = Self;

    // Flips the sign bit of every encoding, NaN and zero included.
    fn neg(self) -> Self {
        Self::from_bits(Self::to_bits(self) ^ (1 << 15))
    }
}
