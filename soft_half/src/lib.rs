//! Software emulation of IEEE 754 binary16 arithmetic with saturating overflow.
//!
//! Every finite result that would round past the largest finite value is clamped to
//! `±65504` instead of becoming an infinity. Rounding is always explicit: the functions
//! on [`Context`] use its [`RoundingMode`], the operator traits on [`SoftFloat16`] round to
//! nearest even.

mod add;
mod context;
mod div;
mod dot;
mod eq;
mod error;
mod fixed;
mod from;
mod int;
mod mul;
mod mul_add;
mod neg;
mod ord;
mod pack;
mod recip;
mod round;
mod soft_float16;
mod sub;
mod unary;

pub use context::Context;
pub use dot::MATRIX_LENGTH;
pub use error::ParseRoundingModeError;
pub use round::{round_one, RoundingMode, Truncated};
pub use soft_float16::{
    Class, Fields, SoftFloat16, MAX, MIN, NAN, NEG_INFINITY, NEG_ZERO, ONE, POS_INFINITY,
    POS_ZERO,
};
