//! Raw numeric representations a [`Quantity`](super::Quantity) can wrap.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Numeric type usable as the raw value of a quantity
///
/// Implemented for `f32`, `f64`, `i32` and `i64`. Integer scalars rescale
/// through `f64` and round to the nearest integer.
pub trait Scalar:
    Copy
    + PartialEq
    + PartialOrd
    + fmt::Debug
    + fmt::Display
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Additive identity
    const ZERO: Self;

    /// Zero test on the raw value alone, signatures are never consulted
    #[inline]
    fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// Raise to an integer power
    ///
    /// Integer scalars saturate at their bounds on overflow. Negative powers
    /// of integers go through `f64` and round to nearest, so `2.powi(-1)` is
    /// `1`.
    fn powi(self, n: i32) -> Self;

    /// Multiply by a linear conversion factor
    fn rescale(self, factor: f64) -> Self;
}

macro_rules! impl_float_scalar {
    ($($ty:ty),*) => {
        $(
            impl Scalar for $ty {
                const ZERO: Self = 0.0;

                #[inline]
                fn powi(self, n: i32) -> Self {
                    <$ty>::powi(self, n)
                }

                #[inline]
                fn rescale(self, factor: f64) -> Self {
                    (f64::from(self) * factor) as $ty
                }
            }
        )*
    };
}

macro_rules! impl_int_scalar {
    ($($ty:ty),*) => {
        $(
            impl Scalar for $ty {
                const ZERO: Self = 0;

                #[inline]
                fn powi(self, n: i32) -> Self {
                    if n >= 0 {
                        self.saturating_pow(n.unsigned_abs())
                    } else {
                        (self as f64).powi(n).round() as $ty
                    }
                }

                #[inline]
                fn rescale(self, factor: f64) -> Self {
                    (self as f64 * factor).round() as $ty
                }
            }
        )*
    };
}

impl_float_scalar!(f32, f64);
impl_int_scalar!(i32, i64);
