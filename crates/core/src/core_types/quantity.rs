//! Quantities: raw values paired with an optional unit signature.
//!
//! A [`Quantity`] wraps any [`Scalar`] value and an optional
//! [`UnitSignature`]. A quantity without a signature is a plain number.
//!
//! # Arithmetic
//! - Multiplication and division always resolve to a single quantity,
//!   composing signatures (units that cancel out leave a unitless result).
//! - Addition and subtraction of equal signatures combine raw values. Different
//!   signatures are kept symbolically as a deferred [`Expression`] that is
//!   resolved later by [`Expression::reduce`].
//! - A unitless literal only combines additively with a unit-bearing quantity
//!   when it is zero; otherwise the operation is rejected with
//!   [`UnitsError::UnitlessOperand`]. The `+`/`-` operators panic in that case,
//!   [`Quantity::try_add`]/[`Quantity::try_sub`] return the error.
//! - Zero operands short-circuit before any signature is inspected.
//!
//! # Equality
//! `3 meters != 3 inches != 3`, but a zero of any unit equals the literal zero
//! so guards like `if distance == 0.0` keep working.
//!
//! # Usage
//! ```
//! use units_core::core_types::{Quantity, Unit, WithUnit};
//!
//! let area = 3.0_f64.with_unit(Unit::Meters) * 2.0_f64.with_unit(Unit::Meters);
//! assert_eq!(area.to_string(), "6 meters^2");
//!
//! let length = area / 2.0_f64.with_unit(Unit::Meters);
//! assert_eq!(length, 3.0_f64.with_unit(Unit::Meters));
//!
//! assert_eq!(0.0_f64.with_unit(Unit::Inches), 0.0_f64);
//! assert_ne!(1.0_f64.with_unit(Unit::Meters), 1.0_f64);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::catalog::{ConversionTable, Unit};
use super::scalar::Scalar;
use super::signature::UnitSignature;
use crate::deferred::{DeferredExpression, Expression, Operator};
use crate::error::UnitsError;

/// Render an optional signature for messages
pub(crate) fn describe(unit: Option<&UnitSignature>) -> String {
    unit.map_or_else(|| "unitless".to_string(), ToString::to_string)
}

/// A raw value with an optional unit signature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quantity<T = f64> {
    value: T,
    unit: Option<UnitSignature>,
}

impl<T: Scalar> Quantity<T> {
    /// Lift a raw value with an optional signature
    #[inline]
    pub fn new(value: T, unit: Option<UnitSignature>) -> Self {
        Quantity { value, unit }
    }

    /// Plain number without units
    #[inline]
    pub fn unitless(value: T) -> Self {
        Quantity { value, unit: None }
    }

    /// Quantity in a single unit or a full signature
    pub fn with_unit(value: T, unit: impl Into<UnitSignature>) -> Self {
        Quantity {
            value,
            unit: Some(unit.into()),
        }
    }

    /// Lift a raw value and an optional catalog name
    pub fn lift(value: T, unit: Option<&str>) -> Result<Self, UnitsError> {
        let unit = unit.map(UnitSignature::from_name).transpose()?;
        Ok(Quantity { value, unit })
    }

    /// Get the raw value
    #[inline]
    pub fn value(&self) -> T {
        self.value
    }

    /// Get the signature, `None` for plain numbers
    #[inline]
    pub fn unit(&self) -> Option<&UnitSignature> {
        self.unit.as_ref()
    }

    pub fn into_parts(self) -> (T, Option<UnitSignature>) {
        (self.value, self.unit)
    }

    #[inline]
    pub fn is_unitless(&self) -> bool {
        self.unit.is_none()
    }

    /// Zero fast path on the raw value, ignoring the signature
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Add, deferring when the signatures differ
    pub fn try_add(&self, other: &Quantity<T>) -> Result<Expression<T>, UnitsError> {
        if self.is_zero() {
            return Ok(other.clone().into());
        }
        if other.is_zero() {
            return Ok(self.clone().into());
        }
        self.combine(other, Operator::Addition)
    }

    /// Subtract, deferring when the signatures differ
    pub fn try_sub(&self, other: &Quantity<T>) -> Result<Expression<T>, UnitsError> {
        if other.is_zero() {
            return Ok(self.clone().into());
        }
        if self.is_zero() && self.is_unitless() {
            return Ok((-other.clone()).into());
        }
        self.combine(other, Operator::Subtraction)
    }

    fn combine(&self, other: &Quantity<T>, kind: Operator) -> Result<Expression<T>, UnitsError> {
        match (&self.unit, &other.unit) {
            (Some(left), Some(right)) => {
                let unit = match kind {
                    Operator::Addition => left.try_add(right),
                    _ => left.try_sub(right),
                };
                match unit {
                    Ok(unit) => Ok(Quantity::new(self.apply(kind, other.value), Some(unit)).into()),
                    Err(UnitsError::IncompatibleUnits { .. }) => {
                        debug!("Deferring {} {:?} {}", self, kind, other);
                        Ok(DeferredExpression::pair(kind, self.clone(), other.clone()).into())
                    }
                    Err(e) => Err(e),
                }
            }
            (None, None) => Ok(Quantity::unitless(self.apply(kind, other.value)).into()),
            (Some(unit), None) | (None, Some(unit)) => Err(UnitsError::UnitlessOperand {
                operation: kind.verb(),
                unit: unit.to_string(),
            }),
        }
    }

    fn apply(&self, kind: Operator, rhs: T) -> T {
        match kind {
            Operator::Addition => self.value + rhs,
            Operator::Subtraction => self.value - rhs,
            Operator::Division => self.value / rhs,
        }
    }

    /// Multiply values and compose signatures
    pub fn multiply(&self, other: &Quantity<T>) -> Quantity<T> {
        if self.is_zero() {
            return self.clone();
        }
        if other.is_zero() {
            return other.clone();
        }
        let unit = match (&self.unit, &other.unit) {
            (Some(left), Some(right)) => left.compose(right),
            (Some(unit), None) | (None, Some(unit)) => Some(unit.clone()),
            (None, None) => None,
        };
        Quantity::new(self.value * other.value, unit)
    }

    /// Divide values and compose with the inverted divisor signature
    pub fn divide(&self, other: &Quantity<T>) -> Quantity<T> {
        // Also keeps 0 / x unitless
        if self.is_zero() {
            return self.clone();
        }
        let unit = match (&self.unit, &other.unit) {
            (Some(left), Some(right)) => left.divide(right),
            (Some(unit), None) => Some(unit.clone()),
            (None, Some(unit)) => Some(unit.invert()),
            (None, None) => None,
        };
        Quantity::new(self.value / other.value, unit)
    }

    /// Raise the value to `power` and multiply every exponent by it
    pub fn powi(&self, power: i32) -> Quantity<T> {
        Quantity::new(
            self.value.powi(power),
            self.unit.as_ref().and_then(|unit| unit.powi(power)),
        )
    }

    /// Element-wise multiplication against a container
    pub fn mul_each(&self, others: &[Quantity<T>]) -> Vec<Quantity<T>> {
        others.iter().map(|other| self.multiply(other)).collect()
    }

    /// Element-wise division against a container
    pub fn div_each(&self, others: &[Quantity<T>]) -> Vec<Quantity<T>> {
        others.iter().map(|other| self.divide(other)).collect()
    }

    /// Convert into `target`
    ///
    /// Returns an equal clone when already in `target`. Fails with
    /// [`UnitsError::UnitConversion`] for unitless values and for signatures of
    /// a different dimension.
    pub fn convert_to(&self, target: &UnitSignature) -> Result<Quantity<T>, UnitsError> {
        let Some(unit) = &self.unit else {
            return Err(UnitsError::UnitConversion {
                from: describe(None),
                to: target.to_string(),
            });
        };
        if unit == target {
            return Ok(self.clone());
        }
        let value = ConversionTable::global().convert_signature(self.value, unit, target)?;
        Ok(Quantity::new(value, Some(target.clone())))
    }

    pub fn convert_to_unit(&self, unit: Unit) -> Result<Quantity<T>, UnitsError> {
        self.convert_to(&UnitSignature::new(unit))
    }

    /// Unit-named accessor: converts unit-bearing values and lets plain
    /// numbers adopt `unit`
    pub fn as_unit(&self, unit: Unit) -> Result<Quantity<T>, UnitsError> {
        if self.is_unitless() {
            Ok(Quantity::with_unit(self.value, unit))
        } else {
            self.convert_to_unit(unit)
        }
    }

    /// Whether the signature is exactly `unit`
    pub fn is_unit(&self, unit: Unit) -> bool {
        self.unit.as_ref().is_some_and(|signature| signature.is_unit(unit))
    }

    /// Same value "per `unit`"
    pub fn per(&self, unit: Unit) -> Quantity<T> {
        self.per_n(unit, 1)
    }

    /// Same value with `unit`'s exponent decremented by `count`
    pub fn per_n(&self, unit: Unit, count: i32) -> Quantity<T> {
        let signature = match &self.unit {
            Some(signature) => signature.per(unit, count),
            None => UnitSignature::with_exponent(unit, -count).ok(),
        };
        Quantity::new(self.value, signature)
    }

    /// Ordering with conversion of `other` into this quantity's unit
    ///
    /// A plain number is only ordered against a unit-bearing quantity when
    /// one of them is zero, in either direction; otherwise the comparison
    /// fails with [`UnitsError::UnitConversion`]. `Ok(None)` only when the raw
    /// values themselves are unordered (NaN).
    pub fn try_cmp(&self, other: &Quantity<T>) -> Result<Option<Ordering>, UnitsError> {
        match (&self.unit, &other.unit) {
            (None, None) => Ok(self.value.partial_cmp(&other.value)),
            (Some(left), Some(right)) if left == right => Ok(self.value.partial_cmp(&other.value)),
            (Some(_), None) | (None, Some(_)) if self.is_zero() || other.is_zero() => {
                Ok(self.value.partial_cmp(&other.value))
            }
            (None, Some(right)) => {
                let converted = self.convert_to(right)?;
                Ok(converted.value.partial_cmp(&other.value))
            }
            (Some(left), _) => {
                let converted = other.convert_to(left)?;
                Ok(self.value.partial_cmp(&converted.value))
            }
        }
    }

    /// Element-wise [`Quantity::try_cmp`] against a container
    pub fn try_cmp_each(
        &self,
        others: &[Quantity<T>],
    ) -> Vec<Result<Option<Ordering>, UnitsError>> {
        others.iter().map(|other| self.try_cmp(other)).collect()
    }

    /// Compare the raw value against a literal, ignoring units
    pub fn cmp_raw(&self, raw: T) -> Option<Ordering> {
        self.value.partial_cmp(&raw)
    }

    /// Normalize a raw left operand: returns `(lifted, self)`
    pub fn coerce(&self, raw: T) -> (Quantity<T>, Quantity<T>) {
        (Quantity::unitless(raw), self.clone())
    }
}

impl<T: Scalar> PartialEq for Quantity<T> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.unit, &other.unit) {
            (left, right) if left == right => self.value == other.value,
            // Zero of any unit equals the plain zero
            (Some(_), None) | (None, Some(_)) => self.is_zero() && other.is_zero(),
            _ => false,
        }
    }
}

impl<T: Scalar> PartialOrd for Quantity<T> {
    /// Ordered only when the signatures match, or against a plain zero
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (&self.unit, &other.unit) {
            (left, right) if left == right => self.value.partial_cmp(&other.value),
            (Some(_), None) if other.is_zero() => self.value.partial_cmp(&other.value),
            (None, Some(_)) if self.is_zero() => self.value.partial_cmp(&other.value),
            _ => None,
        }
    }
}

impl<T: Scalar> fmt::Display for Quantity<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.unit {
            Some(unit) => write!(f, "{} {}", self.value, unit),
            None => write!(f, "{}", self.value),
        }
    }
}

impl<T: Scalar> From<T> for Quantity<T> {
    fn from(value: T) -> Self {
        Quantity::unitless(value)
    }
}

impl<T: Scalar> Neg for Quantity<T> {
    type Output = Quantity<T>;
    fn neg(self) -> Quantity<T> {
        Quantity::new(-self.value, self.unit)
    }
}

impl<T: Scalar> Add for Quantity<T> {
    type Output = Expression<T>;

    /// # Panics
    /// When a non-zero unitless literal meets a unit-bearing quantity.
    #[track_caller]
    fn add(self, rhs: Quantity<T>) -> Expression<T> {
        self.try_add(&rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl<T: Scalar> Sub for Quantity<T> {
    type Output = Expression<T>;

    /// # Panics
    /// When a non-zero unitless literal meets a unit-bearing quantity.
    #[track_caller]
    fn sub(self, rhs: Quantity<T>) -> Expression<T> {
        self.try_sub(&rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl<T: Scalar> Mul for Quantity<T> {
    type Output = Quantity<T>;
    fn mul(self, rhs: Quantity<T>) -> Quantity<T> {
        self.multiply(&rhs)
    }
}

impl<T: Scalar> Div for Quantity<T> {
    type Output = Quantity<T>;
    fn div(self, rhs: Quantity<T>) -> Quantity<T> {
        self.divide(&rhs)
    }
}

// Quantity on the left, deferred expression on the right
impl<T: Scalar> Add<Expression<T>> for Quantity<T> {
    type Output = Expression<T>;
    #[track_caller]
    fn add(self, rhs: Expression<T>) -> Expression<T> {
        Expression::from(self) + rhs
    }
}

impl<T: Scalar> Sub<Expression<T>> for Quantity<T> {
    type Output = Expression<T>;
    #[track_caller]
    fn sub(self, rhs: Expression<T>) -> Expression<T> {
        Expression::from(self) - rhs
    }
}

impl<T: Scalar> Mul<Expression<T>> for Quantity<T> {
    type Output = Expression<T>;
    fn mul(self, rhs: Expression<T>) -> Expression<T> {
        Expression::from(self).multiply(rhs)
    }
}

impl<T: Scalar> Div<Expression<T>> for Quantity<T> {
    type Output = Expression<T>;
    fn div(self, rhs: Expression<T>) -> Expression<T> {
        Expression::from(self).divide(rhs)
    }
}

/// Auxiliary macro for operators between quantities and raw literals, with the
/// literal on either side. Raw operands are lifted to unitless quantities.
macro_rules! impl_raw_ops {
    ($($ty:ty),*) => {
        $(
            impl Add<$ty> for Quantity<$ty> {
                type Output = Expression<$ty>;
                #[track_caller]
                fn add(self, rhs: $ty) -> Expression<$ty> {
                    self + Quantity::unitless(rhs)
                }
            }

            impl Add<Quantity<$ty>> for $ty {
                type Output = Expression<$ty>;
                #[track_caller]
                fn add(self, rhs: Quantity<$ty>) -> Expression<$ty> {
                    let (lhs, rhs) = rhs.coerce(self);
                    lhs + rhs
                }
            }

            impl Sub<$ty> for Quantity<$ty> {
                type Output = Expression<$ty>;
                #[track_caller]
                fn sub(self, rhs: $ty) -> Expression<$ty> {
                    self - Quantity::unitless(rhs)
                }
            }

            impl Sub<Quantity<$ty>> for $ty {
                type Output = Expression<$ty>;
                #[track_caller]
                fn sub(self, rhs: Quantity<$ty>) -> Expression<$ty> {
                    let (lhs, rhs) = rhs.coerce(self);
                    lhs - rhs
                }
            }

            impl Mul<$ty> for Quantity<$ty> {
                type Output = Quantity<$ty>;
                fn mul(self, rhs: $ty) -> Quantity<$ty> {
                    self * Quantity::unitless(rhs)
                }
            }

            impl Mul<Quantity<$ty>> for $ty {
                type Output = Quantity<$ty>;
                fn mul(self, rhs: Quantity<$ty>) -> Quantity<$ty> {
                    let (lhs, rhs) = rhs.coerce(self);
                    lhs * rhs
                }
            }

            impl Div<$ty> for Quantity<$ty> {
                type Output = Quantity<$ty>;
                fn div(self, rhs: $ty) -> Quantity<$ty> {
                    self / Quantity::unitless(rhs)
                }
            }

            impl Div<Quantity<$ty>> for $ty {
                type Output = Quantity<$ty>;
                fn div(self, rhs: Quantity<$ty>) -> Quantity<$ty> {
                    let (lhs, rhs) = rhs.coerce(self);
                    lhs / rhs
                }
            }

            impl PartialEq<$ty> for Quantity<$ty> {
                fn eq(&self, other: &$ty) -> bool {
                    *self == Quantity::unitless(*other)
                }
            }

            impl PartialEq<Quantity<$ty>> for $ty {
                fn eq(&self, other: &Quantity<$ty>) -> bool {
                    *other == *self
                }
            }

            impl PartialOrd<$ty> for Quantity<$ty> {
                fn partial_cmp(&self, other: &$ty) -> Option<Ordering> {
                    self.partial_cmp(&Quantity::unitless(*other))
                }
            }

            impl PartialOrd<Quantity<$ty>> for $ty {
                fn partial_cmp(&self, other: &Quantity<$ty>) -> Option<Ordering> {
                    Quantity::unitless(*self).partial_cmp(other)
                }
            }
        )*
    };
}

impl_raw_ops!(f32, f64, i32, i64);

/// Literal-construction helper: `3.0_f64.with_unit(Unit::Meters)`
pub trait WithUnit: Scalar {
    /// Lift into a quantity of `unit`
    fn with_unit(self, unit: impl Into<UnitSignature>) -> Quantity<Self> {
        Quantity::with_unit(self, unit)
    }

    /// Lift into a plain number
    fn unitless(self) -> Quantity<Self> {
        Quantity::unitless(self)
    }
}

impl<T: Scalar> WithUnit for T {}
