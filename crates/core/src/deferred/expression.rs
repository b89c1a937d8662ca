//! Result of additive quantity arithmetic: either a resolved quantity or a
//! deferred operator tree.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{DeferredExpression, Operator};
use crate::core_types::quantity::describe;
use crate::core_types::{Quantity, Scalar, Unit, UnitSignature};
use crate::error::UnitsError;

/// A quantity, or a deferred combination of quantities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expression<T = f64> {
    Quantity(Quantity<T>),
    Deferred(DeferredExpression<T>),
}

impl<T: Scalar> Expression<T> {
    /// Whether this is a quantity with a zero raw value
    pub fn is_zero(&self) -> bool {
        matches!(self, Expression::Quantity(quantity) if quantity.is_zero())
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Expression::Deferred(_))
    }

    pub fn as_quantity(&self) -> Option<&Quantity<T>> {
        match self {
            Expression::Quantity(quantity) => Some(quantity),
            Expression::Deferred(_) => None,
        }
    }

    pub fn as_deferred(&self) -> Option<&DeferredExpression<T>> {
        match self {
            Expression::Deferred(deferred) => Some(deferred),
            Expression::Quantity(_) => None,
        }
    }

    pub fn into_quantity(self) -> Option<Quantity<T>> {
        match self {
            Expression::Quantity(quantity) => Some(quantity),
            Expression::Deferred(_) => None,
        }
    }

    /// Plain numbers that cannot take part in sums with units
    fn unitless_literal(&self) -> Option<&Quantity<T>> {
        self.as_quantity()
            .filter(|quantity| quantity.is_unitless() && !quantity.is_zero())
    }

    fn reject_unitless(&self, rhs: &Expression<T>, kind: Operator) -> Result<(), UnitsError> {
        let other = match (self.unitless_literal(), rhs.unitless_literal()) {
            (Some(_), None) => rhs,
            (None, Some(_)) => self,
            _ => return Ok(()),
        };
        Err(UnitsError::UnitlessOperand {
            operation: kind.verb(),
            unit: match other {
                Expression::Quantity(quantity) => describe(quantity.unit()),
                Expression::Deferred(deferred) => deferred.to_string(),
            },
        })
    }

    /// Add, merging operand lists of sums
    pub fn try_add(self, rhs: Expression<T>) -> Result<Expression<T>, UnitsError> {
        if self.is_zero() {
            return Ok(rhs);
        }
        if rhs.is_zero() {
            return Ok(self);
        }
        match (self, rhs) {
            (Expression::Quantity(left), Expression::Quantity(right)) => left.try_add(&right),
            (left, right) => {
                left.reject_unitless(&right, Operator::Addition)?;
                let mut operands = left.into_addends();
                operands.extend(right.into_addends());
                debug!("Deferring sum of {} operands", operands.len());
                Ok(DeferredExpression::from_operands(Operator::Addition, operands).into())
            }
        }
    }

    fn into_addends(self) -> Vec<Expression<T>> {
        match self {
            Expression::Deferred(deferred) if deferred.kind() == Operator::Addition => {
                deferred.into_operands()
            }
            other => vec![other],
        }
    }

    /// Subtract, appending to an existing difference where possible
    ///
    /// Subtracting a sum appends each addend; subtracting a difference nests
    /// it. An expression minus an equal expression is zero.
    pub fn try_sub(self, rhs: Expression<T>) -> Result<Expression<T>, UnitsError> {
        if rhs.is_zero() {
            return Ok(self);
        }
        if self.is_deferred() && self == rhs {
            return Ok(Quantity::unitless(T::ZERO).into());
        }
        match (self, rhs) {
            (Expression::Quantity(left), Expression::Quantity(right)) => left.try_sub(&right),
            (left, right)
                if left.is_zero() && left.as_quantity().is_some_and(Quantity::is_unitless) =>
            {
                Ok(right.negate())
            }
            (left, right) => {
                left.reject_unitless(&right, Operator::Subtraction)?;
                let mut operands = match left {
                    Expression::Deferred(deferred) if deferred.kind() == Operator::Subtraction => {
                        deferred.into_operands()
                    }
                    other => vec![other],
                };
                operands.extend(right.into_addends());
                debug!("Deferring difference of {} operands", operands.len());
                Ok(DeferredExpression::from_operands(Operator::Subtraction, operands).into())
            }
        }
    }

    /// Multiply, distributing over deferred sums and differences
    pub fn multiply(self, rhs: Expression<T>) -> Expression<T> {
        match (self, rhs) {
            (Expression::Quantity(left), Expression::Quantity(right)) => {
                left.multiply(&right).into()
            }
            (Expression::Quantity(quantity), Expression::Deferred(deferred))
            | (Expression::Deferred(deferred), Expression::Quantity(quantity)) => {
                if quantity.is_zero() {
                    return quantity.into();
                }
                deferred.multiply(&quantity.into()).into()
            }
            (Expression::Deferred(left), right) => left.multiply(&right).into(),
        }
    }

    /// Divide; anything divided by a deferred expression becomes a quotient
    pub fn divide(self, rhs: Expression<T>) -> Expression<T> {
        if self.is_zero() {
            return self;
        }
        match (self, rhs) {
            (Expression::Quantity(left), Expression::Quantity(right)) => {
                left.divide(&right).into()
            }
            (Expression::Deferred(deferred), Expression::Quantity(quantity)) => {
                deferred.divide(&quantity).into()
            }
            (Expression::Deferred(left), right) if left.kind() == Operator::Division => {
                let mut operands = left.into_operands();
                operands.push(right);
                DeferredExpression::from_operands(Operator::Division, operands).into()
            }
            (left, right) => DeferredExpression::pair(Operator::Division, left, right).into(),
        }
    }

    /// Negate every leaf that contributes to the sign
    pub fn negate(self) -> Expression<T> {
        match self {
            Expression::Quantity(quantity) => (-quantity).into(),
            Expression::Deferred(deferred) => deferred.negate().into(),
        }
    }

    /// Unary plus
    pub fn pos(self) -> Expression<T> {
        self
    }

    /// Square of the expression
    pub fn abs2(&self) -> Expression<T> {
        self.clone().multiply(self.clone())
    }

    /// Resolve into a single quantity in `target`
    ///
    /// A quantity is converted directly, with a plain zero adopting `target`.
    pub fn reduce(&self, target: &UnitSignature) -> Result<Quantity<T>, UnitsError> {
        match self {
            Expression::Quantity(quantity) if quantity.is_zero() && quantity.is_unitless() => {
                Ok(Quantity::new(T::ZERO, Some(target.clone())))
            }
            Expression::Quantity(quantity) => quantity.convert_to(target),
            Expression::Deferred(deferred) => deferred.reduce(target),
        }
    }

    /// Resolve a quotient operand: converted when its dimension matches
    /// `target`, kept otherwise
    pub(crate) fn reduce_factor(&self, target: &UnitSignature) -> Result<Quantity<T>, UnitsError> {
        match self {
            Expression::Quantity(quantity) => match quantity.unit() {
                Some(unit) if unit.is_convertible_to(target) => quantity.convert_to(target),
                _ => Ok(quantity.clone()),
            },
            Expression::Deferred(deferred) => deferred.reduce(target),
        }
    }

    /// Unit-named accessor: reduce into a single catalog unit
    pub fn as_unit(&self, unit: Unit) -> Result<Quantity<T>, UnitsError> {
        match self {
            Expression::Quantity(quantity) => quantity.as_unit(unit),
            Expression::Deferred(deferred) => deferred.reduce_to_unit(unit),
        }
    }

    /// Normalize a raw left operand: returns `(lifted, self)`
    pub fn coerce(&self, raw: T) -> (Expression<T>, Expression<T>) {
        (Quantity::unitless(raw).into(), self.clone())
    }
}

impl<T: Scalar> From<Quantity<T>> for Expression<T> {
    fn from(quantity: Quantity<T>) -> Self {
        Expression::Quantity(quantity)
    }
}

impl<T: Scalar> From<DeferredExpression<T>> for Expression<T> {
    fn from(deferred: DeferredExpression<T>) -> Self {
        Expression::Deferred(deferred)
    }
}

impl<T: Scalar> PartialEq for Expression<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Expression::Quantity(left), Expression::Quantity(right)) => left == right,
            (Expression::Deferred(left), Expression::Deferred(right)) => left == right,
            _ => false,
        }
    }
}

impl<T: Scalar> PartialEq<Quantity<T>> for Expression<T> {
    fn eq(&self, other: &Quantity<T>) -> bool {
        self.as_quantity().is_some_and(|quantity| quantity == other)
    }
}

impl<T: Scalar> PartialEq<Expression<T>> for Quantity<T> {
    fn eq(&self, other: &Expression<T>) -> bool {
        other == self
    }
}

impl<T: Scalar> fmt::Display for Expression<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Quantity(quantity) => quantity.fmt(f),
            Expression::Deferred(deferred) => deferred.fmt(f),
        }
    }
}

impl<T: Scalar> Neg for Expression<T> {
    type Output = Expression<T>;
    fn neg(self) -> Expression<T> {
        self.negate()
    }
}

/// Auxiliary macro for the arithmetic operators of [`Expression`] against
/// expressions and quantities.
macro_rules! impl_expression_ops {
    ($($rhs:ty => $convert:expr;)*) => {
        $(
            impl<T: Scalar> Add<$rhs> for Expression<T> {
                type Output = Expression<T>;

                /// # Panics
                /// When a non-zero unitless literal meets a unit-bearing operand.
                #[track_caller]
                fn add(self, rhs: $rhs) -> Expression<T> {
                    self.try_add($convert(rhs)).unwrap_or_else(|e| panic!("{e}"))
                }
            }

            impl<T: Scalar> Sub<$rhs> for Expression<T> {
                type Output = Expression<T>;

                /// # Panics
                /// When a non-zero unitless literal meets a unit-bearing operand.
                #[track_caller]
                fn sub(self, rhs: $rhs) -> Expression<T> {
                    self.try_sub($convert(rhs)).unwrap_or_else(|e| panic!("{e}"))
                }
            }

            impl<T: Scalar> Mul<$rhs> for Expression<T> {
                type Output = Expression<T>;
                fn mul(self, rhs: $rhs) -> Expression<T> {
                    self.multiply($convert(rhs))
                }
            }

            impl<T: Scalar> Div<$rhs> for Expression<T> {
                type Output = Expression<T>;
                fn div(self, rhs: $rhs) -> Expression<T> {
                    self.divide($convert(rhs))
                }
            }
        )*
    };
}

impl_expression_ops! {
    Expression<T> => std::convert::identity;
    Quantity<T> => Expression::from;
}

/// Auxiliary macro for operators between expressions and raw literals.
macro_rules! impl_raw_expression_ops {
    ($($ty:ty),*) => {
        $(
            impl Mul<$ty> for Expression<$ty> {
                type Output = Expression<$ty>;
                fn mul(self, rhs: $ty) -> Expression<$ty> {
                    self.multiply(Quantity::unitless(rhs).into())
                }
            }

            impl Mul<Expression<$ty>> for $ty {
                type Output = Expression<$ty>;
                fn mul(self, rhs: Expression<$ty>) -> Expression<$ty> {
                    let (lhs, rhs) = rhs.coerce(self);
                    lhs.multiply(rhs)
                }
            }

            impl Div<$ty> for Expression<$ty> {
                type Output = Expression<$ty>;
                fn div(self, rhs: $ty) -> Expression<$ty> {
                    self.divide(Quantity::unitless(rhs).into())
                }
            }

            impl Div<Expression<$ty>> for $ty {
                type Output = Expression<$ty>;
                fn div(self, rhs: Expression<$ty>) -> Expression<$ty> {
                    let (lhs, rhs) = rhs.coerce(self);
                    lhs.divide(rhs)
                }
            }

            impl Add<$ty> for Expression<$ty> {
                type Output = Expression<$ty>;
                #[track_caller]
                fn add(self, rhs: $ty) -> Expression<$ty> {
                    self + Quantity::unitless(rhs)
                }
            }

            impl Sub<$ty> for Expression<$ty> {
                type Output = Expression<$ty>;
                #[track_caller]
                fn sub(self, rhs: $ty) -> Expression<$ty> {
                    self - Quantity::unitless(rhs)
                }
            }

            impl PartialEq<$ty> for Expression<$ty> {
                fn eq(&self, other: &$ty) -> bool {
                    *self == Quantity::unitless(*other)
                }
            }
        )*
    };
}

impl_raw_expression_ops!(f32, f64, i32, i64);
