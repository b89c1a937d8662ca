//! Deferred operator trees.
//!
//! When quantities with different, non-equal signatures are added or
//! subtracted there is no single unit to express the result in. Instead of
//! failing, the operation is kept symbolically as a [`DeferredExpression`]
//! (Addition, Subtraction or Division of operands). The tree can take part in
//! further arithmetic and is resolved into a single [`Quantity`] once a target
//! unit is supplied through [`DeferredExpression::reduce`].
//!
//! # Usage
//! ```
//! use units_core::core_types::{Unit, UnitSignature, WithUnit};
//!
//! let total = 1.0_f64.with_unit(Unit::Meters) + 50.0_f64.with_unit(Unit::Centimeters);
//! assert_eq!(total.to_string(), "1 meters + 50 centimeters");
//!
//! let meters = total.reduce(&UnitSignature::new(Unit::Meters)).unwrap();
//! assert!((meters.value() - 1.5).abs() < 1e-12);
//! ```

mod expression;

pub use expression::Expression;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::core_types::{Quantity, Scalar, Unit, UnitSignature};
use crate::error::UnitsError;

/// Kind of a deferred node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Addition,
    Subtraction,
    Division,
}

impl Operator {
    pub(crate) fn symbol(self) -> &'static str {
        match self {
            Operator::Addition => " + ",
            Operator::Subtraction => " - ",
            Operator::Division => " / ",
        }
    }

    pub(crate) fn verb(self) -> &'static str {
        match self {
            Operator::Addition => "add",
            Operator::Subtraction => "subtract",
            Operator::Division => "divide",
        }
    }
}

/// Operand tree whose units could not be combined eagerly
///
/// Operand order matters for Subtraction and Division. Equality is structural:
/// same kind and the same operands in the same order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct DeferredExpression<T = f64> {
    kind: Operator,
    #[serde(deserialize_with = "non_empty")]
    operands: Vec<Expression<T>>,
}

fn non_empty<'de, D, T>(deserializer: D) -> Result<Vec<Expression<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let operands = Vec::<Expression<T>>::deserialize(deserializer)?;
    if operands.is_empty() {
        return Err(serde::de::Error::custom(UnitsError::EmptyOperands));
    }
    Ok(operands)
}

impl<T: Scalar> DeferredExpression<T> {
    /// Build a node, failing when `operands` is empty
    pub fn new(kind: Operator, operands: Vec<Expression<T>>) -> Result<Self, UnitsError> {
        if operands.is_empty() {
            return Err(UnitsError::EmptyOperands);
        }
        Ok(DeferredExpression { kind, operands })
    }

    pub(crate) fn pair(
        kind: Operator,
        left: impl Into<Expression<T>>,
        right: impl Into<Expression<T>>,
    ) -> Self {
        DeferredExpression {
            kind,
            operands: vec![left.into(), right.into()],
        }
    }

    /// Internal constructor for operand lists that are non-empty by construction
    pub(crate) fn from_operands(kind: Operator, operands: Vec<Expression<T>>) -> Self {
        debug_assert!(!operands.is_empty());
        DeferredExpression { kind, operands }
    }

    #[inline]
    pub fn kind(&self) -> Operator {
        self.kind
    }

    #[inline]
    pub fn operands(&self) -> &[Expression<T>] {
        &self.operands
    }

    pub(crate) fn into_operands(self) -> Vec<Expression<T>> {
        self.operands
    }

    /// Negate the node
    ///
    /// Sums and differences negate every operand. A quotient only negates its
    /// dividend.
    pub fn negate(&self) -> DeferredExpression<T> {
        match self.kind {
            Operator::Addition | Operator::Subtraction => self.map_operands(Expression::negate),
            Operator::Division => self.map_dividend(Expression::negate),
        }
    }

    /// Multiply by another operand, distributing over sums and differences
    pub fn multiply(&self, rhs: &Expression<T>) -> DeferredExpression<T> {
        match self.kind {
            Operator::Addition | Operator::Subtraction => {
                self.map_operands(|operand| operand.multiply(rhs.clone()))
            }
            Operator::Division => self.map_dividend(|dividend| dividend.multiply(rhs.clone())),
        }
    }

    /// Divide by a quantity
    ///
    /// Sums and differences divide every operand; quotients gain another
    /// divisor.
    pub fn divide(&self, rhs: &Quantity<T>) -> DeferredExpression<T> {
        match self.kind {
            Operator::Addition | Operator::Subtraction => {
                self.map_operands(|operand| operand.divide(rhs.clone().into()))
            }
            Operator::Division => {
                let mut operands = self.operands.clone();
                operands.push(rhs.clone().into());
                DeferredExpression::from_operands(Operator::Division, operands)
            }
        }
    }

    fn map_operands(&self, f: impl Fn(Expression<T>) -> Expression<T>) -> DeferredExpression<T> {
        DeferredExpression::from_operands(
            self.kind,
            self.operands.iter().cloned().map(f).collect(),
        )
    }

    fn map_dividend(&self, f: impl FnOnce(Expression<T>) -> Expression<T>) -> DeferredExpression<T> {
        let mut operands = self.operands.clone();
        let dividend = operands.remove(0);
        operands.insert(0, f(dividend));
        DeferredExpression::from_operands(self.kind, operands)
    }

    /// Square of the node
    pub fn abs2(&self) -> Expression<T> {
        Expression::from(self.clone()).multiply(self.clone().into())
    }

    /// Resolve into a single quantity in `target`
    ///
    /// Every operand of a sum or difference is reduced and converted into
    /// `target`, then the raw values are summed or subtracted left to right.
    /// An operand that cannot be expressed in `target` fails with
    /// [`UnitsError::UnitConversion`].
    ///
    /// Quotient operands are converted when their dimension matches `target`,
    /// otherwise divided as they are. The folded quotient is converted into
    /// `target` when its signature allows it and keeps whatever signature
    /// remains otherwise.
    pub fn reduce(&self, target: &UnitSignature) -> Result<Quantity<T>, UnitsError> {
        debug!("Reducing {} into {}", self, target);
        match self.kind {
            Operator::Addition | Operator::Subtraction => {
                let mut values = self
                    .operands
                    .iter()
                    .map(|operand| in_target(operand.reduce(target)?, target));
                let Some(first) = values.next() else {
                    return Err(UnitsError::EmptyOperands);
                };
                let mut total = first?.value();
                for value in values {
                    let value = value?.value();
                    total = match self.kind {
                        Operator::Addition => total + value,
                        _ => total - value,
                    };
                }
                Ok(Quantity::new(total, Some(target.clone())))
            }
            Operator::Division => {
                let mut quotients = self
                    .operands
                    .iter()
                    .map(|operand| operand.reduce_factor(target));
                let Some(first) = quotients.next() else {
                    return Err(UnitsError::EmptyOperands);
                };
                let mut quotient = first?;
                for divisor in quotients {
                    quotient = quotient.divide(&divisor?);
                }
                match quotient.unit() {
                    Some(unit) if unit != target && unit.is_convertible_to(target) => {
                        quotient.convert_to(target)
                    }
                    _ => Ok(quotient),
                }
            }
        }
    }

    /// Resolve into a single catalog unit
    pub fn reduce_to_unit(&self, unit: Unit) -> Result<Quantity<T>, UnitsError> {
        self.reduce(&UnitSignature::new(unit))
    }
}

/// Express a reduced operand in `target`; a plain zero adopts it
fn in_target<T: Scalar>(
    quantity: Quantity<T>,
    target: &UnitSignature,
) -> Result<Quantity<T>, UnitsError> {
    if quantity.is_zero() && quantity.is_unitless() {
        return Ok(Quantity::new(T::ZERO, Some(target.clone())));
    }
    quantity.convert_to(target)
}

impl<T: Scalar> PartialEq for DeferredExpression<T> {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.operands == other.operands
    }
}

impl<T: Scalar> fmt::Display for DeferredExpression<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, operand) in self.operands.iter().enumerate() {
            if i > 0 {
                f.write_str(self.kind.symbol())?;
            }
            match operand {
                Expression::Deferred(nested) => write!(f, "({nested})")?,
                Expression::Quantity(quantity) => write!(f, "{quantity}")?,
            }
        }
        Ok(())
    }
}
