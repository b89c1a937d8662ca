//! Unit signatures: products of catalog units raised to integer powers.
//!
//! A [`UnitSignature`] is an immutable, never-empty map from [`Unit`] to a
//! non-zero exponent. Dimensionless values carry no signature at all, so any
//! operation that can cancel every exponent returns `Option<UnitSignature>`
//! with `None` meaning "absent".
//!
//! # Usage
//! ```
//! use units_core::core_types::{Unit, UnitSignature};
//!
//! let meters = UnitSignature::new(Unit::Meters);
//! let area = meters.compose(&meters).unwrap();
//! assert_eq!(area.exponent(Unit::Meters), 2);
//! assert_eq!(area.to_string(), "meters^2");
//!
//! // A signature times its inverse cancels to nothing
//! assert!(area.compose(&area.invert()).is_none());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::catalog::{ConversionTable, Dimension, Unit};
use crate::error::UnitsError;

/// Product of catalog units raised to non-zero integer exponents
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<Unit, i32>", into = "BTreeMap<Unit, i32>")]
pub struct UnitSignature {
    exponents: BTreeMap<Unit, i32>,
}

impl UnitSignature {
    /// Signature of a single unit with exponent 1
    pub fn new(unit: Unit) -> Self {
        UnitSignature {
            exponents: BTreeMap::from([(unit, 1)]),
        }
    }

    /// Signature of a single unit raised to `exponent`
    pub fn with_exponent(unit: Unit, exponent: i32) -> Result<Self, UnitsError> {
        Self::from_units([(unit, exponent)])
    }

    /// Build from unit/exponent pairs. Repeated units have their exponents
    /// summed and zero exponents are dropped.
    pub fn from_units<I>(pairs: I) -> Result<Self, UnitsError>
    where
        I: IntoIterator<Item = (Unit, i32)>,
    {
        let mut exponents = BTreeMap::new();
        for (unit, exponent) in pairs {
            *exponents.entry(unit).or_insert(0) += exponent;
        }
        Self::normalize(exponents).ok_or(UnitsError::EmptyUnits)
    }

    /// Build from catalog names. Any name outside the catalog fails with
    /// [`UnitsError::InvalidUnit`].
    pub fn from_names<'a, I>(pairs: I) -> Result<Self, UnitsError>
    where
        I: IntoIterator<Item = (&'a str, i32)>,
    {
        let table = ConversionTable::global();
        let units = pairs
            .into_iter()
            .map(|(name, exponent)| {
                table
                    .lookup(name)
                    .map(|unit| (unit, exponent))
                    .ok_or_else(|| UnitsError::InvalidUnit(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_units(units)
    }

    /// Signature of a single catalog name with exponent 1
    pub fn from_name(name: &str) -> Result<Self, UnitsError> {
        Unit::from_name(name).map(Self::new)
    }

    fn normalize(mut exponents: BTreeMap<Unit, i32>) -> Option<Self> {
        exponents.retain(|_, exponent| *exponent != 0);
        if exponents.is_empty() {
            None
        } else {
            Some(UnitSignature { exponents })
        }
    }

    /// Exponent of `unit`, zero when absent
    pub fn exponent(&self, unit: Unit) -> i32 {
        self.exponents.get(&unit).copied().unwrap_or(0)
    }

    pub fn exponents(&self) -> &BTreeMap<Unit, i32> {
        &self.exponents
    }

    pub fn iter(&self) -> impl Iterator<Item = (Unit, i32)> + '_ {
        self.exponents.iter().map(|(unit, exponent)| (*unit, *exponent))
    }

    /// Whether this is exactly `unit` with exponent 1
    pub fn is_unit(&self, unit: Unit) -> bool {
        self.exponents.len() == 1 && self.exponent(unit) == 1
    }

    /// Merge exponent maps, summing shared units (multiplication)
    pub fn compose(&self, other: &UnitSignature) -> Option<UnitSignature> {
        let mut exponents = self.exponents.clone();
        for (unit, exponent) in &other.exponents {
            *exponents.entry(*unit).or_insert(0) += exponent;
        }
        Self::normalize(exponents)
    }

    /// Negate every exponent
    pub fn invert(&self) -> UnitSignature {
        UnitSignature {
            exponents: self
                .exponents
                .iter()
                .map(|(unit, exponent)| (*unit, -exponent))
                .collect(),
        }
    }

    /// Compose with the inverse of `other` (division)
    pub fn divide(&self, other: &UnitSignature) -> Option<UnitSignature> {
        self.compose(&other.invert())
    }

    /// Multiply every exponent by `power`
    pub fn powi(&self, power: i32) -> Option<UnitSignature> {
        Self::normalize(
            self.exponents
                .iter()
                .map(|(unit, exponent)| (*unit, exponent * power))
                .collect(),
        )
    }

    /// Decrement the exponent of `unit` by `count` ("per second")
    pub fn per(&self, unit: Unit, count: i32) -> Option<UnitSignature> {
        let mut exponents = self.exponents.clone();
        *exponents.entry(unit).or_insert(0) -= count;
        Self::normalize(exponents)
    }

    /// Signature-level addition: only defined between equal signatures
    pub fn try_add(&self, other: &UnitSignature) -> Result<UnitSignature, UnitsError> {
        self.require_equal(other)
    }

    /// Signature-level subtraction: only defined between equal signatures
    pub fn try_sub(&self, other: &UnitSignature) -> Result<UnitSignature, UnitsError> {
        self.require_equal(other)
    }

    fn require_equal(&self, other: &UnitSignature) -> Result<UnitSignature, UnitsError> {
        if self == other {
            Ok(self.clone())
        } else {
            Err(UnitsError::IncompatibleUnits {
                left: self.to_string(),
                right: other.to_string(),
            })
        }
    }

    /// Summed exponent per dimension family, zero sums removed
    pub fn dimensions(&self) -> BTreeMap<Dimension, i32> {
        let mut dimensions = BTreeMap::new();
        for (unit, exponent) in &self.exponents {
            *dimensions.entry(unit.dimension()).or_insert(0) += exponent;
        }
        dimensions.retain(|_, exponent| *exponent != 0);
        dimensions
    }

    /// Factor from this signature to the product of base units
    pub fn base_factor(&self) -> f64 {
        self.exponents
            .iter()
            .map(|(unit, exponent)| unit.base_factor().powi(*exponent))
            .product()
    }

    /// Whether a value in this signature can be rescaled into `other`
    pub fn is_convertible_to(&self, other: &UnitSignature) -> bool {
        ConversionTable::global().signatures_convertible(self, other)
    }
}

impl From<Unit> for UnitSignature {
    fn from(unit: Unit) -> Self {
        UnitSignature::new(unit)
    }
}

impl TryFrom<BTreeMap<Unit, i32>> for UnitSignature {
    type Error = UnitsError;

    fn try_from(exponents: BTreeMap<Unit, i32>) -> Result<Self, Self::Error> {
        Self::normalize(exponents).ok_or(UnitsError::EmptyUnits)
    }
}

impl From<UnitSignature> for BTreeMap<Unit, i32> {
    fn from(signature: UnitSignature) -> Self {
        signature.exponents
    }
}

impl fmt::Display for UnitSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (unit, exponent)) in self.exponents.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            if *exponent == 1 {
                write!(f, "{unit}")?;
            } else {
                write!(f, "{unit}^{exponent}")?;
            }
        }
        Ok(())
    }
}
