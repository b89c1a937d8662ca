//! Closed unit catalog and the conversion table built on top of it.
//!
//! Every [`Unit`] belongs to exactly one [`Dimension`] family and carries a
//! linear factor to that family's base unit (meters, seconds, kilograms).
//! Two units are convertible when they share a family; the conversion is the
//! ratio of their factors. There are no offset units.
//!
//! The catalog is read-only and process-wide. [`ConversionTable::global`]
//! builds the name index once on first use.
//!
//! # Usage
//! ```
//! use units_core::core_types::{ConversionTable, Unit};
//!
//! let table = ConversionTable::global();
//! assert_eq!(table.lookup("inches"), Some(Unit::Inches));
//! assert!(!table.is_valid_unit("furlongs"));
//!
//! let inches: f64 = table.convert(1.0, Unit::Meters, Unit::Inches).unwrap();
//! assert!((inches - 39.3700787).abs() < 1e-6);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use rustc_hash::{FxBuildHasher, FxHashMap};
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::scalar::Scalar;
use super::signature::UnitSignature;
use crate::error::UnitsError;

/// Physical dimension family of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// Length, base unit meters
    Length,
    /// Time, base unit seconds
    Time,
    /// Mass, base unit kilograms
    Mass,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dimension::Length => "length",
            Dimension::Time => "time",
            Dimension::Mass => "mass",
        })
    }
}

/// A unit name from the closed catalog
///
/// Declaration order is the catalog order, which is also the order units
/// appear in when a signature is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Meters,
    Kilometers,
    Centimeters,
    Millimeters,
    Inches,
    Feet,
    Yards,
    Miles,
    Seconds,
    Minutes,
    Hours,
    Grams,
    Kilograms,
    Pounds,
}

impl Unit {
    /// Every unit in catalog order
    pub const ALL: [Unit; 14] = [
        Unit::Meters,
        Unit::Kilometers,
        Unit::Centimeters,
        Unit::Millimeters,
        Unit::Inches,
        Unit::Feet,
        Unit::Yards,
        Unit::Miles,
        Unit::Seconds,
        Unit::Minutes,
        Unit::Hours,
        Unit::Grams,
        Unit::Kilograms,
        Unit::Pounds,
    ];

    /// Catalog name of the unit
    pub const fn name(self) -> &'static str {
        match self {
            Unit::Meters => "meters",
            Unit::Kilometers => "kilometers",
            Unit::Centimeters => "centimeters",
            Unit::Millimeters => "millimeters",
            Unit::Inches => "inches",
            Unit::Feet => "feet",
            Unit::Yards => "yards",
            Unit::Miles => "miles",
            Unit::Seconds => "seconds",
            Unit::Minutes => "minutes",
            Unit::Hours => "hours",
            Unit::Grams => "grams",
            Unit::Kilograms => "kilograms",
            Unit::Pounds => "pounds",
        }
    }

    /// Dimension family the unit measures
    pub const fn dimension(self) -> Dimension {
        match self {
            Unit::Meters
            | Unit::Kilometers
            | Unit::Centimeters
            | Unit::Millimeters
            | Unit::Inches
            | Unit::Feet
            | Unit::Yards
            | Unit::Miles => Dimension::Length,
            Unit::Seconds | Unit::Minutes | Unit::Hours => Dimension::Time,
            Unit::Grams | Unit::Kilograms | Unit::Pounds => Dimension::Mass,
        }
    }

    /// Linear factor from this unit to its family's base unit
    pub const fn base_factor(self) -> f64 {
        match self {
            Unit::Meters | Unit::Seconds | Unit::Kilograms => 1.0,
            Unit::Kilometers => 1000.0,
            Unit::Centimeters => 0.01,
            Unit::Millimeters | Unit::Grams => 0.001,
            Unit::Inches => 0.0254,
            Unit::Feet => 0.3048,
            Unit::Yards => 0.9144,
            Unit::Miles => 1609.344,
            Unit::Minutes => 60.0,
            Unit::Hours => 3600.0,
            Unit::Pounds => 0.45359237,
        }
    }

    /// Look a unit up by catalog name
    pub fn from_name(name: &str) -> Result<Unit, UnitsError> {
        ConversionTable::global()
            .lookup(name)
            .ok_or_else(|| UnitsError::InvalidUnit(name.to_string()))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Unit {
    type Err = UnitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::from_name(s)
    }
}

static GLOBAL: LazyLock<ConversionTable> = LazyLock::new(ConversionTable::build);

/// Read-only conversion table over the unit catalog
#[derive(Debug)]
pub struct ConversionTable {
    by_name: FxHashMap<&'static str, Unit>,
}

impl ConversionTable {
    fn build() -> Self {
        let mut by_name = FxHashMap::with_capacity_and_hasher(Unit::ALL.len(), FxBuildHasher);
        for unit in Unit::ALL {
            by_name.insert(unit.name(), unit);
        }
        ConversionTable { by_name }
    }

    /// The process-wide table
    pub fn global() -> &'static ConversionTable {
        &GLOBAL
    }

    /// Resolve a catalog name
    pub fn lookup(&self, name: &str) -> Option<Unit> {
        self.by_name.get(name).copied()
    }

    /// Whether `name` is a recognized unit name
    pub fn is_valid_unit(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// All units in catalog order
    pub fn units(&self) -> impl Iterator<Item = Unit> {
        Unit::ALL.into_iter()
    }

    /// Catalog grouped by dimension family
    pub fn families(&self) -> BTreeMap<Dimension, Vec<Unit>> {
        let mut families: BTreeMap<Dimension, Vec<Unit>> = BTreeMap::new();
        for unit in self.units() {
            families.entry(unit.dimension()).or_default().push(unit);
        }
        families
    }

    /// Whether two units measure the same dimension family
    pub fn are_convertible(&self, from: Unit, to: Unit) -> bool {
        from.dimension() == to.dimension()
    }

    /// Rescale a raw value between two base units
    pub fn convert<T: Scalar>(&self, value: T, from: Unit, to: Unit) -> Result<T, UnitsError> {
        if !self.are_convertible(from, to) {
            return Err(UnitsError::UnitConversion {
                from: from.name().to_string(),
                to: to.name().to_string(),
            });
        }
        if from == to {
            return Ok(value);
        }
        let factor = from.base_factor() / to.base_factor();
        trace!("convert {} {} -> {} (x{})", value, from, to, factor);
        Ok(value.rescale(factor))
    }

    /// Whether two signatures describe the same compound dimension
    ///
    /// Exponents are summed per family, so `meters inches` converts to
    /// `meters^2` but not to `meters`.
    pub fn signatures_convertible(&self, from: &UnitSignature, to: &UnitSignature) -> bool {
        from.dimensions() == to.dimensions()
    }

    /// Rescale a raw value between two signatures
    ///
    /// Each unit factor is raised to its exponent, so converting square
    /// meters to square inches squares the linear factor.
    pub fn convert_signature<T: Scalar>(
        &self,
        value: T,
        from: &UnitSignature,
        to: &UnitSignature,
    ) -> Result<T, UnitsError> {
        if !self.signatures_convertible(from, to) {
            return Err(UnitsError::UnitConversion {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        if from == to {
            return Ok(value);
        }
        let factor = from.base_factor() / to.base_factor();
        trace!("convert {} {} -> {} (x{})", value, from, to, factor);
        Ok(value.rescale(factor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lookup_by_name() {
        let table = ConversionTable::global();
        for unit in Unit::ALL {
            assert_eq!(table.lookup(unit.name()), Some(unit));
        }
        assert_eq!(table.lookup("Meters"), None);
        assert_eq!(
            Unit::from_name("parsecs"),
            Err(UnitsError::InvalidUnit("parsecs".into()))
        );
    }

    #[test]
    fn test_families() {
        let families = ConversionTable::global().families();
        assert_eq!(families[&Dimension::Length].len(), 8);
        assert_eq!(
            families[&Dimension::Time],
            vec![Unit::Seconds, Unit::Minutes, Unit::Hours]
        );
        assert_eq!(families[&Dimension::Mass].len(), 3);
    }

    #[test]
    fn test_convert_linear() {
        let table = ConversionTable::global();
        let meters: f64 = table.convert(100.0, Unit::Inches, Unit::Meters).unwrap();
        assert_relative_eq!(meters, 2.54, epsilon = 1e-12);
        let minutes: f64 = table.convert(7200.0, Unit::Seconds, Unit::Minutes).unwrap();
        assert_relative_eq!(minutes, 120.0);
        let miles: f64 = table.convert(1.0, Unit::Miles, Unit::Feet).unwrap();
        assert_relative_eq!(miles, 5280.0, epsilon = 1e-9);
    }

    #[test]
    fn test_convert_across_families_fails() {
        let table = ConversionTable::global();
        assert!(!table.are_convertible(Unit::Meters, Unit::Seconds));
        assert_eq!(
            table.convert(1.0_f64, Unit::Meters, Unit::Seconds),
            Err(UnitsError::UnitConversion {
                from: "meters".into(),
                to: "seconds".into()
            })
        );
    }

    #[test]
    fn test_convert_squared_signature() {
        let table = ConversionTable::global();
        let sq_m = UnitSignature::with_exponent(Unit::Meters, 2).unwrap();
        let sq_in = UnitSignature::with_exponent(Unit::Inches, 2).unwrap();
        let value: f64 = table.convert_signature(1.0, &sq_m, &sq_in).unwrap();
        assert_relative_eq!(value, 1.0 / (0.0254 * 0.0254), max_relative = 1e-12);
    }

    #[test]
    fn test_mixed_signature_convertible() {
        let table = ConversionTable::global();
        let mixed = UnitSignature::from_units([(Unit::Meters, 1), (Unit::Inches, 1)]).unwrap();
        let sq_m = UnitSignature::with_exponent(Unit::Meters, 2).unwrap();
        assert!(table.signatures_convertible(&mixed, &sq_m));
        assert!(!table.signatures_convertible(&mixed, &UnitSignature::new(Unit::Meters)));
        let value: f64 = table.convert_signature(1.0, &mixed, &sq_m).unwrap();
        assert_relative_eq!(value, 0.0254);
    }
}
