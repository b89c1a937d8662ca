//! Units Core Library
//!
//! Numbers that carry physical units. A [`Quantity`] pairs a raw value with an
//! optional [`UnitSignature`] drawn from a closed catalog of length, time and
//! mass units.
//!
//! ## Arithmetic
//!
//! - Multiplication and division compose signatures and always resolve.
//! - Addition and subtraction of equal signatures resolve; mismatched units
//!   produce a [`DeferredExpression`] that is reduced later into any compatible
//!   target unit.
//! - Conversion between units of the same dimension family is linear.
//!
//! ```
//! use units_core::{Unit, WithUnit};
//!
//! let run = 5.0_f64.with_unit(Unit::Kilometers) + 800.0_f64.with_unit(Unit::Meters);
//! let miles = run.as_unit(Unit::Miles).unwrap();
//! assert!((miles.value() - 3.6039).abs() < 1e-4);
//! ```

// Core types: catalog, signatures, quantities
pub mod core_types;

// Deferred operator trees for mixed-unit sums
pub mod deferred;

pub mod error;

pub use core_types::{ConversionTable, Dimension, Quantity, Scalar, Unit, UnitSignature, WithUnit};
pub use deferred::{DeferredExpression, Expression, Operator};
pub use error::UnitsError;
