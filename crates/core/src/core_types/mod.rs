//! Core types: unit catalog, signatures and quantities

pub mod catalog;
pub mod quantity;
pub mod scalar;
pub mod signature;

pub use catalog::{ConversionTable, Dimension, Unit};
pub use quantity::{Quantity, WithUnit};
pub use scalar::Scalar;
pub use signature::UnitSignature;
