//! Error type shared by signatures, quantities and deferred expressions.

/// Errors that can occur while building or combining quantities
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitsError {
    /// A unit name outside the catalog was used to build a signature
    InvalidUnit(String),
    /// A signature would have no non-zero exponents
    EmptyUnits,
    /// Signature-level addition/subtraction between different signatures
    IncompatibleUnits {
        /// Rendered left signature
        left: String,
        /// Rendered right signature
        right: String,
    },
    /// Conversion between units of different dimension families
    UnitConversion {
        /// Rendered source signature (`unitless` when absent)
        from: String,
        /// Rendered target signature
        to: String,
    },
    /// A non-zero unitless literal was added to or subtracted from a
    /// unit-bearing operand
    UnitlessOperand {
        /// Name of the rejected operation
        operation: &'static str,
        /// Rendered signature of the unit-bearing side
        unit: String,
    },
    /// A deferred expression was built without operands
    EmptyOperands,
}

impl std::fmt::Display for UnitsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitsError::InvalidUnit(name) => write!(f, "Invalid unit: '{name}'"),
            UnitsError::EmptyUnits => f.write_str("Empty units"),
            UnitsError::IncompatibleUnits { left, right } => {
                write!(f, "Incompatible units: '{left}' and '{right}'")
            }
            UnitsError::UnitConversion { from, to } => {
                write!(f, "Can't convert '{from}' to '{to}'")
            }
            UnitsError::UnitlessOperand { operation, unit } => {
                write!(f, "Can't {operation} a unitless literal and '{unit}'")
            }
            UnitsError::EmptyOperands => {
                f.write_str("Can't build a deferred expression without operands")
            }
        }
    }
}

impl std::error::Error for UnitsError {}
