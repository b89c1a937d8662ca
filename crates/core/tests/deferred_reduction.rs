//! Mixed-unit arithmetic through deferred expressions and their reduction.

mod common;

use approx::assert_relative_eq;
use units_core::{
    DeferredExpression, Expression, Operator, Quantity, Unit, UnitSignature, UnitsError, WithUnit,
};

use common::{inches, m};

#[test]
fn room_perimeter_in_feet() {
    let length = 4.0_f64.with_unit(Unit::Meters);
    let width = 150.0_f64.with_unit(Unit::Inches);
    let perimeter = (length + width) * 2.0_f64;

    let feet = perimeter.as_unit(Unit::Feet).unwrap();
    let expected = 2.0 * (4.0 / 0.3048 + 150.0 / 12.0);
    assert_relative_eq!(feet.value(), expected, max_relative = 1e-12);
}

#[test]
fn travel_time_over_mixed_distance() {
    let distance = 2.0_f64.with_unit(Unit::Kilometers) + 1.0_f64.with_unit(Unit::Miles);
    let speed = 5.0_f64.with_unit(Unit::Kilometers).per(Unit::Hours);

    // Reduce the distance first, then divide through.
    let km = distance.as_unit(Unit::Kilometers).unwrap();
    let hours = (km / speed).as_unit(Unit::Hours).unwrap();
    assert_relative_eq!(hours.value(), (2.0 + 1.609344) / 5.0, max_relative = 1e-12);
}

#[test]
fn mixed_area_reduces_through_dimensions() {
    let area = m(2.0) * inches(10.0) + m(1.0) * m(1.0);
    let square = UnitSignature::with_exponent(Unit::Meters, 2).unwrap();
    let reduced = area.reduce(&square).unwrap();
    assert_relative_eq!(reduced.value(), 2.0 * 0.254 + 1.0, max_relative = 1e-12);
}

#[test]
fn reduction_to_wrong_dimension_fails() {
    let sum = m(1.0) + inches(1.0);
    assert!(matches!(
        sum.as_unit(Unit::Kilograms),
        Err(UnitsError::UnitConversion { .. })
    ));
    let square = UnitSignature::with_exponent(Unit::Meters, 2).unwrap();
    assert!(sum.reduce(&square).is_err());
}

#[test]
fn long_sums_stay_flat() {
    let mut total = Expression::from(m(1.0));
    for unit in [Unit::Centimeters, Unit::Millimeters, Unit::Inches, Unit::Feet] {
        total = total + 1.0_f64.with_unit(unit);
    }
    let deferred = total.as_deferred().unwrap();
    assert_eq!(deferred.kind(), Operator::Addition);
    assert_eq!(deferred.operands().len(), 5);
    assert_eq!(
        total.to_string(),
        "1 meters + 1 centimeters + 1 millimeters + 1 inches + 1 feet"
    );
    let meters = total.as_unit(Unit::Meters).unwrap();
    assert_relative_eq!(
        meters.value(),
        1.0 + 0.01 + 0.001 + 0.0254 + 0.3048,
        max_relative = 1e-12
    );
}

#[test]
fn area_over_mixed_length_lands_in_target() {
    let area = inches(100.0) * inches(100.0);
    let length = m(1.0) + 100.0_f64.with_unit(Unit::Centimeters);
    let width = (area / length).as_unit(Unit::Meters).unwrap();
    assert!(width.is_unit(Unit::Meters));
    assert_relative_eq!(width.value(), 5000.0 * 0.0254 * 0.0254, max_relative = 1e-12);
}

#[test]
fn ratio_cannot_join_a_length_sum() {
    let ratio = m(1.0) / (m(1.0) + inches(1.0));
    let sum = m(1.0) + ratio;
    assert!(matches!(
        sum.as_unit(Unit::Meters),
        Err(UnitsError::UnitConversion { .. })
    ));
}

#[test]
fn quotient_of_sums_is_unitless_ratio() {
    let numerator = m(1.0) + inches(100.0);
    let denominator = m(2.0) + inches(200.0);
    let ratio = (numerator / denominator).as_unit(Unit::Meters).unwrap();
    assert!(ratio.is_unitless());
    assert_relative_eq!(ratio.value(), 0.5, max_relative = 1e-12);
}

#[test]
fn quotient_display() {
    let quotient = m(3.0) / (m(1.0) + inches(2.0));
    assert_eq!(quotient.to_string(), "3 meters / (1 meters + 2 inches)");
    let scaled = quotient.clone() * 2.0_f64;
    assert_eq!(scaled.to_string(), "6 meters / (1 meters + 2 inches)");
    let negated = -quotient;
    assert_eq!(negated.to_string(), "-3 meters / (1 meters + 2 inches)");
}

#[test]
fn subtraction_order_matters() {
    let ab = m(1.0) - inches(1.0);
    let ba = inches(1.0) - m(1.0);
    assert_ne!(ab, ba);
    let sum = ab.clone() + ba;
    assert_relative_eq!(sum.as_unit(Unit::Inches).unwrap().value(), 0.0, epsilon = 1e-9);
    assert_eq!(ab.clone() - ab, 0.0_f64);
}

#[test]
fn explicit_construction_and_serde() {
    let tree = DeferredExpression::new(
        Operator::Subtraction,
        vec![m(2.0).into(), inches(12.0).into()],
    )
    .unwrap();
    let json = serde_json::to_string(&tree).unwrap();
    let back: DeferredExpression = serde_json::from_str(&json).unwrap();
    assert_eq!(back, tree);
    let feet = back.reduce_to_unit(Unit::Feet).unwrap();
    assert_relative_eq!(feet.value(), 2.0 / 0.3048 - 1.0, max_relative = 1e-12);
}

#[test]
fn unitless_literal_policy() {
    let sum = m(1.0) + inches(1.0);
    assert_eq!(sum.clone() + 0.0_f64, sum);
    assert_eq!(
        sum.try_add(Quantity::unitless(2.0).into()),
        Err(UnitsError::UnitlessOperand {
            operation: "add",
            unit: "1 meters + 1 inches".into()
        })
    );
}

#[test]
#[should_panic(expected = "Can't subtract a unitless literal")]
fn unitless_literal_operator_panics() {
    let _ = (m(1.0) + inches(1.0)) - 4.0_f64;
}
