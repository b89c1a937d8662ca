//! Algebraic laws of quantities and signatures, checked over seeded random
//! values and every catalog unit.

mod common;

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use units_core::{ConversionTable, Quantity, Unit, UnitSignature, UnitsError, WithUnit};

use common::{inches, m};

const SAMPLES: usize = 200;

fn random_unit(rng: &mut StdRng) -> Unit {
    Unit::ALL[rng.random_range(0..Unit::ALL.len())]
}

fn random_signature(rng: &mut StdRng) -> UnitSignature {
    loop {
        let pairs: Vec<(Unit, i32)> = (0..rng.random_range(1..4))
            .map(|_| (random_unit(rng), rng.random_range(-3..=3)))
            .collect();
        if let Ok(signature) = UnitSignature::from_units(pairs) {
            return signature;
        }
    }
}

#[test]
fn equality_requires_identical_signature() {
    for a in Unit::ALL {
        for b in Unit::ALL {
            let left = 2.5_f64.with_unit(a);
            let right = 2.5_f64.with_unit(b);
            assert_eq!(left == right, a == b, "{a} vs {b}");
        }
    }
}

#[test]
fn same_unit_addition_sums_values() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..SAMPLES {
        let unit = random_unit(&mut rng);
        let x: f64 = rng.random_range(-1e6..1e6);
        let y: f64 = rng.random_range(-1e6..1e6);
        let sum = x.with_unit(unit) + y.with_unit(unit);
        assert_eq!(sum, (x + y).with_unit(unit));
    }
}

#[test]
fn mixed_addition_reduces_to_converted_sum() {
    let mut rng = StdRng::seed_from_u64(11);
    let table = ConversionTable::global();
    for _ in 0..SAMPLES {
        let x: f64 = rng.random_range(1.0..1e4);
        let y: f64 = rng.random_range(1.0..1e4);
        let sum = m(x) + inches(y);
        let deferred = sum.as_deferred().expect("meters + inches defers");
        assert_eq!(deferred.operands().len(), 2);

        let reduced = sum.as_unit(Unit::Meters).unwrap();
        let expected = x + table.convert(y, Unit::Inches, Unit::Meters).unwrap();
        assert!(reduced.is_unit(Unit::Meters));
        assert_relative_eq!(reduced.value(), expected, max_relative = 1e-12);
    }
}

#[test]
fn conversion_round_trips() {
    let mut rng = StdRng::seed_from_u64(42);
    let families = ConversionTable::global().families();
    for _ in 0..SAMPLES {
        let from = random_unit(&mut rng);
        let family = &families[&from.dimension()];
        let to = family[rng.random_range(0..family.len())];
        let q = rng.random_range(-1e5..1e5_f64).with_unit(from);

        let back = q.convert_to_unit(to).unwrap().convert_to_unit(from).unwrap();
        assert!(back.is_unit(from));
        assert_relative_eq!(back.value(), q.value(), max_relative = 1e-12);
    }
}

#[test]
fn compound_conversion_round_trips() {
    let area = UnitSignature::with_exponent(Unit::Feet, 2).unwrap();
    let metric = UnitSignature::with_exponent(Unit::Centimeters, 2).unwrap();
    let q = Quantity::new(12.0_f64, Some(area.clone()));
    let converted = q.convert_to(&metric).unwrap();
    assert_relative_eq!(converted.value(), 12.0 * 30.48 * 30.48, max_relative = 1e-12);
    let back = converted.convert_to(&area).unwrap();
    assert_relative_eq!(back.value(), 12.0, max_relative = 1e-12);
}

#[test]
fn conversion_to_own_unit_is_identity() {
    for unit in Unit::ALL {
        let q = 3.75_f64.with_unit(unit);
        assert_eq!(q.convert_to_unit(unit).unwrap(), q);
    }
}

#[test]
fn zero_equals_literal_zero() {
    assert_eq!(m(0.0), 0.0_f64);
    assert_eq!(0.0_f64, inches(0.0));
    assert_ne!(m(1.0), inches(1.0));
    assert_ne!(m(1.0), 1.0_f64);
}

#[test]
fn multiply_divide_round_trip() {
    let area = m(3.0) * m(2.0);
    let square = UnitSignature::with_exponent(Unit::Meters, 2).unwrap();
    assert_eq!(area, Quantity::new(6.0, Some(square)));
    assert_eq!(area / m(2.0), m(3.0));
}

#[test]
fn signature_inversion_cancels() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..SAMPLES {
        let signature = random_signature(&mut rng);
        assert_eq!(signature.compose(&signature.invert()), None);
        assert_eq!(signature.invert().invert(), signature);
    }
}

#[test]
fn multiplying_by_inverse_is_unitless() {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..SAMPLES {
        let signature = random_signature(&mut rng);
        let value: f64 = rng.random_range(1.0..100.0);
        let q = Quantity::new(value, Some(signature.clone()));
        let inverse = Quantity::new(1.0 / value, Some(signature.invert()));
        let product = q * inverse;
        assert!(product.is_unitless());
        assert_relative_eq!(product.value(), 1.0, max_relative = 1e-12);
    }
}

#[test]
fn signature_construction_errors() {
    assert_eq!(
        UnitSignature::from_names([("meters", 0)]),
        Err(UnitsError::EmptyUnits)
    );
    assert_eq!(
        UnitSignature::from_names([("fathoms", 1)]),
        Err(UnitsError::InvalidUnit("fathoms".into()))
    );
}

#[test]
fn quantities_serialize_with_unit_map() {
    let speed = m(12.5).per(Unit::Seconds);
    let json = serde_json::to_string(&speed).unwrap();
    assert_eq!(json, r#"{"value":12.5,"unit":{"meters":1,"seconds":-1}}"#);
    let back: Quantity = serde_json::from_str(&json).unwrap();
    assert_eq!(back, speed);

    let plain: Quantity = serde_json::from_str(r#"{"value":4.0,"unit":null}"#).unwrap();
    assert_eq!(plain, 4.0_f64);
}

#[test]
fn catalog_is_shared_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let table = ConversionTable::global();
                let unit = Unit::ALL[i];
                table.lookup(unit.name())
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), Some(Unit::ALL[i]));
    }
}
