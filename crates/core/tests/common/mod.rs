//! Shared setup for integration tests

use units_core::{Quantity, Unit, WithUnit};

/// Route `tracing` output through the test writer, filtered by `RUST_LOG`
#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

pub fn m(value: f64) -> Quantity {
    value.with_unit(Unit::Meters)
}

pub fn inches(value: f64) -> Quantity {
    value.with_unit(Unit::Inches)
}
