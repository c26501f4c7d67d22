//! Loads the on-disk fixture and prices every row, covering the same path
//! the `batch` command takes.

use std::path::Path;

use pretty_assertions::assert_eq;
use quote_cli::csv_loader;
use quote_core::calculations::PremiumCalculator;
use quote_core::{PolicyPeriod, VehicleType, standard_catalog};
use rust_decimal_macros::dec;

/// Path to the sample CSV shipped with the test fixtures.
fn fixture_path() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("sample_quotes.csv")
        .leak()
}

#[test]
fn test_load_fixture_file_succeeds() {
    let rows = csv_loader::load_from_file(fixture_path()).expect("fixture file should load");

    assert_eq!(rows.len(), 4);
}

#[test]
fn test_fixture_rows_keep_file_order() {
    let rows = csv_loader::load_from_file(fixture_path()).unwrap();

    assert_eq!(rows[0].vehicle_type, Some(VehicleType::Truck));
    assert_eq!(rows[1].policy_period, PolicyPeriod::SixMonths);
    assert_eq!(rows[2].excess_amount, 1000);
    assert_eq!(rows[3].vehicle_type, None);
}

#[test]
fn test_fixture_premiums() {
    let rows = csv_loader::load_from_file(fixture_path()).unwrap();
    let calculator = PremiumCalculator::default();

    let premiums: Vec<_> = rows
        .iter()
        .map(|inputs| calculator.calculate(inputs, standard_catalog()).premium)
        .collect();

    assert_eq!(
        premiums,
        vec![
            dec!(22500), // 15000 × 1.5
            dec!(3548),  // (6500 − 50) × 0.55 = 3547.5, rounded half up
            dec!(81072), // (45000 + 40) × 1.8, low excess raises the total
            dec!(6000),  // no vehicle details → 1.2
        ]
    );
}
