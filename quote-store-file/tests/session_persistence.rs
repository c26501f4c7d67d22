//! A quote session saved to a TOML file and picked up again by a new
//! process, as the CLI does between invocations.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use quote_core::{DriverDetails, PolicyPeriod, QuoteSession, Step, VehicleDetails, VehicleType};
use quote_store_file::TomlFileStore;
use rust_decimal_macros::dec;
use tempfile::TempDir;

fn vehicle() -> VehicleDetails {
    VehicleDetails {
        vehicle_type: Some(VehicleType::Bus),
        make: "Volvo".to_string(),
        model: "B8R".to_string(),
        year: "2021".to_string(),
        registration_number: "KA-01-1234".to_string(),
        ..VehicleDetails::default()
    }
}

fn driver() -> DriverDetails {
    DriverDetails {
        first_name: "Sam".to_string(),
        last_name: "Rivera".to_string(),
        email: "sam@example.com".to_string(),
        phone: "555-0100".to_string(),
        license_number: "DL-998877".to_string(),
        ..DriverDetails::default()
    }
}

#[test]
fn session_resumes_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.toml");

    {
        let mut session = QuoteSession::new(TomlFileStore::open(&path).unwrap());
        session.submit_vehicle_details(&vehicle()).unwrap();
        session.submit_driver_details(&driver()).unwrap();
        let inputs = session.quote_inputs(["third_party_only"], 5000, PolicyPeriod::SixMonths);
        session.submit_coverage(&inputs).unwrap();
        session.flush().unwrap();
    }

    let mut resumed = QuoteSession::new(TomlFileStore::open(&path).unwrap());

    assert_eq!(resumed.progress().overall_progress(), 75);
    assert_eq!(resumed.vehicle_details(), Some(vehicle()));
    assert_eq!(resumed.driver_details(), Some(driver()));

    // 5000 × 1.8 (bus) × 0.55 (six months)
    let summary = resumed.summary(Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap());
    assert_eq!(summary.premium(), Some(dec!(4950)));
    assert_eq!(resumed.progress().step_progress(Step::QuoteSummary), 100);
}

#[test]
fn new_quote_is_cleared_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.toml");

    {
        let mut session = QuoteSession::new(TomlFileStore::open(&path).unwrap());
        session.submit_vehicle_details(&vehicle()).unwrap();
        session.mark_downloaded();
        session.flush().unwrap();

        session.start_new_quote();
        session.flush().unwrap();
    }

    let resumed = QuoteSession::new(TomlFileStore::open(&path).unwrap());

    assert_eq!(resumed.progress().overall_progress(), 0);
    assert_eq!(resumed.vehicle_details(), None);
}

#[test]
fn unflushed_session_leaves_no_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.toml");

    let mut session = QuoteSession::new(TomlFileStore::open(&path).unwrap());
    session.mark_downloaded();
    drop(session);

    assert!(!path.exists());
}
