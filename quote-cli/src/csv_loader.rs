//! CSV loader for batch premium quotes.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does **not** matter.
//!
//! | Column | Required | Type | Notes |
//! |-----------------|----------|---------|------------------------------------------------|
//! | `coverages` | yes | string | Coverage ids separated by `;`. May be empty |
//! | `vehicle_type` | no | string | e.g. `truck`. Leave empty when unknown |
//! | `excess_amount` | no | integer | Defaults to `5000` when empty |
//! | `policy_period` | no | integer | Months. Defaults to `12` when empty |
//!
//! ### Example
//!
//! ```csv
//! coverages,vehicle_type,excess_amount,policy_period
//! comprehensive;roadside_assistance,private_car,5000,12
//! third_party_only,,,
//! ```
use quote_core::{DEFAULT_EXCESS_AMOUNT, PolicyPeriod, QuoteInputs, VehicleType};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    coverages: String,
    vehicle_type: Option<String>,
    excess_amount: Option<u32>,
    policy_period: Option<String>,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading or converting CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// Bad structure, missing column, or a non-numeric excess amount.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// The file could not be read.
    #[error("cannot read CSV file: {0}")]
    Io(#[from] std::io::Error),

    /// A `policy_period` cell was not a positive number of months.
    /// `row` is 1-based (header = row 0).
    #[error("invalid policy period '{value}' on row {row}")]
    InvalidPolicyPeriod { value: String, row: usize },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn parse_period(
    raw: Option<String>,
    row_number: usize,
) -> Result<PolicyPeriod, CsvLoadError> {
    let Some(value) = raw.filter(|v| !v.is_empty()) else {
        return Ok(PolicyPeriod::default());
    };
    match value.parse::<u32>() {
        Ok(months) if months > 0 => Ok(PolicyPeriod::from_months(months)),
        _ => Err(CsvLoadError::InvalidPolicyPeriod {
            value,
            row: row_number,
        }),
    }
}

/// Convert a single CSV row into [`QuoteInputs`].
///
/// row_number is 1-based (for error messages).
fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<QuoteInputs, CsvLoadError> {
    let coverages = row
        .coverages
        .split(';')
        .map(str::trim)
        .filter(|id| !id.is_empty());
    let vehicle_type = row
        .vehicle_type
        .filter(|v| !v.is_empty())
        .map(|v| VehicleType::parse(&v));
    let policy_period = parse_period(row.policy_period, row_number)?;

    Ok(QuoteInputs::new(
        coverages,
        vehicle_type,
        row.excess_amount.unwrap_or(DEFAULT_EXCESS_AMOUNT),
        policy_period,
    ))
}

/// Parse CSV text and return one [`QuoteInputs`] per data row, in file order.
///
/// # Errors
///
/// * [`CsvLoadError::Parse`] if the CSV is structurally invalid or a
///   field cannot be deserialised.
/// * [`CsvLoadError::InvalidPolicyPeriod`] if any row has a bad period.
pub fn load_from_str(input: &str) -> Result<Vec<QuoteInputs>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All) // tolerate whitespace around values
        .flexible(false) // strict column count
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &std::path::Path) -> Result<Vec<QuoteInputs>, CsvLoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
