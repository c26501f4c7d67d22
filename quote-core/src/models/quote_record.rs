use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{DriverDetails, PolicyPeriod, QuoteInputs, VehicleDetails};

/// Coverage choices as submitted, persisted under the `coverageOptions` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageSelection {
    pub selected_coverages: Vec<String>,
    pub excess_amount: u32,
    pub policy_period: PolicyPeriod,
    pub calculated_premium: Decimal,
}

impl CoverageSelection {
    pub fn from_inputs(
        inputs: &QuoteInputs,
        calculated_premium: Decimal,
    ) -> Self {
        Self {
            selected_coverages: inputs.selected_coverages.iter().cloned().collect(),
            excess_amount: inputs.excess_amount,
            policy_period: inputs.policy_period,
            calculated_premium,
        }
    }
}

/// Reference printed on a quote, formatted `MC-<unix millis>-<0..999>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteReference(String);

impl QuoteReference {
    /// Derives a reference from the issue time. The trailing number comes
    /// from the sub-millisecond part of the timestamp.
    pub fn issued_at(at: DateTime<Utc>) -> Self {
        let suffix = at.timestamp_subsec_nanos() % 1000;
        Self(format!("MC-{}-{}", at.timestamp_millis(), suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name used when the summary is exported.
    pub fn export_file_name(&self) -> String {
        format!("MotorCare_Quote_{}.pdf", self.0)
    }
}

impl fmt::Display for QuoteReference {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything shown on the final quote summary page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummary {
    pub reference: QuoteReference,
    pub vehicle: Option<VehicleDetails>,
    pub driver: Option<DriverDetails>,
    pub coverage: Option<CoverageSelection>,
}

impl QuoteSummary {
    pub fn premium(&self) -> Option<Decimal> {
        self.coverage.as_ref().map(|c| c.calculated_premium)
    }
}
