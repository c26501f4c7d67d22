use std::fmt;

use serde::{Deserialize, Serialize};

/// One stage of the quotation wizard.
///
/// Variants are declared in display order; [`Step::ALL`] preserves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    VehicleDetails,
    DriverDetails,
    CoverageOptions,
    QuoteSummary,
    Download,
}

impl Step {
    /// Every step, in the order the wizard presents them.
    pub const ALL: [Step; 5] = [
        Step::VehicleDetails,
        Step::DriverDetails,
        Step::CoverageOptions,
        Step::QuoteSummary,
        Step::Download,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VehicleDetails => "vehicle_details",
            Self::DriverDetails => "driver_details",
            Self::CoverageOptions => "coverage_options",
            Self::QuoteSummary => "quote_summary",
            Self::Download => "download",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "vehicle_details" => Some(Self::VehicleDetails),
            "driver_details" => Some(Self::DriverDetails),
            "coverage_options" => Some(Self::CoverageOptions),
            "quote_summary" => Some(Self::QuoteSummary),
            "download" => Some(Self::Download),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VehicleDetails => "Vehicle Details",
            Self::DriverDetails => "Driver Details",
            Self::CoverageOptions => "Coverage Options",
            Self::QuoteSummary => "Quote Summary",
            Self::Download => "Download",
        }
    }

    /// Share of the overall progress this step contributes, in percent.
    ///
    /// The weights of all steps sum to exactly 100.
    pub fn weight(&self) -> u8 {
        match self {
            Self::VehicleDetails => 25,
            Self::DriverDetails => 25,
            Self::CoverageOptions => 25,
            Self::QuoteSummary => 15,
            Self::Download => 10,
        }
    }

    /// 0-based position in [`Step::ALL`].
    pub fn ordinal(&self) -> usize {
        match self {
            Self::VehicleDetails => 0,
            Self::DriverDetails => 1,
            Self::CoverageOptions => 2,
            Self::QuoteSummary => 3,
            Self::Download => 4,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse status used by the step indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Active,
    Pending,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Active => "active",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
