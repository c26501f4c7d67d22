//! Premium calculation for motor insurance quotes.
//!
//! The premium is derived from the selected coverage packages in four
//! stages:
//!
//! | Stage | Description |
//! |-------|-------------|
//! | 1     | Vehicle multiplier from the vehicle type |
//! | 2     | Sum of `base premium × vehicle multiplier` over selected coverages |
//! | 3     | Excess adjustment, floored at 80% of the stage 2 total |
//! | 4     | Policy period multiplier, then rounding to a whole currency unit |
//!
//! # Vehicle Multipliers
//!
//! | Vehicle type         | Multiplier |
//! |----------------------|------------|
//! | `private_car`        | 1.0        |
//! | `commercial_vehicle` | 1.3        |
//! | `motorcycle`         | 0.8        |
//! | `truck`              | 1.5        |
//! | `bus`                | 1.8        |
//! | anything else, or no vehicle details | 1.2 (configurable) |
//!
//! # Excess Adjustment
//!
//! `discount = (excess - baseline) × rate`, then
//! `total = max(total - discount, total × floor)`. With the standard
//! configuration the baseline is 5000, the rate 0.01 and the floor 0.8.
//! An excess below the baseline yields a negative discount, which raises
//! the total. This also holds when no coverage is selected, so an empty
//! selection with a low excess prices above zero.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use quote_core::calculations::PremiumCalculator;
//! use quote_core::{PolicyPeriod, QuoteInputs, VehicleType, standard_catalog};
//!
//! let calculator = PremiumCalculator::default();
//! let inputs = QuoteInputs::new(
//!     ["comprehensive", "roadside_assistance"],
//!     Some(VehicleType::Truck),
//!     5000,
//!     PolicyPeriod::TwentyFourMonths,
//! );
//!
//! let result = calculator.calculate(&inputs, standard_catalog());
//!
//! assert_eq!(result.coverage_total, dec!(24750));
//! assert_eq!(result.premium, dec!(44550));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::{max, round_half_up};
use crate::models::{CoverageOption, PolicyPeriod, QuoteInputs, VehicleType, find_coverage};

/// Errors raised when a [`PremiumConfig`] is out of range.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PremiumConfigError {
    /// The excess baseline must be non-negative.
    #[error("excess baseline must be non-negative, got {0}")]
    InvalidExcessBaseline(Decimal),

    /// The excess discount rate must be between 0 and 1.
    #[error("excess discount rate must be between 0 and 1, got {0}")]
    InvalidExcessDiscountRate(Decimal),

    /// The discount floor must be between 0 and 1.
    #[error("excess discount floor must be between 0 and 1, got {0}")]
    InvalidDiscountFloor(Decimal),

    /// The fallback vehicle multiplier must be positive.
    #[error("default vehicle multiplier must be positive, got {0}")]
    InvalidDefaultVehicleMultiplier(Decimal),
}

/// Tunable constants of the premium calculation.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use quote_core::calculations::PremiumConfig;
///
/// let config = PremiumConfig::default();
///
/// assert_eq!(config.excess_baseline, dec!(5000));
/// assert_eq!(config.discount_floor, dec!(0.8));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumConfig {
    /// Excess amount at which no adjustment applies.
    pub excess_baseline: Decimal,

    /// Currency units of premium removed per unit of excess above the baseline.
    pub excess_discount_rate: Decimal,

    /// Lowest fraction of the coverage total the excess adjustment may leave.
    pub discount_floor: Decimal,

    /// Multiplier for vehicle types without a dedicated rate, and for quotes
    /// with no vehicle details.
    pub default_vehicle_multiplier: Decimal,
}

impl Default for PremiumConfig {
    fn default() -> Self {
        Self {
            excess_baseline: dec!(5000),
            excess_discount_rate: dec!(0.01),
            discount_floor: dec!(0.8),
            default_vehicle_multiplier: dec!(1.2),
        }
    }
}

impl PremiumConfig {
    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`PremiumConfigError`] if:
    /// - `excess_baseline` is negative
    /// - `excess_discount_rate` is not in [0, 1]
    /// - `discount_floor` is not in [0, 1]
    /// - `default_vehicle_multiplier` is not positive
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use quote_core::calculations::{PremiumConfig, PremiumConfigError};
    ///
    /// let config = PremiumConfig {
    ///     discount_floor: dec!(1.5),
    ///     ..PremiumConfig::default()
    /// };
    ///
    /// assert_eq!(
    ///     config.validate(),
    ///     Err(PremiumConfigError::InvalidDiscountFloor(dec!(1.5)))
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), PremiumConfigError> {
        if self.excess_baseline < Decimal::ZERO {
            return Err(PremiumConfigError::InvalidExcessBaseline(
                self.excess_baseline,
            ));
        }
        if self.excess_discount_rate < Decimal::ZERO || self.excess_discount_rate > Decimal::ONE {
            return Err(PremiumConfigError::InvalidExcessDiscountRate(
                self.excess_discount_rate,
            ));
        }
        if self.discount_floor < Decimal::ZERO || self.discount_floor > Decimal::ONE {
            return Err(PremiumConfigError::InvalidDiscountFloor(
                self.discount_floor,
            ));
        }
        if self.default_vehicle_multiplier <= Decimal::ZERO {
            return Err(PremiumConfigError::InvalidDefaultVehicleMultiplier(
                self.default_vehicle_multiplier,
            ));
        }
        Ok(())
    }
}

/// Outcome of a premium calculation.
///
/// `premium` is the figure shown to the user; the remaining fields expose the
/// intermediate stages for the summary breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumResult {
    /// Multiplier applied to every base premium (stage 1).
    pub vehicle_multiplier: Decimal,

    /// Sum of adjusted base premiums for the matched coverages (stage 2).
    pub coverage_total: Decimal,

    /// Raw excess adjustment before the floor is applied (stage 3).
    ///
    /// Negative when the excess is below the baseline.
    pub excess_discount: Decimal,

    /// Coverage total after the floored excess adjustment (stage 3).
    pub discounted_total: Decimal,

    /// Multiplier for the policy period (stage 4).
    pub period_multiplier: Decimal,

    /// Final premium, rounded to a whole currency unit.
    pub premium: Decimal,

    /// Selected ids that were not found in the catalog and were skipped.
    pub unmatched_coverages: Vec<String>,
}

/// Calculator for quote premiums.
#[derive(Debug, Clone, Default)]
pub struct PremiumCalculator {
    config: PremiumConfig,
}

impl PremiumCalculator {
    /// Creates a calculator with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PremiumConfigError`] if the configuration is invalid.
    pub fn new(config: PremiumConfig) -> Result<Self, PremiumConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PremiumConfig {
        &self.config
    }

    /// Prices `inputs` against `catalog`.
    ///
    /// Never fails: unknown coverage ids are skipped and unknown vehicle types
    /// use the default multiplier.
    ///
    /// # Example: Unknown Coverage
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use quote_core::calculations::PremiumCalculator;
    /// use quote_core::{PolicyPeriod, QuoteInputs, VehicleType, standard_catalog};
    ///
    /// let inputs = QuoteInputs::new(
    ///     ["comprehensive", "gap_insurance"],
    ///     Some(VehicleType::PrivateCar),
    ///     5000,
    ///     PolicyPeriod::TwelveMonths,
    /// );
    ///
    /// let result = PremiumCalculator::default().calculate(&inputs, standard_catalog());
    ///
    /// assert_eq!(result.premium, dec!(15000));
    /// assert_eq!(result.unmatched_coverages, vec!["gap_insurance".to_string()]);
    /// ```
    pub fn calculate(
        &self,
        inputs: &QuoteInputs,
        catalog: &[CoverageOption],
    ) -> PremiumResult {
        // Stage 1
        let vehicle_multiplier = self.vehicle_multiplier(inputs.vehicle_type.as_ref());

        // Stage 2
        let mut unmatched_coverages = Vec::new();
        let mut coverage_total = Decimal::ZERO;
        for id in &inputs.selected_coverages {
            match find_coverage(catalog, id) {
                Some(coverage) => coverage_total += coverage.base_premium * vehicle_multiplier,
                None => {
                    debug!(coverage_id = %id, "coverage not in catalog; skipping");
                    unmatched_coverages.push(id.clone());
                }
            }
        }

        // Stage 3
        let excess_discount = self.excess_discount(inputs.excess_amount);
        let discounted_total = self.apply_excess_discount(coverage_total, excess_discount);

        // Stage 4
        let period_multiplier = Self::period_multiplier(inputs.policy_period);
        let premium = round_half_up(discounted_total * period_multiplier);

        debug!(
            vehicle_multiplier = %vehicle_multiplier,
            coverage_total = %coverage_total,
            excess_discount = %excess_discount,
            period_multiplier = %period_multiplier,
            premium = %premium,
            "premium calculated"
        );

        PremiumResult {
            vehicle_multiplier,
            coverage_total,
            excess_discount,
            discounted_total,
            period_multiplier,
            premium,
            unmatched_coverages,
        }
    }

    /// Multiplier for the vehicle type; `None` means no vehicle details.
    ///
    /// Keyed by the type's wire name, so a hand-built
    /// `Unrecognized("truck")` prices the same as `Truck`.
    fn vehicle_multiplier(
        &self,
        vehicle_type: Option<&VehicleType>,
    ) -> Decimal {
        match vehicle_type.map(VehicleType::as_str) {
            Some("private_car") => dec!(1.0),
            Some("commercial_vehicle") => dec!(1.3),
            Some("motorcycle") => dec!(0.8),
            Some("truck") => dec!(1.5),
            Some("bus") => dec!(1.8),
            _ => self.config.default_vehicle_multiplier,
        }
    }

    fn excess_discount(
        &self,
        excess_amount: u32,
    ) -> Decimal {
        (Decimal::from(excess_amount) - self.config.excess_baseline)
            * self.config.excess_discount_rate
    }

    fn apply_excess_discount(
        &self,
        total: Decimal,
        discount: Decimal,
    ) -> Decimal {
        max(total - discount, total * self.config.discount_floor)
    }

    fn period_multiplier(period: PolicyPeriod) -> Decimal {
        match period.months() {
            6 => dec!(0.55),
            24 => dec!(1.8),
            _ => Decimal::ONE,
        }
    }
}
