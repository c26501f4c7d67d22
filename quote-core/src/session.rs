//! Quote session: the wizard's persisted records plus its progress.
//!
//! A session owns a [`KeyValueStore`] and drives the flow the wizard screens
//! follow:
//!
//! 1. Vehicle and driver forms report partial completion while being filled
//!    and are saved on submit.
//! 2. Coverage choices are priced live and saved on submit.
//! 3. Opening the summary and exporting it complete the last two steps.
//! 4. Starting a new quote clears the records and the progress.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{info, warn};

use crate::calculations::{PremiumCalculator, PremiumResult, ProgressModel};
use crate::models::{
    CoverageOption, CoverageSelection, DriverDetails, PolicyPeriod, QuoteInputs, QuoteReference,
    QuoteSummary, Step, VehicleDetails, standard_catalog,
};
use crate::store::{KeyValueStore, StoreError};

pub const VEHICLE_DETAILS_KEY: &str = "vehicleDetails";
pub const DRIVER_DETAILS_KEY: &str = "driverDetails";
pub const COVERAGE_OPTIONS_KEY: &str = "coverageOptions";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Please select at least one coverage option")]
    NoCoverageSelected,

    #[error("Please fill in the following required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub struct QuoteSession<S> {
    progress: ProgressModel<S>,
    calculator: PremiumCalculator,
    catalog: &'static [CoverageOption],
}

impl<S: KeyValueStore> QuoteSession<S> {
    /// Opens a session over `store` with the standard catalog and pricing.
    pub fn new(store: S) -> Self {
        Self::with_calculator(store, PremiumCalculator::default())
    }

    pub fn with_calculator(
        store: S,
        calculator: PremiumCalculator,
    ) -> Self {
        Self {
            progress: ProgressModel::new(store),
            calculator,
            catalog: standard_catalog(),
        }
    }

    pub fn progress(&self) -> &ProgressModel<S> {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut ProgressModel<S> {
        &mut self.progress
    }

    pub fn catalog(&self) -> &'static [CoverageOption] {
        self.catalog
    }

    // ── vehicle details ──────────────────────────────────────────────────

    /// Records partial completion of the vehicle form. Nothing is saved.
    pub fn update_vehicle_draft(
        &mut self,
        details: &VehicleDetails,
    ) -> u8 {
        let completion = details.completion();
        self.progress
            .set_step_progress(Step::VehicleDetails, i64::from(completion));
        completion
    }

    /// Saves the vehicle form and marks the step complete.
    ///
    /// # Errors
    ///
    /// [`SessionError::MissingFields`] if a required field is empty.
    pub fn submit_vehicle_details(
        &mut self,
        details: &VehicleDetails,
    ) -> Result<(), SessionError> {
        let missing = details.missing_required_fields();
        if !missing.is_empty() {
            return Err(SessionError::MissingFields(missing));
        }
        self.save_record(VEHICLE_DETAILS_KEY, details)?;
        self.progress.set_step_progress(Step::VehicleDetails, 100);
        info!("vehicle details submitted");
        Ok(())
    }

    pub fn vehicle_details(&self) -> Option<VehicleDetails> {
        self.load_record(VEHICLE_DETAILS_KEY)
    }

    // ── driver details ───────────────────────────────────────────────────

    /// Records partial completion of the driver form. Nothing is saved.
    pub fn update_driver_draft(
        &mut self,
        details: &DriverDetails,
    ) -> u8 {
        let completion = details.completion();
        self.progress
            .set_step_progress(Step::DriverDetails, i64::from(completion));
        completion
    }

    /// Saves the driver form and marks the step complete.
    ///
    /// # Errors
    ///
    /// [`SessionError::MissingFields`] if a required field is empty.
    pub fn submit_driver_details(
        &mut self,
        details: &DriverDetails,
    ) -> Result<(), SessionError> {
        let missing = details.missing_required_fields();
        if !missing.is_empty() {
            return Err(SessionError::MissingFields(missing));
        }
        self.save_record(DRIVER_DETAILS_KEY, details)?;
        self.progress.set_step_progress(Step::DriverDetails, 100);
        info!("driver details submitted");
        Ok(())
    }

    pub fn driver_details(&self) -> Option<DriverDetails> {
        self.load_record(DRIVER_DETAILS_KEY)
    }

    // ── coverage ─────────────────────────────────────────────────────────

    /// Builds premium inputs, taking the vehicle type from the saved
    /// vehicle details when there are any.
    pub fn quote_inputs<I, T>(
        &self,
        coverages: I,
        excess_amount: u32,
        policy_period: PolicyPeriod,
    ) -> QuoteInputs
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let vehicle_type = self.vehicle_details().and_then(|v| v.vehicle_type);
        QuoteInputs::new(coverages, vehicle_type, excess_amount, policy_period)
    }

    /// Live premium estimate for the coverage screen.
    pub fn estimate(
        &self,
        inputs: &QuoteInputs,
    ) -> PremiumResult {
        self.calculator.calculate(inputs, self.catalog)
    }

    /// Toggles a coverage and marks the coverage step complete while at
    /// least one coverage is selected. Returns whether `id` is now selected.
    pub fn toggle_coverage(
        &mut self,
        inputs: &mut QuoteInputs,
        id: &str,
    ) -> bool {
        let selected = inputs.toggle_coverage(id);
        let progress = if inputs.has_selection() { 100 } else { 0 };
        self.progress
            .set_step_progress(Step::CoverageOptions, progress);
        selected
    }

    /// Prices and saves the coverage choices, marking the step complete.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoCoverageSelected`] if nothing is selected.
    pub fn submit_coverage(
        &mut self,
        inputs: &QuoteInputs,
    ) -> Result<CoverageSelection, SessionError> {
        if !inputs.has_selection() {
            return Err(SessionError::NoCoverageSelected);
        }
        let result = self.estimate(inputs);
        let selection = CoverageSelection::from_inputs(inputs, result.premium);

        self.save_record(COVERAGE_OPTIONS_KEY, &selection)?;
        self.progress
            .set_step_progress(Step::CoverageOptions, 100);
        info!(premium = %selection.calculated_premium, "coverage submitted");
        Ok(selection)
    }

    pub fn coverage_selection(&self) -> Option<CoverageSelection> {
        self.load_record(COVERAGE_OPTIONS_KEY)
    }

    // ── summary & download ───────────────────────────────────────────────

    /// Assembles the summary page and marks it viewed.
    pub fn summary(
        &mut self,
        issued_at: DateTime<Utc>,
    ) -> QuoteSummary {
        let summary = QuoteSummary {
            reference: QuoteReference::issued_at(issued_at),
            vehicle: self.vehicle_details(),
            driver: self.driver_details(),
            coverage: self.coverage_selection(),
        };
        self.progress.set_step_progress(Step::QuoteSummary, 100);
        summary
    }

    /// Records a successful export of the summary.
    pub fn mark_downloaded(&mut self) {
        self.progress.set_step_progress(Step::Download, 100);
    }

    /// Discards the saved records and all progress.
    pub fn start_new_quote(&mut self) {
        let store = self.progress.store_mut();
        for key in [VEHICLE_DETAILS_KEY, DRIVER_DETAILS_KEY, COVERAGE_OPTIONS_KEY] {
            store.remove(key);
        }
        self.progress.reset();
        info!("started a new quote");
    }

    /// Persists buffered store changes.
    pub fn flush(&mut self) -> Result<(), SessionError> {
        self.progress.store_mut().flush()?;
        Ok(())
    }

    pub fn into_store(self) -> S {
        self.progress.into_store()
    }

    fn save_record<T: Serialize>(
        &mut self,
        key: &str,
        record: &T,
    ) -> Result<(), SessionError> {
        let json = serde_json::to_string(record)?;
        self.progress.store_mut().set(key, &json);
        Ok(())
    }

    /// Unreadable records are treated as absent.
    fn load_record<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Option<T> {
        let raw = self.progress.store().get(key)?;
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(error) => {
                warn!(key, %error, "unreadable saved record; ignoring");
                None
            }
        }
    }
}
