//! Weighted progress tracking across the quotation wizard.
//!
//! Each [`Step`] carries a 0-100 completion value kept in an injected
//! [`KeyValueStore`], one key per step. The overall percentage weighs every
//! step by [`Step::weight`]:
//!
//! | Step               | Weight |
//! |--------------------|--------|
//! | `vehicle_details`  | 25     |
//! | `driver_details`   | 25     |
//! | `coverage_options` | 25     |
//! | `quote_summary`    | 15     |
//! | `download`         | 10     |
//!
//! The step indicator uses a second, coarser scale: every step owns a
//! nominal 20-point band of the overall percentage regardless of its weight.
//! See [`step_status_for`].
//!
//! # Example
//!
//! ```
//! use quote_core::calculations::ProgressModel;
//! use quote_core::store::MemoryStore;
//! use quote_core::{Step, StepStatus};
//!
//! let mut progress = ProgressModel::new(MemoryStore::new());
//! progress.set_step_progress(Step::VehicleDetails, 100);
//!
//! assert_eq!(progress.overall_progress(), 25);
//! assert_eq!(progress.step_status(Step::VehicleDetails), StepStatus::Completed);
//! assert_eq!(progress.step_status(Step::DriverDetails), StepStatus::Active);
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{clamp_percent, round_half_up};
use crate::models::{Step, StepStatus};
use crate::store::KeyValueStore;

/// Prefix of the store keys holding per-step progress.
pub const PROGRESS_KEY_PREFIX: &str = "quote_progress.";

/// Width of each step's band on the step indicator.
const STATUS_BAND: u16 = 20;

/// Store key for a step's progress value.
pub fn progress_key(step: Step) -> String {
    format!("{PROGRESS_KEY_PREFIX}{}", step.as_str())
}

/// Notification delivered to progress subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// A step's progress was written. `progress` is the clamped stored value.
    StepUpdated { step: Step, progress: u8, overall: u8 },
    /// Every step was cleared.
    Reset,
}

/// Handle returned by [`ProgressModel::on_progress_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type ProgressCallback = Box<dyn FnMut(&ProgressEvent)>;

/// Point-in-time view of every step plus the derived figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub steps: Vec<StepProgress>,
    pub overall: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepProgress {
    pub step: Step,
    pub progress: u8,
    pub status: StepStatus,
}

/// Computes the overall percentage from per-step values.
///
/// Each step contributes `progress × weight / 100`; the sum is rounded
/// half-up and capped at 100.
///
/// # Examples
///
/// ```
/// use quote_core::Step;
/// use quote_core::calculations::overall_from;
///
/// let overall = overall_from(|step| if step == Step::Download { 50 } else { 0 });
///
/// assert_eq!(overall, 5);
/// ```
pub fn overall_from(progress_of: impl Fn(Step) -> u8) -> u8 {
    let total: Decimal = Step::ALL
        .iter()
        .map(|&step| Decimal::from(progress_of(step)) * Decimal::from(step.weight()) / dec!(100))
        .sum();

    let rounded = round_half_up(total);
    clamp_percent(i64::try_from(rounded).unwrap_or(100))
}

/// Classifies a step for the step indicator from the overall percentage.
///
/// The step at 0-based index `i` is completed once overall reaches
/// `(i + 1) × 20`, active from `i × 20`, and pending below that.
///
/// # Examples
///
/// ```
/// use quote_core::calculations::step_status_for;
/// use quote_core::{Step, StepStatus};
///
/// assert_eq!(step_status_for(Step::DriverDetails, 39), StepStatus::Active);
/// assert_eq!(step_status_for(Step::DriverDetails, 40), StepStatus::Completed);
/// assert_eq!(step_status_for(Step::QuoteSummary, 40), StepStatus::Pending);
/// ```
pub fn step_status_for(
    step: Step,
    overall: u8,
) -> StepStatus {
    let index = step.ordinal() as u16;
    let overall = u16::from(overall);

    if overall >= (index + 1) * STATUS_BAND {
        StepStatus::Completed
    } else if overall >= index * STATUS_BAND {
        StepStatus::Active
    } else {
        StepStatus::Pending
    }
}

/// Tracks per-step completion through an injected store.
///
/// The model keeps no progress of its own: every read goes to the store, so
/// several models over the same store always agree. Only the subscriber list
/// lives in memory.
pub struct ProgressModel<S> {
    store: S,
    subscribers: Vec<(SubscriptionId, ProgressCallback)>,
    next_subscription: u64,
}

impl<S: KeyValueStore> ProgressModel<S> {
    /// Attaches a model to `store`. Existing progress in the store is kept.
    pub fn new(store: S) -> Self {
        Self {
            store,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Records `value` for `step`, clamped to 0-100, then notifies
    /// subscribers. Other steps are untouched.
    pub fn set_step_progress(
        &mut self,
        step: Step,
        value: i64,
    ) {
        let progress = clamp_percent(value);
        self.store.set(&progress_key(step), &progress.to_string());
        debug!(step = %step, requested = value, stored = progress, "step progress updated");

        let overall = self.overall_progress();
        self.notify(&ProgressEvent::StepUpdated {
            step,
            progress,
            overall,
        });
    }

    /// Stored progress for `step`, or 0 when unset.
    ///
    /// Unreadable stored values also read as 0 so the progress display
    /// stays available. Fractional values are rounded, out-of-range values
    /// clamped.
    pub fn step_progress(
        &self,
        step: Step,
    ) -> u8 {
        let Some(raw) = self.store.get(&progress_key(step)) else {
            return 0;
        };

        match Decimal::from_str(raw.trim()) {
            Ok(value) => clamp_percent(
                i64::try_from(round_half_up(value)).unwrap_or(if value.is_sign_negative() {
                    0
                } else {
                    100
                }),
            ),
            Err(error) => {
                warn!(step = %step, value = %raw, %error, "unreadable step progress; treating as 0");
                0
            }
        }
    }

    /// Weighted overall percentage, 0-100.
    pub fn overall_progress(&self) -> u8 {
        overall_from(|step| self.step_progress(step))
    }

    /// Clears every step, then notifies subscribers.
    pub fn reset(&mut self) {
        for step in Step::ALL {
            self.store.remove(&progress_key(step));
        }
        debug!("progress reset");
        self.notify(&ProgressEvent::Reset);
    }

    /// Step indicator status derived from the current overall percentage.
    pub fn step_status(
        &self,
        step: Step,
    ) -> StepStatus {
        step_status_for(step, self.overall_progress())
    }

    /// Every step with its status, in display order.
    pub fn step_statuses(&self) -> Vec<(Step, StepStatus)> {
        let overall = self.overall_progress();
        Step::ALL
            .iter()
            .map(|&step| (step, step_status_for(step, overall)))
            .collect()
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        let overall = self.overall_progress();
        let steps = Step::ALL
            .iter()
            .map(|&step| StepProgress {
                step,
                progress: self.step_progress(step),
                status: step_status_for(step, overall),
            })
            .collect();

        ProgressSnapshot { steps, overall }
    }

    /// Registers `callback` to run synchronously after every
    /// [`set_step_progress`](Self::set_step_progress) and
    /// [`reset`](Self::reset). Callbacks run in registration order.
    pub fn on_progress_changed<F>(
        &mut self,
        callback: F,
    ) -> SubscriptionId
    where
        F: FnMut(&ProgressEvent) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Removes a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(
        &mut self,
        id: SubscriptionId,
    ) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    fn notify(
        &mut self,
        event: &ProgressEvent,
    ) {
        for (_, callback) in &mut self.subscribers {
            callback(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::store::MemoryStore;

    fn model() -> ProgressModel<MemoryStore> {
        ProgressModel::new(MemoryStore::new())
    }

    // =========================================================================
    // set_step_progress / step_progress tests
    // =========================================================================

    #[test]
    fn unset_step_reads_zero() {
        assert_eq!(model().step_progress(Step::CoverageOptions), 0);
    }

    #[test]
    fn set_step_progress_clamps_upper_bound() {
        let mut progress = model();

        progress.set_step_progress(Step::VehicleDetails, 150);

        assert_eq!(progress.step_progress(Step::VehicleDetails), 100);
    }

    #[test]
    fn set_step_progress_clamps_lower_bound() {
        let mut progress = model();

        progress.set_step_progress(Step::VehicleDetails, -20);

        assert_eq!(progress.step_progress(Step::VehicleDetails), 0);
    }

    #[test]
    fn set_step_progress_leaves_other_steps_alone() {
        let mut progress = model();
        progress.set_step_progress(Step::DriverDetails, 60);

        progress.set_step_progress(Step::VehicleDetails, 40);

        assert_eq!(progress.step_progress(Step::DriverDetails), 60);
        assert_eq!(progress.step_progress(Step::VehicleDetails), 40);
    }

    #[test]
    fn set_step_progress_overwrites_previous_value() {
        let mut progress = model();
        progress.set_step_progress(Step::DriverDetails, 60);

        progress.set_step_progress(Step::DriverDetails, 20);

        assert_eq!(progress.step_progress(Step::DriverDetails), 20);
    }

    #[test]
    fn set_step_progress_writes_one_key_per_step() {
        let mut progress = model();

        progress.set_step_progress(Step::QuoteSummary, 100);

        assert_eq!(
            progress.store().get("quote_progress.quote_summary"),
            Some("100".to_string())
        );
    }

    // =========================================================================
    // corrupt store tests
    // =========================================================================

    #[test]
    fn non_numeric_stored_value_reads_zero() {
        let mut store = MemoryStore::new();
        store.set(&progress_key(Step::DriverDetails), "half done");

        let progress = ProgressModel::new(store);

        assert_eq!(progress.step_progress(Step::DriverDetails), 0);
        assert_eq!(progress.overall_progress(), 0);
    }

    #[test]
    fn out_of_range_stored_value_is_clamped() {
        let mut store = MemoryStore::new();
        store.set(&progress_key(Step::VehicleDetails), "250");
        store.set(&progress_key(Step::DriverDetails), "-4");

        let progress = ProgressModel::new(store);

        assert_eq!(progress.step_progress(Step::VehicleDetails), 100);
        assert_eq!(progress.step_progress(Step::DriverDetails), 0);
    }

    #[test]
    fn fractional_stored_value_is_rounded() {
        let mut store = MemoryStore::new();
        store.set(&progress_key(Step::CoverageOptions), "37.5");

        let progress = ProgressModel::new(store);

        assert_eq!(progress.step_progress(Step::CoverageOptions), 38);
    }

    // =========================================================================
    // overall_progress tests
    // =========================================================================

    #[test]
    fn fresh_model_has_zero_overall() {
        assert_eq!(model().overall_progress(), 0);
    }

    #[test]
    fn all_steps_complete_is_exactly_one_hundred() {
        let mut progress = model();
        for step in Step::ALL {
            progress.set_step_progress(step, 100);
        }

        assert_eq!(progress.overall_progress(), 100);
    }

    #[test]
    fn vehicle_details_alone_is_twenty_five() {
        let mut progress = model();

        progress.set_step_progress(Step::VehicleDetails, 100);

        assert_eq!(progress.overall_progress(), 25);
    }

    #[test]
    fn half_download_alone_is_five() {
        let mut progress = model();

        progress.set_step_progress(Step::Download, 50);

        assert_eq!(progress.overall_progress(), 5);
    }

    #[test]
    fn overall_rounds_half_up() {
        let mut progress = model();

        // 50 × 15 / 100 = 7.5
        progress.set_step_progress(Step::QuoteSummary, 50);

        assert_eq!(progress.overall_progress(), 8);
    }

    #[test]
    fn overall_combines_partial_steps() {
        let mut progress = model();
        progress.set_step_progress(Step::VehicleDetails, 100);
        progress.set_step_progress(Step::DriverDetails, 40);
        progress.set_step_progress(Step::CoverageOptions, 17);

        // 25 + 10 + 4.25 = 39.25
        assert_eq!(progress.overall_progress(), 39);
    }

    // =========================================================================
    // reset tests
    // =========================================================================

    #[test]
    fn reset_clears_every_step() {
        let mut progress = model();
        for step in Step::ALL {
            progress.set_step_progress(step, 100);
        }

        progress.reset();

        for step in Step::ALL {
            assert_eq!(progress.step_progress(step), 0);
        }
        assert_eq!(progress.overall_progress(), 0);
        assert!(progress.store().is_empty());
    }

    #[test]
    fn reset_leaves_unrelated_keys() {
        let mut store = MemoryStore::new();
        store.set("vehicleDetails", "{}");
        let mut progress = ProgressModel::new(store);
        progress.set_step_progress(Step::VehicleDetails, 100);

        progress.reset();

        assert_eq!(progress.store().get("vehicleDetails"), Some("{}".to_string()));
    }

    // =========================================================================
    // step status tests
    // =========================================================================

    #[test]
    fn fresh_model_marks_first_step_active() {
        let statuses = model().step_statuses();

        assert_eq!(
            statuses,
            vec![
                (Step::VehicleDetails, StepStatus::Active),
                (Step::DriverDetails, StepStatus::Pending),
                (Step::CoverageOptions, StepStatus::Pending),
                (Step::QuoteSummary, StepStatus::Pending),
                (Step::Download, StepStatus::Pending),
            ]
        );
    }

    #[test]
    fn status_bands_ignore_real_weights() {
        let mut progress = model();
        progress.set_step_progress(Step::VehicleDetails, 100);
        progress.set_step_progress(Step::DriverDetails, 100);
        progress.set_step_progress(Step::CoverageOptions, 100);

        // overall 75: the third band ends at 60, the fourth at 80
        assert_eq!(progress.overall_progress(), 75);
        assert_eq!(progress.step_status(Step::CoverageOptions), StepStatus::Completed);
        assert_eq!(progress.step_status(Step::QuoteSummary), StepStatus::Active);
        assert_eq!(progress.step_status(Step::Download), StepStatus::Pending);
    }

    #[test]
    fn everything_completed_at_one_hundred() {
        for step in Step::ALL {
            assert_eq!(step_status_for(step, 100), StepStatus::Completed);
        }
    }

    #[test]
    fn snapshot_reports_values_and_statuses() {
        let mut progress = model();
        progress.set_step_progress(Step::VehicleDetails, 100);

        let snapshot = progress.snapshot();

        assert_eq!(snapshot.overall, 25);
        assert_eq!(
            snapshot.steps[0],
            StepProgress {
                step: Step::VehicleDetails,
                progress: 100,
                status: StepStatus::Completed,
            }
        );
        assert_eq!(snapshot.steps[1].status, StepStatus::Active);
    }

    // =========================================================================
    // subscription tests
    // =========================================================================

    #[test]
    fn subscribers_see_updates_synchronously() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut progress = model();
        progress.on_progress_changed(move |event| sink.borrow_mut().push(*event));

        progress.set_step_progress(Step::VehicleDetails, 120);
        progress.reset();

        assert_eq!(
            *seen.borrow(),
            vec![
                ProgressEvent::StepUpdated {
                    step: Step::VehicleDetails,
                    progress: 100,
                    overall: 25,
                },
                ProgressEvent::Reset,
            ]
        );
    }

    #[test]
    fn unsubscribed_callback_is_not_called() {
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let mut progress = model();
        let id = progress.on_progress_changed(move |_| *counter.borrow_mut() += 1);

        progress.set_step_progress(Step::Download, 100);
        assert!(progress.unsubscribe(id));
        progress.set_step_progress(Step::Download, 0);

        assert_eq!(*calls.borrow(), 1);
        assert!(!progress.unsubscribe(id));
    }

    #[test]
    fn callbacks_run_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let first = Rc::clone(&order);
        let second = Rc::clone(&order);
        let mut progress = model();
        progress.on_progress_changed(move |_| first.borrow_mut().push("first"));
        progress.on_progress_changed(move |_| second.borrow_mut().push("second"));

        progress.reset();

        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }
}
