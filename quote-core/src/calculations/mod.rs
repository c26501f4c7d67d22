//! Quote calculations.
//!
//! This module provides the premium calculation and the weighted progress
//! model that drives the wizard's progress bar and step indicator.

pub mod common;
pub mod premium;
pub mod progress;

pub use premium::{PremiumCalculator, PremiumConfig, PremiumConfigError, PremiumResult};
pub use progress::{
    PROGRESS_KEY_PREFIX, ProgressEvent, ProgressModel, ProgressSnapshot, StepProgress,
    SubscriptionId, overall_from, progress_key, step_status_for,
};
