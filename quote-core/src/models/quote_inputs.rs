use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{PolicyPeriod, VehicleType};

/// Excess amount the coverage form starts with.
pub const DEFAULT_EXCESS_AMOUNT: u32 = 5000;

/// Everything the premium calculation reads.
///
/// Coverage ids are kept in a set, so duplicates collapse and order does not
/// matter. `vehicle_type` is `None` when no vehicle details were captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteInputs {
    pub selected_coverages: BTreeSet<String>,
    pub vehicle_type: Option<VehicleType>,
    pub excess_amount: u32,
    pub policy_period: PolicyPeriod,
}

impl Default for QuoteInputs {
    fn default() -> Self {
        Self {
            selected_coverages: BTreeSet::new(),
            vehicle_type: None,
            excess_amount: DEFAULT_EXCESS_AMOUNT,
            policy_period: PolicyPeriod::TwelveMonths,
        }
    }
}

impl QuoteInputs {
    pub fn new<I, S>(
        coverages: I,
        vehicle_type: Option<VehicleType>,
        excess_amount: u32,
        policy_period: PolicyPeriod,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected_coverages: coverages.into_iter().map(Into::into).collect(),
            vehicle_type,
            excess_amount,
            policy_period,
        }
    }

    /// Adds the coverage if absent, removes it if present.
    /// Returns `true` when the coverage ends up selected.
    pub fn toggle_coverage(
        &mut self,
        id: &str,
    ) -> bool {
        if self.selected_coverages.remove(id) {
            false
        } else {
            self.selected_coverages.insert(id.to_string());
            true
        }
    }

    pub fn has_selection(&self) -> bool {
        !self.selected_coverages.is_empty()
    }
}
