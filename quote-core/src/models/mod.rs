mod coverage_option;
mod driver_details;
mod policy_period;
mod quote_inputs;
mod quote_record;
mod step;
mod vehicle_details;
mod vehicle_type;

pub use coverage_option::{CoverageOption, find_coverage, standard_catalog};
pub use driver_details::DriverDetails;
pub use policy_period::PolicyPeriod;
pub use quote_inputs::{DEFAULT_EXCESS_AMOUNT, QuoteInputs};
pub use quote_record::{CoverageSelection, QuoteReference, QuoteSummary};
pub use step::{Step, StepStatus};
pub use vehicle_details::VehicleDetails;
pub use vehicle_type::VehicleType;
