use serde::{Deserialize, Deserializer, Serialize};

use super::VehicleType;
use crate::calculations::common::completion_percentage;

/// Vehicle details form, as persisted under the `vehicleDetails` key.
///
/// Text fields hold the raw form input; an empty string means "not filled".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VehicleDetails {
    #[serde(deserialize_with = "blank_as_none")]
    pub vehicle_type: Option<VehicleType>,
    pub make: String,
    pub model: String,
    pub year: String,
    pub engine_capacity: String,
    pub fuel_type: String,
    pub registration_number: String,
    pub estimated_value: String,
    pub usage: String,
    pub additional_info: String,
    pub registration_date: String,
}

impl Default for VehicleDetails {
    fn default() -> Self {
        Self {
            vehicle_type: None,
            make: String::new(),
            model: String::new(),
            year: String::new(),
            engine_capacity: String::new(),
            fuel_type: String::new(),
            registration_number: String::new(),
            estimated_value: String::new(),
            usage: "personal".to_string(),
            additional_info: String::new(),
            registration_date: String::new(),
        }
    }
}

/// The form starts with `vehicleType: ""`; an unpicked type is no type.
fn blank_as_none<'de, D: Deserializer<'de>>(
    deserializer: D
) -> Result<Option<VehicleType>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|v| !v.trim().is_empty())
        .map(|v| VehicleType::parse(&v)))
}

impl VehicleDetails {
    pub const REQUIRED_FIELDS: [&'static str; 5] =
        ["vehicleType", "make", "model", "year", "registrationNumber"];

    /// Labels of the required fields that are still empty, in form order.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let filled = [
            self.vehicle_type
                .as_ref()
                .is_some_and(|v| !v.as_str().trim().is_empty()),
            !self.make.trim().is_empty(),
            !self.model.trim().is_empty(),
            !self.year.trim().is_empty(),
            !self.registration_number.trim().is_empty(),
        ];
        let labels = ["Vehicle Type", "Make", "Model", "Year", "Registration Number"];

        labels
            .into_iter()
            .zip(filled)
            .filter(|(_, is_filled)| !is_filled)
            .map(|(label, _)| label)
            .collect()
    }

    /// Share of required fields filled in, as a 0-100 step progress value.
    pub fn completion(&self) -> u8 {
        let total = Self::REQUIRED_FIELDS.len();
        let missing = self.missing_required_fields().len();
        completion_percentage(total - missing, total)
    }

    pub fn is_complete(&self) -> bool {
        self.missing_required_fields().is_empty()
    }
}
