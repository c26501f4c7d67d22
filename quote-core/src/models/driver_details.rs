use serde::{Deserialize, Serialize};

use crate::calculations::common::completion_percentage;

/// Driver details form, as persisted under the `driverDetails` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DriverDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub license_number: String,
    pub license_type: String,
    pub license_issue_date: String,
    pub license_expiry_date: String,
    pub years_of_experience: String,
    pub claims_history: String,
    pub convictions: String,
    pub occupation: String,
    pub address: String,
}

impl Default for DriverDetails {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            date_of_birth: String::new(),
            license_number: String::new(),
            license_type: "full".to_string(),
            license_issue_date: String::new(),
            license_expiry_date: String::new(),
            years_of_experience: String::new(),
            claims_history: String::new(),
            convictions: String::new(),
            occupation: "employed".to_string(),
            address: String::new(),
        }
    }
}

impl DriverDetails {
    pub const REQUIRED_FIELDS: [&'static str; 6] = [
        "firstName",
        "lastName",
        "email",
        "phone",
        "licenseNumber",
        "licenseType",
    ];

    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        [
            ("First Name", &self.first_name),
            ("Last Name", &self.last_name),
            ("Email", &self.email),
            ("Phone Number", &self.phone),
            ("License Number", &self.license_number),
            ("License Type", &self.license_type),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| label)
        .collect()
    }

    pub fn completion(&self) -> u8 {
        let total = Self::REQUIRED_FIELDS.len();
        let missing = self.missing_required_fields().len();
        completion_percentage(total - missing, total)
    }

    pub fn is_complete(&self) -> bool {
        self.missing_required_fields().is_empty()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}
