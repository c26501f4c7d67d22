use std::sync::OnceLock;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// A selectable protection package with a fixed base premium.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageOption {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Annual premium for a private car before any adjustment.
    pub base_premium: Decimal,
    pub features: Vec<String>,
    #[serde(default)]
    pub recommended: bool,
}

impl CoverageOption {
    fn new(
        id: &str,
        name: &str,
        description: &str,
        base_premium: Decimal,
        features: &[&str],
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            base_premium,
            features: features.iter().map(|f| f.to_string()).collect(),
            recommended: false,
        }
    }

    fn recommended(mut self) -> Self {
        self.recommended = true;
        self
    }
}

static STANDARD_CATALOG: OnceLock<Vec<CoverageOption>> = OnceLock::new();

/// The five coverage packages offered by the wizard.
///
/// Built on first use and shared for the life of the process.
pub fn standard_catalog() -> &'static [CoverageOption] {
    STANDARD_CATALOG.get_or_init(build_standard_catalog)
}

/// Looks up a coverage option by id.
pub fn find_coverage<'a>(
    catalog: &'a [CoverageOption],
    id: &str,
) -> Option<&'a CoverageOption> {
    catalog.iter().find(|c| c.id == id)
}

fn build_standard_catalog() -> Vec<CoverageOption> {
    vec![
        CoverageOption::new(
            "comprehensive",
            "Comprehensive Coverage",
            "Complete protection for your vehicle including own damage, third-party liability, and additional benefits",
            dec!(15000),
            &[
                "Damage to your vehicle (own damage)",
                "Third-party liability coverage",
                "Medical expenses for all parties",
                "Personal accident cover",
                "24/7 roadside assistance",
                "Windscreen and glass cover",
                "Natural disaster protection",
            ],
        )
        .recommended(),
        CoverageOption::new(
            "third_party_fire_theft",
            "Third Party, Fire & Theft",
            "Essential coverage for third-party liability plus protection against fire and theft",
            dec!(8000),
            &[
                "Third-party liability coverage",
                "Fire damage protection",
                "Theft and attempted theft",
                "Medical expenses",
                "Legal defense costs",
            ],
        ),
        CoverageOption::new(
            "third_party_only",
            "Third Party Only",
            "Basic coverage meeting legal requirements for third-party liability",
            dec!(5000),
            &[
                "Third-party liability coverage",
                "Medical expenses for third parties",
                "Legal defense costs",
                "Property damage to third parties",
            ],
        ),
        CoverageOption::new(
            "personal_accident",
            "Personal Accident Cover",
            "Additional protection for driver and passengers in case of accidents",
            dec!(2000),
            &[
                "Driver personal accident coverage",
                "Passenger personal accident",
                "Medical expenses for occupants",
                "Disability benefits",
                "Death benefits",
            ],
        ),
        CoverageOption::new(
            "roadside_assistance",
            "Roadside Assistance",
            "24/7 emergency roadside assistance and towing services",
            dec!(1500),
            &[
                "24/7 roadside assistance",
                "Emergency towing services",
                "Battery jump-start",
                "Fuel delivery service",
                "Flat tire assistance",
                "Lockout service",
                "Emergency accommodation",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn standard_catalog_has_five_entries_with_base_premiums() {
        let premiums: Vec<(&str, Decimal)> = standard_catalog()
            .iter()
            .map(|c| (c.id.as_str(), c.base_premium))
            .collect();

        assert_eq!(
            premiums,
            vec![
                ("comprehensive", dec!(15000)),
                ("third_party_fire_theft", dec!(8000)),
                ("third_party_only", dec!(5000)),
                ("personal_accident", dec!(2000)),
                ("roadside_assistance", dec!(1500)),
            ]
        );
    }

    #[test]
    fn only_comprehensive_is_recommended() {
        let recommended: Vec<&str> = standard_catalog()
            .iter()
            .filter(|c| c.recommended)
            .map(|c| c.id.as_str())
            .collect();

        assert_eq!(recommended, vec!["comprehensive"]);
    }

    #[test]
    fn standard_catalog_is_built_once() {
        assert!(std::ptr::eq(standard_catalog(), standard_catalog()));
    }

    #[test]
    fn find_coverage_returns_none_for_unknown_id() {
        assert!(find_coverage(standard_catalog(), "gap_insurance").is_none());
        assert_eq!(
            find_coverage(standard_catalog(), "third_party_only").map(|c| c.base_premium),
            Some(dec!(5000))
        );
    }
}
