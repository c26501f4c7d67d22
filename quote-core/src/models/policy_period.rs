use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Duration of cover in months.
///
/// The wizard offers 6, 12 and 24 months. Other month counts can still
/// arrive from persisted or imported data and are kept as
/// [`PolicyPeriod::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PolicyPeriod {
    SixMonths,
    #[default]
    TwelveMonths,
    TwentyFourMonths,
    Other(u32),
}

impl PolicyPeriod {
    pub const OFFERED: [PolicyPeriod; 3] = [
        PolicyPeriod::SixMonths,
        PolicyPeriod::TwelveMonths,
        PolicyPeriod::TwentyFourMonths,
    ];

    pub fn from_months(months: u32) -> Self {
        match months {
            6 => Self::SixMonths,
            12 => Self::TwelveMonths,
            24 => Self::TwentyFourMonths,
            other => Self::Other(other),
        }
    }

    pub fn months(&self) -> u32 {
        match self {
            Self::SixMonths => 6,
            Self::TwelveMonths => 12,
            Self::TwentyFourMonths => 24,
            Self::Other(months) => *months,
        }
    }

    pub fn label(&self) -> String {
        format!("{} Months", self.months())
    }

    /// Badge shown next to the period in the selector. Purely cosmetic:
    /// the real pricing effect comes from the period multiplier.
    pub fn discount_badge(&self) -> &'static str {
        match self.months() {
            6 => "5%",
            24 => "10%",
            _ => "0%",
        }
    }
}

impl fmt::Display for PolicyPeriod {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.months())
    }
}

impl Serialize for PolicyPeriod {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.months())
    }
}

impl<'de> Deserialize<'de> for PolicyPeriod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_months(u32::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn from_months_maps_offered_values() {
        assert_eq!(PolicyPeriod::from_months(6), PolicyPeriod::SixMonths);
        assert_eq!(PolicyPeriod::from_months(12), PolicyPeriod::TwelveMonths);
        assert_eq!(PolicyPeriod::from_months(24), PolicyPeriod::TwentyFourMonths);
    }

    #[test]
    fn from_months_keeps_other_values() {
        let period = PolicyPeriod::from_months(18);

        assert_eq!(period, PolicyPeriod::Other(18));
        assert_eq!(period.months(), 18);
        assert_eq!(period.label(), "18 Months");
    }

    #[test]
    fn discount_badge_follows_month_count() {
        assert_eq!(PolicyPeriod::SixMonths.discount_badge(), "5%");
        assert_eq!(PolicyPeriod::Other(6).discount_badge(), "5%");
        assert_eq!(PolicyPeriod::Other(24).discount_badge(), "10%");
        assert_eq!(PolicyPeriod::Other(18).discount_badge(), "0%");
    }

    #[test]
    fn serializes_as_month_count() {
        let json = serde_json::to_string(&PolicyPeriod::TwentyFourMonths).unwrap();

        assert_eq!(json, "24");
    }
}
