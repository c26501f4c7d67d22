use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Vehicle classification chosen on the vehicle details form.
///
/// Values the wizard does not offer are kept verbatim in
/// [`VehicleType::Unrecognized`] rather than rejected, since pricing falls
/// back to a default multiplier for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VehicleType {
    PrivateCar,
    CommercialVehicle,
    Motorcycle,
    Truck,
    Bus,
    Trailer,
    Tractor,
    SpecialPurpose,
    Unrecognized(String),
}

impl VehicleType {
    /// The vehicle types offered on the form, in display order.
    pub const OFFERED: [VehicleType; 8] = [
        VehicleType::PrivateCar,
        VehicleType::CommercialVehicle,
        VehicleType::Motorcycle,
        VehicleType::Truck,
        VehicleType::Bus,
        VehicleType::Trailer,
        VehicleType::Tractor,
        VehicleType::SpecialPurpose,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::PrivateCar => "private_car",
            Self::CommercialVehicle => "commercial_vehicle",
            Self::Motorcycle => "motorcycle",
            Self::Truck => "truck",
            Self::Bus => "bus",
            Self::Trailer => "trailer",
            Self::Tractor => "tractor",
            Self::SpecialPurpose => "special_purpose",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Never fails: unknown identifiers become [`VehicleType::Unrecognized`].
    pub fn parse(s: &str) -> Self {
        match s {
            "private_car" => Self::PrivateCar,
            "commercial_vehicle" => Self::CommercialVehicle,
            "motorcycle" => Self::Motorcycle,
            "truck" => Self::Truck,
            "bus" => Self::Bus,
            "trailer" => Self::Trailer,
            "tractor" => Self::Tractor,
            "special_purpose" => Self::SpecialPurpose,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Human-readable label; unrecognized types display their raw value.
    pub fn label(&self) -> &str {
        match self {
            Self::PrivateCar => "Private Car (Class A)",
            Self::CommercialVehicle => "Commercial Vehicle (Class B)",
            Self::Motorcycle => "Motorcycle (Class C)",
            Self::Truck => "Truck (Class D)",
            Self::Bus => "Bus (Class E)",
            Self::Trailer => "Trailer (Class F)",
            Self::Tractor => "Tractor (Class G)",
            Self::SpecialPurpose => "Special Purpose Vehicle (Class H)",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for VehicleType {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for VehicleType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_round_trips_offered_types() {
        for vehicle in VehicleType::OFFERED {
            assert_eq!(VehicleType::parse(vehicle.as_str()), vehicle);
        }
    }

    #[test]
    fn parse_keeps_unknown_values() {
        let parsed = VehicleType::parse("hovercraft");

        assert_eq!(parsed, VehicleType::Unrecognized("hovercraft".to_string()));
        assert_eq!(parsed.label(), "hovercraft");
    }

    #[test]
    fn deserializes_from_plain_string() {
        let parsed: VehicleType = serde_json::from_str("\"truck\"").unwrap();

        assert_eq!(parsed, VehicleType::Truck);
    }
}
