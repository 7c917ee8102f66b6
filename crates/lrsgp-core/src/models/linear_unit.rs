//! Linear unit: a distance paired with an Esri unit of measure.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{LrsError, Result};

/// Unit of measure accepted by the geoprocessing service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LinearUnitType {
    #[default]
    #[serde(rename = "esriFeet")]
    Feet,
    #[serde(rename = "esriCentimeters")]
    Centimeters,
    #[serde(rename = "esriDecimalDegrees")]
    DecimalDegrees,
    #[serde(rename = "esriDecimeters")]
    Decimeters,
    #[serde(rename = "esriInches")]
    Inches,
    #[serde(rename = "esriKilometers")]
    Kilometers,
    #[serde(rename = "esriMeters")]
    Meters,
    #[serde(rename = "esriMiles")]
    Miles,
    #[serde(rename = "esriMillimeters")]
    Millimeters,
    #[serde(rename = "esriNauticalMiles")]
    NauticalMiles,
    #[serde(rename = "esriPoints")]
    Points,
    #[serde(rename = "esriUnknown")]
    Unknown,
    #[serde(rename = "esriYards")]
    Yards,
}

impl LinearUnitType {
    /// Every recognized unit, in lookup-table order
    pub const ALL: [LinearUnitType; 13] = [
        LinearUnitType::Feet,
        LinearUnitType::Centimeters,
        LinearUnitType::DecimalDegrees,
        LinearUnitType::Decimeters,
        LinearUnitType::Inches,
        LinearUnitType::Kilometers,
        LinearUnitType::Meters,
        LinearUnitType::Miles,
        LinearUnitType::Millimeters,
        LinearUnitType::NauticalMiles,
        LinearUnitType::Points,
        LinearUnitType::Unknown,
        LinearUnitType::Yards,
    ];

    /// Wire token, e.g. `esriFeet`
    pub fn as_str(&self) -> &'static str {
        match self {
            LinearUnitType::Feet => "esriFeet",
            LinearUnitType::Centimeters => "esriCentimeters",
            LinearUnitType::DecimalDegrees => "esriDecimalDegrees",
            LinearUnitType::Decimeters => "esriDecimeters",
            LinearUnitType::Inches => "esriInches",
            LinearUnitType::Kilometers => "esriKilometers",
            LinearUnitType::Meters => "esriMeters",
            LinearUnitType::Miles => "esriMiles",
            LinearUnitType::Millimeters => "esriMillimeters",
            LinearUnitType::NauticalMiles => "esriNauticalMiles",
            LinearUnitType::Points => "esriPoints",
            LinearUnitType::Unknown => "esriUnknown",
            LinearUnitType::Yards => "esriYards",
        }
    }

    /// Name of the unit in the constant lookup table, e.g. `NAUTICAL_MILES`
    pub fn constant_name(&self) -> &'static str {
        match self {
            LinearUnitType::Feet => "FEET",
            LinearUnitType::Centimeters => "CENTIMETERS",
            LinearUnitType::DecimalDegrees => "DECIMAL_DEGREES",
            LinearUnitType::Decimeters => "DECIMETERS",
            LinearUnitType::Inches => "INCHES",
            LinearUnitType::Kilometers => "KILOMETERS",
            LinearUnitType::Meters => "METERS",
            LinearUnitType::Miles => "MILES",
            LinearUnitType::Millimeters => "MILLIMETERS",
            LinearUnitType::NauticalMiles => "NAUTICAL_MILES",
            LinearUnitType::Points => "POINTS",
            LinearUnitType::Unknown => "UNKNOWN",
            LinearUnitType::Yards => "YARDS",
        }
    }

    /// Whether this unit measures length (as opposed to degrees or the unknown sentinel)
    pub fn is_length(&self) -> bool {
        !matches!(self, LinearUnitType::DecimalDegrees | LinearUnitType::Unknown)
    }
}

impl fmt::Display for LinearUnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinearUnitType {
    type Err = LrsError;

    fn from_str(s: &str) -> Result<Self> {
        LinearUnitType::ALL
            .iter()
            .copied()
            .find(|unit| unit.as_str() == s)
            .ok_or_else(|| {
                LrsError::invalid_value("units", format!("'{}' is not a recognized unit", s))
            })
    }
}

/// A non-negative distance with its unit, used as a search tolerance.
///
/// Serializes as `{"distance": <number>, "units": "<esri token>"}`. Whole
/// distances are written as integers (`50`, not `50.0`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinearUnit {
    distance: f64,
    units: LinearUnitType,
}

impl LinearUnit {
    /// Create a validated linear unit
    pub fn new(distance: f64, units: LinearUnitType) -> Result<Self> {
        let mut unit = Self { distance: 0.0, units };
        unit.set_distance(distance)?;
        Ok(unit)
    }

    /// Create a linear unit from a distance and a unit token such as `esriMeters`
    pub fn parse(distance: f64, units: &str) -> Result<Self> {
        Self::new(distance, units.parse()?)
    }

    /// Build from an untyped JSON object with optional `distance` and `units` keys.
    ///
    /// Missing keys keep the defaults (0 feet).
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| LrsError::invalid_type("Search_Radius", "object"))?;

        let mut unit = Self::default();
        if let Some(distance) = object.get("distance").filter(|v| !v.is_null()) {
            let distance =
                distance.as_f64().ok_or_else(|| LrsError::invalid_type("distance", "number"))?;
            unit.set_distance(distance)?;
        }
        if let Some(units) = object.get("units").filter(|v| !v.is_null()) {
            let units = units.as_str().ok_or_else(|| LrsError::invalid_type("units", "string"))?;
            unit.set_units_str(units)?;
        }
        Ok(unit)
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn units(&self) -> LinearUnitType {
        self.units
    }

    /// Set the distance; it must be finite and not less than zero
    pub fn set_distance(&mut self, distance: f64) -> Result<()> {
        if !distance.is_finite() {
            return Err(LrsError::invalid_value("distance", "must be a finite number"));
        }
        if distance < 0.0 {
            return Err(LrsError::invalid_value("distance", "must not be less than 0"));
        }
        self.distance = distance;
        Ok(())
    }

    pub fn set_units(&mut self, units: LinearUnitType) {
        self.units = units;
    }

    pub fn set_units_str(&mut self, units: &str) -> Result<()> {
        self.units = units.parse()?;
        Ok(())
    }
}

/// Largest float below which every whole number is exactly representable
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

impl Serialize for LinearUnit {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("LinearUnit", 2)?;
        if self.distance.fract() == 0.0 && self.distance < MAX_EXACT_INTEGER {
            state.serialize_field("distance", &(self.distance as u64))?;
        } else {
            state.serialize_field("distance", &self.distance)?;
        }
        state.serialize_field("units", &self.units)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for LinearUnit {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        LinearUnit::from_value(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let unit = LinearUnit::default();
        assert_eq!(unit.distance(), 0.0);
        assert_eq!(unit.units(), LinearUnitType::Feet);
    }

    #[test]
    fn test_parse_unit_tokens() {
        assert_eq!("esriMeters".parse::<LinearUnitType>().unwrap(), LinearUnitType::Meters);
        assert_eq!(
            "esriNauticalMiles".parse::<LinearUnitType>().unwrap(),
            LinearUnitType::NauticalMiles
        );
        assert!("meters".parse::<LinearUnitType>().is_err());
        assert!("esriFurlongs".parse::<LinearUnitType>().is_err());
        assert!("ESRIFEET".parse::<LinearUnitType>().is_err());
    }

    #[test]
    fn test_lookup_table() {
        assert_eq!(LinearUnitType::ALL.len(), 13);
        assert_eq!(LinearUnitType::DecimalDegrees.constant_name(), "DECIMAL_DEGREES");
        assert!(LinearUnitType::Yards.is_length());
        assert!(!LinearUnitType::DecimalDegrees.is_length());
        assert!(!LinearUnitType::Unknown.is_length());
    }

    #[test]
    fn test_negative_distance_rejected() {
        let err = LinearUnit::new(-1.0, LinearUnitType::Feet).unwrap_err();
        assert!(matches!(err, LrsError::InvalidValue { .. }));
    }

    #[test]
    fn test_non_finite_distance_rejected() {
        assert!(LinearUnit::new(f64::NAN, LinearUnitType::Feet).is_err());
        assert!(LinearUnit::new(f64::INFINITY, LinearUnitType::Feet).is_err());
    }

    #[test]
    fn test_failed_set_keeps_previous_value() {
        let mut unit = LinearUnit::new(50.0, LinearUnitType::Feet).unwrap();
        assert!(unit.set_distance(-5.0).is_err());
        assert!(unit.set_units_str("bogus").is_err());
        assert_eq!(unit.distance(), 50.0);
        assert_eq!(unit.units(), LinearUnitType::Feet);
    }

    #[test]
    fn test_from_value_copies_fields() {
        let unit = LinearUnit::from_value(&json!({"distance": 25, "units": "esriMeters"})).unwrap();
        assert_eq!(unit.distance(), 25.0);
        assert_eq!(unit.units(), LinearUnitType::Meters);

        let partial = LinearUnit::from_value(&json!({"distance": 3.5})).unwrap();
        assert_eq!(partial.units(), LinearUnitType::Feet);
    }

    #[test]
    fn test_from_value_type_errors() {
        let err = LinearUnit::from_value(&json!({"distance": "ten"})).unwrap_err();
        assert!(matches!(err, LrsError::InvalidType { .. }));

        let err = LinearUnit::from_value(&json!({"units": 7})).unwrap_err();
        assert!(matches!(err, LrsError::InvalidType { .. }));

        let err = LinearUnit::from_value(&json!(10)).unwrap_err();
        assert!(matches!(err, LrsError::InvalidType { .. }));
    }

    #[test]
    fn test_wire_format() {
        let unit = LinearUnit::new(10.0, LinearUnitType::Feet).unwrap();
        let value = serde_json::to_value(unit).unwrap();
        assert_eq!(value, json!({"distance": 10, "units": "esriFeet"}));

        let back: LinearUnit = serde_json::from_value(value).unwrap();
        assert_eq!(back, unit);
    }

    #[test]
    fn test_whole_distances_serialize_as_integers() {
        let whole = LinearUnit::new(50.0, LinearUnitType::Meters).unwrap();
        assert_eq!(
            serde_json::to_string(&whole).unwrap(),
            r#"{"distance":50,"units":"esriMeters"}"#
        );

        let fractional = LinearUnit::new(2.5, LinearUnitType::Meters).unwrap();
        assert_eq!(
            serde_json::to_string(&fractional).unwrap(),
            r#"{"distance":2.5,"units":"esriMeters"}"#
        );

        let zero = LinearUnit::default();
        assert_eq!(serde_json::to_string(&zero).unwrap(), r#"{"distance":0,"units":"esriFeet"}"#);
    }

    proptest! {
        #[test]
        fn prop_every_unit_accepts_zero(index in 0usize..13) {
            let token = LinearUnitType::ALL[index].as_str();
            prop_assert!(LinearUnit::parse(0.0, token).is_ok());
        }

        #[test]
        fn prop_negative_distance_is_value_error(distance in f64::MIN..-f64::EPSILON) {
            let err = LinearUnit::parse(distance, "esriFeet").unwrap_err();
            prop_assert!(matches!(err, LrsError::InvalidValue { .. }), "unexpected error kind");
        }

        #[test]
        fn prop_non_numeric_distance_is_type_error(text in "[a-z]{1,8}") {
            let err = LinearUnit::from_value(&json!({"distance": text, "units": "esriFeet"}))
                .unwrap_err();
            prop_assert!(matches!(err, LrsError::InvalidType { .. }), "unexpected error kind");
        }
    }
}
