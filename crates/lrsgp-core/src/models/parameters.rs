//! Input parameters for the linear referencing geoprocessing tasks.
//!
//! Field names on the wire follow the service exactly, including the
//! colon-bearing environment overrides (`env:outSR`, `env:processSR`).
//! The in-memory struct uses ordinary snake_case names and [`GpParameters::wire_fields`]
//! maps them back at serialization time.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{LrsError, Result};
use crate::models::{FeatureSet, LinearUnit};
use crate::query;

/// Output format requested from the service. Always JSON.
pub const OUTPUT_FORMAT: &str = "json";

/// Route layer to locate against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteFeatures {
    /// `WAPR`
    Wapr,
    /// `WAPR with FT and TB`
    WaprWithFtAndTb,
}

impl RouteFeatures {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteFeatures::Wapr => "WAPR",
            RouteFeatures::WaprWithFtAndTb => "WAPR with FT and TB",
        }
    }
}

impl FromStr for RouteFeatures {
    type Err = LrsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "WAPR" => Ok(RouteFeatures::Wapr),
            "WAPR with FT and TB" => Ok(RouteFeatures::WaprWithFtAndTb),
            _ => Err(LrsError::invalid_value(
                "Route_Features",
                format!("'{}' is not valid; expected 'WAPR' or 'WAPR with FT and TB'", s),
            )),
        }
    }
}

/// Angle written to the angle field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AngleType {
    Normal,
    Tangent,
}

impl AngleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AngleType::Normal => "NORMAL",
            AngleType::Tangent => "TANGENT",
        }
    }
}

impl FromStr for AngleType {
    type Err = LrsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "NORMAL" => Ok(AngleType::Normal),
            "TANGENT" => Ok(AngleType::Tangent),
            _ => Err(LrsError::invalid_value(
                "Calculated_Angle_Type",
                format!("'{}' is not valid; expected 'NORMAL' or 'TANGENT'", s),
            )),
        }
    }
}

macro_rules! string_enum_serde {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

string_enum_serde!(RouteFeatures);
string_enum_serde!(AngleType);

/// Constructor options, keyed by the service's parameter names.
///
/// Untyped input (JSON) is deserialized into this struct. Keys outside the
/// known parameter set are rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GpParametersOptions {
    #[serde(rename = "Input_Features")]
    pub input_features: Option<FeatureSet>,
    #[serde(rename = "Route_Features")]
    pub route_features: Option<String>,
    #[serde(rename = "Search_Radius")]
    pub search_radius: Option<LinearUnit>,
    #[serde(rename = "Keep_only_the_closest_route_location")]
    pub keep_only_the_closest_route_location: Option<bool>,
    #[serde(rename = "Include_distance_field_on_output_table")]
    pub include_distance_field_on_output_table: Option<bool>,
    #[serde(rename = "Use_M_Direction_Offsetting")]
    pub use_m_direction_offsetting: Option<bool>,
    #[serde(rename = "Generate_an_angle_field")]
    pub generate_an_angle_field: Option<bool>,
    #[serde(rename = "Calculated_Angle_Type")]
    pub calculated_angle_type: Option<String>,
    #[serde(rename = "Write_the_complement_of_the_angle_to_the_angle_field")]
    pub write_the_complement_of_the_angle_to_the_angle_field: Option<bool>,
    /// Output format; only `json` is accepted
    #[serde(rename = "f")]
    pub format: Option<String>,
    #[serde(rename = "returnM")]
    pub return_m: Option<bool>,
    #[serde(rename = "returnZ")]
    pub return_z: Option<bool>,
    #[serde(rename = "env:outSR")]
    pub env_out_sr: Option<u32>,
    #[serde(rename = "env:processSR")]
    pub env_process_sr: Option<u32>,
}

/// Parameters for one geoprocessing call.
///
/// Unset (`None`) parameters are left out of the request and the service
/// applies its own defaults. `returnM` and `returnZ` default to `true`.
#[derive(Debug, Clone, PartialEq)]
pub struct GpParameters {
    /// Features to locate; must be set before execution
    pub input_features: Option<FeatureSet>,
    pub route_features: Option<RouteFeatures>,
    /// Distance to search around each input feature for a nearby route
    pub search_radius: Option<LinearUnit>,
    pub keep_only_the_closest_route_location: Option<bool>,
    pub include_distance_field_on_output_table: Option<bool>,
    pub use_m_direction_offsetting: Option<bool>,
    pub generate_an_angle_field: Option<bool>,
    pub calculated_angle_type: Option<AngleType>,
    pub write_the_complement_of_the_angle_to_the_angle_field: Option<bool>,
    pub return_m: Option<bool>,
    pub return_z: Option<bool>,
    /// Output spatial reference (WKID)
    pub env_out_sr: Option<u32>,
    /// Processing spatial reference (WKID); rarely needed
    pub env_process_sr: Option<u32>,
}

impl Default for GpParameters {
    fn default() -> Self {
        Self {
            input_features: None,
            route_features: None,
            search_radius: None,
            keep_only_the_closest_route_location: None,
            include_distance_field_on_output_table: None,
            use_m_direction_offsetting: None,
            generate_an_angle_field: None,
            calculated_angle_type: None,
            write_the_complement_of_the_angle_to_the_angle_field: None,
            return_m: Some(true),
            return_z: Some(true),
            env_out_sr: None,
            env_process_sr: None,
        }
    }
}

impl GpParameters {
    /// Build parameters from options, validating each supplied field
    pub fn new(options: GpParametersOptions) -> Result<Self> {
        if let Some(format) = options.format.as_deref() {
            if format != OUTPUT_FORMAT {
                return Err(LrsError::invalid_value(
                    "f",
                    format!("only '{}' output is supported, got '{}'", OUTPUT_FORMAT, format),
                ));
            }
        }

        let mut params = Self {
            input_features: options.input_features,
            search_radius: options.search_radius,
            keep_only_the_closest_route_location: options.keep_only_the_closest_route_location,
            include_distance_field_on_output_table: options.include_distance_field_on_output_table,
            use_m_direction_offsetting: options.use_m_direction_offsetting,
            generate_an_angle_field: options.generate_an_angle_field,
            write_the_complement_of_the_angle_to_the_angle_field: options
                .write_the_complement_of_the_angle_to_the_angle_field,
            env_out_sr: options.env_out_sr,
            env_process_sr: options.env_process_sr,
            ..Self::default()
        };
        params.set_route_features(options.route_features.as_deref())?;
        params.set_calculated_angle_type(options.calculated_angle_type.as_deref())?;
        if let Some(return_m) = options.return_m {
            params.return_m = Some(return_m);
        }
        if let Some(return_z) = options.return_z {
            params.return_z = Some(return_z);
        }
        Ok(params)
    }

    /// Parse a JSON options object keyed by wire names
    pub fn from_json(json: &str) -> Result<Self> {
        let options: GpParametersOptions = serde_json::from_str(json)
            .map_err(|e| LrsError::invalid_value("options", e.to_string()))?;
        Self::new(options)
    }

    /// Default parameters for the given input features
    pub fn with_input(input_features: FeatureSet) -> Self {
        Self {
            input_features: Some(input_features),
            ..Self::default()
        }
    }

    /// Set `Route_Features` from its string form; `None` clears it
    pub fn set_route_features(&mut self, value: Option<&str>) -> Result<()> {
        self.route_features = value.map(RouteFeatures::from_str).transpose()?;
        Ok(())
    }

    /// Set `Calculated_Angle_Type` from its string form; `None` clears it
    pub fn set_calculated_angle_type(&mut self, value: Option<&str>) -> Result<()> {
        self.calculated_angle_type = value.map(AngleType::from_str).transpose()?;
        Ok(())
    }

    /// Output format, always `json`
    pub fn f(&self) -> &'static str {
        OUTPUT_FORMAT
    }

    /// Every parameter under its wire name, in request order. Unset fields are null.
    pub fn wire_fields(&self) -> Result<Vec<(&'static str, Value)>> {
        fn opt<T: Serialize>(value: &Option<T>) -> Result<Value> {
            Ok(serde_json::to_value(value)?)
        }

        Ok(vec![
            ("Input_Features", opt(&self.input_features)?),
            ("Route_Features", opt(&self.route_features)?),
            ("Search_Radius", opt(&self.search_radius)?),
            (
                "Keep_only_the_closest_route_location",
                opt(&self.keep_only_the_closest_route_location)?,
            ),
            (
                "Include_distance_field_on_output_table",
                opt(&self.include_distance_field_on_output_table)?,
            ),
            ("Use_M_Direction_Offsetting", opt(&self.use_m_direction_offsetting)?),
            ("Generate_an_angle_field", opt(&self.generate_an_angle_field)?),
            ("Calculated_Angle_Type", opt(&self.calculated_angle_type)?),
            (
                "Write_the_complement_of_the_angle_to_the_angle_field",
                opt(&self.write_the_complement_of_the_angle_to_the_angle_field)?,
            ),
            ("f", Value::from(OUTPUT_FORMAT)),
            ("returnM", opt(&self.return_m)?),
            ("returnZ", opt(&self.return_z)?),
            ("env:outSR", opt(&self.env_out_sr)?),
            ("env:processSR", opt(&self.env_process_sr)?),
        ])
    }

    /// JSON object string holding only the fields that are set
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// URL query string of the fields that are set
    pub fn to_url_search(&self) -> Result<String> {
        let fields = self.wire_fields()?;
        Ok(query::to_url_search(fields.iter().map(|(name, value)| (*name, value)), true))
    }
}

impl Serialize for GpParameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let fields = self.wire_fields().map_err(serde::ser::Error::custom)?;
        let present: Vec<_> = fields.iter().filter(|(_, value)| !value.is_null()).collect();

        let mut map = serializer.serialize_map(Some(present.len()))?;
        for (name, value) in present {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{create_feature_set, Geometry, LinearUnitType, SpatialReference};
    use proptest::prelude::*;
    use serde_json::json;

    fn sample_features() -> FeatureSet {
        create_feature_set(
            vec![Geometry::point(1034134.19, 609157.13), Geometry::point(1034204.33, 609281.18)],
            Some(SpatialReference::from_wkid(2927)),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults_serialize_to_constants_only() {
        let params = GpParameters::default();
        let value: Value = serde_json::from_str(&params.to_json().unwrap()).unwrap();
        assert_eq!(value, json!({"f": "json", "returnM": true, "returnZ": true}));
    }

    #[test]
    fn test_route_features_validation() {
        let options = GpParametersOptions {
            route_features: Some("bogus".to_string()),
            ..Default::default()
        };
        let err = GpParameters::new(options).unwrap_err();
        assert!(matches!(err, LrsError::InvalidValue { .. }));

        let options = GpParametersOptions {
            route_features: Some("WAPR with FT and TB".to_string()),
            ..Default::default()
        };
        let params = GpParameters::new(options).unwrap();
        assert_eq!(params.route_features, Some(RouteFeatures::WaprWithFtAndTb));
    }

    #[test]
    fn test_route_features_is_anchored() {
        let mut params = GpParameters::default();
        assert!(params.set_route_features(Some("xWAPR")).is_err());
        assert!(params.set_route_features(Some("WAPR with FT and TB and more")).is_err());
        params.set_route_features(Some("WAPR")).unwrap();
        params.set_route_features(None).unwrap();
        assert_eq!(params.route_features, None);
    }

    #[test]
    fn test_angle_type_validation() {
        let mut params = GpParameters::default();
        assert!(params.set_calculated_angle_type(Some("OBLIQUE")).is_err());
        assert!(params.set_calculated_angle_type(Some("normal")).is_err());
        params.set_calculated_angle_type(Some("TANGENT")).unwrap();
        assert_eq!(params.calculated_angle_type, Some(AngleType::Tangent));
    }

    #[test]
    fn test_from_json_uses_wire_names() {
        let params = GpParameters::from_json(
            r#"{
                "Route_Features": "WAPR",
                "Search_Radius": {"distance": 50, "units": "esriFeet"},
                "env:outSR": 3857,
                "returnZ": false,
                "f": "json"
            }"#,
        )
        .unwrap();

        assert_eq!(params.route_features, Some(RouteFeatures::Wapr));
        assert_eq!(params.search_radius, Some(LinearUnit::new(50.0, LinearUnitType::Feet).unwrap()));
        assert_eq!(params.env_out_sr, Some(3857));
        assert_eq!(params.return_m, Some(true));
        assert_eq!(params.return_z, Some(false));
    }

    #[test]
    fn test_from_json_rejects_unknown_keys() {
        let err = GpParameters::from_json(r#"{"Filter_Expression": "RouteID = '005'"}"#).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_from_json_rejects_bad_search_radius() {
        assert!(GpParameters::from_json(r#"{"Search_Radius": {"distance": -3}}"#).is_err());
        assert!(GpParameters::from_json(r#"{"Search_Radius": {"units": "esriParsecs"}}"#).is_err());
    }

    #[test]
    fn test_from_json_rejects_other_formats() {
        assert!(GpParameters::from_json(r#"{"f": "pjson"}"#).is_err());
    }

    #[test]
    fn test_to_json_includes_set_fields() {
        let mut params = GpParameters::with_input(sample_features());
        params.search_radius = Some(LinearUnit::new(10.0, LinearUnitType::Feet).unwrap());
        params.env_out_sr = Some(2927);

        let value: Value = serde_json::from_str(&params.to_json().unwrap()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 6);
        assert_eq!(object["Search_Radius"], json!({"distance": 10, "units": "esriFeet"}));
        assert_eq!(object["env:outSR"], json!(2927));
        assert_eq!(object["Input_Features"]["features"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_to_url_search() {
        let mut params = GpParameters::default();
        params.search_radius = Some(LinearUnit::new(10.0, LinearUnitType::Feet).unwrap());
        params.route_features = Some(RouteFeatures::WaprWithFtAndTb);
        params.env_out_sr = Some(3857);

        let search = params.to_url_search().unwrap();
        assert_eq!(
            search,
            "Route_Features=WAPR%20with%20FT%20and%20TB\
             &Search_Radius=%7B%22distance%22%3A10%2C%22units%22%3A%22esriFeet%22%7D\
             &f=json&returnM=true&returnZ=true&env%3AoutSR=3857"
        );
    }

    proptest! {
        #[test]
        fn prop_json_never_contains_nulls(
            keep in proptest::option::of(any::<bool>()),
            angle in proptest::option::of(any::<bool>()),
            out_sr in proptest::option::of(1000u32..100_000),
            return_m in proptest::option::of(any::<bool>()),
        ) {
            let mut params = GpParameters::default();
            params.keep_only_the_closest_route_location = keep;
            params.calculated_angle_type = angle.map(|t| if t { AngleType::Tangent } else { AngleType::Normal });
            params.env_out_sr = out_sr;
            params.return_m = return_m;

            let value: Value = serde_json::from_str(&params.to_json().unwrap()).unwrap();
            let object = value.as_object().unwrap();
            prop_assert!(object.values().all(|v| !v.is_null()));
            prop_assert_eq!(object.get("f").and_then(Value::as_str), Some("json"));
            prop_assert_eq!(object.contains_key("env:outSR"), out_sr.is_some());
            prop_assert_eq!(object.contains_key("returnM"), return_m.is_some());
        }
    }
}
