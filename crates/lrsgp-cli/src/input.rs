//! Loading locate input files

use anyhow::{bail, Context, Result};
use lrsgp_core::models::{
    create_feature_set, feature_set_geometry_type, FeatureSet, Geometry, SpatialReference,
};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Read an input file as a feature set
pub fn read_input(path: &Path, wkid: Option<u32>) -> Result<FeatureSet> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    parse_input(&content, wkid).with_context(|| format!("Invalid input file {}", path.display()))
}

/// Parse either a FeatureSet object or an array of geometries.
///
/// `wkid` is applied when the input does not carry a spatial reference of its own.
pub fn parse_input(content: &str, wkid: Option<u32>) -> Result<FeatureSet> {
    let value: Value = serde_json::from_str(content).context("Input is not valid JSON")?;
    let spatial_reference = wkid.map(SpatialReference::from_wkid);

    match value {
        Value::Array(_) => {
            let geometries: Vec<Geometry> =
                serde_json::from_value(value).context("Input array must contain Esri geometries")?;
            let mut feature_set = create_feature_set(geometries, None)?;
            if feature_set.spatial_reference.is_none() {
                feature_set.spatial_reference = spatial_reference;
            }
            Ok(feature_set)
        }
        Value::Object(_) => {
            let mut feature_set: FeatureSet =
                serde_json::from_value(value).context("Input object is not a FeatureSet")?;
            if feature_set.is_empty() {
                bail!("Input feature set has no features");
            }
            if feature_set.geometry_type.is_none() {
                feature_set.geometry_type = Some(feature_set_geometry_type(&feature_set)?);
            }
            if feature_set.spatial_reference.is_none() {
                feature_set.spatial_reference = spatial_reference;
            }
            Ok(feature_set)
        }
        _ => bail!("Input must be a FeatureSet object or an array of geometries"),
    }
}
