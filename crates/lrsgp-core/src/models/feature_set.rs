//! Esri JSON feature sets, as sent in `Input_Features` and returned by the service.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{LrsError, Result};

/// Coordinate system identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SpatialReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wkid: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_wkid: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wkt: Option<String>,
    /// Vertical coordinate system and other keys, kept verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SpatialReference {
    pub fn from_wkid(wkid: u32) -> Self {
        Self {
            wkid: Some(wkid),
            ..Self::default()
        }
    }
}

impl From<u32> for SpatialReference {
    fn from(wkid: u32) -> Self {
        Self::from_wkid(wkid)
    }
}

/// Esri geometry type names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryType {
    #[serde(rename = "esriGeometryPoint")]
    Point,
    #[serde(rename = "esriGeometryMultipoint")]
    Multipoint,
    #[serde(rename = "esriGeometryPolyline")]
    Polyline,
    #[serde(rename = "esriGeometryPolygon")]
    Polygon,
    #[serde(rename = "esriGeometryEnvelope")]
    Envelope,
}

impl GeometryType {
    /// Prefixed name, e.g. `esriGeometryPolyline`
    pub fn esri_name(&self) -> &'static str {
        match self {
            GeometryType::Point => "esriGeometryPoint",
            GeometryType::Multipoint => "esriGeometryMultipoint",
            GeometryType::Polyline => "esriGeometryPolyline",
            GeometryType::Polygon => "esriGeometryPolygon",
            GeometryType::Envelope => "esriGeometryEnvelope",
        }
    }

    /// Unprefixed name, e.g. `polyline`
    pub fn unprefixed_name(&self) -> &'static str {
        match self {
            GeometryType::Point => "point",
            GeometryType::Multipoint => "multipoint",
            GeometryType::Polyline => "polyline",
            GeometryType::Polygon => "polygon",
            GeometryType::Envelope => "envelope",
        }
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.esri_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spatial_reference: Option<SpatialReference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Multipoint {
    pub points: Vec<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_z: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_m: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spatial_reference: Option<SpatialReference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Polyline {
    pub paths: Vec<Vec<Vec<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_z: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_m: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spatial_reference: Option<SpatialReference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Polygon {
    pub rings: Vec<Vec<Vec<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_z: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_m: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spatial_reference: Option<SpatialReference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spatial_reference: Option<SpatialReference>,
}

/// Geometry that fits none of the typed shapes: empty geometries
/// (`{"x": null}`), vertices with a null M or Z, true curves.
///
/// Members are kept verbatim so service output round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGeometry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial_reference: Option<SpatialReference>,
    #[serde(flatten)]
    pub members: serde_json::Map<String, serde_json::Value>,
}

impl RawGeometry {
    /// Geometry type guessed from the member names
    pub fn geometry_type(&self) -> Option<GeometryType> {
        let has = |key: &str| self.members.contains_key(key);
        if has("x") {
            Some(GeometryType::Point)
        } else if has("points") {
            Some(GeometryType::Multipoint)
        } else if has("paths") || has("curvePaths") {
            Some(GeometryType::Polyline)
        } else if has("rings") || has("curveRings") {
            Some(GeometryType::Polygon)
        } else if has("xmin") {
            Some(GeometryType::Envelope)
        } else {
            None
        }
    }
}

/// Esri JSON geometry. The variant is recognized from the object's keys;
/// anything the typed shapes reject lands in [`Geometry::Raw`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Geometry {
    Point(Point),
    Multipoint(Multipoint),
    Polyline(Polyline),
    Polygon(Polygon),
    Envelope(Envelope),
    Raw(RawGeometry),
}

impl Geometry {
    pub fn point(x: f64, y: f64) -> Self {
        Geometry::Point(Point {
            x,
            y,
            z: None,
            m: None,
            spatial_reference: None,
        })
    }

    pub fn polyline(paths: Vec<Vec<Vec<f64>>>) -> Self {
        Geometry::Polyline(Polyline {
            paths,
            has_z: None,
            has_m: None,
            spatial_reference: None,
        })
    }

    /// `None` only for a raw geometry with no recognizable members
    pub fn geometry_type(&self) -> Option<GeometryType> {
        match self {
            Geometry::Point(_) => Some(GeometryType::Point),
            Geometry::Multipoint(_) => Some(GeometryType::Multipoint),
            Geometry::Polyline(_) => Some(GeometryType::Polyline),
            Geometry::Polygon(_) => Some(GeometryType::Polygon),
            Geometry::Envelope(_) => Some(GeometryType::Envelope),
            Geometry::Raw(g) => g.geometry_type(),
        }
    }

    pub fn spatial_reference(&self) -> Option<&SpatialReference> {
        self.spatial_reference_slot().as_ref()
    }

    /// Attach a spatial reference to the geometry
    pub fn with_spatial_reference(mut self, spatial_reference: impl Into<SpatialReference>) -> Self {
        *self.spatial_reference_slot_mut() = Some(spatial_reference.into());
        self
    }

    /// Remove and return the geometry's own spatial reference
    pub fn take_spatial_reference(&mut self) -> Option<SpatialReference> {
        self.spatial_reference_slot_mut().take()
    }

    fn spatial_reference_slot(&self) -> &Option<SpatialReference> {
        match self {
            Geometry::Point(g) => &g.spatial_reference,
            Geometry::Multipoint(g) => &g.spatial_reference,
            Geometry::Polyline(g) => &g.spatial_reference,
            Geometry::Polygon(g) => &g.spatial_reference,
            Geometry::Envelope(g) => &g.spatial_reference,
            Geometry::Raw(g) => &g.spatial_reference,
        }
    }

    fn spatial_reference_slot_mut(&mut self) -> &mut Option<SpatialReference> {
        match self {
            Geometry::Point(g) => &mut g.spatial_reference,
            Geometry::Multipoint(g) => &mut g.spatial_reference,
            Geometry::Polyline(g) => &mut g.spatial_reference,
            Geometry::Polygon(g) => &mut g.spatial_reference,
            Geometry::Envelope(g) => &mut g.spatial_reference,
            Geometry::Raw(g) => &mut g.spatial_reference,
        }
    }
}

/// A geometry with optional attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Feature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
}

impl Feature {
    pub fn from_geometry(geometry: Geometry) -> Self {
        Self {
            attributes: None,
            geometry: Some(geometry),
        }
    }

    /// Look up a single attribute value
    pub fn attribute(&self, name: &str) -> Option<&serde_json::Value> {
        self.attributes.as_ref().and_then(|attributes| attributes.get(name))
    }
}

/// A geometry-type-tagged list of features sharing one spatial reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry_type: Option<GeometryType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial_reference: Option<SpatialReference>,

    #[serde(default)]
    pub features: Vec<Feature>,

    /// Any other keys the service returns (`fields`, `displayFieldName`, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FeatureSet {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Build a feature set from bare geometries.
///
/// The geometry type comes from the first geometry. The explicit spatial
/// reference wins over the first geometry's own; per-geometry spatial
/// references are removed from the features.
pub fn create_feature_set(
    geometries: Vec<Geometry>,
    spatial_reference: Option<SpatialReference>,
) -> Result<FeatureSet> {
    let first = geometries
        .first()
        .ok_or_else(|| LrsError::invalid_value("geometries", "array has no elements"))?;

    let geometry_type = first
        .geometry_type()
        .ok_or_else(|| LrsError::invalid_value("geometries", "unable to determine geometry type"))?;
    let spatial_reference = spatial_reference.or_else(|| first.spatial_reference().cloned());

    let features = geometries
        .into_iter()
        .map(|mut geometry| {
            geometry.take_spatial_reference();
            Feature::from_geometry(geometry)
        })
        .collect();

    Ok(FeatureSet {
        geometry_type: Some(geometry_type),
        spatial_reference,
        features,
        extra: serde_json::Map::new(),
    })
}

/// Geometry type of a feature set: the declared type, else the first feature's.
pub fn feature_set_geometry_type(feature_set: &FeatureSet) -> Result<GeometryType> {
    if let Some(geometry_type) = feature_set.geometry_type {
        return Ok(geometry_type);
    }

    feature_set
        .features
        .first()
        .and_then(|feature| feature.geometry.as_ref())
        .and_then(Geometry::geometry_type)
        .ok_or_else(|| {
            LrsError::invalid_value("Input_Features", "unable to determine geometry type")
        })
}
