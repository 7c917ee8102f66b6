pub mod event_table;
pub mod feature_set;
pub mod linear_unit;
pub mod parameters;
pub mod service;

pub use event_table::{EventTableProperties, EventType};
pub use feature_set::{
    create_feature_set, feature_set_geometry_type, Envelope, Feature, FeatureSet, Geometry,
    GeometryType, Multipoint, Point, Polygon, Polyline, SpatialReference,
};
pub use linear_unit::{LinearUnit, LinearUnitType};
pub use parameters::{AngleType, GpParameters, GpParametersOptions, RouteFeatures, OUTPUT_FORMAT};
pub use service::{GpExecuteResponse, GpResultParameter, GpServiceError};
