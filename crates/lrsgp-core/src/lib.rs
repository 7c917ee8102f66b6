//! LRS GP Core - Parameter model, feature sets and configuration
//!
//! This crate holds the value types exchanged with an ArcGIS linear referencing
//! geoprocessing service, their validation and wire serialization. It performs no I/O
//! beyond reading configuration files.

pub mod config;
pub mod error;
pub mod models;
pub mod query;

pub use config::GpClientOptions;
pub use error::{LrsError, Result};
pub use models::{
    EventTableProperties, FeatureSet, Geometry, GpParameters, LinearUnit, LinearUnitType,
};
