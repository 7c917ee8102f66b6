//! Naming convention for an LRS event table.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{LrsError, Result};

/// Kind of route event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventType {
    #[default]
    Point,
    Line,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Point => "POINT",
            EventType::Line => "LINE",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = LrsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "POINT" => Ok(EventType::Point),
            "LINE" => Ok(EventType::Line),
            _ => Err(LrsError::invalid_value(
                "eventType",
                format!("'{}' is not valid; only 'POINT' and 'LINE' are allowed", s),
            )),
        }
    }
}

/// Field names describing a route event table.
///
/// The measure field defaults depend on the event type and are applied once,
/// when the value is constructed. Changing the event type later leaves the
/// measure fields as they are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTableProperties {
    /// Field in the route layer that uniquely identifies a route
    pub route_id_field: String,
    event_type: EventType,
    pub from_measure_field: String,
    /// Only written out for line events
    pub to_measure_field: Option<String>,
}

impl Default for EventTableProperties {
    fn default() -> Self {
        Self::with_event_type(EventType::Point)
    }
}

impl EventTableProperties {
    /// Create properties from optional parts, applying event-type defaults.
    ///
    /// Empty strings count as absent.
    pub fn new(
        route_id_field: Option<&str>,
        event_type: Option<&str>,
        from_measure_field: Option<&str>,
        to_measure_field: Option<&str>,
    ) -> Result<Self> {
        let event_type = match event_type.filter(|s| !s.is_empty()) {
            Some(s) => s.parse()?,
            None => EventType::default(),
        };

        let mut properties = Self::with_event_type(event_type);
        if let Some(route_id_field) = route_id_field.filter(|s| !s.is_empty()) {
            properties.route_id_field = route_id_field.to_string();
        }
        if let Some(from) = from_measure_field.filter(|s| !s.is_empty()) {
            properties.from_measure_field = from.to_string();
        }
        if let Some(to) = to_measure_field.filter(|s| !s.is_empty()) {
            properties.to_measure_field = Some(to.to_string());
        }
        Ok(properties)
    }

    /// Default field names for the given event type
    pub fn with_event_type(event_type: EventType) -> Self {
        let (from, to) = match event_type {
            EventType::Point => ("MEAS", None),
            EventType::Line => ("FMEAS", Some("TMEAS".to_string())),
        };
        Self {
            route_id_field: "RID".to_string(),
            event_type,
            from_measure_field: from.to_string(),
            to_measure_field: to,
        }
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    /// Set the event type from its string form (`POINT` or `LINE`, case-sensitive)
    pub fn set_event_type(&mut self, event_type: &str) -> Result<()> {
        self.event_type = event_type.parse()?;
        Ok(())
    }
}

impl fmt::Display for EventTableProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.route_id_field, self.event_type, self.from_measure_field)?;
        if self.event_type == EventType::Line {
            if let Some(to) = &self.to_measure_field {
                write!(f, " {}", to)?;
            }
        }
        Ok(())
    }
}

// The JSON form is the space-joined string, not an object.
impl Serialize for EventTableProperties {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
