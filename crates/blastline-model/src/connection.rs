//! Timed connections between drill holes.

use serde::{Deserialize, Serialize};

/// Physical connector linking two holes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorType {
    /// Detonating cord run between holes
    #[default]
    DetonatingCord,
    /// Surface delay connectors
    Connectors,
}

/// Detonator family, carried in exported snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetonatorType {
    Electric,
    NonElectric,
    Electronic,
}

/// Endpoint marker anchoring the drawn path of a connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionPoint {
    pub id: String,
    /// "1" for the start marker, "2" for the end marker
    pub label: String,
    pub x: f64,
    pub y: f64,
    /// Hidden from normal rendering
    pub is_hidden: bool,
}

/// A directional, timed link between two drill holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlastConnection {
    pub id: String,
    pub from_hole_id: String,
    pub to_hole_id: String,
    #[serde(default)]
    pub connector_type: ConnectorType,
    /// Delay in milliseconds at which the far-end hole is detonated
    pub delay: u32,
    #[serde(default)]
    pub sequence: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_point: Option<ConnectionPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_point: Option<ConnectionPoint>,
    /// The `from` hole initiates the whole sequence
    #[serde(default)]
    pub is_starting_hole: bool,
}

impl BlastConnection {
    /// Create a detonating-cord connection without endpoint markers.
    pub fn new(
        id: impl Into<String>,
        from_hole_id: impl Into<String>,
        to_hole_id: impl Into<String>,
        delay: u32,
    ) -> Self {
        Self {
            id: id.into(),
            from_hole_id: from_hole_id.into(),
            to_hole_id: to_hole_id.into(),
            connector_type: ConnectorType::default(),
            delay,
            sequence: 0,
            start_point: None,
            end_point: None,
            is_starting_hole: false,
        }
    }

    /// Whether both endpoint markers are present.
    pub fn has_endpoints(&self) -> bool {
        self.start_point.is_some() && self.end_point.is_some()
    }

    /// Whether the connection references `hole_id` at either end.
    pub fn touches(&self, hole_id: &str) -> bool {
        self.from_hole_id == hole_id || self.to_hole_id == hole_id
    }
}
