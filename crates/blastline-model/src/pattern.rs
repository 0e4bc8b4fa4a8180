//! Drill patterns: positioned holes and the spacing they were laid out with.

use serde::{Deserialize, Serialize};

/// A positioned blast hole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillPoint {
    /// Hole identifier, e.g. "DH12"
    pub id: String,
    /// Pattern-local x coordinate
    pub x: f64,
    /// Pattern-local y coordinate
    pub y: f64,
    /// Hole depth
    #[serde(default)]
    pub depth: f64,
    /// Spacing active when the hole was placed
    #[serde(default)]
    pub spacing: f64,
    /// Burden active when the hole was placed
    #[serde(default)]
    pub burden: f64,
}

impl DrillPoint {
    /// Create a hole at `(x, y)` with zero depth, spacing and burden.
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            depth: 0.0,
            spacing: 0.0,
            burden: 0.0,
        }
    }
}

/// Layout parameters of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternSettings {
    pub spacing: f64,
    pub burden: f64,
    pub depth: f64,
}

impl Default for PatternSettings {
    fn default() -> Self {
        Self {
            spacing: 3.0,
            burden: 2.5,
            depth: 10.0,
        }
    }
}

/// A drill pattern as supplied by the pattern authoring side.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternData {
    pub drill_points: Vec<DrillPoint>,
    #[serde(default)]
    pub settings: PatternSettings,
}

impl PatternData {
    /// Create a pattern from holes with default settings.
    pub fn new(drill_points: Vec<DrillPoint>) -> Self {
        Self {
            drill_points,
            settings: PatternSettings::default(),
        }
    }

    /// Look up a hole by id.
    pub fn hole(&self, id: &str) -> Option<&DrillPoint> {
        self.drill_points.iter().find(|p| p.id == id)
    }

    /// Number of holes in the pattern.
    pub fn hole_count(&self) -> usize {
        self.drill_points.len()
    }

    /// Whether the pattern has no holes.
    pub fn is_empty(&self) -> bool {
        self.drill_points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hole_lookup() {
        let pattern = PatternData::new(vec![
            DrillPoint::new("DH1", 0.0, 0.0),
            DrillPoint::new("DH2", 3.0, 0.0),
        ]);

        assert_eq!(pattern.hole_count(), 2);
        assert_eq!(pattern.hole("DH2").map(|h| h.x), Some(3.0));
        assert!(pattern.hole("DH9").is_none());
    }

    #[test]
    fn settings_default_when_missing() {
        let json = r#"{ "drillPoints": [ { "id": "A", "x": 1.0, "y": 2.0 } ] }"#;
        let pattern: PatternData = serde_json::from_str(json).unwrap();

        assert_eq!(pattern.settings, PatternSettings::default());
        assert_eq!(pattern.drill_points[0].depth, 0.0);
    }
}
