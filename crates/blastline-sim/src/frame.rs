//! Animation frames: the visual state of a blast at one instant.

use std::collections::BTreeMap;

use blastline_model::{BlastConnection, PatternData, SimulationSettings};
use serde::{Deserialize, Serialize};

/// How long a hole or connection stays in its transitional state.
pub const DETONATION_WINDOW_MS: f64 = 100.0;

/// How long an explosion effect lasts.
pub const EFFECT_DURATION_MS: f64 = 1000.0;

/// Radius of an explosion effect in pattern units.
pub const EFFECT_RADIUS: f64 = 20.0;

/// Visual state of a drill hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoleVisualState {
    Ready,
    Detonating,
    Blasted,
}

/// Visual state of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionVisualState {
    Inactive,
    Propagating,
    Transmitted,
}

impl ConnectionVisualState {
    /// Whether the signal has reached this connection.
    pub fn is_active(&self) -> bool {
        !matches!(self, ConnectionVisualState::Inactive)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlastEffectType {
    Explosion,
}

/// A transient effect anchored on a hole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlastEffect {
    #[serde(rename = "type")]
    pub kind: BlastEffectType,
    pub hole_id: String,
    pub x: f64,
    pub y: f64,
    /// When the effect started, in ms
    pub start_time: f64,
    pub intensity: u8,
    pub radius: f64,
}

/// Snapshot of every hole and connection at `time`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationFrame {
    pub time: f64,
    pub holes: BTreeMap<String, HoleVisualState>,
    pub connections: BTreeMap<String, ConnectionVisualState>,
    pub effects: Vec<BlastEffect>,
}

impl AnimationFrame {
    /// Ids of connections the signal has reached.
    pub fn active_connections(&self) -> impl Iterator<Item = &str> {
        self.connections
            .iter()
            .filter(|(_, state)| state.is_active())
            .map(|(id, _)| id.as_str())
    }

    /// Holes no longer `Ready`.
    pub fn detonated_count(&self) -> usize {
        self.holes
            .values()
            .filter(|s| **s != HoleVisualState::Ready)
            .count()
    }
}

/// Detonation time of every hole a connection reaches.
///
/// A hole detonates at the smallest delay among connections ending on it.
/// The `from` hole of a starting connection detonates at 0.
pub fn detonation_times(connections: &[BlastConnection]) -> BTreeMap<&str, u32> {
    let mut times: BTreeMap<&str, u32> = BTreeMap::new();
    for conn in connections {
        let slot = times.entry(conn.to_hole_id.as_str()).or_insert(conn.delay);
        *slot = (*slot).min(conn.delay);
        if conn.is_starting_hole {
            times.insert(conn.from_hole_id.as_str(), 0);
        }
    }
    times
}

fn hole_state(time: f64, detonation: Option<u32>) -> HoleVisualState {
    match detonation.map(f64::from) {
        Some(d) if time >= d + DETONATION_WINDOW_MS => HoleVisualState::Blasted,
        Some(d) if time >= d => HoleVisualState::Detonating,
        _ => HoleVisualState::Ready,
    }
}

fn connection_state(time: f64, delay: u32) -> ConnectionVisualState {
    let d = f64::from(delay);
    if time < d {
        ConnectionVisualState::Inactive
    } else if time < d + DETONATION_WINDOW_MS {
        ConnectionVisualState::Propagating
    } else {
        ConnectionVisualState::Transmitted
    }
}

/// Build the frame at `time`.
///
/// Depends only on its arguments, so any time can be rendered without
/// replaying the ones before it.
pub fn generate_frame(
    time: f64,
    pattern: Option<&PatternData>,
    connections: &[BlastConnection],
    settings: &SimulationSettings,
) -> AnimationFrame {
    let detonations = detonation_times(connections);

    let mut holes = BTreeMap::new();
    for hole in pattern.into_iter().flat_map(|p| p.drill_points.iter()) {
        let state = hole_state(time, detonations.get(hole.id.as_str()).copied());
        holes.insert(hole.id.clone(), state);
    }
    for conn in connections {
        for id in [&conn.from_hole_id, &conn.to_hole_id] {
            if !holes.contains_key(id) {
                holes.insert(id.clone(), hole_state(time, detonations.get(id.as_str()).copied()));
            }
        }
    }

    let connections_state = connections
        .iter()
        .map(|c| (c.id.clone(), connection_state(time, c.delay)))
        .collect();

    let mut effects = Vec::new();
    if settings.show_effects {
        if let Some(pattern) = pattern {
            for (id, &d) in &detonations {
                let start = f64::from(d);
                if time < start || time >= start + EFFECT_DURATION_MS {
                    continue;
                }
                let Some(hole) = pattern.hole(id) else {
                    continue;
                };
                effects.push(BlastEffect {
                    kind: BlastEffectType::Explosion,
                    hole_id: hole.id.clone(),
                    x: hole.x,
                    y: hole.y,
                    start_time: start,
                    intensity: settings.effect_intensity,
                    radius: EFFECT_RADIUS,
                });
            }
        }
    }

    AnimationFrame {
        time,
        holes,
        connections: connections_state,
        effects,
    }
}
