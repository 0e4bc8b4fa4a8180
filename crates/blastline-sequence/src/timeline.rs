//! Detonation timeline: ordered markers and the overall simulation length.

use blastline_model::{BlastConnection, MarkerKind, TimelineMarker};

use crate::{group_by_delay, max_delay};

/// Tail appended after the last detonation for terminal effects.
pub const TIMELINE_TAIL_MS: u64 = 2000;

const START_COLOR: &str = "#4CAF50";
const BLAST_COLOR: &str = "#FF5722";
const END_COLOR: &str = "#2196F3";

/// Length of the simulation: last delay plus the terminal tail, or 0 when
/// there are no connections.
pub fn total_duration(connections: &[BlastConnection]) -> u64 {
    max_delay(connections)
        .map(|d| u64::from(d) + TIMELINE_TAIL_MS)
        .unwrap_or(0)
}

/// Build the ordered marker list.
///
/// One start marker at 0, one marker per distinct delay (ascending) and one
/// end marker at [`total_duration`].
pub fn timeline_markers(connections: &[BlastConnection]) -> Vec<TimelineMarker> {
    let groups = group_by_delay(connections);
    let mut markers = Vec::with_capacity(groups.len() + 2);

    markers.push(TimelineMarker {
        time: 0,
        label: "Blast Start".to_string(),
        kind: MarkerKind::SequenceStart,
        color: START_COLOR.to_string(),
    });

    for (index, (delay, conns)) in groups.iter().enumerate() {
        markers.push(TimelineMarker {
            time: u64::from(*delay),
            label: format!("Detonation {} ({} holes)", index + 1, conns.len()),
            kind: MarkerKind::HoleBlast,
            color: BLAST_COLOR.to_string(),
        });
    }

    markers.push(TimelineMarker {
        time: total_duration(connections),
        label: "Blast Complete".to_string(),
        kind: MarkerKind::SequenceEnd,
        color: END_COLOR.to_string(),
    });

    markers
}

/// Everything the timeline view needs, derived in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    pub markers: Vec<TimelineMarker>,
    /// Milliseconds
    pub total_duration: u64,
    /// One step per connection
    pub total_steps: usize,
}

impl Timeline {
    /// Derive the timeline of a connection set.
    pub fn build(connections: &[BlastConnection]) -> Self {
        Self {
            markers: timeline_markers(connections),
            total_duration: total_duration(connections),
            total_steps: connections.len(),
        }
    }
}
