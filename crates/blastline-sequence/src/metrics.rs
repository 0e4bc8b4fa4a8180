//! Summary metrics of a blast sequence.

use std::collections::HashSet;

use blastline_model::{BlastConnection, PatternData, SimulationMetrics};

use crate::group_by_delay;

/// Tail added to the last delay for terminal effects.
const METRICS_TAIL_MS: u64 = 1000;

/// Score points lost per simultaneous detonation.
const SAFETY_PENALTY_PER_HOLE: f64 = 10.0;

/// Compute metrics for a sequence.
///
/// Without a pattern or without connections nothing detonates: every field
/// is zero except the safety score, which is maximal.
pub fn calculate_metrics(
    pattern: Option<&PatternData>,
    connections: &[BlastConnection],
) -> SimulationMetrics {
    let Some(pattern) = pattern else {
        return SimulationMetrics::empty();
    };
    if connections.is_empty() {
        return SimulationMetrics::empty();
    }

    let mut delays: Vec<u32> = connections.iter().map(|c| c.delay).collect();
    delays.sort_unstable();

    let first = u64::from(delays[0]);
    let last = u64::from(delays[delays.len() - 1]);
    let total_blast_time = last + METRICS_TAIL_MS;

    // Mean gap across the full ordered sample, duplicates included.
    let average_delay_between_holes = if delays.len() > 1 {
        ((last - first) as f64 / (delays.len() - 1) as f64).round() as u64
    } else {
        0
    };

    let max_simultaneous_detonations = group_by_delay(connections)
        .values()
        .map(Vec::len)
        .max()
        .unwrap_or(0);

    let efficiency_score = (100.0 - total_blast_time as f64 / 100.0).max(0.0).round() as u32;
    let safety_score = (100.0 - max_simultaneous_detonations as f64 * SAFETY_PENALTY_PER_HOLE)
        .max(0.0)
        .round() as u32;

    let connection_utilization = if pattern.is_empty() {
        0
    } else {
        let connected: HashSet<&str> = connections
            .iter()
            .flat_map(|c| [c.from_hole_id.as_str(), c.to_hole_id.as_str()])
            .collect();
        let touched = pattern
            .drill_points
            .iter()
            .filter(|h| connected.contains(h.id.as_str()))
            .count();
        (touched as f64 / pattern.hole_count() as f64 * 100.0).round() as u32
    };

    SimulationMetrics {
        total_blast_time,
        average_delay_between_holes,
        max_simultaneous_detonations,
        efficiency_score,
        safety_score,
        connection_utilization,
    }
}
