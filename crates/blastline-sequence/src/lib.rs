//! Blast Sequence Analysis
//!
//! Pure, deterministic analysis of a drill pattern and the timed connections
//! between its holes. Nothing here holds state: identical inputs always give
//! identical outputs, so every function can be tested on fixtures alone.
//!
//! # Pipeline
//!
//! 1. [`normalize_connections`] back-fills missing endpoint markers
//! 2. [`Timeline::build`] derives markers, duration and step count
//! 3. [`validate`] reports unsafe or incomplete sequences
//! 4. [`calculate_metrics`] summarizes efficiency and safety
//!
//! # Delay Semantics
//!
//! A connection's `delay` is treated as an absolute offset from the start of
//! the blast. [`ChainSchedule`] offers the cumulative reading (delays summed
//! along the connection graph) as a separate analysis.
//!
//! # Degenerate Inputs
//!
//! Empty connection lists, missing patterns and patterns without holes all
//! produce explicit zero/default results, never errors.

mod metrics;
mod normalize;
mod propagation;
mod timeline;
mod validation;

pub use metrics::calculate_metrics;
pub use normalize::{endpoint_markers, normalize_connections, ENDPOINT_OFFSET};
pub use propagation::ChainSchedule;
pub use timeline::{timeline_markers, total_duration, Timeline, TIMELINE_TAIL_MS};
pub use validation::{
    validate, validate_with, ValidationOptions, OVERLAP_THRESHOLD, SUGGESTION_BUFFER_MS,
    SUGGESTION_THRESHOLD_MS,
};

use std::collections::BTreeMap;

use blastline_model::BlastConnection;

/// Group connections by exact delay, ascending.
pub(crate) fn group_by_delay(connections: &[BlastConnection]) -> BTreeMap<u32, Vec<&BlastConnection>> {
    let mut groups: BTreeMap<u32, Vec<&BlastConnection>> = BTreeMap::new();
    for conn in connections {
        groups.entry(conn.delay).or_default().push(conn);
    }
    groups
}

/// Largest delay across connections, if any.
pub(crate) fn max_delay(connections: &[BlastConnection]) -> Option<u32> {
    connections.iter().map(|c| c.delay).max()
}
