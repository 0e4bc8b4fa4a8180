//! Sequence validation.
//!
//! Checks run in a fixed order and each contributes at most one finding per
//! defect group:
//!
//! 1. timing overlap (more than [`OVERLAP_THRESHOLD`] connections on one delay)
//! 2. orphaned holes (pattern holes no connection touches)
//! 3. unknown holes (connection ends missing from the pattern)
//! 4. total-time suggestion (past [`SUGGESTION_THRESHOLD_MS`])
//!
//! By default every finding is a warning or suggestion and the report stays
//! valid. Strict mode promotes orphaned and unknown holes to errors.

use std::collections::HashSet;

use blastline_model::{
    BlastConnection, ErrorKind, OptimizationSuggestion, PatternData, Severity, SuggestionKind,
    ValidationError, ValidationReport, ValidationWarning, WarningKind,
};

use crate::{group_by_delay, max_delay};

/// Connections sharing one delay before the group counts as unsafe.
pub const OVERLAP_THRESHOLD: usize = 5;

/// Total blast time above which a reduction is suggested.
pub const SUGGESTION_THRESHOLD_MS: u64 = 5000;

/// Buffer added to the last delay when estimating total blast time.
pub const SUGGESTION_BUFFER_MS: u64 = 100;

/// Blast time a tightened sequence is assumed to reach.
const SUGGESTION_TARGET_MS: u64 = 3000;

/// Knobs for [`validate_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationOptions {
    /// Report orphaned and unknown holes as errors instead of warnings
    pub strict: bool,
}

/// Validate with default options.
pub fn validate(pattern: Option<&PatternData>, connections: &[BlastConnection]) -> ValidationReport {
    validate_with(pattern, connections, ValidationOptions::default())
}

/// Validate a sequence against its pattern.
///
/// Without a pattern or without connections there is nothing to violate and
/// the report is clean.
pub fn validate_with(
    pattern: Option<&PatternData>,
    connections: &[BlastConnection],
    options: ValidationOptions,
) -> ValidationReport {
    let Some(pattern) = pattern else {
        return ValidationReport::clean();
    };
    if connections.is_empty() {
        return ValidationReport::clean();
    }

    let mut warnings = timing_overlaps(connections);
    let mut errors = Vec::new();

    let orphans = orphaned_holes(pattern, connections);
    if !orphans.is_empty() {
        let message = format!(
            "{} holes are not connected to the blast sequence",
            orphans.len()
        );
        if options.strict {
            errors.push(ValidationError {
                kind: ErrorKind::OrphanedHoles,
                message,
                affected_holes: orphans,
            });
        } else {
            warnings.push(ValidationWarning {
                kind: WarningKind::ConnectionMissing,
                message,
                affected_holes: orphans,
                severity: Severity::Medium,
            });
        }
    }

    let unknown = unknown_holes(pattern, connections);
    if !unknown.is_empty() {
        let message = format!(
            "{} connected holes do not exist in the pattern",
            unknown.len()
        );
        if options.strict {
            errors.push(ValidationError {
                kind: ErrorKind::UnknownHole,
                message,
                affected_holes: unknown,
            });
        } else {
            warnings.push(ValidationWarning {
                kind: WarningKind::UnknownHole,
                message,
                affected_holes: unknown,
                severity: Severity::Medium,
            });
        }
    }

    let suggestions = optimization_suggestions(connections);

    tracing::debug!(
        warnings = warnings.len(),
        errors = errors.len(),
        suggestions = suggestions.len(),
        "sequence validated"
    );

    ValidationReport::from_findings(warnings, errors, suggestions)
}

fn timing_overlaps(connections: &[BlastConnection]) -> Vec<ValidationWarning> {
    group_by_delay(connections)
        .into_iter()
        .filter(|(_, group)| group.len() > OVERLAP_THRESHOLD)
        .map(|(delay, group)| ValidationWarning {
            kind: WarningKind::TimingOverlap,
            message: format!(
                "{} holes are set to detonate simultaneously at {}ms",
                group.len(),
                delay
            ),
            affected_holes: group
                .iter()
                .flat_map(|c| [c.from_hole_id.clone(), c.to_hole_id.clone()])
                .collect(),
            severity: Severity::High,
        })
        .collect()
}

/// Pattern holes referenced by no connection, in pattern order.
fn orphaned_holes(pattern: &PatternData, connections: &[BlastConnection]) -> Vec<String> {
    let connected: HashSet<&str> = connections
        .iter()
        .flat_map(|c| [c.from_hole_id.as_str(), c.to_hole_id.as_str()])
        .collect();

    pattern
        .drill_points
        .iter()
        .filter(|h| !connected.contains(h.id.as_str()))
        .map(|h| h.id.clone())
        .collect()
}

/// Connection ends missing from the pattern, in first-reference order.
fn unknown_holes(pattern: &PatternData, connections: &[BlastConnection]) -> Vec<String> {
    let known: HashSet<&str> = pattern.drill_points.iter().map(|h| h.id.as_str()).collect();
    let mut seen = HashSet::new();

    connections
        .iter()
        .flat_map(|c| [c.from_hole_id.as_str(), c.to_hole_id.as_str()])
        .filter(|id| !known.contains(id) && seen.insert(*id))
        .map(str::to_string)
        .collect()
}

fn optimization_suggestions(connections: &[BlastConnection]) -> Vec<OptimizationSuggestion> {
    let Some(max) = max_delay(connections) else {
        return Vec::new();
    };
    let total = u64::from(max) + SUGGESTION_BUFFER_MS;
    if total <= SUGGESTION_THRESHOLD_MS {
        return Vec::new();
    }

    // Seconds, one decimal.
    let saving = ((total - SUGGESTION_TARGET_MS) as f64 / 100.0).round() / 10.0;

    vec![OptimizationSuggestion {
        kind: SuggestionKind::ReduceTotalTime,
        message: "Consider reducing delay times to improve blast efficiency".to_string(),
        potential_improvement: format!("Could reduce total blast time by {}s", saving),
        implementation_hint: "Review delay values and optimize sequence timing".to_string(),
    }]
}
