//! Derived records: validation reports, metrics and timeline markers.

use serde::{Deserialize, Serialize};

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Category of a validation warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Too many connections share one delay
    TimingOverlap,
    /// Pattern holes referenced by no connection
    ConnectionMissing,
    /// Connections reference holes the pattern does not contain
    UnknownHole,
}

/// Category of a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    OrphanedHoles,
    UnknownHole,
}

/// Category of an optimization suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    ReduceTotalTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationWarning {
    #[serde(rename = "type")]
    pub kind: WarningKind,
    pub message: String,
    pub affected_holes: Vec<String>,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub message: String,
    pub affected_holes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationSuggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub message: String,
    pub potential_improvement: String,
    pub implementation_hint: String,
}

/// Outcome of validating a sequence. Recomputed on every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// True iff `errors` is empty
    pub is_valid: bool,
    pub warnings: Vec<ValidationWarning>,
    pub errors: Vec<ValidationError>,
    pub suggestions: Vec<OptimizationSuggestion>,
}

impl ValidationReport {
    /// A valid report with no findings.
    pub fn clean() -> Self {
        Self {
            is_valid: true,
            warnings: Vec::new(),
            errors: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Assemble a report, deriving `is_valid` from the error list.
    pub fn from_findings(
        warnings: Vec<ValidationWarning>,
        errors: Vec<ValidationError>,
        suggestions: Vec<OptimizationSuggestion>,
    ) -> Self {
        Self {
            is_valid: errors.is_empty(),
            warnings,
            errors,
            suggestions,
        }
    }

    /// Warnings of one kind.
    pub fn warnings_of(&self, kind: WarningKind) -> impl Iterator<Item = &ValidationWarning> {
        self.warnings.iter().filter(move |w| w.kind == kind)
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::clean()
    }
}

/// Summary statistics of a sequence, rounded to whole numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationMetrics {
    /// Milliseconds
    pub total_blast_time: u64,
    /// Milliseconds
    pub average_delay_between_holes: u64,
    pub max_simultaneous_detonations: usize,
    /// 0 - 100, higher is faster
    pub efficiency_score: u32,
    /// 0 - 100, higher is safer
    pub safety_score: u32,
    /// Percentage of pattern holes touched by a connection
    pub connection_utilization: u32,
}

impl SimulationMetrics {
    /// Metrics of a sequence with nothing to detonate.
    pub const fn empty() -> Self {
        Self {
            total_blast_time: 0,
            average_delay_between_holes: 0,
            max_simultaneous_detonations: 0,
            efficiency_score: 0,
            safety_score: 100,
            connection_utilization: 0,
        }
    }
}

impl Default for SimulationMetrics {
    fn default() -> Self {
        Self::empty()
    }
}

/// Category of a timeline marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    SequenceStart,
    HoleBlast,
    SequenceEnd,
}

/// A labeled instant on the simulation timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineMarker {
    /// Milliseconds from start
    pub time: u64,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: MarkerKind,
    pub color: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_follows_errors() {
        let report = ValidationReport::from_findings(vec![], vec![], vec![]);
        assert!(report.is_valid);

        let report = ValidationReport::from_findings(
            vec![],
            vec![ValidationError {
                kind: ErrorKind::OrphanedHoles,
                message: "1 holes".into(),
                affected_holes: vec!["H3".into()],
            }],
            vec![],
        );
        assert!(!report.is_valid);
    }

    #[test]
    fn empty_metrics_are_safe() {
        let metrics = SimulationMetrics::empty();
        assert_eq!(metrics.safety_score, 100);
        assert_eq!(metrics.total_blast_time, 0);
        assert_eq!(metrics.efficiency_score, 0);
    }
}
