//! Pattern → sequence → simulate workflow progress.
//!
//! Completion flags are derived from the session data and cannot be set
//! directly. Only the step the user is looking at is a free choice.

use serde::{Deserialize, Serialize};

/// A step of the blast design workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    #[default]
    Pattern,
    Sequence,
    Simulate,
}

impl WorkflowStep {
    /// All steps in workflow order.
    pub const ALL: [Self; 3] = [Self::Pattern, Self::Sequence, Self::Simulate];

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowStep::Pattern => "Create Pattern",
            WorkflowStep::Sequence => "Design Sequence",
            WorkflowStep::Simulate => "Simulate & Validate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStepStatus {
    pub step: WorkflowStep,
    pub name: String,
    pub completed: bool,
    pub current: bool,
    pub enabled: bool,
}

/// Status of every workflow step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowProgress {
    pub steps: Vec<WorkflowStepStatus>,
}

impl WorkflowProgress {
    /// Derive progress from what the session currently holds.
    ///
    /// - pattern complete ⇔ a pattern is present
    /// - sequence complete ⇔ at least one connection exists
    /// - simulate complete ⇔ playback reached the end of the current data
    pub fn derive(
        has_pattern: bool,
        has_connections: bool,
        simulated: bool,
        current: WorkflowStep,
    ) -> Self {
        let steps = WorkflowStep::ALL
            .iter()
            .map(|&step| {
                let (completed, enabled) = match step {
                    WorkflowStep::Pattern => (has_pattern, true),
                    WorkflowStep::Sequence => (has_connections, has_pattern),
                    WorkflowStep::Simulate => {
                        (has_connections && simulated, has_pattern && has_connections)
                    }
                };
                WorkflowStepStatus {
                    step,
                    name: step.name().to_string(),
                    completed,
                    current: step == current,
                    enabled,
                }
            })
            .collect();
        Self { steps }
    }

    /// Status of one step.
    pub fn status(&self, step: WorkflowStep) -> Option<&WorkflowStepStatus> {
        self.steps.iter().find(|s| s.step == step)
    }

    /// Whether a step is completed.
    pub fn is_completed(&self, step: WorkflowStep) -> bool {
        self.status(step).is_some_and(|s| s.completed)
    }

    /// Whether a step is enabled.
    pub fn is_enabled(&self, step: WorkflowStep) -> bool {
        self.status(step).is_some_and(|s| s.enabled)
    }
}

impl Default for WorkflowProgress {
    fn default() -> Self {
        Self::derive(false, false, false, WorkflowStep::Pattern)
    }
}
