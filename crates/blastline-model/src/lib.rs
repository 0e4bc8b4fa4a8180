//! Blastline Domain Model
//!
//! The vocabulary shared by every Blastline component: drill holes, timed
//! connections between them, and the simulation records derived from both.
//!
//! # Ownership
//!
//! Patterns and connections are authored elsewhere and handed to the engine
//! as read-mostly input. Everything in [`simulation`] and [`report`] is
//! derived by the engine and recomputed, never patched in place.
//!
//! # Wire Format
//!
//! All records serialize with camelCase field names so snapshots exchange
//! cleanly with the front end that authors them.

mod connection;
mod pattern;
mod report;
mod simulation;
mod workflow;

pub use connection::{BlastConnection, ConnectionPoint, ConnectorType, DetonatorType};
pub use pattern::{DrillPoint, PatternData, PatternSettings};
pub use report::{
    ErrorKind, MarkerKind, OptimizationSuggestion, Severity, SimulationMetrics, SuggestionKind,
    TimelineMarker, ValidationError, ValidationReport, ValidationWarning, WarningKind,
};
pub use simulation::{
    AnimationQuality, SettingsOutOfRange, SimulationSettings, SimulationState, MAX_EFFECT_INTENSITY,
};
pub use workflow::{WorkflowProgress, WorkflowStep, WorkflowStepStatus};
