//! Export record handed to persistence and reporting.

use blastline_model::{BlastConnection, DetonatorType, PatternData};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SessionContext;
use crate::Result;

/// Export format version.
pub const EXPORT_VERSION: &str = "1.0";

/// A detonator placed in a hole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetonatorInfo {
    pub id: String,
    pub hole_id: String,
    #[serde(rename = "type")]
    pub detonator_type: DetonatorType,
    pub delay: u32,
    pub sequence: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    /// RFC 3339 timestamp
    pub exported_at: String,
    pub version: String,
    /// Largest connection delay in ms, 0 without connections
    pub total_sequence_time: u32,
    pub project_id: String,
    pub site_id: String,
}

/// Complete snapshot of a blast sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlastSequenceData {
    pub pattern_data: PatternData,
    pub connections: Vec<BlastConnection>,
    /// Not derived from connections yet; always empty.
    pub detonators: Vec<DetonatorInfo>,
    pub metadata: ExportMetadata,
}

impl BlastSequenceData {
    /// Assemble an export stamped with `exported_at`.
    pub fn assemble(
        pattern: &PatternData,
        connections: &[BlastConnection],
        context: &SessionContext,
        exported_at: DateTime<Utc>,
    ) -> Self {
        let total_sequence_time = connections.iter().map(|c| c.delay).max().unwrap_or(0);

        Self {
            pattern_data: pattern.clone(),
            connections: connections.to_vec(),
            detonators: Vec::new(),
            metadata: ExportMetadata {
                exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                version: EXPORT_VERSION.to_string(),
                total_sequence_time,
                project_id: context.project_id.clone(),
                site_id: context.site_id.clone(),
            },
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
