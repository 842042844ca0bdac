//! Build event types for JSON output.
//!
//! These events are emitted one per line when using `--message-format=json`.
//!
//! # Event Types
//!
//! - `stage-started`: A delegated build-tool action began
//! - `stage-finished`: A delegated build-tool action succeeded
//! - `stage-skipped`: An optional stage was left out of the plan
//! - `stage-failed`: A delegated build-tool action failed
//! - `build-finished`: The recipe run completed (success or failure)
//!
//! # Stability
//!
//! New fields may be added, but existing fields should not be removed or renamed.

use serde::Serialize;

use crate::builder::plan::{BuildStage, SkipReason};

/// An event emitted while a build plan runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason")]
pub enum BuildEvent {
    /// An action began.
    #[serde(rename = "stage-started")]
    StageStarted {
        stage: BuildStage,
        /// Target name for target builds
        #[serde(skip_serializing_if = "Option::is_none")]
        target: Option<String>,
    },

    /// An action succeeded.
    #[serde(rename = "stage-finished")]
    StageFinished { stage: BuildStage, duration_ms: u64 },

    /// An optional stage is not part of the plan.
    #[serde(rename = "stage-skipped")]
    StageSkipped {
        stage: BuildStage,
        skip_reason: SkipReason,
    },

    /// An action failed. No later action runs.
    #[serde(rename = "stage-failed")]
    StageFailed { stage: BuildStage, message: String },

    /// The run completed.
    #[serde(rename = "build-finished")]
    BuildFinished {
        success: bool,
        duration_ms: u64,
        /// Stages reached, in order
        stages: Vec<BuildStage>,
    },
}

impl BuildEvent {
    /// Create a stage started event.
    pub fn started(stage: BuildStage, target: Option<&str>) -> Self {
        BuildEvent::StageStarted {
            stage,
            target: target.map(str::to_string),
        }
    }

    /// Create a build finished event.
    pub fn finished(success: bool, duration_ms: u64, stages: Vec<BuildStage>) -> Self {
        BuildEvent::BuildFinished {
            success,
            duration_ms,
            stages,
        }
    }

    /// Serialize this event to a JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
