//! Ephemeral per-user flow session state.
//!
//! Exactly one flow may be active per user. Each flow gets its own tagged
//! variant with named steps instead of bare step indices, so transitions
//! are exhaustiveness-checked and a check-in step can never be confused
//! with a grounding step.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// The guided exercises a user can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowKind {
    CheckIn,
    Breathing,
    Grounding,
    Planning,
    TriggerLog,
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowKind::CheckIn => write!(f, "check-in"),
            FlowKind::Breathing => write!(f, "breathing"),
            FlowKind::Grounding => write!(f, "grounding"),
            FlowKind::Planning => write!(f, "planning"),
            FlowKind::TriggerLog => write!(f, "trigger-log"),
        }
    }
}

impl FromStr for FlowKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "check-in" => Ok(FlowKind::CheckIn),
            "breathing" => Ok(FlowKind::Breathing),
            "grounding" => Ok(FlowKind::Grounding),
            "planning" => Ok(FlowKind::Planning),
            "trigger-log" => Ok(FlowKind::TriggerLog),
            other => Err(format!("invalid flow kind: '{other}'")),
        }
    }
}

/// Named steps of the daily check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckInStep {
    Stress,
    Triggers,
    Sleep,
    Goal,
}

/// Answers accumulated while a check-in is in progress.
///
/// Nothing here is persisted until the final step completes; an abandoned
/// or overwritten draft simply disappears with the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckInDraft {
    pub stress: Option<f64>,
    pub triggers: Option<String>,
    pub sleep_hours: Option<f64>,
}

/// The state of a user's currently active flow.
///
/// Grounding captures the prompt language once at flow start; `index` counts
/// prompts already sent. Planning accumulates items until the completion
/// token arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "flow", rename_all = "kebab-case")]
pub enum FlowState {
    CheckIn { step: CheckInStep, draft: CheckInDraft },
    Breathing,
    Grounding { lang: String, index: usize },
    Planning { items: Vec<String> },
    TriggerLog,
}

impl FlowState {
    /// Which flow this state belongs to.
    pub fn kind(&self) -> FlowKind {
        match self {
            FlowState::CheckIn { .. } => FlowKind::CheckIn,
            FlowState::Breathing => FlowKind::Breathing,
            FlowState::Grounding { .. } => FlowKind::Grounding,
            FlowState::Planning { .. } => FlowKind::Planning,
            FlowState::TriggerLog => FlowKind::TriggerLog,
        }
    }
}
