//! Flow engine: one explicit state machine per guided exercise.
//!
//! Flows are pure step functions over [`FlowState`]: they take the current
//! state and the user's message and return a reply, an optional persistence
//! [`SideEffect`], and the next state. The dispatcher executes the effect
//! *before* applying the transition, so a failed write can never clear or
//! advance a session.

pub mod breathing;
pub mod checkin;
pub mod grounding;
pub mod planning;
pub mod trigger_log;

use lumen_types::session::{CheckInDraft, CheckInStep, FlowKind, FlowState};
use lumen_types::user::UserProfile;

use crate::i18n::MessageCatalog;

/// Literal token that completes the planning and trigger-log flows.
pub const DONE_TOKEN: &str = "done";

/// Literal token that confirms the breathing exercise.
pub const GO_TOKEN: &str = "go";

/// Persistence requested by a flow step.
///
/// Carried back to the dispatcher rather than executed in place: flows stay
/// synchronous and the dispatcher owns the effect-before-transition order.
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    /// Insert the completed check-in (single atomic insert).
    SaveCheckin {
        stress: f64,
        triggers: String,
        sleep_hours: f64,
        micro_goal: String,
    },
    /// Insert the first plan items, already capped and in original order.
    SavePlanItems(Vec<String>),
    /// Insert one trigger note immediately (the flow continues).
    LogTrigger(String),
}

/// Where the flow goes after a step.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    Continue(FlowState),
    Done,
}

/// Outcome of one flow step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub reply: String,
    pub effect: Option<SideEffect>,
    pub next: Progress,
}

impl StepResult {
    /// Remain in the flow (re-prompt or move to the next step).
    pub fn stay(reply: String, state: FlowState) -> Self {
        Self {
            reply,
            effect: None,
            next: Progress::Continue(state),
        }
    }

    /// Finish the flow with no persistence.
    pub fn done(reply: String) -> Self {
        Self {
            reply,
            effect: None,
            next: Progress::Done,
        }
    }

    pub fn with_effect(mut self, effect: SideEffect) -> Self {
        self.effect = Some(effect);
        self
    }
}

/// Begin a flow: install step 0 and return the intro prompt.
///
/// Grounding resolves its prompt language here, once, from the stored
/// profile; a later `lang` change does not retarget a flow in progress.
pub fn start(kind: FlowKind, profile: &UserProfile, catalog: &MessageCatalog) -> (String, FlowState) {
    match kind {
        FlowKind::CheckIn => (
            catalog.text("checkin_intro"),
            FlowState::CheckIn {
                step: CheckInStep::Stress,
                draft: CheckInDraft::default(),
            },
        ),
        FlowKind::Breathing => (catalog.text("breath_intro"), FlowState::Breathing),
        FlowKind::Grounding => (
            catalog.text("ground_intro"),
            FlowState::Grounding {
                lang: profile.lang.clone(),
                index: 0,
            },
        ),
        FlowKind::Planning => (
            catalog.text("plan_intro"),
            FlowState::Planning { items: Vec::new() },
        ),
        FlowKind::TriggerLog => (catalog.text("triggers_intro"), FlowState::TriggerLog),
    }
}

/// Advance an active flow by one user message.
pub fn advance(state: FlowState, text: &str, catalog: &MessageCatalog) -> StepResult {
    match state {
        FlowState::CheckIn { step, draft } => checkin::advance(step, draft, text, catalog),
        FlowState::Breathing => breathing::advance(text, catalog),
        FlowState::Grounding { lang, index } => grounding::advance(lang, index, catalog),
        FlowState::Planning { items } => planning::advance(items, text, catalog),
        FlowState::TriggerLog => trigger_log::advance(text, catalog),
    }
}

/// Parse a user-entered real number, accepting a comma decimal separator.
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    text.trim().replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn empty_catalog() -> MessageCatalog {
        MessageCatalog::new(HashMap::new())
    }

    fn profile(lang: &str) -> UserProfile {
        UserProfile::new(1, lang, "US")
    }

    #[test]
    fn test_parse_number_accepts_comma() {
        assert_eq!(parse_number("6,5"), Some(6.5));
        assert_eq!(parse_number(" 7.25 "), Some(7.25));
        assert_eq!(parse_number("-3"), Some(-3.0));
    }

    #[test]
    fn test_parse_number_rejects_garbage() {
        assert_eq!(parse_number("a lot"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("nan"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_start_checkin_at_stress_step() {
        let (_, state) = start(FlowKind::CheckIn, &profile("en"), &empty_catalog());
        assert!(matches!(
            state,
            FlowState::CheckIn {
                step: CheckInStep::Stress,
                ..
            }
        ));
    }

    #[test]
    fn test_start_grounding_pins_language() {
        let (_, state) = start(FlowKind::Grounding, &profile("uk"), &empty_catalog());
        match state {
            FlowState::Grounding { lang, index } => {
                assert_eq!(lang, "uk");
                assert_eq!(index, 0);
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[test]
    fn test_start_planning_with_empty_items() {
        let (_, state) = start(FlowKind::Planning, &profile("en"), &empty_catalog());
        assert_eq!(state, FlowState::Planning { items: Vec::new() });
    }
}
