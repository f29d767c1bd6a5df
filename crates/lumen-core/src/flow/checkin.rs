//! Daily check-in: stress -> triggers -> sleep -> micro-goal.
//!
//! Stress is clamped to [0, 10] at parse time; sleep hours are stored
//! exactly as reported. Nothing is persisted until the final step, where
//! the whole entry is emitted as one [`SideEffect::SaveCheckin`].

use lumen_types::session::{CheckInDraft, CheckInStep, FlowState};

use crate::i18n::MessageCatalog;

use super::{parse_number, SideEffect, StepResult};

/// Clamp a stress rating into the 0-10 scale.
pub fn clamp_stress(value: f64) -> f64 {
    value.clamp(0.0, 10.0)
}

pub(super) fn advance(
    step: CheckInStep,
    mut draft: CheckInDraft,
    text: &str,
    catalog: &MessageCatalog,
) -> StepResult {
    match step {
        CheckInStep::Stress => match parse_number(text) {
            None => StepResult::stay(
                catalog.text("checkin_stress_invalid"),
                FlowState::CheckIn { step, draft },
            ),
            Some(value) => {
                let value = clamp_stress(value);
                draft.stress = Some(value);
                StepResult::stay(
                    catalog.render("checkin_stress_saved", &[("val", &format!("{value}"))]),
                    FlowState::CheckIn {
                        step: CheckInStep::Triggers,
                        draft,
                    },
                )
            }
        },

        CheckInStep::Triggers => {
            draft.triggers = Some(text.trim().to_string());
            StepResult::stay(
                catalog.text("checkin_triggers_saved"),
                FlowState::CheckIn {
                    step: CheckInStep::Sleep,
                    draft,
                },
            )
        }

        CheckInStep::Sleep => match parse_number(text) {
            None => StepResult::stay(
                catalog.text("checkin_sleep_invalid"),
                FlowState::CheckIn { step, draft },
            ),
            Some(hours) => {
                // Deliberately unclamped: the report is stored as-is.
                draft.sleep_hours = Some(hours);
                StepResult::stay(
                    catalog.text("checkin_sleep_saved"),
                    FlowState::CheckIn {
                        step: CheckInStep::Goal,
                        draft,
                    },
                )
            }
        },

        CheckInStep::Goal => StepResult::done(catalog.text("checkin_done")).with_effect(
            SideEffect::SaveCheckin {
                stress: draft.stress.unwrap_or_default(),
                triggers: draft.triggers.unwrap_or_default(),
                sleep_hours: draft.sleep_hours.unwrap_or_default(),
                micro_goal: text.trim().to_string(),
            },
        ),
    }
}
