//! Breathing exercise: a single confirmation gate.
//!
//! Only the literal `go` token (case-insensitive) starts the exercise;
//! anything else re-prompts without advancing. Nothing is persisted.

use lumen_types::session::FlowState;

use crate::i18n::MessageCatalog;

use super::{StepResult, GO_TOKEN};

pub(super) fn advance(text: &str, catalog: &MessageCatalog) -> StepResult {
    if text.trim().eq_ignore_ascii_case(GO_TOKEN) {
        StepResult::done(catalog.text("breath_go"))
    } else {
        StepResult::stay(catalog.text("breath_prompt"), FlowState::Breathing)
    }
}
