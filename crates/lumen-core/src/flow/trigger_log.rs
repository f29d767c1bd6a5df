//! Trigger log: every message persists immediately.
//!
//! Unlike planning and check-in there is no accumulation step -- each
//! non-completion message carries a [`SideEffect::LogTrigger`] while the
//! flow stays open. The `done` token ends the flow with no further write.

use lumen_types::session::FlowState;

use crate::i18n::MessageCatalog;

use super::{SideEffect, StepResult, DONE_TOKEN};

pub(super) fn advance(text: &str, catalog: &MessageCatalog) -> StepResult {
    let text = text.trim();
    if text.eq_ignore_ascii_case(DONE_TOKEN) {
        StepResult::done(catalog.text("saved"))
    } else {
        StepResult::stay(catalog.text("triggers_logged"), FlowState::TriggerLog)
            .with_effect(SideEffect::LogTrigger(text.to_string()))
    }
}
