//! Tiny-plan flow: accumulate items, persist the first three on `done`.
//!
//! Items are batched in the session and only written at completion, in
//! original order, silently dropping everything past the cap.

use lumen_types::session::FlowState;

use crate::i18n::MessageCatalog;

use super::{SideEffect, StepResult, DONE_TOKEN};

/// At most this many items of a planning session are persisted.
pub const MAX_ITEMS: usize = 3;

pub(super) fn advance(mut items: Vec<String>, text: &str, catalog: &MessageCatalog) -> StepResult {
    let text = text.trim();
    if text.eq_ignore_ascii_case(DONE_TOKEN) {
        items.truncate(MAX_ITEMS);
        StepResult::done(catalog.text("plan_saved")).with_effect(SideEffect::SavePlanItems(items))
    } else {
        items.push(text.to_string());
        StepResult::stay(catalog.text("plan_added"), FlowState::Planning { items })
    }
}
