//! 5-4-3-2-1 grounding: five sensory prompts in fixed order.
//!
//! Every user reply advances the sequence regardless of content -- any
//! text counts as "done with this step". The prompt language was resolved
//! once at flow start and travels in the session state.

use lumen_types::session::FlowState;

use crate::i18n::MessageCatalog;

use super::StepResult;

/// Number of sensory prompts in the exercise.
pub const STEP_COUNT: usize = 5;

/// (count phrase, hint) pairs, English.
const STEPS_EN: [(&str, &str); STEP_COUNT] = [
    ("5 things you see", "things you can see around you"),
    ("4 things you touch", "textures or objects"),
    ("3 things you hear", "ambient sounds"),
    ("2 things you smell", "scents, even faint"),
    ("1 thing you taste", "or imagine a taste"),
];

/// (count phrase, hint) pairs, Ukrainian.
const STEPS_UK: [(&str, &str); STEP_COUNT] = [
    ("5 що бачиш", "предмети навколо"),
    ("4 що торкаєшся", "текстури чи об'єкти"),
    ("3 що чуєш", "довколишні звуки"),
    ("2 що відчуваєш на запах", "навіть ледь відчутні"),
    ("1 на смак", "або уяви смак"),
];

fn steps_for(lang: &str) -> &'static [(&'static str, &'static str); STEP_COUNT] {
    if lang == "uk" { &STEPS_UK } else { &STEPS_EN }
}

/// `index` counts prompts already sent. Below [`STEP_COUNT`] the next
/// prompt goes out; at [`STEP_COUNT`] the fifth prompt has been
/// acknowledged and the flow closes.
pub(super) fn advance(lang: String, index: usize, catalog: &MessageCatalog) -> StepResult {
    if index < STEP_COUNT {
        let (count, hint) = steps_for(&lang)[index];
        let prompt = catalog.render("ground_step", &[("count", count), ("hint", hint)]);
        let reply = if index == 0 {
            prompt
        } else {
            format!("{}\n{}", catalog.text("ground_ok"), prompt)
        };
        StepResult::stay(
            reply,
            FlowState::Grounding {
                lang,
                index: index + 1,
            },
        )
    } else {
        StepResult::done(catalog.text("ground_done"))
    }
}
