//! Crisis-phrase safety guard.
//!
//! Every inbound message passes through [`SafetyGuard::scan`] before any
//! other handling -- mid-flow steps and the free-form fallback included.
//! The guard is a best-effort lexical filter, not a clinical classifier:
//! a fixed multilingual phrase list matched case-insensitively on word
//! boundaries, so "suicide" matches but "suicideprevention.org" in the
//! middle of a word does not.

use regex::Regex;

/// Fixed phrase list, English and Ukrainian.
const CRISIS_PHRASES: &[&str] = &[
    "kill myself",
    "suicide",
    "end it",
    "self-harm",
    "cut myself",
    "want to die",
    "не хочу жити",
    "суїцид",
    "покінчити",
    "зарізатись",
    "вкоротити",
    "самопошкодження",
];

/// Lexical scanner for self-harm risk phrases.
///
/// Pure and side-effect free; construct once and share.
#[derive(Debug, Clone)]
pub struct SafetyGuard {
    pattern: Regex,
}

impl SafetyGuard {
    /// Compile the guard from the fixed phrase list.
    pub fn new() -> Self {
        let alternation = CRISIS_PHRASES
            .iter()
            .map(|p| regex::escape(p))
            .collect::<Vec<_>>()
            .join("|");
        // \b is Unicode-aware in the regex crate, so word boundaries work
        // for the Cyrillic phrases too.
        let pattern = Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))
            .expect("crisis phrase list must compile");
        Self { pattern }
    }

    /// Whether `text` contains any crisis phrase.
    pub fn scan(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

impl Default for SafetyGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_english_phrases() {
        let guard = SafetyGuard::new();
        assert!(guard.scan("I want to die"));
        assert!(guard.scan("thinking about suicide lately"));
        assert!(guard.scan("I might just end it"));
    }

    #[test]
    fn test_matches_ukrainian_phrases() {
        let guard = SafetyGuard::new();
        assert!(guard.scan("я не хочу жити"));
        assert!(guard.scan("думаю про суїцид"));
    }

    #[test]
    fn test_case_insensitive() {
        let guard = SafetyGuard::new();
        assert!(guard.scan("I WANT TO DIE"));
        assert!(guard.scan("Suicide"));
    }

    #[test]
    fn test_word_boundaries_avoid_partial_matches() {
        let guard = SafetyGuard::new();
        assert!(!guard.scan("the suicidesquad movie"));
        assert!(!guard.scan("blended words"));
    }

    #[test]
    fn test_clean_text_passes() {
        let guard = SafetyGuard::new();
        assert!(!guard.scan("slept 6.5 hours, feeling okay"));
        assert!(!guard.scan("7"));
        assert!(!guard.scan(""));
    }
}
