//! Aggregation engine: rolling statistics over a user's check-ins.
//!
//! Pure over a slice of entries; the repository performs the trailing
//! window query. Averages are independent per field -- an entry with
//! stress but no sleep still contributes to the stress mean. Trigger
//! terms are ranked by frequency with ties broken by first encounter.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use lumen_types::entry::CheckinEntry;
use lumen_types::report::AggregateReport;

/// Number of top trigger terms reported.
const TOP_TERMS: usize = 5;

/// Alphabetic words of length >= 3, Latin and Cyrillic scripts plus the
/// Ukrainian apostrophe.
static WORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-zА-Яа-яЇїІіЄєҐґ']{3,}").expect("word pattern must compile")
});

/// Summarize `entries`. Returns `None` when the slice is empty -- the
/// caller renders a "no data" message, never a zero-valued report.
pub fn aggregate(entries: &[CheckinEntry]) -> Option<AggregateReport> {
    if entries.is_empty() {
        return None;
    }

    let stresses: Vec<f64> = entries.iter().filter_map(|e| e.stress).collect();
    let sleeps: Vec<f64> = entries.iter().filter_map(|e| e.sleep_hours).collect();

    let trigger_text = entries
        .iter()
        .map(|e| e.triggers.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    Some(AggregateReport {
        average_stress: mean(&stresses),
        average_sleep: mean(&sleeps),
        sample_count: entries.len(),
        top_terms: top_terms(&trigger_text),
    })
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Rank lowercase words by descending frequency; ties keep the order in
/// which a word was first seen.
fn top_terms(text: &str) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();

    for word in WORD_PATTERN.find_iter(text) {
        let word = word.as_str().to_lowercase();
        if !counts.contains_key(&word) {
            first_seen.push(word.clone());
        }
        *counts.entry(word).or_insert(0) += 1;
    }

    // Stable sort over first-encounter order: ties keep their original
    // position.
    let mut ranked = first_seen;
    ranked.sort_by(|a, b| counts[b].cmp(&counts[a]));
    ranked.truncate(TOP_TERMS);
    ranked
}
