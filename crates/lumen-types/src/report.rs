//! Derived aggregate report types.
//!
//! A report is computed on demand over a trailing window and never persisted.

use serde::{Deserialize, Serialize};

use std::fmt;

/// The trailing window a report covers. Only 7 and 30 days are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportWindow {
    Week,
    Month,
}

impl ReportWindow {
    /// Parse the bare numeric reply the user sends after `/report`.
    pub fn from_days(days: i64) -> Option<Self> {
        match days {
            7 => Some(ReportWindow::Week),
            30 => Some(ReportWindow::Month),
            _ => None,
        }
    }

    /// Window length in days.
    pub fn days(self) -> i64 {
        match self {
            ReportWindow::Week => 7,
            ReportWindow::Month => 30,
        }
    }
}

impl fmt::Display for ReportWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.days())
    }
}

/// Summary statistics over a user's check-ins in a window.
///
/// Averages are means over the entries where the respective field is
/// present; an entry missing sleep still contributes to the stress average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub average_stress: f64,
    pub average_sleep: f64,
    pub sample_count: usize,
    /// Up to five trigger terms, most frequent first, ties in
    /// first-encountered order.
    pub top_terms: Vec<String>,
}

impl AggregateReport {
    /// Render the term list for display, with a placeholder when no
    /// alphabetic words of length >= 3 were found.
    pub fn top_terms_label(&self) -> String {
        if self.top_terms.is_empty() {
            "—".to_string()
        } else {
            self.top_terms.join(", ")
        }
    }
}
