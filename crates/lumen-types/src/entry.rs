//! Persisted journal entries: check-ins, trigger notes, and plan items.
//!
//! All three are append-only. A check-in is written in a single insert at
//! flow completion; trigger notes are written one per logged message; plan
//! items are capped at three per planning session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed daily check-in.
///
/// `stress` is clamped to [0, 10] before it reaches this type. `sleep_hours`
/// is deliberately NOT clamped -- the stored value is whatever the user
/// reported. Both are optional so that historical rows with missing fields
/// still aggregate correctly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckinEntry {
    pub user_id: i64,
    pub ts: DateTime<Utc>,
    pub stress: Option<f64>,
    pub triggers: String,
    pub sleep_hours: Option<f64>,
    pub micro_goal: String,
}

/// One logged trigger note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerEntry {
    pub user_id: i64,
    pub ts: DateTime<Utc>,
    pub note: String,
}

/// One item of a saved plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanItem {
    pub user_id: i64,
    pub ts: DateTime<Utc>,
    pub item: String,
}
