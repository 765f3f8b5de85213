//! Session records and the status lifecycle.
//!
//! Sessions are generated from the roster's weekly slots (status `pending`)
//! and move through `completed`/`cancelled`/`postponed`. A postponed session
//! may spawn exactly one linked make-up session with status `rescheduled`,
//! which counts as completed work for income purposes and can itself still
//! be completed or cancelled later.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Pending,
    Completed,
    Cancelled,
    Postponed,
    Rescheduled,
}

impl SessionStatus {
    /// Statuses that count as delivered work when summing income.
    pub fn earns_income(self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Rescheduled)
    }
}

/// One concrete dated class session.
///
/// The `alias` attributes accept records written by the pre-Rust releases,
/// which used camelCase keys; we always write snake_case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    #[serde(alias = "studentId")]
    pub student_id: String,
    #[serde(alias = "dateTime")]
    pub date_time: DateTime<Local>,
    #[serde(alias = "duration")]
    pub duration_min: u32,
    /// Snapshot of the student's per-session price at generation time.
    /// Never re-derived from the roster afterwards.
    pub price: f64,
    pub status: SessionStatus,
    #[serde(default)]
    pub note: Option<String>,
    /// Set only on rescheduled sessions: the postponed session this one
    /// replaces.
    #[serde(default, alias = "originalSessionId")]
    pub original_session_id: Option<String>,
}

impl Session {
    /// A freshly generated pending occurrence of a weekly slot.
    pub fn pending(student_id: &str, date_time: DateTime<Local>, price: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            student_id: student_id.to_string(),
            date_time,
            duration_min: crate::generator::DEFAULT_SESSION_MINUTES,
            price,
            status: SessionStatus::Pending,
            note: None,
            original_session_id: None,
        }
    }

    /// Build the make-up session spawned when this session is postponed to
    /// a concrete new date. Student, duration, and price carry over; the
    /// note records which date is being made up.
    pub fn make_up(&self, new_date_time: DateTime<Local>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            student_id: self.student_id.clone(),
            date_time: new_date_time,
            duration_min: self.duration_min,
            price: self.price,
            status: SessionStatus::Rescheduled,
            note: Some(format!(
                "Make-up for session on {}",
                self.date_time.format("%Y-%m-%d")
            )),
            original_session_id: Some(self.id.clone()),
        }
    }
}

/// Sort a session collection ascending by instant. Ties break on id so the
/// order is stable across repeated sorts and runs.
pub fn sort_by_date(sessions: &mut [Session]) {
    sessions.sort_by(|a, b| {
        a.date_time
            .cmp(&b.date_time)
            .then_with(|| a.id.cmp(&b.id))
    });
}
