//! Upcoming-session reminders.
//!
//! [`NotificationScheduler::scan`] is a pure sweep over the session list:
//! it collects pending sessions starting inside the lookahead window and
//! remembers which ids it has already surfaced, so each session is
//! announced at most once per process lifetime. The set is deliberately
//! not persisted; after a restart a session still inside the window may
//! be announced once more.
//!
//! [`run`] wraps the sweep in a timer loop for the CLI. Delivery and
//! store reloads are best-effort: failures are logged and the next tick
//! proceeds normally.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::session::{Session, SessionStatus};
use crate::storage::Config;
use crate::store::AppStore;
use crate::student::Student;

/// Seconds between sweeps in [`run`]. The first sweep fires immediately.
pub const SCAN_INTERVAL_SECS: u64 = 60;

pub const MIN_OFFSET_MINUTES: u32 = 1;
pub const MAX_OFFSET_MINUTES: u32 = 60;
pub const DEFAULT_OFFSET_MINUTES: u32 = 10;

/// Clamp a user-supplied lookahead to the supported range.
pub fn clamp_offset(minutes: u32) -> u32 {
    minutes.clamp(MIN_OFFSET_MINUTES, MAX_OFFSET_MINUTES)
}

/// One reminder produced by a sweep. `id` is the session's id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionNotice {
    pub id: String,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Local>,
}

/// Delivery capability for notices. The CLI prints to the terminal;
/// a desktop shell would hand these to the system notification center.
pub trait Notify {
    fn deliver(&self, title: &str, body: &str) -> Result<(), Box<dyn std::error::Error>>;
}

pub struct NotificationScheduler {
    offset_minutes: u32,
    notified: HashSet<String>,
}

impl NotificationScheduler {
    pub fn new(offset_minutes: u32) -> Self {
        Self {
            offset_minutes: clamp_offset(offset_minutes),
            notified: HashSet::new(),
        }
    }

    pub fn offset_minutes(&self) -> u32 {
        self.offset_minutes
    }

    /// Change the lookahead for subsequent sweeps. Sessions already
    /// announced stay announced even if the new window would cover them.
    pub fn set_offset_minutes(&mut self, minutes: u32) {
        self.offset_minutes = clamp_offset(minutes);
    }

    /// Collect reminders for pending sessions starting within
    /// `[now, now + offset]` that have not been announced yet.
    ///
    /// Sessions whose student is missing from the roster are skipped
    /// without being marked, so they surface once the roster catches up.
    pub fn scan(
        &mut self,
        sessions: &[Session],
        students: &[Student],
        now: DateTime<Local>,
    ) -> Vec<SessionNotice> {
        let window_end = now + Duration::minutes(i64::from(self.offset_minutes));
        let mut notices = Vec::new();

        for session in sessions {
            if session.status != SessionStatus::Pending {
                continue;
            }
            if session.date_time < now || session.date_time > window_end {
                continue;
            }
            if self.notified.contains(&session.id) {
                continue;
            }
            let Some(student) = students.iter().find(|s| s.id == session.student_id) else {
                continue;
            };

            let minutes_away = (session.date_time - now).num_minutes();
            notices.push(SessionNotice {
                id: session.id.clone(),
                title: "Upcoming session".to_string(),
                message: format!(
                    "{} at {} (in {} min)",
                    student.name,
                    session.date_time.format("%H:%M"),
                    minutes_away
                ),
                timestamp: now,
            });
            self.notified.insert(session.id.clone());
        }

        notices
    }
}

impl Default for NotificationScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_OFFSET_MINUTES)
    }
}

/// Run the reminder loop until the process is killed.
///
/// Each tick reloads the store from disk so edits made by other
/// invocations of the tool are picked up without restarting the watcher.
pub async fn run(notifier: &dyn Notify) -> crate::Result<()> {
    let config = Config::load_or_default();
    if !config.notifications.enabled {
        warn!("reminders are disabled in the configuration");
        return Ok(());
    }
    let mut scheduler = NotificationScheduler::new(config.notifications.offset_minutes);
    let mut ticker =
        tokio::time::interval(std::time::Duration::from_secs(SCAN_INTERVAL_SECS));

    loop {
        ticker.tick().await;
        let store = match AppStore::open() {
            Ok(store) => store,
            Err(err) => {
                warn!(error = %err, "skipping sweep, store unavailable");
                continue;
            }
        };
        for notice in scheduler.scan(store.sessions(), store.students(), Local::now()) {
            if let Err(err) = notifier.deliver(&notice.title, &notice.message) {
                warn!(session = %notice.id, error = %err, "delivery failed");
            }
        }
    }
}
