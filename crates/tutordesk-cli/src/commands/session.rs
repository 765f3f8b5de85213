//! Session booking and status commands.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use clap::Subcommand;
use tutordesk_core::{AppStore, SessionStatus};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Book a one-off session
    Add {
        /// Student ID
        student_id: String,
        /// Date and time, e.g. 2026-03-10T16:00
        #[arg(long)]
        at: String,
        /// Price override (defaults to the student's rate)
        #[arg(long)]
        price: Option<f64>,
        /// Free-form note
        #[arg(long)]
        note: Option<String>,
    },
    /// List sessions
    List {
        /// Filter by student ID
        #[arg(long)]
        student: Option<String>,
        /// Filter by status: pending, completed, cancelled, postponed, rescheduled
        #[arg(long)]
        status: Option<String>,
    },
    /// Mark a session completed
    Complete {
        /// Session ID
        id: String,
    },
    /// Mark a session cancelled
    Cancel {
        /// Session ID
        id: String,
    },
    /// Postpone a session, optionally booking the make-up right away
    Postpone {
        /// Session ID
        id: String,
        /// Make-up date and time, e.g. 2026-03-14T18:00
        #[arg(long)]
        to: Option<String>,
    },
    /// Put a session back to pending
    Reopen {
        /// Session ID
        id: String,
    },
}

/// Parse a local wall-clock datetime in `YYYY-MM-DDTHH:MM` form.
pub fn parse_local(spec: &str) -> Result<DateTime<Local>, Box<dyn std::error::Error>> {
    let naive = NaiveDateTime::parse_from_str(spec, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(spec, "%Y-%m-%d %H:%M"))
        .map_err(|_| format!("invalid datetime '{spec}': expected YYYY-MM-DDTHH:MM"))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| format!("datetime '{spec}' does not exist in the local timezone").into())
}

fn parse_status(status: &str) -> Result<SessionStatus, Box<dyn std::error::Error>> {
    serde_json::from_value(serde_json::Value::String(status.to_string()))
        .map_err(|_| format!("unknown status '{status}'").into())
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = AppStore::open()?;

    match action {
        SessionAction::Add {
            student_id,
            at,
            price,
            note,
        } => {
            let session = store.add_session(&student_id, parse_local(&at)?, price, note)?;
            println!("Session booked: {}", session.id);
            println!("{}", serde_json::to_string_pretty(&session)?);
        }
        SessionAction::List { student, status } => {
            let status = status.as_deref().map(parse_status).transpose()?;
            let filtered: Vec<_> = store
                .sessions()
                .iter()
                .filter(|s| {
                    if let Some(ref id) = student {
                        if &s.student_id != id {
                            return false;
                        }
                    }
                    if let Some(wanted) = status {
                        if s.status != wanted {
                            return false;
                        }
                    }
                    true
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&filtered)?);
        }
        SessionAction::Complete { id } => {
            store.set_session_status(&id, SessionStatus::Completed, None)?;
            println!("Session completed: {id}");
        }
        SessionAction::Cancel { id } => {
            store.set_session_status(&id, SessionStatus::Cancelled, None)?;
            println!("Session cancelled: {id}");
        }
        SessionAction::Postpone { id, to } => {
            let new_dt = to.as_deref().map(parse_local).transpose()?;
            let rebooked = new_dt.is_some();
            store.set_session_status(&id, SessionStatus::Postponed, new_dt)?;
            if rebooked {
                println!("Session postponed and make-up booked: {id}");
            } else {
                println!("Session postponed: {id}");
            }
        }
        SessionAction::Reopen { id } => {
            store.set_session_status(&id, SessionStatus::Pending, None)?;
            println!("Session reopened: {id}");
        }
    }
    Ok(())
}
