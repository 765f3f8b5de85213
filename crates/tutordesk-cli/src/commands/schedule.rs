//! Weekly schedule and calendar generation commands.

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use tutordesk_core::AppStore;

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Today's sessions
    Today,
    /// Sessions on a given date
    Day {
        /// Date, e.g. 2026-03-10
        date: String,
    },
    /// Extend the generated calendar
    Generate {
        /// How many days ahead to cover
        #[arg(long, default_value = "30")]
        days: u32,
    },
    /// Move a weekly slot to a new time and shift its future sessions
    MoveSlot {
        /// Student ID
        student_id: String,
        /// Day of week, 0 (Sunday) through 6
        day: u8,
        /// New start time, HH:MM
        time: String,
    },
}

fn parse_date(spec: &str) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    NaiveDate::parse_from_str(spec, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{spec}': expected YYYY-MM-DD").into())
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = AppStore::open()?;

    match action {
        ScheduleAction::Today => {
            let sessions = store.daily_sessions(Local::now().date_naive());
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        }
        ScheduleAction::Day { date } => {
            let sessions = store.daily_sessions(parse_date(&date)?);
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        }
        ScheduleAction::Generate { days } => {
            let added = store.generate_sessions(days)?;
            println!("Generated {added} sessions");
        }
        ScheduleAction::MoveSlot {
            student_id,
            day,
            time,
        } => {
            let moved = store.update_slot_time(&student_id, day, &time)?;
            println!("Moved {moved} upcoming sessions to {time}");
        }
    }
    Ok(())
}
