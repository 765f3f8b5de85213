//! School timetable commands.

use clap::Subcommand;
use tutordesk_core::{AppStore, ClassGroup, SchoolSessionDraft};

#[derive(Subcommand)]
pub enum SchoolAction {
    /// Add a school class
    Add {
        /// Class name
        name: String,
        /// Day of week, 0 (Sunday) through 6
        #[arg(long)]
        day: u8,
        /// Start time, HH:MM
        #[arg(long)]
        time: String,
        /// End time, HH:MM
        #[arg(long)]
        end: String,
        /// Duration in minutes
        #[arg(long, default_value = "60")]
        duration: u32,
        /// Class group: boys, girls, or mixed (default: mixed)
        #[arg(long, default_value = "mixed")]
        group: String,
        /// Grade label
        #[arg(long)]
        grade: Option<String>,
        /// Level label
        #[arg(long)]
        level: Option<String>,
        /// Subject taught
        #[arg(long)]
        subject: Option<String>,
        /// Co-teacher name
        #[arg(long)]
        teacher: Option<String>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// List the timetable
    List {
        /// Show only one day of the week, 0 (Sunday) through 6
        #[arg(long)]
        day: Option<u8>,
    },
    /// Update a school class
    Update {
        /// Class ID
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New day of week
        #[arg(long)]
        day: Option<u8>,
        /// New start time
        #[arg(long)]
        time: Option<String>,
        /// New end time
        #[arg(long)]
        end: Option<String>,
        /// New duration in minutes
        #[arg(long)]
        duration: Option<u32>,
        /// New class group
        #[arg(long)]
        group: Option<String>,
        /// New subject
        #[arg(long)]
        subject: Option<String>,
        /// New notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a school class
    Delete {
        /// Class ID
        id: String,
    },
}

fn parse_group(group: &str) -> ClassGroup {
    match group {
        "boys" => ClassGroup::Boys,
        "girls" => ClassGroup::Girls,
        _ => ClassGroup::Mixed,
    }
}

pub fn run(action: SchoolAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = AppStore::open()?;

    match action {
        SchoolAction::Add {
            name,
            day,
            time,
            end,
            duration,
            group,
            grade,
            level,
            subject,
            teacher,
            notes,
        } => {
            let draft = SchoolSessionDraft {
                name,
                level,
                grade,
                group: parse_group(&group),
                day,
                time,
                duration_min: duration,
                end_time: end,
                subject,
                notes,
                teacher,
            };
            let entry = store.add_school_session(draft)?;
            println!("Class added: {}", entry.id);
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        SchoolAction::List { day } => match day {
            Some(day) => {
                let entries = store.school_sessions_for_day(day);
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
            None => {
                println!("{}", serde_json::to_string_pretty(store.school_sessions())?);
            }
        },
        SchoolAction::Update {
            id,
            name,
            day,
            time,
            end,
            duration,
            group,
            subject,
            notes,
        } => {
            let mut entry = store
                .school_sessions()
                .iter()
                .find(|e| e.id == id)
                .cloned()
                .ok_or(format!("Class not found: {id}"))?;

            if let Some(n) = name {
                entry.name = n;
            }
            if let Some(d) = day {
                entry.day = d;
            }
            if let Some(t) = time {
                entry.time = t;
            }
            if let Some(e) = end {
                entry.end_time = e;
            }
            if let Some(d) = duration {
                entry.duration_min = d;
            }
            if let Some(g) = group {
                entry.group = parse_group(&g);
            }
            if let Some(s) = subject {
                entry.subject = Some(s);
            }
            if let Some(n) = notes {
                entry.notes = Some(n);
            }

            store.update_school_session(entry.clone())?;
            println!("Class updated:");
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        SchoolAction::Delete { id } => {
            store.delete_school_session(&id)?;
            println!("Class deleted: {id}");
        }
    }
    Ok(())
}
