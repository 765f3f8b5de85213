//! Student roster commands.

use clap::Subcommand;
use tutordesk_core::{AppStore, StudentDraft, WeeklySlot};

#[derive(Subcommand)]
pub enum StudentAction {
    /// Enroll a new student
    Add {
        /// Student name
        name: String,
        /// Price per session
        #[arg(long)]
        price: f64,
        /// Expected monthly price
        #[arg(long, default_value = "0")]
        monthly: f64,
        /// Student phone number
        #[arg(long)]
        phone: Option<String>,
        /// Parent phone number
        #[arg(long)]
        parent_phone: Option<String>,
        /// Student age
        #[arg(long)]
        age: Option<u32>,
        /// Level/grade label
        #[arg(long)]
        level: Option<String>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
        /// Weekly slot as DAY@HH:MM with day 0 (Sunday) through 6, repeatable
        #[arg(long = "slot")]
        slots: Vec<String>,
    },
    /// List the roster
    List,
    /// Get one student with their upcoming session count
    Get {
        /// Student ID
        id: String,
    },
    /// Update a student
    Update {
        /// Student ID
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New price per session
        #[arg(long)]
        price: Option<f64>,
        /// New expected monthly price
        #[arg(long)]
        monthly: Option<f64>,
        /// New student phone number
        #[arg(long)]
        phone: Option<String>,
        /// New parent phone number
        #[arg(long)]
        parent_phone: Option<String>,
        /// New age
        #[arg(long)]
        age: Option<u32>,
        /// New level/grade label
        #[arg(long)]
        level: Option<String>,
        /// New notes
        #[arg(long)]
        notes: Option<String>,
        /// Replace the weekly slots, same DAY@HH:MM format
        #[arg(long = "slot")]
        slots: Vec<String>,
    },
    /// Delete a student and their sessions
    Delete {
        /// Student ID
        id: String,
    },
}

fn parse_slot(spec: &str) -> Result<WeeklySlot, Box<dyn std::error::Error>> {
    let (day, time) = spec
        .split_once('@')
        .ok_or_else(|| format!("invalid slot '{spec}': expected DAY@HH:MM"))?;
    let day: u8 = day
        .parse()
        .map_err(|_| format!("invalid slot day '{day}': expected 0-6"))?;
    Ok(WeeklySlot::new(day, time))
}

pub fn run(action: StudentAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = AppStore::open()?;

    match action {
        StudentAction::Add {
            name,
            price,
            monthly,
            phone,
            parent_phone,
            age,
            level,
            notes,
            slots,
        } => {
            let fixed_schedule = slots
                .iter()
                .map(|s| parse_slot(s))
                .collect::<Result<Vec<_>, _>>()?;
            let draft = StudentDraft {
                name,
                phone,
                parent_phone,
                age,
                level,
                notes,
                session_price: price,
                monthly_price: monthly,
                fixed_schedule,
            };
            let student = store.add_student(draft)?;
            println!("Student added: {}", student.id);
            println!("{}", serde_json::to_string_pretty(&student)?);
        }
        StudentAction::List => {
            println!("{}", serde_json::to_string_pretty(store.students())?);
        }
        StudentAction::Get { id } => match store.student_by_id(&id) {
            Some(student) => {
                println!("{}", serde_json::to_string_pretty(student)?);
                println!("Upcoming sessions: {}", store.upcoming_count(&id));
            }
            None => println!("Student not found: {id}"),
        },
        StudentAction::Update {
            id,
            name,
            price,
            monthly,
            phone,
            parent_phone,
            age,
            level,
            notes,
            slots,
        } => {
            let mut student = store
                .student_by_id(&id)
                .cloned()
                .ok_or(format!("Student not found: {id}"))?;

            if let Some(n) = name {
                student.name = n;
            }
            if let Some(p) = price {
                student.session_price = p;
            }
            if let Some(m) = monthly {
                student.monthly_price = m;
            }
            if let Some(p) = phone {
                student.phone = Some(p);
            }
            if let Some(p) = parent_phone {
                student.parent_phone = Some(p);
            }
            if let Some(a) = age {
                student.age = Some(a);
            }
            if let Some(l) = level {
                student.level = Some(l);
            }
            if let Some(n) = notes {
                student.notes = Some(n);
            }
            if !slots.is_empty() {
                student.fixed_schedule = slots
                    .iter()
                    .map(|s| parse_slot(s))
                    .collect::<Result<Vec<_>, _>>()?;
            }

            store.update_student(student.clone())?;
            println!("Student updated:");
            println!("{}", serde_json::to_string_pretty(&student)?);
        }
        StudentAction::Delete { id } => {
            store.delete_student(&id)?;
            println!("Student deleted: {id}");
        }
    }
    Ok(())
}
