//! Payments and per-student balance commands.

use clap::Subcommand;
use tutordesk_core::AppStore;

#[derive(Subcommand)]
pub enum FinanceAction {
    /// Full financial report across the roster
    Report,
    /// Record a payment from a student
    Pay {
        /// Student ID
        student_id: String,
        /// Amount paid
        amount: f64,
    },
}

pub fn run(action: FinanceAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = AppStore::open()?;

    match action {
        FinanceAction::Report => {
            let report = store.financial_report();
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        FinanceAction::Pay { student_id, amount } => {
            store.record_payment(&student_id, amount)?;
            match store.student_by_id(&student_id) {
                Some(student) => println!(
                    "Payment recorded: {} has paid {} in total",
                    student.name, student.paid_amount
                ),
                None => println!("Student not found: {student_id}"),
            }
        }
    }
    Ok(())
}
