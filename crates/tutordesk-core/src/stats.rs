//! Read-only reporting over the student and session collections.
//!
//! Everything here is recomputed on demand from the live collections;
//! nothing is cached or persisted. Income only ever counts sessions whose
//! status earns it (completed or rescheduled), so cancelling or postponing
//! a session removes it from every money figure immediately.

use chrono::{DateTime, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::session::{Session, SessionStatus};
use crate::student::Student;

/// Postponed sessions older than this are flagged as needing attention.
const OVERDUE_AFTER_DAYS: i64 = 3;

/// Sessions falling on one local calendar date, in stored order.
pub fn daily_sessions(sessions: &[Session], date: NaiveDate) -> Vec<Session> {
    sessions
        .iter()
        .filter(|s| s.date_time.date_naive() == date)
        .cloned()
        .collect()
}

/// Income earned on one local calendar date.
pub fn daily_income(sessions: &[Session], date: NaiveDate) -> f64 {
    sessions
        .iter()
        .filter(|s| s.date_time.date_naive() == date && s.status.earns_income())
        .map(|s| s.price)
        .sum()
}

/// Dashboard bundle derived from the full session history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Overview {
    pub total_income: f64,
    pub cancelled_count: usize,
    pub pending_postponed: usize,
    pub today_sessions: Vec<Session>,
    pub overdue_postponed: Vec<Session>,
}

pub fn overview(sessions: &[Session], now: DateTime<Local>) -> Overview {
    let overdue_before = now - Duration::days(OVERDUE_AFTER_DAYS);
    Overview {
        total_income: sessions
            .iter()
            .filter(|s| s.status.earns_income())
            .map(|s| s.price)
            .sum(),
        cancelled_count: sessions
            .iter()
            .filter(|s| s.status == SessionStatus::Cancelled)
            .count(),
        pending_postponed: sessions
            .iter()
            .filter(|s| s.status == SessionStatus::Postponed)
            .count(),
        today_sessions: daily_sessions(sessions, now.date_naive()),
        overdue_postponed: sessions
            .iter()
            .filter(|s| s.status == SessionStatus::Postponed && s.date_time < overdue_before)
            .cloned()
            .collect(),
    }
}

/// Share of today's sessions already done, as a rounded percentage.
/// Zero when nothing is scheduled today.
pub fn progress_percent(sessions: &[Session], now: DateTime<Local>) -> u32 {
    let today = now.date_naive();
    let mut total = 0u32;
    let mut done = 0u32;
    for s in sessions {
        if s.date_time.date_naive() != today {
            continue;
        }
        total += 1;
        if s.status.earns_income() {
            done += 1;
        }
    }
    if total == 0 {
        0
    } else {
        ((100.0 * f64::from(done)) / f64::from(total)).round() as u32
    }
}

/// Where a student stands against the sessions they have consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Partial,
    Unpaid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentLedger {
    pub student_id: String,
    pub name: String,
    pub completed_sessions: usize,
    pub session_price: f64,
    pub monthly_price: f64,
    pub debt: f64,
    pub paid_amount: f64,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialReport {
    pub students: Vec<StudentLedger>,
    pub total_collected: f64,
    pub total_expected: f64,
    pub monthly_expected: f64,
}

/// Per-student debt is the number of income-earning sessions times that
/// student's current per-session price; payments are tracked as a single
/// running total per student, not per session.
pub fn financial_report(students: &[Student], sessions: &[Session]) -> FinancialReport {
    let mut ledgers = Vec::with_capacity(students.len());
    let mut total_collected = 0.0;
    let mut total_expected = 0.0;
    let mut monthly_expected = 0.0;

    for student in students {
        let completed = sessions
            .iter()
            .filter(|s| s.student_id == student.id && s.status.earns_income())
            .count();
        let debt = completed as f64 * student.session_price;
        let status = if student.paid_amount >= debt {
            PaymentStatus::Paid
        } else if student.paid_amount > 0.0 {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Unpaid
        };

        total_collected += student.paid_amount;
        total_expected += debt;
        monthly_expected += student.monthly_price;

        ledgers.push(StudentLedger {
            student_id: student.id.clone(),
            name: student.name.clone(),
            completed_sessions: completed,
            session_price: student.session_price,
            monthly_price: student.monthly_price,
            debt,
            paid_amount: student.paid_amount,
            status,
        });
    }

    FinancialReport {
        students: ledgers,
        total_collected,
        total_expected,
        monthly_expected,
    }
}
