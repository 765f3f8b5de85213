//! Student roster records.
//!
//! The student collection is the single source of truth for recurring
//! commitments; sessions are derived from it, never the reverse.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::schedule::{datetime_compat, parse_hhmm, WeeklySlot};

/// A student on the roster.
///
/// The `alias` attributes accept records written by the pre-Rust releases,
/// which used camelCase keys; we always write snake_case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, alias = "parentPhone")]
    pub parent_phone: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    /// Level/grade label, free-form.
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Price charged per session; snapshotted onto generated sessions.
    #[serde(alias = "sessionPrice")]
    pub session_price: f64,
    /// Expected monthly price, used for income projections only.
    #[serde(default, alias = "monthlyPrice")]
    pub monthly_price: f64,
    /// Cumulative amount paid. Only ever increased by payments.
    #[serde(default, alias = "paidAmount")]
    pub paid_amount: f64,
    /// Recurring weekly slots; at most one per day of week.
    #[serde(default, alias = "fixedSchedule")]
    pub fixed_schedule: Vec<WeeklySlot>,
    #[serde(alias = "createdAt", deserialize_with = "datetime_compat::deserialize")]
    pub created_at: DateTime<Local>,
}

/// Input for creating or replacing a student; the store assigns
/// `id`/`created_at` and owns `paid_amount`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentDraft {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub parent_phone: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub session_price: f64,
    #[serde(default)]
    pub monthly_price: f64,
    #[serde(default)]
    pub fixed_schedule: Vec<WeeklySlot>,
}

impl Student {
    /// Re-check a full record before it replaces an existing one.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        validate_prices(self.session_price, self.monthly_price)?;
        if !self.paid_amount.is_finite() || self.paid_amount < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "paid_amount",
                message: format!("{} is not a valid amount", self.paid_amount),
            });
        }
        validate_slots(&self.fixed_schedule)
    }
}

impl StudentDraft {
    /// Check the draft against the roster rules without mutating anything.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        validate_prices(self.session_price, self.monthly_price)?;
        validate_slots(&self.fixed_schedule)?;
        Ok(())
    }

    /// Materialize the draft into a roster record with a fresh id.
    pub fn into_student(self, now: DateTime<Local>) -> Student {
        Student {
            id: Uuid::new_v4().to_string(),
            name: self.name.trim().to_string(),
            phone: self.phone,
            parent_phone: self.parent_phone,
            age: self.age,
            level: self.level,
            notes: self.notes,
            session_price: self.session_price,
            monthly_price: self.monthly_price,
            paid_amount: 0.0,
            fixed_schedule: self.fixed_schedule,
            created_at: now,
        }
    }
}

fn validate_prices(session_price: f64, monthly_price: f64) -> Result<(), ValidationError> {
    if !session_price.is_finite() || session_price < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "session_price",
            message: format!("{session_price} is not a valid price"),
        });
    }
    if !monthly_price.is_finite() || monthly_price < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "monthly_price",
            message: format!("{monthly_price} is not a valid price"),
        });
    }
    Ok(())
}

/// Validate a set of weekly slots: each day 0..=6, each time HH:MM, and no
/// day appearing twice (day is the natural key within one student).
pub fn validate_slots(slots: &[WeeklySlot]) -> Result<(), ValidationError> {
    let mut seen = [false; 7];
    for slot in slots {
        if slot.day > 6 {
            return Err(ValidationError::InvalidDay(slot.day));
        }
        if parse_hhmm(&slot.time).is_none() {
            return Err(ValidationError::InvalidTime(slot.time.clone()));
        }
        if seen[slot.day as usize] {
            return Err(ValidationError::DuplicateSlotDay(slot.day));
        }
        seen[slot.day as usize] = true;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> StudentDraft {
        StudentDraft {
            name: "Omar".into(),
            session_price: 100.0,
            monthly_price: 400.0,
            fixed_schedule: vec![WeeklySlot::new(0, "16:00"), WeeklySlot::new(3, "17:30")],
            ..Default::default()
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut d = draft();
        d.name = "   ".into();
        assert!(matches!(
            d.validate(),
            Err(ValidationError::MissingField("name"))
        ));
    }

    #[test]
    fn duplicate_day_is_rejected() {
        let mut d = draft();
        d.fixed_schedule.push(WeeklySlot::new(0, "18:00"));
        assert!(matches!(
            d.validate(),
            Err(ValidationError::DuplicateSlotDay(0))
        ));
    }

    #[test]
    fn bad_slot_time_is_rejected() {
        let mut d = draft();
        d.fixed_schedule[0].time = "25:00".into();
        assert!(matches!(d.validate(), Err(ValidationError::InvalidTime(_))));
    }

    #[test]
    fn day_out_of_range_is_rejected() {
        let mut d = draft();
        d.fixed_schedule[0].day = 7;
        assert!(matches!(d.validate(), Err(ValidationError::InvalidDay(7))));
    }

    #[test]
    fn into_student_assigns_identity_and_zero_balance() {
        let s = draft().into_student(Local::now());
        assert!(!s.id.is_empty());
        assert_eq!(s.paid_amount, 0.0);
        assert_eq!(s.fixed_schedule.len(), 2);
    }

    #[test]
    fn decodes_camel_case_records_with_millisecond_timestamps() {
        let json = r#"{
            "id": "s1",
            "name": "Omar",
            "parentPhone": "0100",
            "sessionPrice": 150,
            "monthlyPrice": 600,
            "paidAmount": 300,
            "fixedSchedule": [{"day": 0, "time": "16:00"}],
            "createdAt": 1767225600000
        }"#;
        let s: Student = serde_json::from_str(json).unwrap();
        assert_eq!(s.parent_phone.as_deref(), Some("0100"));
        assert_eq!(s.session_price, 150.0);
        assert_eq!(s.paid_amount, 300.0);
        assert_eq!(s.fixed_schedule[0].day, 0);

        // Current records round-trip unchanged.
        let back = serde_json::to_string(&s).unwrap();
        let again: Student = serde_json::from_str(&back).unwrap();
        assert_eq!(again.created_at, s.created_at);
    }
}
