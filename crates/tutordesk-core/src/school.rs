//! School timetable entries.
//!
//! A separate weekly grid of school classes the tutor teaches, kept apart
//! from the private-lesson engine but sharing the persistence and backup
//! format. Entries are recurring (day + start/end time), not dated.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::schedule::{datetime_compat, parse_hhmm};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassGroup {
    Boys,
    Girls,
    Mixed,
}

impl Default for ClassGroup {
    fn default() -> Self {
        ClassGroup::Mixed
    }
}

/// One recurring school class.
///
/// The `alias` attributes accept records written by the pre-Rust releases,
/// which used camelCase keys; we always write snake_case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolSession {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default, alias = "boyGirl")]
    pub group: ClassGroup,
    pub day: u8, // 0=Sun ... 6=Sat
    pub time: String, // HH:MM
    #[serde(alias = "duration")]
    pub duration_min: u32,
    /// Entered explicitly, not derived from `duration_min`.
    #[serde(alias = "endTime")]
    pub end_time: String, // HH:MM
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub teacher: Option<String>,
    #[serde(alias = "createdAt", deserialize_with = "datetime_compat::deserialize")]
    pub created_at: DateTime<Local>,
}

/// Input for creating or replacing a school class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolSessionDraft {
    pub name: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub group: ClassGroup,
    pub day: u8,
    pub time: String,
    #[serde(default = "default_duration")]
    pub duration_min: u32,
    pub end_time: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub teacher: Option<String>,
}

fn default_duration() -> u32 {
    60
}

impl SchoolSession {
    /// Re-check a full record before it replaces an existing one.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_entry(&self.name, self.day, &self.time, &self.end_time)
    }
}

fn validate_entry(name: &str, day: u8, time: &str, end_time: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingField("name"));
    }
    if day > 6 {
        return Err(ValidationError::InvalidDay(day));
    }
    if parse_hhmm(time).is_none() {
        return Err(ValidationError::InvalidTime(time.to_string()));
    }
    if parse_hhmm(end_time).is_none() {
        return Err(ValidationError::InvalidTime(end_time.to_string()));
    }
    Ok(())
}

/// Order a timetable by day of week, then start time.
pub fn sort_timetable(entries: &mut [SchoolSession]) {
    entries.sort_by_key(|e| (e.day, parse_hhmm(&e.time).unwrap_or((24, 0))));
}

/// Minute-of-day range of an entry. When `end_time` does not parse (seen
/// in pre-Rust records), the end falls back to start + duration, reading
/// a zero duration as 60 minutes.
fn span_minutes(time: &str, end_time: &str, duration_min: u32) -> Option<(u32, u32)> {
    let (h, m) = parse_hhmm(time)?;
    let start = h * 60 + m;
    let end = match parse_hhmm(end_time) {
        Some((eh, em)) => eh * 60 + em,
        None => start + if duration_min == 0 { 60 } else { duration_min },
    };
    Some((start, end))
}

/// First entry whose time range intersects the candidate's on the same
/// day. `exclude_id` skips the entry being edited. Touching ranges do
/// not intersect.
pub fn find_overlap<'a>(
    entries: &'a [SchoolSession],
    day: u8,
    time: &str,
    end_time: &str,
    duration_min: u32,
    exclude_id: Option<&str>,
) -> Option<&'a SchoolSession> {
    let (new_start, new_end) = span_minutes(time, end_time, duration_min)?;
    entries.iter().find(|e| {
        if e.day != day || exclude_id == Some(e.id.as_str()) {
            return false;
        }
        match span_minutes(&e.time, &e.end_time, e.duration_min) {
            Some((start, end)) => new_start < end && start < new_end,
            None => false,
        }
    })
}

impl SchoolSessionDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_entry(&self.name, self.day, &self.time, &self.end_time)
    }

    pub fn into_session(self, now: DateTime<Local>) -> SchoolSession {
        SchoolSession {
            id: Uuid::new_v4().to_string(),
            name: self.name.trim().to_string(),
            level: self.level,
            grade: self.grade,
            group: self.group,
            day: self.day,
            time: self.time,
            duration_min: self.duration_min,
            end_time: self.end_time,
            subject: self.subject,
            notes: self.notes,
            teacher: self.teacher,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> SchoolSessionDraft {
        SchoolSessionDraft {
            name: "3rd grade".into(),
            level: None,
            grade: Some("3".into()),
            group: ClassGroup::Mixed,
            day: 1,
            time: "08:00".into(),
            duration_min: 45,
            end_time: "08:45".into(),
            subject: Some("Math".into()),
            notes: None,
            teacher: None,
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn end_time_is_validated_too() {
        let mut d = draft();
        d.end_time = "8:5".into();
        assert!(matches!(d.validate(), Err(ValidationError::InvalidTime(_))));
    }

    #[test]
    fn group_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ClassGroup::Girls).unwrap(),
            "\"girls\""
        );
    }

    #[test]
    fn timetable_sorts_by_day_then_time() {
        let now = Local::now();
        let mut entries: Vec<SchoolSession> = [
            (3, "08:00"),
            (1, "10:15"),
            (1, "09:05"),
            (0, "12:00"),
        ]
        .into_iter()
        .map(|(day, time)| {
            let mut d = draft();
            d.day = day;
            d.time = time.into();
            d.into_session(now)
        })
        .collect();
        // Foreign records can carry junk times; those sort last in the day.
        let mut stray = draft().into_session(now);
        stray.day = 1;
        stray.time = "junk".into();
        entries.push(stray);

        sort_timetable(&mut entries);
        let order: Vec<(u8, &str)> = entries.iter().map(|e| (e.day, e.time.as_str())).collect();
        assert_eq!(
            order,
            vec![
                (0, "12:00"),
                (1, "09:05"),
                (1, "10:15"),
                (1, "junk"),
                (3, "08:00")
            ]
        );
    }

    #[test]
    fn overlap_hits_intersecting_ranges_on_the_same_day() {
        let now = Local::now();
        let mut entry = draft().into_session(now);
        entry.day = 2;
        entry.time = "10:00".into();
        entry.end_time = "11:00".into();
        let entries = [entry];

        assert!(find_overlap(&entries, 2, "10:30", "11:30", 60, None).is_some());
        assert!(find_overlap(&entries, 3, "10:30", "11:30", 60, None).is_none());
        // Back-to-back classes touch without intersecting.
        assert!(find_overlap(&entries, 2, "11:00", "12:00", 60, None).is_none());
        assert!(find_overlap(&entries, 2, "09:00", "10:00", 60, None).is_none());
        // The entry being edited never conflicts with itself.
        let id = entries[0].id.clone();
        assert!(find_overlap(&entries, 2, "10:30", "11:30", 60, Some(&id)).is_none());
    }

    #[test]
    fn overlap_end_falls_back_to_duration() {
        let mut entry = draft().into_session(Local::now());
        entry.day = 4;
        entry.time = "10:00".into();
        entry.end_time = String::new();
        entry.duration_min = 0;

        // Zero duration reads as the historical 60-minute default, so the
        // entry spans 10:00-11:00.
        assert!(find_overlap(&[entry], 4, "10:45", "11:30", 45, None).is_some());
    }

    #[test]
    fn decodes_camel_case_records() {
        let json = r#"{
            "id": "c1",
            "name": "3B",
            "boyGirl": "girls",
            "day": 2,
            "time": "08:00",
            "duration": 45,
            "endTime": "08:45",
            "createdAt": 1767225600000
        }"#;
        let s: SchoolSession = serde_json::from_str(json).unwrap();
        assert_eq!(s.group, ClassGroup::Girls);
        assert_eq!(s.duration_min, 45);
        assert_eq!(s.end_time, "08:45");
    }
}
