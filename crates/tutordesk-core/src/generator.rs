//! Session generation and schedule reconciliation engine.
//!
//! [`generate_into`] expands the roster's weekly slots into concrete dated
//! sessions over a rolling horizon; [`reconcile_slot_time`] propagates a
//! slot-time edit into the already-generated future occurrences without
//! creating or deleting anything. Both take an explicit `now` so callers
//! (and tests) control the clock; the store passes `Local::now()`.
//!
//! Generation is idempotent: an occurrence is identified by its
//! `(student_id, instant)` pair and inserted only if absent, so repeated
//! calls over the same horizon add nothing.

use chrono::{DateTime, Days, Local, NaiveDate, TimeZone};

use crate::schedule::{day_of_week, parse_hhmm};
use crate::session::{sort_by_date, Session, SessionStatus};
use crate::student::Student;

/// Rolling horizon used by the store for automatic generation.
pub const DEFAULT_HORIZON_DAYS: u32 = 30;

/// Duration assigned to generated sessions.
pub const DEFAULT_SESSION_MINUTES: u32 = 60;

/// Attach a wall-clock time to a calendar date in the local zone.
///
/// Ambiguous local times (DST fall-back) resolve to the earlier instant;
/// nonexistent ones (spring-forward gap) return `None`.
fn local_instant(date: NaiveDate, hour: u32, minute: u32) -> Option<DateTime<Local>> {
    let naive = date.and_hms_opt(hour, minute, 0)?;
    Local.from_local_datetime(&naive).earliest()
}

/// Expand every student's weekly slots into pending sessions for each
/// matching calendar day in `[today, today + days_ahead]`, skipping
/// occurrences that already exist. Returns the number inserted and leaves
/// the collection sorted by instant.
pub fn generate_into(
    sessions: &mut Vec<Session>,
    students: &[Student],
    days_ahead: u32,
    now: DateTime<Local>,
) -> usize {
    let start = now.date_naive();
    let mut inserted = 0;

    for student in students {
        for slot in &student.fixed_schedule {
            let Some((hour, minute)) = parse_hhmm(&slot.time) else {
                continue;
            };
            for offset in 0..=days_ahead {
                let Some(date) = start.checked_add_days(Days::new(offset as u64)) else {
                    break;
                };
                if day_of_week(date) != slot.day {
                    continue;
                }
                let Some(candidate) = local_instant(date, hour, minute) else {
                    continue;
                };
                let exists = sessions
                    .iter()
                    .any(|s| s.student_id == student.id && s.date_time == candidate);
                if !exists {
                    sessions.push(Session::pending(&student.id, candidate, student.session_price));
                    inserted += 1;
                }
            }
        }
    }

    sort_by_date(sessions);
    inserted
}

/// Shift the time-of-day of a student's future sessions on one weekday.
///
/// A session qualifies when its local calendar date is today or later and
/// that date's weekday equals `day`; its date is preserved and only the
/// time component is rewritten. Strictly-past sessions are never touched.
/// Returns the number of sessions shifted.
pub fn reconcile_slot_time(
    sessions: &mut [Session],
    student_id: &str,
    day: u8,
    new_time: &str,
    now: DateTime<Local>,
) -> usize {
    let Some((hour, minute)) = parse_hhmm(new_time) else {
        return 0;
    };
    let today = now.date_naive();
    let mut shifted = 0;

    for session in sessions.iter_mut() {
        if session.student_id != student_id {
            continue;
        }
        let date = session.date_time.date_naive();
        if date < today || day_of_week(date) != day {
            continue;
        }
        if let Some(moved) = local_instant(date, hour, minute) {
            session.date_time = moved;
            shifted += 1;
        }
    }

    sort_by_date(sessions);
    shifted
}

/// Count pending occurrences a student has inside the horizon. Used by
/// reporting surfaces; generation itself never consults it.
pub fn upcoming_count(sessions: &[Session], student_id: &str, now: DateTime<Local>) -> usize {
    sessions
        .iter()
        .filter(|s| {
            s.student_id == student_id
                && s.status == SessionStatus::Pending
                && s.date_time >= now
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::WeeklySlot;
    use crate::student::StudentDraft;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn student(slots: Vec<WeeklySlot>, price: f64) -> Student {
        StudentDraft {
            name: "Nour".into(),
            session_price: price,
            fixed_schedule: slots,
            ..Default::default()
        }
        .into_student(at(2026, 1, 1, 9, 0))
    }

    // 2026-03-01 is a Sunday.
    fn sunday_noon() -> DateTime<Local> {
        at(2026, 3, 1, 12, 0)
    }

    #[test]
    fn expands_each_matching_weekday_in_horizon() {
        let roster = vec![student(
            vec![WeeklySlot::new(0, "16:00"), WeeklySlot::new(3, "17:30")],
            100.0,
        )];
        let mut sessions = Vec::new();

        let added = generate_into(&mut sessions, &roster, 7, sunday_noon());

        // Sundays Mar 1 + Mar 8, Wednesday Mar 4.
        assert_eq!(added, 3);
        let times: Vec<_> = sessions
            .iter()
            .map(|s| s.date_time.format("%Y-%m-%d %H:%M").to_string())
            .collect();
        assert_eq!(
            times,
            ["2026-03-01 16:00", "2026-03-04 17:30", "2026-03-08 16:00"]
        );
        assert!(sessions.iter().all(|s| s.status == SessionStatus::Pending));
        assert!(sessions.iter().all(|s| s.price == 100.0));
        assert!(sessions.iter().all(|s| s.duration_min == 60));
    }

    #[test]
    fn generation_is_idempotent() {
        let roster = vec![student(vec![WeeklySlot::new(0, "16:00")], 80.0)];
        let mut sessions = Vec::new();

        let first = generate_into(&mut sessions, &roster, 14, sunday_noon());
        let second = generate_into(&mut sessions, &roster, 14, sunday_noon());

        assert_eq!(first, 3);
        assert_eq!(second, 0);
        assert_eq!(sessions.len(), 3);
    }

    #[test]
    fn zero_horizon_covers_only_today() {
        let roster = vec![student(
            vec![WeeklySlot::new(0, "09:00"), WeeklySlot::new(1, "09:00")],
            50.0,
        )];
        let mut sessions = Vec::new();

        // Today is Sunday; the Monday slot is outside a zero-day horizon,
        // and a slot time earlier than `now` still lands on today's date.
        let added = generate_into(&mut sessions, &roster, 0, sunday_noon());

        assert_eq!(added, 1);
        assert_eq!(
            sessions[0].date_time.format("%Y-%m-%d %H:%M").to_string(),
            "2026-03-01 09:00"
        );
    }

    #[test]
    fn widening_the_horizon_only_adds_the_tail() {
        let roster = vec![student(vec![WeeklySlot::new(0, "16:00")], 80.0)];
        let mut sessions = Vec::new();

        generate_into(&mut sessions, &roster, 7, sunday_noon());
        let added = generate_into(&mut sessions, &roster, 21, sunday_noon());

        // Mar 1 + 8 already present; Mar 15 + 22 are new.
        assert_eq!(added, 2);
        assert_eq!(sessions.len(), 4);
    }

    #[test]
    fn price_is_snapshotted_per_student() {
        let mut cheap = student(vec![WeeklySlot::new(2, "10:00")], 40.0);
        cheap.name = "Salma".into();
        let dear = student(vec![WeeklySlot::new(2, "11:00")], 90.0);
        let mut sessions = Vec::new();

        generate_into(&mut sessions, &[cheap.clone(), dear.clone()], 6, sunday_noon());

        for s in &sessions {
            let expected = if s.student_id == cheap.id { 40.0 } else { 90.0 };
            assert_eq!(s.price, expected);
        }
    }

    #[test]
    fn reconcile_shifts_future_same_weekday_only() {
        let roster = vec![student(
            vec![WeeklySlot::new(0, "16:00"), WeeklySlot::new(3, "17:30")],
            100.0,
        )];
        let sid = roster[0].id.clone();
        let mut sessions = Vec::new();
        generate_into(&mut sessions, &roster, 14, sunday_noon());
        let before = sessions.len();

        // Two days after generation: Mar 1 is history, Mar 8/15 are future.
        let shifted =
            reconcile_slot_time(&mut sessions, &sid, 0, "18:00", at(2026, 3, 3, 8, 0));

        assert_eq!(shifted, 2);
        assert_eq!(sessions.len(), before);
        let by_date: Vec<_> = sessions
            .iter()
            .map(|s| s.date_time.format("%m-%d %H:%M").to_string())
            .collect();
        assert!(by_date.contains(&"03-01 16:00".to_string())); // history untouched
        assert!(by_date.contains(&"03-08 18:00".to_string()));
        assert!(by_date.contains(&"03-15 18:00".to_string()));
        assert!(by_date.contains(&"03-04 17:30".to_string())); // other weekday untouched
    }

    #[test]
    fn reconcile_applies_to_today() {
        let roster = vec![student(vec![WeeklySlot::new(0, "16:00")], 100.0)];
        let sid = roster[0].id.clone();
        let mut sessions = Vec::new();
        generate_into(&mut sessions, &roster, 0, sunday_noon());

        // Same calendar day counts as future even though 16:00 < 20:00 is
        // being asked for after noon.
        let shifted = reconcile_slot_time(&mut sessions, &sid, 0, "20:00", sunday_noon());

        assert_eq!(shifted, 1);
        assert_eq!(
            sessions[0].date_time.format("%H:%M").to_string(),
            "20:00"
        );
    }

    #[test]
    fn reconcile_ignores_other_students() {
        let a = student(vec![WeeklySlot::new(0, "16:00")], 100.0);
        let mut b = student(vec![WeeklySlot::new(0, "16:00")], 100.0);
        b.name = "Hana".into();
        let mut sessions = Vec::new();
        generate_into(&mut sessions, &[a.clone(), b.clone()], 7, sunday_noon());

        reconcile_slot_time(&mut sessions, &a.id, 0, "19:00", sunday_noon());

        for s in &sessions {
            let hour = s.date_time.format("%H:%M").to_string();
            if s.student_id == a.id {
                assert_eq!(hour, "19:00");
            } else {
                assert_eq!(hour, "16:00");
            }
        }
    }

    #[test]
    fn reconcile_with_bad_time_is_a_no_op() {
        let roster = vec![student(vec![WeeklySlot::new(0, "16:00")], 100.0)];
        let sid = roster[0].id.clone();
        let mut sessions = Vec::new();
        generate_into(&mut sessions, &roster, 7, sunday_noon());

        assert_eq!(
            reconcile_slot_time(&mut sessions, &sid, 0, "26:00", sunday_noon()),
            0
        );
    }

    #[test]
    fn regeneration_after_reconcile_does_not_resurrect_old_time() {
        // The store always rewrites the slot before reconciling, so a later
        // generation pass sees the new time and the exists-check holds.
        let mut roster = vec![student(vec![WeeklySlot::new(0, "16:00")], 100.0)];
        let sid = roster[0].id.clone();
        let mut sessions = Vec::new();
        generate_into(&mut sessions, &roster, 14, sunday_noon());

        roster[0].fixed_schedule[0].time = "18:00".into();
        reconcile_slot_time(&mut sessions, &sid, 0, "18:00", sunday_noon());
        let added = generate_into(&mut sessions, &roster, 14, sunday_noon());

        assert_eq!(added, 0);
    }

    #[test]
    fn upcoming_count_filters_status_and_past() {
        let roster = vec![student(vec![WeeklySlot::new(0, "16:00")], 100.0)];
        let sid = roster[0].id.clone();
        let mut sessions = Vec::new();
        generate_into(&mut sessions, &roster, 14, sunday_noon());
        sessions[0].status = SessionStatus::Completed;

        assert_eq!(upcoming_count(&sessions, &sid, sunday_noon()), 2);
    }
}
