//! Application store: the owned collections plus their persistence.
//!
//! [`AppStore`] holds the roster, the session history, and the school
//! timetable in memory and writes them through a [`SnapshotStore`] on every
//! mutation. It is single-threaded by design; the CLI opens it, applies one
//! command, and exits. Every public mutation follows the same shape:
//! validate, mutate in memory, persist.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::ValidationError;
use crate::generator::{self, DEFAULT_HORIZON_DAYS};
use crate::school::{find_overlap, sort_timetable, SchoolSession, SchoolSessionDraft};
use crate::session::{sort_by_date, Session, SessionStatus};
use crate::stats::{self, FinancialReport, Overview};
use crate::storage::backup::{self, ImportSummary, AUTO_BACKUP_FILE};
use crate::storage::snapshot::{
    SnapshotStore, LAST_AUTO_BACKUP_KEY, SCHOOL_SESSIONS_KEY, SESSIONS_KEY, STUDENTS_KEY,
};
use crate::storage::Config;
use crate::student::{Student, StudentDraft};
use crate::Result;

pub struct AppStore {
    students: Vec<Student>,
    sessions: Vec<Session>,
    school_sessions: Vec<SchoolSession>,
    snapshot: SnapshotStore,
}

impl AppStore {
    /// Open the store at the default data directory and run the periodic
    /// backup check. A failed backup is logged, never fatal.
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let snapshot = SnapshotStore::open()?;
        let mut store = Self::from_snapshot(snapshot)?;
        let config = Config::load_or_default();
        if let Err(err) = store.auto_backup(&config, Local::now()) {
            warn!(error = %err, "automatic backup failed");
        }
        Ok(store)
    }

    /// Open the store against an explicit snapshot file. No backup check;
    /// this is the entry point tests use with a temp directory.
    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self> {
        Self::from_snapshot(SnapshotStore::open_at(path)?)
    }

    fn from_snapshot(snapshot: SnapshotStore) -> Result<Self> {
        let students = load_collection(&snapshot, STUDENTS_KEY);
        let sessions = load_collection(&snapshot, SESSIONS_KEY);
        let school_sessions = load_collection(&snapshot, SCHOOL_SESSIONS_KEY);
        let mut store = Self {
            students,
            sessions,
            school_sessions,
            snapshot,
        };
        sort_by_date(&mut store.sessions);
        sort_timetable(&mut store.school_sessions);
        // A roster without any sessions means a fresh install or a
        // roster-only import; seed the calendar so it is not empty.
        if !store.students.is_empty() && store.sessions.is_empty() {
            store.generate_sessions(DEFAULT_HORIZON_DAYS)?;
        }
        Ok(store)
    }

    fn persist(&mut self) -> Result<()> {
        self.snapshot
            .set(STUDENTS_KEY, serde_json::to_string(&self.students)?);
        self.snapshot
            .set(SESSIONS_KEY, serde_json::to_string(&self.sessions)?);
        self.snapshot.set(
            SCHOOL_SESSIONS_KEY,
            serde_json::to_string(&self.school_sessions)?,
        );
        self.snapshot.save()?;
        Ok(())
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn school_sessions(&self) -> &[SchoolSession] {
        &self.school_sessions
    }

    /// Timetable entries for one weekday, in time order. The collection is
    /// kept sorted by (day, time), so a filter preserves the ordering.
    pub fn school_sessions_for_day(&self, day: u8) -> Vec<&SchoolSession> {
        self.school_sessions.iter().filter(|e| e.day == day).collect()
    }

    pub fn student_by_id(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    /// Add a student and extend the calendar over the default horizon for
    /// the whole roster. Returns the stored record.
    pub fn add_student(&mut self, draft: StudentDraft) -> Result<Student> {
        draft.validate()?;
        let student = draft.into_student(Local::now());
        self.students.push(student.clone());
        generator::generate_into(
            &mut self.sessions,
            &self.students,
            DEFAULT_HORIZON_DAYS,
            Local::now(),
        );
        self.persist()?;
        Ok(student)
    }

    /// Replace a student record wholesale. Unknown ids are a silent no-op.
    /// Existing sessions are untouched; use [`AppStore::update_slot_time`]
    /// to move generated sessions along with a slot.
    pub fn update_student(&mut self, student: Student) -> Result<()> {
        student.validate()?;
        if let Some(existing) = self.students.iter_mut().find(|s| s.id == student.id) {
            *existing = student;
            self.persist()?;
        }
        Ok(())
    }

    /// Remove a student and every session that belongs to them.
    pub fn delete_student(&mut self, id: &str) -> Result<()> {
        let before = self.students.len();
        self.students.retain(|s| s.id != id);
        if self.students.len() == before {
            return Ok(());
        }
        self.sessions.retain(|s| s.student_id != id);
        self.persist()
    }

    /// Move one weekly slot to a new start time and shift the future
    /// pending sessions that came from it. Returns how many sessions moved.
    pub fn update_slot_time(&mut self, student_id: &str, day: u8, new_time: &str) -> Result<usize> {
        if day > 6 {
            return Err(ValidationError::InvalidDay(day).into());
        }
        if crate::schedule::parse_hhmm(new_time).is_none() {
            return Err(ValidationError::InvalidTime(new_time.to_string()).into());
        }
        let Some(student) = self.students.iter_mut().find(|s| s.id == student_id) else {
            return Ok(0);
        };
        let Some(slot) = student.fixed_schedule.iter_mut().find(|s| s.day == day) else {
            return Ok(0);
        };
        slot.time = new_time.to_string();
        let shifted =
            generator::reconcile_slot_time(&mut self.sessions, student_id, day, new_time, Local::now());
        self.persist()?;
        Ok(shifted)
    }

    /// Book a one-off session outside the weekly schedule. The price
    /// defaults to the student's current rate.
    pub fn add_session(
        &mut self,
        student_id: &str,
        date_time: DateTime<Local>,
        price: Option<f64>,
        note: Option<String>,
    ) -> Result<Session> {
        let Some(student) = self.student_by_id(student_id) else {
            return Err(ValidationError::InvalidValue {
                field: "student_id",
                message: format!("no student with id {student_id}"),
            }
            .into());
        };
        let price = price.unwrap_or(student.session_price);
        if !price.is_finite() || price < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "price",
                message: format!("{price} is not a valid price"),
            }
            .into());
        }
        let mut session = Session::pending(student_id, date_time, price);
        session.note = note;
        self.sessions.push(session.clone());
        sort_by_date(&mut self.sessions);
        self.persist()?;
        Ok(session)
    }

    /// Set a session's status. Postponing with a concrete new date spawns
    /// the linked make-up session, at most once per original; the date is
    /// ignored for any other status. Unknown ids are a silent no-op.
    pub fn set_session_status(
        &mut self,
        session_id: &str,
        status: SessionStatus,
        new_date_time: Option<DateTime<Local>>,
    ) -> Result<()> {
        let Some(idx) = self.sessions.iter().position(|s| s.id == session_id) else {
            return Ok(());
        };
        self.sessions[idx].status = status;
        if status == SessionStatus::Postponed {
            if let Some(new_dt) = new_date_time {
                let already_rebooked = self
                    .sessions
                    .iter()
                    .any(|s| s.original_session_id.as_deref() == Some(session_id));
                if !already_rebooked {
                    let make_up = self.sessions[idx].make_up(new_dt);
                    self.sessions.push(make_up);
                    sort_by_date(&mut self.sessions);
                }
            }
        }
        self.persist()
    }

    /// Record a payment against a student's running balance. Unknown ids
    /// are a silent no-op.
    pub fn record_payment(&mut self, student_id: &str, amount: f64) -> Result<()> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "amount",
                message: format!("{amount} is not a valid payment"),
            }
            .into());
        }
        if let Some(student) = self.students.iter_mut().find(|s| s.id == student_id) {
            student.paid_amount += amount;
            self.persist()?;
        }
        Ok(())
    }

    /// Extend the calendar for every student's weekly slots. Returns how
    /// many sessions were added.
    pub fn generate_sessions(&mut self, days_ahead: u32) -> Result<usize> {
        let added = generator::generate_into(
            &mut self.sessions,
            &self.students,
            days_ahead,
            Local::now(),
        );
        self.persist()?;
        Ok(added)
    }

    fn check_school_overlap(
        &self,
        day: u8,
        time: &str,
        end_time: &str,
        duration_min: u32,
        exclude_id: Option<&str>,
    ) -> Result<(), ValidationError> {
        if let Some(hit) = find_overlap(
            &self.school_sessions,
            day,
            time,
            end_time,
            duration_min,
            exclude_id,
        ) {
            let time = if hit.end_time.is_empty() {
                hit.time.clone()
            } else {
                format!("{} - {}", hit.time, hit.end_time)
            };
            return Err(ValidationError::OverlappingSchoolSession {
                name: hit.name.clone(),
                time,
            });
        }
        Ok(())
    }

    /// Add a school class. Rejects entries overlapping an existing class
    /// on the same day.
    pub fn add_school_session(&mut self, draft: SchoolSessionDraft) -> Result<SchoolSession> {
        draft.validate()?;
        self.check_school_overlap(
            draft.day,
            &draft.time,
            &draft.end_time,
            draft.duration_min,
            None,
        )?;
        let entry = draft.into_session(Local::now());
        self.school_sessions.push(entry.clone());
        sort_timetable(&mut self.school_sessions);
        self.persist()?;
        Ok(entry)
    }

    /// Replace a school class wholesale. Unknown ids are a silent no-op;
    /// the replacement must not overlap any other entry.
    pub fn update_school_session(&mut self, entry: SchoolSession) -> Result<()> {
        entry.validate()?;
        self.check_school_overlap(
            entry.day,
            &entry.time,
            &entry.end_time,
            entry.duration_min,
            Some(&entry.id),
        )?;
        if let Some(existing) = self.school_sessions.iter_mut().find(|e| e.id == entry.id) {
            *existing = entry;
            sort_timetable(&mut self.school_sessions);
            self.persist()?;
        }
        Ok(())
    }

    pub fn delete_school_session(&mut self, id: &str) -> Result<()> {
        let before = self.school_sessions.len();
        self.school_sessions.retain(|e| e.id != id);
        if self.school_sessions.len() == before {
            return Ok(());
        }
        self.persist()
    }

    pub fn daily_sessions(&self, date: NaiveDate) -> Vec<Session> {
        stats::daily_sessions(&self.sessions, date)
    }

    pub fn daily_income(&self, date: NaiveDate) -> f64 {
        stats::daily_income(&self.sessions, date)
    }

    pub fn overview(&self) -> Overview {
        stats::overview(&self.sessions, Local::now())
    }

    pub fn financial_report(&self) -> FinancialReport {
        stats::financial_report(&self.students, &self.sessions)
    }

    /// Percentage of today's sessions already resolved.
    pub fn progress_today(&self) -> u32 {
        stats::progress_percent(&self.sessions, Local::now())
    }

    /// Pending future sessions for one student.
    pub fn upcoming_count(&self, student_id: &str) -> usize {
        generator::upcoming_count(&self.sessions, student_id, Local::now())
    }

    /// Serialize everything into a backup bundle. Settings travel along
    /// when the caller supplies them.
    pub fn export_backup(&self, settings: Option<Config>) -> Result<String> {
        let bundle = backup::make_bundle(
            &self.students,
            &self.sessions,
            &self.school_sessions,
            settings,
            Local::now(),
        )?;
        Ok(backup::to_json(&bundle)?)
    }

    /// Replace every collection from backup text. Nothing is applied when
    /// the bundle is refused; settings are applied best-effort afterwards.
    pub fn import_backup(&mut self, json: &str) -> Result<ImportSummary> {
        let bundle = backup::parse(json)?;
        let version = bundle.version;
        self.students = bundle.students;
        self.sessions = bundle.sessions;
        self.school_sessions = bundle.school_sessions;
        sort_by_date(&mut self.sessions);
        sort_timetable(&mut self.school_sessions);
        self.persist()?;
        let settings_applied = match bundle.settings {
            Some(mut config) => {
                config.normalize();
                match config.save() {
                    Ok(()) => true,
                    Err(err) => {
                        warn!(error = %err, "imported settings were not saved");
                        false
                    }
                }
            }
            None => false,
        };
        Ok(ImportSummary {
            version,
            students: self.students.len(),
            sessions: self.sessions.len(),
            school_sessions: self.school_sessions.len(),
            settings_applied,
        })
    }

    /// Write the periodic backup file if the configured cadence says one
    /// is due. Returns the path written, or `None` when nothing was due.
    pub fn auto_backup(
        &mut self,
        config: &Config,
        now: DateTime<Local>,
    ) -> Result<Option<PathBuf>> {
        let last = self.snapshot.get(LAST_AUTO_BACKUP_KEY);
        if !backup::should_run_auto(last, config.backup.auto_backup_days, now) {
            return Ok(None);
        }
        let dir = match &config.backup.dir {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => self
                .snapshot
                .path()
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        };
        std::fs::create_dir_all(&dir)?;
        let bundle = backup::make_bundle(
            &self.students,
            &self.sessions,
            &self.school_sessions,
            Some(config.clone()),
            now,
        )?;
        let path = dir.join(AUTO_BACKUP_FILE);
        std::fs::write(&path, backup::to_json(&bundle)?)?;
        self.snapshot.set(LAST_AUTO_BACKUP_KEY, now.to_rfc3339());
        self.snapshot.save()?;
        Ok(Some(path))
    }
}

fn load_collection<T: DeserializeOwned>(snapshot: &SnapshotStore, key: &str) -> Vec<T> {
    let Some(raw) = snapshot.get(key) else {
        return Vec::new();
    };
    match serde_json::from_str(raw) {
        Ok(items) => items,
        Err(err) => {
            warn!(key, error = %err, "discarding unreadable collection");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::schedule::{day_of_week, WeeklySlot};
    use chrono::Duration;

    fn open_temp() -> (tempfile::TempDir, AppStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = AppStore::open_at(dir.path().join("snapshot.json")).unwrap();
        (dir, store)
    }

    // A slot on tomorrow's weekday: every generated session is strictly in
    // the future, and a 30-day horizon holds exactly five of them.
    fn tomorrow_slot(time: &str) -> WeeklySlot {
        let tomorrow = Local::now().date_naive().succ_opt().unwrap();
        WeeklySlot::new(day_of_week(tomorrow), time)
    }

    fn draft(name: &str, time: &str) -> StudentDraft {
        StudentDraft {
            name: name.into(),
            session_price: 100.0,
            monthly_price: 400.0,
            fixed_schedule: vec![tomorrow_slot(time)],
            ..Default::default()
        }
    }

    #[test]
    fn missing_file_starts_empty() {
        let (_dir, store) = open_temp();
        assert!(store.students().is_empty());
        assert!(store.sessions().is_empty());
        assert!(store.school_sessions().is_empty());
    }

    #[test]
    fn add_student_validates_and_fills_the_calendar() {
        let (_dir, mut store) = open_temp();
        let bad = StudentDraft::default();
        assert!(store.add_student(bad).is_err());
        assert!(store.students().is_empty());

        let omar = store.add_student(draft("Omar", "10:00")).unwrap();
        assert_eq!(store.students().len(), 1);
        assert_eq!(store.sessions().len(), 5);
        assert!(store
            .sessions()
            .iter()
            .all(|s| s.student_id == omar.id && s.status == SessionStatus::Pending));
        assert_eq!(store.upcoming_count(&omar.id), 5);

        // Adding a second student does not duplicate the first one's plan.
        store.add_student(draft("Sara", "12:00")).unwrap();
        assert_eq!(store.sessions().len(), 10);
    }

    #[test]
    fn everything_survives_a_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        let omar_id = {
            let mut store = AppStore::open_at(&path).unwrap();
            let omar = store.add_student(draft("Omar", "10:00")).unwrap();
            store.record_payment(&omar.id, 250.0).unwrap();
            omar.id
        };
        let store = AppStore::open_at(&path).unwrap();
        assert_eq!(store.students().len(), 1);
        assert_eq!(store.sessions().len(), 5);
        assert_eq!(store.student_by_id(&omar_id).unwrap().paid_amount, 250.0);
    }

    #[test]
    fn delete_student_cascades_to_their_sessions() {
        let (_dir, mut store) = open_temp();
        let omar = store.add_student(draft("Omar", "10:00")).unwrap();
        let sara = store.add_student(draft("Sara", "12:00")).unwrap();
        store.delete_student(&omar.id).unwrap();
        assert_eq!(store.students().len(), 1);
        assert!(store.sessions().iter().all(|s| s.student_id == sara.id));

        // Deleting an unknown id changes nothing.
        store.delete_student("nope").unwrap();
        assert_eq!(store.sessions().len(), 5);
    }

    #[test]
    fn record_payment_accumulates_and_rejects_garbage() {
        let (_dir, mut store) = open_temp();
        let omar = store.add_student(draft("Omar", "10:00")).unwrap();
        store.record_payment(&omar.id, 100.0).unwrap();
        store.record_payment(&omar.id, 50.0).unwrap();
        assert_eq!(store.student_by_id(&omar.id).unwrap().paid_amount, 150.0);

        assert!(store.record_payment(&omar.id, -5.0).is_err());
        assert!(store.record_payment(&omar.id, f64::NAN).is_err());
        assert!(store.record_payment("nope", 50.0).is_ok());
        assert_eq!(store.student_by_id(&omar.id).unwrap().paid_amount, 150.0);
    }

    #[test]
    fn postponing_with_a_date_spawns_one_make_up() {
        let (_dir, mut store) = open_temp();
        store.add_student(draft("Omar", "10:00")).unwrap();
        let target = store.sessions()[0].clone();
        let new_dt = Local::now() + Duration::days(40);

        store
            .set_session_status(&target.id, SessionStatus::Postponed, Some(new_dt))
            .unwrap();
        assert_eq!(store.sessions().len(), 6);
        let make_up = store
            .sessions()
            .iter()
            .find(|s| s.original_session_id.as_deref() == Some(target.id.as_str()))
            .unwrap();
        assert_eq!(make_up.status, SessionStatus::Rescheduled);
        assert_eq!(make_up.price, target.price);

        // Postponing the same session again never spawns a second one.
        store
            .set_session_status(
                &target.id,
                SessionStatus::Postponed,
                Some(new_dt + Duration::days(1)),
            )
            .unwrap();
        assert_eq!(store.sessions().len(), 6);

        // A status change without a date is just a status change.
        store
            .set_session_status(&target.id, SessionStatus::Completed, None)
            .unwrap();
        assert_eq!(
            store
                .sessions()
                .iter()
                .find(|s| s.id == target.id)
                .unwrap()
                .status,
            SessionStatus::Completed
        );
        store
            .set_session_status("nope", SessionStatus::Completed, None)
            .unwrap();
    }

    #[test]
    fn update_slot_time_moves_roster_and_calendar_together() {
        let (_dir, mut store) = open_temp();
        let omar = store.add_student(draft("Omar", "10:00")).unwrap();
        let day = omar.fixed_schedule[0].day;

        let shifted = store.update_slot_time(&omar.id, day, "11:30").unwrap();
        assert_eq!(shifted, 5);
        assert_eq!(
            store.student_by_id(&omar.id).unwrap().fixed_schedule[0].time,
            "11:30"
        );
        assert!(store
            .sessions()
            .iter()
            .all(|s| s.date_time.format("%H:%M").to_string() == "11:30"));

        assert!(store.update_slot_time(&omar.id, day, "24:00").is_err());
        assert_eq!(store.update_slot_time(&omar.id, (day + 1) % 7, "09:00").unwrap(), 0);
        assert_eq!(store.update_slot_time("nope", day, "09:00").unwrap(), 0);
    }

    #[test]
    fn add_session_books_one_off_lessons() {
        let (_dir, mut store) = open_temp();
        let omar = store.add_student(draft("Omar", "10:00")).unwrap();
        let when = Local::now() + Duration::days(2);

        let booked = store
            .add_session(&omar.id, when, None, Some("exam prep".into()))
            .unwrap();
        assert_eq!(booked.price, 100.0);
        assert_eq!(store.sessions().len(), 6);

        let discounted = store.add_session(&omar.id, when, Some(80.0), None).unwrap();
        assert_eq!(discounted.price, 80.0);

        assert!(store.add_session("nope", when, None, None).is_err());
        assert!(store.add_session(&omar.id, when, Some(-1.0), None).is_err());
    }

    #[test]
    fn corrupt_collections_are_dropped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        let blob = serde_json::json!({
            "students_v1": "definitely not json",
            "sessions_v1": "[]",
        });
        std::fs::write(&path, serde_json::to_string_pretty(&blob).unwrap()).unwrap();

        let store = AppStore::open_at(&path).unwrap();
        assert!(store.students().is_empty());
        assert!(store.sessions().is_empty());
    }

    #[test]
    fn roster_without_sessions_is_seeded_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        let student = draft("Omar", "10:00").into_student(Local::now());
        {
            let mut snapshot = SnapshotStore::open_at(&path).unwrap();
            snapshot.set(
                STUDENTS_KEY,
                serde_json::to_string(&vec![student.clone()]).unwrap(),
            );
            snapshot.save().unwrap();
        }

        let store = AppStore::open_at(&path).unwrap();
        assert_eq!(store.sessions().len(), 5);

        // The seeded calendar was persisted; a reopen does not re-seed.
        let again = AppStore::open_at(&path).unwrap();
        assert_eq!(again.sessions().len(), 5);
    }

    #[test]
    fn backup_round_trip_restores_another_store() {
        let (_dir_a, mut a) = open_temp();
        let omar = a.add_student(draft("Omar", "10:00")).unwrap();
        a.add_school_session(school_draft()).unwrap();
        let first = a.sessions()[0].id.clone();
        a.set_session_status(&first, SessionStatus::Completed, None)
            .unwrap();
        a.record_payment(&omar.id, 100.0).unwrap();

        let json = a.export_backup(None).unwrap();

        let (_dir_b, mut b) = open_temp();
        let summary = b.import_backup(&json).unwrap();
        assert_eq!(summary.students, 1);
        assert_eq!(summary.sessions, 5);
        assert_eq!(summary.school_sessions, 1);
        assert!(!summary.settings_applied);
        assert_eq!(b.student_by_id(&omar.id).unwrap().paid_amount, 100.0);
        assert_eq!(
            b.sessions().iter().filter(|s| s.status == SessionStatus::Completed).count(),
            1
        );

        // Refused text leaves the target store untouched.
        assert!(b.import_backup("{\"oops\": true}").is_err());
        assert_eq!(b.students().len(), 1);
    }

    #[test]
    fn auto_backup_honors_cadence_and_stamps_the_run() {
        let (_dir, mut store) = open_temp();
        store.add_student(draft("Omar", "10:00")).unwrap();
        let out = tempfile::tempdir().unwrap();
        let now = Local::now();

        // Cadence 0 means the feature is off.
        let config = Config::default();
        assert!(store.auto_backup(&config, now).unwrap().is_none());

        let mut config = Config::default();
        config.backup.auto_backup_days = 1;
        config.backup.dir = Some(out.path().to_string_lossy().into_owned());

        let path = store.auto_backup(&config, now).unwrap().unwrap();
        assert!(path.ends_with(AUTO_BACKUP_FILE));
        let written = std::fs::read_to_string(&path).unwrap();
        let bundle = backup::parse(&written).unwrap();
        assert_eq!(bundle.students.len(), 1);
        assert_eq!(bundle.sessions.len(), 5);

        // The run was stamped, so the next check is not due yet.
        assert!(store.auto_backup(&config, now).unwrap().is_none());
        assert!(store
            .auto_backup(&config, now + Duration::days(1))
            .unwrap()
            .is_some());
    }

    #[test]
    fn school_day_view_filters_and_keeps_time_order() {
        let (_dir, mut store) = open_temp();
        for (name, day, time, end) in [
            ("late Monday", 1, "11:30", "12:15"),
            ("Thursday", 4, "09:00", "09:45"),
            ("early Monday", 1, "08:00", "08:45"),
        ] {
            let mut d = school_draft();
            d.name = name.into();
            d.day = day;
            d.time = time.into();
            d.end_time = end.into();
            store.add_school_session(d).unwrap();
        }

        let monday: Vec<_> = store
            .school_sessions_for_day(1)
            .iter()
            .map(|e| e.name.clone())
            .collect();
        assert_eq!(monday, ["early Monday", "late Monday"]);
        assert!(store.school_sessions_for_day(5).is_empty());
    }

    #[test]
    fn overlapping_school_classes_are_rejected() {
        let (_dir, mut store) = open_temp();
        let mut ninth = school_draft();
        ninth.name = "Grade 9".into();
        ninth.day = 2;
        ninth.time = "10:00".into();
        ninth.end_time = "11:00".into();
        store.add_school_session(ninth).unwrap();

        let mut tenth = school_draft();
        tenth.name = "Grade 10".into();
        tenth.day = 2;
        tenth.time = "10:30".into();
        tenth.end_time = "11:30".into();
        let err = store.add_school_session(tenth.clone()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OverlappingSchoolSession { .. })
        ));
        assert_eq!(store.school_sessions_for_day(2).len(), 1);

        // The same range is free on another day.
        tenth.day = 3;
        store.add_school_session(tenth).unwrap();
    }

    #[test]
    fn editing_a_class_skips_its_own_slot_but_not_others() {
        let (_dir, mut store) = open_temp();
        let first = store.add_school_session(school_draft()).unwrap(); // day 1, 08:00-08:45

        let mut later = school_draft();
        later.time = "09:00".into();
        later.end_time = "09:45".into();
        store.add_school_session(later).unwrap();

        // A class may move within its own current range.
        let mut moved = first.clone();
        moved.time = "08:15".into();
        moved.end_time = "08:50".into();
        store.update_school_session(moved).unwrap();

        // Moving it onto the later class is refused and applies nothing.
        let mut clash = first.clone();
        clash.time = "09:30".into();
        clash.end_time = "10:15".into();
        assert!(store.update_school_session(clash).is_err());
        let stored = store
            .school_sessions()
            .iter()
            .find(|e| e.id == first.id)
            .unwrap();
        assert_eq!(stored.time, "08:15");
    }

    fn school_draft() -> SchoolSessionDraft {
        SchoolSessionDraft {
            name: "3rd grade".into(),
            level: None,
            grade: Some("3".into()),
            group: Default::default(),
            day: 1,
            time: "08:00".into(),
            duration_min: 45,
            end_time: "08:45".into(),
            subject: Some("Math".into()),
            notes: None,
            teacher: None,
        }
    }
}
