//! Backup bundle export and import.
//!
//! There is one canonical schema (version "2"): collections inline, a hex
//! SHA-256 over the payload for integrity, and the settings along for the
//! ride. Import additionally accepts the flat key dump older releases
//! wrote as automatic backups. Either way, application is all-or-nothing;
//! a refused bundle leaves the store untouched.

use chrono::{DateTime, Duration, Local, TimeZone};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::Config;
use crate::error::BackupError;
use crate::school::SchoolSession;
use crate::session::Session;
use crate::student::Student;

pub const BACKUP_VERSION: &str = "2";

/// File name used for automatic backups.
pub const AUTO_BACKUP_FILE: &str = "AutoBackup_tutordesk.json";

// Collection keys inside legacy flat dumps.
const LEGACY_STUDENTS_KEY: &str = "tutor_students_v3";
const LEGACY_SESSIONS_KEY: &str = "tutor_sessions_v3";
const LEGACY_SCHOOL_KEY: &str = "tutor_school_sessions";

/// One exported snapshot of everything the application owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupBundle {
    pub version: String,
    pub created_at: DateTime<Local>,
    /// Hex SHA-256 over the collections. Empty on bundles converted from
    /// the legacy format; verification is skipped for those.
    #[serde(default)]
    pub hash: String,
    pub students: Vec<Student>,
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub school_sessions: Vec<SchoolSession>,
    #[serde(default)]
    pub settings: Option<Config>,
}

/// What an import applied, reported back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub version: String,
    pub students: usize,
    pub sessions: usize,
    pub school_sessions: usize,
    pub settings_applied: bool,
}

fn digest(
    version: &str,
    students: &[Student],
    sessions: &[Session],
    school_sessions: &[SchoolSession],
) -> Result<String, serde_json::Error> {
    let mut hasher = Sha256::new();
    hasher.update(version.as_bytes());
    hasher.update(serde_json::to_string(students)?.as_bytes());
    hasher.update(serde_json::to_string(sessions)?.as_bytes());
    hasher.update(serde_json::to_string(school_sessions)?.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Build a canonical bundle from live collections.
pub fn make_bundle(
    students: &[Student],
    sessions: &[Session],
    school_sessions: &[SchoolSession],
    settings: Option<Config>,
    now: DateTime<Local>,
) -> Result<BackupBundle, serde_json::Error> {
    let mut bundle = BackupBundle {
        version: BACKUP_VERSION.to_string(),
        created_at: now,
        hash: String::new(),
        students: students.to_vec(),
        sessions: sessions.to_vec(),
        school_sessions: school_sessions.to_vec(),
        settings,
    };
    bundle.hash = digest(
        &bundle.version,
        &bundle.students,
        &bundle.sessions,
        &bundle.school_sessions,
    )?;
    Ok(bundle)
}

/// Serialize a bundle to the JSON text written to backup files.
pub fn to_json(bundle: &BackupBundle) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(bundle)
}

/// Parse and verify backup text in either supported format.
///
/// Refusals: no version marker, a structured bundle with an unknown
/// version, missing student/session collections, an integrity hash that
/// does not match, or collections that fail to decode. The caller applies
/// nothing on refusal.
pub fn parse(json: &str) -> Result<BackupBundle, BackupError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| BackupError::Malformed(e.to_string()))?;
    if !value.is_object() {
        return Err(BackupError::Malformed("not a JSON object".into()));
    }

    let version = match value.get("version") {
        Some(serde_json::Value::String(v)) => v.clone(),
        Some(other) => other.to_string(),
        None => return Err(BackupError::MissingVersion),
    };

    // Legacy auto-backups carry the whole key/value store under "data".
    if value.get("data").is_some() {
        return parse_legacy(&version, &value);
    }

    if version != BACKUP_VERSION {
        return Err(BackupError::UnsupportedVersion(version));
    }
    if value.get("students").is_none() || value.get("sessions").is_none() {
        return Err(BackupError::MissingCollections);
    }

    let bundle: BackupBundle =
        serde_json::from_value(value).map_err(|e| BackupError::Malformed(e.to_string()))?;

    if !bundle.hash.is_empty() {
        let expected = digest(
            &bundle.version,
            &bundle.students,
            &bundle.sessions,
            &bundle.school_sessions,
        )
        .map_err(|e| BackupError::Malformed(e.to_string()))?;
        if expected != bundle.hash {
            return Err(BackupError::HashMismatch);
        }
    }

    Ok(bundle)
}

fn parse_legacy(version: &str, value: &serde_json::Value) -> Result<BackupBundle, BackupError> {
    let Some(data) = value.get("data").and_then(|d| d.as_object()) else {
        return Err(BackupError::Malformed(
            "legacy data section is not an object".into(),
        ));
    };

    let students_raw = data.get(LEGACY_STUDENTS_KEY).and_then(|v| v.as_str());
    let sessions_raw = data.get(LEGACY_SESSIONS_KEY).and_then(|v| v.as_str());
    let (Some(students_raw), Some(sessions_raw)) = (students_raw, sessions_raw) else {
        return Err(BackupError::MissingCollections);
    };

    let students: Vec<Student> = serde_json::from_str(students_raw)
        .map_err(|e| BackupError::Malformed(format!("legacy students: {e}")))?;
    let sessions: Vec<Session> = serde_json::from_str(sessions_raw)
        .map_err(|e| BackupError::Malformed(format!("legacy sessions: {e}")))?;
    let school_sessions: Vec<SchoolSession> =
        match data.get(LEGACY_SCHOOL_KEY).and_then(|v| v.as_str()) {
            Some(raw) => serde_json::from_str(raw)
                .map_err(|e| BackupError::Malformed(format!("legacy school sessions: {e}")))?,
            None => Vec::new(),
        };

    let created_at = value
        .get("timestamp")
        .and_then(|t| t.as_i64())
        .and_then(|ms| Local.timestamp_millis_opt(ms).earliest())
        .unwrap_or_else(|| DateTime::<Local>::from(std::time::UNIX_EPOCH));

    Ok(BackupBundle {
        version: version.to_string(),
        created_at,
        hash: String::new(),
        students,
        sessions,
        school_sessions,
        settings: None,
    })
}

/// Whether an automatic backup is due. `every_days` of 0 disables the
/// feature; an unreadable `last` record counts as never backed up.
pub fn should_run_auto(last: Option<&str>, every_days: u32, now: DateTime<Local>) -> bool {
    if every_days == 0 {
        return false;
    }
    let Some(last) = last.and_then(|raw| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Local))
    }) else {
        return true;
    };
    now.signed_duration_since(last) >= Duration::days(i64::from(every_days))
}
