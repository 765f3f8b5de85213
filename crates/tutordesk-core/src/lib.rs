//! # Tutordesk Core Library
//!
//! This library provides the business logic for the Tutordesk private-lesson
//! manager. It implements a CLI-first philosophy: all operations are available
//! through the standalone CLI binary, and any GUI would be a thin layer over
//! the same core library.
//!
//! ## Architecture
//!
//! - **Roster**: Students with recurring weekly slots and a running balance
//! - **Generator**: Expands weekly slots into dated pending sessions over a
//!   rolling horizon, and reconciles them when a slot moves
//! - **Store**: Owned in-memory collections persisted through a JSON snapshot
//!   on every mutation
//! - **Storage**: TOML-based configuration plus versioned, hash-verified
//!   backup bundles
//! - **Notify**: A polling reminder loop for upcoming sessions
//!
//! ## Key Components
//!
//! - [`AppStore`]: The application store every command goes through
//! - [`Student`] / [`Session`]: The two central records
//! - [`Config`]: Application configuration management
//! - [`NotificationScheduler`]: Due-session scanning with de-duplication

pub mod error;
pub mod generator;
pub mod notify;
pub mod schedule;
pub mod school;
pub mod session;
pub mod stats;
pub mod storage;
pub mod store;
pub mod student;

pub use error::{BackupError, ConfigError, CoreError, Result, StoreError, ValidationError};
pub use notify::{Notify, NotificationScheduler, SessionNotice};
pub use schedule::WeeklySlot;
pub use school::{ClassGroup, SchoolSession, SchoolSessionDraft};
pub use session::{Session, SessionStatus};
pub use stats::{FinancialReport, Overview, PaymentStatus, StudentLedger};
pub use storage::{Config, SnapshotStore};
pub use store::AppStore;
pub use student::{Student, StudentDraft};
