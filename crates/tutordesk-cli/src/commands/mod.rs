pub mod backup;
pub mod config;
pub mod finance;
pub mod notify;
pub mod schedule;
pub mod school;
pub mod session;
pub mod stats;
pub mod student;
