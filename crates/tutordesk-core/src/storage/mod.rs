pub mod backup;
mod config;
pub mod snapshot;

pub use config::Config;
pub use snapshot::SnapshotStore;

use std::path::PathBuf;

/// Returns `~/.config/tutordesk[-dev]/` based on TUTORDESK_ENV.
///
/// Set TUTORDESK_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TUTORDESK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("tutordesk-dev")
    } else {
        base_dir.join("tutordesk")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
