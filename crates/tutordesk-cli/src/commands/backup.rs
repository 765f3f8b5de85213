//! Backup and restore commands.

use std::path::PathBuf;

use chrono::Local;
use clap::Subcommand;
use tutordesk_core::{AppStore, Config};

#[derive(Subcommand)]
pub enum BackupAction {
    /// Export everything as a backup bundle
    Export {
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Import a backup bundle, replacing all current data
    Import {
        /// Backup file to read
        file: PathBuf,
    },
    /// Run the periodic backup check now
    Auto,
}

pub fn run(action: BackupAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = AppStore::open()?;

    match action {
        BackupAction::Export { out } => {
            let json = store.export_backup(Some(Config::load_or_default()))?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("Backup written: {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        BackupAction::Import { file } => {
            let json = std::fs::read_to_string(&file)?;
            let summary = store.import_backup(&json)?;
            println!("Backup imported:");
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        BackupAction::Auto => {
            let config = Config::load_or_default();
            match store.auto_backup(&config, Local::now())? {
                Some(path) => println!("Backup written: {}", path.display()),
                None => println!("No backup due"),
            }
        }
    }
    Ok(())
}
