//! Session reminder commands.

use chrono::Local;
use clap::Subcommand;
use tracing::info;
use tutordesk_core::notify;
use tutordesk_core::{AppStore, Config, NotificationScheduler, Notify};

#[derive(Subcommand)]
pub enum NotifyAction {
    /// Run the reminder loop in the foreground
    Watch,
    /// Sweep once and print the due reminders
    Scan,
}

struct ConsoleNotify;

impl Notify for ConsoleNotify {
    fn deliver(&self, title: &str, body: &str) -> Result<(), Box<dyn std::error::Error>> {
        println!("[{title}] {body}");
        Ok(())
    }
}

pub fn run(action: NotifyAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        NotifyAction::Watch => {
            info!("starting reminder watch");
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(notify::run(&ConsoleNotify))?;
        }
        NotifyAction::Scan => {
            let store = AppStore::open()?;
            let config = Config::load_or_default();
            let mut scheduler = NotificationScheduler::new(config.notifications.offset_minutes);
            let notices = scheduler.scan(store.sessions(), store.students(), Local::now());
            println!("{}", serde_json::to_string_pretty(&notices)?);
        }
    }
    Ok(())
}
