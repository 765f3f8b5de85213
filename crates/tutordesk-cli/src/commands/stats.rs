//! Daily board and statistics commands.

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use tutordesk_core::AppStore;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's overview: income, counts, and the day's sessions
    Today,
    /// Share of today's sessions already done
    Progress,
    /// Income earned on a given date
    Income {
        /// Date, e.g. 2026-03-10 (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = AppStore::open()?;

    match action {
        StatsAction::Today => {
            let overview = store.overview();
            println!("{}", serde_json::to_string_pretty(&overview)?);
        }
        StatsAction::Progress => {
            println!("{}%", store.progress_today());
        }
        StatsAction::Income { date } => {
            let date = match date {
                Some(spec) => NaiveDate::parse_from_str(&spec, "%Y-%m-%d")
                    .map_err(|_| format!("invalid date '{spec}': expected YYYY-MM-DD"))?,
                None => Local::now().date_naive(),
            };
            println!("{}", store.daily_income(date));
        }
    }
    Ok(())
}
