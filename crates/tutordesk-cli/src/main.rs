use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod commands;

#[derive(Parser)]
#[command(name = "tutordesk-cli", version, about = "Tutordesk CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Student roster management
    Student {
        #[command(subcommand)]
        action: commands::student::StudentAction,
    },
    /// Session booking and status changes
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Weekly schedule and calendar generation
    Schedule {
        #[command(subcommand)]
        action: commands::schedule::ScheduleAction,
    },
    /// Daily board and statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Payments and per-student balances
    Finance {
        #[command(subcommand)]
        action: commands::finance::FinanceAction,
    },
    /// School timetable management
    School {
        #[command(subcommand)]
        action: commands::school::SchoolAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Backup and restore
    Backup {
        #[command(subcommand)]
        action: commands::backup::BackupAction,
    },
    /// Session reminders
    Notify {
        #[command(subcommand)]
        action: commands::notify::NotifyAction,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

fn main() {
    // Logs go to stderr so JSON output stays pipeable.
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Student { action } => commands::student::run(action),
        Commands::Session { action } => commands::session::run(action),
        Commands::Schedule { action } => commands::schedule::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Finance { action } => commands::finance::run(action),
        Commands::School { action } => commands::school::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Backup { action } => commands::backup::run(action),
        Commands::Notify { action } => commands::notify::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "tutordesk-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
