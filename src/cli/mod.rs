pub mod analytics;
pub mod dashboard;
pub mod log;
pub mod manage;
pub mod settings;

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use crate::{
    storage::{facade::PerformanceStore, kv::FileKvStore},
    utils::{dir::create_application_default_path, logging::enable_logging},
};

use self::{
    analytics::{process_analytics_command, AnalyticsCommand},
    dashboard::process_dashboard_command,
    log::{process_log_command, LogCommand},
    manage::{process_category_command, process_goal_command, CategoryCommand, GoalCommand},
    settings::{process_settings_command, SettingsCommand},
};

#[derive(Parser, Debug)]
#[command(name = "Perftrack", version, long_about = None)]
#[command(about = "Log and analyze personal performance metrics", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Record a performance metric")]
    Log {
        #[command(flatten)]
        command: LogCommand,
    },
    #[command(about = "Show today's activity, recent entries and per-category stats")]
    Dashboard {},
    #[command(about = "Show per-category trends over a time window")]
    Analytics {
        #[command(flatten)]
        command: AnalyticsCommand,
    },
    #[command(about = "Delete a metric by id")]
    Delete { id: String },
    #[command(subcommand, about = "Manage metric categories")]
    Category(CategoryCommand),
    #[command(subcommand, about = "Manage goals")]
    Goal(GoalCommand),
    #[command(subcommand, about = "View or change application settings")]
    Settings(SettingsCommand),
    #[command(about = "Export all stored data as a JSON document")]
    Export {
        #[arg(long, help = "Write to a file instead of stdout")]
        out: Option<PathBuf>,
    },
    #[command(about = "Delete all stored data. Defaults re-seed on next use")]
    Clear {
        #[arg(long, help = "Confirm deletion without prompting")]
        yes: bool,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let data_path = match &args.dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            dir.clone()
        }
        None => create_application_default_path()?,
    };

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(&data_path, logging_level, args.log)?;

    let store = PerformanceStore::new(FileKvStore::new(data_path)?);

    match args.commands {
        Commands::Log { command } => process_log_command(&store, command).await,
        Commands::Dashboard {} => process_dashboard_command(&store, Utc::now()).await,
        Commands::Analytics { command } => {
            process_analytics_command(&store, command, Utc::now()).await
        }
        Commands::Delete { id } => {
            store.delete_metric(&id).await?;
            println!("Deleted entry {id}");
            Ok(())
        }
        Commands::Category(command) => process_category_command(&store, command).await,
        Commands::Goal(command) => process_goal_command(&store, command).await,
        Commands::Settings(command) => process_settings_command(&store, command).await,
        Commands::Export { out } => {
            let document = store.export_all(Utc::now()).await?;
            match out {
                Some(path) => {
                    tokio::fs::write(&path, &document).await?;
                    println!("Exported to {}", path.display());
                }
                None => println!("{document}"),
            }
            Ok(())
        }
        Commands::Clear { yes } => {
            if !yes {
                println!("This removes every metric, goal, category and setting.");
                println!("Re-run with --yes to confirm.");
                return Ok(());
            }
            store.clear_all().await?;
            println!("All data has been cleared.");
            Ok(())
        }
    }
}
