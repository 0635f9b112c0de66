pub mod commands;
pub mod prompt;

use std::{io, path::PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use crate::{
    registry::HabitRegistry,
    report::DuplicateDates,
    store::csv_store::CsvRecordStore,
    utils::{
        clock::DefaultClock,
        logging::{enable_logging, CLI_PREFIX},
    },
};

use commands::{log_today, plot_progress, show_feedback};

#[derive(Parser, Debug)]
#[command(name = "Habitkeeper", version, long_about = None)]
#[command(about = "Personal habit coach: log daily values, compare against targets, plot progress")]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
    #[arg(long, default_value = "habit_logs.csv", help = "Path of the habit log file")]
    file: PathBuf,
    #[arg(
        long,
        default_value = "progress.png",
        help = "Base path for charts. Each habit saves next to it as <base>_<habit>.png"
    )]
    charts: PathBuf,
    #[arg(long, default_value_t = DuplicateDates::KeepAll, help = "How rows sharing one date are treated on read")]
    duplicates: DuplicateDates,
    #[arg(long, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Log today's habits")]
    Log,
    #[command(about = "Show feedback over the last 7 entries")]
    Feedback,
    #[command(about = "Render one progress chart per habit")]
    Plot,
    #[command(about = "Log today, then show feedback and render charts")]
    All,
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, None, logging_level, args.log)?;

    let registry = HabitRegistry::standard();
    let store = CsvRecordStore::new(args.file, registry.clone());
    let clock = DefaultClock;

    match args.command {
        Some(Commands::Log) => log_today(&registry, &store, &clock).await,
        Some(Commands::Feedback) => show_feedback(&registry, &store, args.duplicates).await,
        Some(Commands::Plot) => {
            plot_progress(&registry, &store, args.duplicates, &args.charts).await
        }
        Some(Commands::All) => {
            log_today(&registry, &store, &clock).await?;
            show_feedback(&registry, &store, args.duplicates).await?;
            plot_progress(&registry, &store, args.duplicates, &args.charts).await
        }
        None => run_menu(&registry, &store, args.duplicates, &args.charts).await,
    }
}

/// The numbered menu shown when no subcommand is given. Any selection
/// outside 1-4 exits successfully without doing anything.
async fn run_menu(
    registry: &HabitRegistry,
    store: &CsvRecordStore,
    duplicates: DuplicateDates,
    charts_base: &std::path::Path,
) -> Result<()> {
    println!("=== Personal Habit Coach ===");
    println!("1) Log today's habits");
    println!("2) Show feedback (last 7)");
    println!("3) Plot progress");
    println!("4) Log + Feedback + Plot");
    print!("Select 1/2/3/4: ");
    use std::io::Write;
    io::stdout().flush()?;

    let mut choice = String::new();
    io::stdin().read_line(&mut choice)?;
    let clock = DefaultClock;

    match choice.trim() {
        "1" => log_today(registry, store, &clock).await,
        "2" => show_feedback(registry, store, duplicates).await,
        "3" => plot_progress(registry, store, duplicates, charts_base).await,
        "4" => {
            log_today(registry, store, &clock).await?;
            show_feedback(registry, store, duplicates).await?;
            plot_progress(registry, store, duplicates, charts_base).await
        }
        _ => {
            println!("Invalid choice. Exiting.");
            Ok(())
        }
    }
}
