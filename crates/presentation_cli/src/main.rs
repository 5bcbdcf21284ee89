//! heatstreak CLI
//!
//! Counts consecutive hot, dry days and posts the streak to a chat channel.

#![allow(clippy::print_stdout)]

mod bootstrap;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use application::DailyRunReport;
use application::ports::{StreakCounterPort, WeatherHistoryPort};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use infrastructure::config::AppConfig;
use infrastructure::persistence::Persistence;
use infrastructure::scheduled_tasks::{DAILY_RUN_TASK, create_daily_run_task};
use infrastructure::scheduler::TaskScheduler;
use infrastructure::telemetry::init_logging;
use tokio::signal;
use tracing::{error, info};

/// heatstreak CLI
#[derive(Parser)]
#[command(name = "heatstreak")]
#[command(author, version, about = "Track and announce hot, dry streaks", long_about = None)]
struct Cli {
    /// Configuration file (default: ./config.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Perform one daily run: fetch, record, count, notify
    Run {
        /// Date to record (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run on the configured cron schedule until interrupted
    Daemon,

    /// Show the stored streak and a day's record
    Status {
        /// Date to show (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Validate configuration and probe the forecast API and secret store
    Check,
}

/// Log filter override from verbosity count
///
/// No flag keeps the configured filter.
const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("debug"),
        _ => Some("trace"),
    }
}

fn render_report(report: &DailyRunReport) -> String {
    format!(
        "📅 {date}  🌡️  High {high} °F  🌧️  Rainfall {rain} in\n\
         {marker} Streak: {streak}\n\
         📨 Notification: {delivery}",
        date = report.record.date_key(),
        high = report.record.high_attribute(),
        rain = report.record.rainfall_attribute(),
        marker = if report.hot_and_dry { "🔥" } else { "💧" },
        streak = report.streak,
        delivery = report.delivery,
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    init_logging(&config.logging, log_filter_from_verbosity(cli.verbose))?;
    info!("🌵 heatstreak v{} starting...", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Run { date, json } => {
            config.validate()?;
            let app = bootstrap::build(config).await?;
            let report = app.service.run(date).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", render_report(&report));
            }
        },

        Commands::Daemon => {
            config.validate()?;
            let cron = config.schedule.cron.clone();
            let app = bootstrap::build(config).await?;

            let scheduler = TaskScheduler::new().await?;
            scheduler
                .add_task(
                    DAILY_RUN_TASK,
                    &cron,
                    create_daily_run_task(Arc::clone(&app.service)),
                )
                .await?;
            scheduler.start().await?;
            println!("⏰ Daily run scheduled at '{cron}' (UTC). Press Ctrl+C to stop.");

            shutdown_signal().await;

            scheduler.stop().await?;
            if let Some(stats) = scheduler.get_task_stats(DAILY_RUN_TASK) {
                info!(
                    successes = stats.success_count,
                    failures = stats.failure_count,
                    "Daemon stopped"
                );
            }
        },

        Commands::Status { date } => {
            config.validate_persistence()?;
            let persistence = Persistence::open(&config.database, &config.storage)?;
            let date = date.unwrap_or_else(|| Local::now().date_naive());

            let streak = persistence.counter.current().await?;
            println!("🔥 Streak: {streak} hot days since it rained");

            match persistence.history.find_by_date(date).await? {
                Some(record) => println!(
                    "📅 {}: High {} °F, Rainfall {} in",
                    record.date_key(),
                    record.high_attribute(),
                    record.rainfall_attribute()
                ),
                None => println!("📅 {}: no record", date.format("%m-%d-%Y")),
            }
        },

        Commands::Check => {
            config.validate()?;
            println!("✅ Configuration valid");

            let secret_name = config.notifier.secret_name.clone();
            let app = bootstrap::build(config).await?;
            let mut healthy = true;

            if app.forecast.is_healthy().await {
                println!("✅ Forecast API reachable");
            } else {
                println!("❌ Forecast API unreachable");
                healthy = false;
            }

            if app.secrets.is_healthy().await {
                println!("✅ Secret store reachable");
            } else {
                println!("❌ Secret store unreachable");
                healthy = false;
            }

            match app.secrets.exists(&secret_name).await {
                Ok(true) => println!("✅ Secret '{secret_name}' present"),
                Ok(false) => {
                    println!("❌ Secret '{secret_name}' not found");
                    healthy = false;
                },
                Err(e) => {
                    println!("❌ Secret '{secret_name}' unreadable: {e}");
                    healthy = false;
                },
            }

            if !healthy {
                anyhow::bail!("Health check failed");
            }
        },
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("📥 Received Ctrl+C, stopping scheduler..."),
        () = terminate => info!("📥 Received SIGTERM, stopping scheduler..."),
    }
}
