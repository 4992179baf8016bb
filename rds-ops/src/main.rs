// File: rds-ops/src/main.rs
use anyhow::{Context, Result};
use aws_config::BehaviorVersion;
use chrono::Datelike;
use clap::{Parser, Subcommand};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use rds_ops::clock::{business_date, Clock, SystemClock};
use rds_ops::config::secrets::{AwsSecretStore, FileSecretStore};
use rds_ops::config::{Config, ConfigManager, SecretBackend, SecretStore};
use rds_ops::holidays::HolidayResolver;
use rds_ops::rds::aws::{AwsAccountIdentity, AwsRdsClient};
use rds_ops::rds::DatabaseApi;
use rds_ops::scheduler::{OpsScheduler, ScheduleHandler, ScheduleRequest};
use rds_ops::services::{LifecycleService, ReportService, SnapshotReportJob, SnapshotService};
use rds_ops::web::{start_web_server, AppState};

#[derive(Parser)]
#[command(name = "rds-ops", version, about = "Business-day start/stop and snapshot reporting for RDS")]
struct Cli {
    /// Directory holding main.toml, custom_holidays.csv and secrets.toml
    #[arg(long, global = true, default_value = "config")]
    config_dir: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the cron triggers and the HTTP API (default)
    Serve,
    /// Run one start/stop invocation and print the outcome
    Invoke {
        /// start or stop
        action: Option<String>,
        /// Raw trigger payload, e.g. '{"action": "start"}'
        #[arg(long, conflicts_with = "action")]
        event: Option<String>,
    },
    /// Scan for old manual snapshots and file a cleanup task
    SnapshotReport,
    /// Print the holiday calendar for a year (defaults to the current JST year)
    Holidays { year: Option<i32> },
}

/// Everything the entry points need, built once from configuration
struct Runtime {
    config: Arc<Config>,
    resolver: Arc<HolidayResolver>,
    schedule_handler: Arc<ScheduleHandler>,
    report_job: Option<Arc<SnapshotReportJob>>,
}

impl Runtime {
    async fn build(config: Arc<Config>) -> Result<Self> {
        let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let database: Arc<dyn DatabaseApi> = Arc::new(AwsRdsClient::new(&sdk_config));

        let resolver = Arc::new(HolidayResolver::from_config(&config.holidays)?);
        let lifecycle = Arc::new(LifecycleService::new(database.clone()));
        let schedule_handler = Arc::new(
            ScheduleHandler::new(resolver.clone(), lifecycle, clock.clone())
                .with_weekend_skip(config.schedule.skip_weekends),
        );

        let report_job = match config.snapshot_report.validate() {
            Ok(settings) => {
                let secrets: Arc<dyn SecretStore> = match config.secrets.backend {
                    SecretBackend::Aws => Arc::new(AwsSecretStore::new(&sdk_config)),
                    SecretBackend::File => {
                        let path = config.secrets.file_path.as_deref().unwrap_or_default();
                        Arc::new(FileSecretStore::load(Path::new(path))?)
                    }
                };
                let publisher = Arc::new(ReportService::new(
                    config.snapshot_report.api_base_url.clone(),
                )?);
                Some(Arc::new(SnapshotReportJob::new(
                    settings,
                    secrets,
                    Arc::new(AwsAccountIdentity::new(&sdk_config)),
                    Arc::new(SnapshotService::new(database, clock)),
                    publisher,
                )))
            }
            Err(e) => {
                info!("Snapshot report not configured: {}", e);
                None
            }
        };

        Ok(Self {
            config,
            resolver,
            schedule_handler,
            report_job,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with reduced verbosity
    let env_filter = EnvFilter::from_default_env()
        .add_directive("rds_ops=info".parse()?)
        .add_directive("tower_http=warn".parse()?)
        .add_directive("tokio_cron_scheduler=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?)
        .add_directive("aws_config=warn".parse()?)
        .add_directive("aws_smithy_runtime=warn".parse()?);

    fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let config_manager = ConfigManager::new(cli.config_dir.clone()).await?;
    let config = config_manager.get_current_config();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Invoke { action, event } => invoke(config, action, event).await,
        Command::SnapshotReport => snapshot_report(config).await,
        Command::Holidays { year } => print_holidays(config, year).await,
    }
}

async fn serve(config: Arc<Config>) -> Result<()> {
    info!("Starting RDS ops service");
    let runtime = Runtime::build(config).await?;

    let scheduler = OpsScheduler::new(
        runtime.config.clone(),
        runtime.schedule_handler.clone(),
        runtime.report_job.clone(),
    )
    .await?;
    let jobs = scheduler.start().await?;
    info!("Scheduler started with {} jobs", jobs);

    let state = AppState::new(
        runtime.config,
        runtime.schedule_handler,
        runtime.report_job,
        runtime.resolver,
    );

    tokio::select! {
        result = start_web_server(state) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, stopping");
            Ok(())
        }
    }
}

async fn invoke(config: Arc<Config>, action: Option<String>, event: Option<String>) -> Result<()> {
    let request = match event {
        Some(raw) => serde_json::from_str::<ScheduleRequest>(&raw)
            .with_context(|| format!("Invalid event payload: {}", raw))?,
        None => ScheduleRequest { action },
    };

    let runtime = Runtime::build(config).await?;
    let outcome = runtime.schedule_handler.handle(&request).await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if !outcome.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

async fn snapshot_report(config: Arc<Config>) -> Result<()> {
    // Settings are checked before any client is built
    config.snapshot_report.validate()?;

    let runtime = Runtime::build(config).await?;
    let Some(job) = runtime.report_job else {
        anyhow::bail!("Snapshot report is not configured");
    };

    match job.run().await {
        Ok(summary) => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        Err(e) => {
            error!("Snapshot report failed: {:#}", e);
            Err(e)
        }
    }
}

async fn print_holidays(config: Arc<Config>, year: Option<i32>) -> Result<()> {
    let year = year.unwrap_or_else(|| business_date(SystemClock.now()).year());
    let resolver = HolidayResolver::from_config(&config.holidays)?;

    let holidays = resolver.resolve(year).await;
    if holidays.official.is_empty() {
        warn!("No official holidays resolved for {}", year);
    }

    let days = holidays.preview(year);
    for day in days.iter().filter(|d| !d.kind.is_business_day()) {
        println!("{} {} {}", day.date, day.weekday, day.kind.describe());
    }

    let business_days = days.iter().filter(|d| d.kind.is_business_day()).count();
    println!(
        "{}: {} official, {} custom, {} business days",
        year,
        holidays.official.len(),
        holidays.custom.len(),
        business_days
    );
    Ok(())
}
