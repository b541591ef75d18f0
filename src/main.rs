//! Hetzner traffic exporter
//!
//! Polls the Robot webservice for per-IP and per-subnet traffic of the current
//! month and exposes it on `/metrics`.
//!
//! # Usage
//! ```sh
//! HETZNER_USER=#ws+abc HETZNER_PASS=secret hetzner-traffic-exporter --interval 15
//! HETZNER_USER=#ws+abc HETZNER_PASS=secret hetzner-traffic-exporter -1 > traffic.prom
//! ```
//!
//! # Environment Variables
//! - `HETZNER_USER`, `HETZNER_PASS` - Robot webservice credentials (required)
//! - `HETZNER_ROBOT_URL` - API base URL override
//! - `HETZNER_HTTP_TIMEOUT_SECS`, `HETZNER_HTTP_MAX_RETRIES` - transport limits
//! - `RUST_LOG` - log filter (logs go to stderr)

use anyhow::{Context, Result};
use clap::Parser;
use hetzner_traffic_exporter::application::{MetricReconciler, Scheduler, SnapshotBuilder};
use hetzner_traffic_exporter::config::{
    Config, DEFAULT_INTERVAL_MINUTES, DEFAULT_LISTEN_ADDR, ExporterConfig, PollInterval,
};
use hetzner_traffic_exporter::infrastructure::RobotClient;
use hetzner_traffic_exporter::infrastructure::exposition;
use hetzner_traffic_exporter::infrastructure::observability::log_filter;
use std::io::Write;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::prelude::*;

const GPL_V2_URL: &str = "https://www.ohse.de/uwe/licenses/GPL-2";

#[derive(Parser)]
#[command(author, version, about = "Prometheus exporter for Hetzner Robot traffic counters", long_about = None)]
struct Cli {
    /// Collect and output the metrics once, and exit
    #[arg(short = '1', long)]
    oneshot: bool,

    /// Show license information and exit
    #[arg(long)]
    license: bool,

    /// Log every update at info level
    #[arg(long)]
    log_updates: bool,

    /// Run updates against the API every ... minutes (minimum 1)
    #[arg(long, default_value_t = DEFAULT_INTERVAL_MINUTES, allow_negative_numbers = true)]
    interval: i64,

    /// Address on which to expose metrics
    #[arg(long, default_value = DEFAULT_LISTEN_ADDR)]
    listen: String,
}

impl Cli {
    fn exporter_config(&self) -> ExporterConfig {
        ExporterConfig {
            oneshot: self.oneshot,
            log_updates: self.log_updates,
            interval: PollInterval::from_minutes(self.interval),
            listen: self.listen.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.license {
        println!(
            "{}: version {}\n\nThis software is published under the terms of the GPL version 2.\nA copy is at {}.",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            GPL_V2_URL
        );
        return Ok(());
    }

    // Load environment variables
    dotenvy::dotenv().ok();

    // Setup logging (stderr only; stdout carries the oneshot exposition)
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(log_filter(
            std::env::var(tracing_subscriber::EnvFilter::DEFAULT_ENV)
                .ok()
                .as_deref(),
        ))
        .with(stderr_layer)
        .init();

    let config = Config::from_env(cli.exporter_config())?;
    info!(
        "Configuration loaded: Robot={}, Interval={}min, Oneshot={}",
        config.robot.base_url,
        config.exporter.interval.minutes(),
        config.exporter.oneshot
    );

    let api = Arc::new(RobotClient::new(&config.robot));
    let reconciler = Arc::new(MetricReconciler::new().context("Failed to register metrics")?);
    let scheduler = Scheduler::new(
        SnapshotBuilder::new(api),
        reconciler.clone(),
        config.exporter.interval,
        config.exporter.log_updates,
    );

    if config.exporter.oneshot {
        return run_oneshot(&scheduler, &reconciler).await;
    }

    let listener = tokio::net::TcpListener::bind(&config.exporter.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.exporter.listen))?;

    let mut handle = scheduler.spawn();

    let served = tokio::select! {
        served = exposition::serve(listener, reconciler.clone()) => served,
        stopped = handle.wait() => {
            error!("Poll loop terminated, exiting");
            return stopped;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting...");
            Ok(())
        }
    };

    if let Err(e) = &served {
        error!("Metrics server stopped: {:#}", e);
    }
    handle.stop().await?;
    served
}

async fn run_oneshot(scheduler: &Scheduler, reconciler: &MetricReconciler) -> Result<()> {
    scheduler.run_once().await?;

    let text = reconciler.render().await.context("Export failed")?;
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.flush())
        .context("Failed to write metrics to stdout")?;
    Ok(())
}
