//! Migration Forensics CLI
//!
//! Subcommands:
//! - report: pre/post migration slippage for one trade size
//! - matrix: the same comparison across several sizes
//! - audit:  fee vs. rebate capital flow over a bonding lifecycle
//! - watch:  live logsSubscribe on the migration program, one line per graduation
//!
//! Exits non-zero on any error, including a subscription failure once the
//! reconnect budget (`watcher.max_reconnects`) is spent.
//!
//! Created: 2026-10-17

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use migration_forensics::config::AppConfig;
use migration_forensics::error::ForensicsError;
use migration_forensics::migration::{
    KeywordPreset, LogSubscription, MigrationWatcher, WsLogSubscription,
};
use migration_forensics::types::ProtocolParams;
use migration_forensics::{audit_lifecycle, impact_matrix, report, summarize, DetectionAlerter};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Bonding-curve migration forensics (Solana)
#[derive(Parser)]
#[command(name = "migration-forensics", version)]
struct Args {
    /// TOML config file (defaults to config/forensics.toml when present)
    #[arg(short, long, env = "FORENSICS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Liquidity compression report for one buy
    Report {
        /// Trade size in SOL
        #[arg(long, default_value_t = 1.0)]
        sol_in: f64,
    },
    /// Impact comparison across trade sizes
    Matrix {
        /// Comma-separated trade sizes in SOL
        #[arg(long, value_delimiter = ',', default_values_t = vec![0.5, 1.0, 5.0, 10.0])]
        sizes: Vec<f64>,
    },
    /// Shadow tax audit of a bonding lifecycle
    Audit {
        /// Bonding-curve volume in SOL (defaults to audit.default_volume)
        #[arg(long)]
        volume: Option<f64>,
    },
    /// Watch the migration program for graduation transactions
    Watch(WatchArgs),
}

#[derive(clap::Args)]
struct WatchArgs {
    /// Keyword preset (graduation, broad)
    #[arg(long)]
    preset: Option<KeywordPreset>,

    /// Custom keyword; repeatable, replaces the preset
    #[arg(long = "keyword")]
    keywords: Vec<String>,

    /// RPC WebSocket endpoint
    #[arg(long)]
    ws_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;
    config.apply_env();

    // RUST_LOG wins over the config file
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level)),
        )
        .init();

    if let Command::Watch(watch_args) = &args.command {
        apply_watch_args(&mut config, watch_args);
    }
    config.validate().context("Invalid configuration")?;

    match args.command {
        Command::Report { sol_in } => {
            let summary = summarize(&config.protocol, sol_in)
                .with_context(|| format!("Impact report failed for {} SOL", sol_in))?;
            print!("{}", report::render_impact_report(&summary, &config.protocol));
        }
        Command::Matrix { sizes } => {
            let rows = impact_matrix(&config.protocol, &sizes).context("Impact matrix failed")?;
            print!("{}", report::render_matrix(&rows));
        }
        Command::Audit { volume } => {
            let volume = volume.unwrap_or(config.audit.default_volume);
            let audit = audit_lifecycle(&config.protocol, &config.fee_schedule()?, volume)
                .with_context(|| format!("Shadow tax audit failed for {} SOL volume", volume))?;
            print!("{}", report::render_audit(&audit));
        }
        Command::Watch(_) => run_watch(&config).await?,
    }

    Ok(())
}

fn apply_watch_args(config: &mut AppConfig, args: &WatchArgs) {
    if let Some(preset) = args.preset {
        config.watcher.preset = preset;
        // An explicit preset on the command line beats keywords from the file
        config.watcher.keywords.clear();
    }
    if !args.keywords.is_empty() {
        config.watcher.keywords = args.keywords.clone();
    }
    if let Some(url) = &args.ws_url {
        config.watcher.ws_url = url.clone();
    }
}

async fn run_watch(config: &AppConfig) -> Result<()> {
    let classifier = config.classifier()?;
    let cancel = CancellationToken::new();

    // SIGINT/SIGTERM -> cooperative cancellation
    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    let signals_handle = signals.handle();
    let signal_cancel = cancel.clone();
    let signal_task = tokio::spawn(async move {
        if let Some(sig) = signals.next().await {
            info!(signal = sig, "Received shutdown signal - stopping watch");
            signal_cancel.cancel();
        }
    });

    info!(
        program = %config.protocol.migration_program,
        keywords = ?classifier.keywords(),
        "Monitoring migration events"
    );

    let watcher = MigrationWatcher::new(classifier, cancel.clone());
    let subscription = WsLogSubscription::new(
        config.watcher.ws_url.clone(),
        config.protocol.migration_program.clone(),
        config.watcher.commitment.clone(),
    );
    let alerter = DetectionAlerter::new(config.watcher.discord_webhook.clone());

    let mut reconnects = 0u32;
    let outcome = loop {
        match watch_session(&watcher, &subscription, &alerter, &config.protocol, &cancel).await {
            Ok(()) => break Ok(()),
            Err(e) if cancel.is_cancelled() => {
                warn!(error = %e, "Error during shutdown ignored");
                break Ok(());
            }
            Err(e) if reconnects >= config.watcher.max_reconnects => {
                error!(error = %e, reconnects, "Watch failed, reconnect budget spent");
                break Err(e);
            }
            Err(e) => {
                reconnects += 1;
                warn!(
                    error = %e,
                    attempt = reconnects,
                    max = config.watcher.max_reconnects,
                    "Subscription failed - reconnecting in {}s",
                    config.watcher.reconnect_delay_secs
                );
                tokio::select! {
                    _ = cancel.cancelled() => break Ok(()),
                    _ = tokio::time::sleep(Duration::from_secs(config.watcher.reconnect_delay_secs)) => {}
                }
            }
        }
    };

    let stats = watcher.stats();
    info!(
        received = stats.received(),
        malformed = stats.malformed(),
        detections = stats.detections(),
        "Watch stopped"
    );

    signals_handle.close();
    signal_task.abort();

    outcome.context("Migration watch ended with a subscription failure")
}

/// One subscription lifetime. Ok on close or cancellation, Err on failure.
async fn watch_session(
    watcher: &MigrationWatcher,
    subscription: &WsLogSubscription,
    alerter: &DetectionAlerter,
    params: &ProtocolParams,
    cancel: &CancellationToken,
) -> std::result::Result<(), ForensicsError> {
    let stream = tokio::select! {
        _ = cancel.cancelled() => return Ok(()),
        stream = subscription.subscribe() => stream?,
    };

    let mut detections = Box::pin(watcher.watch(stream));
    while let Some(item) = detections.next().await {
        let event = item?;
        println!("\n{}", report::detection_line(&event, params));
        alerter.send_detection(&event, params).await;
    }

    Ok(())
}
