mod config;
mod market;
mod reconcile;
mod report;
mod scheduler;
mod trader;

use anyhow::Result;
use clap::Parser;
use config::{Config, RawConfig, COOKIE_ENV};
use report::{join_tags, LogReporter, Reporter};
use scheduler::{Scheduler, StopReason, MIN_INTERVAL};
use std::env;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use trader::Trader;

const INTERRUPTED: i32 = 130;

/// Posts a Rolimons trade ad on a fixed schedule.
#[derive(Parser, Debug)]
#[command(name = "rolimons-bot", version, about)]
struct Args {
    /// Post a single ad and exit
    #[arg(long)]
    once: bool,

    /// Build the ad but never post it
    #[arg(long)]
    dry_run: bool,

    /// Print the reconciled inventory with offer markers and exit
    #[arg(long)]
    inventory: bool,

    /// Path to the TOML config file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let raw = RawConfig::load(&args.config)?;
    common::setup_env(raw.log_level());
    let config = raw.validate(env::var(COOKIE_ENV).ok())?;

    let settings = config.ad_settings(args.dry_run);
    let run_once = args.once || config.run_once;
    log_active_config(&config, settings.dry_run, run_once);

    let roblox = Arc::new(roblox::HttpClient::new()?);
    let rolimons = Arc::new(rolimons::HttpClient::new()?);
    let trader = Trader::new(roblox, rolimons.clone(), rolimons, settings);

    if args.inventory {
        return list_inventory(&trader).await;
    }

    let mut scheduler = Scheduler::new(trader, config.interval(), Arc::new(LogReporter));

    if run_once {
        let outcome = scheduler.run_once().await;
        return Ok(exit_code(outcome.is_success()));
    }

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    let reason = scheduler.run(cancel).await;
    log::debug!(
        "Scheduler ended in {:?} after {} cycle(s)",
        scheduler.state(),
        scheduler.cycles()
    );
    Ok(exit_code(reason != StopReason::Unrecoverable))
}

fn log_active_config(config: &Config, dry_run: bool, run_once: bool) {
    log::info!("Rolimons Trade Ad Bot v{}", env!("CARGO_PKG_VERSION"));
    log::info!("User ID: {}", config.user_id);
    log::info!("Profile: {}", rolimons::profile_url(config.user_id));
    log::info!("Offering: {} item(s)", config.offer_item_ids.len());
    log::info!("Requesting: {}", join_tags(&config.request_tags));

    if config.interval_below_minimum() {
        log::warn!(
            "interval_minutes = {} is below the Rolimons cooldown, using {} min",
            config.interval_minutes,
            MIN_INTERVAL.as_secs() / 60
        );
    }

    let schedule = if run_once {
        "single run".to_string()
    } else {
        format!("every {} min", config.interval().as_secs() / 60)
    };
    let mode = if dry_run { "dry run" } else { "live" };
    log::info!("Mode: {mode}, {schedule}");
}

async fn list_inventory(trader: &Trader) -> Result<ExitCode> {
    let (inventory, _) = match trader.load_inventory().await {
        Ok(loaded) => loaded,
        Err(outcome) => {
            LogReporter.outcome(&outcome);
            return Ok(ExitCode::FAILURE);
        }
    };

    println!(
        "{} tradeable, {} on hold",
        inventory.tradeable.len(),
        inventory.on_hold.len()
    );
    for line in inventory.render(&trader.settings().offer_item_ids) {
        println!("{line}");
    }
    Ok(ExitCode::SUCCESS)
}

/// The first Ctrl+C stops the loop at its next wait, a second one exits right away.
async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    if second_interrupt(tokio::signal::ctrl_c, &cancel).await {
        log::warn!("Second Ctrl+C received, exiting without waiting for the cycle");
        std::process::exit(INTERRUPTED);
    }
}

/// Cancels `cancel` on the first interrupt and returns true on the second.
async fn second_interrupt<F, Fut>(mut interrupt: F, cancel: &CancellationToken) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    loop {
        if let Err(e) = interrupt().await {
            log::error!("Failed to listen for Ctrl+C: {e}");
            return false;
        }
        if cancel.is_cancelled() {
            return true;
        }
        log::info!("Ctrl+C received, stopping after the current cycle (press again to force)");
        cancel.cancel();
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
