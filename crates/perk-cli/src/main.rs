//! `perk` command-line entry point.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use perk_core::{AccountConfig, BotConfig, Pacer, ServiceConfig};
use perk_gateway::{CommunityGateway, HttpGateway};
use perk_runtime::run_account;
use perk_scheduler::{FileConfigStore, GatewayFactory, Scheduler};

#[derive(Parser)]
#[command(
    name = "perk",
    about = "Daily-task automation for game-community accounts",
    version
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "perk.toml", env = "PERK_CONFIG")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the scheduler and run until interrupted.
    Run,
    /// Execute one account immediately, bypassing the scheduler.
    Once {
        /// Account id from the configuration file.
        #[arg(long)]
        account: String,
    },
    /// Print the schedule without starting any timers.
    Status,
    /// Validate the configuration file.
    CheckConfig,
}

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

struct HttpGatewayFactory {
    service: ServiceConfig,
}

impl GatewayFactory for HttpGatewayFactory {
    fn gateway_for(&self, account: &AccountConfig) -> Result<Arc<dyn CommunityGateway>> {
        let gateway = HttpGateway::new(
            &self.service.base_url,
            &account.credential,
            self.service.request_timeout_ms,
        )
        .context("failed to build http gateway")?;
        Ok(Arc::new(gateway))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Run => run_scheduler(&cli.config).await,
        Command::Once { account } => run_once(&cli.config, &account).await,
        Command::Status => show_schedule(&cli.config),
        Command::CheckConfig => check_config(&cli.config),
    }
}

async fn run_scheduler(config_path: &Path) -> Result<()> {
    let config = BotConfig::load(config_path)?;
    let scheduler = Scheduler::new(
        Arc::new(FileConfigStore::new(config_path)),
        Arc::new(HttpGatewayFactory {
            service: config.service.clone(),
        }),
    );
    scheduler.start()?;
    if !scheduler.is_running() {
        warn!("nothing to schedule, exiting");
        return Ok(());
    }
    println!("{}", scheduler.show_status());

    tokio::signal::ctrl_c()
        .await
        .context("failed to wait for ctrl-c")?;
    info!("interrupt received, shutting down");
    scheduler.stop();
    Ok(())
}

async fn run_once(config_path: &Path, account_id: &str) -> Result<()> {
    let config = BotConfig::load(config_path)?;
    let Some(account) = config.account(account_id) else {
        bail!("unknown account '{account_id}'");
    };
    if !account.enabled {
        bail!("account '{account_id}' is disabled");
    }
    let gateway = HttpGateway::new(
        &config.service.base_url,
        &account.credential,
        config.service.request_timeout_ms,
    )?;
    let result = run_account(account, &gateway, Pacer::action(), Pacer::page()).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}

fn show_schedule(config_path: &Path) -> Result<()> {
    let config = BotConfig::load(config_path)?;
    for account in config.enabled_accounts() {
        let run_on_start = if account.schedule.run_on_start {
            " (+run on start)"
        } else {
            ""
        };
        println!(
            "account {}: {}{}",
            account.id,
            account.schedule.times.join(", "),
            run_on_start
        );
    }
    Ok(())
}

fn check_config(config_path: &Path) -> Result<()> {
    let config = BotConfig::load(config_path)?;
    let accounts = config.accounts.len();
    let enabled = config.enabled_accounts().count();
    let timers: usize = config
        .enabled_accounts()
        .map(|account| account.schedule.times.len())
        .sum();
    println!("configuration ok: {accounts} accounts ({enabled} enabled), {timers} daily timers");
    Ok(())
}
