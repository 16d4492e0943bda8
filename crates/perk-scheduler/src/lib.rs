//! Multi-account, multi-time-point scheduler.
//!
//! While running, one recurring timer exists per (enabled account, HH:MM
//! time) pair, each independently driving the full execution pipeline for its
//! account. Firings for different accounts may overlap freely; a second
//! firing for an account whose previous run is still in flight is skipped by
//! the busy guard.

use std::collections::HashSet;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use cron::Schedule;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use perk_core::{config::parse_schedule_time, AccountConfig, BotConfig, Pacer};
use perk_gateway::CommunityGateway;
use perk_runtime::run_account;


/// Provides the account/schedule configuration on start and reload.
pub trait ConfigStore: Send + Sync {
    fn load(&self) -> Result<BotConfig>;
}

/// Loads configuration from a TOML file on every start/reload.
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Result<BotConfig> {
        BotConfig::load(&self.path)
    }
}

/// Builds a gateway bound to one account's credential.
pub trait GatewayFactory: Send + Sync {
    fn gateway_for(&self, account: &AccountConfig) -> Result<Arc<dyn CommunityGateway>>;
}

struct TimerHandle {
    account_id: String,
    time: String,
    handle: JoinHandle<()>,
}

struct SchedulerInner {
    running: bool,
    timers: Vec<TimerHandle>,
}

/// Everything one firing needs, cloned into each timer task.
#[derive(Clone)]
struct FiringContext {
    account: AccountConfig,
    gateways: Arc<dyn GatewayFactory>,
    busy: Arc<Mutex<HashSet<String>>>,
    action_pacer: Pacer,
    page_pacer: Pacer,
}

pub struct Scheduler {
    store: Arc<dyn ConfigStore>,
    gateways: Arc<dyn GatewayFactory>,
    busy: Arc<Mutex<HashSet<String>>>,
    action_pacer: Pacer,
    page_pacer: Pacer,
    inner: Mutex<SchedulerInner>,
}

impl Scheduler {
    pub fn new(store: Arc<dyn ConfigStore>, gateways: Arc<dyn GatewayFactory>) -> Self {
        Self {
            store,
            gateways,
            busy: Arc::new(Mutex::new(HashSet::new())),
            action_pacer: Pacer::action(),
            page_pacer: Pacer::page(),
            inner: Mutex::new(SchedulerInner {
                running: false,
                timers: Vec::new(),
            }),
        }
    }

    pub fn with_pacers(mut self, action_pacer: Pacer, page_pacer: Pacer) -> Self {
        self.action_pacer = action_pacer;
        self.page_pacer = page_pacer;
        self
    }

    fn lock_inner(&self) -> MutexGuard<'_, SchedulerInner> {
        self.inner.lock().expect("scheduler state poisoned")
    }

    /// Starts one recurring timer per (enabled account, time) pair, plus an
    /// immediate one-shot run for accounts flagged `run_on_start`. A second
    /// `start()` while running is a no-op; with no enabled accounts the
    /// scheduler logs a warning and stays stopped.
    pub fn start(&self) -> Result<()> {
        let mut inner = self.lock_inner();
        if inner.running {
            info!("scheduler already running");
            return Ok(());
        }
        self.start_locked(&mut inner)
    }

    fn start_locked(&self, inner: &mut SchedulerInner) -> Result<()> {
        let config = self.store.load().context("failed to load configuration")?;
        let enabled: Vec<AccountConfig> = config.enabled_accounts().cloned().collect();
        if enabled.is_empty() {
            warn!("no enabled accounts configured, scheduler not started");
            return Ok(());
        }

        for account in enabled {
            let ctx = FiringContext {
                account: account.clone(),
                gateways: self.gateways.clone(),
                busy: self.busy.clone(),
                action_pacer: self.action_pacer,
                page_pacer: self.page_pacer,
            };
            if account.schedule.run_on_start {
                let once = ctx.clone();
                tokio::spawn(async move {
                    info!(account = %once.account.id, "run-on-start firing");
                    fire(&once).await;
                });
            }
            for time in &account.schedule.times {
                inner.timers.push(spawn_recurring(ctx.clone(), time.clone())?);
            }
        }
        inner.running = true;
        info!(timers = inner.timers.len(), "scheduler started");
        Ok(())
    }

    /// Cancels all pending timers. In-flight executions are detached tasks
    /// and run to completion. Idempotent.
    pub fn stop(&self) {
        let mut inner = self.lock_inner();
        if !inner.running {
            info!("scheduler already stopped");
            return;
        }
        for timer in inner.timers.drain(..) {
            timer.handle.abort();
        }
        inner.running = false;
        info!("scheduler stopped, pending timers cancelled");
    }

    /// Cancels all timers and rebuilds them from freshly loaded
    /// configuration, but only if the scheduler was already running; a
    /// stopped scheduler stays stopped.
    pub fn reload(&self) -> Result<()> {
        let mut inner = self.lock_inner();
        let was_running = inner.running;
        for timer in inner.timers.drain(..) {
            timer.handle.abort();
        }
        inner.running = false;
        if !was_running {
            info!("scheduler is stopped, reload will not start it");
            return Ok(());
        }
        self.start_locked(&mut inner)
    }

    /// Triggers a manual single run for one account, bypassing the timers.
    /// Fire-and-forget: the run is spawned and its result logged internally.
    /// Returns `None` without executing for unknown or disabled accounts.
    pub fn execute_account_now(&self, account_id: &str) -> Option<()> {
        let config = match self.store.load() {
            Ok(config) => config,
            Err(err) => {
                error!(error = %format!("{err:#}"), "failed to load configuration");
                return None;
            }
        };
        let account = config.account(account_id)?.clone();
        if !account.enabled {
            warn!(account = %account_id, "account is disabled, not executing");
            return None;
        }
        let ctx = FiringContext {
            account,
            gateways: self.gateways.clone(),
            busy: self.busy.clone(),
            action_pacer: self.action_pacer,
            page_pacer: self.page_pacer,
        };
        tokio::spawn(async move {
            info!(account = %ctx.account.id, "manual firing");
            fire(&ctx).await;
        });
        Some(())
    }

    pub fn is_running(&self) -> bool {
        self.lock_inner().running
    }

    pub fn active_timer_count(&self) -> usize {
        self.lock_inner().timers.len()
    }

    /// Read-only diagnostic dump: one line per timer with its next local
    /// fire time.
    pub fn show_status(&self) -> String {
        let inner = self.lock_inner();
        if !inner.running {
            return "scheduler: stopped".to_string();
        }
        let mut lines = vec![format!("scheduler: running ({} timers)", inner.timers.len())];
        for timer in &inner.timers {
            let next = daily_schedule(&timer.time)
                .ok()
                .and_then(|schedule| schedule.upcoming(Local).next())
                .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "unknown".to_string());
            lines.push(format!(
                "  account {} at {} (next fire {})",
                timer.account_id, timer.time, next
            ));
        }
        lines.join("\n")
    }
}

/// Turns an `HH:MM` entry into a daily cron rule evaluated in local time.
fn daily_schedule(time: &str) -> Result<Schedule> {
    let (hour, minute) = parse_schedule_time(time)?;
    Schedule::from_str(&format!("0 {minute} {hour} * * *"))
        .with_context(|| format!("failed to build daily rule for '{time}'"))
}

fn spawn_recurring(ctx: FiringContext, time: String) -> Result<TimerHandle> {
    let schedule = daily_schedule(&time)?;
    let account_id = ctx.account.id.clone();
    let timer_time = time.clone();
    let handle = tokio::spawn(async move {
        loop {
            let Some(next) = schedule.upcoming(Local).next() else {
                warn!(account = %ctx.account.id, time = %time, "daily rule has no future occurrence, timer exiting");
                break;
            };
            let wait = (next - Local::now()).to_std().unwrap_or(Duration::ZERO);
            tokio::time::sleep(wait).await;
            info!(account = %ctx.account.id, time = %time, "schedule fired");
            fire(&ctx).await;
        }
    });
    Ok(TimerHandle {
        account_id,
        time: timer_time,
        handle,
    })
}

/// Releases the busy slot even if the run path exits early.
struct BusyGuard {
    busy: Arc<Mutex<HashSet<String>>>,
    id: String,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.lock().expect("busy set poisoned").remove(&self.id);
    }
}

/// One firing: claim the busy slot, build the gateway, run the pipeline, log
/// the outcome. Nothing escapes past this boundary; the account's future
/// timers are never affected by a failed run.
async fn fire(ctx: &FiringContext) {
    let account_id = ctx.account.id.clone();
    {
        let mut busy = ctx.busy.lock().expect("busy set poisoned");
        if !busy.insert(account_id.clone()) {
            warn!(account = %account_id, "previous run still in flight, skipping this firing");
            return;
        }
    }
    let _guard = BusyGuard {
        busy: ctx.busy.clone(),
        id: account_id.clone(),
    };

    match ctx.gateways.gateway_for(&ctx.account) {
        Ok(gateway) => {
            let result = run_account(
                &ctx.account,
                gateway.as_ref(),
                ctx.action_pacer,
                ctx.page_pacer,
            )
            .await;
            if result.success {
                info!(
                    account = %account_id,
                    duration_ms = result.finished_unix_ms.saturating_sub(result.started_unix_ms),
                    "scheduled run succeeded"
                );
            } else {
                warn!(
                    account = %account_id,
                    error = result.error.as_deref().unwrap_or("unknown"),
                    "scheduled run failed"
                );
            }
        }
        Err(err) => {
            error!(account = %account_id, error = %format!("{err:#}"), "could not build gateway for account");
        }
    }
}
