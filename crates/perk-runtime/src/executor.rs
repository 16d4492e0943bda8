//! Per-account execution pipeline.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{error, info, warn};

use perk_core::{current_unix_timestamp_ms, AccountConfig, Pacer};
use perk_gateway::{CommunityGateway, TaskStatusPack};

use crate::handler::{ExecutionContext, HandlerSet};
use crate::normalize::normalize_tasks;
use crate::optimize::{calculate_task_completion, optimize_task_execution};
use crate::rewards::claim_rewards;

/// Result of one scheduled or manual firing for one account.
#[derive(Debug, Clone, Serialize)]
pub struct AccountRunResult {
    pub account_id: String,
    pub success: bool,
    pub started_unix_ms: u64,
    pub finished_unix_ms: u64,
    pub error: Option<String>,
    pub stats: Option<RunStats>,
}

/// Best-effort run statistics; sub-failures zero the affected fields rather
/// than failing the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub tasks_executed: usize,
    pub tasks_predicted_complete: usize,
    pub actions_confirmed: usize,
    pub rewards_claimed: usize,
    pub coins_delta: i64,
}

/// Runs the full pipeline for one account: fetch and normalize tasks,
/// optimize into kind groups, execute each group's representative, then
/// claim rewards. Fatal errors are captured into the result; nothing
/// escalates past the account boundary.
pub async fn run_account(
    account: &AccountConfig,
    gateway: &dyn CommunityGateway,
    action_pacer: Pacer,
    page_pacer: Pacer,
) -> AccountRunResult {
    let started_unix_ms = current_unix_timestamp_ms();
    info!(account = %account.id, "starting daily task run");
    match run_pipeline(account, gateway, action_pacer, page_pacer).await {
        Ok(stats) => {
            info!(
                account = %account.id,
                tasks = stats.tasks_executed,
                predicted = stats.tasks_predicted_complete,
                rewards = stats.rewards_claimed,
                coins = stats.coins_delta,
                "daily task run finished"
            );
            AccountRunResult {
                account_id: account.id.clone(),
                success: true,
                started_unix_ms,
                finished_unix_ms: current_unix_timestamp_ms(),
                error: None,
                stats: Some(stats),
            }
        }
        Err(err) => {
            error!(account = %account.id, error = %format!("{err:#}"), "daily task run failed");
            AccountRunResult {
                account_id: account.id.clone(),
                success: false,
                started_unix_ms,
                finished_unix_ms: current_unix_timestamp_ms(),
                error: Some(format!("{err:#}")),
                stats: None,
            }
        }
    }
}

async fn run_pipeline(
    account: &AccountConfig,
    gateway: &dyn CommunityGateway,
    action_pacer: Pacer,
    page_pacer: Pacer,
) -> Result<RunStats> {
    let status = gateway
        .fetch_task_status()
        .await
        .context("failed to fetch task status")?;
    let coins_before = status.coins;
    let tasks = normalize_tasks(&status);
    let groups = optimize_task_execution(&tasks);
    info!(
        account = %account.id,
        tasks = tasks.len(),
        groups = groups.len(),
        "task list normalized"
    );

    let handlers = HandlerSet::default();
    let ctx = ExecutionContext {
        account_id: &account.id,
        gateway,
        action_pacer,
        page_pacer,
    };

    let mut stats = RunStats::default();
    for group in &groups {
        let representative = group.representative();
        let Some(handler) = handlers.resolve(group.kind) else {
            warn!(kind = group.kind.as_str(), "no handler registered for task kind");
            continue;
        };
        let predicted = calculate_task_completion(&group.tasks, representative);
        let report = handler
            .execute(representative, &ctx)
            .await
            .with_context(|| format!("failed to execute task '{}'", representative.display_name))?;
        info!(
            account = %account.id,
            task = %representative.display_name,
            issued = report.actions_issued,
            confirmed = report.confirmed,
            progress = report.final_progress,
            "task executed"
        );
        stats.tasks_executed += 1;
        stats.actions_confirmed += report.confirmed;
        for task in &predicted {
            info!(account = %account.id, task = %task.display_name, "predicted complete as a byproduct");
        }
        stats.tasks_predicted_complete += predicted.len();
    }

    // Fresh status for reward claiming and the coins delta; a failed refetch
    // degrades to claiming the day reward only.
    let after: Option<TaskStatusPack> = match gateway.fetch_task_status().await {
        Ok(pack) => Some(pack),
        Err(err) => {
            warn!(account = %account.id, error = %err, "post-run status fetch failed, stats will be partial");
            None
        }
    };
    let completed = after
        .as_ref()
        .map(|pack| normalize_tasks(pack))
        .unwrap_or_default();
    let summary = claim_rewards(&account.id, gateway, &action_pacer, &completed).await?;
    stats.rewards_claimed = summary.rewards_claimed;
    stats.coins_delta =
        summary.coins_delta + after.map(|pack| pack.coins - coins_before).unwrap_or(0);

    Ok(stats)
}
