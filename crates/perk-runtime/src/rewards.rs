//! Reward collection, invoked once per account run.

use anyhow::{Context, Result};
use tracing::{debug, info};

use perk_core::{local_day_of_month, Pacer};
use perk_gateway::CommunityGateway;

use crate::task::{Task, TaskStatus};

/// What reward claiming collected this run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewardSummary {
    pub rewards_claimed: usize,
    pub coins_delta: i64,
}

/// Claims the current day's sign-in reward plus the reward of every completed
/// task. Already-collected rewards answer with a dedicated domain code and
/// are skipped; any other failure is fatal.
pub async fn claim_rewards(
    account_id: &str,
    gateway: &dyn CommunityGateway,
    pacer: &Pacer,
    tasks: &[Task],
) -> Result<RewardSummary> {
    let mut summary = RewardSummary::default();

    match gateway.claim_day_reward(local_day_of_month()).await {
        Ok(outcome) => {
            summary.rewards_claimed += 1;
            summary.coins_delta += outcome.coins;
            info!(account = %account_id, coins = outcome.coins, "day reward claimed");
        }
        Err(err) if err.is_already_claimed() => {
            debug!(account = %account_id, "day reward already claimed");
        }
        Err(err) => return Err(err).context("failed to claim day reward"),
    }

    for task in tasks.iter().filter(|task| task.status == TaskStatus::Completed) {
        pacer.pause().await;
        match gateway.claim_task_reward(&task.id).await {
            Ok(outcome) => {
                summary.rewards_claimed += 1;
                summary.coins_delta += outcome.coins;
                info!(
                    account = %account_id,
                    task = %task.display_name,
                    coins = outcome.coins,
                    "task reward claimed"
                );
            }
            Err(err) if err.is_already_claimed() => {
                debug!(account = %account_id, task = %task.display_name, "task reward already claimed");
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to claim reward for task '{}'", task.display_name)
                })
            }
        }
    }

    Ok(summary)
}
