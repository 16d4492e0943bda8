//! Advisory live-progress lookup.

use perk_gateway::CommunityGateway;
use tracing::debug;

use crate::task::Task;

/// Reads the task's live progress from the service, falling back to the
/// cached value on any failure (transport, domain, or a missing task id).
/// Progress lookups are advisory and must never abort an action loop.
pub async fn live_progress(task: &Task, gateway: Option<&dyn CommunityGateway>) -> i64 {
    let Some(gateway) = gateway else {
        return task.progress;
    };
    match gateway.fetch_task_status().await {
        Ok(pack) => match pack.tasks.iter().find(|raw| raw.id == task.id) {
            Some(raw) => raw.progress,
            None => {
                debug!(task = %task.id, "task missing from live status, using cached progress");
                task.progress
            }
        },
        Err(err) => {
            debug!(task = %task.id, error = %err, "live progress lookup failed, using cached progress");
            task.progress
        }
    }
}
