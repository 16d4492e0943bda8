//! Shared deficit loop for the single-shot action kinds (view, share).

use anyhow::{Context, Result};
use tracing::info;

use crate::handler::{ExecutionContext, HandlerReport};
use crate::pagination::accumulate_posts;
use crate::progress::live_progress;
use crate::task::Task;

#[derive(Debug, Clone, Copy)]
pub(crate) enum SimpleAction {
    View,
    Share,
}

impl SimpleAction {
    fn describe(self) -> &'static str {
        match self {
            SimpleAction::View => "view",
            SimpleAction::Share => "share",
        }
    }
}

/// Acts on exactly `min(deficit, posts found)` posts sequentially, pacing
/// between actions. Any action failure aborts the whole invocation. The
/// final progress read is advisory and only feeds the report.
pub(crate) async fn run_simple_action(
    task: &Task,
    ctx: &ExecutionContext<'_>,
    action: SimpleAction,
) -> Result<HandlerReport> {
    let live = live_progress(task, Some(ctx.gateway)).await;
    let deficit = task.required.saturating_sub(live);
    if deficit <= 0 {
        return Ok(HandlerReport {
            actions_issued: 0,
            confirmed: 0,
            final_progress: live,
        });
    }
    let deficit = usize::try_from(deficit).unwrap_or(usize::MAX);

    let posts = accumulate_posts(ctx.gateway, &ctx.page_pacer, deficit).await?;
    let mut issued = 0_usize;
    for post in posts.iter().take(deficit) {
        match action {
            SimpleAction::View => ctx.gateway.view_post(&post.id).await,
            SimpleAction::Share => ctx.gateway.share_post(&post.id).await,
        }
        .with_context(|| format!("{} action failed for post {}", action.describe(), post.id))?;
        issued += 1;
        ctx.action_pacer.pause().await;
    }

    let final_progress = live_progress(task, Some(ctx.gateway)).await;
    info!(
        account = %ctx.account_id,
        task = %task.display_name,
        issued,
        final_progress,
        "{} actions issued",
        action.describe()
    );
    Ok(HandlerReport {
        actions_issued: issued,
        confirmed: issued,
        final_progress,
    })
}
