//! The like-post handler: optimistic-action-then-confirm with a dual
//! candidate strategy for scarce post pools.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::handler::{ExecutionContext, HandlerReport, TaskHandler};
use crate::pagination::{accumulate_posts, Post};
use crate::progress::live_progress;
use crate::task::{Task, TaskKind};

/// Handles the like-post task.
///
/// The service may report success while the task counter stays put (rate
/// limiting, an already-counted post), so every action is confirmed against
/// authoritative progress: read before, act, pace, read after, and count the
/// action only when the counter advanced. When the untouched pool runs out
/// before the deficit is met, already-liked posts are cycled (un-like, then
/// re-like) to produce fresh counter events.
pub struct LikePostHandler;

#[async_trait]
impl TaskHandler for LikePostHandler {
    fn can_handle(&self, kind: TaskKind) -> bool {
        kind == TaskKind::LikePost
    }

    async fn execute(&self, task: &Task, ctx: &ExecutionContext<'_>) -> Result<HandlerReport> {
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

        // Resource discovery is the only fatal step in this handler.
        let posts = accumulate_posts(ctx.gateway, &ctx.page_pacer, deficit)
            .await
            .context("like handler could not discover any posts")?;

        let mut issued = 0_usize;
        let mut confirmed = 0_usize;

        self.like_untouched(task, ctx, &posts, deficit, &mut issued, &mut confirmed)
            .await;
        if confirmed < deficit {
            self.cycle_already_liked(task, ctx, &posts, deficit, &mut issued, &mut confirmed)
                .await;
        }

        if confirmed < deficit {
            info!(
                account = %ctx.account_id,
                task = %task.display_name,
                confirmed,
                deficit,
                "like candidates exhausted before the deficit was met"
            );
        }
        let final_progress = live_progress(task, Some(ctx.gateway)).await;
        Ok(HandlerReport {
            actions_issued: issued,
            confirmed,
            final_progress,
        })
    }
}

impl LikePostHandler {
    /// Strategy 1: like posts not liked yet. Per-candidate failures skip to
    /// the next post; the candidate index advances regardless of outcome.
    async fn like_untouched(
        &self,
        task: &Task,
        ctx: &ExecutionContext<'_>,
        posts: &[Post],
        deficit: usize,
        issued: &mut usize,
        confirmed: &mut usize,
    ) {
        for post in posts.iter().filter(|post| !post.liked) {
            if *confirmed >= deficit {
                break;
            }
            let before = live_progress(task, Some(ctx.gateway)).await;
            *issued += 1;
            if let Err(err) = ctx.gateway.set_post_like(&post.id, true).await {
                warn!(account = %ctx.account_id, post = %post.id, error = %err, "like failed, skipping post");
                continue;
            }
            ctx.action_pacer.pause().await;
            let after = live_progress(task, Some(ctx.gateway)).await;
            if after > before {
                *confirmed += 1;
            } else {
                debug!(post = %post.id, "like accepted but the task counter did not advance");
            }
        }
    }

    /// Strategy 2: un-like and re-like posts that were already liked. Once
    /// untouched posts run out, toggling is the only remaining way to produce
    /// a counter-incrementing event. A failure in either half of the toggle
    /// pair skips the candidate.
    async fn cycle_already_liked(
        &self,
        task: &Task,
        ctx: &ExecutionContext<'_>,
        posts: &[Post],
        deficit: usize,
        issued: &mut usize,
        confirmed: &mut usize,
    ) {
        let recycled: Vec<&Post> = posts.iter().filter(|post| post.liked).collect();
        if recycled.is_empty() {
            return;
        }
        info!(
            account = %ctx.account_id,
            task = %task.display_name,
            remaining = deficit - *confirmed,
            candidates = recycled.len(),
            "cycling already-liked posts to finish the deficit"
        );
        for post in recycled {
            if *confirmed >= deficit {
                break;
            }
            let before = live_progress(task, Some(ctx.gateway)).await;
            *issued += 1;
            if let Err(err) = ctx.gateway.set_post_like(&post.id, false).await {
                warn!(account = %ctx.account_id, post = %post.id, error = %err, "un-like failed, skipping post");
                continue;
            }
            ctx.action_pacer.pause().await;
            if let Err(err) = ctx.gateway.set_post_like(&post.id, true).await {
                warn!(account = %ctx.account_id, post = %post.id, error = %err, "re-like failed, skipping post");
                continue;
            }
            ctx.action_pacer.pause().await;
            let after = live_progress(task, Some(ctx.gateway)).await;
            if after > before {
                *confirmed += 1;
            } else {
                debug!(post = %post.id, "like cycle completed but the task counter did not advance");
            }
        }
    }
}
