//! Shared pagination accumulator for actionable posts.

use std::collections::HashSet;

use anyhow::{Context, Result};
use perk_core::Pacer;
use perk_gateway::CommunityGateway;
use tracing::warn;

/// Hard ceiling on pages fetched per accumulation, so a server that never
/// stops returning cursors cannot trap the loop.
pub const MAX_PAGES: usize = 10;

/// Extra total-count headroom kept beyond the untouched target; the like
/// handler's second strategy feeds on already-liked posts.
const TOTAL_MARGIN_FACTOR: usize = 5;

/// One actionable post. `liked` reflects the prior like state reported by
/// the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub liked: bool,
}

/// Fetches successive pages until enough posts are collected: stops once the
/// untouched count reaches `need`, the total reaches `need * 5`, the server
/// stops returning a cursor, or the page ceiling is hit. A failed page fetch
/// ends accumulation with whatever was gathered; when nothing was ever
/// gathered the failure propagates as "no resources available".
pub async fn accumulate_posts(
    gateway: &dyn CommunityGateway,
    pacer: &Pacer,
    need: usize,
) -> Result<Vec<Post>> {
    let mut posts: Vec<Post> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0_usize;

    while pages < MAX_PAGES {
        let page = match gateway.fetch_post_page(cursor.as_deref()).await {
            Ok(page) => page,
            Err(err) => {
                if posts.is_empty() {
                    return Err(err).context("failed to fetch any post page");
                }
                warn!(error = %err, pages, "post page fetch failed, stopping with partial pool");
                break;
            }
        };
        pages += 1;

        let next_cursor = page.next_cursor().map(|c| c.to_string());
        for raw in page.posts {
            if seen.insert(raw.id.clone()) {
                posts.push(Post {
                    id: raw.id,
                    title: raw.title,
                    liked: raw.liked,
                });
            }
        }

        let untouched = posts.iter().filter(|post| !post.liked).count();
        if untouched >= need {
            break;
        }
        if posts.len() >= need.saturating_mul(TOTAL_MARGIN_FACTOR) {
            break;
        }
        let Some(next) = next_cursor else {
            break;
        };
        cursor = Some(next);
        pacer.pause().await;
    }

    Ok(posts)
}
