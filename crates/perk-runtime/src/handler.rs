//! Action handler protocol.

use anyhow::Result;
use async_trait::async_trait;

use perk_core::Pacer;
use perk_gateway::CommunityGateway;

use crate::handlers::{LikePostHandler, SharePostHandler, ViewPostHandler};
use crate::progress::live_progress;
use crate::task::{Task, TaskKind};

/// Everything a handler needs to act for one account: the gateway bound to
/// that account's credential and the pacing profiles. Injected explicitly;
/// nothing is process-global.
pub struct ExecutionContext<'a> {
    pub account_id: &'a str,
    pub gateway: &'a dyn CommunityGateway,
    pub action_pacer: Pacer,
    pub page_pacer: Pacer,
}

/// Outcome of one handler invocation, for logging and run statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandlerReport {
    pub actions_issued: usize,
    pub confirmed: usize,
    pub final_progress: i64,
}

#[async_trait]
pub trait TaskHandler: Send + Sync {
    fn can_handle(&self, kind: TaskKind) -> bool;

    async fn execute(&self, task: &Task, ctx: &ExecutionContext<'_>) -> Result<HandlerReport>;

    /// Live progress for `task`. Without a gateway this returns the cached
    /// `progress` field verbatim; with one, lookup failures also fall back to
    /// the cached value.
    async fn get_progress(&self, task: &Task, gateway: Option<&dyn CommunityGateway>) -> i64 {
        live_progress(task, gateway).await
    }
}

/// The registered handlers, one per action kind.
pub struct HandlerSet {
    handlers: Vec<Box<dyn TaskHandler>>,
}

impl Default for HandlerSet {
    fn default() -> Self {
        Self {
            handlers: vec![
                Box::new(ViewPostHandler),
                Box::new(LikePostHandler),
                Box::new(SharePostHandler),
            ],
        }
    }
}

impl HandlerSet {
    pub fn resolve(&self, kind: TaskKind) -> Option<&dyn TaskHandler> {
        self.handlers
            .iter()
            .find(|handler| handler.can_handle(kind))
            .map(|handler| handler.as_ref())
    }
}
