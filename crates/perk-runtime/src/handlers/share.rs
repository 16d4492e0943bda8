use anyhow::Result;
use async_trait::async_trait;

use crate::handler::{ExecutionContext, HandlerReport, TaskHandler};
use crate::handlers::simple::{run_simple_action, SimpleAction};
use crate::task::{Task, TaskKind};

/// Handles the share-post task; same deficit loop as viewing, against the
/// share endpoint.
pub struct SharePostHandler;

#[async_trait]
impl TaskHandler for SharePostHandler {
    fn can_handle(&self, kind: TaskKind) -> bool {
        kind == TaskKind::SharePost
    }

    async fn execute(&self, task: &Task, ctx: &ExecutionContext<'_>) -> Result<HandlerReport> {
        run_simple_action(task, ctx, SimpleAction::Share).await
    }
}
