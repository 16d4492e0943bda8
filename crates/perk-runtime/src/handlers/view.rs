use anyhow::Result;
use async_trait::async_trait;

use crate::handler::{ExecutionContext, HandlerReport, TaskHandler};
use crate::handlers::simple::{run_simple_action, SimpleAction};
use crate::task::{Task, TaskKind};

/// Handles the view-post task: open enough posts to cover the deficit.
pub struct ViewPostHandler;

#[async_trait]
impl TaskHandler for ViewPostHandler {
    fn can_handle(&self, kind: TaskKind) -> bool {
        kind == TaskKind::ViewPost
    }

    async fn execute(&self, task: &Task, ctx: &ExecutionContext<'_>) -> Result<HandlerReport> {
        run_simple_action(task, ctx, SimpleAction::View).await
    }
}
