//! Capability trait covering exactly the remote operations the execution
//! engine consumes.

use async_trait::async_trait;

use crate::envelope::GatewayError;
use crate::types::{ClaimOutcome, PostPage, TaskStatusPack};

/// The remote operations the task engine needs. Handlers and the scheduler
/// depend on this trait only; the HTTP transport is one implementation.
#[async_trait]
pub trait CommunityGateway: Send + Sync {
    /// Lists all daily tasks with their live progress counters.
    async fn fetch_task_status(&self) -> Result<TaskStatusPack, GatewayError>;

    /// Fetches one page of posts. `last_id` is the opaque cursor from the
    /// previous page; `None` requests the first page.
    async fn fetch_post_page(&self, last_id: Option<&str>) -> Result<PostPage, GatewayError>;

    /// Opens a post, advancing the view counter.
    async fn view_post(&self, post_id: &str) -> Result<(), GatewayError>;

    /// Shares a post, advancing the share counter.
    async fn share_post(&self, post_id: &str) -> Result<(), GatewayError>;

    /// Applies (`true`) or removes (`false`) a like on a post.
    async fn set_post_like(&self, post_id: &str, apply: bool) -> Result<(), GatewayError>;

    /// Claims the sign-in reward for the given day of month.
    async fn claim_day_reward(&self, day: u32) -> Result<ClaimOutcome, GatewayError>;

    /// Claims the reward attached to a completed task.
    async fn claim_task_reward(&self, task_id: &str) -> Result<ClaimOutcome, GatewayError>;
}
