//! Wire-level records decoded out of operation packs.

use serde::Deserialize;

/// Pack payload of the task-status operation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskStatusPack {
    #[serde(default)]
    pub tasks: Vec<RawTask>,
    /// Account currency balance; optional, used for run statistics only.
    #[serde(default)]
    pub coins: i64,
}

/// One raw task record as the server reports it. `progress` is
/// server-authoritative and may exceed `required` or be negative; it is
/// preserved verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTask {
    pub id: String,
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub required: i64,
    #[serde(default)]
    pub progress: i64,
    #[serde(default)]
    pub status: i64,
}

/// Pack payload of one post-list page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostPage {
    #[serde(default)]
    pub posts: Vec<RawPost>,
    /// Opaque cursor for the next page; absent or empty when exhausted.
    #[serde(default)]
    pub last_id: Option<String>,
}

impl PostPage {
    /// Cursor for the next page, with the server's empty-string spelling of
    /// "no more pages" normalized away.
    pub fn next_cursor(&self) -> Option<&str> {
        self.last_id.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPost {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub liked: bool,
}

/// Pack payload of the reward-claim operations.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ClaimOutcome {
    #[serde(default)]
    pub coins: i64,
}
