//! Canonical task model.

/// The closed set of task kinds this client knows how to execute. Raw records
/// with any other kind string are dropped during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TaskKind {
    ViewPost,
    LikePost,
    SharePost,
}

impl TaskKind {
    /// Maps the server's kind string onto the canonical enum.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "view_post" => Some(TaskKind::ViewPost),
            "like_post" => Some(TaskKind::LikePost),
            "share_post" => Some(TaskKind::SharePost),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::ViewPost => "view_post",
            TaskKind::LikePost => "like_post",
            TaskKind::SharePost => "share_post",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Incomplete,
    Completed,
    Claimed,
}

impl TaskStatus {
    /// Maps the server's status integer. Unknown values are treated as
    /// incomplete; re-execution is harmless because every action path checks
    /// live progress first.
    pub fn from_wire(value: i64) -> Self {
        match value {
            1 => TaskStatus::Completed,
            2 => TaskStatus::Claimed,
            _ => TaskStatus::Incomplete,
        }
    }
}

/// One daily task. `required` and `progress` are server-authoritative
/// counters, preserved verbatim: `progress` may exceed `required` or be
/// negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub kind: TaskKind,
    pub display_name: String,
    pub required: i64,
    pub progress: i64,
    pub status: TaskStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_kind_mapping_is_closed() {
        assert_eq!(TaskKind::from_wire("view_post"), Some(TaskKind::ViewPost));
        assert_eq!(TaskKind::from_wire("like_post"), Some(TaskKind::LikePost));
        assert_eq!(TaskKind::from_wire("share_post"), Some(TaskKind::SharePost));
        assert_eq!(TaskKind::from_wire("watch_live"), None);
        assert_eq!(TaskKind::from_wire(""), None);
    }

    #[test]
    fn unknown_status_is_incomplete() {
        assert_eq!(TaskStatus::from_wire(0), TaskStatus::Incomplete);
        assert_eq!(TaskStatus::from_wire(1), TaskStatus::Completed);
        assert_eq!(TaskStatus::from_wire(2), TaskStatus::Claimed);
        assert_eq!(TaskStatus::from_wire(-1), TaskStatus::Incomplete);
        assert_eq!(TaskStatus::from_wire(99), TaskStatus::Incomplete);
    }
}
