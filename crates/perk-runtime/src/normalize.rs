//! Raw task records to canonical tasks.

use perk_gateway::TaskStatusPack;
use tracing::debug;

use crate::task::{Task, TaskKind, TaskStatus};

/// Converts the status pack's raw records into canonical tasks. Records whose
/// kind string has no mapping are silently excluded; the server may ship
/// kinds this client does not implement yet.
pub fn normalize_tasks(pack: &TaskStatusPack) -> Vec<Task> {
    let mut tasks = Vec::with_capacity(pack.tasks.len());
    for raw in &pack.tasks {
        let Some(kind) = TaskKind::from_wire(&raw.kind) else {
            debug!(task = %raw.id, kind = %raw.kind, "dropping task with unrecognized kind");
            continue;
        };
        tasks.push(Task {
            id: raw.id.clone(),
            kind,
            display_name: raw.name.clone(),
            required: raw.required,
            progress: raw.progress,
            status: TaskStatus::from_wire(raw.status),
        });
    }
    tasks
}
