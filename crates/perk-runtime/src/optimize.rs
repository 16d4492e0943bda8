//! Cross-task execution optimization.
//!
//! All tasks of one kind share a single underlying server counter, so
//! satisfying the largest task's deficit advances every smaller tier of the
//! same kind at the same time. The optimizer therefore executes only one
//! representative task per kind and predicts the rest.

use std::collections::BTreeMap;

use crate::task::{Task, TaskKind, TaskStatus};

/// Non-completed tasks of one kind, sorted by `required` descending. The
/// head is the representative task the handler executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskGroup {
    pub kind: TaskKind,
    pub tasks: Vec<Task>,
}

impl TaskGroup {
    pub fn representative(&self) -> &Task {
        &self.tasks[0]
    }
}

/// Groups actionable tasks by kind. Completed and claimed tasks are
/// excluded, as are whole groups whose representative has no deficit left.
/// At most one group per kind is ever returned, so no kind's handler runs
/// more than once per run.
pub fn optimize_task_execution(tasks: &[Task]) -> Vec<TaskGroup> {
    let mut by_kind: BTreeMap<TaskKind, Vec<Task>> = BTreeMap::new();
    for task in tasks {
        if task.status != TaskStatus::Incomplete {
            continue;
        }
        by_kind.entry(task.kind).or_default().push(task.clone());
    }

    let mut groups = Vec::with_capacity(by_kind.len());
    for (kind, mut members) in by_kind {
        members.sort_by(|a, b| b.required.cmp(&a.required));
        if members[0].required <= members[0].progress {
            continue;
        }
        groups.push(TaskGroup { kind, tasks: members });
    }
    groups
}

/// Predicts which other tasks in a group complete as a byproduct of
/// satisfying `max_task`'s deficit. Pure function of its arguments: returned
/// tasks have their progress advanced by the deficit, clamped to their own
/// `required`, and their status set to completed.
pub fn calculate_task_completion(tasks: &[Task], max_task: &Task) -> Vec<Task> {
    let deficit = max_task.required.saturating_sub(max_task.progress).max(0);
    let mut predicted = Vec::new();
    for task in tasks {
        if task.id == max_task.id {
            continue;
        }
        if task.progress.saturating_add(deficit) >= task.required {
            let mut completed = task.clone();
            completed.progress = completed
                .required
                .min(completed.progress.saturating_add(deficit));
            completed.status = TaskStatus::Completed;
            predicted.push(completed);
        }
    }
    predicted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, kind: TaskKind, required: i64, progress: i64, status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            kind,
            display_name: format!("task {id}"),
            required,
            progress,
            status,
        }
    }

    #[test]
    fn groups_never_contain_completed_tasks() {
        let tasks = vec![
            task("a", TaskKind::LikePost, 10, 2, TaskStatus::Incomplete),
            task("b", TaskKind::LikePost, 5, 5, TaskStatus::Completed),
            task("c", TaskKind::LikePost, 3, 3, TaskStatus::Claimed),
            task("d", TaskKind::ViewPost, 3, 0, TaskStatus::Incomplete),
        ];
        let groups = optimize_task_execution(&tasks);
        for group in &groups {
            for member in &group.tasks {
                assert_eq!(member.status, TaskStatus::Incomplete);
            }
        }
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn representative_is_largest_required() {
        let tasks = vec![
            task("small", TaskKind::LikePost, 3, 0, TaskStatus::Incomplete),
            task("large", TaskKind::LikePost, 10, 0, TaskStatus::Incomplete),
            task("mid", TaskKind::LikePost, 5, 0, TaskStatus::Incomplete),
        ];
        let groups = optimize_task_execution(&tasks);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].representative().id, "large");
        let required: Vec<i64> = groups[0].tasks.iter().map(|t| t.required).collect();
        assert_eq!(required, vec![10, 5, 3]);
    }

    #[test]
    fn satisfied_representative_skips_whole_group() {
        let tasks = vec![
            task("a", TaskKind::ViewPost, 3, 3, TaskStatus::Incomplete),
            task("b", TaskKind::ViewPost, 2, 0, TaskStatus::Incomplete),
        ];
        // Representative (required 3) already has progress 3: deficit 0, the
        // shared counter cannot be advanced for "b" either.
        assert!(optimize_task_execution(&tasks).is_empty());
    }

    #[test]
    fn overshoot_progress_also_skips_group() {
        let tasks = vec![task("a", TaskKind::ViewPost, 3, 7, TaskStatus::Incomplete)];
        assert!(optimize_task_execution(&tasks).is_empty());
    }

    #[test]
    fn at_most_one_group_per_kind() {
        let tasks: Vec<Task> = (0..6)
            .map(|i| {
                task(
                    &format!("t{i}"),
                    TaskKind::LikePost,
                    10 + i64::from(i),
                    0,
                    TaskStatus::Incomplete,
                )
            })
            .collect();
        assert_eq!(optimize_task_execution(&tasks).len(), 1);
    }

    #[test]
    fn predicts_smaller_tiers_sharing_the_counter() {
        let max = task("max", TaskKind::LikePost, 10, 4, TaskStatus::Incomplete);
        let tasks = vec![
            max.clone(),
            task("close", TaskKind::LikePost, 5, 1, TaskStatus::Incomplete),
            task("far", TaskKind::LikePost, 8, 1, TaskStatus::Incomplete),
        ];
        // Deficit 6: "close" reaches 1 + 6 = 7 >= 5, "far" reaches 7 < 8.
        let predicted = calculate_task_completion(&tasks, &max);
        assert_eq!(predicted.len(), 1);
        assert_eq!(predicted[0].id, "close");
        assert_eq!(predicted[0].progress, 5, "clamped to its own required");
        assert_eq!(predicted[0].status, TaskStatus::Completed);
    }

    #[test]
    fn predicted_tasks_always_satisfy_their_requirement() {
        let max = task("max", TaskKind::ViewPost, 20, 0, TaskStatus::Incomplete);
        let tasks = vec![
            max.clone(),
            task("a", TaskKind::ViewPost, 20, 19, TaskStatus::Incomplete),
            task("b", TaskKind::ViewPost, 1, -3, TaskStatus::Incomplete),
        ];
        for predicted in calculate_task_completion(&tasks, &max) {
            assert!(predicted.progress >= predicted.required);
        }
    }

    #[test]
    fn completion_prediction_is_idempotent() {
        let max = task("max", TaskKind::LikePost, 10, 2, TaskStatus::Incomplete);
        let tasks = vec![
            max.clone(),
            task("a", TaskKind::LikePost, 6, 0, TaskStatus::Incomplete),
            task("b", TaskKind::LikePost, 9, 3, TaskStatus::Incomplete),
        ];
        let first = calculate_task_completion(&tasks, &max);
        let second = calculate_task_completion(&tasks, &max);
        assert_eq!(first, second);
    }

    #[test]
    fn negative_deficit_predicts_only_already_satisfied_tasks() {
        let max = task("max", TaskKind::LikePost, 3, 8, TaskStatus::Incomplete);
        let tasks = vec![
            max.clone(),
            task("done", TaskKind::LikePost, 2, 2, TaskStatus::Incomplete),
            task("pending", TaskKind::LikePost, 2, 1, TaskStatus::Incomplete),
        ];
        // Deficit clamps to 0: only tasks already at their requirement count.
        let predicted = calculate_task_completion(&tasks, &max);
        assert_eq!(predicted.len(), 1);
        assert_eq!(predicted[0].id, "done");
    }
}
