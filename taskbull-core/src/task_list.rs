//! In-memory task store.
//!
//! Deletion is soft: a deleted task stays in the list with `deleted = true`
//! so it can be restored. Ids come from a monotonically increasing counter
//! that is persisted alongside the tasks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TaskListError;
use crate::task::{Difficulty, Importance, Task};

/// Fields supplied when creating a task; the id is assigned by the list.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub difficulty: Difficulty,
    pub importance: Importance,
}

/// Partial update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub importance: Option<Importance>,
}

impl TaskEdit {
    pub fn is_empty(&self) -> bool {
        self == &TaskEdit::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    tasks: Vec<Task>,
    next_task_id: u64,
}

impl Default for TaskList {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            next_task_id: 1,
        }
    }
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a list from persisted parts.
    pub fn from_parts(tasks: Vec<Task>, next_task_id: u64) -> Self {
        Self { tasks, next_task_id }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn next_task_id(&self) -> u64 {
        self.next_task_id
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Append a task under the next free id and return that id.
    pub fn add(&mut self, new: NewTask) -> u64 {
        let id = self.next_task_id;
        self.next_task_id += 1;

        let task = Task::new(id, new.title, new.due_date)
            .with_description(new.description)
            .with_difficulty(new.difficulty)
            .with_importance(new.importance);
        self.tasks.push(task);
        id
    }

    pub fn delete(&mut self, id: u64) -> Result<(), TaskListError> {
        self.find_mut(id)?.deleted = true;
        Ok(())
    }

    pub fn complete(&mut self, id: u64, at: DateTime<Utc>) -> Result<(), TaskListError> {
        let task = self.find_mut(id)?;
        task.completed = true;
        task.completed_date = Some(at);
        Ok(())
    }

    pub fn edit(&mut self, id: u64, edit: TaskEdit) -> Result<(), TaskListError> {
        let task = self.find_mut(id)?;
        if let Some(title) = edit.title {
            task.title = title;
        }
        if let Some(description) = edit.description {
            task.description = description;
        }
        if let Some(due_date) = edit.due_date {
            task.due_date = due_date;
        }
        if let Some(difficulty) = edit.difficulty {
            task.difficulty = difficulty;
        }
        if let Some(importance) = edit.importance {
            task.importance = importance;
        }
        Ok(())
    }

    /// Undo both completion and deletion.
    pub fn restore(&mut self, id: u64) -> Result<(), TaskListError> {
        let task = self.find_mut(id)?;
        task.completed = false;
        task.completed_date = None;
        task.deleted = false;
        tracing::info!(task_id = id, "task restored");
        Ok(())
    }

    /// Replace every task. The id counter is left alone.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// Tasks that are neither completed nor deleted, in list order.
    pub fn outstanding(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.is_outstanding()).collect()
    }

    /// Completed tasks that were not deleted afterwards.
    pub fn completed(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.completed && !t.deleted)
            .collect()
    }

    fn find_mut(&mut self, id: u64) -> Result<&mut Task, TaskListError> {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => Ok(task),
            None => {
                tracing::warn!(task_id = id, "task not found");
                Err(TaskListError::NotFound(id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: String::new(),
            due_date: "2026-03-01".to_string(),
            difficulty: Difficulty::Medium,
            importance: Importance::Medium,
        }
    }

    #[test]
    fn add_assigns_increasing_ids() {
        let mut list = TaskList::new();
        assert_eq!(list.add(new_task("a")), 1);
        assert_eq!(list.add(new_task("b")), 2);
        assert_eq!(list.next_task_id(), 3);
        assert_eq!(list.get(2).unwrap().title, "b");
    }

    #[test]
    fn ids_continue_from_persisted_counter() {
        let mut list = TaskList::from_parts(vec![Task::new(4, "old", "2026-03-01")], 9);
        assert_eq!(list.add(new_task("new")), 9);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn delete_is_soft_and_restorable() {
        let mut list = TaskList::new();
        let id = list.add(new_task("a"));
        list.delete(id).unwrap();
        assert_eq!(list.len(), 1);
        assert!(list.outstanding().is_empty());

        list.restore(id).unwrap();
        assert_eq!(list.outstanding().len(), 1);
    }

    #[test]
    fn complete_records_date_and_restore_clears_it() {
        let at = Utc.with_ymd_and_hms(2026, 2, 19, 12, 0, 0).unwrap();
        let mut list = TaskList::new();
        let id = list.add(new_task("a"));
        list.complete(id, at).unwrap();

        let t = list.get(id).unwrap();
        assert!(t.completed);
        assert_eq!(t.completed_date, Some(at));
        assert_eq!(list.completed().len(), 1);

        list.restore(id).unwrap();
        let t = list.get(id).unwrap();
        assert!(!t.completed);
        assert_eq!(t.completed_date, None);
    }

    #[test]
    fn completed_excludes_deleted() {
        let at = Utc.with_ymd_and_hms(2026, 2, 19, 12, 0, 0).unwrap();
        let mut list = TaskList::new();
        let id = list.add(new_task("a"));
        list.complete(id, at).unwrap();
        list.delete(id).unwrap();
        assert!(list.completed().is_empty());
    }

    #[test]
    fn edit_applies_only_given_fields() {
        let mut list = TaskList::new();
        let id = list.add(new_task("a"));
        list.edit(
            id,
            TaskEdit {
                title: Some("renamed".to_string()),
                importance: Some(Importance::High),
                ..TaskEdit::default()
            },
        )
        .unwrap();

        let t = list.get(id).unwrap();
        assert_eq!(t.title, "renamed");
        assert_eq!(t.importance, Importance::High);
        assert_eq!(t.difficulty, Difficulty::Medium);
        assert_eq!(t.due_date, "2026-03-01");
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut list = TaskList::new();
        assert_eq!(list.delete(42), Err(TaskListError::NotFound(42)));
        assert_eq!(list.restore(42), Err(TaskListError::NotFound(42)));
        assert_eq!(
            list.edit(42, TaskEdit::default()),
            Err(TaskListError::NotFound(42))
        );
    }

    #[test]
    fn replace_all_keeps_counter() {
        let mut list = TaskList::new();
        list.add(new_task("a"));
        list.replace_all(vec![]);
        assert!(list.is_empty());
        assert_eq!(list.add(new_task("b")), 2);
    }
}
