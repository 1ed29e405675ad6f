//! Read-only views over a task list: the "due this week" panel and sorted
//! listings.

use chrono::NaiveDate;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::task::Task;
use crate::time::{days_left, parse_due_date};

/// Outstanding tasks due fewer than this many days from today show up in
/// [`due_this_week`].
pub const DUE_THIS_WEEK_DAYS: i64 = 7;

/// Outstanding tasks due today or within the next six days, in list order.
///
/// Overdue tasks are left out, and so are tasks whose due date does not
/// parse; this is a display list, not a decision.
pub fn due_this_week<T: Borrow<Task>>(tasks: &[T], today: NaiveDate) -> Vec<&Task> {
    tasks
        .iter()
        .map(Borrow::<Task>::borrow)
        .filter(|t| t.is_outstanding())
        .filter(|t| match days_left(today, &t.due_date) {
            Ok(n) => (0..DUE_THIS_WEEK_DAYS).contains(&n),
            Err(e) => {
                tracing::debug!(task_id = t.id, error = %e, "skipping task in due-this-week");
                false
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    DueDate,
    Importance,
    Difficulty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort key: {0} (expected due, importance or difficulty)")]
pub struct SortKeyError(pub String);

impl FromStr for SortKey {
    type Err = SortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "due" | "due-date" | "duedate" => Ok(SortKey::DueDate),
            "importance" => Ok(SortKey::Importance),
            "difficulty" => Ok(SortKey::Difficulty),
            _ => Err(SortKeyError(s.to_string())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortKey::DueDate => "due",
            SortKey::Importance => "importance",
            SortKey::Difficulty => "difficulty",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    }
}

/// Stable sort of `tasks` by `key`.
///
/// Ties keep their current order in both directions. Tasks with an
/// unreadable due date go last when sorting by due date.
pub fn sort_tasks<T: Borrow<Task>>(tasks: &mut [T], key: SortKey, order: SortOrder) {
    tasks.sort_by(|a, b| {
        let (a, b) = (a.borrow(), b.borrow());
        match key {
            SortKey::DueDate => {
                match (parse_due_date(&a.due_date), parse_due_date(&b.due_date)) {
                    (Ok(x), Ok(y)) => order.apply(x.cmp(&y)),
                    (Ok(_), Err(_)) => Ordering::Less,
                    (Err(_), Ok(_)) => Ordering::Greater,
                    (Err(_), Err(_)) => Ordering::Equal,
                }
            }
            SortKey::Importance => order.apply(a.importance.cmp(&b.importance)),
            SortKey::Difficulty => order.apply(a.difficulty.cmp(&b.difficulty)),
        }
    });
}
