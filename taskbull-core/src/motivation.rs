//! Motivation score: how much the user has been getting done lately.
//!
//! The score is the sum of difficulty ordinals of tasks completed in the last
//! week, so one Hard task counts as much as three Easy ones.

use chrono::NaiveDate;
use chrono_tz::Tz;
use std::borrow::Borrow;

use crate::task::Task;
use crate::time::{days_between, local_date};

/// Completions older than this many days no longer count.
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Completed, not deleted, and completed between `today - 7` and `today`.
///
/// The completion instant is read as a calendar day in `tz`, the same zone
/// `today` comes from. A completion dated after `today` does not count.
pub fn is_completed_recently(task: &Task, today: NaiveDate, tz: Tz) -> bool {
    if !task.completed || task.deleted {
        return false;
    }
    let Some(at) = task.completed_date else {
        return false;
    };
    let age = days_between(local_date(at, tz), today);
    (0..=RECENT_WINDOW_DAYS).contains(&age)
}

pub fn completed_recently<T: Borrow<Task>>(tasks: &[T], today: NaiveDate, tz: Tz) -> Vec<&Task> {
    tasks
        .iter()
        .map(Borrow::<Task>::borrow)
        .filter(|t| is_completed_recently(t, today, tz))
        .collect()
}

/// Completed and not deleted, regardless of when.
pub fn completed_lifetime<T: Borrow<Task>>(tasks: &[T]) -> usize {
    tasks
        .iter()
        .map(Borrow::<Task>::borrow)
        .filter(|t| t.completed && !t.deleted)
        .count()
}

pub fn motivation_score<T: Borrow<Task>>(tasks: &[T], today: NaiveDate, tz: Tz) -> u32 {
    completed_recently(tasks, today, tz)
        .iter()
        .map(|t| u32::from(t.difficulty.value()))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Difficulty;
    use chrono::{TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 19).unwrap()
    }

    fn done(id: u64, difficulty: Difficulty, day: u32) -> Task {
        Task::new(id, "t", "2026-03-01")
            .with_difficulty(difficulty)
            .with_completed_date(Utc.with_ymd_and_hms(2026, 2, day, 18, 0, 0).unwrap())
    }

    #[test]
    fn sums_difficulty_inside_window() {
        let tasks = vec![
            done(1, Difficulty::Hard, 19),
            done(2, Difficulty::Medium, 12),
            done(3, Difficulty::Easy, 11),
        ];
        // Day 11 is eight days back.
        assert_eq!(motivation_score(&tasks, today(), Tz::UTC), 5);
        assert_eq!(completed_recently(&tasks, today(), Tz::UTC).len(), 2);
        assert_eq!(completed_lifetime(&tasks), 3);
    }

    #[test]
    fn ignores_outstanding_deleted_and_future() {
        let mut deleted = done(1, Difficulty::Hard, 18);
        deleted.deleted = true;
        let outstanding = Task::new(2, "t", "2026-03-01").with_difficulty(Difficulty::Hard);
        let future = done(3, Difficulty::Hard, 21);

        let tasks = vec![deleted, outstanding, future];
        assert_eq!(motivation_score(&tasks, today(), Tz::UTC), 0);
        assert_eq!(completed_lifetime(&tasks), 1);
    }

    #[test]
    fn completed_without_date_does_not_count() {
        let mut t = Task::new(1, "t", "2026-03-01").with_difficulty(Difficulty::Hard);
        t.completed = true;
        assert_eq!(motivation_score(&[t], today(), Tz::UTC), 0);
    }

    #[test]
    fn evening_completion_counts_on_the_local_day() {
        let chicago: Tz = "America/Chicago".parse().unwrap();
        // 20:00 on the 19th in Chicago.
        let t = Task::new(1, "t", "2026-03-01")
            .with_difficulty(Difficulty::Hard)
            .with_completed_date(Utc.with_ymd_and_hms(2026, 2, 20, 2, 0, 0).unwrap());
        let tasks = vec![t];
        assert_eq!(motivation_score(&tasks, today(), chicago), 3);
        // In UTC the same instant is already tomorrow.
        assert_eq!(motivation_score(&tasks, today(), Tz::UTC), 0);
    }

    #[test]
    fn ten_points_reaches_the_motivated_threshold() {
        let tasks: Vec<Task> = (0..4)
            .map(|i| done(i, Difficulty::Hard, 15 + i as u32))
            .collect();
        let score = motivation_score(&tasks, today(), Tz::UTC);
        assert_eq!(score, 12);
        assert!(f64::from(score) >= crate::prioritize::MOTIVATION_THRESHOLD);
    }
}
