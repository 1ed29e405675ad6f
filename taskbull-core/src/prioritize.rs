//! Recommendation engine: pick the one task to surface on the home screen.
//!
//! Order of precedence:
//! 1) tasks due within the due-soon window win outright (most important first)
//! 2) otherwise the candidate pool is narrowed by motivation
//!    (motivated users get Medium/Hard work, others Easy/Medium)
//! 3) the highest `urgency + importance` score in the pool wins
//!
//! The engine is a pure function of `(tasks, motivation, today)`. It never
//! mutates a task and always hands back a reference into the input slice.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

use crate::error::InvalidDateError;
use crate::task::{Difficulty, Task};
use crate::time::days_left;

/// Motivation at or above this gets harder tasks.
pub const MOTIVATION_THRESHOLD: f64 = 10.0;
/// Weight of the `1 / (days_left + 1)` urgency term.
pub const WEIGHTED_DAYS_LEFT: f64 = 0.5;
/// Weight of the importance ordinal.
pub const WEIGHTED_IMPORTANCE: f64 = 4.0;
/// Tasks with at most this many days left (overdue included) are due soon.
pub const DUE_SOON_DAYS: i64 = 2;

/// Tunable scoring constants. `Default` is the shipped policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrioritizationPolicy {
    pub motivation_threshold: f64,
    pub weighted_days_left: f64,
    pub weighted_importance: f64,
    pub due_soon_days: i64,
}

impl Default for PrioritizationPolicy {
    fn default() -> Self {
        Self {
            motivation_threshold: MOTIVATION_THRESHOLD,
            weighted_days_left: WEIGHTED_DAYS_LEFT,
            weighted_importance: WEIGHTED_IMPORTANCE,
            due_soon_days: DUE_SOON_DAYS,
        }
    }
}

impl PrioritizationPolicy {
    /// `(1 / (days_left + 1)) * w_days + importance * w_importance`.
    ///
    /// `days_left == -1` divides by zero and yields `+inf`. That case is kept
    /// as-is. Under the default window it cannot reach scoring, since such a
    /// task is already due soon.
    pub fn score(&self, task: &Task, days_left: i64) -> f64 {
        (1.0 / (days_left as f64 + 1.0)) * self.weighted_days_left
            + f64::from(task.importance.value()) * self.weighted_importance
    }

    fn is_due_soon(&self, days_left: i64) -> bool {
        days_left <= self.due_soon_days
    }

    fn prefers_hard_tasks(&self, motivation: f64) -> bool {
        motivation >= self.motivation_threshold
    }
}

/// Which rule produced a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RecommendReason {
    /// The only task inside the due-soon window.
    OnlyDueSoon { days_left: i64 },
    /// Most important of several due-soon tasks.
    MostImportantDueSoon { days_left: i64, due_soon: usize },
    /// Best score among the motivation-filtered pool.
    HighestScore {
        days_left: i64,
        score: f64,
        pool: CandidatePool,
    },
}

/// Candidate pool that scoring ran over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidatePool {
    /// Medium and Hard tasks (motivation at or above threshold).
    MediumOrHard,
    /// Easy and Medium tasks.
    EasyOrMedium,
    /// The filter matched nothing, so every task was scored.
    AllTasks,
}

#[derive(Debug, Clone, Copy)]
pub struct Recommendation<'a, T> {
    pub task: &'a T,
    /// Position of `task` in the input slice.
    pub index: usize,
    pub reason: RecommendReason,
}

/// Recommend a task and explain why.
///
/// Returns `Ok(None)` only for an empty slice. Every due date is parsed before
/// anything is selected, so one malformed date fails the whole call.
pub fn recommend<'a, T: Borrow<Task>>(
    tasks: &'a [T],
    motivation: f64,
    today: NaiveDate,
    policy: &PrioritizationPolicy,
) -> Result<Option<Recommendation<'a, T>>, InvalidDateError> {
    if tasks.is_empty() {
        return Ok(None);
    }

    let days: Vec<i64> = tasks
        .iter()
        .map(|t| days_left(today, &t.borrow().due_date))
        .collect::<Result<_, _>>()?;

    if let Some(rec) = pick_due_soon(tasks, &days, policy) {
        return Ok(Some(rec));
    }

    let (chosen, pool) = chosen_tasks(tasks, motivation, policy);
    Ok(top_scoring(tasks, &days, &chosen, pool, policy))
}

/// Recommend a task for `today` with the default policy.
pub fn prioritize_task<'a, T: Borrow<Task>>(
    tasks: &'a [T],
    motivation: f64,
    today: NaiveDate,
) -> Result<Option<&'a T>, InvalidDateError> {
    prioritize_task_with_policy(tasks, motivation, today, &PrioritizationPolicy::default())
}

pub fn prioritize_task_with_policy<'a, T: Borrow<Task>>(
    tasks: &'a [T],
    motivation: f64,
    today: NaiveDate,
    policy: &PrioritizationPolicy,
) -> Result<Option<&'a T>, InvalidDateError> {
    Ok(recommend(tasks, motivation, today, policy)?.map(|r| r.task))
}

/// Same as [`prioritize_task`], reading "today" from the host clock.
pub fn prioritize_task_now<T: Borrow<Task>>(
    tasks: &[T],
    motivation: f64,
) -> Result<Option<&T>, InvalidDateError> {
    prioritize_task(tasks, motivation, Local::now().date_naive())
}

fn pick_due_soon<'a, T: Borrow<Task>>(
    tasks: &'a [T],
    days: &[i64],
    policy: &PrioritizationPolicy,
) -> Option<Recommendation<'a, T>> {
    let mut due_soon: Vec<usize> = (0..tasks.len())
        .filter(|&i| policy.is_due_soon(days[i]))
        .collect();

    match due_soon.len() {
        0 => None,
        1 => {
            let index = due_soon[0];
            tracing::debug!(task_id = tasks[index].borrow().id, days_left = days[index], "only task due soon");
            Some(Recommendation {
                task: &tasks[index],
                index,
                reason: RecommendReason::OnlyDueSoon { days_left: days[index] },
            })
        }
        n => {
            // Stable: equal importance keeps input order.
            due_soon.sort_by(|&a, &b| {
                tasks[b]
                    .borrow()
                    .importance
                    .cmp(&tasks[a].borrow().importance)
            });
            let index = due_soon[0];
            tracing::debug!(task_id = tasks[index].borrow().id, due_soon = n, "most important of due-soon tasks");
            Some(Recommendation {
                task: &tasks[index],
                index,
                reason: RecommendReason::MostImportantDueSoon {
                    days_left: days[index],
                    due_soon: n,
                },
            })
        }
    }
}

/// Indices of the motivation-filtered pool, falling back to every task.
fn chosen_tasks<T: Borrow<Task>>(
    tasks: &[T],
    motivation: f64,
    policy: &PrioritizationPolicy,
) -> (Vec<usize>, CandidatePool) {
    let prefers_hard = policy.prefers_hard_tasks(motivation);
    let chosen: Vec<usize> = (0..tasks.len())
        .filter(|&i| {
            let d = tasks[i].borrow().difficulty;
            if prefers_hard {
                d >= Difficulty::Medium
            } else {
                d <= Difficulty::Medium
            }
        })
        .collect();

    if chosen.is_empty() {
        ((0..tasks.len()).collect(), CandidatePool::AllTasks)
    } else if prefers_hard {
        (chosen, CandidatePool::MediumOrHard)
    } else {
        (chosen, CandidatePool::EasyOrMedium)
    }
}

fn top_scoring<'a, T: Borrow<Task>>(
    tasks: &'a [T],
    days: &[i64],
    chosen: &[usize],
    pool: CandidatePool,
    policy: &PrioritizationPolicy,
) -> Option<Recommendation<'a, T>> {
    let mut best: Option<(usize, f64)> = None;

    for &i in chosen {
        let score = policy.score(tasks[i].borrow(), days[i]);
        match best {
            None => best = Some((i, score)),
            // Later tasks must beat the leader strictly.
            Some((_, best_score)) if score > best_score => best = Some((i, score)),
            _ => {}
        }
    }

    let (index, score) = best?;
    tracing::debug!(task_id = tasks[index].borrow().id, score, ?pool, "highest scoring task");
    Some(Recommendation {
        task: &tasks[index],
        index,
        reason: RecommendReason::HighestScore {
            days_left: days[index],
            score,
            pool,
        },
    })
}
