//! taskbull-core: task model, recommendation engine and gamification rules.
//!
//! Everything here is free of I/O. Callers pass "today" in explicitly so
//! results only depend on their arguments.

pub mod agenda;
pub mod error;
pub mod motivation;
pub mod prioritize;
pub mod progress;
pub mod task;
pub mod task_list;
pub mod time;

pub use agenda::{
    DUE_THIS_WEEK_DAYS, SortKey, SortKeyError, SortOrder, due_this_week, sort_tasks,
};
pub use error::{InvalidDateError, TaskListError};
pub use motivation::{completed_lifetime, completed_recently, motivation_score};
pub use prioritize::{
    prioritize_task, prioritize_task_now, prioritize_task_with_policy, recommend, CandidatePool,
    PrioritizationPolicy, Recommendation, RecommendReason,
};
pub use progress::{CheckIn, Rank, RankLadder, StreakChange, UserProgress, TASK_COMPLETION_EXP};
pub use task::{Difficulty, Importance, OrdinalError, Task};
pub use task_list::{NewTask, TaskEdit, TaskList};
pub use time::{days_between, days_left, local_date, parse_date_in, parse_due_date, today_in};
