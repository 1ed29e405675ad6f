//! Gamification: experience points, daily login streaks and ranks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::time::days_between;

/// EXP for the first check-in of a day.
pub const DAILY_LOGIN_EXP: i64 = 10;
/// EXP for the first check-in of a day once a streak is established.
pub const STREAK_LOGIN_EXP: i64 = 30;
/// Streak length (before today's check-in) that unlocks [`STREAK_LOGIN_EXP`].
pub const STREAK_BONUS_MIN: u32 = 3;
/// EXP for marking a task complete.
pub const TASK_COMPLETION_EXP: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakChange {
    /// Already checked in today; nothing changed.
    Unchanged,
    Incremented,
    /// More than one day since the last check-in.
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckIn {
    pub change: StreakChange,
    pub awarded_exp: i64,
    pub login_streak: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    pub user_exp: i64,
    pub login_streak: u32,
    pub last_login_date: Option<NaiveDate>,
}

impl UserProgress {
    pub fn add_exp(&mut self, value: i64) {
        self.user_exp += value;
    }

    /// EXP may go negative.
    pub fn subtract_exp(&mut self, value: i64) {
        self.user_exp -= value;
    }

    /// Record today's login.
    ///
    /// The bonus is decided by the streak as it stood *before* this check-in,
    /// so the day that brings a streak to 3 still earns the base amount.
    pub fn daily_check_in(&mut self, today: NaiveDate) -> CheckIn {
        if self.last_login_date == Some(today) {
            return CheckIn {
                change: StreakChange::Unchanged,
                awarded_exp: 0,
                login_streak: self.login_streak,
            };
        }

        let previous_streak = self.login_streak;
        let change = match self.last_login_date {
            Some(last) if days_between(last, today) > 1 => {
                self.login_streak = 1;
                StreakChange::Reset
            }
            _ => {
                self.login_streak += 1;
                StreakChange::Incremented
            }
        };

        let awarded_exp = if previous_streak >= STREAK_BONUS_MIN {
            STREAK_LOGIN_EXP
        } else {
            DAILY_LOGIN_EXP
        };
        self.add_exp(awarded_exp);
        self.last_login_date = Some(today);

        tracing::debug!(?change, awarded_exp, login_streak = self.login_streak, "daily check-in");
        CheckIn {
            change,
            awarded_exp,
            login_streak: self.login_streak,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rank {
    pub title: String,
    pub icon: String,
    pub min_exp: i64,
    pub max_exp: i64,
}

impl Rank {
    pub fn new(title: &str, icon: &str, min_exp: i64, max_exp: i64) -> Self {
        Self {
            title: title.to_string(),
            icon: icon.to_string(),
            min_exp,
            max_exp,
        }
    }

    pub fn contains(&self, exp: i64) -> bool {
        exp >= self.min_exp && exp <= self.max_exp
    }
}

/// Ranks ordered from lowest to highest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankLadder(Vec<Rank>);

impl Default for RankLadder {
    fn default() -> Self {
        Self(vec![
            Rank::new("Pawn", "chess-pawn", 0, 99),
            Rank::new("Knight", "chess-knight", 100, 299),
            Rank::new("Bishop", "chess-bishop", 300, 599),
            Rank::new("Rook", "chess-rook", 600, 999),
            Rank::new("Queen", "chess-queen", 1000, 1999),
            Rank::new("King", "chess-king", 2000, i64::MAX),
        ])
    }
}

impl RankLadder {
    pub fn new(ranks: Vec<Rank>) -> Self {
        Self(ranks)
    }

    pub fn ranks(&self) -> &[Rank] {
        &self.0
    }

    fn current_index(&self, exp: i64) -> Option<usize> {
        self.0.iter().position(|r| r.contains(exp))
    }

    pub fn current(&self, exp: i64) -> Option<&Rank> {
        self.current_index(exp).map(|i| &self.0[i])
    }

    pub fn next(&self, exp: i64) -> Option<&Rank> {
        self.current_index(exp).and_then(|i| self.0.get(i + 1))
    }

    /// Fraction of the way from the current rank to the next, in `[0, 1]`.
    /// `1.0` at the top of the ladder or when `exp` matches no rank.
    pub fn progress(&self, exp: i64) -> f64 {
        match (self.current(exp), self.next(exp)) {
            (Some(cur), Some(next)) if next.min_exp > cur.min_exp => {
                let span = (next.min_exp - cur.min_exp) as f64;
                ((exp - cur.min_exp) as f64 / span).clamp(0.0, 1.0)
            }
            _ => 1.0,
        }
    }

    pub fn exp_to_next(&self, exp: i64) -> i64 {
        self.next(exp).map(|n| n.min_exp - exp).unwrap_or(0)
    }
}
