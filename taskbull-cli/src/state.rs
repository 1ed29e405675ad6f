//! File-backed user state: `~/.taskbull/state.json`.
//!
//! The JSON keeps the field names of the app's user document so an exported
//! document can be dropped in as-is.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use taskbull_core::{RankLadder, Task, TaskList, UserProgress, parse_date_in};

/// Fields a stored document must carry to be trusted.
pub const REQUIRED_FIELDS: [&str; 8] = [
    "nextTaskId",
    "userExp",
    "loginStreak",
    "lastLoginDate",
    "userName",
    "darkMode",
    "lastSynced",
    "tasks",
];

/// `$TASKBULL_HOME`, else `$HOME/.taskbull`.
pub fn taskbull_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("TASKBULL_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".taskbull"))
}

pub fn ensure_taskbull_home() -> Result<PathBuf> {
    let dir = taskbull_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn state_path() -> Result<PathBuf> {
    Ok(ensure_taskbull_home()?.join("state.json"))
}

/// On-disk layout.
///
/// A required field only has to be present; `null` reads as its default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredState {
    next_task_id: Option<u64>,
    user_exp: Option<i64>,
    login_streak: Option<u32>,
    last_login_date: Option<String>,
    user_name: Option<String>,
    dark_mode: Option<bool>,
    last_synced: Option<DateTime<Utc>>,
    tasks: Option<Vec<Task>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rank: Option<RankLadder>,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub tasks: TaskList,
    pub progress: UserProgress,
    pub user_name: String,
    pub dark_mode: bool,
    pub last_synced: Option<DateTime<Utc>>,
    pub ranks: RankLadder,
}

impl AppState {
    /// `lastLoginDate` may be an instant; it is read as a date in `tz`.
    fn from_stored(stored: StoredState, tz: Tz) -> Result<Self> {
        let last_login_date = match stored.last_login_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_date_in(raw, tz).context("lastLoginDate")?),
        };

        let tasks = stored.tasks.unwrap_or_default();
        let next_task_id = stored
            .next_task_id
            .unwrap_or_else(|| tasks.iter().map(|t| t.id + 1).max().unwrap_or(1));

        Ok(Self {
            tasks: TaskList::from_parts(tasks, next_task_id),
            progress: UserProgress {
                user_exp: stored.user_exp.unwrap_or_default(),
                login_streak: stored.login_streak.unwrap_or_default(),
                last_login_date,
            },
            user_name: stored.user_name.unwrap_or_default(),
            dark_mode: stored.dark_mode.unwrap_or(false),
            last_synced: stored.last_synced,
            ranks: stored.rank.unwrap_or_default(),
        })
    }

    fn to_stored(&self) -> StoredState {
        StoredState {
            next_task_id: Some(self.tasks.next_task_id()),
            user_exp: Some(self.progress.user_exp),
            login_streak: Some(self.progress.login_streak),
            last_login_date: self.progress.last_login_date.map(format_date),
            user_name: Some(self.user_name.clone()),
            dark_mode: Some(self.dark_mode),
            last_synced: self.last_synced,
            tasks: Some(self.tasks.tasks().to_vec()),
            rank: Some(self.ranks.clone()),
        }
    }
}

fn format_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// Required fields absent from a stored document, each logged as it is found.
pub fn missing_fields(doc: &Value) -> Vec<&'static str> {
    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| doc.get(field).is_none())
        .collect();

    for field in &missing {
        tracing::warn!("Missing field in payload: {field}");
    }
    missing
}

pub fn load_state(tz: Tz) -> Result<AppState> {
    load_state_from(&state_path()?, tz)
}

/// Read state, falling back to a fresh state when the document is incomplete.
///
/// An incomplete file is copied to `state.json.invalid` before it can be
/// overwritten by the next save.
pub fn load_state_from(path: &Path, tz: Tz) -> Result<AppState> {
    if !path.exists() {
        return Ok(AppState::default());
    }

    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let doc: Value =
        serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;

    if !missing_fields(&doc).is_empty() {
        let backup = path.with_extension("json.invalid");
        fs::copy(path, &backup).with_context(|| format!("write {}", backup.display()))?;
        tracing::warn!(backup = %backup.display(), "invalid payload, using fallback data");
        return Ok(AppState::default());
    }

    let stored: StoredState =
        serde_json::from_value(doc).with_context(|| format!("decode {}", path.display()))?;
    AppState::from_stored(stored, tz)
}

/// Write state and stamp `lastSynced`.
pub fn save_state(state: &mut AppState, now: DateTime<Utc>) -> Result<()> {
    state.last_synced = Some(now);
    let p = state_path()?;
    let json = serde_json::to_string_pretty(&state.to_stored())?;
    fs::write(&p, json).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}
