//! Task model shared by the task store and the recommendation engine.
//!
//! Field names serialize in camelCase so the stored JSON keeps the layout the
//! mobile app wrote (`dueDate`, `completedDate`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} must be 1, 2 or 3 (got {value})")]
pub struct OrdinalError {
    pub kind: &'static str,
    pub value: String,
}

/// Wire form of an ordinal: stored data carries both `2` and `"2"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawOrdinal {
    Int(i64),
    Text(String),
}

impl RawOrdinal {
    fn into_u8(self, kind: &'static str) -> Result<u8, OrdinalError> {
        let err = |value: String| OrdinalError { kind, value };
        match self {
            RawOrdinal::Int(n) => u8::try_from(n).map_err(|_| err(n.to_string())),
            RawOrdinal::Text(s) => s.trim().parse::<u8>().map_err(|_| err(s)),
        }
    }
}

/// How hard a task is. Ordinal values 1..=3 take part in filtering and in the
/// motivation sum, so the discriminants are load-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum Difficulty {
    Easy = 1,
    Medium = 2,
    Hard = 3,
}

impl Difficulty {
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = OrdinalError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Difficulty::Easy),
            2 => Ok(Difficulty::Medium),
            3 => Ok(Difficulty::Hard),
            other => Err(OrdinalError {
                kind: "difficulty",
                value: other.to_string(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        RawOrdinal::deserialize(de)?
            .into_u8("difficulty")
            .and_then(Difficulty::try_from)
            .map_err(serde::de::Error::custom)
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> u8 {
        d.value()
    }
}

impl FromStr for Difficulty {
    type Err = OrdinalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "easy" => Ok(Difficulty::Easy),
            "2" | "medium" => Ok(Difficulty::Medium),
            "3" | "hard" => Ok(Difficulty::Hard),
            _ => Err(OrdinalError {
                kind: "difficulty",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How much a task matters. Same 1..=3 ordinal contract as [`Difficulty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum Importance {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Importance {
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Importance::Low => "Low",
            Importance::Medium => "Medium",
            Importance::High => "High",
        }
    }
}

impl TryFrom<u8> for Importance {
    type Error = OrdinalError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Importance::Low),
            2 => Ok(Importance::Medium),
            3 => Ok(Importance::High),
            other => Err(OrdinalError {
                kind: "importance",
                value: other.to_string(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for Importance {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        RawOrdinal::deserialize(de)?
            .into_u8("importance")
            .and_then(Importance::try_from)
            .map_err(serde::de::Error::custom)
    }
}

impl From<Importance> for u8 {
    fn from(i: Importance) -> u8 {
        i.value()
    }
}

impl FromStr for Importance {
    type Err = OrdinalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "low" => Ok(Importance::Low),
            "2" | "medium" => Ok(Importance::Medium),
            "3" | "high" => Ok(Importance::High),
            _ => Err(OrdinalError {
                kind: "importance",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Core task type.
///
/// `due_date` stays the raw string the user entered. It is parsed on every
/// recommendation, which is where a malformed value surfaces as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    pub due_date: String,

    pub difficulty: Difficulty,
    pub importance: Importance,

    #[serde(default)]
    pub completed: bool,

    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub deleted: bool,
}

impl Task {
    pub fn new(id: u64, title: impl Into<String>, due_date: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            due_date: due_date.into(),
            difficulty: Difficulty::Medium,
            importance: Importance::Medium,
            completed: false,
            completed_date: None,
            deleted: false,
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_importance(mut self, importance: Importance) -> Self {
        self.importance = importance;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_completed_date(mut self, at: DateTime<Utc>) -> Self {
        self.completed = true;
        self.completed_date = Some(at);
        self
    }

    /// Neither completed nor deleted.
    pub fn is_outstanding(&self) -> bool {
        !self.completed && !self.deleted
    }
}

// A restored task is written back with `completedDate: ""`.
fn empty_string_as_none<'de, D>(de: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(de)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_order_like_their_values() {
        assert!(Difficulty::Easy < Difficulty::Medium);
        assert!(Difficulty::Medium < Difficulty::Hard);
        assert!(Importance::High > Importance::Low);
        assert_eq!(Importance::High.value(), 3);
    }

    #[test]
    fn out_of_range_ordinal_is_rejected() {
        assert!(Difficulty::try_from(0).is_err());
        assert!(Importance::try_from(4).is_err());
        let err = Difficulty::try_from(9).unwrap_err();
        assert_eq!(err.to_string(), "difficulty must be 1, 2 or 3 (got 9)");
    }

    #[test]
    fn parses_labels_and_numbers() {
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!("1".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!(" High ".parse::<Importance>().unwrap(), Importance::High);
        assert!("urgent".parse::<Importance>().is_err());
    }

    #[test]
    fn deserializes_app_json() {
        let raw = r#"{
            "id": 7,
            "title": "Essay",
            "dueDate": "2025-08-15",
            "difficulty": "3",
            "importance": 1,
            "completed": false,
            "completedDate": "",
            "deleted": false
        }"#;
        let t: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(t.id, 7);
        assert_eq!(t.difficulty, Difficulty::Hard);
        assert_eq!(t.importance, Importance::Low);
        assert_eq!(t.completed_date, None);
        assert!(t.is_outstanding());
    }

    #[test]
    fn rejects_out_of_range_difficulty_in_json() {
        let raw = r#"{"id": 1, "dueDate": "2025-08-15", "difficulty": 5, "importance": 1}"#;
        assert!(serde_json::from_str::<Task>(raw).is_err());
    }

    #[test]
    fn serializes_ordinals_as_integers() {
        let t = Task::new(1, "a", "2025-08-15")
            .with_difficulty(Difficulty::Easy)
            .with_importance(Importance::High);
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["difficulty"], 1);
        assert_eq!(v["importance"], 3);
        assert_eq!(v["dueDate"], "2025-08-15");
        assert!(v.get("completedDate").is_none());
    }
}
