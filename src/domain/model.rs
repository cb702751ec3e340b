use serde::{Deserialize, Serialize};
use std::fmt;

/// Pool length convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Course {
    #[serde(rename = "SCY")]
    Scy,
    #[serde(rename = "LCM")]
    Lcm,
}

impl Course {
    pub fn code(&self) -> &'static str {
        match self {
            Course::Scy => "SCY",
            Course::Lcm => "LCM",
        }
    }

    /// Accepts `SCY`/`LCM` in any case, surrounded by whitespace.
    pub fn from_code(raw: &str) -> Option<Course> {
        match raw.trim().to_uppercase().as_str() {
            "SCY" => Some(Course::Scy),
            "LCM" => Some(Course::Lcm),
            _ => None,
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    /// Collapsed-uppercase input that matched neither token set.
    Unresolved(String),
}

impl Gender {
    pub fn as_str(&self) -> &str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Unresolved(raw) => raw,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Gender::Unresolved(_))
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record as found in the export. Values are kept as JSON so that numbers
/// and nulls can be tolerated field by field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Event", default)]
    pub event: serde_json::Value,
    #[serde(rename = "Competition Category", default)]
    pub competition_category: serde_json::Value,
    #[serde(rename = "Age Group", default)]
    pub age_group: serde_json::Value,
    #[serde(rename = "Time", default)]
    pub time: serde_json::Value,
    #[serde(rename = "Swim Date", default)]
    pub swim_date: serde_json::Value,
    #[serde(rename = "First", default)]
    pub first: serde_json::Value,
    #[serde(rename = "Last", default)]
    pub last: serde_json::Value,
}

/// A swim performance after normalization. Immutable for the rest of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    /// Position in the source collection.
    pub index: usize,
    pub event_raw: String,
    pub course: Option<Course>,
    /// Canonical event key such as `50 FR` or `200 FR-R`; empty when unparsable.
    pub stroke_distance: String,
    pub gender: Gender,
    pub age_group: String,
    pub time: String,
    /// Comparable time; `f64::INFINITY` for sentinels and garbage.
    pub seconds: f64,
    pub swim_date: String,
    pub first_name: String,
    pub last_name: String,
}

/// Normalized query tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub course: Course,
    pub stroke_distance: String,
    pub gender: Gender,
    pub age_group: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedEntry<'a> {
    pub rank: usize,
    pub record: &'a ResultRecord,
}

/// Display-ready leaderboard line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub name: String,
    pub time: String,
    pub date: String,
}
