//! Canonical forms for the free-text fields of a top-times export.
//!
//! Nothing in here fails: malformed input degrades to a value that simply
//! matches no selection (`+∞` for times, pass-through strings for labels).

use crate::domain::model::{Course, Gender, RawRecord, ResultRecord};
use crate::utils::error::{Result, TopTimesError};
use regex::{NoExpand, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub const SENTINEL_TIMES: [&str; 4] = ["NT", "DQ", "NS", "SCR"];

/// Stroke synonyms applied before any configured ones. Order matters.
pub const DEFAULT_SYNONYMS: [(&str, &str); 6] = [
    ("FREESTYLE", "FR"),
    ("FREE", "FR"),
    ("BACKSTROKE", "BK"),
    ("BREASTSTROKE", "BR"),
    ("BUTTERFLY", "FL"),
    ("INDIVIDUAL MEDLEY", "IM"),
];

static MALE_TOKENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:M|MALES?|MENS?|MEN'S|BOYS?|BOY'S)\b").expect("valid regex"));
static FEMALE_TOKENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:F|FEMALES?|WOMENS?|WOMEN'S|GIRLS?|GIRL'S)\b").expect("valid regex"));
static AND_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bAND\b").expect("valid regex"));
static AMP_SPACING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*&\s*").expect("valid regex"));
static COURSE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(SCY|LCM)$").expect("valid regex"));
static RELAY_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+) (FR|MED|MEDLEY) RELAY$").expect("valid regex"));
static RELAY_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+) (FR|MED)-R$").expect("valid regex"));

/// Trim, uppercase and collapse internal whitespace to single spaces.
pub fn collapse(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

pub fn normalize_gender(raw: &str) -> Gender {
    let s = collapse(raw);
    if MALE_TOKENS.is_match(&s) {
        Gender::Male
    } else if FEMALE_TOKENS.is_match(&s) {
        Gender::Female
    } else {
        Gender::Unresolved(s)
    }
}

pub fn normalize_age_group(raw: &str) -> String {
    let s = collapse(raw).replace(['\u{2013}', '\u{2014}'], "-");
    let s = AND_WORD.replace_all(&s, "&");
    let s = AMP_SPACING.replace_all(&s, " & ");
    collapse(&s)
}

pub fn time_to_seconds(raw: &str) -> f64 {
    let s = raw.trim().to_uppercase();
    if s.is_empty() || SENTINEL_TIMES.contains(&s.as_str()) {
        return f64::INFINITY;
    }

    if s.contains(':') {
        return s
            .split(':')
            .try_fold(0.0, |acc, segment| {
                parse_time_segment(segment).map(|v| acc * 60.0 + v)
            })
            .unwrap_or(f64::INFINITY);
    }

    parse_time_segment(&s).unwrap_or(f64::INFINITY)
}

fn parse_time_segment(segment: &str) -> Option<f64> {
    let value: f64 = segment.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

/// Maps relay codes to their display labels (`200 FR-R` -> `200 Free Relay`).
/// Any other event key is returned unchanged.
pub fn display_event(key: &str) -> String {
    match RELAY_CODE.captures(key) {
        Some(caps) => {
            let kind = if &caps[2] == "FR" { "Free" } else { "Medley" };
            format!("{} {} Relay", &caps[1], kind)
        }
        None => key.to_string(),
    }
}

/// Renders a JSON field as text. Numbers are stringified, anything else that is
/// not a string becomes empty.
pub fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEvent {
    pub base: String,
    pub course: Option<Course>,
}

#[derive(Debug, Clone)]
struct Synonym {
    phrase: String,
    pattern: Regex,
    replacement: String,
}

impl Synonym {
    fn new(phrase: &str, replacement: &str) -> Result<Self> {
        let phrase = collapse(phrase);
        let body = phrase
            .split(' ')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"\s+");
        let pattern = Regex::new(&format!(r"\b{}\b", body)).map_err(|e| {
            TopTimesError::ConfigValidationError {
                field: "normalizer.synonyms".to_string(),
                message: format!("cannot use '{}' as a synonym: {}", phrase, e),
            }
        })?;
        Ok(Self {
            phrase,
            pattern,
            replacement: collapse(replacement),
        })
    }
}

/// Event normalizer backed by an ordered synonym table.
#[derive(Debug, Clone)]
pub struct Normalizer {
    synonyms: Vec<Synonym>,
}

impl Default for Normalizer {
    fn default() -> Self {
        let synonyms = DEFAULT_SYNONYMS
            .iter()
            .map(|(phrase, replacement)| Synonym::new(phrase, replacement))
            .collect::<Result<Vec<_>>>()
            .expect("default synonyms are valid");
        Self { synonyms }
    }
}

impl Normalizer {
    /// Merges `extra` into the default table. A configured phrase replaces a
    /// default with the same phrase. The merged table is applied with more
    /// words first, then longer phrases, so `FREE STYLE` is tried before `FREE`.
    pub fn with_synonyms(extra: &BTreeMap<String, String>) -> Result<Self> {
        let added = extra
            .iter()
            .map(|(phrase, replacement)| Synonym::new(phrase, replacement))
            .collect::<Result<Vec<_>>>()?;
        for synonym in &added {
            tracing::debug!("Synonym {} -> {}", synonym.phrase, synonym.replacement);
        }

        let mut synonyms = Self::default().synonyms;
        synonyms.retain(|default| added.iter().all(|s| s.phrase != default.phrase));
        synonyms.extend(added);
        // Stable: defaults keep precedence over configured entries on ties.
        synonyms.sort_by(|a, b| {
            let words = |s: &Synonym| s.phrase.split(' ').count();
            words(b)
                .cmp(&words(a))
                .then(b.phrase.len().cmp(&a.phrase.len()))
        });
        Ok(Self { synonyms })
    }

    /// Phrases in the order they are applied.
    pub fn synonym_phrases(&self) -> Vec<(&str, &str)> {
        self.synonyms
            .iter()
            .map(|s| (s.phrase.as_str(), s.replacement.as_str()))
            .collect()
    }

    /// Stroke-normalizes an event label that carries no course token.
    pub fn normalize_event_base(&self, raw: &str) -> String {
        let mut s = collapse(raw);
        for synonym in &self.synonyms {
            if synonym.pattern.is_match(&s) {
                s = synonym
                    .pattern
                    .replace_all(&s, NoExpand(&synonym.replacement))
                    .into_owned();
            }
        }
        let s = collapse(&s);

        if let Some(caps) = RELAY_LABEL.captures(&s) {
            let code = if &caps[2] == "FR" { "FR-R" } else { "MED-R" };
            return format!("{} {}", &caps[1], code);
        }
        s
    }

    pub fn parse_event(&self, raw: &str) -> ParsedEvent {
        let s = collapse(raw);
        let (rest, course) = match COURSE_SUFFIX.captures(&s) {
            Some(caps) => {
                let start = caps.get(0).map_or(s.len(), |m| m.start());
                (s[..start].trim_end().to_string(), Course::from_code(&caps[1]))
            }
            None => (s.clone(), None),
        };
        ParsedEvent {
            base: self.normalize_event_base(&rest),
            course,
        }
    }

    pub fn normalize_record(&self, index: usize, raw: &RawRecord) -> ResultRecord {
        let event_raw = collapse(&value_to_string(&raw.event));
        let parsed = self.parse_event(&event_raw);
        let time = value_to_string(&raw.time);

        ResultRecord {
            index,
            course: parsed.course,
            stroke_distance: parsed.base,
            event_raw,
            gender: normalize_gender(&value_to_string(&raw.competition_category)),
            age_group: normalize_age_group(&value_to_string(&raw.age_group)),
            seconds: time_to_seconds(&time),
            time,
            swim_date: value_to_string(&raw.swim_date),
            first_name: value_to_string(&raw.first),
            last_name: value_to_string(&raw.last),
        }
    }
}
