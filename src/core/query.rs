use crate::core::normalizer::{normalize_age_group, normalize_gender, Normalizer};
use crate::domain::model::{Course, RankedEntry, ResultRecord, Selection};
use crate::utils::error::{Result, TopTimesError};

pub const DEFAULT_TOP_N: usize = 10;

impl Selection {
    /// Builds a selection from user-facing values, running each one through the
    /// same normalization the records went through.
    pub fn normalized(
        normalizer: &Normalizer,
        course: Course,
        event: &str,
        gender: &str,
        age_group: &str,
    ) -> Self {
        Self {
            course,
            stroke_distance: normalizer.parse_event(event).base,
            gender: normalize_gender(gender),
            age_group: normalize_age_group(age_group),
        }
    }

    /// Like [`Selection::normalized`] but with the course as text.
    pub fn parse(
        normalizer: &Normalizer,
        course: &str,
        event: &str,
        gender: &str,
        age_group: &str,
    ) -> Result<Self> {
        let course = Course::from_code(course).ok_or_else(|| TopTimesError::InvalidSelection {
            field: "course".to_string(),
            value: course.to_string(),
        })?;
        Ok(Self::normalized(normalizer, course, event, gender, age_group))
    }

    pub fn matches(&self, record: &ResultRecord) -> bool {
        record.course == Some(self.course)
            && record.stroke_distance == self.stroke_distance
            && record.gender == self.gender
            && record.age_group == self.age_group
    }
}

/// Fastest `limit` records matching `selection`, ranked from 1. Ties keep
/// source order. An empty result is a normal outcome.
pub fn top_n<'a>(
    records: &'a [ResultRecord],
    selection: &Selection,
    limit: usize,
) -> Vec<RankedEntry<'a>> {
    let mut matching: Vec<&ResultRecord> =
        records.iter().filter(|r| selection.matches(r)).collect();
    matching.sort_by(|a, b| a.seconds.total_cmp(&b.seconds));

    tracing::debug!(
        "Query {} {} {} {}: {} matching records",
        selection.course,
        selection.stroke_distance,
        selection.gender,
        selection.age_group,
        matching.len()
    );

    matching
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, record)| RankedEntry {
            rank: i + 1,
            record,
        })
        .collect()
}
