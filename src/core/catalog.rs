use crate::core::normalizer::display_event;
use crate::domain::model::{Course, ResultRecord};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// How selection options are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum CatalogOrder {
    #[default]
    Lexicographic,
    /// Swim-program order: free, back, breast, fly, IM, relays; ascending distance.
    Program,
}

const STROKE_PROGRAM: [&str; 7] = ["FR", "BK", "BR", "FL", "IM", "FR-R", "MED-R"];

/// Distinct selection values observed in a record set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    events: BTreeMap<Course, Vec<String>>,
    age_groups: Vec<String>,
}

impl Catalog {
    pub fn build(records: &[ResultRecord], order: CatalogOrder) -> Self {
        let mut events: BTreeMap<Course, BTreeSet<String>> = BTreeMap::new();
        let mut age_groups = BTreeSet::new();

        for record in records {
            if let Some(course) = record.course {
                if !record.stroke_distance.is_empty() {
                    events
                        .entry(course)
                        .or_default()
                        .insert(record.stroke_distance.clone());
                }
            }
            if !record.age_group.is_empty() {
                age_groups.insert(record.age_group.clone());
            }
        }

        let mut events: BTreeMap<Course, Vec<String>> = events
            .into_iter()
            .map(|(course, set)| (course, set.into_iter().collect()))
            .collect();
        let mut age_groups: Vec<String> = age_groups.into_iter().collect();

        if order == CatalogOrder::Program {
            for list in events.values_mut() {
                list.sort_by(|a, b| program_event_cmp(a, b));
            }
            age_groups.sort_by(|a, b| age_group_cmp(a, b));
        }

        Self { events, age_groups }
    }

    pub fn courses(&self) -> Vec<Course> {
        self.events.keys().copied().collect()
    }

    pub fn events_for(&self, course: Course) -> &[String] {
        self.events.get(&course).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `(value, label)` pairs for an event picker.
    pub fn event_options(&self, course: Course) -> Vec<(String, String)> {
        self.events_for(course)
            .iter()
            .map(|key| (key.clone(), display_event(key)))
            .collect()
    }

    pub fn age_groups(&self) -> &[String] {
        &self.age_groups
    }

    /// Keeps `previous` when the course still offers it, otherwise the first event.
    pub fn reconcile_event(&self, course: Course, previous: Option<&str>) -> Option<String> {
        let events = self.events_for(course);
        previous
            .filter(|prev| events.iter().any(|e| e.as_str() == *prev))
            .map(str::to_string)
            .or_else(|| events.first().cloned())
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.age_groups.is_empty()
    }
}

fn split_event(key: &str) -> (Option<u32>, &str) {
    match key.split_once(' ') {
        Some((distance, stroke)) => (distance.parse().ok(), stroke),
        None => (None, key),
    }
}

fn program_event_cmp(a: &str, b: &str) -> Ordering {
    let (dist_a, stroke_a) = split_event(a);
    let (dist_b, stroke_b) = split_event(b);
    let rank = |stroke: &str| {
        STROKE_PROGRAM
            .iter()
            .position(|s| *s == stroke)
            .unwrap_or(STROKE_PROGRAM.len())
    };

    rank(stroke_a)
        .cmp(&rank(stroke_b))
        .then_with(|| stroke_a.cmp(stroke_b))
        .then_with(|| dist_a.unwrap_or(u32::MAX).cmp(&dist_b.unwrap_or(u32::MAX)))
        .then_with(|| a.cmp(b))
}

/// Smallest number in the label; `OPEN` sorts after everything.
fn age_group_key(label: &str) -> u32 {
    if label.eq_ignore_ascii_case("OPEN") {
        return u32::MAX;
    }
    label
        .split(|c: char| !c.is_ascii_digit())
        .filter_map(|token| token.parse::<u32>().ok())
        .min()
        .unwrap_or(u32::MAX - 1)
}

fn age_group_cmp(a: &str, b: &str) -> Ordering {
    age_group_key(a)
        .cmp(&age_group_key(b))
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalizer::Normalizer;
    use crate::domain::model::RawRecord;

    fn records(rows: &[(&str, &str)]) -> Vec<ResultRecord> {
        let normalizer = Normalizer::default();
        rows.iter()
            .enumerate()
            .map(|(i, (event, age))| {
                let raw = RawRecord {
                    event: serde_json::json!(event),
                    age_group: serde_json::json!(age),
                    ..Default::default()
                };
                normalizer.normalize_record(i, &raw)
            })
            .collect()
    }

    #[test]
    fn test_build_partitions_events_by_course() {
        let recs = records(&[
            ("50 FR SCY", "11-12"),
            ("50 Free SCY", "11-12"),
            ("100 BK LCM", "13-14"),
            ("200 Free Relay LCM", "Open"),
            ("garbage", "9-10"),
        ]);
        let catalog = Catalog::build(&recs, CatalogOrder::Lexicographic);

        assert_eq!(catalog.courses(), vec![Course::Scy, Course::Lcm]);
        assert_eq!(catalog.events_for(Course::Scy), ["50 FR"]);
        assert_eq!(catalog.events_for(Course::Lcm), ["100 BK", "200 FR-R"]);
        assert_eq!(catalog.age_groups(), ["11-12", "13-14", "9-10", "OPEN"]);
    }

    #[test]
    fn test_program_order() {
        let recs = records(&[
            ("200 MED-R SCY", "Open"),
            ("100 FL SCY", "13-14"),
            ("400 IM SCY", "8 & Under"),
            ("100 FR SCY", "9-10"),
            ("50 FR SCY", "15 & Over"),
            ("100 BR SCY", "11-12"),
            ("50 BK SCY", "Senior"),
            ("200 FR-R SCY", "11-12"),
        ]);
        let catalog = Catalog::build(&recs, CatalogOrder::Program);

        assert_eq!(
            catalog.events_for(Course::Scy),
            [
                "50 FR", "100 FR", "50 BK", "100 BR", "100 FL", "400 IM", "200 FR-R",
                "200 MED-R"
            ]
        );
        assert_eq!(
            catalog.age_groups(),
            ["8 & UNDER", "9-10", "11-12", "13-14", "15 & OVER", "SENIOR", "OPEN"]
        );
    }

    #[test]
    fn test_event_options_use_display_labels() {
        let recs = records(&[("200 FR-R LCM", "Open"), ("50 FR LCM", "Open")]);
        let catalog = Catalog::build(&recs, CatalogOrder::Lexicographic);

        assert_eq!(
            catalog.event_options(Course::Lcm),
            vec![
                ("200 FR-R".to_string(), "200 Free Relay".to_string()),
                ("50 FR".to_string(), "50 FR".to_string()),
            ]
        );
    }

    #[test]
    fn test_reconcile_event() {
        let recs = records(&[("50 FR SCY", "Open"), ("100 FR SCY", "Open"), ("50 FR LCM", "Open")]);
        let catalog = Catalog::build(&recs, CatalogOrder::Lexicographic);

        assert_eq!(
            catalog.reconcile_event(Course::Scy, Some("50 FR")),
            Some("50 FR".to_string())
        );
        assert_eq!(
            catalog.reconcile_event(Course::Lcm, Some("100 FR")),
            Some("50 FR".to_string())
        );
        assert_eq!(catalog.reconcile_event(Course::Scy, None), Some("100 FR".to_string()));
    }

    #[test]
    fn test_empty_records_give_empty_catalog() {
        let catalog = Catalog::build(&[], CatalogOrder::Program);
        assert!(catalog.is_empty());
        assert!(catalog.events_for(Course::Scy).is_empty());
        assert_eq!(catalog.reconcile_event(Course::Scy, Some("50 FR")), None);
    }
}
