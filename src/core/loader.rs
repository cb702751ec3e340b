use crate::core::normalizer::Normalizer;
use crate::domain::model::{RawRecord, ResultRecord};
use crate::utils::error::{Result, TopTimesError};
use serde_json::Value;

/// Nesting paths tried in order; the first non-empty array wins.
pub const DEFAULT_RECORD_PATHS: [&str; 4] = [
    "Table2.Detail_Collection",
    "Table1.Detail_Collection",
    "Detail_Collection",
    "rows",
];

pub fn default_record_paths() -> Vec<String> {
    DEFAULT_RECORD_PATHS.iter().map(|p| p.to_string()).collect()
}

/// Follows a dotted path through nested objects.
pub fn lookup_path<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |current, segment| current.as_object()?.get(segment))
}

/// Returns the matching path and its items.
pub fn find_record_array<'a>(
    document: &'a Value,
    paths: &'a [String],
) -> Option<(&'a str, &'a Vec<Value>)> {
    paths.iter().find_map(|path| {
        let items = lookup_path(document, path)?.as_array()?;
        if items.is_empty() {
            tracing::debug!("Record path '{}' is present but empty", path);
            None
        } else {
            Some((path.as_str(), items))
        }
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedRecords {
    pub path: String,
    pub records: Vec<ResultRecord>,
    /// Items that were not JSON objects.
    pub skipped: usize,
}

/// Locates the record collection in `document` and normalizes every item.
/// Fails only when no candidate path yields a non-empty array.
pub fn extract_records(
    document: &Value,
    paths: &[String],
    normalizer: &Normalizer,
) -> Result<LoadedRecords> {
    let Some((path, items)) = find_record_array(document, paths) else {
        let keys: Vec<&str> = document
            .as_object()
            .map(|obj| obj.keys().map(String::as_str).collect())
            .unwrap_or_default();
        tracing::error!("No rows found. Top-level keys: {:?}", keys);
        return Err(TopTimesError::NoData {
            tried: paths.to_vec(),
        });
    };

    let mut records = Vec::with_capacity(items.len());
    let mut skipped = 0;

    for (index, item) in items.iter().enumerate() {
        if !item.is_object() {
            skipped += 1;
            continue;
        }
        // Field values are held as raw JSON, so this only fails on non-objects.
        match serde_json::from_value::<RawRecord>(item.clone()) {
            Ok(raw) => records.push(normalizer.normalize_record(index, &raw)),
            Err(e) => {
                tracing::debug!("Skipping record {}: {}", index, e);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        tracing::warn!("Skipped {} malformed items under '{}'", skipped, path);
    }
    tracing::info!("Loaded {} records from '{}'", records.len(), path);

    if records.is_empty() {
        return Err(TopTimesError::NoData {
            tried: paths.to_vec(),
        });
    }

    Ok(LoadedRecords {
        path: path.to_string(),
        records,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Course;
    use serde_json::json;

    #[test]
    fn test_lookup_path() {
        let doc = json!({"Table2": {"Detail_Collection": [1, 2]}});
        assert_eq!(lookup_path(&doc, "Table2.Detail_Collection"), Some(&json!([1, 2])));
        assert_eq!(lookup_path(&doc, "Table2.Missing"), None);
        assert_eq!(lookup_path(&doc, "Table2.Detail_Collection.deeper"), None);
    }

    #[test]
    fn test_first_non_empty_candidate_wins() {
        let doc = json!({
            "Table2": {"Detail_Collection": []},
            "Table1": {"Detail_Collection": [{"Event": "50 FR SCY", "Time": "25.00"}]},
            "rows": [{"Event": "100 FR SCY"}, {"Event": "200 FR SCY"}]
        });

        let loaded = extract_records(&doc, &default_record_paths(), &Normalizer::default()).unwrap();
        assert_eq!(loaded.path, "Table1.Detail_Collection");
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].course, Some(Course::Scy));
    }

    #[test]
    fn test_custom_paths() {
        let doc = json!({"data": {"top10": [{"Event": "50 FR LCM"}]}});
        let paths = vec!["data.top10".to_string()];
        let loaded = extract_records(&doc, &paths, &Normalizer::default()).unwrap();
        assert_eq!(loaded.records[0].stroke_distance, "50 FR");
    }

    #[test]
    fn test_no_candidate_is_no_data() {
        let doc = json!({"Table3": {"Detail_Collection": [{"Event": "50 FR SCY"}]}});
        let err = extract_records(&doc, &default_record_paths(), &Normalizer::default()).unwrap_err();
        match err {
            TopTimesError::NoData { tried } => assert_eq!(tried.len(), 4),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_array_root_is_no_data() {
        let doc = json!([{"Event": "50 FR SCY"}]);
        assert!(matches!(
            extract_records(&doc, &default_record_paths(), &Normalizer::default()),
            Err(TopTimesError::NoData { .. })
        ));
    }

    #[test]
    fn test_malformed_items_are_skipped() {
        let doc = json!({"rows": [
            "not a record",
            {"Event": "50 FR SCY", "Time": 24.5, "First": null},
            42,
            {"Event": 17}
        ]});

        let loaded = extract_records(&doc, &default_record_paths(), &Normalizer::default()).unwrap();
        assert_eq!(loaded.skipped, 2);
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.records[0].index, 1);
        assert_eq!(loaded.records[0].seconds, 24.5);
        assert_eq!(loaded.records[1].course, None);
        assert_eq!(loaded.records[1].stroke_distance, "17");
    }

    #[test]
    fn test_only_malformed_items_is_no_data() {
        let doc = json!({"rows": [1, 2, 3]});
        assert!(matches!(
            extract_records(&doc, &default_record_paths(), &Normalizer::default()),
            Err(TopTimesError::NoData { .. })
        ));
    }
}
