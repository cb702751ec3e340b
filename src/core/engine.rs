use crate::core::catalog::{Catalog, CatalogOrder};
use crate::core::loader::{default_record_paths, extract_records};
use crate::core::normalizer::Normalizer;
use crate::core::query::{top_n, DEFAULT_TOP_N};
use crate::domain::model::{Course, RankedEntry, ResultRecord, Selection};
use crate::domain::ports::DocumentSource;
use crate::utils::error::Result;

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub record_paths: Vec<String>,
    pub normalizer: Normalizer,
    pub catalog_order: CatalogOrder,
    pub top_n: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            record_paths: default_record_paths(),
            normalizer: Normalizer::default(),
            catalog_order: CatalogOrder::default(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// Everything one load produced. Read-only for the rest of the session.
#[derive(Debug, Clone)]
pub struct Snapshot {
    records: Vec<ResultRecord>,
    catalog: Catalog,
    normalizer: Normalizer,
    top_n: usize,
    record_path: String,
    source: String,
}

impl Snapshot {
    pub fn from_records(
        records: Vec<ResultRecord>,
        normalizer: Normalizer,
        order: CatalogOrder,
        top_n: usize,
    ) -> Self {
        let catalog = Catalog::build(&records, order);
        Self {
            records,
            catalog,
            normalizer,
            top_n,
            record_path: String::new(),
            source: String::new(),
        }
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// JSON path the records were read from.
    pub fn record_path(&self) -> &str {
        &self.record_path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Normalizes raw selector values with this snapshot's normalizer.
    pub fn selection(&self, course: &str, event: &str, gender: &str, age_group: &str) -> Result<Selection> {
        Selection::parse(&self.normalizer, course, event, gender, age_group)
    }

    pub fn query(&self, selection: &Selection) -> Vec<RankedEntry<'_>> {
        top_n(&self.records, selection, self.top_n)
    }

    /// A selection taken from the first record that can produce a non-empty
    /// leaderboard.
    pub fn default_selection(&self) -> Option<Selection> {
        self.records
            .iter()
            .find(|r| r.course.is_some() && !r.stroke_distance.is_empty() && r.gender.is_resolved())
            .and_then(|r| {
                Some(Selection {
                    course: r.course?,
                    stroke_distance: r.stroke_distance.clone(),
                    gender: r.gender.clone(),
                    age_group: r.age_group.clone(),
                })
            })
    }

    /// Fills any missing selector value from [`Snapshot::default_selection`];
    /// a missing event falls back to the course's first catalog event.
    pub fn complete_selection(
        &self,
        course: Option<Course>,
        event: Option<&str>,
        gender: Option<&str>,
        age_group: Option<&str>,
    ) -> Option<Selection> {
        let fallback = self.default_selection();
        let course = course.or(fallback.as_ref().map(|f| f.course))?;
        let stroke_distance = match event {
            Some(event) => self.normalizer.parse_event(event).base,
            None => {
                let previous = fallback
                    .as_ref()
                    .filter(|f| f.course == course)
                    .map(|f| f.stroke_distance.as_str());
                self.catalog.reconcile_event(course, previous)?
            }
        };
        let gender = gender.or(fallback.as_ref().map(|f| f.gender.as_str()))?;
        let age_group = age_group.or(fallback.as_ref().map(|f| f.age_group.as_str()))?;

        Some(Selection::normalized(
            &self.normalizer,
            course,
            &stroke_distance,
            gender,
            age_group,
        ))
    }
}

pub struct TopTimesEngine<S: DocumentSource> {
    source: S,
    options: LoadOptions,
}

impl<S: DocumentSource> TopTimesEngine<S> {
    pub fn new(source: S) -> Self {
        Self::with_options(source, LoadOptions::default())
    }

    pub fn with_options(source: S, options: LoadOptions) -> Self {
        Self { source, options }
    }

    /// Fetches, parses and normalizes the export.
    pub async fn load(&self) -> Result<Snapshot> {
        let location = self.source.describe();
        tracing::info!("Loading top times from {}", location);

        let bytes = self.source.fetch().await?;
        tracing::debug!("Fetched {} bytes", bytes.len());

        let document: serde_json::Value = serde_json::from_slice(&bytes)?;
        let loaded = extract_records(&document, &self.options.record_paths, &self.options.normalizer)?;

        let mut snapshot = Snapshot::from_records(
            loaded.records,
            self.options.normalizer.clone(),
            self.options.catalog_order,
            self.options.top_n,
        );
        snapshot.record_path = loaded.path;
        snapshot.source = location;

        tracing::info!(
            "Catalog: {} courses, {} age groups",
            snapshot.catalog.courses().len(),
            snapshot.catalog.age_groups().len()
        );
        Ok(snapshot)
    }
}
