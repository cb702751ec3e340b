//! Turns query results into display rows, status lines and rendered output.

use crate::core::catalog::Catalog;
use crate::domain::model::{Course, LeaderboardRow, RankedEntry, Selection};
use crate::utils::error::{Result, TopTimesError};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::io::Write;

pub const PLACEHOLDER: &str = "—";

pub const LOADING_MESSAGE: &str = "Loading…";
pub const LOAD_FAILED_MESSAGE: &str = "Error loading data";
pub const NO_DATA_MESSAGE: &str = "No data available";
pub const NO_RESULTS_MESSAGE: &str = "No results found";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

/// `first last` trimmed, else whichever is present, else the placeholder.
pub fn display_name(first: &str, last: &str) -> String {
    let name = format!("{} {}", first.trim(), last.trim());
    let name = name.trim();
    if name.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        name.to_string()
    }
}

fn or_placeholder(value: &str) -> String {
    if value.trim().is_empty() {
        PLACEHOLDER.to_string()
    } else {
        value.trim().to_string()
    }
}

pub fn present(entries: &[RankedEntry<'_>]) -> Vec<LeaderboardRow> {
    entries
        .iter()
        .map(|entry| LeaderboardRow {
            rank: entry.rank,
            name: display_name(&entry.record.first_name, &entry.record.last_name),
            time: or_placeholder(&entry.record.time),
            date: or_placeholder(&entry.record.swim_date),
        })
        .collect()
}

/// What the results area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    LoadFailed,
    NoData,
    NoResults,
    Rows(Vec<LeaderboardRow>),
}

impl ViewState {
    pub fn from_rows(rows: Vec<LeaderboardRow>) -> Self {
        if rows.is_empty() {
            ViewState::NoResults
        } else {
            ViewState::Rows(rows)
        }
    }

    /// Empty datasets get their own state; every other load error is a failure.
    pub fn from_load_error(error: &TopTimesError) -> Self {
        match error {
            TopTimesError::NoData { .. } => ViewState::NoData,
            _ => ViewState::LoadFailed,
        }
    }

    pub fn status_message(&self) -> Option<&'static str> {
        match self {
            ViewState::Loading => Some(LOADING_MESSAGE),
            ViewState::LoadFailed => Some(LOAD_FAILED_MESSAGE),
            ViewState::NoData => Some(NO_DATA_MESSAGE),
            ViewState::NoResults => Some(NO_RESULTS_MESSAGE),
            ViewState::Rows(_) => None,
        }
    }

    fn status_code(&self) -> &'static str {
        match self {
            ViewState::Loading => "loading",
            ViewState::LoadFailed => "error",
            ViewState::NoData => "no_data",
            ViewState::NoResults => "no_results",
            ViewState::Rows(_) => "ok",
        }
    }

    pub fn rows(&self) -> &[LeaderboardRow] {
        match self {
            ViewState::Rows(rows) => rows.as_slice(),
            _ => &[],
        }
    }
}

#[derive(Debug, Serialize)]
struct SelectionView<'a> {
    course: Course,
    event: &'a str,
    gender: &'a str,
    age_group: &'a str,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    selection: Option<SelectionView<'a>>,
    rows: &'a [LeaderboardRow],
}

pub fn render<W: Write>(
    state: &ViewState,
    selection: Option<&Selection>,
    format: OutputFormat,
    writer: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Table => render_table(state, selection, writer),
        OutputFormat::Csv => render_csv(state, writer),
        OutputFormat::Json => render_json(state, selection, writer),
    }
}

fn render_table<W: Write>(state: &ViewState, selection: Option<&Selection>, writer: &mut W) -> Result<()> {
    if let Some(selection) = selection {
        writeln!(
            writer,
            "{} {} | {} | {}",
            selection.course,
            crate::core::normalizer::display_event(&selection.stroke_distance),
            selection.gender,
            selection.age_group
        )?;
    }

    let rows = match state {
        ViewState::Rows(rows) => rows,
        other => {
            writeln!(writer, "{}", other.status_message().unwrap_or_default())?;
            return Ok(());
        }
    };

    let name_width = rows
        .iter()
        .map(|r| r.name.chars().count())
        .chain(std::iter::once("Name".len()))
        .max()
        .unwrap_or(4);
    let time_width = rows
        .iter()
        .map(|r| r.time.chars().count())
        .chain(std::iter::once("Swim Time".len()))
        .max()
        .unwrap_or(9);

    writeln!(
        writer,
        "{:>4}  {:<name_width$}  {:<time_width$}  Date",
        "Rank", "Name", "Swim Time"
    )?;
    for row in rows {
        writeln!(
            writer,
            "{:>4}  {:<name_width$}  {:<time_width$}  {}",
            row.rank, row.name, row.time, row.date
        )?;
    }
    Ok(())
}

fn build_csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new().has_headers(false).from_writer(writer)
}

/// Rows as `rank,name,time,date`; any other state as a `status,message` record.
fn render_csv<W: Write>(state: &ViewState, writer: &mut W) -> Result<()> {
    let mut csv_writer = build_csv_writer(writer);
    if let Some(message) = state.status_message() {
        csv_writer.write_record(["status", "message"])?;
        csv_writer.write_record([state.status_code(), message])?;
        csv_writer.flush()?;
        return Ok(());
    }

    csv_writer.write_record(["rank", "name", "time", "date"])?;
    for row in state.rows() {
        let rank = row.rank.to_string();
        csv_writer.write_record([rank.as_str(), row.name.as_str(), row.time.as_str(), row.date.as_str()])?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn render_json<W: Write>(state: &ViewState, selection: Option<&Selection>, writer: &mut W) -> Result<()> {
    let report = JsonReport {
        generated_at: Utc::now().to_rfc3339(),
        status: state.status_code(),
        message: state.status_message(),
        selection: selection.map(|s| SelectionView {
            course: s.course,
            event: &s.stroke_distance,
            gender: s.gender.as_str(),
            age_group: &s.age_group,
        }),
        rows: state.rows(),
    };
    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct EventOptionView {
    value: String,
    label: String,
}

#[derive(Debug, Serialize)]
struct CatalogView<'a> {
    events: std::collections::BTreeMap<Course, Vec<EventOptionView>>,
    age_groups: &'a [String],
}

/// Lists the selection options, the CLI's stand-in for populating dropdowns.
pub fn render_catalog<W: Write>(catalog: &Catalog, format: OutputFormat, writer: &mut W) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let view = CatalogView {
                events: catalog
                    .courses()
                    .into_iter()
                    .map(|course| {
                        let options = catalog
                            .event_options(course)
                            .into_iter()
                            .map(|(value, label)| EventOptionView { value, label })
                            .collect();
                        (course, options)
                    })
                    .collect(),
                age_groups: catalog.age_groups(),
            };
            serde_json::to_writer_pretty(&mut *writer, &view)?;
            writeln!(writer)?;
        }
        OutputFormat::Csv => {
            let mut csv_writer = build_csv_writer(writer);
            csv_writer.write_record(["kind", "course", "value", "label"])?;
            for course in catalog.courses() {
                for (value, label) in catalog.event_options(course) {
                    csv_writer.write_record(["event", course.code(), value.as_str(), label.as_str()])?;
                }
            }
            for age_group in catalog.age_groups() {
                csv_writer.write_record(["age_group", "", age_group.as_str(), age_group.as_str()])?;
            }
            csv_writer.flush()?;
        }
        OutputFormat::Table => {
            for course in catalog.courses() {
                writeln!(writer, "{} events:", course)?;
                for (value, label) in catalog.event_options(course) {
                    if value == label {
                        writeln!(writer, "  {}", value)?;
                    } else {
                        writeln!(writer, "  {} ({})", value, label)?;
                    }
                }
            }
            writeln!(writer, "Age groups:")?;
            for age_group in catalog.age_groups() {
                writeln!(writer, "  {}", age_group)?;
            }
        }
    }
    Ok(())
}
