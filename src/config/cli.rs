use crate::app::presenter::OutputFormat;
use crate::config::toml_config::TomlConfig;
use crate::core::catalog::CatalogOrder;
use crate::domain::model::Course;
use crate::utils::error::{Result, TopTimesError};
use crate::utils::validation::Validate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "top-times")]
#[command(about = "Top 10 leaderboard for swim-meet top times exports")]
pub struct CliConfig {
    /// Path or http(s) URL of the JSON export (overrides [source].location)
    #[arg(short, long)]
    pub source: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// SCY or LCM
    #[arg(long)]
    pub course: Option<String>,

    /// Event such as "50 FR", "50 Free" or "200 Free Relay"
    #[arg(long)]
    pub event: Option<String>,

    /// M or F (also accepts Male, Girls, ...)
    #[arg(long)]
    pub gender: Option<String>,

    /// Age group such as "11-12" or "8 & Under"
    #[arg(long)]
    pub age_group: Option<String>,

    /// Number of rows to show (overrides [query].top_n)
    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Ordering of the listed options
    #[arg(long, value_enum)]
    pub order: Option<CatalogOrder>,

    /// List courses, events and age groups instead of running a query
    #[arg(long)]
    pub list: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

impl CliConfig {
    /// Loads the configuration file (if any) and applies flag overrides.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(source) = &self.source {
            config.source.location = Some(source.clone());
        }
        if let Some(limit) = self.limit {
            config.query.top_n = Some(limit);
        }
        if let Some(order) = self.order {
            config.catalog.order = Some(order);
        }
        if let Some(format) = self.format {
            config.output.format = Some(format);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn course(&self) -> Result<Option<Course>> {
        self.course
            .as_deref()
            .map(|raw| {
                Course::from_code(raw).ok_or_else(|| TopTimesError::InvalidSelection {
                    field: "course".to_string(),
                    value: raw.to_string(),
                })
            })
            .transpose()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        self.course()?;
        if let Some(limit) = self.limit {
            crate::utils::validation::validate_range(
                "--limit",
                limit,
                1,
                crate::config::toml_config::MAX_TOP_N,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_flags_override_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[source]\nlocation = \"a.json\"\n[query]\ntop_n = 3\n[output]\nformat = \"json\"\n")
            .unwrap();

        let cli = CliConfig::parse_from([
            "top-times",
            "--config",
            temp_file.path().to_str().unwrap(),
            "--source",
            "b.json",
            "--limit",
            "5",
        ]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.location(), Some("b.json"));
        assert_eq!(config.top_n(), 5);
        assert_eq!(config.output_format(), OutputFormat::Json);
    }

    #[test]
    fn test_parse_selector_flags() {
        let cli = CliConfig::parse_from([
            "top-times",
            "--source",
            "top10.json",
            "--course",
            "lcm",
            "--event",
            "200 Free Relay",
            "--gender",
            "F",
            "--age-group",
            "Open",
            "--format",
            "csv",
            "--order",
            "program",
        ]);

        assert!(cli.validate().is_ok());
        assert_eq!(cli.course().unwrap(), Some(Course::Lcm));
        assert_eq!(cli.event.as_deref(), Some("200 Free Relay"));
        assert_eq!(cli.age_group.as_deref(), Some("Open"));
        assert_eq!(cli.format, Some(OutputFormat::Csv));
        assert_eq!(cli.order, Some(CatalogOrder::Program));
    }

    #[test]
    fn test_invalid_course_and_limit() {
        let cli = CliConfig::parse_from(["top-times", "--course", "SCM"]);
        assert!(matches!(cli.validate(), Err(TopTimesError::InvalidSelection { .. })));

        let cli = CliConfig::parse_from(["top-times", "--limit", "0"]);
        assert!(cli.validate().is_err());
    }
}
