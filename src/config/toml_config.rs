use crate::app::presenter::OutputFormat;
use crate::config::source::{is_http_location, AnySource};
use crate::core::catalog::CatalogOrder;
use crate::core::engine::LoadOptions;
use crate::core::loader::default_record_paths;
use crate::core::normalizer::Normalizer;
use crate::core::query::DEFAULT_TOP_N;
use crate::utils::error::{Result, TopTimesError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

pub const MAX_TOP_N: usize = 100;

static ENV_VAR: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\$\{([^}]+)\}").expect("valid regex"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(default)]
    pub normalizer: NormalizerConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Local path or `http(s)://` URL of the export.
    pub location: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractConfig {
    pub record_paths: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Extra whole-word replacements, e.g. `BA = "BK"`.
    pub synonyms: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryConfig {
    pub top_n: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub order: Option<CatalogOrder>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
}

impl TomlConfig {
    /// Loads and parses a TOML config file; `${VAR}` references are expanded.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TopTimesError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| TopTimesError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(location) = &self.source.location {
            if is_http_location(location) {
                validation::validate_url("source.location", location)?;
            } else {
                validation::validate_path("source.location", location)?;
            }
        }

        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_range("source.timeout_seconds", timeout, 1, 600)?;
        }

        if let Some(paths) = &self.extract.record_paths {
            if paths.is_empty() {
                return Err(TopTimesError::ConfigValidationError {
                    field: "extract.record_paths".to_string(),
                    message: "at least one record path is required".to_string(),
                });
            }
            for path in paths {
                validation::validate_record_path("extract.record_paths", path)?;
            }
        }

        if let Some(synonyms) = &self.normalizer.synonyms {
            for (phrase, replacement) in synonyms {
                validation::validate_non_empty_string("normalizer.synonyms", phrase)?;
                validation::validate_non_empty_string("normalizer.synonyms", replacement)?;
                if !starts_and_ends_with_word_char(phrase) {
                    return Err(TopTimesError::InvalidConfigValueError {
                        field: "normalizer.synonyms".to_string(),
                        value: phrase.clone(),
                        reason: "Synonyms must start and end with a letter or digit".to_string(),
                    });
                }
            }
        }

        validation::validate_range("query.top_n", self.top_n(), 1, MAX_TOP_N)?;

        Ok(())
    }

    pub fn location(&self) -> Option<&str> {
        self.source.location.as_deref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.source.timeout_seconds.map(Duration::from_secs)
    }

    pub fn record_paths(&self) -> Vec<String> {
        self.extract
            .record_paths
            .clone()
            .unwrap_or_else(default_record_paths)
    }

    pub fn top_n(&self) -> usize {
        self.query.top_n.unwrap_or(DEFAULT_TOP_N)
    }

    pub fn catalog_order(&self) -> CatalogOrder {
        self.catalog.order.unwrap_or_default()
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output.format.unwrap_or_default()
    }

    pub fn normalizer(&self) -> Result<Normalizer> {
        match &self.normalizer.synonyms {
            Some(synonyms) if !synonyms.is_empty() => Normalizer::with_synonyms(synonyms),
            _ => Ok(Normalizer::default()),
        }
    }

    pub fn load_options(&self) -> Result<LoadOptions> {
        Ok(LoadOptions {
            record_paths: self.record_paths(),
            normalizer: self.normalizer()?,
            catalog_order: self.catalog_order(),
            top_n: self.top_n(),
        })
    }

    pub fn build_source(&self) -> Result<AnySource> {
        let location = validation::validate_required_field("source.location", &self.source.location)?;
        let source = AnySource::from_location(location, self.timeout());
        Ok(match (source, &self.source.headers) {
            (AnySource::Http(http), Some(headers)) => {
                AnySource::Http(http.with_headers(headers.clone()))
            }
            (source, _) => source,
        })
    }
}

fn starts_and_ends_with_word_char(phrase: &str) -> bool {
    let trimmed = phrase.trim();
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    trimmed.chars().next().is_some_and(is_word) && trimmed.chars().last().is_some_and(is_word)
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
