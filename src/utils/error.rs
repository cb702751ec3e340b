use thiserror::Error;

#[derive(Error, Debug)]
pub enum TopTimesError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP request to {url} returned status {status}")]
    HttpStatusError { url: String, status: u16 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("No records found at any of: {}", .tried.join(", "))]
    NoData { tried: Vec<String> },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid {field} selection: '{value}'")]
    InvalidSelection { field: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Load,
    Data,
    Config,
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TopTimesError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TopTimesError::HttpError(_)
            | TopTimesError::HttpStatusError { .. }
            | TopTimesError::IoError(_)
            | TopTimesError::ParseError(_) => ErrorCategory::Load,
            TopTimesError::NoData { .. } => ErrorCategory::Data,
            TopTimesError::ConfigError { .. }
            | TopTimesError::ConfigValidationError { .. }
            | TopTimesError::InvalidConfigValueError { .. }
            | TopTimesError::MissingConfigError { .. } => ErrorCategory::Config,
            TopTimesError::InvalidSelection { .. } => ErrorCategory::Input,
            TopTimesError::CsvError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Data => ErrorSeverity::Low,
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Load | ErrorCategory::Config => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    /// Short status line suitable for end users.
    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Load => "Error loading data".to_string(),
            ErrorCategory::Data => "No data available".to_string(),
            ErrorCategory::Config => format!("Invalid configuration: {}", self),
            ErrorCategory::Input => self.to_string(),
            ErrorCategory::Output => format!("Could not write results: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TopTimesError::HttpError(_) | TopTimesError::HttpStatusError { .. } => {
                "Check that the export URL is reachable and serves JSON"
            }
            TopTimesError::IoError(_) => "Check that the export file exists and is readable",
            TopTimesError::ParseError(_) => "The export is not valid JSON; regenerate it",
            TopTimesError::NoData { .. } => {
                "Add the path that holds the records to [extract].record_paths"
            }
            TopTimesError::InvalidSelection { .. } => {
                "Run with --list to see the available courses, events and age groups"
            }
            TopTimesError::CsvError(_) => "Check that stdout is writable",
            _ => "Review the configuration file and command-line flags",
        }
    }
}

pub type Result<T> = std::result::Result<T, TopTimesError>;
