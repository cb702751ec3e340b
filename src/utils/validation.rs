use crate::utils::error::{Result, TopTimesError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(TopTimesError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(TopTimesError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(TopTimesError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(TopTimesError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(TopTimesError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// A dotted JSON path such as `Table2.Detail_Collection`. Empty segments are rejected.
pub fn validate_record_path(field_name: &str, path: &str) -> Result<()> {
    if path.split('.').any(|segment| segment.trim().is_empty()) {
        return Err(TopTimesError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Record path segments cannot be empty".to_string(),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| TopTimesError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TopTimesError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(TopTimesError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("source.location", "https://example.com/top10.json").is_ok());
        assert!(validate_url("source.location", "http://example.com").is_ok());
        assert!(validate_url("source.location", "").is_err());
        assert!(validate_url("source.location", "invalid-url").is_err());
        assert!(validate_url("source.location", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_record_path() {
        assert!(validate_record_path("extract.record_paths", "Table2.Detail_Collection").is_ok());
        assert!(validate_record_path("extract.record_paths", "rows").is_ok());
        assert!(validate_record_path("extract.record_paths", "").is_err());
        assert!(validate_record_path("extract.record_paths", "Table2..rows").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("query.top_n", 10, 1, 100).is_ok());
        assert!(validate_range("query.top_n", 0, 1, 100).is_err());
        assert!(validate_range("query.top_n", 101, 1, 100).is_err());
    }
}
