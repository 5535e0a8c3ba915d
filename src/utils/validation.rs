use crate::utils::error::{MovieNightError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(MovieNightError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(MovieNightError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(MovieNightError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(MovieNightError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(MovieNightError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Document names live inside the storage directory, so they must be plain
/// relative file names.
pub fn validate_document_name(field_name: &str, name: &str) -> Result<()> {
    validate_path(field_name, name)?;

    let path = std::path::Path::new(name);
    if path.is_absolute() || name.contains("..") || path.file_name().is_none() {
        return Err(MovieNightError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "Must be a relative file name inside the storage directory".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MovieNightError::InvalidConfigValueError {
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
        return Err(MovieNightError::InvalidConfigValueError {
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
        assert!(validate_url("metadata.endpoint", "https://www.omdbapi.com/").is_ok());
        assert!(validate_url("metadata.endpoint", "http://localhost:8080").is_ok());
        assert!(validate_url("metadata.endpoint", "").is_err());
        assert!(validate_url("metadata.endpoint", "not a url").is_err());
        assert!(validate_url("metadata.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_document_name() {
        assert!(validate_document_name("storage.poll_file", "currentpoll.json").is_ok());
        assert!(validate_document_name("storage.poll_file", "").is_err());
        assert!(validate_document_name("storage.poll_file", "../poll.json").is_err());
        assert!(validate_document_name("storage.poll_file", "/etc/poll.json").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("schedule.hour", 19u32, 0, 23).is_ok());
        assert!(validate_range("schedule.hour", 24u32, 0, 23).is_err());
        assert!(validate_non_empty_string("bot.name", "   ").is_err());
    }
}
