use crate::domain::ports::ConfigProvider;
use crate::utils::error::{MovieNightError, Result};
use crate::utils::validation::{
    validate_document_name, validate_non_empty_string, validate_path, validate_range,
    validate_url, Validate,
};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    pub bot: BotSection,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    pub metadata: Option<MetadataConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotSection {
    pub name: String,
    #[serde(default = "default_prefix")]
    pub command_prefix: String,
    /// Community the bot serves. Informational only.
    pub guild: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_directory")]
    pub directory: String,
    #[serde(default = "default_poll_file")]
    pub poll_file: String,
    #[serde(default = "default_movie_file")]
    pub movie_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_weekday")]
    pub weekday: String,
    #[serde(default = "default_hour")]
    pub hour: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_directory() -> String {
    ".".to_string()
}

fn default_poll_file() -> String {
    "currentpoll.json".to_string()
}

fn default_movie_file() -> String {
    "movielist.json".to_string()
}

fn default_weekday() -> String {
    "friday".to_string()
}

fn default_hour() -> u32 {
    19
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            poll_file: default_poll_file(),
            movie_file: default_movie_file(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            weekday: default_weekday(),
            hour: default_hour(),
        }
    }
}

impl MetadataConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(5))
    }
}

impl BotConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MovieNightError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MovieNightError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are
    /// left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MovieNightError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn weekday(&self) -> Result<Weekday> {
        self.schedule
            .weekday
            .parse()
            .map_err(|_| MovieNightError::InvalidConfigValueError {
                field: "schedule.weekday".to_string(),
                value: self.schedule.weekday.clone(),
                reason: "Expected a day name such as 'friday'".to_string(),
            })
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().map(|l| l.json).unwrap_or(false)
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("bot.name", &self.bot.name)?;
        validate_non_empty_string("bot.command_prefix", &self.bot.command_prefix)?;

        validate_path("storage.directory", &self.storage.directory)?;
        validate_document_name("storage.poll_file", &self.storage.poll_file)?;
        validate_document_name("storage.movie_file", &self.storage.movie_file)?;
        if self.storage.poll_file == self.storage.movie_file {
            return Err(MovieNightError::InvalidConfigValueError {
                field: "storage.movie_file".to_string(),
                value: self.storage.movie_file.clone(),
                reason: "Must differ from storage.poll_file".to_string(),
            });
        }

        self.weekday()?;
        validate_range("schedule.hour", self.schedule.hour, 0, 23)?;

        if let Some(metadata) = &self.metadata {
            validate_url("metadata.endpoint", &metadata.endpoint)?;
            if let Some(timeout) = metadata.timeout_seconds {
                validate_range("metadata.timeout_seconds", timeout, 1, 120)?;
            }
        }

        Ok(())
    }
}

impl ConfigProvider for BotConfig {
    fn command_prefix(&self) -> &str {
        &self.bot.command_prefix
    }

    fn poll_document(&self) -> &str {
        &self.storage.poll_file
    }

    fn movie_document(&self) -> &str {
        &self.storage.movie_file
    }

    fn movie_night(&self) -> (Weekday, u32) {
        (self.weekday().unwrap_or(Weekday::Fri), self.schedule.hour)
    }
}

impl Validate for BotConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let toml_content = r#"
[bot]
name = "movie-night"
"#;

        let config = BotConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.command_prefix(), "!");
        assert_eq!(config.poll_document(), "currentpoll.json");
        assert_eq!(config.movie_document(), "movielist.json");
        assert_eq!(config.movie_night(), (Weekday::Fri, 19));
        assert!(config.metadata.is_none());
        assert!(!config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[bot]
name = "movie-night"
command_prefix = "?"
guild = "Film Club"

[storage]
directory = "/var/lib/movie-night"
poll_file = "poll.json"
movie_file = "movies.json"

[schedule]
weekday = "Sat"
hour = 20

[metadata]
endpoint = "https://www.omdbapi.com/"
api_key = "abc123"
timeout_seconds = 3

[logging]
json = true
"#;

        let config = BotConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.command_prefix(), "?");
        assert_eq!(config.movie_night(), (Weekday::Sat, 20));
        assert_eq!(
            config.metadata.as_ref().unwrap().timeout(),
            Duration::from_secs(3)
        );
        assert!(config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_bot_section_fails() {
        let result = BotConfig::from_toml_str("[storage]\ndirectory = \".\"\n");

        assert!(matches!(
            result,
            Err(MovieNightError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("MOVIE_NIGHT_TEST_KEY", "secret-key");

        let toml_content = r#"
[bot]
name = "movie-night"

[metadata]
endpoint = "https://www.omdbapi.com/"
api_key = "${MOVIE_NIGHT_TEST_KEY}"
"#;

        let config = BotConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.metadata.unwrap().api_key.as_deref(),
            Some("secret-key")
        );

        std::env::remove_var("MOVIE_NIGHT_TEST_KEY");
    }

    #[test]
    fn test_config_validation() {
        let bad_weekday = r#"
[bot]
name = "movie-night"

[schedule]
weekday = "someday"
"#;
        assert!(BotConfig::from_toml_str(bad_weekday)
            .unwrap()
            .validate()
            .is_err());

        let bad_hour = r#"
[bot]
name = "movie-night"

[schedule]
hour = 25
"#;
        assert!(BotConfig::from_toml_str(bad_hour).unwrap().validate().is_err());

        let same_files = r#"
[bot]
name = "movie-night"

[storage]
poll_file = "state.json"
movie_file = "state.json"
"#;
        assert!(BotConfig::from_toml_str(same_files)
            .unwrap()
            .validate()
            .is_err());

        let bad_endpoint = r#"
[bot]
name = "movie-night"

[metadata]
endpoint = "invalid-url"
"#;
        assert!(BotConfig::from_toml_str(bad_endpoint)
            .unwrap()
            .validate()
            .is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[bot]
name = "file-test"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = BotConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.bot.name, "file-test");
    }
}
