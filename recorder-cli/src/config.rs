//! Configuration loading from environment.

use std::env;

/// Store used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "memory://";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub log_json: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let log_json = match env::var("RECORDER_LOG_JSON") {
            Ok(value) => parse_flag(&value).ok_or_else(|| {
                anyhow::anyhow!("RECORDER_LOG_JSON must be true or false, got {value:?}")
            })?,
            Err(_) => false,
        };

        Ok(Self {
            database_url,
            log_json,
        })
    }

    /// Applies command-line overrides on top of the environment.
    pub fn with_overrides(mut self, database_url: Option<String>, log_json: bool) -> Self {
        if let Some(url) = database_url {
            self.database_url = url;
        }
        self.log_json |= log_json;
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_overrides_win() {
        let config = Config {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            log_json: false,
        }
        .with_overrides(Some("sqlite::memory:".to_string()), true);

        assert_eq!(config.database_url, "sqlite::memory:");
        assert!(config.log_json);
    }

    #[test]
    fn test_no_overrides_keep_environment() {
        let config = Config {
            database_url: "postgres://localhost/recorder".to_string(),
            log_json: true,
        }
        .with_overrides(None, false);

        assert_eq!(config.database_url, "postgres://localhost/recorder");
        assert!(config.log_json);
    }
}
