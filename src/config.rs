//! Client configuration parsed from environment variables.

pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";

/// Errors produced while parsing client configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The base URL is empty or not an http(s) origin.
    #[error("invalid base URL '{0}': expected http:// or https:// origin")]
    InvalidBaseUrl(String),

    /// A timeout value is not a positive integer.
    #[error("invalid {key}: '{value}' is not a positive number of seconds")]
    InvalidTimeout { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_owned(), request_timeout_secs: None, connect_timeout_secs: None }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `QUIZMASTER_BASE_URL`: default `http://localhost:5001`
    /// - `QUIZMASTER_REQUEST_TIMEOUT_SECS`: unset means network default
    /// - `QUIZMASTER_CONNECT_TIMEOUT_SECS`: unset means network default
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] but reads keys through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = match lookup("QUIZMASTER_BASE_URL") {
            Some(raw) => parse_base_url(&raw)?,
            None => DEFAULT_BASE_URL.to_owned(),
        };
        let request_timeout_secs =
            parse_timeout("QUIZMASTER_REQUEST_TIMEOUT_SECS", lookup("QUIZMASTER_REQUEST_TIMEOUT_SECS"))?;
        let connect_timeout_secs =
            parse_timeout("QUIZMASTER_CONNECT_TIMEOUT_SECS", lookup("QUIZMASTER_CONNECT_TIMEOUT_SECS"))?;

        Ok(Self { base_url, request_timeout_secs, connect_timeout_secs })
    }

    /// Override the base URL, applying the same validation as the env parser.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(raw)?;
        Ok(self)
    }

    /// Join the base origin with an absolute API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let has_host = trimmed.split_once("://").is_some_and(|(_, host)| !host.is_empty());
    if !has_scheme || !has_host {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

fn parse_timeout(key: &'static str, raw: Option<String>) -> Result<Option<u64>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Some(secs)),
        _ => Err(ConfigError::InvalidTimeout { key, value: raw }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
