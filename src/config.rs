use crate::issue_client::{IssueClient, IssueSource, SourceError};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Either ISSUES_API_BASE_URL or ISSUES_FILE must be set")]
    MissingSource,
    #[error("Could not build issue client: {0}")]
    Client(#[from] SourceError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub api_token: Option<String>,
    pub issues_file: Option<PathBuf>,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let config = Config {
            api_base_url: non_empty("ISSUES_API_BASE_URL"),
            api_token: non_empty("ISSUES_API_TOKEN"),
            issues_file: non_empty("ISSUES_FILE").map(PathBuf::from),
            bind_addr: non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        };

        if config.api_base_url.is_none() && config.issues_file.is_none() {
            return Err(ConfigError::MissingSource);
        }
        Ok(config)
    }

    /// The REST API wins over the local file when both are configured.
    pub fn issue_source(&self) -> Result<IssueSource, ConfigError> {
        match (&self.api_base_url, &self.issues_file) {
            (Some(base_url), _) => Ok(IssueSource::Http(IssueClient::new(
                base_url,
                self.api_token.as_deref(),
            )?)),
            (None, Some(path)) => Ok(IssueSource::File(path.clone())),
            (None, None) => Err(ConfigError::MissingSource),
        }
    }
}
