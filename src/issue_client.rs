use crate::models::*;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

const PAGE_SIZE: usize = 100;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Request to issue API failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid API token: {0}")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),
    #[error("Failed to read issues file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse issues file: {0}")]
    Json(#[from] serde_json::Error),
}

pub struct IssueClient {
    client: reqwest::Client,
    base_url: String,
}

impl IssueClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self, SourceError> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(token) = token {
            headers.insert(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", token).parse()?,
            );
        }

        Ok(Self {
            client: reqwest::Client::builder()
                .default_headers(headers)
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn _get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, SourceError> {
        let url = format!("{}{}", self.base_url, path);
        Ok(self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?)
    }

    pub async fn get_project_issues(&self, project: &str) -> Result<Vec<RawIssue>, SourceError> {
        let mut issues: Vec<RawIssue> = Vec::new();
        let mut page = 1;

        loop {
            let response = self
                ._get::<IssuePageResponse>(&format!(
                    "/api/projects/{}/issues?page={}&page_size={}",
                    project, page, PAGE_SIZE
                ))
                .await?;

            let page_len = response.items.len();
            issues.extend(response.items);
            page += 1;

            if page_len == 0 || issues.len() as u64 >= response.total {
                break;
            }
        }

        Ok(issues)
    }
}

pub enum IssueSource {
    Http(IssueClient),
    /// A JSON object mapping project keys to arrays of issues.
    File(PathBuf),
}

impl IssueSource {
    pub async fn fetch_records(&self, project: &str) -> Result<Vec<IssueRecord>, SourceError> {
        let raw = match self {
            IssueSource::Http(client) => client.get_project_issues(project).await?,
            IssueSource::File(path) => {
                let content = tokio::fs::read_to_string(path).await?;
                let mut projects: HashMap<String, Vec<RawIssue>> = serde_json::from_str(&content)?;
                projects.remove(project).unwrap_or_else(|| {
                    log::warn!("Project {} is not listed in {}", project, path.display());
                    Vec::new()
                })
            }
        };
        log::info!("Fetched {} issues for project {}", raw.len(), project);
        Ok(validate_issues(raw))
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc))
}

/// Drops issues whose timestamps cannot be parsed, so they never reach the aggregator.
pub fn validate_issues(raw: Vec<RawIssue>) -> Vec<IssueRecord> {
    raw.into_iter()
        .filter_map(|issue| {
            match (parse_timestamp(&issue.created_at), parse_timestamp(&issue.updated_at)) {
                (Some(created_at), Some(updated_at)) => Some(IssueRecord {
                    created_at,
                    updated_at,
                    status: issue.status,
                }),
                _ => {
                    log::warn!(
                        "Skipping issue with malformed timestamps: created_at={:?} updated_at={:?}",
                        issue.created_at,
                        issue.updated_at
                    );
                    None
                }
            }
        })
        .collect()
}
