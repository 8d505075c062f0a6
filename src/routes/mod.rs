pub mod issue_graph;
pub mod root;

use crate::issue_client::SourceError;
use crate::window::WindowError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Window(#[from] WindowError),
    #[error("Unknown chart: {0}")]
    UnknownChart(String),
    #[error("Invalid project key: {0}")]
    InvalidProject(String),
    #[error("Either x or index must be given")]
    MissingHoverPosition,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Source(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::BAD_REQUEST,
        };
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::warn!("{}", self);
        }
        (status, self.to_string()).into_response()
    }
}

/// Project keys end up in URLs and HTML, so only a plain alphabet is accepted.
pub fn validate_project(project: &str) -> Result<&str, AppError> {
    let valid = !project.is_empty()
        && project
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(project)
    } else {
        Err(AppError::InvalidProject(project.to_string()))
    }
}
