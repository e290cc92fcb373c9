//! Client for the `POST /run-code` endpoint.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::dto::run_code_dto::RunCodeResponse;

const UNKNOWN_ERROR: &str = "An unknown error occurred";

/// Errors returned while asking the backend to execute code.
#[derive(Debug, Error)]
pub enum RunCodeError {
    /// The backend could not be reached.
    #[error("Failed to connect to the backend: {0}")]
    Connection(String),

    /// The transport gave up waiting for the backend.
    #[error("Request to the backend timed out")]
    Timeout,

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The backend answered with a body that is not a run result.
    #[error("Malformed response from the backend: {0}")]
    MalformedResponse(String),
}

impl RunCodeError {
    pub fn notice(&self) -> ErrorNotice {
        match self {
            RunCodeError::Connection(_) => ErrorNotice::from_category(ErrorCategory::Connection, ""),
            RunCodeError::Timeout => ErrorNotice::from_category(ErrorCategory::Timeout, ""),
            other => ErrorNotice::categorize(&other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Connection,
    Timeout,
    ExecutionFailed,
}

/// Title and detail line shown to the learner for a failed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice {
    pub category: ErrorCategory,
    pub title: &'static str,
    pub details: String,
}

impl ErrorNotice {
    pub fn categorize(message: &str) -> Self {
        let category = if message.contains("Failed to connect") {
            ErrorCategory::Connection
        } else if message.contains("timed out") {
            ErrorCategory::Timeout
        } else {
            ErrorCategory::ExecutionFailed
        };
        Self::from_category(category, message)
    }

    fn from_category(category: ErrorCategory, message: &str) -> Self {
        match category {
            ErrorCategory::Connection => Self {
                category,
                title: "Connection Error",
                details: "Unable to connect to the Python backend. Please check if the server is running."
                    .to_string(),
            },
            ErrorCategory::Timeout => Self {
                category,
                title: "Execution Timeout",
                details: "Your code took too long to execute. Please optimize your code or reduce complexity."
                    .to_string(),
            },
            ErrorCategory::ExecutionFailed => Self {
                category,
                title: "Execution Failed",
                details: message.to_string(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Clone)]
pub struct RunCodeClient {
    client: Client,
    endpoint: String,
}

impl RunCodeClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/run-code", base_url.trim_end_matches('/')),
        }
    }

    pub async fn run(&self, code: &str) -> Result<RunCodeResponse, RunCodeError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "code": code }))
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = resp.status();
        let bytes = resp.bytes().await.map_err(classify_transport_error)?;

        if status.is_success() {
            return serde_json::from_slice::<RunCodeResponse>(&bytes)
                .map_err(|e| RunCodeError::MalformedResponse(e.to_string()));
        }

        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
        tracing::debug!(status = status.as_u16(), "run-code rejected: {}", message);
        Err(RunCodeError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

fn classify_transport_error(err: reqwest::Error) -> RunCodeError {
    if err.is_timeout() {
        RunCodeError::Timeout
    } else {
        RunCodeError::Connection(err.to_string())
    }
}
