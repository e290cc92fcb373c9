use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Config;
use crate::dto::run_code_dto::RunCodeResponse;
use crate::error::{Error, Result};

#[derive(Debug, Serialize)]
struct PistonRequest<'a> {
    language: &'a str,
    version: &'a str,
    files: Vec<PistonFile<'a>>,
}

#[derive(Debug, Serialize)]
struct PistonFile<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct PistonResponse {
    #[serde(default)]
    run: Option<PistonRun>,
}

#[derive(Debug, Default, Deserialize)]
struct PistonRun {
    #[serde(default)]
    stdout: String,
    #[serde(default)]
    stderr: String,
}

/// Forwards learner code to the Piston execution API.
#[derive(Clone)]
pub struct CodeRunnerService {
    client: Client,
    api_url: String,
    language: String,
    version: String,
}

impl CodeRunnerService {
    pub fn new(client: Client, api_url: String, language: String, version: String) -> Self {
        Self {
            client,
            api_url,
            language,
            version,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.piston_timeout_secs))
            .build()?;
        Ok(Self::new(
            client,
            config.piston_api_url.clone(),
            config.piston_language.clone(),
            config.piston_version.clone(),
        ))
    }

    pub async fn run(&self, code: &str) -> Result<RunCodeResponse> {
        if code.is_empty() {
            return Err(Error::BadRequest("No code provided".to_string()));
        }

        let payload = PistonRequest {
            language: &self.language,
            version: &self.version,
            files: vec![PistonFile { content: code }],
        };

        info!(bytes = code.len(), language = %self.language, "Executing code");

        let resp = self
            .client
            .post(&self.api_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                warn!("Execution API unreachable: {}", e);
                Error::Upstream(format!("API request failed: {}", e))
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, "Execution API rejected request: {}", body);
            return Err(Error::Upstream(format!(
                "API request failed: {} {}",
                status,
                body.trim()
            )));
        }

        let body: PistonResponse = resp
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("Malformed execution response: {}", e)))?;
        let run = body.run.unwrap_or_default();

        Ok(RunCodeResponse {
            output: run.stdout,
            error: Some(run.stderr).filter(|s| !s.is_empty()),
        })
    }
}
