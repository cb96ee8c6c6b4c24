//! Client for the external resume parsing service used by autofill.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{header, Client};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, DependencyError};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone)]
pub struct ResumeParserClient {
    http: Client,
    url: Option<String>,
    api_key: Option<String>,
}

impl ResumeParserClient {
    pub fn new(url: Option<String>, api_key: Option<String>, timeout: Duration) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: url.filter(|u| !u.trim().is_empty()),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            config.resume_parser_url.clone(),
            config.resume_parser_api_key.clone(),
            config.resume_parser_timeout,
        )
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some() && self.api_key.is_some()
    }

    /// Sends the file as multipart field `resume` and returns the parser's JSON unchanged.
    #[tracing::instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn parse(&self, file_name: &str, content_type: Option<&str>, bytes: Vec<u8>) -> AppResult<Value> {
        let (Some(url), Some(api_key)) = (self.url.as_deref(), self.api_key.as_deref()) else {
            warn!("Resume autofill requested but the parser is not configured");
            return Err(DependencyError::NotConfigured.into());
        };

        // Unparseable client-supplied content types fall back to octet-stream.
        let mime = content_type
            .filter(|ct| Part::bytes(Vec::new()).mime_str(ct).is_ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE);
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .map_err(|e| AppError::Internal(format!("invalid multipart part: {e}")))?;
        let form = Form::new().part("resume", part);

        let response = self
            .http
            .post(url)
            .header(header::AUTHORIZATION, format!("Bearer {api_key}"))
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Resume parser rejected the file");
            let message = if body.trim().is_empty() {
                "Resume parsing failed".to_string()
            } else {
                body
            };
            return Err(DependencyError::Rejected {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let payload = response.json::<Value>().await.map_err(transport_error)?;
        info!("Resume parsed");
        Ok(payload)
    }
}

fn transport_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        error!(error = %err, "Resume parser timed out");
        DependencyError::Timeout.into()
    } else {
        error!(error = %err, "Resume parser request failed");
        DependencyError::Unavailable.into()
    }
}
