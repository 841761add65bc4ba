// API client module: a small blocking HTTP client that talks to the PDF
// analysis backend. It is synchronous on purpose; the terminal UI shows a
// spinner while a request is in flight.

use crate::config::Config;
use crate::error::ClientError;
use crate::form::{AnalysisRequest, Backend};
use crate::models::{AnalysisResult, ErrorBody, HealthStatus};
use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::blocking::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use std::error::Error as _;
use std::io::Cursor;

const GENERIC_SERVER_ERROR: &str = "Server error";

/// Simple API client that holds a reqwest blocking client and the backend
/// configuration. Cloning is cheap; the underlying connection pool is shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: Config,
}

impl ApiClient {
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient { client, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Upload a PDF to `/analyze` as multipart/form-data. The `question`
    /// field is only added when the request carries one.
    pub fn analyze(&self, req: &AnalysisRequest) -> Result<AnalysisResult, ClientError> {
        let url = self.config.endpoint("/analyze");
        let file = &req.file;

        let part = multipart::Part::reader_with_length(Cursor::new(file.bytes().clone()), file.size())
            .file_name(file.filename().to_string())
            .mime_str("application/pdf")
            .map_err(|e| transport_error(&e))?;
        let mut form = multipart::Form::new().part("file", part);
        if let Some(question) = &req.question {
            form = form.text("question", question.clone());
        }

        debug!(
            "POST {} ({}, {} bytes, question: {})",
            url,
            file.filename(),
            file.size(),
            req.question.is_some()
        );
        let res = self.client.post(&url).multipart(form).send().map_err(|e| {
            warn!("analyze request failed: {}", e);
            transport_error(&e)
        })?;

        if !res.status().is_success() {
            return Err(server_error(res));
        }
        parse_json(res)
    }

    /// Ask the backend for its health report. A degraded server may answer
    /// with an error status and still send the report, so the body is read
    /// whatever the status; the error mapping only applies when it isn't a
    /// report.
    pub fn health(&self) -> Result<HealthStatus, ClientError> {
        let url = self.config.endpoint("/health");
        debug!("GET {}", url);
        let res = self.client.get(&url).send().map_err(|e| {
            warn!("health request failed: {}", e);
            transport_error(&e)
        })?;
        let status = res.status();
        if status.is_success() {
            return parse_json(res);
        }
        let body = res.text().unwrap_or_default();
        match serde_json::from_str::<HealthStatus>(&body) {
            Ok(health) => {
                warn!("health endpoint returned {}: {}", status, health.summary());
                Ok(health)
            }
            Err(_) => {
                let message = error_message(&body);
                warn!("server returned {}: {}", status, message);
                Err(ClientError::Server(message))
            }
        }
    }
}

impl Backend for ApiClient {
    fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, ClientError> {
        ApiClient::analyze(self, request)
    }

    fn health(&self) -> Result<HealthStatus, ClientError> {
        ApiClient::health(self)
    }
}

/// Turn a non-success response into a `ClientError::Server`, preferring the
/// body's `error` field over the generic message.
fn server_error(res: Response) -> ClientError {
    let status = res.status();
    let body = res.text().unwrap_or_default();
    let message = error_message(&body);
    warn!("server returned {}: {}", status, message);
    ClientError::Server(message)
}

/// The body's `error` field, or the generic message when the body is not
/// JSON or the field is missing or empty.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| GENERIC_SERVER_ERROR.to_string())
}

fn parse_json<T: DeserializeOwned>(res: Response) -> Result<T, ClientError> {
    let body = res.text().map_err(|e| transport_error(&e))?;
    serde_json::from_str(&body).map_err(|e| {
        warn!("could not parse response body: {}", e);
        ClientError::Server(format!("Invalid response from server: {}", e))
    })
}

/// Describe a transport failure, including the chain of underlying causes
/// so the user sees e.g. "connection refused" rather than a bare URL.
fn transport_error(err: &reqwest::Error) -> ClientError {
    let mut reason = if err.is_timeout() {
        format!("request timed out ({})", err)
    } else {
        err.to_string()
    };
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !reason.contains(&text) {
            reason.push_str(": ");
            reason.push_str(&text);
        }
        source = cause.source();
    }
    ClientError::Connection(reason)
}
