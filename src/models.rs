// Data shapes exchanged with the analysis backend, plus the status message
// the form shows to the user. Field names mirror the server's JSON.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the server got the text out of the PDF.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    /// Scanned document, text recognised with Tesseract.
    #[serde(rename = "OCR")]
    Ocr,
    /// Embedded text layer read directly.
    #[serde(rename = "TEXT")]
    Text,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::Ocr => "OCR",
            ExtractionMethod::Text => "TEXT",
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    pub filename: String,
    pub pages: u64,
    pub words: u64,
    pub method: ExtractionMethod,
}

/// Successful response of `POST /analyze`. Stored as received.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub info: DocumentInfo,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
}

/// Body of a non-success response. `error` may be missing.
#[derive(Deserialize, Debug, Default)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of `GET /health`. Purely informational.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    pub tesseract: String,
    pub api_key: String,
}

impl HealthStatus {
    /// Single-line summary shown as the status message.
    pub fn summary(&self) -> String {
        format!(
            "Server: {}; Tesseract: {}; API Key: {}",
            self.status, self.tesseract, self.api_key
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
    Success,
}

/// The one line of feedback the form shows. Every transition replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        StatusMessage {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        StatusMessage {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        StatusMessage {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }
}
