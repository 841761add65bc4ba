// Library root
// -----------
// This crate exposes the client logic for the PDF analysis backend. The
// binary (`main.rs`) uses these modules to implement the terminal client.
//
// Module responsibilities:
// - `config`: Resolves the backend URL, request timeout and upload limits.
// - `error`: Validation and client error types.
// - `models`: Wire types for `/analyze` and `/health` plus status messages.
// - `validate`: The pure file checks run before anything is uploaded.
// - `api`: Encapsulates HTTP interactions with the backend.
// - `form`: The upload form state (selection, question, phase, status)
//   and the analyze / health flows driven through the `Backend` trait.
// - `ui`: Implements the terminal flows and delegates requests to `form`.
//
// Keeping the form independent from the HTTP client means the flows can be
// tested with a fake backend and the UI can be replaced later.
pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod models;
pub mod ui;
pub mod validate;

pub use api::ApiClient;
pub use config::Config;
pub use error::{ClientError, ValidationError};
pub use form::{AnalysisRequest, Backend, Outcome, Phase, UploadForm};
pub use models::{
    AnalysisResult, DocumentInfo, ExtractionMethod, HealthStatus, StatusKind, StatusMessage,
};
pub use validate::{validate_candidate, SelectedFile};
