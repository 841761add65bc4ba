// Upload form state: the selected file, the optional question, the current
// phase and the last status message. The analyze and health flows run
// against a `Backend`, so the HTTP client can be swapped for a fake.

use crate::error::{ClientError, ValidationError};
use crate::models::{AnalysisResult, HealthStatus, StatusMessage};
use crate::validate::SelectedFile;
use log::{debug, info};
use std::path::Path;

const ANALYZING: &str = "Analyzing document… this can take a while for scanned PDFs.";
const ANALYSIS_COMPLETE: &str = "Analysis complete.";
const CHECKING_HEALTH: &str = "Checking server health…";

/// What gets uploaded to `/analyze`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub file: SelectedFile,
    /// Trimmed question; `None` when the user left it blank.
    pub question: Option<String>,
}

impl AnalysisRequest {
    pub fn new(file: SelectedFile, question: &str) -> Self {
        let question = question.trim();
        AnalysisRequest {
            file,
            question: (!question.is_empty()).then(|| question.to_string()),
        }
    }
}

/// The remote side of the form.
pub trait Backend {
    fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, ClientError>;
    fn health(&self) -> Result<HealthStatus, ClientError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded(AnalysisResult),
    Failed,
}

/// Analyze lifecycle. A result can only exist in `Settled(Succeeded)`, so
/// "loading with a result" cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Settled(Outcome),
}

#[derive(Debug, Default)]
pub struct UploadForm {
    selected: Option<SelectedFile>,
    question: String,
    phase: Phase,
    status: Option<StatusMessage>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.question = question.into();
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// The stored analysis, if the last analyze succeeded.
    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.phase {
            Phase::Settled(Outcome::Succeeded(result)) => Some(result),
            _ => None,
        }
    }

    /// Replace the selection with `candidate`. `None` just clears it. A
    /// rejected candidate also clears the previous selection, so a stale
    /// file can never be submitted.
    pub fn select(&mut self, candidate: Option<SelectedFile>) -> Result<(), ValidationError> {
        let Some(file) = candidate else {
            self.selected = None;
            return Ok(());
        };
        if let Err(err) = file.validate() {
            return Err(self.reject(err));
        }
        self.status = Some(StatusMessage::info(format!(
            "Selected {} ({:.2} MB)",
            file.filename(),
            file.size_mb()
        )));
        debug!("selected {} ({} bytes)", file.filename(), file.size());
        self.selected = Some(file);
        Ok(())
    }

    /// Load and select a file from disk.
    pub fn select_path(&mut self, path: &Path) -> Result<(), ClientError> {
        match SelectedFile::from_path(path) {
            Ok(file) => self.select(Some(file)).map_err(ClientError::from),
            Err(ClientError::Validation(err)) => Err(self.reject(err).into()),
            Err(err) => {
                self.selected = None;
                self.status = Some(StatusMessage::error(err.to_string()));
                Err(err)
            }
        }
    }

    fn reject(&mut self, err: ValidationError) -> ValidationError {
        info!("rejected selection: {}", err);
        self.selected = None;
        self.status = Some(StatusMessage::error(err.to_string()));
        err
    }

    /// First half of an analyze: check the gate and the selection, enter
    /// `Loading` and build the request. Nothing is sent here.
    pub fn begin_analyze(&mut self) -> Result<AnalysisRequest, ClientError> {
        if self.is_loading() {
            return Err(ClientError::Busy);
        }
        let Some(file) = &self.selected else {
            let err = ValidationError::NoFileSelected;
            self.status = Some(StatusMessage::error(err.to_string()));
            return Err(err.into());
        };
        let request = AnalysisRequest::new(file.clone(), &self.question);
        self.phase = Phase::Loading;
        self.status = Some(StatusMessage::info(ANALYZING));
        Ok(request)
    }

    /// Second half of an analyze: settle on the backend's answer.
    pub fn finish_analyze(
        &mut self,
        outcome: Result<AnalysisResult, ClientError>,
    ) -> Result<(), ClientError> {
        match outcome {
            Ok(result) => {
                info!(
                    "analysis of {} complete ({} pages, {} words, {})",
                    result.info.filename, result.info.pages, result.info.words, result.info.method
                );
                self.status = Some(StatusMessage::success(ANALYSIS_COMPLETE));
                self.phase = Phase::Settled(Outcome::Succeeded(result));
                Ok(())
            }
            Err(err) => {
                self.status = Some(StatusMessage::error(err.to_string()));
                self.phase = Phase::Settled(Outcome::Failed);
                Err(err)
            }
        }
    }

    /// Run a full analyze against `backend`. On success the analysis is
    /// available from [`UploadForm::result`].
    pub fn submit<B: Backend + ?Sized>(&mut self, backend: &B) -> Result<(), ClientError> {
        let request = self.begin_analyze()?;
        let outcome = backend.analyze(&request);
        self.finish_analyze(outcome)
    }

    /// Query the backend's health. Only the status message changes.
    pub fn check_health<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
    ) -> Result<HealthStatus, ClientError> {
        self.status = Some(StatusMessage::info(CHECKING_HEALTH));
        match backend.health() {
            Ok(health) => {
                self.status = Some(StatusMessage::info(health.summary()));
                Ok(health)
            }
            Err(err) => {
                self.status = Some(StatusMessage::error(format!(
                    "Health check failed: {}",
                    err.reason()
                )));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_UPLOAD_BYTES;
    use crate::models::{DocumentInfo, ExtractionMethod, StatusKind};
    use pretty_assertions::assert_eq;
    use std::cell::{Cell, RefCell};

    type AnalyzeFn = Box<dyn Fn(&AnalysisRequest) -> Result<AnalysisResult, ClientError>>;
    type HealthFn = Box<dyn Fn() -> Result<HealthStatus, ClientError>>;

    struct FakeBackend {
        analyze: AnalyzeFn,
        health: HealthFn,
        analyze_calls: Cell<usize>,
        questions: RefCell<Vec<Option<String>>>,
    }

    impl FakeBackend {
        fn new(analyze: AnalyzeFn, health: HealthFn) -> Self {
            FakeBackend {
                analyze,
                health,
                analyze_calls: Cell::new(0),
                questions: RefCell::new(Vec::new()),
            }
        }

        fn answering(result: AnalysisResult) -> Self {
            Self::new(
                Box::new(move |_: &AnalysisRequest| Ok(result.clone())),
                Box::new(|| Err(ClientError::Connection("unused".into()))),
            )
        }

        fn failing(err: fn() -> ClientError) -> Self {
            Self::new(Box::new(move |_: &AnalysisRequest| Err(err())), Box::new(move || Err(err())))
        }
    }

    impl Backend for FakeBackend {
        fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, ClientError> {
            self.analyze_calls.set(self.analyze_calls.get() + 1);
            self.questions.borrow_mut().push(request.question.clone());
            (self.analyze)(request)
        }

        fn health(&self) -> Result<HealthStatus, ClientError> {
            (self.health)()
        }
    }

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            info: DocumentInfo {
                filename: "a.pdf".into(),
                pages: 3,
                words: 120,
                method: ExtractionMethod::Text,
            },
            explanation: "x".into(),
            extracted_text: None,
        }
    }

    fn pdf(name: &str) -> SelectedFile {
        SelectedFile::new(name, b"%PDF-1.4".to_vec())
    }

    fn form_with_file() -> UploadForm {
        let mut form = UploadForm::new();
        form.select(Some(pdf("a.pdf"))).unwrap();
        form
    }

    #[test]
    fn valid_selection_reports_name_and_size() {
        let mut form = UploadForm::new();
        let file = SelectedFile::new("Thesis.PDF", vec![0u8; 1_572_864]);
        form.select(Some(file)).unwrap();
        assert_eq!(form.selected().map(|f| f.filename()), Some("Thesis.PDF"));
        assert_eq!(
            form.status(),
            Some(&StatusMessage::info("Selected Thesis.PDF (1.50 MB)"))
        );
    }

    #[test]
    fn selected_size_rounds_halves_up() {
        let mut form = UploadForm::new();
        form.select(Some(SelectedFile::new("a.pdf", vec![0u8; 1_179_648])))
            .unwrap();
        assert_eq!(
            form.status(),
            Some(&StatusMessage::info("Selected a.pdf (1.13 MB)"))
        );
    }

    #[test]
    fn oversize_selection_clears_previous_file() {
        let mut form = form_with_file();
        let big = SelectedFile::new("big.pdf", vec![0u8; MAX_UPLOAD_BYTES as usize + 1]);
        let err = form.select(Some(big)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLarge { .. }));
        assert!(form.selected().is_none());
        assert_eq!(form.status().unwrap().kind, StatusKind::Error);
        assert_eq!(
            form.status().unwrap().text,
            "File too large (50.00 MB). Max 50 MB."
        );
    }

    #[test]
    fn wrong_extension_clears_previous_file() {
        let mut form = form_with_file();
        let err = form.select(Some(pdf("notes.docx"))).unwrap_err();
        assert_eq!(err, ValidationError::InvalidExtension);
        assert!(form.selected().is_none());
        assert_eq!(
            form.status(),
            Some(&StatusMessage::error("Only PDF files are allowed."))
        );
    }

    #[test]
    fn clearing_selection_keeps_status() {
        let mut form = form_with_file();
        form.select(None).unwrap();
        assert!(form.selected().is_none());
        assert_eq!(form.status().unwrap().kind, StatusKind::Info);
    }

    #[test]
    fn submit_without_file_never_calls_backend() {
        let backend = FakeBackend::answering(sample_result());
        let mut form = UploadForm::new();
        let err = form.submit(&backend).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::NoFileSelected)
        ));
        assert_eq!(backend.analyze_calls.get(), 0);
        assert_eq!(form.phase(), &Phase::Idle);
        assert_eq!(
            form.status(),
            Some(&StatusMessage::error("Please select a PDF first."))
        );
    }

    #[test]
    fn question_is_trimmed_and_blank_is_omitted() {
        let backend = FakeBackend::answering(sample_result());
        let mut form = form_with_file();

        form.set_question("  What are the main points?  ");
        form.submit(&backend).unwrap();
        form.set_question("   \t ");
        form.submit(&backend).unwrap();
        form.set_question("");
        form.submit(&backend).unwrap();

        assert_eq!(
            *backend.questions.borrow(),
            vec![Some("What are the main points?".to_string()), None, None]
        );
    }

    #[test]
    fn success_stores_result_verbatim() {
        let backend = FakeBackend::answering(sample_result());
        let mut form = form_with_file();
        form.submit(&backend).unwrap();
        assert_eq!(
            form.phase(),
            &Phase::Settled(Outcome::Succeeded(sample_result()))
        );
        assert_eq!(form.result(), Some(&sample_result()));
        assert_eq!(
            form.status(),
            Some(&StatusMessage::success("Analysis complete."))
        );
        assert!(!form.is_loading());
    }

    #[test]
    fn server_error_leaves_no_result() {
        let mut form = form_with_file();
        form.submit(&FakeBackend::answering(sample_result())).unwrap();

        let backend = FakeBackend::failing(|| ClientError::Server("bad pdf".into()));
        form.submit(&backend).unwrap_err();
        assert_eq!(form.phase(), &Phase::Settled(Outcome::Failed));
        assert_eq!(form.result(), None);
        assert_eq!(form.status(), Some(&StatusMessage::error("bad pdf")));
    }

    #[test]
    fn connection_failure_mentions_reason() {
        let backend = FakeBackend::failing(|| ClientError::Connection("timeout".into()));
        let mut form = form_with_file();
        form.submit(&backend).unwrap_err();
        let status = form.status().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert!(status.text.contains("timeout"));
        assert_eq!(form.result(), None);
        assert!(!form.is_loading());
    }

    #[test]
    fn loading_clears_previous_result_and_blocks_resubmit() {
        let backend = FakeBackend::answering(sample_result());
        let mut form = form_with_file();
        form.submit(&backend).unwrap();

        let request = form.begin_analyze().unwrap();
        assert_eq!(request.file.filename(), "a.pdf");
        assert!(form.is_loading());
        assert_eq!(form.result(), None);
        assert_eq!(form.status().unwrap().text, ANALYZING);

        assert!(matches!(form.submit(&backend), Err(ClientError::Busy)));
        assert_eq!(backend.analyze_calls.get(), 1);
        assert!(form.is_loading());

        form.finish_analyze(Ok(sample_result())).unwrap();
        assert!(form.result().is_some());
    }

    #[test]
    fn health_success_formats_all_fields() {
        let backend = FakeBackend::new(
            Box::new(|_: &AnalysisRequest| Ok(sample_result())),
            Box::new(|| {
                Ok(HealthStatus {
                    status: "ok".into(),
                    tesseract: "found".into(),
                    api_key: "set".into(),
                })
            }),
        );
        let mut form = UploadForm::new();
        form.check_health(&backend).unwrap();
        let status = form.status().unwrap();
        assert_eq!(status.kind, StatusKind::Info);
        for part in ["ok", "found", "set"] {
            assert!(status.text.contains(part), "{}", status.text);
        }
    }

    #[test]
    fn health_failure_leaves_analysis_untouched() {
        let mut form = form_with_file();
        form.submit(&FakeBackend::answering(sample_result())).unwrap();

        let down = FakeBackend::failing(|| ClientError::Connection("connection refused".into()));
        form.check_health(&down).unwrap_err();
        assert_eq!(form.result(), Some(&sample_result()));
        assert!(!form.is_loading());
        assert!(form.selected().is_some());
        assert_eq!(
            form.status(),
            Some(&StatusMessage::error("Health check failed: connection refused"))
        );

        // While an analyze is pending the health check must not settle it.
        form.begin_analyze().unwrap();
        form.check_health(&down).unwrap_err();
        assert!(form.is_loading());
    }
}
