// UI layer: provides a simple interactive menu using `dialoguer`.
// The functions are small and synchronous to make the flow easy to follow.

use crate::api::ApiClient;
use crate::form::UploadForm;
use crate::models::{AnalysisResult, ExtractionMethod, StatusKind, StatusMessage};
use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

const MENU_SELECT: &str = "Select PDF (type a path)";
const MENU_BROWSE: &str = "Browse for PDF";
const MENU_QUESTION: &str = "Ask a question (optional)";
const MENU_HEALTH: &str = "Health check";
const MENU_RESULT: &str = "Show last result";
const MENU_EXIT: &str = "Exit";

/// Main interactive menu. Runs a select loop over a single form until the
/// user chooses "Exit".
///
/// Note: `Select::interact()` is keyboard-driven: you can use arrow keys
/// and Enter to choose an option.
pub fn main_menu(api: ApiClient) -> Result<()> {
    let mut form = UploadForm::new();
    println!("Backend: {}", api.config().api_base);
    loop {
        // The analyze entry doubles as the "in flight" indicator.
        let analyze_label = if form.is_loading() {
            "Processing...".to_string()
        } else {
            "Analyze document".to_string()
        };
        let question_label = match form.question().trim() {
            "" => MENU_QUESTION.to_string(),
            q => format!("{} [{}]", MENU_QUESTION, q),
        };
        let file_label = match form.selected() {
            Some(f) => format!("{} [{}]", MENU_SELECT, f.filename()),
            None => MENU_SELECT.to_string(),
        };
        let items = vec![
            file_label,
            MENU_BROWSE.to_string(),
            question_label,
            analyze_label,
            MENU_HEALTH.to_string(),
            MENU_RESULT.to_string(),
            MENU_EXIT.to_string(),
        ];
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => {
                let path: String = Input::new().with_prompt("PDF file path").interact_text()?;
                let _ = form.select_path(&PathBuf::from(path.trim()));
            }
            1 => {
                // Native file dialog, filtered to PDFs and opened in $HOME.
                let mut dialog = rfd::FileDialog::new().add_filter("PDF", &["pdf"]);
                if let Some(home) = dirs::home_dir() {
                    dialog = dialog.set_directory(home);
                }
                match dialog.pick_file() {
                    Some(path) => {
                        let _ = form.select_path(&path);
                    }
                    None => continue,
                }
            }
            2 => {
                let question: String = Input::new()
                    .with_prompt("Question (e.g. What are the main points?)")
                    .with_initial_text(form.question().to_string())
                    .allow_empty(true)
                    .interact_text()?;
                form.set_question(question);
                continue;
            }
            3 => {
                if form.is_loading() {
                    continue;
                }
                run_analysis(&mut form, &api)?;
                if let Some(result) = form.result() {
                    print_status(form.status());
                    show_result(result)?;
                    continue;
                }
            }
            4 => {
                let spinner = spinner("Checking server health...")?;
                let _ = form.check_health(&api);
                spinner.finish_and_clear();
            }
            5 => {
                match form.result() {
                    Some(result) => show_result(result)?,
                    None => println!("No analysis yet."),
                }
                continue;
            }
            _ => break,
        }
        print_status(form.status());
    }
    Ok(())
}

/// Submit the form while a spinner runs, so slow OCR jobs don't look hung.
fn run_analysis(form: &mut UploadForm, api: &ApiClient) -> Result<()> {
    if form.selected().is_none() {
        let _ = form.submit(api);
        return Ok(());
    }
    let spinner = spinner("Analyzing document... this can take a while for scanned PDFs.")?;
    let _ = form.submit(api);
    spinner.finish_and_clear();
    Ok(())
}

/// One-shot analysis used by the `analyze` subcommand. Returns whether it
/// succeeded so `main` can pick the exit code.
pub fn analyze_once(api: &ApiClient, path: PathBuf, question: Option<String>) -> Result<bool> {
    let mut form = UploadForm::new();
    if let Some(q) = question {
        form.set_question(q);
    }
    if form.select_path(&path).is_err() {
        print_status(form.status());
        return Ok(false);
    }
    run_analysis(&mut form, api)?;
    print_status(form.status());
    match form.result() {
        Some(result) => {
            println!("{}", render_result(result, true));
            Ok(true)
        }
        None => Ok(false),
    }
}

/// One-shot health check used by the `health` subcommand.
pub fn health_once(api: &ApiClient) -> Result<bool> {
    let mut form = UploadForm::new();
    let ok = form.check_health(api).is_ok();
    print_status(form.status());
    Ok(ok)
}

fn spinner(message: &str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

/// Print the status line colored by kind.
pub fn print_status(status: Option<&StatusMessage>) {
    let Some(status) = status else { return };
    let line = match status.kind {
        StatusKind::Error => status.text.as_str().red(),
        StatusKind::Success => status.text.as_str().green(),
        StatusKind::Info => status.text.as_str().cyan(),
    };
    println!("{}", line);
}

/// Print the result card and offer to show the extracted text.
fn show_result(result: &AnalysisResult) -> Result<()> {
    println!("{}", render_result(result, false));
    if let Some(text) = &result.extracted_text {
        let view = Confirm::new()
            .with_prompt(extracted_text_label(text))
            .default(false)
            .interact()?;
        if view {
            println!("{}", text);
        }
    }
    Ok(())
}

/// `File | Pages | Words` line followed by the method badge.
pub fn summary_line(result: &AnalysisResult) -> String {
    format!(
        "File: {}  |  Pages: {}  |  Words: {}  [{}]",
        result.info.filename, result.info.pages, result.info.words, result.info.method
    )
}

pub fn extracted_text_label(text: &str) -> String {
    format!("View extracted text ({} chars)", text.chars().count())
}

/// Plain-text rendering of a result. With `include_text` the extracted text
/// is appended instead of being offered behind a prompt.
pub fn render_result(result: &AnalysisResult, include_text: bool) -> String {
    let badge = match result.info.method {
        ExtractionMethod::Ocr => "scanned, OCR",
        ExtractionMethod::Text => "text layer",
    };
    let mut out = format!(
        "Analysis Result\n{} ({})\n\nAI Explanation\n{}\n",
        summary_line(result),
        badge,
        result.explanation
    );
    if include_text {
        if let Some(text) = &result.extracted_text {
            out.push_str(&format!("\nExtracted Text ({} chars)\n{}\n", text.chars().count(), text));
        }
    }
    out
}
