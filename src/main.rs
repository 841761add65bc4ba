// Entrypoint for the CLI application.
// - Keeps `main` small: parse flags, set up logging, create an API client
//   and hand it to the UI.
// - Returns `anyhow::Result` to simplify error handling at the edge.

use clap::{Parser, Subcommand};
use pdfsight_cli::{
    api::ApiClient,
    config::{Config, API_URL_ENV},
    ui::{analyze_once, health_once, main_menu},
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "pdfsight")]
#[command(about = "Upload a PDF to the analysis server and read the explanation")]
#[command(version)]
struct Cli {
    /// Base URL of the analysis server
    #[arg(long, global = true, env = API_URL_ENV)]
    api_url: Option<String>,

    /// Request timeout in seconds (at least 1)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the interactive menu (default)
    Interactive,
    /// Analyze a single PDF and print the result
    Analyze {
        /// Path to the PDF
        path: PathBuf,
        /// Optional question about the document
        #[arg(short, long)]
        question: Option<String>,
    },
    /// Check whether the server, Tesseract and the API key are available
    Health,
}

fn main() -> anyhow::Result<ExitCode> {
    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = Config::from_env();
    if let Some(url) = cli.api_url {
        config = config.with_api_base(url);
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    log::debug!("using backend {}", config.api_base);
    let api = ApiClient::new(config)?;

    let ok = match cli.command.unwrap_or(Command::Interactive) {
        Command::Interactive => {
            // Blocks until the user exits.
            main_menu(api)?;
            true
        }
        Command::Analyze { path, question } => analyze_once(&api, path, question)?,
        Command::Health => health_once(&api)?,
    };
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
