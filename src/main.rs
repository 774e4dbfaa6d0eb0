use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use filesort::execution::io::atomic_write;
use filesort::{
    build_provider, init_tracing, ConfigError, DirectoryOrchestrator, FileReport, OrganizerConfig,
    ProviderConfig, ProviderKind, RunReport,
};

#[derive(Debug, Parser)]
#[command(
    name = "filesort",
    version,
    about = "Suggest descriptive names and folders for files with an LLM, then rename and move them."
)]
struct Cli {
    /// Directory whose immediate files are organized.
    #[arg(value_name = "DIRECTORY")]
    directory: PathBuf,

    /// Move files into <category>/<folder>/ subdirectories.
    #[arg(long)]
    move_files: bool,

    /// Rename files to the suggested name.
    #[arg(long)]
    rename_files: bool,

    /// Inference provider.
    #[arg(long, env = "FILESORT_PROVIDER", default_value = "gemini")]
    provider: CliProvider,

    /// Model identifier (defaults per provider, or FILESORT_MODEL).
    #[arg(long)]
    model: Option<String>,

    /// API key (defaults to GEMINI_API_KEY or ANTHROPIC_API_KEY).
    #[arg(long)]
    api_key: Option<String>,

    /// Characters of text content sent to the provider.
    #[arg(long, default_value_t = filesort::config::DEFAULT_PREVIEW_CHARS, value_name = "CHARS")]
    preview_chars: usize,

    /// Write the run report as JSON.
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum CliProvider {
    #[value(alias = "google")]
    Gemini,
    #[value(alias = "claude")]
    Anthropic,
}

impl From<CliProvider> for ProviderKind {
    fn from(value: CliProvider) -> Self {
        match value {
            CliProvider::Gemini => ProviderKind::Gemini,
            CliProvider::Anthropic => ProviderKind::Anthropic,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    load_env();
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(report) if report.has_failures() => ExitCode::from(1),
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            let usage = err.downcast_ref::<ConfigError>().is_some();
            ExitCode::from(if usage { 2 } else { 1 })
        }
    }
}

/// `.env` in the working directory, then its parent
fn load_env() {
    if dotenvy::dotenv().is_err() {
        let _ = dotenvy::from_path(Path::new("../.env"));
    }
}

async fn run(cli: Cli) -> Result<RunReport> {
    if !cli.directory.is_dir() {
        return Err(ConfigError::NotADirectory(cli.directory).into());
    }

    let provider_config = provider_config(&cli)?;
    let provider = build_provider(provider_config).context("failed to set up provider client")?;

    let config = OrganizerConfig {
        preview_chars: cli.preview_chars,
        ..OrganizerConfig::new(cli.move_files, cli.rename_files)
    };

    println!(
        "Organizing {} (move files: {}, rename files: {}, provider: {})",
        cli.directory.display(),
        config.move_enabled,
        config.rename_enabled,
        provider.name()
    );
    if config.is_preview() {
        println!("Preview only: no files will be changed.");
    }

    let show_suggestion = !(config.move_enabled && config.rename_enabled);
    let orchestrator = DirectoryOrchestrator::new(config, provider);

    let report = orchestrator
        .run(&cli.directory, |entry| print_entry(entry, show_suggestion))
        .await?;

    println!("Done: {}", report.summary());

    if let Some(path) = &cli.report {
        write_report(path, &report)?;
        println!("Report written to {}", path.display());
    }

    Ok(report)
}

fn provider_config(cli: &Cli) -> Result<ProviderConfig, ConfigError> {
    let kind = ProviderKind::from(cli.provider);

    let mut config = ProviderConfig::resolve(kind, cli.api_key.clone())?;

    if let Some(model) = &cli.model {
        config = config.with_model(model.clone());
    }

    Ok(config)
}

fn print_entry(entry: &FileReport, show_suggestion: bool) {
    println!("{}", entry.status_line());

    if !show_suggestion || entry.is_failure() {
        return;
    }
    if let Some(suggestion) = &entry.suggestion {
        println!("    suggested name:     {}", suggestion.file_name);
        println!("    suggested folder:   {}", suggestion.folder_name());
        println!("    suggested category: {}", suggestion.category);
    }
}

fn write_report(path: &Path, report: &RunReport) -> Result<()> {
    let json = serde_json::to_vec_pretty(report).context("failed to serialize report")?;
    atomic_write(path, &json).with_context(|| format!("failed to write report {}", path.display()))
}
