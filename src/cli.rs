//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// AiReady - AI-discoverability auditor for websites
///
/// Audit any website for AI/LLM discoverability: robots directives,
/// sitemaps, LLM policy files, structured data and snippet readiness.
/// Markdown/JSON reports, plus a plain-language narrative from a local
/// chat model.
///
/// Examples:
///   aiready https://example.com
///   aiready example.com --no-narrative --output audit.md
///   aiready https://example.com --model llama3.2:latest --format json
///   aiready --init-config
///   aiready            (interactive prompt)
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Site URL to audit
    ///
    /// A bare domain is accepted and upgraded to https://. When omitted,
    /// an interactive prompt starts instead.
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Model used for the narrative step
    ///
    /// Can also be set via AIREADY_MODEL env var or .aiready.toml config.
    #[arg(short, long, default_value = "llama3.2:latest", env = "AIREADY_MODEL")]
    pub model: String,

    /// Narrative chat API endpoint URL
    #[arg(
        long,
        default_value = "http://localhost:11434",
        env = "AIREADY_NARRATIVE_URL"
    )]
    pub narrative_url: String,

    /// Output file path for the exported document
    #[arg(short, long, default_value = "aiready_report.md", value_name = "FILE")]
    pub output: PathBuf,

    /// Output format for the exported document (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Temperature for narrative responses (0.0 - 1.0)
    #[arg(long, default_value = "0.2")]
    pub temperature: f32,

    /// Per-resource fetch timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub fetch_timeout: Option<u64>,

    /// Narrative request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub narrative_timeout: Option<u64>,

    /// Skip the narrative step and deliver the technical report only
    #[arg(long)]
    pub no_narrative: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .aiready.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .aiready.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the exported document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Validate narrative API URL unless the step is disabled
        if !self.no_narrative
            && !self.narrative_url.starts_with("http://")
            && !self.narrative_url.starts_with("https://")
        {
            return Err("Narrative URL must start with 'http://' or 'https://'".to_string());
        }

        // Validate temperature range
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err("Temperature must be between 0.0 and 1.0".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // Validate timeouts if provided
        if self.fetch_timeout == Some(0) || self.narrative_timeout == Some(0) {
            return Err("Timeouts must be at least 1 second".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
