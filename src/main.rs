//! AiReady - AI-discoverability auditor for websites.
//!
//! A CLI tool that inspects a homepage and its well-known auxiliary
//! resources (robots.txt, sitemaps, llms.txt/ai.txt, structured data)
//! and produces a scored, prioritized audit report, optionally with a
//! plain-language narrative from a local chat model.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (invalid input, config failure, write failure)

mod analysis;
mod cli;
mod collector;
mod config;
mod models;
mod narrative;
mod report;
mod rules;
mod session;

use anyhow::{anyhow, Context, Result};
use cli::{Args, OutputFormat};
use config::Config;
use indicatif::ProgressBar;
use session::{AuditPipeline, MemoryReportCache, ProgressSink, Reply};
use std::time::Duration;
use tokio::io::AsyncBufReadExt;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("AiReady v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the audit
    match run(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Audit failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .aiready.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".aiready.toml");

    if path.exists() {
        eprintln!("⚠️  .aiready.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .aiready.toml")?;

    println!("✅ Created .aiready.toml with default settings.");
    println!("   Edit it to customize timeouts, the narrative model and the output path.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run either a one-shot audit or the interactive prompt.
async fn run(args: Args) -> Result<()> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let pipeline = AuditPipeline::new(&config);

    match args.url.clone() {
        Some(raw) => run_once(&args, &pipeline, &raw).await,
        None => run_interactive(&args, &pipeline).await,
    }
}

/// One-shot mode: audit a single URL and save the document.
async fn run_once(args: &Args, pipeline: &AuditPipeline, raw_url: &str) -> Result<()> {
    let base_url = session::normalize_url(raw_url)
        .ok_or_else(|| anyhow!("Invalid URL '{}'. Expected something like https://example.com", raw_url))?;

    println!("🔍 Auditing: {}", base_url);

    let progress = ConsoleProgress::new(args.quiet);
    let outcome = pipeline.run(&base_url, &progress).await?;
    progress.finish();

    // Technical report, chunked as a transport would deliver it
    for chunk in &outcome.chunks {
        println!("\n{}", chunk);
    }

    // Narrative blocks
    if !outcome.narrative.explainer.is_empty() {
        println!("\n🗣️  Plain-language explanation\n{}", outcome.narrative.explainer);
    }
    if !outcome.narrative.tips.is_empty() {
        println!("\n💡 Five improvement tips");
        for tip in &outcome.narrative.tips {
            println!("   • {}", tip);
        }
    }
    if !outcome.narrative.summary.is_empty() {
        println!("\n🧾 Conclusion\n{}", outcome.narrative.summary);
    }

    // Export the document
    let content = match args.format {
        OutputFormat::Markdown => outcome.document.clone(),
        OutputFormat::Json => report::document::generate_json_report(&outcome.report)?,
    };
    std::fs::write(&args.output, &content)
        .with_context(|| format!("Failed to write report to {}", args.output.display()))?;

    // Print summary
    let scores = outcome.report.scores;
    println!("\n📊 Audit summary:");
    println!(
        "   Visibility: {:.1}/10 | SEO: {:.1}/10 | GEO: {:.1}/10",
        scores.visibility, scores.seo, scores.geo
    );
    println!(
        "   Open items in Top-5: {}",
        outcome.report.top_remediations.len()
    );
    println!(
        "\n✅ Audit complete! Report saved to: {}",
        args.output.display()
    );

    Ok(())
}

/// Interactive mode: read commands and URLs from stdin until EOF.
async fn run_interactive(args: &Args, pipeline: &AuditPipeline) -> Result<()> {
    let cache = MemoryReportCache::new();

    println!("{}\n", session::USAGE_BANNER);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "/quit" || input == "/exit" {
            break;
        }

        let progress = ConsoleProgress::new(args.quiet);
        let replies = pipeline.handle(0, input, &cache, &progress).await;
        progress.finish();

        for reply in replies {
            match reply {
                Reply::Text(text) => println!("{}\n", text),
                Reply::Document(document) => {
                    std::fs::write(&args.output, &document).with_context(|| {
                        format!("Failed to write report to {}", args.output.display())
                    })?;
                    println!("📄 Document saved to: {}\n", args.output.display());
                }
            }
        }
    }

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .aiready.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}

/// Spinner-backed progress sink for terminal runs.
struct ConsoleProgress {
    bar: ProgressBar,
}

impl ConsoleProgress {
    fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new_spinner();
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        };
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for ConsoleProgress {
    fn notify(&self, text: &str) {
        self.bar.set_message(text.to_string());
    }
}
