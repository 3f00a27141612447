use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use strata_client::ReqwestFetcher;
use strata_core::extract::parse_page;
use strata_core::{ScrapeConfig, ScrapeResult, ScrapeService, parse_target_url};

#[derive(Parser)]
#[command(name = "strata", version, about = "Section-level web page extraction")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, render and segment a web page into sections
    Scrape {
        /// Target URL to scrape
        #[arg(short, long)]
        url: String,

        /// Print single-line JSON instead of pretty-printed output
        #[arg(long, default_value_t = false)]
        compact: bool,
    },

    /// Segment a saved HTML file without any network access
    Parse {
        /// Path to the HTML file
        #[arg(short, long)]
        file: PathBuf,

        /// URL the file was saved from, used to resolve relative links
        #[arg(short, long, env = "STRATA_BASE_URL")]
        base_url: String,

        #[arg(long, default_value_t = false)]
        compact: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Setup tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("strata=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape { url, compact } => cmd_scrape(&url, compact).await?,
        Commands::Parse {
            file,
            base_url,
            compact,
        } => cmd_parse(&file, &base_url, compact)?,
    }

    Ok(())
}

async fn cmd_scrape(url: &str, compact: bool) -> Result<()> {
    let target = parse_target_url(url)?;
    let config = ScrapeConfig::from_env().context("Invalid configuration")?;

    // The user controls this machine, so local targets are allowed.
    let fetcher = ReqwestFetcher::from_config(&config.fetch)
        .context("Failed to create HTTP client")?
        .allow_private_urls();

    let result = run_scrape(fetcher, target.as_str(), &config).await;
    for error in &result.errors {
        tracing::warn!(phase = ?error.phase, "{}", error.message);
    }

    print_json(&result, compact)
}

#[cfg(feature = "browser")]
async fn run_scrape(fetcher: ReqwestFetcher, url: &str, config: &ScrapeConfig) -> ScrapeResult {
    let renderer = strata_client::ChromiumRenderer::with_config(config.render.clone());
    ScrapeService::new(fetcher, renderer).scrape(url).await
}

#[cfg(not(feature = "browser"))]
async fn run_scrape(fetcher: ReqwestFetcher, url: &str, _config: &ScrapeConfig) -> ScrapeResult {
    tracing::warn!("Built without the `browser` feature; only the static fetch will succeed");
    ScrapeService::new(fetcher, strata_core::NoopRenderer)
        .scrape(url)
        .await
}

fn cmd_parse(file: &Path, base_url: &str, compact: bool) -> Result<()> {
    let base = parse_target_url(base_url)?;
    let html = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read HTML file: {}", file.display()))?;

    let page = parse_page(&html, &base);
    tracing::info!(sections = page.sections.len(), "Parsed {}", file.display());

    let output = serde_json::json!({
        "meta": page.meta,
        "sections": page.sections,
    });
    print_json(&output, compact)
}

/// Output JSON to stdout; logs go to stderr.
fn print_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{json}");
    Ok(())
}
