//! Blog-Scrape main entry point
//!
//! This is the command-line interface for the Blog-Scrape blog scraper.

use anyhow::Context;
use blog_scrape::config::{load_config_with_hash, parse_seed, Config, OutputFormat, OutputGrouping};
use blog_scrape::output::{generate_markdown_summary, print_summary, write_report, RunSummary};
use blog_scrape::scrape::{Scraper, Seed};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Blog-Scrape: a selector-driven blog scraper
///
/// Blog-Scrape fetches blog listing pages, extracts posts with per-site CSS
/// selectors, follows "next page" links and writes the records as JSON or
/// CSV.
#[derive(Parser, Debug)]
#[command(name = "blog-scrape")]
#[command(version)]
#[command(about = "A selector-driven blog scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Seed URL to scrape instead of the configured seeds (repeatable)
    #[arg(long = "seed", value_name = "URL")]
    seeds: Vec<String>,

    /// Output file, or directory with --per-seed
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Maximum pages fetched per seed
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    max_pages: Option<u32>,

    /// Maximum records kept per seed
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    max_posts: Option<u32>,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Write one file per seed
    #[arg(long)]
    per_seed: bool,

    /// Validate config and show which site each seed uses without fetching
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The log file may come from the config, so load it before logging starts
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;

    apply_overrides(&mut config, &cli);

    let log_file = config.logging.file.as_deref().map(Path::new);
    setup_logging(cli.verbose, cli.quiet, log_file)?;
    tracing::info!(
        "Configuration loaded from {} (hash: {})",
        cli.config.display(),
        config_hash
    );

    let mut scraper = Scraper::new(&config).context("Failed to set up scraper")?;
    if let Some(max_pages) = cli.max_pages {
        scraper = scraper.with_max_pages(max_pages);
    }
    let seeds = resolve_seeds(&scraper, &cli.seeds)?;

    if cli.dry_run {
        handle_dry_run(&config, &scraper, &seeds);
        return Ok(());
    }

    handle_scrape(&config, &scraper, &seeds, &config_hash).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so records written to stdout stay clean. With a log
/// file, the same events are appended there without ANSI colors.
fn setup_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("blog_scrape=info,warn"),
            1 => EnvFilter::new("blog_scrape=debug,info"),
            2 => EnvFilter::new("blog_scrape=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    let file_layer = match log_file {
        Some(path) => {
            let name = path
                .file_name()
                .with_context(|| format!("Log file {} has no file name", path.display()))?;
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

            let appender = RollingFileAppender::new(Rotation::NEVER, dir, name);
            Some(
                fmt::layer()
                    .with_writer(appender)
                    .with_ansi(false)
                    .with_target(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}

/// Applies command-line overrides on top of the file configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(output) = &cli.output {
        config.output.path = Some(output.to_string_lossy().into_owned());
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Some(max_posts) = cli.max_posts {
        config.scraper.max_posts = Some(max_posts);
    }
    if let Some(log_file) = &cli.log_file {
        config.logging.file = Some(log_file.to_string_lossy().into_owned());
    }
    if cli.per_seed {
        config.output.grouping = OutputGrouping::PerSeed;
    }
}

/// CLI seeds replace the configured ones; a malformed CLI seed is fatal
fn resolve_seeds(scraper: &Scraper, cli_seeds: &[String]) -> anyhow::Result<Vec<Seed>> {
    if cli_seeds.is_empty() {
        return Ok(scraper.config_seeds());
    }

    cli_seeds
        .iter()
        .map(|raw| {
            parse_seed(raw)
                .map(Seed::new)
                .with_context(|| format!("Invalid --seed value '{}'", raw))
        })
        .collect()
}

/// Handles the --dry-run mode: prints the resolved plan
fn handle_dry_run(config: &Config, scraper: &Scraper, seeds: &[Seed]) {
    println!("=== Blog-Scrape Dry Run ===\n");

    println!("Scraper Configuration:");
    println!("  Max pages per seed: {}", scraper.max_pages());
    match config.scraper.max_posts {
        Some(max_posts) => println!("  Max posts per seed: {}", max_posts),
        None => println!("  Max posts per seed: unlimited"),
    }
    println!("  Delay: {}ms", config.scraper.delay_ms);
    println!("  Timeout: {}s", config.scraper.timeout_secs);
    println!("  Retries: {}", config.scraper.max_retries);
    println!(
        "  Same-host pagination: {}",
        config.scraper.same_host_pagination
    );

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Format: {:?}", config.output.format);
    println!("  Grouping: {:?}", config.output.grouping);
    println!(
        "  Path: {}",
        config.output.path.as_deref().unwrap_or("(stdout)")
    );

    println!("\nSites ({}):", scraper.registry().sites().len());
    for site in scraper.registry().sites() {
        println!("  - {} ({})", site.name, site.domain);
    }

    println!("\nSeeds ({}):", seeds.len());
    let mut unmatched = 0;
    for seed in seeds {
        match scraper.site_for(seed) {
            Ok(site) => println!("  * {} -> {}", seed.url, site.name),
            Err(_) => {
                unmatched += 1;
                println!("  * {} -> (no matching site)", seed.url);
            }
        }
    }

    println!("\n✓ Configuration is valid");
    if unmatched > 0 {
        println!("! {} seeds have no matching site and would be skipped", unmatched);
    }
}

/// Handles the main scrape operation
async fn handle_scrape(
    config: &Config,
    scraper: &Scraper,
    seeds: &[Seed],
    config_hash: &str,
) -> anyhow::Result<()> {
    if config.output.grouping == OutputGrouping::PerSeed && config.output.path.is_none() {
        anyhow::bail!("Per-seed output needs an output directory (set [output] path or pass --output)");
    }

    let report = scraper.run(seeds).await;

    write_report(&report, &config.output).context("Failed to write records")?;

    let summary = RunSummary::from_report(&report, Some(config_hash));
    // Records may be on stdout; the summary joins them only when they went to a file
    if config.output.path.is_some() {
        print_summary(&summary);
    } else {
        tracing::info!(
            "{} records from {} pages across {} seeds",
            summary.total_records,
            summary.total_pages,
            summary.seeds.len()
        );
    }

    if let Some(path) = &config.output.summary_path {
        generate_markdown_summary(&summary, Path::new(path))
            .with_context(|| format!("Failed to write summary {}", path))?;
        tracing::info!("Summary written to {}", path);
    }

    if report.failed_seeds() > 0 {
        tracing::warn!(
            "{} of {} seeds recorded errors",
            report.failed_seeds(),
            report.sessions.len()
        );
    }

    Ok(())
}
