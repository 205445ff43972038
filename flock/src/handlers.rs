use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use url::Url;

use flock_client::{ApiClient, ClientConfig, RequestExecutor, RetryPolicy};
use flock_core::report::{
    ReportData, ReportFormat, generate_json_report, generate_text_report, save_report,
};
use flock_core::{CrawlOptions, CrawlProgressCallback, execute_crawl, render};

/// Environment variable the bearer token is read from when --token is not
/// given.
pub const TOKEN_ENV_VAR: &str = "FLOCK_API_TOKEN";

// Helper functions for the crawl handler

/// Resolves the bearer token: an explicit flag wins over the environment.
pub fn resolve_token(flag: Option<&str>, env_value: Option<String>) -> Result<String, String> {
    if let Some(token) = flag {
        return Ok(token.to_string());
    }
    match env_value {
        Some(token) if !token.trim().is_empty() => Ok(token),
        _ => Err(format!(
            "No API token: pass --token or set {}",
            TOKEN_ENV_VAR
        )),
    }
}

/// Normalizes a seed reference: trims whitespace and a pasted-in leading
/// '@'. Rejects an empty result.
pub fn normalize_seed(raw: &str) -> Result<String, String> {
    let seed = raw.trim().trim_start_matches('@');
    if seed.is_empty() {
        return Err("Seed screen name is empty".to_string());
    }
    Ok(seed.to_string())
}

/// Assembles the crawl options from command-line flags.
pub fn crawl_options_from_args(args: &ArgMatches) -> Result<CrawlOptions, String> {
    let seed = normalize_seed(args.get_one::<String>("seed").expect("seed is required"))?;
    Ok(CrawlOptions {
        seed,
        friends_cap: *args.get_one::<usize>("friends-cap").unwrap(),
        followers_cap: *args.get_one::<usize>("followers-cap").unwrap(),
        trim_width: *args.get_one::<usize>("trim-width").unwrap(),
        expansion_steps: *args.get_one::<usize>("steps").unwrap(),
    })
}

/// Assembles the retry policy from command-line flags.
pub fn retry_policy_from_args(args: &ArgMatches) -> RetryPolicy {
    RetryPolicy {
        base_wait_secs: *args.get_one::<f64>("base-wait").unwrap(),
        backoff_multiplier: *args.get_one::<f64>("backoff-multiplier").unwrap(),
        ceiling_secs: *args.get_one::<f64>("backoff-ceiling").unwrap(),
        max_network_errors: *args.get_one::<u32>("max-network-errors").unwrap(),
        rate_limit_cooldown: Duration::from_secs(*args.get_one::<u64>("cooldown").unwrap()),
        sleep_on_rate_limit: !args.get_flag("no-cooldown"),
    }
}

pub async fn handle_crawl(args: &ArgMatches) -> anyhow::Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let token = resolve_token(
        args.get_one::<String>("token").map(String::as_str),
        std::env::var(TOKEN_ENV_VAR).ok(),
    )
    .map_err(|e| anyhow::anyhow!(e))?;

    let base_url = args.get_one::<Url>("api-url").unwrap().clone();
    let options = crawl_options_from_args(args).map_err(|e| anyhow::anyhow!(e))?;
    let policy = retry_policy_from_args(args);

    println!(
        "\nCrawling the reciprocal graph around {}",
        options.seed.bright_white().bold()
    );
    println!(
        "Per-direction caps: {} friends / {} followers",
        options.friends_cap, options.followers_cap
    );
    println!(
        "Trim width: {}   Expansion steps: {}\n",
        options.trim_width, options.expansion_steps
    );
    info!("Starting crawl of {} against {}", options.seed, base_url);

    let client = ApiClient::new(ClientConfig::new(base_url, token))?;
    let executor = RequestExecutor::new(policy);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Starting crawl...");

    let spinner_clone = spinner.clone();
    let progress_callback: CrawlProgressCallback = Arc::new(move |msg: String| {
        spinner_clone.set_message(msg);
    });

    let outcome = execute_crawl(&client, &executor, &options, Some(progress_callback)).await?;
    spinner.finish_and_clear();

    println!(
        "{} Crawl complete: {} nodes, {} edges\n",
        "✓".green().bold(),
        outcome.graph.node_count(),
        outcome.graph.edge_count()
    );

    // Display surface: adjacency listing, optional DOT file.
    print!("{}", render::render_adjacency(&outcome.graph));
    if let Some(dot_path) = args.get_one::<PathBuf>("dot") {
        std::fs::write(dot_path, render::render_dot(&outcome.graph))
            .with_context(|| format!("writing {}", dot_path.display()))?;
        println!(
            "{} Graph written to {}",
            "✓".green().bold(),
            dot_path.display()
        );
    }
    println!();

    // Statistics require a connected graph; failure here ends the run.
    let stats = outcome.graph.stats()?;
    let data = ReportData::new(&options.seed, &stats);

    let content = match report_format_from_args(args) {
        ReportFormat::Json => generate_json_report(&data)?,
        ReportFormat::Text => generate_text_report(&data),
    };

    let output = args.get_one::<PathBuf>("output").unwrap();
    save_report(&content, output).with_context(|| format!("writing {}", output.display()))?;
    print!("{}", content);
    println!(
        "\n{} Report written to {}",
        "✓".green().bold(),
        output.display()
    );

    Ok(())
}

fn report_format_from_args(args: &ArgMatches) -> ReportFormat {
    args.get_one::<String>("format")
        .and_then(|s| ReportFormat::from_str(s))
        .unwrap_or(ReportFormat::Text)
}
