//! Command handlers for the CLI.
//!
//! These are called from `main` after config and logging are established.
//! Per-market scrape failures are logged and skipped rather than propagated
//! so a single bad market does not abort the full run; missing cache files
//! and bad configuration are structural faults and do abort.

use anyhow::Context;
use atmscout_analysis::{analyze, write_csv, AnalysisConfig, AnalysisReport};
use atmscout_core::{load_markets, AppConfig, AtmLocation, CandidateLocation};
use atmscout_scraper::{
    atm_from_listing, harvest_candidates, AtmDirectoryClient, PlacesClient, ScrapeCache,
};

const PLACES_BASE_URL: &str = "https://maps.googleapis.com";

/// Scrape both feeds for every configured market and persist them to the
/// cache directory.
///
/// # Errors
///
/// Returns an error if the API key is missing, the markets file is invalid,
/// a client cannot be constructed, or the cache cannot be written. Failures
/// scoped to a single market are logged and skipped.
pub(crate) async fn run_scrape(config: &AppConfig) -> anyhow::Result<()> {
    let api_key = config
        .places_api_key
        .as_deref()
        .context("ATMSCOUT_PLACES_API_KEY is required for live scraping")?;

    let markets_file = load_markets(&config.markets_path)?;

    let places = PlacesClient::new(
        PLACES_BASE_URL,
        api_key,
        config.http_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_secs,
        2_000,
    )?;
    let directory = AtmDirectoryClient::new(
        config.http_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_secs,
        config.inter_request_delay_ms,
    )?;

    let mut all_candidates: Vec<CandidateLocation> = Vec::new();
    let mut all_atms: Vec<AtmLocation> = Vec::new();

    for market in &markets_file.markets {
        tracing::info!(market = %market.name, "scraping market");

        match harvest_candidates(&places, market, config.inter_request_delay_ms).await {
            Ok(candidates) => {
                tracing::info!(
                    market = %market.name,
                    candidates = candidates.len(),
                    "candidate scrape complete"
                );
                all_candidates.extend(candidates);
            }
            Err(e) => {
                eprintln!("error: candidate scrape failed for {}: {e}", market.name);
                continue;
            }
        }

        match directory.scrape_city(&market.directory_url).await {
            Ok(listings) => {
                tracing::info!(
                    market = %market.name,
                    atms = listings.len(),
                    "ATM scrape complete"
                );
                all_atms.extend(listings.iter().map(atm_from_listing));
            }
            Err(e) => {
                eprintln!("error: ATM scrape failed for {}: {e}", market.name);
            }
        }
    }

    let cache = ScrapeCache::new(&config.cache_dir);
    cache.save_locations(&all_candidates)?;
    cache.save_atms(&all_atms)?;

    println!(
        "scraped {} candidate businesses and {} existing ATMs (cached in {})",
        all_candidates.len(),
        all_atms.len(),
        cache.dir().display()
    );
    Ok(())
}

/// Run the analysis pipeline over cached data and write the CSV export.
///
/// # Errors
///
/// Returns an error if either cache file is missing or malformed, or if the
/// CSV cannot be written.
pub(crate) fn run_analyze(config: &AppConfig) -> anyhow::Result<()> {
    let report = analyze_cached(config)?;

    write_csv(&config.output_csv, &report.records)?;

    let s = report.summary;
    println!("analyzed {} opportunities:", s.total);
    println!("  without nearby competitor: {}", s.without_competitor);
    println!("  with nearby competitor:    {}", s.with_competitor);
    println!("  high score (>= 70):        {}", s.high_score);
    println!("exported to {}", config.output_csv.display());
    Ok(())
}

/// Print the top-scored opportunities without a nearby competitor.
///
/// # Errors
///
/// Same cache requirements as [`run_analyze`].
pub(crate) fn run_report(config: &AppConfig, top: usize) -> anyhow::Result<()> {
    let report = analyze_cached(config)?;

    println!("top {top} opportunities without a nearby competitor:");
    let mut shown = 0usize;
    for record in report.records.iter().filter(|r| !r.has_competitor).take(top) {
        shown += 1;
        println!(
            "  {shown:>2}. [{:>3}] {} ({}) — {}",
            record.score, record.business_name, record.business_type, record.address
        );
    }
    if shown == 0 {
        println!("  (none — every candidate has a competitor nearby)");
    }
    Ok(())
}

/// Full pipeline: scrape, then analyze and export.
pub(crate) async fn run_full(config: &AppConfig) -> anyhow::Result<()> {
    run_scrape(config).await?;
    run_analyze(config)
}

/// Loads both cached feeds and runs one analysis pass.
fn analyze_cached(config: &AppConfig) -> anyhow::Result<AnalysisReport> {
    let cache = ScrapeCache::new(&config.cache_dir);

    let candidates = cache.load_locations()?.with_context(|| {
        format!(
            "no cached candidate businesses at {} — run `atmscout scrape` first",
            cache.locations_path().display()
        )
    })?;
    let atms = cache.load_atms()?.with_context(|| {
        format!(
            "no cached ATM locations at {} — run `atmscout scrape` first",
            cache.atms_path().display()
        )
    })?;

    tracing::info!(
        candidates = candidates.len(),
        atms = atms.len(),
        "running analysis over cached feeds"
    );
    Ok(analyze(AnalysisConfig::new(), &candidates, &atms))
}
