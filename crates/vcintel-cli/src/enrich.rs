//! Command handlers for the CLI. Results go to stdout, logs to stderr.

use vcintel_core::{AppConfig, EnrichmentRequest};
use vcintel_enrich::{
    candidate_urls, Enricher, HttpPageFetcher, LlmConfig, OpenAiClient, PageFetcher,
};

/// Enrich one company and print the result as pretty JSON.
///
/// # Errors
///
/// Returns an error if the HTTP clients cannot be built or the pipeline
/// fails (invalid website, model failure other than quota, schema violation).
pub(crate) async fn run_enrich(
    config: &AppConfig,
    request: &EnrichmentRequest,
) -> anyhow::Result<()> {
    let fetcher = HttpPageFetcher::from_config(config)?;
    let model = OpenAiClient::new(LlmConfig::from_app_config(config))?;
    let enricher = Enricher::new(fetcher, model);

    let result = enricher.enrich(request).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Print homepage candidates one per line.
///
/// # Errors
///
/// Returns an error when `website` is not a valid http(s) website.
pub(crate) fn run_candidates(website: &str) -> anyhow::Result<()> {
    let candidates = candidate_urls(website);
    if candidates.is_empty() {
        anyhow::bail!("invalid website: {website:?}");
    }
    for url in candidates {
        println!("{url}");
    }
    Ok(())
}

/// Fetch a single URL the way the resolver does and print its visible text.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the page is not readable.
pub(crate) async fn run_fetch(config: &AppConfig, url: &str) -> anyhow::Result<()> {
    let fetcher = HttpPageFetcher::from_config(config)?;
    let Some(page) = fetcher.fetch(url).await else {
        anyhow::bail!("no readable HTML at {url}");
    };
    tracing::info!(url = %page.url, chars = page.text.chars().count(), "page fetched");
    println!("{}", page.text);
    Ok(())
}
