use vcintel_core::FetchedPage;

use crate::fetch::PageFetcher;
use crate::urls::candidate_urls;

/// Try each candidate URL for `website` in order and return the first page
/// the fetcher produces. Candidates after the first success are never requested.
pub async fn resolve_homepage<F: PageFetcher>(fetcher: &F, website: &str) -> Option<FetchedPage> {
    let candidates = candidate_urls(website);
    let total = candidates.len();

    for (attempt, candidate) in candidates.into_iter().enumerate() {
        if let Some(page) = fetcher.fetch(&candidate).await {
            tracing::debug!(
                website,
                url = %page.url,
                attempt = attempt + 1,
                total,
                "resolved homepage"
            );
            return Some(page);
        }
    }

    tracing::debug!(website, total, "no homepage candidate was readable");
    None
}
