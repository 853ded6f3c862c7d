//! Request-level orchestration of the enrichment pipeline.

use chrono::Utc;
use vcintel_core::{EnrichmentRequest, EnrichmentResult};

use crate::error::{EnrichError, LlmError};
use crate::fetch::PageFetcher;
use crate::heuristic::{heuristic_enrichment, synthetic_page};
use crate::llm::EnrichmentModel;
use crate::resolver::resolve_homepage;
use crate::schema::validate_enrichment;
use crate::urls::{is_valid_website, normalize_website};

/// Sequences homepage resolution, the model call, validation, and the quota
/// fallback for one enrichment request.
#[derive(Debug, Clone)]
pub struct Enricher<F, M> {
    fetcher: F,
    model: M,
}

impl<F, M> Enricher<F, M>
where
    F: PageFetcher,
    M: EnrichmentModel,
{
    pub fn new(fetcher: F, model: M) -> Self {
        Self { fetcher, model }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Enrich one company.
    ///
    /// An unreachable website is not an error: a synthetic page built from
    /// the request stands in for it. A model quota error switches to the
    /// heuristic generator; every other model or schema failure is returned.
    ///
    /// # Errors
    ///
    /// - [`EnrichError::InvalidInput`] when `website` is not an http(s) URL.
    ///   No network call is made.
    /// - [`EnrichError::Model`] for any model failure other than quota.
    /// - [`EnrichError::Schema`] when model output fails validation.
    pub async fn enrich(
        &self,
        request: &EnrichmentRequest,
    ) -> Result<EnrichmentResult, EnrichError> {
        if !is_valid_website(&request.website) {
            return Err(EnrichError::InvalidInput);
        }
        let website = normalize_website(&request.website);

        let page = match resolve_homepage(&self.fetcher, &website).await {
            Some(page) => page,
            None => {
                tracing::info!(
                    website = %website,
                    "no readable homepage; enriching from request metadata"
                );
                synthetic_page(request, &website, Utc::now())
            }
        };
        let sources = vec![page.source()];

        let mut result = match self.model.extract(&page).await {
            Ok(raw) => validate_enrichment(&raw, sources, Utc::now())?,
            Err(LlmError::QuotaExceeded) => {
                tracing::warn!(
                    website = %website,
                    url = %page.url,
                    "model quota exceeded; using heuristic enrichment"
                );
                heuristic_enrichment(&page, request, sources)
            }
            Err(e) => return Err(e.into()),
        };
        result.company_id.clone_from(&request.company_id);

        tracing::info!(
            website = %website,
            url = %page.url,
            keywords = result.keywords.len(),
            derived_signals = result.derived_signals.len(),
            "enrichment complete"
        );
        Ok(result)
    }
}
