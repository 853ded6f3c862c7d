//! Deterministic, template-based enrichment used when the model is over quota,
//! plus the synthetic page used when no homepage candidate is readable.

use chrono::{DateTime, Utc};
use reqwest::Url;
use vcintel_core::{
    CompanyStage, DerivedSignal, EnrichmentRequest, EnrichmentResult, EnrichmentSource,
    FetchedPage, SignalValue,
};

const DEFAULT_SECTOR: &str = "technology";
const DEFAULT_STAGE: CompanyStage = CompanyStage::Seed;
const DEFAULT_LOCATION: &str = "Unknown location";
const FALLBACK_NAME: &str = "Company";

/// Build an enrichment from templates without any external call.
///
/// Pure and total: identical inputs always yield identical output, with
/// `generated_at` taken from the page's `fetched_at`.
#[must_use]
pub fn heuristic_enrichment(
    page: &FetchedPage,
    request: &EnrichmentRequest,
    sources: Vec<EnrichmentSource>,
) -> EnrichmentResult {
    let name = display_name(request, &page.url);
    let sector = request.sector().unwrap_or(DEFAULT_SECTOR);
    let stage = request.stage.unwrap_or(DEFAULT_STAGE);
    let location = request.location().unwrap_or(DEFAULT_LOCATION);
    let sector_lower = sector.to_lowercase();

    let execution_readiness = match stage {
        CompanyStage::PreSeed => SignalValue::Low,
        CompanyStage::Seed => SignalValue::Medium,
        CompanyStage::SeriesA | CompanyStage::SeriesBPlus => SignalValue::High,
    };

    EnrichmentResult {
        company_id: None,
        summary: format!(
            "{name} appears to be a {stage} company in {sector}, based on available public metadata and website context."
        ),
        what_they_do: vec![
            format!("Builds products in {sector_lower} for business users."),
            "Positions around operational efficiency and measurable outcomes.".to_string(),
            format!("Operates from {location} with venture-scale growth intent."),
        ],
        keywords: vec![
            name.to_lowercase(),
            sector_lower.clone(),
            "startup".to_string(),
            "b2b".to_string(),
            "growth".to_string(),
        ],
        derived_signals: vec![
            DerivedSignal {
                label: "B2B Positioning".to_string(),
                value: SignalValue::Medium,
                rationale: "B2B positioning signal present in public metadata.".to_string(),
            },
            DerivedSignal {
                label: "Execution Readiness".to_string(),
                value: execution_readiness,
                rationale: format!("{stage} stage execution signal."),
            },
            DerivedSignal {
                label: "Traction Verification".to_string(),
                value: SignalValue::Low,
                rationale: "Requires follow-up diligence for traction verification.".to_string(),
            },
        ],
        sources,
        generated_at: page.fetched_at,
    }
}

/// Stand-in page for a website none of whose candidates were readable.
///
/// The text is assembled from the request fields so the model (or the
/// heuristic) still has something to work from.
#[must_use]
pub fn synthetic_page(
    request: &EnrichmentRequest,
    website: &str,
    fetched_at: DateTime<Utc>,
) -> FetchedPage {
    let name = display_name(request, website);
    let sector = request.sector().unwrap_or(DEFAULT_SECTOR);
    let stage = request.stage.unwrap_or(DEFAULT_STAGE);
    let location = request.location().unwrap_or(DEFAULT_LOCATION);

    let text = [
        format!("{name} is a {stage} startup operating in {sector}."),
        format!("The company website is {website}."),
        format!("Primary location is {location}."),
        "Public content could not be fetched from homepage/about, so this enrichment is inferred from available metadata.".to_string(),
    ]
    .join(" ");

    FetchedPage {
        url: website.to_string(),
        text,
        fetched_at,
    }
}

/// The request's name, else the first DNS label of the URL host as written
/// (`www.` stripped), else a generic placeholder.
fn display_name(request: &EnrichmentRequest, url: &str) -> String {
    request
        .name()
        .map(str::to_string)
        .or_else(|| host_label(url))
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}

fn host_label(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    host.split('.')
        .next()
        .filter(|label| !label.is_empty())
        .map(str::to_string)
}
