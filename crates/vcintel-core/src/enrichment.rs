//! Enrichment request, page, and result types shared by the pipeline and its callers.

use chrono::{DateTime, Utc};
use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompanyStage {
    #[serde(rename = "Pre-Seed")]
    PreSeed,
    Seed,
    #[serde(rename = "Series A")]
    SeriesA,
    #[serde(rename = "Series B+")]
    SeriesBPlus,
}

impl std::fmt::Display for CompanyStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompanyStage::PreSeed => write!(f, "Pre-Seed"),
            CompanyStage::Seed => write!(f, "Seed"),
            CompanyStage::SeriesA => write!(f, "Series A"),
            CompanyStage::SeriesBPlus => write!(f, "Series B+"),
        }
    }
}

impl std::str::FromStr for CompanyStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Pre-Seed" => Ok(CompanyStage::PreSeed),
            "Seed" => Ok(CompanyStage::Seed),
            "Series A" => Ok(CompanyStage::SeriesA),
            "Series B+" => Ok(CompanyStage::SeriesBPlus),
            other => Err(format!(
                "unknown stage {other:?}; expected Pre-Seed, Seed, Series A, or Series B+"
            )),
        }
    }
}

/// Inbound enrichment payload.
///
/// `website` is required by contract but deserializes to an empty string when
/// missing, `null`, or not a string, so the caller answers all of those with
/// the same "invalid website" error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentRequest {
    #[serde(default, deserialize_with = "website_or_empty")]
    pub website: String,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub stage: Option<CompanyStage>,
    #[serde(default)]
    pub location: Option<String>,
}

fn website_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Website {
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Website::deserialize(deserializer)? {
        Website::Text(website) => website,
        Website::Other(_) => String::new(),
    })
}

impl EnrichmentRequest {
    #[must_use]
    pub fn for_website(website: impl Into<String>) -> Self {
        Self {
            website: website.into(),
            ..Self::default()
        }
    }

    /// Non-blank `name`, trimmed.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    /// Non-blank `sector`, trimmed.
    #[must_use]
    pub fn sector(&self) -> Option<&str> {
        non_blank(self.sector.as_deref())
    }

    /// Non-blank `location`, trimmed.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        non_blank(self.location.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Plain-text content of one successfully fetched page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedPage {
    pub url: String,
    pub text: String,
    pub fetched_at: DateTime<Utc>,
}

impl FetchedPage {
    #[must_use]
    pub fn source(&self) -> EnrichmentSource {
        EnrichmentSource {
            url: self.url.clone(),
            fetched_at: self.fetched_at,
        }
    }
}

/// Provenance for an enrichment: which page it was derived from and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentSource {
    pub url: String,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalValue {
    High,
    Medium,
    Low,
}

impl SignalValue {
    /// Case-insensitive parse of `high` / `medium` / `low`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Some(SignalValue::High),
            "medium" => Some(SignalValue::Medium),
            "low" => Some(SignalValue::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for SignalValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalValue::High => write!(f, "High"),
            SignalValue::Medium => write!(f, "Medium"),
            SignalValue::Low => write!(f, "Low"),
        }
    }
}

/// A labeled inference such as "Execution Readiness: Medium", with its rationale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedSignal {
    pub label: String,
    pub value: SignalValue,
    pub rationale: String,
}

/// Validated enrichment returned to the caller.
///
/// Cardinalities: `what_they_do` 3–6, `keywords` 5–10, `derived_signals` 2–4,
/// `sources` non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    pub summary: String,
    pub what_they_do: Vec<String>,
    pub keywords: Vec<String>,
    pub derived_signals: Vec<DerivedSignal>,
    pub sources: Vec<EnrichmentSource>,
    pub generated_at: DateTime<Utc>,
}
