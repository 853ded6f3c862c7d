//! Company enrichment pipeline.
//!
//! Resolves a readable homepage for a company website, asks a chat-completion
//! model for structured investment signals, validates the model output, and
//! falls back to a deterministic template when the model is over quota.

pub mod error;
pub mod fetch;
pub mod heuristic;
pub mod html;
pub mod llm;
pub mod pipeline;
pub mod resolver;
pub mod schema;
pub mod urls;

pub use error::{EnrichError, LlmError, SchemaViolation};
pub use fetch::{HttpPageFetcher, PageFetcher, MAX_PAGE_CHARS};
pub use heuristic::{heuristic_enrichment, synthetic_page};
pub use html::extract_visible_text;
pub use llm::{EnrichmentModel, LlmConfig, OpenAiClient};
pub use pipeline::Enricher;
pub use resolver::resolve_homepage;
pub use schema::validate_enrichment;
pub use urls::{candidate_urls, is_valid_website, normalize_website};
