//! Decode-and-validate step from raw model JSON to [`EnrichmentResult`].

use chrono::{DateTime, Utc};
use serde_json::Value;
use vcintel_core::{DerivedSignal, EnrichmentResult, EnrichmentSource, SignalValue};

use crate::error::SchemaViolation;

pub const SUMMARY_PLACEHOLDER: &str = "Summary unavailable.";

pub const MIN_WHAT_THEY_DO: usize = 3;
pub const MAX_WHAT_THEY_DO: usize = 6;
pub const MIN_KEYWORDS: usize = 5;
pub const MAX_KEYWORDS: usize = 10;
pub const MIN_DERIVED_SIGNALS: usize = 2;
pub const MAX_DERIVED_SIGNALS: usize = 4;

/// Rationale recorded for signals the model returned as bare strings.
const UNRATED_SIGNAL_RATIONALE: &str = "Inferred from public website content.";

/// Validate raw model output against the enrichment schema.
///
/// Each array field is filtered to usable entries and capped at its maximum
/// before the minimum is checked; output is never padded. A missing or blank
/// `summary` is replaced by [`SUMMARY_PLACEHOLDER`].
///
/// # Errors
///
/// Returns the [`SchemaViolation`] for the first field (in the order
/// `what_they_do`, `keywords`, `derived_signals`) that falls short.
pub fn validate_enrichment(
    raw: &Value,
    sources: Vec<EnrichmentSource>,
    generated_at: DateTime<Utc>,
) -> Result<EnrichmentResult, SchemaViolation> {
    let Value::Object(fields) = raw else {
        return Err(SchemaViolation::NotAnObject);
    };

    let summary = fields
        .get("summary")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(SUMMARY_PLACEHOLDER)
        .to_string();

    let what_they_do = string_entries(fields.get("what_they_do"), MAX_WHAT_THEY_DO);
    if what_they_do.len() < MIN_WHAT_THEY_DO {
        return Err(SchemaViolation::WhatTheyDo {
            found: what_they_do.len(),
        });
    }

    let keywords = string_entries(fields.get("keywords"), MAX_KEYWORDS);
    if keywords.len() < MIN_KEYWORDS {
        return Err(SchemaViolation::Keywords {
            found: keywords.len(),
        });
    }

    let derived_signals = signal_entries(fields.get("derived_signals"), MAX_DERIVED_SIGNALS);
    if derived_signals.len() < MIN_DERIVED_SIGNALS {
        return Err(SchemaViolation::DerivedSignals {
            found: derived_signals.len(),
        });
    }

    Ok(EnrichmentResult {
        company_id: None,
        summary,
        what_they_do,
        keywords,
        derived_signals,
        sources,
        generated_at,
    })
}

fn string_entries(value: Option<&Value>, max: usize) -> Vec<String> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(max)
        .map(str::to_string)
        .collect()
}

fn signal_entries(value: Option<&Value>, max: usize) -> Vec<DerivedSignal> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    items.iter().filter_map(decode_signal).take(max).collect()
}

/// Accepts `{label, value, rationale}` objects, or a bare string which becomes
/// a `Medium` signal labeled with that text.
fn decode_signal(item: &Value) -> Option<DerivedSignal> {
    match item {
        Value::Object(map) => {
            let label = map
                .get("label")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())?;
            let value = map
                .get("value")
                .and_then(Value::as_str)
                .and_then(SignalValue::parse)?;
            let rationale = map
                .get("rationale")
                .and_then(Value::as_str)
                .map(str::trim)
                .unwrap_or_default();

            Some(DerivedSignal {
                label: label.to_string(),
                value,
                rationale: rationale.to_string(),
            })
        }
        Value::String(text) => {
            let label = text.trim();
            if label.is_empty() {
                return None;
            }
            Some(DerivedSignal {
                label: label.to_string(),
                value: SignalValue::Medium,
                rationale: UNRATED_SIGNAL_RATIONALE.to_string(),
            })
        }
        _ => None,
    }
}
