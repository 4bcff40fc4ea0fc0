// src/catalog.rs - OpenRouter catalog records and ingest-boundary labeling

use chrono::TimeZone;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::constants::{RELEASE_DATE_UNKNOWN, UNKNOWN_PROVIDER};

/// Architecture metadata attached to a catalog entry. Unknown upstream fields
/// are ignored; missing ones default so record access never errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Architecture {
    #[serde(default)]
    pub instruct_type: Option<String>,
    #[serde(default)]
    pub modality: Option<String>,
    #[serde(default)]
    pub tokenizer: Option<String>,
}

impl Architecture {
    /// Lowercased concatenation of the descriptive fields, used for keyword
    /// scans over the architecture as a whole.
    pub fn scan_text(&self) -> String {
        let mut text = String::new();
        for field in [&self.instruct_type, &self.modality, &self.tokenizer] {
            if let Some(value) = field {
                text.push_str(&value.to_lowercase());
                text.push(' ');
            }
        }
        text
    }
}

/// Per-token cost table as published by the listing. Values arrive as strings
/// ("0.000002") or numbers depending on the field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pricing(pub BTreeMap<String, Value>);

impl Pricing {
    /// True when every present cost parses to zero. An empty table counts as
    /// zero-cost; an unparsable value does not.
    pub fn is_zero_cost(&self) -> bool {
        self.0.values().all(|value| match value {
            Value::Null => true,
            Value::Number(n) => n.as_f64() == Some(0.0),
            Value::String(s) => s.parse::<f64>().map(|v| v == 0.0).unwrap_or(false),
            _ => false,
        })
    }
}

/// One model as supplied by the catalog feed. Immutable for the duration of
/// processing; all derived values are computed fresh per invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub architecture: Architecture,
    #[serde(default)]
    pub context_length: Option<u64>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub pricing: Pricing,
}

impl ModelRecord {
    /// Provider slug from the id, or "unknown" when the id carries none.
    pub fn provider(&self) -> &str {
        match self.id.split_once('/') {
            Some((slug, _)) if !slug.is_empty() => slug,
            _ => UNKNOWN_PROVIDER,
        }
    }

    /// Preview/beta release flag, labeled from the id and display name.
    pub fn is_preview(&self) -> bool {
        self.id.to_lowercase().contains("preview") || self.name.to_lowercase().contains("preview")
    }

    /// Free-tier flag: an explicit `:free` variant tag or all-zero pricing.
    pub fn is_free(&self) -> bool {
        self.id.to_lowercase().contains(":free") || self.pricing.is_zero_cost()
    }

    pub fn is_free_or_preview(&self) -> bool {
        self.is_free() || self.is_preview()
    }

    pub fn context_length_or_zero(&self) -> u64 {
        self.context_length.unwrap_or(0)
    }

    /// Release date as `YYYY-MM-DD`, or "N/A" without a usable timestamp.
    pub fn release_date(&self) -> String {
        self.created
            .and_then(|ts| chrono::Utc.timestamp_opt(ts, 0).single())
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| RELEASE_DATE_UNKNOWN.to_string())
    }
}
