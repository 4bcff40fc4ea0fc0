// src/score.rs - Effectiveness scoring and eligibility gating

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::cmp::Ordering;

use crate::catalog::ModelRecord;
use crate::classify::{architecture_signal, classify_capabilities, CapabilityTags};
use crate::constants::{SCORE_MAX, SCORE_MIN};
use crate::extract::{
    detect_family, detect_multimodal, detect_quantized, extract_parameter_billions,
};
use crate::rules::RuleConfig;

/// Features derived from one record. Computed fresh per invocation, never
/// cached across rule-table versions.
#[derive(Debug, Clone, Serialize)]
pub struct DerivedFeatures {
    pub parameter_billions: Option<f64>,
    pub capability_tags: CapabilityTags,
    pub is_free_or_preview: bool,
    pub is_multimodal: bool,
    pub is_quantized: bool,
    pub family: Option<String>,
}

/// A record that passed the eligibility gate, with its derived features and
/// final score. Sorting and rounding are presentation concerns.
#[derive(Debug, Clone)]
pub struct ScoredRecord {
    pub record: ModelRecord,
    pub features: DerivedFeatures,
    pub effectiveness_score: f64,
}

pub fn derive_features(record: &ModelRecord, rules: &RuleConfig) -> DerivedFeatures {
    DerivedFeatures {
        parameter_billions: extract_parameter_billions(&record.name, &record.description, rules),
        capability_tags: classify_capabilities(&record.description, &record.architecture, rules),
        is_free_or_preview: record.is_free_or_preview(),
        is_multimodal: detect_multimodal(
            &record.description,
            &record.architecture.scan_text(),
            rules,
        ),
        is_quantized: detect_quantized(&record.id, &record.description, rules),
        family: detect_family(&record.id, &record.name, &record.description, rules)
            .map(|(name, _)| name.to_string()),
    }
}

/// Two-stage admission gate: the record must be free-tier or preview, and it
/// must carry at least one relevant capability. Rejected records are never
/// scored and never surfaced.
pub fn is_relevant(record: &ModelRecord, rules: &RuleConfig) -> bool {
    record.is_free_or_preview()
        && !classify_capabilities(&record.description, &record.architecture, rules).is_empty()
}

/// Effectiveness score in [0, 10]. Strictly additive over independent
/// bonuses and penalties starting from the base score; the running total is
/// clamped once at the end, never in between. `now` is the reference instant
/// for recency so scoring stays deterministic.
pub fn effectiveness_score(
    record: &ModelRecord,
    features: &DerivedFeatures,
    rules: &RuleConfig,
    now: DateTime<Utc>,
) -> f64 {
    let eff = &rules.effectiveness;
    let mut score = eff.base_score;

    // Context length: only the highest tier whose minimum is met
    let context_length = record.context_length_or_zero();
    if let Some(tier) = eff
        .context_length
        .iter()
        .filter(|tier| context_length >= tier.min)
        .max_by_key(|tier| tier.min)
    {
        score += tier.bonus;
    }

    // Architecture tool signal, counted independently of the tool_calling
    // specialty bonus below
    if architecture_signal(&record.architecture, rules) {
        score += eff.architecture_bonus;
    }

    if record.is_preview() {
        score += eff.preview_bonus;
    }

    // Size: only the highest tier met; no estimate, no bonus
    if let Some(params) = features.parameter_billions {
        if let Some(tier) = eff
            .size
            .iter()
            .filter(|tier| params >= tier.min)
            .max_by(|a, b| a.min.partial_cmp(&b.min).unwrap_or(Ordering::Equal))
        {
            score += tier.bonus;
        }
    }

    // Specialty bonuses: both may apply simultaneously
    let tags = &features.capability_tags;
    if tags.coding && tags.reasoning {
        score += eff.specialty_bonus.both_coding_reasoning;
    }
    if tags.tool_calling {
        score += eff.specialty_bonus.tool_calling;
    }

    // Recency: only the narrowest window containing the record's age
    if let Some(created_at) = record
        .created
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
    {
        let days_ago = (now - created_at).num_days();
        if let Some(window) = eff
            .recency
            .iter()
            .filter(|window| days_ago <= window.max_days)
            .min_by_key(|window| window.max_days)
        {
            score += window.bonus;
        }
    }

    // Quantization penalty at most once, however many keywords matched
    if features.is_quantized {
        score -= eff.quantization.penalty;
    }

    // Family bonus at most once, id then name then description
    if let Some((_, bonus)) = detect_family(&record.id, &record.name, &record.description, rules) {
        score += bonus;
    }

    if features.is_multimodal {
        score += eff.multimodal.bonus;
    }

    score.clamp(SCORE_MIN, SCORE_MAX)
}

/// Run the full pipeline over a fetched batch: gate, derive, score. Output
/// order follows input order; no cross-record state exists, so callers may
/// partition the batch freely.
pub fn score_catalog(
    records: &[ModelRecord],
    rules: &RuleConfig,
    now: DateTime<Utc>,
) -> Vec<ScoredRecord> {
    records
        .iter()
        .filter(|record| is_relevant(record, rules))
        .map(|record| {
            let features = derive_features(record, rules);
            let effectiveness_score = effectiveness_score(record, &features, rules, now);
            ScoredRecord {
                record: record.clone(),
                features,
                effectiveness_score,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rules() -> RuleConfig {
        RuleConfig::load_default().expect("embedded rules must parse")
    }

    fn record_from(value: serde_json::Value) -> ModelRecord {
        serde_json::from_value(value).expect("record must deserialize")
    }

    fn score_of(record: &ModelRecord, rules: &RuleConfig, now: DateTime<Utc>) -> f64 {
        let features = derive_features(record, rules);
        effectiveness_score(record, &features, rules, now)
    }

    #[test]
    fn test_flagship_preview_clamps_to_ten() {
        let rules = rules();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let record = record_from(json!({
            "id": "acme/titan-preview",
            "name": "Titan Preview",
            "description": "A 70B parameter model specialized in code generation and reasoning, with tool use support",
            "context_length": 40000,
            "created": now.timestamp(),
            "pricing": { "prompt": "0" }
        }));

        let features = derive_features(&record, &rules);
        assert_eq!(features.parameter_billions, Some(70.0));
        assert!(features.capability_tags.coding);
        assert!(features.capability_tags.reasoning);
        assert!(features.capability_tags.tool_calling);

        // 5.0 base + 1.0 context + 0.5 preview + 1.5 size + 1.0 both
        // + 1.0 tools + 0.5 recency = 10.5, clamped
        assert_eq!(score_of(&record, &rules, now), 10.0);
    }

    #[test]
    fn test_quantized_mid_size_tool_model() {
        let rules = rules();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let record = record_from(json!({
            "id": "acme/workhorse",
            "name": "Workhorse",
            "description": "int8 quantized 30b model for tool use",
            "pricing": { "prompt": "0" }
        }));

        let features = derive_features(&record, &rules);
        assert_eq!(features.parameter_billions, Some(30.0));
        assert!(features.capability_tags.tool_calling);
        assert!(features.is_quantized);
        assert!(features.family.is_none());

        // 5.0 base + 1.0 size + 1.0 tools - 0.5 quantization = 6.5;
        // two quantization keywords match but the penalty applies once
        assert_eq!(score_of(&record, &rules, now), 6.5);
    }

    #[test]
    fn test_paid_record_is_rejected_before_scoring() {
        let rules = rules();
        let record = record_from(json!({
            "id": "acme/closed",
            "name": "Closed",
            "description": "",
            "pricing": { "prompt": "0.002", "completion": "0.004" }
        }));
        assert!(!is_relevant(&record, &rules));
    }

    #[test]
    fn test_free_record_without_capabilities_is_rejected() {
        let rules = rules();
        let record = record_from(json!({
            "id": "acme/falcon-7b-instruct:free",
            "name": "falcon-7b-instruct",
            "description": "general chat model",
            "pricing": { "prompt": "0" }
        }));
        assert!(record.is_free());
        assert!(!is_relevant(&record, &rules));
    }

    #[test]
    fn test_context_tiers_do_not_stack() {
        let rules = rules();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let base = json!({
            "id": "acme/ctx",
            "name": "Ctx",
            "description": "tuned for sql generation",
            "pricing": { "prompt": "0" }
        });

        let mut with_40k = base.clone();
        with_40k["context_length"] = json!(40000);
        let mut with_20k = base.clone();
        with_20k["context_length"] = json!(20000);

        let score_40k = score_of(&record_from(with_40k), &rules, now);
        let score_20k = score_of(&record_from(with_20k), &rules, now);
        let score_none = score_of(&record_from(base), &rules, now);

        // 40k earns exactly the 32k-tier bonus, not 32k + 16k combined
        assert_eq!(score_40k - score_none, 1.0);
        assert_eq!(score_20k - score_none, 0.5);
    }

    #[test]
    fn test_context_tier_min_is_inclusive() {
        let rules = rules();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let at_threshold = record_from(json!({
            "id": "acme/ctx",
            "name": "Ctx",
            "description": "tuned for sql generation",
            "context_length": 32000,
            "pricing": { "prompt": "0" }
        }));
        let below = record_from(json!({
            "id": "acme/ctx",
            "name": "Ctx",
            "description": "tuned for sql generation",
            "context_length": 31999,
            "pricing": { "prompt": "0" }
        }));
        let gap = score_of(&at_threshold, &rules, now) - score_of(&below, &rules, now);
        assert!((gap - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_recency_narrowest_window_wins() {
        let rules = rules();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let fresh = record_from(json!({
            "id": "acme/fresh",
            "name": "Fresh",
            "description": "tuned for sql generation",
            "created": (now - chrono::Duration::days(10)).timestamp(),
            "pricing": { "prompt": "0" }
        }));
        let aging = record_from(json!({
            "id": "acme/aging",
            "name": "Aging",
            "description": "tuned for sql generation",
            "created": (now - chrono::Duration::days(200)).timestamp(),
            "pricing": { "prompt": "0" }
        }));
        let ancient = record_from(json!({
            "id": "acme/ancient",
            "name": "Ancient",
            "description": "tuned for sql generation",
            "created": (now - chrono::Duration::days(900)).timestamp(),
            "pricing": { "prompt": "0" }
        }));
        let undated = record_from(json!({
            "id": "acme/undated",
            "name": "Undated",
            "description": "tuned for sql generation",
            "pricing": { "prompt": "0" }
        }));

        let score_undated = score_of(&undated, &rules, now);
        // A 10-day-old record fits both windows; only the 30-day one applies
        assert_eq!(score_of(&fresh, &rules, now) - score_undated, 0.5);
        assert_eq!(score_of(&aging, &rules, now) - score_undated, 0.25);
        assert_eq!(score_of(&ancient, &rules, now) - score_undated, 0.0);
    }

    #[test]
    fn test_architecture_signal_double_counts_with_specialty() {
        let rules = rules();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let via_architecture = record_from(json!({
            "id": "acme/agentic",
            "name": "Agentic",
            "description": "general chat model",
            "architecture": { "instruct_type": "chatml" },
            "pricing": { "prompt": "0" }
        }));
        let via_keyword = record_from(json!({
            "id": "acme/agentic",
            "name": "Agentic",
            "description": "supports tool use",
            "pricing": { "prompt": "0" }
        }));

        // Keyword path: base 5.0 + 1.0 tool specialty
        assert_eq!(score_of(&via_keyword, &rules, now), 6.0);
        // Architecture path collects the architecture bonus AND the
        // tool_calling specialty bonus: base 5.0 + 0.5 + 1.0
        assert_eq!(score_of(&via_architecture, &rules, now), 6.5);
    }

    #[test]
    fn test_score_never_leaves_range() {
        let rules = rules();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        // Engineered to pile every bonus on top of the base
        let maxed = record_from(json!({
            "id": "acme/llama-preview",
            "name": "Llama Preview 405B",
            "description": "A 405B multimodal model for code, math reasoning and tool use",
            "architecture": { "instruct_type": "chatml" },
            "context_length": 1000000,
            "created": now.timestamp(),
            "pricing": { "prompt": "0" }
        }));
        let score = score_of(&maxed, &rules, now);
        assert!(score <= SCORE_MAX);
        assert_eq!(score, 10.0);

        // Engineered to sink below zero before clamping
        let mut sunk_rules = rules.clone();
        sunk_rules.effectiveness.base_score = 0.0;
        sunk_rules.effectiveness.quantization.penalty = 25.0;
        let sunk = record_from(json!({
            "id": "acme/tiny-gguf",
            "name": "Tiny",
            "description": "quantized sql helper",
            "pricing": { "prompt": "0" }
        }));
        let score = score_of(&sunk, &sunk_rules, now);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let rules = rules();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let record = record_from(json!({
            "id": "acme/repeat",
            "name": "Repeat 13B",
            "description": "code and math reasoning with tool use",
            "context_length": 20000,
            "created": now.timestamp() - 86_400,
            "pricing": { "prompt": "0" }
        }));

        let first_features = derive_features(&record, &rules);
        let second_features = derive_features(&record, &rules);
        assert_eq!(first_features.capability_tags, second_features.capability_tags);
        assert_eq!(
            effectiveness_score(&record, &first_features, &rules, now),
            effectiveness_score(&record, &second_features, &rules, now)
        );
    }

    #[test]
    fn test_score_catalog_gates_and_scores() {
        let rules = rules();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let records: Vec<ModelRecord> = vec![
            record_from(json!({
                "id": "acme/coder:free",
                "name": "Coder 7B",
                "description": "a code assistant",
                "pricing": { "prompt": "0" }
            })),
            record_from(json!({
                "id": "acme/closed",
                "name": "Closed",
                "description": "a code assistant",
                "pricing": { "prompt": "0.002" }
            })),
            record_from(json!({
                "id": "acme/smalltalk:free",
                "name": "Smalltalk",
                "description": "friendly conversation",
                "pricing": { "prompt": "0" }
            })),
        ];

        let scored = score_catalog(&records, &rules, now);
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].record.id, "acme/coder:free");
        assert!(scored[0].effectiveness_score >= SCORE_MIN);
        assert!(scored[0].effectiveness_score <= SCORE_MAX);
    }
}
