// src/rules.rs - Declarative heuristics table driving classification and scoring

use regex::Regex;
use serde::Deserialize;
use std::path::Path;

use crate::utils::ExplorerError;

/// Default rule table compiled into the binary
const DEFAULT_RULES_JSON: &str = include_str!("../config/heuristics.json");

/// Read-only rule set loaded once per process. Every threshold, keyword list
/// and bonus the classifier and scorer consult lives here, not in code.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleConfig {
    pub extract_params: ExtractParamsRules,
    pub specialties: SpecialtyRules,
    pub effectiveness: EffectivenessRules,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractParamsRules {
    pub patterns: Vec<String>,
    /// Compiled form of `patterns`, populated at load time
    #[serde(skip)]
    pub compiled: Vec<Regex>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpecialtyRules {
    pub coding: KeywordRule,
    pub reasoning: KeywordRule,
    pub tool_calling: ToolCallingRule,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeywordRule {
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallingRule {
    pub keywords: Vec<String>,
    pub instruct_types: Vec<String>,
    pub architecture_keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EffectivenessRules {
    pub base_score: f64,
    pub context_length: Vec<ContextTier>,
    pub architecture_bonus: f64,
    pub preview_bonus: f64,
    pub size: Vec<SizeTier>,
    pub specialty_bonus: SpecialtyBonus,
    pub recency: Vec<RecencyWindow>,
    pub quantization: QuantizationRule,
    /// Ordered list: within one scanned field, the first entry found wins
    pub family_bonus: Vec<FamilyBonus>,
    pub multimodal: MultimodalRule,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContextTier {
    pub min: u64,
    pub bonus: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SizeTier {
    pub min: f64,
    pub bonus: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpecialtyBonus {
    pub both_coding_reasoning: f64,
    pub tool_calling: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecencyWindow {
    pub max_days: i64,
    pub bonus: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuantizationRule {
    pub keywords: Vec<String>,
    pub penalty: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FamilyBonus {
    pub name: String,
    pub bonus: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MultimodalRule {
    pub keywords: Vec<String>,
    pub bonus: f64,
}

impl RuleConfig {
    /// Load the rule table embedded in the binary.
    pub fn load_default() -> Result<Self, ExplorerError> {
        Self::parse(DEFAULT_RULES_JSON)
    }

    /// Load a rule table from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self, ExplorerError> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            ExplorerError::config(&format!("Cannot read rules file {}: {}", path.display(), e))
        })?;
        Self::parse(&source)
    }

    /// Parse and validate a rule table. Any missing key, wrong type or bad
    /// pattern is fatal here, never a per-record error later.
    pub fn parse(source: &str) -> Result<Self, ExplorerError> {
        let mut config: RuleConfig = serde_json::from_str(source)
            .map_err(|e| ExplorerError::config(&format!("Malformed heuristics config: {}", e)))?;

        let compiled = config
            .extract_params
            .patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| {
                    ExplorerError::config(&format!("Invalid extraction pattern '{}': {}", pattern, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        config.extract_params.compiled = compiled;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ExplorerError> {
        if self.extract_params.patterns.is_empty() {
            return Err(ExplorerError::config("extract_params.patterns must not be empty"));
        }
        for pattern in &self.extract_params.compiled {
            if pattern.captures_len() < 2 {
                return Err(ExplorerError::config(&format!(
                    "Extraction pattern '{}' has no capture group for the numeric part",
                    pattern.as_str()
                )));
            }
        }

        if self.specialties.coding.keywords.is_empty()
            || self.specialties.reasoning.keywords.is_empty()
            || self.specialties.tool_calling.keywords.is_empty()
        {
            return Err(ExplorerError::config("specialty keyword lists must not be empty"));
        }

        let eff = &self.effectiveness;
        if eff.context_length.is_empty() {
            return Err(ExplorerError::config("effectiveness.context_length must not be empty"));
        }
        if eff.size.is_empty() {
            return Err(ExplorerError::config("effectiveness.size must not be empty"));
        }
        if eff.recency.is_empty() {
            return Err(ExplorerError::config("effectiveness.recency must not be empty"));
        }
        if eff.quantization.keywords.is_empty() {
            return Err(ExplorerError::config("effectiveness.quantization.keywords must not be empty"));
        }
        if eff.multimodal.keywords.is_empty() {
            return Err(ExplorerError::config("effectiveness.multimodal.keywords must not be empty"));
        }

        Ok(())
    }
}
