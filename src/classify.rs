// src/classify.rs - Capability tagging from description and architecture

use serde::Serialize;

use crate::catalog::Architecture;
use crate::rules::RuleConfig;

/// Capability tags derived for one record. Tags are not mutually exclusive;
/// every matching rule fires independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CapabilityTags {
    pub coding: bool,
    pub reasoning: bool,
    pub tool_calling: bool,
}

impl CapabilityTags {
    pub fn is_empty(&self) -> bool {
        !(self.coding || self.reasoning || self.tool_calling)
    }
}

fn contains_any(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|keyword| text.contains(&keyword.to_lowercase()))
}

/// True when the architecture metadata itself signals tool support, either
/// through a recognized instruct type or an architecture keyword. The scorer
/// reads this signal again, separately from the tool_calling tag.
pub fn architecture_signal(architecture: &Architecture, rules: &RuleConfig) -> bool {
    let tool = &rules.specialties.tool_calling;

    if let Some(instruct_type) = &architecture.instruct_type {
        if tool
            .instruct_types
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(instruct_type))
        {
            return true;
        }
    }

    let architecture_text = architecture.scan_text();
    tool.architecture_keywords
        .iter()
        .any(|keyword| architecture_text.contains(&keyword.to_lowercase()))
}

/// Derive capability tags from free text and architecture metadata. Pure
/// function of its two inputs; processing order across records is irrelevant.
pub fn classify_capabilities(
    description: &str,
    architecture: &Architecture,
    rules: &RuleConfig,
) -> CapabilityTags {
    let text = description.to_lowercase();

    CapabilityTags {
        coding: contains_any(&text, &rules.specialties.coding.keywords),
        reasoning: contains_any(&text, &rules.specialties.reasoning.keywords),
        tool_calling: contains_any(&text, &rules.specialties.tool_calling.keywords)
            || architecture_signal(architecture, rules),
    }
}
