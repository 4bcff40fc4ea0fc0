// src/extract.rs - Feature extraction from record text

use crate::rules::RuleConfig;

/// Estimated parameter count in billions from model name or description.
/// The name is scanned first and wins outright; within one string the
/// earliest match across all configured patterns wins. Returns None when no
/// pattern matches anywhere - a valid, expected outcome.
pub fn extract_parameter_billions(
    name: &str,
    description: &str,
    rules: &RuleConfig,
) -> Option<f64> {
    for text in [name, description] {
        let mut earliest: Option<(usize, f64)> = None;
        for pattern in &rules.extract_params.compiled {
            let Some(caps) = pattern.captures(text) else {
                continue;
            };
            let (Some(whole), Some(numeric)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Ok(value) = numeric.as_str().parse::<f64>() else {
                continue;
            };
            match earliest {
                Some((start, _)) if start <= whole.start() => {}
                _ => earliest = Some((whole.start(), value)),
            }
        }
        if let Some((_, value)) = earliest {
            return Some(value);
        }
    }
    None
}

/// First recognized model family and its bonus, scanning id, then name, then
/// description. Within one field the rule table's order decides.
pub fn detect_family<'r>(
    id: &str,
    name: &str,
    description: &str,
    rules: &'r RuleConfig,
) -> Option<(&'r str, f64)> {
    for text in [id, name, description] {
        let lower = text.to_lowercase();
        for family in &rules.effectiveness.family_bonus {
            if lower.contains(&family.name.to_lowercase()) {
                return Some((family.name.as_str(), family.bonus));
            }
        }
    }
    None
}

/// True when any quantization keyword appears in the id or description.
pub fn detect_quantized(id: &str, description: &str, rules: &RuleConfig) -> bool {
    let id_lower = id.to_lowercase();
    let desc_lower = description.to_lowercase();
    rules.effectiveness.quantization.keywords.iter().any(|keyword| {
        let keyword = keyword.to_lowercase();
        id_lower.contains(&keyword) || desc_lower.contains(&keyword)
    })
}

/// True when any multimodal keyword appears in the description or the
/// architecture-derived text.
pub fn detect_multimodal(description: &str, architecture_text: &str, rules: &RuleConfig) -> bool {
    let desc_lower = description.to_lowercase();
    rules.effectiveness.multimodal.keywords.iter().any(|keyword| {
        let keyword = keyword.to_lowercase();
        desc_lower.contains(&keyword) || architecture_text.contains(&keyword)
    })
}
