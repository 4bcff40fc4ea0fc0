// src/display.rs - Table rendering, filtering and export

use clap::ValueEnum;
use serde::Serialize;
use std::path::Path;

use crate::classify::CapabilityTags;
use crate::constants::{LABEL_CODING, LABEL_REASONING, LABEL_TOOLS};
use crate::score::ScoredRecord;
use crate::utils::ExplorerError;

/// Capability selector for the --capability flag
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapabilityFilter {
    Code,
    Reason,
    Tools,
}

impl CapabilityFilter {
    fn matches(&self, tags: &CapabilityTags) -> bool {
        match self {
            CapabilityFilter::Code => tags.coding,
            CapabilityFilter::Reason => tags.reasoning,
            CapabilityFilter::Tools => tags.tool_calling,
        }
    }
}

/// Presentation-side filters assembled from the CLI flags
pub struct FilterOptions<'a> {
    pub min_score: f64,
    pub capabilities: &'a [CapabilityFilter],
    pub search: Option<&'a str>,
}

/// One rendered table/export row
#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    pub provider: String,
    pub name: String,
    pub model_id: String,
    pub params: String,
    pub score: f64,
    pub release: String,
    pub capabilities: String,
}

/// Scores are computed at full precision; the table shows one decimal.
pub fn round_score(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}

/// Provider slug with a leading capital, rest lowercased
pub fn capitalize_provider(slug: &str) -> String {
    let mut chars = slug.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

pub fn capability_labels(tags: &CapabilityTags) -> String {
    let mut labels = Vec::new();
    if tags.coding {
        labels.push(LABEL_CODING);
    }
    if tags.reasoning {
        labels.push(LABEL_REASONING);
    }
    if tags.tool_calling {
        labels.push(LABEL_TOOLS);
    }
    labels.join(" • ")
}

pub fn format_params(params: Option<f64>) -> String {
    match params {
        Some(value) => format!("{:.1}", value),
        None => "N/A".to_string(),
    }
}

/// Sort score-descending (stable, so equal scores keep feed order) and apply
/// the CLI filters. Filtering compares the displayed, rounded score.
pub fn sort_and_filter<'a>(
    scored: &'a [ScoredRecord],
    options: &FilterOptions<'_>,
) -> Vec<&'a ScoredRecord> {
    let mut selected: Vec<&ScoredRecord> = scored
        .iter()
        .filter(|entry| round_score(entry.effectiveness_score) >= options.min_score)
        .filter(|entry| {
            options.capabilities.is_empty()
                || options
                    .capabilities
                    .iter()
                    .any(|filter| filter.matches(&entry.features.capability_tags))
        })
        .filter(|entry| match options.search {
            Some(needle) => {
                let needle = needle.to_lowercase();
                entry.record.name.to_lowercase().contains(&needle)
                    || entry.record.id.to_lowercase().contains(&needle)
                    || entry.record.provider().to_lowercase().contains(&needle)
            }
            None => true,
        })
        .collect();

    selected.sort_by(|a, b| {
        b.effectiveness_score
            .partial_cmp(&a.effectiveness_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    selected
}

pub fn build_rows(selected: &[&ScoredRecord]) -> Vec<TableRow> {
    selected
        .iter()
        .map(|entry| TableRow {
            provider: capitalize_provider(entry.record.provider()),
            name: entry.record.name.clone(),
            model_id: entry.record.id.clone(),
            params: format_params(entry.features.parameter_billions),
            score: round_score(entry.effectiveness_score),
            release: entry.record.release_date(),
            capabilities: capability_labels(&entry.features.capability_tags),
        })
        .collect()
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let clipped: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", clipped)
    }
}

/// Headline counts shown before the table
pub fn print_summary(total: usize, free_or_preview: usize, relevant: usize) {
    println!();
    println!("Total Models: {}", total);
    println!("Free & Preview: {}", free_or_preview);
    println!("Relevant Capabilities: {}", relevant);
    println!();
}

pub fn print_table(rows: &[TableRow], limit: Option<usize>) {
    if rows.is_empty() {
        println!("No models match the filters.");
        return;
    }

    println!(
        "{:<14} {:<30} {:<40} {:>6} {:>6}  {:<10} {}",
        "Provider", "Name", "Model ID", "Params", "Score", "Release", "Capabilities"
    );
    println!("{}", "-".repeat(130));

    let shown = limit.unwrap_or(rows.len()).min(rows.len());
    for row in &rows[..shown] {
        println!(
            "{:<14} {:<30} {:<40} {:>6} {:>6.1}  {:<10} {}",
            clip(&row.provider, 14),
            clip(&row.name, 30),
            clip(&row.model_id, 40),
            row.params,
            row.score,
            row.release,
            row.capabilities
        );
    }

    if shown < rows.len() {
        println!("... and {} more (raise --limit to see them)", rows.len() - shown);
    }
}

pub fn render_json(rows: &[TableRow]) -> Result<String, ExplorerError> {
    serde_json::to_string_pretty(rows)
        .map_err(|e| ExplorerError::export(&format!("JSON serialization failed: {}", e)))
}

/// Shell-sourceable listing, one numbered variable per model id
pub fn render_env(rows: &[TableRow]) -> String {
    let mut output = String::new();
    for (index, row) in rows.iter().enumerate() {
        output.push_str(&format!("OPENROUTER_MODEL_{}={}\n", index + 1, row.model_id));
    }
    output
}

pub fn export_json(rows: &[TableRow], path: &Path) -> Result<(), ExplorerError> {
    let payload = render_json(rows)?;
    std::fs::write(path, payload)
        .map_err(|e| ExplorerError::export(&format!("Cannot write {}: {}", path.display(), e)))
}

pub fn export_env(rows: &[TableRow], path: &Path) -> Result<(), ExplorerError> {
    std::fs::write(path, render_env(rows))
        .map_err(|e| ExplorerError::export(&format!("Cannot write {}: {}", path.display(), e)))
}
