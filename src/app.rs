// src/app.rs - CLI configuration and run orchestration

use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::constants::{API_KEY_ENV_VAR, DEFAULT_API_URL, LOG_PREFIX_SUCCESS, LOG_PREFIX_WARNING};
use crate::display::{self, CapabilityFilter, FilterOptions};
use crate::fetch::CatalogClient;
use crate::rules::RuleConfig;
use crate::score::score_catalog;
use crate::utils::{validate_config, Logger};

#[derive(Parser, Debug, Clone)]
#[command(name = "openrouter-model-explorer")]
#[command(about = "Score and rank free/preview OpenRouter models by capability")]
pub struct Config {
    #[arg(long, default_value = DEFAULT_API_URL, help = "OpenRouter models endpoint")]
    pub api_url: String,

    #[arg(long, help = "API key; falls back to the OPENROUTER_API_KEY environment variable")]
    pub api_key: Option<String>,

    #[arg(long, help = "Path to a heuristics JSON file overriding the built-in rules")]
    pub rules: Option<PathBuf>,

    #[arg(long, default_value = "0.0", help = "Minimum effectiveness score to display")]
    pub min_score: f64,

    #[arg(long, value_enum, help = "Keep only models with this capability (repeatable)")]
    pub capability: Vec<CapabilityFilter>,

    #[arg(long, help = "Substring filter over name, id and provider")]
    pub search: Option<String>,

    #[arg(long, help = "Maximum number of table rows to print")]
    pub limit: Option<usize>,

    #[arg(long, help = "Write the filtered rows to a JSON file")]
    pub export_json: Option<PathBuf>,

    #[arg(long, help = "Write the filtered model ids to an .env-style file")]
    pub export_env: Option<PathBuf>,

    #[arg(long, help = "Disable logging output")]
    pub no_log: bool,

    #[arg(long, default_value = "30", help = "HTTP request timeout in seconds")]
    pub timeout_seconds: u64,

    #[arg(long, default_value = "3", help = "Retry attempts for transient fetch failures")]
    pub retries: u32,

    #[arg(long, default_value = "1", help = "Base backoff between retries in seconds")]
    pub backoff_seconds: u64,
}

impl Config {
    /// Explicit flag first, then the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV_VAR).ok())
            .filter(|key| !key.is_empty())
    }
}

/// The explorer run: fetch the catalog once, score it, present it.
pub struct Explorer {
    pub config: Config,
    pub client: reqwest::Client,
    pub logger: Logger,
}

impl Explorer {
    pub fn new(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        validate_config(&config)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let logger = Logger::new(!config.no_log);

        Ok(Self {
            config,
            client,
            logger,
        })
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        self.print_startup_banner();

        let rules = match &self.config.rules {
            Some(path) => RuleConfig::load_from_file(path)?,
            None => RuleConfig::load_default()?,
        };

        // Ctrl-C cancels the in-flight fetch instead of killing mid-write
        let token = CancellationToken::new();
        {
            let token = token.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    token.cancel();
                }
            });
        }

        let api_key = self.config.resolve_api_key();
        if api_key.is_none() {
            self.logger.log(&format!(
                "{} No API key configured; fetching the public listing anonymously",
                LOG_PREFIX_WARNING
            ));
        }

        let catalog_client = CatalogClient {
            client: &self.client,
            logger: &self.logger,
            api_url: &self.config.api_url,
            api_key: api_key.as_deref(),
            retries: self.config.retries,
            backoff_seconds: self.config.backoff_seconds,
        };
        let records = catalog_client.fetch_models(token).await?;

        let start = Instant::now();
        let scored = score_catalog(&records, &rules, Utc::now());
        self.logger.log_timed(
            LOG_PREFIX_SUCCESS,
            &format!("Scored {} eligible models", scored.len()),
            start,
        );

        let free_or_preview = records.iter().filter(|r| r.is_free_or_preview()).count();
        display::print_summary(records.len(), free_or_preview, scored.len());

        let options = FilterOptions {
            min_score: self.config.min_score,
            capabilities: &self.config.capability,
            search: self.config.search.as_deref(),
        };
        let rows = display::build_rows(&display::sort_and_filter(&scored, &options));
        display::print_table(&rows, self.config.limit);

        if let Some(path) = &self.config.export_json {
            display::export_json(&rows, path)?;
            self.logger.log(&format!(
                "{} Wrote {} rows to {}",
                LOG_PREFIX_SUCCESS,
                rows.len(),
                path.display()
            ));
        }
        if let Some(path) = &self.config.export_env {
            display::export_env(&rows, path)?;
            self.logger.log(&format!(
                "{} Wrote {} model ids to {}",
                LOG_PREFIX_SUCCESS,
                rows.len(),
                path.display()
            ));
        }

        Ok(())
    }

    fn print_startup_banner(&self) {
        if self.logger.enabled {
            println!();
            println!("OpenRouter Model Explorer");
            println!("-------------------------");
            println!("v{}", crate::VERSION);
            println!("API URL: {}", self.config.api_url);
            println!("Minimum Score: {}", self.config.min_score);
            println!("Logging: {}", if self.logger.enabled { "Enabled" } else { "Disabled" });
            println!("Request Timeout: {}s", self.config.timeout_seconds);
            println!("Retries: {}", self.config.retries);
            println!();
        }
    }
}
