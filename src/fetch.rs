// src/fetch.rs - Catalog retrieval with retry, backoff and cancellation

use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::catalog::ModelRecord;
use crate::check_cancelled;
use crate::constants::{
    ERROR_CATALOG_MALFORMED, ERROR_CATALOG_UNAVAILABLE, ERROR_RETRIES_EXHAUSTED,
    LOG_PREFIX_FETCH, LOG_PREFIX_SUCCESS, LOG_PREFIX_WARNING, RETRYABLE_STATUS_CODES,
};
use crate::utils::{ExplorerError, Logger};

/// Outcome of a single fetch attempt
enum AttemptError {
    Retryable(String),
    Fatal(ExplorerError),
}

fn is_retryable_status(status: reqwest::StatusCode) -> bool {
    RETRYABLE_STATUS_CODES.contains(&status.as_u16())
}

/// Lightweight client for the catalog listing endpoint
pub struct CatalogClient<'a> {
    pub client: &'a reqwest::Client,
    pub logger: &'a Logger,
    pub api_url: &'a str,
    pub api_key: Option<&'a str>,
    pub retries: u32,
    pub backoff_seconds: u64,
}

impl<'a> CatalogClient<'a> {
    /// Fetch the full model listing, retrying transient failures with
    /// doubling backoff. Cancellation wins any race.
    pub async fn fetch_models(
        &self,
        token: CancellationToken,
    ) -> Result<Vec<ModelRecord>, ExplorerError> {
        let start = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            check_cancelled!(token);
            self.logger.log(&format!(
                "{} GET {} (attempt {}/{})",
                LOG_PREFIX_FETCH,
                self.api_url,
                attempt + 1,
                self.retries + 1
            ));

            match self.fetch_once(&token).await {
                Ok(records) => {
                    self.logger.log_timed(
                        LOG_PREFIX_SUCCESS,
                        &format!("Fetched {} catalog entries", records.len()),
                        start,
                    );
                    return Ok(records);
                }
                Err(AttemptError::Fatal(error)) => return Err(error),
                Err(AttemptError::Retryable(message)) => {
                    if attempt >= self.retries {
                        self.logger.log_error("Catalog fetch", &message);
                        return Err(ExplorerError::api(ERROR_RETRIES_EXHAUSTED));
                    }
                    attempt += 1;
                    let wait = Duration::from_secs(
                        self.backoff_seconds.saturating_mul(1 << (attempt - 1).min(6)),
                    );
                    self.logger.log(&format!(
                        "{} {} - retrying in {}s",
                        LOG_PREFIX_WARNING,
                        message,
                        wait.as_secs()
                    ));
                    tokio::select! {
                        _ = sleep(wait) => {},
                        _ = token.cancelled() => return Err(ExplorerError::cancelled()),
                    }
                }
            }
        }
    }

    async fn fetch_once(&self, token: &CancellationToken) -> Result<Vec<ModelRecord>, AttemptError> {
        let mut request = self.client.get(self.api_url);
        if let Some(key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = tokio::select! {
            result = request.send() => match result {
                Ok(response) => response,
                Err(err) => {
                    let message = if err.is_timeout() {
                        "Request timeout".to_string()
                    } else if err.is_connect() {
                        ERROR_CATALOG_UNAVAILABLE.to_string()
                    } else {
                        format!("Request failed: {}", err)
                    };
                    return Err(AttemptError::Retryable(message));
                }
            },
            _ = token.cancelled() => return Err(AttemptError::Fatal(ExplorerError::cancelled())),
        };

        let status = response.status();
        if !status.is_success() {
            let message = format!("OpenRouter error: {}", status);
            return if is_retryable_status(status) {
                Err(AttemptError::Retryable(message))
            } else {
                Err(AttemptError::Fatal(ExplorerError::api(&message)))
            };
        }

        let body = tokio::select! {
            result = response.json::<Value>() => result
                .map_err(|_| AttemptError::Fatal(ExplorerError::api(ERROR_CATALOG_MALFORMED)))?,
            _ = token.cancelled() => return Err(AttemptError::Fatal(ExplorerError::cancelled())),
        };

        Ok(parse_catalog(&body, self.logger))
    }
}

/// Decode the listing body into records. Entries that fail to deserialize
/// are skipped with a warning rather than failing the whole batch.
pub fn parse_catalog(body: &Value, logger: &Logger) -> Vec<ModelRecord> {
    let mut records = Vec::new();
    let mut skipped = 0usize;

    if let Some(data) = body.get("data").and_then(|d| d.as_array()) {
        for entry in data {
            match serde_json::from_value::<ModelRecord>(entry.clone()) {
                Ok(record) => records.push(record),
                Err(_) => skipped += 1,
            }
        }
    }

    if skipped > 0 {
        logger.log(&format!(
            "{} Skipped {} malformed catalog entries",
            LOG_PREFIX_WARNING, skipped
        ));
    }

    records
}
