// src/utils.rs - Error type, logger and small shared helpers

use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};

/// Custom error type for the explorer
#[derive(Debug, Clone)]
pub struct ExplorerError {
    pub message: String,
    kind: ExplorerErrorKind,
}

#[derive(Debug, Clone)]
enum ExplorerErrorKind {
    Config,
    Api,
    Export,
    Cancelled,
}

impl ExplorerError {
    pub fn config(message: &str) -> Self {
        Self {
            message: message.to_string(),
            kind: ExplorerErrorKind::Config,
        }
    }

    pub fn api(message: &str) -> Self {
        Self {
            message: message.to_string(),
            kind: ExplorerErrorKind::Api,
        }
    }

    pub fn export(message: &str) -> Self {
        Self {
            message: message.to_string(),
            kind: ExplorerErrorKind::Export,
        }
    }

    pub fn cancelled() -> Self {
        Self {
            message: crate::constants::ERROR_CANCELLED.to_string(),
            kind: ExplorerErrorKind::Cancelled,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind, ExplorerErrorKind::Cancelled)
    }

    pub fn is_config(&self) -> bool {
        matches!(self.kind, ExplorerErrorKind::Config)
    }
}

impl fmt::Display for ExplorerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            ExplorerErrorKind::Config => "config",
            ExplorerErrorKind::Api => "api",
            ExplorerErrorKind::Export => "export",
            ExplorerErrorKind::Cancelled => "cancelled",
        };
        write!(f, "{} error: {}", label, self.message)
    }
}

impl Error for ExplorerError {}

/// Macro for cancellation checking
#[macro_export]
macro_rules! check_cancelled {
    ($token:expr) => {
        if $token.is_cancelled() {
            return Err(ExplorerError::cancelled());
        }
    };
}

/// Simplified logger for CLI use
#[derive(Debug, Clone)]
pub struct Logger {
    pub enabled: bool,
}

impl Logger {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Simple log without timing
    pub fn log(&self, message: &str) {
        if self.enabled {
            println!("[{}] {}", chrono::Local::now().format("%H:%M:%S"), message);
        }
    }

    /// Log with timing information
    pub fn log_timed(&self, prefix: &str, operation: &str, start: Instant) {
        if self.enabled {
            println!(
                "[{}] {} {} ({})",
                chrono::Local::now().format("%H:%M:%S"),
                prefix,
                operation,
                format_duration(start.elapsed())
            );
        }
    }

    /// Log error with operation context
    pub fn log_error(&self, operation: &str, error: &str) {
        if self.enabled {
            println!(
                "[{}] {} {} failed: {}",
                chrono::Local::now().format("%H:%M:%S"),
                crate::constants::LOG_PREFIX_ERROR,
                operation,
                error
            );
        }
    }
}

/// Fast duration formatting
pub fn format_duration(duration: Duration) -> String {
    let total_micros = duration.as_micros();

    if total_micros < 1_000 {
        format!("{}µs", total_micros)
    } else if total_micros < 1_000_000 {
        format!("{:.3}ms", total_micros as f64 / 1_000.0)
    } else {
        format!("{:.3}s", total_micros as f64 / 1_000_000.0)
    }
}

/// Config validation for the CLI flags
pub fn validate_config(config: &crate::app::Config) -> Result<(), String> {
    if config.timeout_seconds == 0 {
        return Err("Request timeout must be greater than 0".to_string());
    }

    if !config.api_url.starts_with("http://") && !config.api_url.starts_with("https://") {
        return Err(format!("Invalid API URL: {}", config.api_url));
    }

    if !(crate::constants::SCORE_MIN..=crate::constants::SCORE_MAX).contains(&config.min_score) {
        return Err(format!(
            "Minimum score {} outside [{}, {}]",
            config.min_score,
            crate::constants::SCORE_MIN,
            crate::constants::SCORE_MAX
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_units() {
        assert_eq!(format_duration(Duration::from_micros(500)), "500µs");
        assert_eq!(format_duration(Duration::from_millis(12)), "12.000ms");
        assert_eq!(format_duration(Duration::from_secs(2)), "2.000s");
    }

    #[test]
    fn test_error_kinds() {
        assert!(ExplorerError::cancelled().is_cancelled());
        assert!(ExplorerError::config("missing key").is_config());
        assert!(!ExplorerError::api("boom").is_cancelled());
    }
}
