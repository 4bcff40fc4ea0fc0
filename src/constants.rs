/// src/constants.rs - Static values shared across the explorer

/// OpenRouter model listing endpoint
pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/models";

/// Environment variable consulted when --api-key is not given
pub const API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";

/// Retryable HTTP status codes for the catalog fetch
pub const RETRYABLE_STATUS_CODES: [u16; 5] = [429, 500, 502, 503, 504];

/// Provider shown when a model id carries no provider slug
pub const UNKNOWN_PROVIDER: &str = "unknown";

/// Release column placeholder for records without a created timestamp
pub const RELEASE_DATE_UNKNOWN: &str = "N/A";

/// Score range enforced by the scorer
pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 10.0;

/// Error messages
pub const ERROR_CATALOG_UNAVAILABLE: &str = "OpenRouter API not reachable";
pub const ERROR_CATALOG_MALFORMED: &str = "Invalid JSON from OpenRouter models endpoint";
pub const ERROR_RETRIES_EXHAUSTED: &str = "Catalog fetch failed after all retries";
pub const ERROR_CANCELLED: &str = "Fetch cancelled";

/// Logging prefixes
pub const LOG_PREFIX_FETCH: &str = "🔄";
pub const LOG_PREFIX_SUCCESS: &str = "✅";
pub const LOG_PREFIX_ERROR: &str = "❌";
pub const LOG_PREFIX_WARNING: &str = "⚠️";

/// Capability labels used in the table and summary legend
pub const LABEL_CODING: &str = "🖥️ Code";
pub const LABEL_REASONING: &str = "🤔 Reason";
pub const LABEL_TOOLS: &str = "🔧 Tools";
