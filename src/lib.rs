// src/lib.rs - Module organization for the OpenRouter model explorer

// Core modules
pub mod app;
pub mod catalog;
pub mod classify;
pub mod constants;
pub mod display;
pub mod extract;
pub mod fetch;
pub mod rules;
pub mod score;
pub mod utils;

// Public re-exports for easy access
pub use app::{Config, Explorer};
pub use catalog::{Architecture, ModelRecord, Pricing};
pub use classify::{architecture_signal, classify_capabilities, CapabilityTags};
pub use display::{CapabilityFilter, FilterOptions, TableRow};
pub use extract::{detect_family, detect_multimodal, detect_quantized, extract_parameter_billions};
pub use fetch::CatalogClient;
pub use rules::RuleConfig;
pub use score::{derive_features, effectiveness_score, is_relevant, score_catalog};
pub use score::{DerivedFeatures, ScoredRecord};
pub use utils::{validate_config, ExplorerError, Logger};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
