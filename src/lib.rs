//! Crop Advisor
//!
//! Recommends crops from soil and weather measurements with a pre-trained
//! classifier, then adds rule-based fertilizer advice and per-hectare
//! profitability estimates from a static economics table.
//!
//! - `sample`: input validation
//! - `classifier/`: classifier interface and model loaders
//! - `ranking`: top-k crop selection
//! - `advisory/`: N/P/K fertilizer rules
//! - `data`: economics table (Polars CSV)
//! - `profitability`: revenue/cost/profit join
//! - `advisor`: pipeline orchestration
//! - `formatters/`: markdown and JSON reports
//! - `weather`, `api_server`: HTTP side (feature `api`)

pub mod error;
pub mod sample;
pub mod classifier;
pub mod ranking;
pub mod advisory;
pub mod data;
pub mod profitability;
pub mod advisor;
pub mod config;
pub mod formatters;
pub mod utils;

#[cfg(feature = "api")]
pub mod weather;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use error::{AdvisorError, AdvisorResult};
pub use sample::{AgronomicSample, FeatureRange, RawInputs, FEATURE_NAMES, FEATURE_RANGES};
pub use classifier::{ClassProbability, CropClassifier, ForestClassifier, StaticClassifier};
pub use ranking::{RankedRecommendation, ShortfallPolicy, DEFAULT_TOP_K};
pub use advisory::{AdvisoryMessage, Nutrient, NutrientLevel, Severity};
pub use data::{EconomicsRecord, EconomicsStore};
pub use profitability::{FormattedProfitabilityRow, ProfitabilityRow, ProfitabilityStatus};
pub use advisor::{CropAdvisor, Recommendation};
pub use config::AdvisorConfig;

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
