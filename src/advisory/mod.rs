//! Rule-based fertilizer advice
//!
//! Fixed N/P/K thresholds, evaluated on the soil readings alone.

pub mod nutrients;
pub mod types;

pub use nutrients::{advise_fertilizer, check_nutrient, NutrientThresholds};
pub use types::{AdvisoryMessage, Nutrient, NutrientLevel, Severity};
