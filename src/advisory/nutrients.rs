use crate::advisory::types::{AdvisoryMessage, Nutrient, NutrientLevel};
use crate::sample::AgronomicSample;

/// Strict thresholds for one nutrient
///
/// `value < low` is Low, `value > high` is Good, anything else (boundaries
/// included) is Adequate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutrientThresholds {
    pub low: f64,
    pub high: f64,
    /// Product suggested for a low reading
    pub fertilizer: &'static str,
}

impl NutrientThresholds {
    pub fn for_nutrient(nutrient: Nutrient) -> Self {
        match nutrient {
            Nutrient::Nitrogen => NutrientThresholds {
                low: 25.0,
                high: 60.0,
                fertilizer: "Urea",
            },
            Nutrient::Phosphorus => NutrientThresholds {
                low: 30.0,
                high: 70.0,
                fertilizer: "Single Superphosphate (SSP)",
            },
            Nutrient::Potassium => NutrientThresholds {
                low: 25.0,
                high: 50.0,
                fertilizer: "Muriate of Potash (MOP)",
            },
        }
    }

    pub fn classify(&self, value: f64) -> NutrientLevel {
        if value < self.low {
            NutrientLevel::Low
        } else if value > self.high {
            NutrientLevel::Good
        } else {
            NutrientLevel::Adequate
        }
    }
}

/// Evaluate the rule for a single nutrient reading
pub fn check_nutrient(nutrient: Nutrient, value: f64) -> AdvisoryMessage {
    let thresholds = NutrientThresholds::for_nutrient(nutrient);
    let level = thresholds.classify(value);
    let name = nutrient.name();

    let (text, fertilizer) = match level {
        NutrientLevel::Low => (
            format!(
                "Your soil is low in {} ({}). Consider adding a {}-rich fertilizer like {}.",
                name,
                value,
                name.to_lowercase(),
                thresholds.fertilizer
            ),
            Some(thresholds.fertilizer.to_string()),
        ),
        NutrientLevel::Good => (
            format!("Your soil has a good amount of {} ({}).", name, value),
            None,
        ),
        NutrientLevel::Adequate => (
            format!("Your soil has an optimal level of {} ({}).", name, value),
            None,
        ),
    };

    AdvisoryMessage {
        nutrient,
        level,
        severity: level.severity(),
        value,
        title: nutrient.title(),
        text,
        fertilizer,
    }
}

/// Fertilizer advice for N, P and K, in that order
///
/// Depends only on the soil readings, never on the crop ranking.
pub fn advise_fertilizer(sample: &AgronomicSample) -> [AdvisoryMessage; 3] {
    [
        check_nutrient(Nutrient::Nitrogen, sample.n()),
        check_nutrient(Nutrient::Phosphorus, sample.p()),
        check_nutrient(Nutrient::Potassium, sample.k()),
    ]
}
