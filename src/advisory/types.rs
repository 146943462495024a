use serde::{Deserialize, Serialize};

/// Soil macronutrient covered by the fertilizer rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nutrient {
    #[serde(rename = "N")]
    Nitrogen,
    #[serde(rename = "P")]
    Phosphorus,
    #[serde(rename = "K")]
    Potassium,
}

impl Nutrient {
    /// Rule evaluation order
    pub const ALL: [Nutrient; 3] = [Nutrient::Nitrogen, Nutrient::Phosphorus, Nutrient::Potassium];

    pub fn symbol(&self) -> &'static str {
        match self {
            Nutrient::Nitrogen => "N",
            Nutrient::Phosphorus => "P",
            Nutrient::Potassium => "K",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Nutrient::Nitrogen => "Nitrogen",
            Nutrient::Phosphorus => "Phosphorus",
            Nutrient::Potassium => "Potassium",
        }
    }

    /// "Nitrogen (N)"
    pub fn title(&self) -> String {
        format!("{} ({})", self.name(), self.symbol())
    }
}

/// Band a nutrient reading falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NutrientLevel {
    /// Below the low threshold
    Low,
    /// Between thresholds, inclusive
    Adequate,
    /// Above the high threshold
    Good,
}

impl NutrientLevel {
    pub fn severity(&self) -> Severity {
        match self {
            NutrientLevel::Low => Severity::Warning,
            NutrientLevel::Adequate => Severity::Success,
            NutrientLevel::Good => Severity::Info,
        }
    }
}

/// Styling hint for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Info,
    Success,
}

impl Severity {
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Warning => "⚠️",
            Severity::Info => "ℹ️",
            Severity::Success => "✅",
        }
    }
}

/// Fertilizer advice for one nutrient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryMessage {
    pub nutrient: Nutrient,
    pub level: NutrientLevel,
    pub severity: Severity,
    /// Reading the rule was evaluated on
    pub value: f64,
    pub title: String, // "Nitrogen (N)"
    pub text: String,
    /// Suggested product when the reading is low
    pub fertilizer: Option<String>,
}
