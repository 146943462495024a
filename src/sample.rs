//! Agronomic inputs and validation
//!
//! `RawInputs` is whatever the caller collected (form, CLI flags, JSON body).
//! `AgronomicSample` is the validated value the rest of the pipeline trusts.
//!
//! Two kinds of bounds exist:
//! - physical bounds, enforced here (negative rainfall, pH above 14, ...)
//! - interactive ranges (`FEATURE_RANGES`), which only describe the input form
//!   and are never enforced

use crate::error::{AdvisorError, AdvisorResult};
use serde::{Deserialize, Serialize};

/// Feature names in the column order the classifier was fitted on
pub const FEATURE_NAMES: [&str; 7] = [
    "N",
    "P",
    "K",
    "temperature",
    "humidity",
    "ph",
    "rainfall",
];

/// Seven numeric measurements as supplied by a caller, unvalidated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawInputs {
    /// Nitrogen content ratio in soil
    #[serde(rename = "N")]
    pub n: f64,

    /// Phosphorus content ratio in soil
    #[serde(rename = "P")]
    pub p: f64,

    /// Potassium content ratio in soil
    #[serde(rename = "K")]
    pub k: f64,

    /// Soil pH
    pub ph: f64,

    /// Seasonal rainfall (mm)
    pub rainfall: f64,

    /// Air temperature (°C)
    pub temperature: f64,

    /// Relative humidity (%)
    pub humidity: f64,
}

impl Default for RawInputs {
    /// Defaults of the interactive form
    fn default() -> Self {
        Self {
            n: FEATURE_RANGES[0].default,
            p: FEATURE_RANGES[1].default,
            k: FEATURE_RANGES[2].default,
            ph: FEATURE_RANGES[3].default,
            rainfall: FEATURE_RANGES[4].default,
            temperature: FEATURE_RANGES[5].default,
            humidity: FEATURE_RANGES[6].default,
        }
    }
}

/// Validated measurements for one recommendation request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgronomicSample {
    #[serde(rename = "N")]
    n: f64,
    #[serde(rename = "P")]
    p: f64,
    #[serde(rename = "K")]
    k: f64,
    ph: f64,
    rainfall: f64,
    temperature: f64,
    humidity: f64,
}

impl AgronomicSample {
    /// Validate raw inputs against physical bounds
    ///
    /// Fails with `InvalidInput` naming the first offending field, checked in
    /// the order N, P, K, pH, rainfall, temperature, humidity.
    pub fn new(raw: &RawInputs) -> AdvisorResult<Self> {
        let n = non_negative("N", raw.n)?;
        let p = non_negative("P", raw.p)?;
        let k = non_negative("K", raw.k)?;
        let ph = within("ph", raw.ph, PH_MIN, PH_MAX)?;
        let rainfall = non_negative("rainfall", raw.rainfall)?;
        let temperature = non_negative("temperature", raw.temperature)?;
        let humidity = within("humidity", raw.humidity, 0.0, 100.0)?;

        let sample = Self {
            n,
            p,
            k,
            ph,
            rainfall,
            temperature,
            humidity,
        };

        for (range, value) in FEATURE_RANGES.iter().zip(sample.input_order()) {
            if !range.contains(value) {
                tracing::debug!(
                    feature = range.name,
                    value,
                    min = range.min,
                    max = range.max,
                    "Input outside interactive range"
                );
            }
        }

        Ok(sample)
    }

    pub fn n(&self) -> f64 {
        self.n
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn k(&self) -> f64 {
        self.k
    }

    pub fn ph(&self) -> f64 {
        self.ph
    }

    pub fn rainfall(&self) -> f64 {
        self.rainfall
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn humidity(&self) -> f64 {
        self.humidity
    }

    /// Value of a feature by its `FEATURE_NAMES` entry
    pub fn feature(&self, name: &str) -> Option<f64> {
        match name {
            "N" => Some(self.n),
            "P" => Some(self.p),
            "K" => Some(self.k),
            "temperature" => Some(self.temperature),
            "humidity" => Some(self.humidity),
            "ph" => Some(self.ph),
            "rainfall" => Some(self.rainfall),
            _ => None,
        }
    }

    /// Features in `FEATURE_NAMES` order
    pub fn feature_vector(&self) -> [f64; 7] {
        [
            self.n,
            self.p,
            self.k,
            self.temperature,
            self.humidity,
            self.ph,
            self.rainfall,
        ]
    }

    // Form order: soil parameters first, then weather
    fn input_order(&self) -> [f64; 7] {
        [
            self.n,
            self.p,
            self.k,
            self.ph,
            self.rainfall,
            self.temperature,
            self.humidity,
        ]
    }
}

impl TryFrom<RawInputs> for AgronomicSample {
    type Error = AdvisorError;

    fn try_from(raw: RawInputs) -> AdvisorResult<Self> {
        Self::new(&raw)
    }
}

const PH_MIN: f64 = 0.0;
const PH_MAX: f64 = 14.0;

fn finite(field: &'static str, value: f64) -> AdvisorResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AdvisorError::invalid(field, value, "not a finite number"))
    }
}

fn non_negative(field: &'static str, value: f64) -> AdvisorResult<f64> {
    let value = finite(field, value)?;
    if value < 0.0 {
        return Err(AdvisorError::invalid(field, value, "must not be negative"));
    }
    Ok(value)
}

fn within(field: &'static str, value: f64, min: f64, max: f64) -> AdvisorResult<f64> {
    let value = finite(field, value)?;
    if value < min || value > max {
        return Err(AdvisorError::invalid(
            field,
            value,
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(value)
}

// ============================================================================
// Interactive input ranges
// ============================================================================

/// Range and default of one input on the interactive form
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FeatureRange {
    pub name: &'static str,
    pub label: &'static str,
    pub unit: Option<&'static str>,
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl FeatureRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Form ranges in form order (soil first, weather last)
pub const FEATURE_RANGES: [FeatureRange; 7] = [
    FeatureRange { name: "N", label: "Nitrogen (N)", unit: None, min: 0.0, max: 140.0, default: 70.0 },
    FeatureRange { name: "P", label: "Phosphorus (P)", unit: None, min: 5.0, max: 145.0, default: 75.0 },
    FeatureRange { name: "K", label: "Potassium (K)", unit: None, min: 5.0, max: 205.0, default: 105.0 },
    FeatureRange { name: "ph", label: "pH", unit: None, min: 3.5, max: 9.9, default: 6.7 },
    FeatureRange { name: "rainfall", label: "Rainfall", unit: Some("mm"), min: 20.0, max: 299.0, default: 160.0 },
    FeatureRange { name: "temperature", label: "Temperature", unit: Some("°C"), min: 8.0, max: 44.0, default: 26.0 },
    FeatureRange { name: "humidity", label: "Humidity", unit: Some("%"), min: 14.0, max: 100.0, default: 57.0 },
];
