use super::CropClassifier;
use crate::error::AdvisorResult;
use crate::sample::AgronomicSample;

/// Classifier that returns the same probability vector for every sample
///
/// The vector is handed back unchecked; `score_sample` validates it like any
/// other model output.
#[derive(Debug, Clone)]
pub struct StaticClassifier {
    labels: Vec<String>,
    probabilities: Vec<f64>,
}

impl StaticClassifier {
    pub fn new(labels: Vec<String>, probabilities: Vec<f64>) -> Self {
        Self { labels, probabilities }
    }

    /// Build from `(label, probability)` pairs, keeping their order
    pub fn from_pairs(pairs: &[(&str, f64)]) -> Self {
        Self {
            labels: pairs.iter().map(|(label, _)| label.to_string()).collect(),
            probabilities: pairs.iter().map(|(_, p)| *p).collect(),
        }
    }
}

impl CropClassifier for StaticClassifier {
    fn class_labels(&self) -> &[String] {
        &self.labels
    }

    fn predict_proba(&self, _sample: &AgronomicSample) -> AdvisorResult<Vec<f64>> {
        Ok(self.probabilities.clone())
    }
}
