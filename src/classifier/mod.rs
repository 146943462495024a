//! Crop classifier interface
//!
//! The pipeline only needs inference: an ordered list of class labels and a
//! probability per label for one sample. How a model gets into memory is up to
//! the implementation:
//! - `forest.rs` - random forest exported to JSON
//! - `fixed.rs` - fixed probability vector (demos, benches, tests)

pub mod fixed;
pub mod forest;

pub use fixed::StaticClassifier;
pub use forest::ForestClassifier;

use crate::error::{AdvisorError, AdvisorResult};
use crate::sample::AgronomicSample;
use serde::{Deserialize, Serialize};

/// Allowed deviation of a probability vector's sum from 1.0
pub const PROBABILITY_SUM_TOLERANCE: f64 = 1e-4;

/// A fitted multi-class probabilistic classifier
pub trait CropClassifier: Send + Sync {
    /// Class labels in the classifier's native order
    fn class_labels(&self) -> &[String];

    /// One probability per entry of `class_labels()`, same order
    fn predict_proba(&self, sample: &AgronomicSample) -> AdvisorResult<Vec<f64>>;
}

/// Probability assigned to one crop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassProbability {
    pub crop: String,
    pub probability: f64,
}

impl ClassProbability {
    /// Confidence as a percentage string, e.g. "87.50%"
    pub fn confidence_display(&self) -> String {
        format!("{:.2}%", self.probability * 100.0)
    }
}

/// Run the classifier once and pair each probability with its label
///
/// Output keeps the classifier's native label order. A vector of the wrong
/// length, with values outside [0, 1], or not summing to ~1 is reported as
/// `ModelUnavailable`.
pub fn score_sample(
    classifier: &dyn CropClassifier,
    sample: &AgronomicSample,
) -> AdvisorResult<Vec<ClassProbability>> {
    let labels = classifier.class_labels();
    if labels.is_empty() {
        return Err(AdvisorError::ModelUnavailable(
            "classifier exposes no class labels".to_string(),
        ));
    }

    let probabilities = classifier.predict_proba(sample)?;
    check_probabilities(labels.len(), &probabilities)?;

    Ok(labels
        .iter()
        .zip(probabilities)
        .map(|(label, probability)| ClassProbability {
            crop: label.clone(),
            probability,
        })
        .collect())
}

fn check_probabilities(n_classes: usize, probabilities: &[f64]) -> AdvisorResult<()> {
    if probabilities.len() != n_classes {
        return Err(AdvisorError::ModelUnavailable(format!(
            "probability vector has {} entries for {} classes",
            probabilities.len(),
            n_classes
        )));
    }

    if let Some((idx, p)) = probabilities
        .iter()
        .enumerate()
        .find(|(_, p)| !p.is_finite() || **p < 0.0 || **p > 1.0)
    {
        return Err(AdvisorError::ModelUnavailable(format!(
            "probability {} at index {} is outside [0, 1]",
            p, idx
        )));
    }

    let sum: f64 = probabilities.iter().sum();
    if (sum - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
        return Err(AdvisorError::ModelUnavailable(format!(
            "probabilities sum to {:.6}, expected 1",
            sum
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::RawInputs;

    fn sample() -> AgronomicSample {
        AgronomicSample::new(&RawInputs::default()).unwrap()
    }

    fn classifier(labels: &[&str], probabilities: Vec<f64>) -> StaticClassifier {
        StaticClassifier::new(labels.iter().map(|s| s.to_string()).collect(), probabilities)
    }

    #[test]
    fn test_scores_follow_label_order() {
        let model = classifier(&["cotton", "maize", "rice"], vec![0.2, 0.3, 0.5]);
        let scores = score_sample(&model, &sample()).unwrap();

        let crops: Vec<&str> = scores.iter().map(|s| s.crop.as_str()).collect();
        assert_eq!(crops, vec!["cotton", "maize", "rice"]);
        assert_eq!(scores[2].probability, 0.5);
    }

    #[test]
    fn test_length_mismatch_is_model_error() {
        let model = classifier(&["cotton", "maize", "rice"], vec![0.5, 0.5]);
        let err = score_sample(&model, &sample()).unwrap_err();
        assert!(matches!(err, AdvisorError::ModelUnavailable(_)));
    }

    #[test]
    fn test_out_of_range_probability_rejected() {
        let model = classifier(&["a", "b"], vec![1.2, -0.2]);
        assert!(matches!(
            score_sample(&model, &sample()),
            Err(AdvisorError::ModelUnavailable(_))
        ));

        let model = classifier(&["a", "b"], vec![f64::NAN, 0.5]);
        assert!(score_sample(&model, &sample()).is_err());
    }

    #[test]
    fn test_sum_tolerance() {
        let model = classifier(&["a", "b", "c"], vec![0.1, 0.2, 0.3]);
        assert!(score_sample(&model, &sample()).is_err());

        // Floating point noise is accepted
        let model = classifier(&["a", "b", "c"], vec![0.1, 0.2, 0.70000001]);
        assert!(score_sample(&model, &sample()).is_ok());
    }

    #[test]
    fn test_no_labels() {
        let model = classifier(&[], vec![]);
        assert!(matches!(
            score_sample(&model, &sample()),
            Err(AdvisorError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn test_confidence_display() {
        let p = ClassProbability { crop: "rice".to_string(), probability: 0.875 };
        assert_eq!(p.confidence_display(), "87.50%");
    }
}
