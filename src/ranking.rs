//! Top-k crop ranking
//!
//! Ranks classifier output by probability, highest first. Equal probabilities
//! keep the classifier's native label order (stable sort).

use crate::classifier::{score_sample, ClassProbability, CropClassifier};
use crate::error::{AdvisorError, AdvisorResult};
use crate::sample::AgronomicSample;
use serde::{Deserialize, Serialize};

/// Number of crops recommended per request
pub const DEFAULT_TOP_K: usize = 3;

/// What to do when the classifier knows fewer classes than requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortfallPolicy {
    /// Return every available class
    #[default]
    Shorten,
    /// Fail with `ClassMismatch`
    Strict,
}

/// Highest-probability crops, best first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecommendation {
    pub entries: Vec<ClassProbability>,
    /// The `k` that was asked for; `entries` may be shorter
    pub requested: usize,
}

impl RankedRecommendation {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when fewer entries than requested were available
    pub fn is_short(&self) -> bool {
        self.entries.len() < self.requested
    }

    pub fn top(&self) -> Option<&ClassProbability> {
        self.entries.first()
    }

    pub fn crops(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.crop.as_str())
    }
}

/// Select the `k` highest-probability classes
///
/// Scores are expected to be validated (finite, in [0, 1]).
pub fn rank_top_k(
    mut scores: Vec<ClassProbability>,
    k: usize,
    policy: ShortfallPolicy,
) -> AdvisorResult<RankedRecommendation> {
    if scores.len() < k {
        let mismatch = AdvisorError::ClassMismatch {
            requested: k,
            available: scores.len(),
        };
        match policy {
            ShortfallPolicy::Strict => return Err(mismatch),
            ShortfallPolicy::Shorten => tracing::warn!("{}; returning shorter ranking", mismatch),
        }
    }

    // sort_by is stable: ties stay in label order
    scores.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    scores.truncate(k);

    Ok(RankedRecommendation {
        entries: scores,
        requested: k,
    })
}

/// Score a sample once and rank the result
pub fn recommend_crops(
    classifier: &dyn CropClassifier,
    sample: &AgronomicSample,
    k: usize,
    policy: ShortfallPolicy,
) -> AdvisorResult<RankedRecommendation> {
    let scores = score_sample(classifier, sample)?;
    rank_top_k(scores, k, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::StaticClassifier;
    use crate::sample::RawInputs;

    fn scores(pairs: &[(&str, f64)]) -> Vec<ClassProbability> {
        pairs
            .iter()
            .map(|(crop, probability)| ClassProbability {
                crop: crop.to_string(),
                probability: *probability,
            })
            .collect()
    }

    #[test]
    fn test_three_classes_ranked() {
        let ranked = rank_top_k(
            scores(&[("cotton", 0.2), ("maize", 0.3), ("rice", 0.5)]),
            3,
            ShortfallPolicy::Shorten,
        )
        .unwrap();

        assert_eq!(ranked.crops().collect::<Vec<_>>(), vec!["rice", "maize", "cotton"]);
        assert!(!ranked.is_short());
        assert_eq!(ranked.top().unwrap().crop, "rice");
    }

    #[test]
    fn test_truncates_to_k() {
        let ranked = rank_top_k(
            scores(&[("a", 0.1), ("b", 0.4), ("c", 0.05), ("d", 0.3), ("e", 0.15)]),
            3,
            ShortfallPolicy::Shorten,
        )
        .unwrap();

        assert_eq!(ranked.crops().collect::<Vec<_>>(), vec!["b", "d", "e"]);
        let probs: Vec<f64> = ranked.entries.iter().map(|e| e.probability).collect();
        assert!(probs.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_ties_keep_label_order() {
        let ranked = rank_top_k(
            scores(&[("apple", 0.25), ("banana", 0.25), ("coffee", 0.25), ("jute", 0.25)]),
            3,
            ShortfallPolicy::Shorten,
        )
        .unwrap();

        assert_eq!(ranked.crops().collect::<Vec<_>>(), vec!["apple", "banana", "coffee"]);
    }

    #[test]
    fn test_shortfall_shortens_by_default() {
        let ranked = rank_top_k(
            scores(&[("maize", 0.4), ("rice", 0.6)]),
            3,
            ShortfallPolicy::default(),
        )
        .unwrap();

        assert_eq!(ranked.len(), 2);
        assert!(ranked.is_short());
        assert_eq!(ranked.requested, 3);
    }

    #[test]
    fn test_shortfall_strict_fails() {
        let err = rank_top_k(scores(&[("maize", 0.4), ("rice", 0.6)]), 3, ShortfallPolicy::Strict)
            .unwrap_err();
        assert!(matches!(
            err,
            AdvisorError::ClassMismatch { requested: 3, available: 2 }
        ));
    }

    #[test]
    fn test_recommend_crops_with_classifier() {
        let model = StaticClassifier::from_pairs(&[("rice", 0.5), ("maize", 0.3), ("cotton", 0.2)]);
        let sample = AgronomicSample::new(&RawInputs::default()).unwrap();

        let ranked = recommend_crops(&model, &sample, DEFAULT_TOP_K, ShortfallPolicy::Shorten).unwrap();
        assert_eq!(ranked.crops().collect::<Vec<_>>(), vec!["rice", "maize", "cotton"]);
        assert!(ranked.entries.iter().all(|e| (0.0..=1.0).contains(&e.probability)));
    }
}
