//! Crop Advisor - runs the full recommendation pipeline
//!
//! validate inputs → score + rank crops → fertilizer advice → profitability
//!
//! The classifier and economics table are read-only after load, so one
//! `CropAdvisor` can serve any number of sequential or concurrent requests.

use crate::advisory::{advise_fertilizer, AdvisoryMessage};
use crate::classifier::{CropClassifier, ForestClassifier};
use crate::config::AdvisorConfig;
use crate::data::EconomicsStore;
use crate::error::{AdvisorError, AdvisorResult};
use crate::profitability::{
    profitability_or_unavailable, FormattedProfitabilityRow, ProfitabilityRow, ProfitabilityStatus,
};
use crate::ranking::{recommend_crops, RankedRecommendation, ShortfallPolicy, DEFAULT_TOP_K};
use crate::sample::{AgronomicSample, RawInputs};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

/// Result of one recommendation request
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub sample: AgronomicSample,
    pub ranking: RankedRecommendation,
    /// N, P, K in that order
    pub advisories: [AdvisoryMessage; 3],
    pub profitability: Vec<ProfitabilityRow>,
    pub profitability_status: ProfitabilityStatus,
}

impl Recommendation {
    pub fn formatted_profitability(&self) -> Vec<FormattedProfitabilityRow> {
        self.profitability.iter().map(ProfitabilityRow::formatted).collect()
    }
}

/// Economics table, loaded on first use
///
/// Successful loads are kept for the life of the advisor. Failed loads are
/// retried on the next request so a table restored on disk is picked up.
struct EconomicsCache {
    path: Option<PathBuf>,
    loaded: OnceLock<Arc<EconomicsStore>>,
}

impl EconomicsCache {
    fn get(&self) -> AdvisorResult<Arc<EconomicsStore>> {
        if let Some(store) = self.loaded.get() {
            return Ok(store.clone());
        }

        let path = self.path.as_ref().ok_or_else(|| {
            AdvisorError::DataUnavailable("no economics table configured".to_string())
        })?;
        let store = Arc::new(EconomicsStore::load(path)?);
        Ok(self.loaded.get_or_init(|| store).clone())
    }
}

/// Recommendation pipeline
pub struct CropAdvisor {
    classifier: Arc<dyn CropClassifier>,
    economics: EconomicsCache,
    top_k: usize,
    shortfall_policy: ShortfallPolicy,
}

impl CropAdvisor {
    /// Advisor with no economics table; profitability reports `Unavailable`
    pub fn new(classifier: Arc<dyn CropClassifier>) -> Self {
        Self {
            classifier,
            economics: EconomicsCache {
                path: None,
                loaded: OnceLock::new(),
            },
            top_k: DEFAULT_TOP_K,
            shortfall_policy: ShortfallPolicy::default(),
        }
    }

    /// Load the model eagerly and point the economics cache at its CSV
    ///
    /// A model that fails to load is fatal here; a missing economics table is
    /// not, it only degrades profitability output.
    pub fn from_config(config: &AdvisorConfig) -> AdvisorResult<Self> {
        let classifier = ForestClassifier::load(&config.model_path)?;

        Ok(Self::new(Arc::new(classifier))
            .with_economics_path(config.economics_path.clone())
            .with_top_k(config.top_k)
            .with_shortfall_policy(config.shortfall_policy))
    }

    /// Economics CSV to load lazily on the first request
    pub fn with_economics_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.economics = EconomicsCache {
            path: Some(path.into()),
            loaded: OnceLock::new(),
        };
        self
    }

    /// Use an already loaded economics table
    pub fn with_economics(mut self, store: EconomicsStore) -> Self {
        let loaded = OnceLock::new();
        let _ = loaded.set(Arc::new(store));
        self.economics = EconomicsCache { path: None, loaded };
        self
    }

    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k.max(1);
        self
    }

    pub fn with_shortfall_policy(mut self, policy: ShortfallPolicy) -> Self {
        self.shortfall_policy = policy;
        self
    }

    pub fn class_labels(&self) -> &[String] {
        self.classifier.class_labels()
    }

    /// Validate raw inputs and run the pipeline
    ///
    /// Invalid inputs and classifier failures abort the request. Economics
    /// failures do not: they surface as `ProfitabilityStatus::Unavailable`.
    pub fn recommend(&self, raw: &RawInputs) -> AdvisorResult<Recommendation> {
        let sample = AgronomicSample::new(raw)?;
        self.recommend_sample(sample)
    }

    pub fn recommend_sample(&self, sample: AgronomicSample) -> AdvisorResult<Recommendation> {
        let ranking = recommend_crops(
            self.classifier.as_ref(),
            &sample,
            self.top_k,
            self.shortfall_policy,
        )?;
        tracing::debug!(
            "Ranked {} crops, top: {:?}",
            ranking.len(),
            ranking.top().map(|t| t.crop.as_str())
        );

        let advisories = advise_fertilizer(&sample);

        let economics = self.economics.get();
        let (profitability, profitability_status) =
            profitability_or_unavailable(&ranking, economics.as_deref());

        Ok(Recommendation {
            sample,
            ranking,
            advisories,
            profitability,
            profitability_status,
        })
    }
}
