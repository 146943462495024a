//! Profitability estimates for ranked crops
//!
//! Joins the ranking against the economics table. Numbers keep full
//! precision; `ProfitabilityRow::formatted()` produces the display strings.

use crate::data::EconomicsStore;
use crate::error::AdvisorError;
use crate::ranking::RankedRecommendation;
use crate::utils::{capitalize, format_inr};
use serde::{Deserialize, Serialize};

/// Per-hectare estimate for one recommended crop (INR)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitabilityRow {
    pub crop: String,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
}

/// Display strings for a profitability row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedProfitabilityRow {
    #[serde(rename = "Crop")]
    pub crop: String,
    #[serde(rename = "Estimated Revenue (INR)")]
    pub revenue: String,
    #[serde(rename = "Estimated Cost (INR)")]
    pub cost: String,
    #[serde(rename = "Estimated Profit (INR)")]
    pub profit: String,
}

impl ProfitabilityRow {
    pub fn formatted(&self) -> FormattedProfitabilityRow {
        FormattedProfitabilityRow {
            crop: capitalize(&self.crop),
            revenue: format_inr(self.revenue),
            cost: format_inr(self.cost),
            profit: format_inr(self.profit),
        }
    }
}

/// Outcome of the profitability step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProfitabilityStatus {
    /// At least one ranked crop had economics data
    Available,
    /// Table loaded, but none of the ranked crops are in it
    NoMatchingCrops,
    /// Table could not be loaded
    Unavailable { reason: String },
}

impl ProfitabilityStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, ProfitabilityStatus::Available)
    }
}

/// Estimate revenue, cost and profit for each ranked crop, in rank order
///
/// Crops missing from the table are skipped.
pub fn calculate_profitability(
    ranking: &RankedRecommendation,
    store: &EconomicsStore,
) -> Vec<ProfitabilityRow> {
    ranking
        .entries
        .iter()
        .filter_map(|entry| {
            let Some(record) = store.get(&entry.crop) else {
                tracing::debug!("No economics data for '{}'", entry.crop);
                return None;
            };

            let revenue = record.yield_kg_per_hectare * record.price_inr_per_kg;
            Some(ProfitabilityRow {
                crop: entry.crop.clone(),
                revenue,
                cost: record.cost_inr_per_hectare,
                profit: revenue - record.cost_inr_per_hectare,
            })
        })
        .collect()
}

/// Run the calculator against a store that may have failed to load
///
/// A load failure never propagates: it becomes an empty row set with an
/// `Unavailable` status.
pub fn profitability_or_unavailable(
    ranking: &RankedRecommendation,
    store: Result<&EconomicsStore, &AdvisorError>,
) -> (Vec<ProfitabilityRow>, ProfitabilityStatus) {
    match store {
        Ok(store) => {
            let rows = calculate_profitability(ranking, store);
            let status = if rows.is_empty() {
                ProfitabilityStatus::NoMatchingCrops
            } else {
                ProfitabilityStatus::Available
            };
            (rows, status)
        }
        Err(e) => {
            tracing::warn!("Profitability analysis skipped: {}", e);
            (
                Vec::new(),
                ProfitabilityStatus::Unavailable { reason: e.to_string() },
            )
        }
    }
}
