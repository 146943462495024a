//! Economics reference data
//!
//! Loads the per-hectare yield/price/cost table with Polars and keeps it as an
//! immutable crop-name → record map.
//!
//! Expected CSV header:
//! `crop,yield_kg_per_hectare,price_inr_per_kg,cost_inr_per_hectare`

use crate::error::{AdvisorError, AdvisorResult};
use polars::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

const CROP_COL: &str = "crop";
const YIELD_COL: &str = "yield_kg_per_hectare";
const PRICE_COL: &str = "price_inr_per_kg";
const COST_COL: &str = "cost_inr_per_hectare";

/// Per-hectare economics for one crop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicsRecord {
    pub crop: String,
    pub yield_kg_per_hectare: f64,
    pub price_inr_per_kg: f64,
    pub cost_inr_per_hectare: f64,
}

/// Read-only economics table keyed by lowercase crop name
#[derive(Debug, Clone, Default)]
pub struct EconomicsStore {
    records: FxHashMap<String, EconomicsRecord>,
}

impl EconomicsStore {
    /// Build from records; the first record wins when crop names collide
    pub fn from_records(records: impl IntoIterator<Item = EconomicsRecord>) -> Self {
        let mut map = FxHashMap::default();
        for record in records {
            let key = normalize_key(&record.crop);
            if map.contains_key(&key) {
                tracing::debug!("Ignoring duplicate economics record for '{}'", record.crop);
                continue;
            }
            map.insert(key, record);
        }
        Self { records: map }
    }

    /// Load the economics CSV
    ///
    /// A missing file, missing column or non-numeric column is
    /// `DataUnavailable`. Rows with an empty crop name, null values or
    /// values that are negative or not finite are skipped.
    pub fn load(path: &Path) -> AdvisorResult<Self> {
        if !path.exists() {
            return Err(AdvisorError::DataUnavailable(format!(
                "economics file not found: {:?}",
                path
            )));
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.into()))
            .map_err(|e| unreadable(path, e))?
            .finish()
            .map_err(|e| unreadable(path, e))?;

        let store = Self::from_dataframe(&df)?;
        tracing::info!("Loaded {} economics records from {:?}", store.len(), path);
        Ok(store)
    }

    fn from_dataframe(df: &DataFrame) -> AdvisorResult<Self> {
        let crops = df
            .column(CROP_COL)
            .map_err(|e| missing_column(CROP_COL, e))?
            .str()
            .map_err(|e| missing_column(CROP_COL, e))?;

        // Integer columns are common in hand-edited tables
        let yields = numeric_column(df, YIELD_COL)?;
        let prices = numeric_column(df, PRICE_COL)?;
        let costs = numeric_column(df, COST_COL)?;
        let yields = yields.f64().map_err(|e| missing_column(YIELD_COL, e))?;
        let prices = prices.f64().map_err(|e| missing_column(PRICE_COL, e))?;
        let costs = costs.f64().map_err(|e| missing_column(COST_COL, e))?;

        let mut records = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            let row = (crops.get(idx), yields.get(idx), prices.get(idx), costs.get(idx));
            match row {
                (Some(crop), Some(y), Some(p), Some(c))
                    if !crop.trim().is_empty() && [y, p, c].iter().all(|v| v.is_finite() && *v >= 0.0) =>
                {
                    records.push(EconomicsRecord {
                        crop: crop.trim().to_string(),
                        yield_kg_per_hectare: y,
                        price_inr_per_kg: p,
                        cost_inr_per_hectare: c,
                    });
                }
                _ => tracing::warn!("Skipping incomplete economics row {}", idx),
            }
        }

        Ok(Self::from_records(records))
    }

    /// Case-insensitive lookup
    pub fn get(&self, crop: &str) -> Option<&EconomicsRecord> {
        self.records.get(&normalize_key(crop))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn normalize_key(crop: &str) -> String {
    crop.trim().to_lowercase()
}

fn numeric_column(df: &DataFrame, name: &str) -> AdvisorResult<Column> {
    df.column(name)
        .map_err(|e| missing_column(name, e))?
        .cast(&DataType::Float64)
        .map_err(|e| missing_column(name, e))
}

fn unreadable(path: &Path, e: PolarsError) -> AdvisorError {
    AdvisorError::DataUnavailable(format!("failed to read economics CSV {:?}: {}", path, e))
}

fn missing_column(name: &str, e: PolarsError) -> AdvisorError {
    AdvisorError::DataUnavailable(format!("column '{}' unusable: {}", name, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(crop: &str, y: f64, p: f64, c: f64) -> EconomicsRecord {
        EconomicsRecord {
            crop: crop.to_string(),
            yield_kg_per_hectare: y,
            price_inr_per_kg: p,
            cost_inr_per_hectare: c,
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let store = EconomicsStore::from_records(vec![record("rice", 4000.0, 20.0, 30000.0)]);
        assert_eq!(store.get("Rice").unwrap().yield_kg_per_hectare, 4000.0);
        assert_eq!(store.get("RICE ").unwrap().crop, "rice");
        assert!(store.get("maize").is_none());
    }

    #[test]
    fn test_first_duplicate_wins() {
        let store = EconomicsStore::from_records(vec![
            record("Maize", 3000.0, 18.0, 25000.0),
            record("maize", 1.0, 1.0, 1.0),
        ]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("maize").unwrap().price_inr_per_kg, 18.0);
    }

    #[test]
    fn test_missing_file_is_data_unavailable() {
        let err = EconomicsStore::load(Path::new("data/no_such_table.csv")).unwrap_err();
        assert!(matches!(err, AdvisorError::DataUnavailable(_)));
    }

    #[test]
    fn test_from_dataframe_casts_integers() {
        let df = df! {
            "crop" => &["rice", "maize"],
            "yield_kg_per_hectare" => &[4000i64, 3000],
            "price_inr_per_kg" => &[20.0, 18.5],
            "cost_inr_per_hectare" => &[30000i64, 25000]
        }
        .unwrap();

        let store = EconomicsStore::from_dataframe(&df).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("rice").unwrap().cost_inr_per_hectare, 30000.0);
        assert_eq!(store.get("maize").unwrap().price_inr_per_kg, 18.5);
    }

    #[test]
    fn test_from_dataframe_missing_column() {
        let df = df! {
            "crop" => &["rice"],
            "yield_kg_per_hectare" => &[4000.0],
            "price_inr_per_kg" => &[20.0]
        }
        .unwrap();

        let err = EconomicsStore::from_dataframe(&df).unwrap_err();
        assert!(err.to_string().contains("cost_inr_per_hectare"));
    }

    #[test]
    fn test_from_dataframe_skips_bad_rows() {
        let df = df! {
            "crop" => &[Some("rice"), None, Some("jute"), Some("maize"), Some("cotton")],
            "yield_kg_per_hectare" => &[Some(4000.0), Some(1.0), Some(2500.0), Some(3000.0), Some(f64::INFINITY)],
            "price_inr_per_kg" => &[Some(20.0), Some(1.0), Some(-3.0), Some(18.0), Some(65.0)],
            "cost_inr_per_hectare" => &[Some(30000.0), Some(1.0), None, Some(f64::INFINITY), Some(45000.0)]
        }
        .unwrap();

        let store = EconomicsStore::from_dataframe(&df).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get("jute").is_none());
        assert!(store.get("maize").is_none());
        assert!(store.get("cotton").is_none());
    }

    #[test]
    fn test_load_skips_infinite_values() {
        let path = std::env::temp_dir().join(format!("crop_economics_inf_{}.csv", std::process::id()));
        std::fs::write(
            &path,
            "crop,yield_kg_per_hectare,price_inr_per_kg,cost_inr_per_hectare\n\
             rice,inf,20,30000\n\
             maize,3000,0,inf\n\
             jute,2500,45,35000\n",
        )
        .unwrap();

        let store = EconomicsStore::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.get("rice").is_none());
        assert!(store.get("maize").is_none());
        assert_eq!(store.get("jute").unwrap().cost_inr_per_hectare, 35000.0);
    }

    #[test]
    fn test_load_bundled_table() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/crop_economics.csv");
        let store = EconomicsStore::load(&path).unwrap();
        assert_eq!(store.len(), 22);

        let rice = store.get("rice").unwrap();
        assert_eq!(rice.yield_kg_per_hectare, 4000.0);
        assert_eq!(rice.price_inr_per_kg, 20.0);
        assert_eq!(rice.cost_inr_per_hectare, 30000.0);
    }
}
