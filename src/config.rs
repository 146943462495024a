//! Runtime configuration from environment variables
//!
//! | Variable              | Default                    |
//! |-----------------------|----------------------------|
//! | `CROP_MODEL_PATH`     | `models/crop_forest.json`  |
//! | `ECONOMICS_PATH`      | `data/crop_economics.csv`  |
//! | `TOP_K`               | `3`                        |
//! | `STRICT_TOP_K`        | `false`                    |
//! | `PORT`                | `3000`                     |
//! | `OPENWEATHER_API_KEY` | unset                      |

use crate::ranking::{ShortfallPolicy, DEFAULT_TOP_K};
use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str = "models/crop_forest.json";
pub const DEFAULT_ECONOMICS_PATH: &str = "data/crop_economics.csv";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq)]
pub struct AdvisorConfig {
    pub model_path: PathBuf,
    pub economics_path: PathBuf,
    pub top_k: usize,
    pub shortfall_policy: ShortfallPolicy,
    pub port: u16,
    pub weather_api_key: Option<String>,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            economics_path: PathBuf::from(DEFAULT_ECONOMICS_PATH),
            top_k: DEFAULT_TOP_K,
            shortfall_policy: ShortfallPolicy::Shorten,
            port: DEFAULT_PORT,
            weather_api_key: None,
        }
    }
}

impl AdvisorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value source; unparseable values keep their default
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let top_k = match lookup("TOP_K") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(k) if k > 0 => k,
                _ => {
                    tracing::warn!("Ignoring invalid TOP_K '{}', using {}", raw, defaults.top_k);
                    defaults.top_k
                }
            },
            None => defaults.top_k,
        };

        let shortfall_policy = match lookup("STRICT_TOP_K").as_deref().map(str::trim) {
            Some("1") | Some("true") | Some("yes") => ShortfallPolicy::Strict,
            Some("0") | Some("false") | Some("no") | Some("") | None => ShortfallPolicy::Shorten,
            Some(other) => {
                tracing::warn!("Ignoring invalid STRICT_TOP_K '{}'", other);
                ShortfallPolicy::Shorten
            }
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring invalid PORT '{}', using {}", raw, defaults.port);
                defaults.port
            }),
            None => defaults.port,
        };

        Self {
            model_path: lookup("CROP_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            economics_path: lookup("ECONOMICS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.economics_path),
            top_k,
            shortfall_policy,
            port,
            weather_api_key: lookup("OPENWEATHER_API_KEY").filter(|k| !k.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> AdvisorConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AdvisorConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config(&[]), AdvisorConfig::default());
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("CROP_MODEL_PATH", "/opt/models/forest.json"),
            ("ECONOMICS_PATH", "/opt/data/econ.csv"),
            ("TOP_K", "5"),
            ("STRICT_TOP_K", "true"),
            ("PORT", "8080"),
            ("OPENWEATHER_API_KEY", "abc123"),
        ]);

        assert_eq!(cfg.model_path, PathBuf::from("/opt/models/forest.json"));
        assert_eq!(cfg.economics_path, PathBuf::from("/opt/data/econ.csv"));
        assert_eq!(cfg.top_k, 5);
        assert_eq!(cfg.shortfall_policy, ShortfallPolicy::Strict);
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.weather_api_key.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let cfg = config(&[
            ("TOP_K", "0"),
            ("STRICT_TOP_K", "maybe"),
            ("PORT", "http"),
            ("OPENWEATHER_API_KEY", "  "),
        ]);

        assert_eq!(cfg.top_k, DEFAULT_TOP_K);
        assert_eq!(cfg.shortfall_policy, ShortfallPolicy::Shorten);
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert!(cfg.weather_api_key.is_none());
    }
}
