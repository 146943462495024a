//! Live weather lookup (OpenWeatherMap current weather)
//!
//! Side-channel for the presentation layer: a successful lookup overwrites the
//! temperature and humidity of the next request's inputs, a failed one leaves
//! them alone. The recommendation pipeline never calls this module.
//!
//! No retries.

use crate::sample::RawInputs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("No OpenWeatherMap API key provided")]
    MissingApiKey,

    #[error("Network error: {0}")]
    NetworkError(String),

    /// API answered with a non-200 `cod` (unknown city, invalid key, ...)
    #[error("City not found or API key is invalid. (Error {code}: {message})")]
    ApiError { code: String, message: String },

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Current conditions for a city, metric units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub city: String,
    pub temperature: f64,
    pub humidity: f64,
}

impl WeatherReading {
    /// Overwrite temperature and humidity, keep everything else
    pub fn apply_to(&self, inputs: &mut RawInputs) {
        inputs.temperature = self.temperature;
        inputs.humidity = self.humidity;
    }
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    /// Number on success, sometimes a string on errors ("404")
    #[serde(default)]
    cod: serde_json::Value,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    main: Option<OwmMain>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: f64,
}

/// Interpret an OpenWeatherMap response body
pub fn parse_weather_response(city: &str, body: &str) -> Result<WeatherReading, WeatherError> {
    let response: OwmResponse =
        serde_json::from_str(body).map_err(|e| WeatherError::ParseError(e.to_string()))?;

    let code = match &response.cod {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        _ => String::new(),
    };

    if code != "200" {
        return Err(WeatherError::ApiError {
            code,
            message: response.message.unwrap_or_else(|| "Unknown".to_string()),
        });
    }

    let main = response
        .main
        .ok_or_else(|| WeatherError::ParseError("response has no 'main' section".to_string()))?;

    Ok(WeatherReading {
        city: city.to_string(),
        temperature: main.temp,
        humidity: main.humidity,
    })
}

/// OpenWeatherMap client
pub struct WeatherClient {
    http_client: reqwest::Client,
    default_api_key: Option<String>,
}

impl WeatherClient {
    pub fn new(default_api_key: Option<String>) -> Result<Self, WeatherError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| WeatherError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            default_api_key,
        })
    }

    /// Fetch current temperature and humidity for a city
    ///
    /// `api_key` overrides the key configured at start-up.
    pub async fn current(
        &self,
        city: &str,
        api_key: Option<&str>,
    ) -> Result<WeatherReading, WeatherError> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .or(self.default_api_key.as_deref())
            .ok_or(WeatherError::MissingApiKey)?;

        tracing::debug!(city = %city, "Querying OpenWeatherMap");

        let response = self
            .http_client
            .get(OPENWEATHER_URL)
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await
            .map_err(|e| WeatherError::NetworkError(e.to_string()))?;

        // Error payloads carry `cod`/`message`, so parse the body regardless of status
        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::NetworkError(e.to_string()))?;

        let reading = parse_weather_response(city, &body)?;
        tracing::info!(
            city = %city,
            temperature = reading.temperature,
            humidity = reading.humidity,
            "Weather lookup successful"
        );
        Ok(reading)
    }
}
