// Axum API Server Module
//
// Purpose: REST API over the recommendation pipeline plus the weather side-channel

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::advisor::{CropAdvisor, Recommendation};
use crate::config::AdvisorConfig;
use crate::error::AdvisorError;
use crate::formatters::MarkdownFormatter;
use crate::profitability::FormattedProfitabilityRow;
use crate::sample::{RawInputs, FEATURE_RANGES};
use crate::weather::{WeatherClient, WeatherError};

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub advisor: Arc<CropAdvisor>,
    pub weather: Arc<WeatherClient>,
}

impl AppState {
    pub fn new(config: &AdvisorConfig) -> anyhow::Result<Self> {
        tracing::info!("Loading crop model from {:?}...", config.model_path);
        let advisor = CropAdvisor::from_config(config)?;
        tracing::info!("Model ready ({} crop classes)", advisor.class_labels().len());

        let weather = WeatherClient::new(config.weather_api_key.clone())?;
        if config.weather_api_key.is_none() {
            tracing::info!("No OPENWEATHER_API_KEY set; weather requests must pass api_key");
        }

        Ok(Self::from_parts(advisor, weather))
    }

    pub fn from_parts(advisor: CropAdvisor, weather: WeatherClient) -> Self {
        Self {
            advisor: Arc::new(advisor),
            weather: Arc::new(weather),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Form ranges/defaults and known crops
        .route("/api/inputs", get(get_inputs))

        // Recommendation pipeline
        .route("/api/recommend", post(recommend))

        // Weather side-channel
        .route("/api/weather", get(get_weather))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn get_inputs(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "inputs": FEATURE_RANGES,
        "defaults": RawInputs::default(),
        "crops": state.advisor.class_labels(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    /// "json" (default) or "markdown"
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
struct RecommendResponse {
    #[serde(flatten)]
    recommendation: Recommendation,
    profitability_table: Vec<FormattedProfitabilityRow>,
}

async fn recommend(
    State(state): State<AppState>,
    Query(query): Query<RecommendQuery>,
    body: Result<Json<RawInputs>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(inputs) = body?;
    let advisor = state.advisor.clone();

    // CPU-bound work: run in blocking thread pool
    let recommendation = tokio::task::spawn_blocking(move || advisor.recommend(&inputs))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    tracing::info!(
        "Recommended {:?} (profitability: {:?})",
        recommendation.ranking.crops().collect::<Vec<_>>(),
        recommendation.profitability_status
    );

    match query.format.as_deref() {
        Some("markdown") | Some("md") => Ok((
            [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
            MarkdownFormatter::format(&recommendation),
        )
            .into_response()),
        None | Some("json") => {
            let profitability_table = recommendation.formatted_profitability();
            Ok(Json(RecommendResponse {
                recommendation,
                profitability_table,
            })
            .into_response())
        }
        Some(other) => Err(AppError::BadRequest(format!("Unknown format '{}'", other))),
    }
}

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub city: String,
    pub api_key: Option<String>,
}

async fn get_weather(
    State(state): State<AppState>,
    Query(params): Query<WeatherQuery>,
) -> Result<Response, AppError> {
    let reading = state
        .weather
        .current(&params.city, params.api_key.as_deref())
        .await?;
    Ok(Json(reading).into_response())
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unprocessable(String),
    ServiceUnavailable(String),
    BadGateway(String),
    Internal(String),
}

impl From<AdvisorError> for AppError {
    fn from(err: AdvisorError) -> Self {
        match err {
            AdvisorError::InvalidInput { .. } | AdvisorError::ClassMismatch { .. } => {
                AppError::Unprocessable(err.to_string())
            }
            AdvisorError::ModelUnavailable(_) => AppError::ServiceUnavailable(err.to_string()),
            // Profitability failures are absorbed by the pipeline
            AdvisorError::DataUnavailable(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Unprocessable(rejection.body_text())
    }
}

impl From<WeatherError> for AppError {
    fn from(err: WeatherError) -> Self {
        match err {
            WeatherError::MissingApiKey => AppError::BadRequest(err.to_string()),
            _ => AppError::BadGateway(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        if status.is_server_error() {
            tracing::warn!("Request failed ({}): {}", status, message);
        }

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
