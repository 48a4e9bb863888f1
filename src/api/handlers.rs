use axum::{
    extract::State,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use serde::Serialize;
use serde_json::json;
use std::any::Any;
use std::sync::Arc;
use tracing::{error, info};

use super::error::ApiError;
use super::state::AppState;
use crate::analytics::Sourced;
use crate::prediction::PredictionResult;

pub const DATA_SOURCE_HEADER: HeaderName = HeaderName::from_static("x-data-source");
pub const FALLBACK_REASON_HEADER: HeaderName = HeaderName::from_static("x-fallback-reason");

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub message: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        message: "Quantum ML API is running".to_string(),
    })
}

pub async fn predict(State(state): State<Arc<AppState>>) -> Result<Json<PredictionResult>, ApiError> {
    info!("🤖 Running Quantum ML prediction...");
    let prediction = state.service.predict().await?;
    info!(
        "📈 Prediction: {:?} ({:.1}% via {})",
        prediction.direction, prediction.confidence, prediction.model
    );
    Ok(Json(prediction))
}

pub async fn dashboard_data(State(state): State<Arc<AppState>>) -> Response {
    let sourced = state.service.dashboard_data().await;
    sourced_response(sourced, state.expose_data_source)
}

pub async fn models(State(state): State<Arc<AppState>>) -> Response {
    let sourced = state.service.model_metrics().await;
    sourced_response(sourced, state.expose_data_source)
}

/// Always 200; the body never says whether the data is live.
fn sourced_response<T: Serialize>(sourced: Sourced<T>, expose: bool) -> Response {
    let mut response = Json(sourced.data()).into_response();
    if expose {
        let headers = response.headers_mut();
        headers.insert(DATA_SOURCE_HEADER, HeaderValue::from_static(sourced.source()));
        if let Some(reason) = sourced.fallback_reason() {
            headers.insert(FALLBACK_REASON_HEADER, HeaderValue::from_static(reason.kind()));
        }
    }
    response
}

/// JSON body for a handler that panicked.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("💥 Handler panicked: {}", message);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "Internal server error",
            "message": message,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{FallbackCatalog, Sourced};
    use crate::error::InvocationError;

    #[test]
    fn test_panic_response_is_500() {
        let response = panic_response(Box::new("index out of bounds"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = panic_response(Box::new(42u8));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_health_body_fields() {
        let Json(body) = health().await;
        let value = serde_json::to_value(&body).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 3);
        assert_eq!(value["status"], "healthy");
        assert_eq!(value["message"], "Quantum ML API is running");
    }

    #[test]
    fn test_sourced_response_headers() {
        let fallback = Sourced::Fallback(
            FallbackCatalog::default().models,
            InvocationError::TimeoutExceeded { timeout_ms: 120000 },
        );
        let response = sourced_response(fallback, true);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[DATA_SOURCE_HEADER], "fallback");
        assert_eq!(response.headers()[FALLBACK_REASON_HEADER], "timeout_exceeded");

        let live = Sourced::Live(FallbackCatalog::default().dashboard);
        let response = sourced_response(live, false);
        assert!(response.headers().get(DATA_SOURCE_HEADER).is_none());
    }
}
