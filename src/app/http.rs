use crate::core::service::PredictionService;
use crate::domain::model::{EmployeeRecord, SalaryPrediction};
use crate::utils::error::PredictorError;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

const INDEX_HTML: &str = include_str!("../../templates/index.html");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub success: bool,
    #[serde(flatten)]
    pub prediction: SalaryPrediction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_status: String,
}

/// Failure of a `/predict` call. Missing fields are the caller's fault
/// (400); everything else is reported as 500 with the message unchanged.
#[derive(Debug)]
pub enum ApiError {
    Rejected(String),
    Predictor(PredictorError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Predictor(PredictorError::MissingFields { .. }) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Rejected(message) => message.clone(),
            Self::Predictor(e) => e.to_string(),
        }
    }
}

impl From<PredictorError> for ApiError {
    fn from(e: PredictorError) -> Self {
        Self::Predictor(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            success: false,
            error: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn create_router(service: Arc<PredictionService>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict))
        .route("/health", get(health))
        .with_state(service)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn predict(
    State(service): State<Arc<PredictionService>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let result = payload
        .map_err(|rejection| ApiError::Rejected(rejection.body_text()))
        .and_then(|Json(body)| EmployeeRecord::from_json(&body).map_err(ApiError::from))
        .and_then(|record| service.predict(&record).map_err(ApiError::from));

    match result {
        Ok(value) => Ok(Json(PredictResponse {
            success: true,
            prediction: SalaryPrediction::from_value(value),
        })),
        Err(e) => {
            tracing::warn!(status = e.status().as_u16(), "Prediction request failed: {}", e.message());
            Err(e)
        }
    }
}

async fn health(State(service): State<Arc<PredictionService>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_status: service.model_status().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let missing = ApiError::from(PredictorError::MissingFields { fields: vec![] });
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(PredictorError::ModelNotLoaded).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Rejected("Expected request with `Content-Type: application/json`".to_string())
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_predict_response_shape() {
        let response = PredictResponse {
            success: true,
            prediction: SalaryPrediction::from_value(85432.1),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["predicted_salary"], 85432.1);
        assert_eq!(json["formatted_salary"], "$85,432.10");
    }
}
