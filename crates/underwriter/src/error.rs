use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::analysis::AnalysisError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Analysis(AnalysisError),
    InputFile(serde_json::Error),
    Export(csv::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Analysis(err) => write!(f, "analysis error: {}", err),
            AppError::InputFile(err) => write!(f, "input file error: {}", err),
            AppError::Export(err) => write!(f, "export error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Analysis(err) => Some(err),
            AppError::InputFile(err) => Some(err),
            AppError::Export(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // The error taxonomy drives the status: validation rejects before any
        // collaborator call (400), missing configuration is this service's
        // fault (500), and collaborator transport or malformed-response
        // failures are upstream faults (502) the caller may retry.
        let (status, body) = match &self {
            AppError::Analysis(err) => match err {
                AnalysisError::MissingPropertyAddress | AnalysisError::MissingBuyerName => (
                    StatusCode::BAD_REQUEST,
                    json!({ "error": err.to_string() }),
                ),
                AnalysisError::NotConfigured => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "analysis backend not configured",
                        "details": "Set OPENAI_API_KEY in the service environment",
                    }),
                ),
                AnalysisError::Completion(source) => (
                    StatusCode::BAD_GATEWAY,
                    json!({
                        "error": "failed to generate property analysis",
                        "details": source.to_string(),
                    }),
                ),
                AnalysisError::Response(source) => (
                    StatusCode::BAD_GATEWAY,
                    json!({
                        "error": "failed to parse analysis response",
                        "details": source.to_string(),
                    }),
                ),
                AnalysisError::Encoding(source) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "failed to encode analysis request",
                        "details": source.to_string(),
                    }),
                ),
            },
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": other.to_string() }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<AnalysisError> for AppError {
    fn from(value: AnalysisError) -> Self {
        Self::Analysis(value)
    }
}

impl From<csv::Error> for AppError {
    fn from(value: csv::Error) -> Self {
        Self::Export(value)
    }
}
