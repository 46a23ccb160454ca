use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::analysis::{
    AnalysisError, ClassificationServiceError, ImportError, ModelUnavailableError, RenderError,
};
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
    Import(ImportError),
}

impl AppError {
    /// HTTP status a client should see for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Analysis(err) => analysis_status(err),
            AppError::Import(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Status mapping shared by the library router and [`AppError`].
pub fn analysis_status(err: &AnalysisError) -> StatusCode {
    match err {
        AnalysisError::Input(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AnalysisError::Classification(ClassificationServiceError::Timeout(_)) => {
            StatusCode::GATEWAY_TIMEOUT
        }
        AnalysisError::Classification(_) => StatusCode::BAD_GATEWAY,
        AnalysisError::ModelUnavailable(ModelUnavailableError::UnknownModel(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AnalysisError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        AnalysisError::Render(RenderError::UnknownFormat(_)) => StatusCode::NOT_FOUND,
        AnalysisError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Analysis(err) => write!(f, "analysis error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
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
            AppError::Import(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
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

impl From<ImportError> for AppError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<ClassificationServiceError> for AppError {
    fn from(value: ClassificationServiceError) -> Self {
        Self::Analysis(AnalysisError::Classification(value))
    }
}

impl From<ModelUnavailableError> for AppError {
    fn from(value: ModelUnavailableError) -> Self {
        Self::Analysis(AnalysisError::ModelUnavailable(value))
    }
}

impl From<RenderError> for AppError {
    fn from(value: RenderError) -> Self {
        Self::Analysis(AnalysisError::Render(value))
    }
}
