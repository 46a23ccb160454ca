use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::classifier::{Classifier, ModelCatalog, ModelId};
use super::domain::ClassifiedStatement;
use super::report::{report_file_name, ReportFormat};
use super::service::{AnalysisError, AnalysisService};
use crate::error::analysis_status;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    #[serde(default)]
    pub model_id: Option<ModelId>,
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub records: Vec<ClassifiedStatement>,
}

/// Router builder exposing model listing, analysis, and report downloads.
pub fn analysis_router<C, M>(service: Arc<AnalysisService<C, M>>) -> Router
where
    C: Classifier + 'static,
    M: ModelCatalog + 'static,
{
    Router::new()
        .route("/api/v1/models", get(models_handler::<C, M>))
        .route("/api/v1/analyses", post(analyze_handler::<C, M>))
        .route("/api/v1/reports/:format", post(report_handler::<C, M>))
        .with_state(service)
}

pub(crate) async fn models_handler<C, M>(
    State(service): State<Arc<AnalysisService<C, M>>>,
) -> Response
where
    C: Classifier + 'static,
    M: ModelCatalog + 'static,
{
    match service.available_models().await {
        Ok(models) => {
            let payload: Vec<_> = models
                .iter()
                .map(|model| {
                    json!({
                        "id": model.id,
                        "name": model.name,
                        "provider": model.provider,
                        "label": model.display_label(),
                    })
                })
                .collect();
            (StatusCode::OK, axum::Json(json!({ "models": payload }))).into_response()
        }
        Err(error) => error_response(AnalysisError::ModelUnavailable(error)),
    }
}

pub(crate) async fn analyze_handler<C, M>(
    State(service): State<Arc<AnalysisService<C, M>>>,
    axum::Json(request): axum::Json<AnalyzeRequest>,
) -> Response
where
    C: Classifier + 'static,
    M: ModelCatalog + 'static,
{
    let analysis = match service
        .analyze(&request.text, request.model_id.as_ref())
        .await
    {
        Ok(analysis) => analysis,
        Err(error) => return error_response(error),
    };

    match service.view(&analysis) {
        Ok(view) => {
            let downloads: serde_json::Map<String, serde_json::Value> = ReportFormat::ordered()
                .into_iter()
                .map(|format| (format.extension().to_string(), json!(analysis.file_name(format))))
                .collect();
            let payload = json!({
                "model": analysis.model,
                "generated_at": analysis.generated_at,
                "submitted": analysis.submitted,
                "summary": analysis.summary,
                "downloads": downloads,
                "view": view,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn report_handler<C, M>(
    State(service): State<Arc<AnalysisService<C, M>>>,
    Path(format): Path<String>,
    axum::Json(request): axum::Json<RenderRequest>,
) -> Response
where
    C: Classifier + 'static,
    M: ModelCatalog + 'static,
{
    let format = match format.parse::<ReportFormat>() {
        Ok(format) => format,
        Err(error) => return error_response(error.into()),
    };

    match service.render_records(&request.records, format) {
        Ok(report) => {
            let file_name = report_file_name(Local::now().naive_local(), format);
            let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
                .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, HeaderValue::from_static(report.content_type())),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                report.bytes,
            )
                .into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: AnalysisError) -> Response {
    let status = analysis_status(&error);
    if status.is_server_error() {
        warn!(error = %error, status = status.as_u16(), "analysis request failed");
    }
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
