use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::json;
use tracing::error;

use super::repository::ResponseRepository;
use super::service::{SurveyService, SurveyServiceError};
use super::submission::RawSubmission;

const STORAGE_UNAVAILABLE: &str = "survey results are temporarily unavailable";

/// Router builder exposing the survey form, results, statistics, and export endpoints.
pub fn survey_router<R>(service: Arc<SurveyService<R>>) -> Router
where
    R: ResponseRepository + 'static,
{
    Router::new()
        .route("/api/v1/survey/questions", get(questions_handler::<R>))
        .route("/api/v1/survey/submissions", post(submit_handler::<R>))
        .route("/api/v1/survey/results", get(results_handler::<R>))
        .route("/api/v1/survey/statistics", get(statistics_handler::<R>))
        .route("/api/v1/survey/export", get(export_handler::<R>))
        .with_state(service)
}

pub(crate) async fn questions_handler<R>(
    State(service): State<Arc<SurveyService<R>>>,
) -> Response
where
    R: ResponseRepository + 'static,
{
    let questions: Vec<_> = service
        .questions()
        .iter()
        .map(|question| {
            json!({
                "index": question.index,
                "field": super::submission::answer_field(question.index),
                "label": question.label(),
                "text": question.text,
                "polarity": question.polarity,
            })
        })
        .collect();
    (StatusCode::OK, Json(json!({ "questions": questions }))).into_response()
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<SurveyService<R>>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response
where
    R: ResponseRepository + 'static,
{
    let raw = RawSubmission::from_form(&form);
    match off_runtime(move || service.submit(raw)).await {
        Ok(receipt) => (StatusCode::CREATED, Json(receipt)).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn results_handler<R>(
    State(service): State<Arc<SurveyService<R>>>,
) -> Response
where
    R: ResponseRepository + 'static,
{
    match off_runtime(move || service.results()).await {
        Ok(results) => (StatusCode::OK, Json(json!({ "results": results }))).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn statistics_handler<R>(
    State(service): State<Arc<SurveyService<R>>>,
) -> Response
where
    R: ResponseRepository + 'static,
{
    match off_runtime(move || service.statistics()).await {
        Ok(statistics) => (StatusCode::OK, Json(statistics)).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn export_handler<R>(
    State(service): State<Arc<SurveyService<R>>>,
) -> Response
where
    R: ResponseRepository + 'static,
{
    match off_runtime(move || service.export_csv()).await {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"sus_results.csv\"",
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(response) => response,
    }
}

/// Runs a service call on the blocking pool; the file-backed repository does
/// synchronous disk I/O.
async fn off_runtime<T, F>(call: F) -> Result<T, Response>
where
    F: FnOnce() -> Result<T, SurveyServiceError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(error_response(err)),
        Err(join_error) => {
            error!(error = %join_error, "survey task did not complete");
            let payload = json!({ "error": "internal error" });
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response())
        }
    }
}

fn error_response(err: SurveyServiceError) -> Response {
    match err {
        SurveyServiceError::Validation { reason, nickname } => {
            let payload = json!({
                "error": reason.to_string(),
                "nickname": nickname,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        SurveyServiceError::Storage(source) => {
            error!(error = %source, "survey storage unavailable");
            let payload = json!({ "error": STORAGE_UNAVAILABLE });
            (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
        }
        other => {
            error!(error = %other, "survey request failed");
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
