use axum::extract::rejection::JsonRejection;
use axum::response::Json;
use formdiff_classify::{Classifier, Report};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ServerError, ServerResult};

/// Body of `POST /compare`.
#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    #[serde(alias = "originalStructure")]
    pub original_structure: Value,
    #[serde(alias = "modifiedStructure")]
    pub modified_structure: Value,
}

/// Classify the differences between the two posted documents.
///
/// Every request gets its own classification pass on the blocking pool;
/// nothing is shared between requests. Body rejections answer with the same
/// `{"error": ...}` shape as classification failures.
pub async fn compare_handler(
    payload: Result<Json<CompareRequest>, JsonRejection>,
) -> ServerResult<Json<Report>> {
    let Json(request) = payload?;
    let report = tokio::task::spawn_blocking(move || {
        Classifier::new().classify_values(request.original_structure, request.modified_structure)
    })
    .await
    .map_err(|e| ServerError::Internal(e.to_string()))??;
    Ok(Json(report))
}

pub async fn index_handler() -> &'static str {
    "formdiff is running. POST two form definitions to /compare."
}

/// Health check handler.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info_handler() -> Json<Value> {
    Json(json!({
        "name": "formdiff-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
