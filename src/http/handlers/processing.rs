//! Document processing routes, forwarded to the document-processing service.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::GatewayResult;
use crate::http::envelope::envelope_or_not_found;
use crate::http::server::AppState;
use crate::proxy::context::RequestContext;
use crate::proxy::dispatcher::ProxyRequest;
use crate::registry::DOCUMENT_PROCESSING;

use super::forward_enveloped;

#[derive(Debug, Deserialize)]
pub struct ProcessDocumentRequest {
    pub document_id: String,
    #[serde(default)]
    pub options: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct ListJobsQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub status: Option<String>,
    pub document_id: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

/// `POST /api/v1/document-processing` — submit a document for processing.
pub async fn process_document(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<ProcessDocumentRequest>,
) -> GatewayResult<Response> {
    let mut payload = json!({ "document_id": body.document_id });
    if let Some(options) = body.options {
        payload["options"] = options;
    }

    let upstream = state
        .dispatcher
        .dispatch(
            &ctx,
            DOCUMENT_PROCESSING,
            ProxyRequest::post("/api/v1/process").json(payload),
        )
        .await?;
    forward_enveloped(DOCUMENT_PROCESSING, upstream, StatusCode::ACCEPTED).await
}

/// `GET /api/v1/document-processing/{job_id}` — processing job status.
pub async fn get_processing_status(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(job_id): Path<String>,
) -> GatewayResult<Response> {
    let upstream = state
        .dispatcher
        .dispatch(
            &ctx,
            DOCUMENT_PROCESSING,
            ProxyRequest::get(format!("/api/v1/process/{job_id}")),
        )
        .await?;

    if upstream.status() == StatusCode::NOT_FOUND {
        return envelope_or_not_found(None, "Processing job", &job_id)
            .map(IntoResponse::into_response);
    }
    forward_enveloped(DOCUMENT_PROCESSING, upstream, StatusCode::OK).await
}

/// `GET /api/v1/document-processing` — list processing jobs.
pub async fn list_processing_jobs(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(query): Query<ListJobsQuery>,
) -> GatewayResult<Response> {
    let mut request = ProxyRequest::get("/api/v1/process")
        .query("page", query.page.to_string())
        .query("limit", query.limit.to_string());
    if let Some(status) = query.status {
        request = request.query("status", status);
    }
    if let Some(document_id) = query.document_id {
        request = request.query("document_id", document_id);
    }

    let upstream = state
        .dispatcher
        .dispatch(&ctx, DOCUMENT_PROCESSING, request)
        .await?;
    forward_enveloped(DOCUMENT_PROCESSING, upstream, StatusCode::OK).await
}
