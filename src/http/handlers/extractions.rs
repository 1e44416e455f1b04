//! Entity extraction routes, forwarded to the entity-extraction service.

use axum::{
    extract::{Path, State},
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
use crate::registry::ENTITY_EXTRACTION;

use super::forward_enveloped;

#[derive(Debug, Deserialize)]
pub struct ExtractEntitiesRequest {
    pub document_id: String,
    #[serde(default)]
    pub options: Option<Value>,
}

/// `POST /api/v1/extractions` — submit a document for entity extraction.
pub async fn extract_entities(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<ExtractEntitiesRequest>,
) -> GatewayResult<Response> {
    let mut payload = json!({ "document_id": body.document_id });
    if let Some(options) = body.options {
        payload["options"] = options;
    }

    let upstream = state
        .dispatcher
        .dispatch(
            &ctx,
            ENTITY_EXTRACTION,
            ProxyRequest::post("/api/v1/extract").json(payload),
        )
        .await?;
    forward_enveloped(ENTITY_EXTRACTION, upstream, StatusCode::ACCEPTED).await
}

/// `GET /api/v1/extractions/{job_id}` — extraction job result.
pub async fn get_extraction_result(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(job_id): Path<String>,
) -> GatewayResult<Response> {
    let upstream = state
        .dispatcher
        .dispatch(
            &ctx,
            ENTITY_EXTRACTION,
            ProxyRequest::get(format!("/api/v1/extract/{job_id}")),
        )
        .await?;

    if upstream.status() == StatusCode::NOT_FOUND {
        return envelope_or_not_found(None, "Extraction job", &job_id)
            .map(IntoResponse::into_response);
    }
    forward_enveloped(ENTITY_EXTRACTION, upstream, StatusCode::OK).await
}

/// `GET /api/v1/extractions/entity-types` — supported entity types.
pub async fn entity_types(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> GatewayResult<Response> {
    let upstream = state
        .dispatcher
        .dispatch(
            &ctx,
            ENTITY_EXTRACTION,
            ProxyRequest::get("/api/v1/entity-types"),
        )
        .await?;
    forward_enveloped(ENTITY_EXTRACTION, upstream, StatusCode::OK).await
}
