//! Workflow routes, forwarded to the task-orchestration service.

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
use crate::registry::TASK_ORCHESTRATION;

use super::forward_enveloped;

#[derive(Debug, Deserialize)]
pub struct CreateWorkflowRequest {
    pub document_id: String,
    pub workflow_type: String,
    #[serde(default)]
    pub config: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct ListWorkflowsQuery {
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

/// `POST /api/v1/workflows` — create a workflow for a document.
pub async fn create_workflow(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<CreateWorkflowRequest>,
) -> GatewayResult<Response> {
    let mut payload = json!({
        "document_id": body.document_id,
        "workflow_type": body.workflow_type,
    });
    if let Some(config) = body.config {
        payload["config"] = config;
    }

    let upstream = state
        .dispatcher
        .dispatch(
            &ctx,
            TASK_ORCHESTRATION,
            ProxyRequest::post("/api/v1/workflows").json(payload),
        )
        .await?;
    forward_enveloped(TASK_ORCHESTRATION, upstream, StatusCode::CREATED).await
}

/// `GET /api/v1/workflows/{workflow_id}` — workflow details.
pub async fn get_workflow(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(workflow_id): Path<String>,
) -> GatewayResult<Response> {
    let upstream = state
        .dispatcher
        .dispatch(
            &ctx,
            TASK_ORCHESTRATION,
            ProxyRequest::get(format!("/api/v1/workflows/{workflow_id}")),
        )
        .await?;

    if upstream.status() == StatusCode::NOT_FOUND {
        return envelope_or_not_found(None, "Workflow", &workflow_id)
            .map(IntoResponse::into_response);
    }
    forward_enveloped(TASK_ORCHESTRATION, upstream, StatusCode::OK).await
}

/// `GET /api/v1/workflows` — list workflows.
pub async fn list_workflows(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(query): Query<ListWorkflowsQuery>,
) -> GatewayResult<Response> {
    let mut request = ProxyRequest::get("/api/v1/workflows")
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
        .dispatch(&ctx, TASK_ORCHESTRATION, request)
        .await?;
    forward_enveloped(TASK_ORCHESTRATION, upstream, StatusCode::OK).await
}

/// `GET /api/v1/workflows/types` — available workflow types.
pub async fn workflow_types(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> GatewayResult<Response> {
    let upstream = state
        .dispatcher
        .dispatch(
            &ctx,
            TASK_ORCHESTRATION,
            ProxyRequest::get("/api/v1/workflow-types"),
        )
        .await?;
    forward_enveloped(TASK_ORCHESTRATION, upstream, StatusCode::OK).await
}
