//! Document management routes, forwarded to the document-ingestion service.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use serde::Deserialize;

use crate::error::{GatewayError, GatewayResult};
use crate::http::envelope::envelope_or_not_found;
use crate::http::server::AppState;
use crate::proxy::context::RequestContext;
use crate::proxy::dispatcher::ProxyRequest;
use crate::proxy::stream;
use crate::registry::DOCUMENT_INGESTION;

use super::forward_enveloped;

#[derive(Debug, Deserialize)]
pub struct ListDocumentsQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub document_type: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

/// `POST /api/v1/documents` — upload a document for ingestion.
///
/// The multipart body is rebuilt for the backend: the `file` part keeps its
/// filename and content type, an optional `metadata` part is forwarded as
/// text.
pub async fn upload_document(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    mut multipart: Multipart,
) -> GatewayResult<Response> {
    let mut form = reqwest::multipart::Form::new();
    let mut has_file = false;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        GatewayError::Validation(format!("malformed multipart body: {e}"))
    })? {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(|e| {
                    GatewayError::Validation(format!("failed reading upload: {e}"))
                })?;

                let mut part =
                    reqwest::multipart::Part::bytes(data.to_vec()).file_name(filename);
                if let Some(content_type) = content_type {
                    part = part.mime_str(&content_type).map_err(|e| {
                        GatewayError::Validation(format!("invalid content type: {e}"))
                    })?;
                }
                form = form.part("file", part);
                has_file = true;
            }
            Some("metadata") => {
                let text = field.text().await.map_err(|e| {
                    GatewayError::Validation(format!("failed reading metadata: {e}"))
                })?;
                form = form.text("metadata", text);
            }
            _ => {}
        }
    }

    if !has_file {
        return Err(GatewayError::Validation(
            "multipart field 'file' is required".to_string(),
        ));
    }

    let upstream = state
        .dispatcher
        .dispatch(
            &ctx,
            DOCUMENT_INGESTION,
            ProxyRequest::post("/api/v1/documents").multipart(form),
        )
        .await?;
    forward_enveloped(DOCUMENT_INGESTION, upstream, StatusCode::CREATED).await
}

/// `GET /api/v1/documents/{document_id}` — document details.
pub async fn get_document(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(document_id): Path<String>,
) -> GatewayResult<Response> {
    let upstream = state
        .dispatcher
        .dispatch(
            &ctx,
            DOCUMENT_INGESTION,
            ProxyRequest::get(format!("/api/v1/documents/{document_id}")),
        )
        .await?;

    if upstream.status() == StatusCode::NOT_FOUND {
        return envelope_or_not_found(None, "Document", &document_id)
            .map(IntoResponse::into_response);
    }
    forward_enveloped(DOCUMENT_INGESTION, upstream, StatusCode::OK).await
}

/// `GET /api/v1/documents` — list documents with pagination passthrough.
pub async fn list_documents(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(query): Query<ListDocumentsQuery>,
) -> GatewayResult<Response> {
    let mut request = ProxyRequest::get("/api/v1/documents")
        .query("page", query.page.to_string())
        .query("limit", query.limit.to_string());
    if let Some(status) = query.status {
        request = request.query("status", status);
    }
    if let Some(document_type) = query.document_type {
        request = request.query("type", document_type);
    }

    let upstream = state
        .dispatcher
        .dispatch(&ctx, DOCUMENT_INGESTION, request)
        .await?;
    forward_enveloped(DOCUMENT_INGESTION, upstream, StatusCode::OK).await
}

/// `GET /api/v1/documents/{document_id}/download` — streamed file retrieval.
///
/// Inbound headers (Accept, Range, ...) are forwarded so the backend can
/// shape the stream; the response body is relayed chunk by chunk.
pub async fn download_document(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(document_id): Path<String>,
    headers: HeaderMap,
) -> GatewayResult<Response> {
    let upstream = state
        .dispatcher
        .dispatch(
            &ctx,
            DOCUMENT_INGESTION,
            ProxyRequest::get(format!("/api/v1/documents/{document_id}/download"))
                .headers(headers),
        )
        .await?;

    if upstream.status() == StatusCode::NOT_FOUND {
        return Err(GatewayError::NotFound {
            resource: "Document".to_string(),
            id: document_id,
        });
    }
    Ok(stream::relay(upstream))
}
