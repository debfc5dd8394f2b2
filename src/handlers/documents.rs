// src/handlers/documents.rs

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentStaff,
    models::documents::{DocumentMeta, SignedUrl},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadQuery {
    pub category: String,
    pub owner_type: Option<String>,
    pub owner_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsQuery {
    pub category: Option<String>,
    pub owner_type: Option<String>,
    pub owner_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadQuery {
    pub expires: i64,
    pub sig: String,
}

// POST /api/documents (multipart, campo "file")
#[utoipa::path(
    post,
    path = "/api/documents",
    tag = "Documentos",
    params(
        ("category" = String, Query),
        ("ownerType" = Option<String>, Query),
        ("ownerId" = Option<Uuid>, Query)
    ),
    responses((status = 201, description = "Documento enviado", body = DocumentMeta))
)]
pub async fn upload_document(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BusinessRule(format!("Upload inválido: {}", e)))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or("arquivo").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BusinessRule(format!("Upload inválido: {}", e)))?
                .to_vec();
            file = Some((file_name, content_type, bytes));
        }
    }

    let (file_name, content_type, bytes) = file
        .ok_or_else(|| AppError::BusinessRule("Campo 'file' ausente no upload.".to_string()))?;

    let meta = app_state
        .documents_service
        .upload(
            &query.category,
            query.owner_type.as_deref(),
            query.owner_id,
            &file_name,
            &content_type,
            bytes,
            Some(user.id),
        )
        .await?;

    app_state
        .audit
        .record(Some(&user), "upload", "document", meta.id, None);
    Ok((StatusCode::CREATED, Json(meta)))
}

// GET /api/documents
#[utoipa::path(
    get,
    path = "/api/documents",
    tag = "Documentos",
    params(
        ("category" = Option<String>, Query),
        ("ownerType" = Option<String>, Query),
        ("ownerId" = Option<Uuid>, Query)
    ),
    responses((status = 200, description = "Documentos", body = Vec<DocumentMeta>))
)]
pub async fn list_documents(
    State(app_state): State<AppState>,
    Query(query): Query<ListDocumentsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let documents = app_state
        .documents_service
        .list(query.category.as_deref(), query.owner_type.as_deref(), query.owner_id)
        .await?;
    Ok((StatusCode::OK, Json(documents)))
}

// GET /api/documents/{id}
#[utoipa::path(
    get,
    path = "/api/documents/{id}",
    tag = "Documentos",
    params(("id" = Uuid, Path)),
    responses((status = 200, description = "Metadados do documento", body = DocumentMeta))
)]
pub async fn get_document(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let meta = app_state.documents_service.get(id).await?;
    Ok((StatusCode::OK, Json(meta)))
}

// GET /api/documents/{id}/url
#[utoipa::path(
    get,
    path = "/api/documents/{id}/url",
    tag = "Documentos",
    params(("id" = Uuid, Path)),
    responses((status = 200, description = "Link de download assinado", body = SignedUrl))
)]
pub async fn document_url(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let signed = app_state.documents_service.signed_url(id).await?;
    Ok((StatusCode::OK, Json(signed)))
}

// GET /api/documents/{id}/download (público, exige assinatura válida)
#[utoipa::path(
    get,
    path = "/api/documents/{id}/download",
    tag = "Documentos",
    params(("id" = Uuid, Path), ("expires" = i64, Query), ("sig" = String, Query)),
    responses(
        (status = 200, description = "Conteúdo do documento"),
        (status = 401, description = "Assinatura inválida ou expirada")
    )
)]
pub async fn download_document(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DownloadQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (meta, bytes) = app_state
        .documents_service
        .download(id, query.expires, &query.sig)
        .await?;

    let headers = [
        (header::CONTENT_TYPE, meta.content_type.clone()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", meta.file_name),
        ),
    ];
    Ok((headers, bytes))
}

// DELETE /api/documents/{id}
#[utoipa::path(
    delete,
    path = "/api/documents/{id}",
    tag = "Documentos",
    params(("id" = Uuid, Path)),
    responses((status = 204, description = "Documento removido"))
)]
pub async fn delete_document(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.documents_service.delete(id).await?;
    app_state.audit.record(Some(&user), "delete", "document", id, None);
    Ok(StatusCode::NO_CONTENT)
}
