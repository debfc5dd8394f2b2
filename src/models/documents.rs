// src/models/documents.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Metadados de um arquivo guardado no bucket externo.
/// A chave segue o padrão `categoria/{id}/{timestamp}_{nome}`.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    pub id: Uuid,
    #[schema(example = "orcamentos")]
    pub category: String,
    #[schema(example = "client")]
    pub owner_type: Option<String>,
    pub owner_id: Option<Uuid>,
    #[schema(example = "contrato.pdf")]
    pub file_name: String,
    #[schema(example = "application/pdf")]
    pub content_type: String,
    pub size_bytes: i64,
    pub storage_key: String,
    pub uploaded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Link de download assinado com prazo de validade.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrl {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}
