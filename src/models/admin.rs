// src/models/admin.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Usuário interno (equipe administrativa). Identificado pelos headers
/// x-user-id / x-user-email.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    #[schema(example = "Ana Souza")]
    pub name: String,
    #[schema(example = "ana@perfusolo.com.br")]
    pub email: String,
    #[schema(example = "administrador")]
    pub role: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Configurações da empresa (linha única), usadas no cabeçalho dos PDFs.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub id: i32,
    #[schema(example = "PerfuSolo Fundações")]
    pub company_name: Option<String>,
    #[schema(example = "12.345.678/0001-90")]
    pub document_number: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub pix_key: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub user_email: Option<String>,
    #[schema(example = "create")]
    pub action: String,
    #[schema(example = "job")]
    pub entity: String,
    pub entity_id: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub detail: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub id: Uuid,
    #[schema(example = "instagram")]
    pub platform: String,
    #[schema(example = "https://instagram.com/perfusolo")]
    pub url: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
