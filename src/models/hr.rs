// src/models/hr.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    #[schema(example = "Carlos Pereira")]
    pub name: String,
    #[schema(example = "operador de perfuratriz")]
    pub role: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[schema(example = "ativo")]
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Equipe de campo. Os nomes dos membros são denormalizados na gravação para
/// a listagem não precisar de join.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: Uuid,
    #[schema(example = "Equipe Norte")]
    pub name: String,
    pub machine_id: Option<Uuid>,
    pub member_ids: Vec<Uuid>,
    pub member_names: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
