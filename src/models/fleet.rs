// src/models/fleet.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub id: Uuid,
    #[schema(example = "Perfuratriz CZM EM600")]
    pub name: String,
    pub model: Option<String>,
    pub plate: Option<String>,
    #[schema(example = "disponivel")]
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: Uuid,
    #[schema(example = "Trado helicoidal Ø400")]
    pub name: String,
    pub serial_number: Option<String>,
    #[schema(example = "disponivel")]
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
    pub id: Uuid,
    pub machine_id: Uuid,
    #[schema(value_type = String, format = Date)]
    pub performed_at: NaiveDate,
    #[schema(example = 850.0)]
    pub cost: Decimal,
    #[schema(example = "Troca de óleo hidráulico e filtros")]
    pub description: String,
    pub created_at: DateTime<Utc>,
}
