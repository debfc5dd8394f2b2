// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Linha da matriz de preços: (diâmetro, solo, acesso) -> preço e tempo por metro.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: Uuid,
    #[schema(example = 300)]
    pub diameter_mm: i32,
    #[schema(example = "argila")]
    pub soil_type: String,
    #[schema(example = "normal")]
    pub access_difficulty: String,
    #[schema(example = 95.0)]
    pub price_per_meter: Decimal,
    #[schema(example = 12.0)]
    pub minutes_per_meter: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
