// src/models/travel.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Faixa de distância do preço de deslocamento. `up_to_km` nulo marca a faixa
/// aberta (qualquer distância).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TravelRule {
    pub id: Uuid,
    /// Ordem de avaliação: a primeira faixa que cobre a distância ganha.
    #[schema(example = 2)]
    pub rule_order: i32,
    #[schema(example = 60.0)]
    pub up_to_km: Option<Decimal>,
    #[schema(example = 150.0)]
    pub price: Decimal,
    pub round_trip: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistanceResult {
    pub origin: String,
    pub destination: String,
    #[schema(example = 42.7)]
    pub distance_km: Decimal,
    #[schema(example = 55)]
    pub duration_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TravelQuote {
    pub distance_km: Decimal,
    pub price: Decimal,
    pub round_trip: bool,
    /// Regra que resolveu o preço.
    pub rule_id: Uuid,
}

/// Captura de localização por token curto (expira).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationCapture {
    pub id: Uuid,
    pub token: String,
    pub label: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub captured_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
