// src/models/budgets.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::jobs::ServiceItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "budget_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    Pendente,
    Aprovado,
    Rejeitado,
    Convertido,
}

/// Dados prontos para gravação (nomes denormalizados, itens precificados).
#[derive(Debug, Clone)]
pub struct BudgetDraft {
    pub client_id: Uuid,
    pub client_name: String,
    pub team_id: Option<Uuid>,
    pub team_name: Option<String>,
    pub items: Vec<ServiceItem>,
    pub travel_distance_km: Option<Decimal>,
    pub travel_price: Option<Decimal>,
    pub travel_round_trip: bool,
    pub total: Decimal,
    pub valid_until: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: Uuid,
    #[schema(example = 307)]
    pub display_id: i32,
    pub client_id: Uuid,
    pub client_name: String,
    pub team_id: Option<Uuid>,
    pub team_name: Option<String>,
    #[schema(value_type = Vec<ServiceItem>)]
    pub items: Json<Vec<ServiceItem>>,
    pub travel_distance_km: Option<Decimal>,
    pub travel_price: Option<Decimal>,
    pub travel_round_trip: bool,
    pub total: Decimal,
    pub status: BudgetStatus,
    #[schema(value_type = Option<String>, format = Date)]
    pub valid_until: Option<NaiveDate>,
    pub rejection_reason: Option<String>,
    /// Preenchido quando o orçamento vira OS.
    pub converted_job_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
