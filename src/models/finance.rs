// src/models/finance.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "cash_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "snake_case")]
pub enum CashKind {
    Entrada,
    Saida,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "cashier_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "snake_case")]
pub enum CashierStatus {
    Aberto,
    Fechado,
}

// --- Structs ---

/// Sessão de caixa. No máximo uma aberta por vez (índice parcial único).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cashier {
    pub id: Uuid,
    pub opened_by: Option<Uuid>,
    #[schema(example = "Ana Souza")]
    pub opened_by_name: String,
    #[schema(example = 200.0)]
    pub opening_balance: Decimal,
    pub closing_balance: Option<Decimal>,
    pub status: CashierStatus,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

/// Lançamento de partida única preso a uma sessão de caixa.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CashTransaction {
    pub id: Uuid,
    pub cashier_id: Uuid,
    pub kind: CashKind,
    #[schema(example = 1500.0)]
    pub amount: Decimal,
    #[schema(example = "Recebimento OS #1042")]
    pub description: String,
    /// Presente quando o lançamento é o recebimento de uma OS.
    pub job_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CashierSummary {
    #[serde(flatten)]
    pub cashier: Cashier,
    pub total_entradas: Decimal,
    pub total_saidas: Decimal,
    /// opening_balance + entradas - saídas.
    pub balance: Decimal,
    pub transaction_count: i64,
}
