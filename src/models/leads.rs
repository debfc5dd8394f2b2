// src/models/leads.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{budgets::Budget, clients::Client};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "lead_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    Pendente,
    Convertido,
    Descartado,
}

/// Pedido de orçamento vindo do funil público do site.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrcamentoRequest {
    pub id: Uuid,
    #[schema(example = "João Batista")]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub doc_number: Option<String>,
    pub city: Option<String>,
    #[schema(example = "Preciso de 12 estacas para fundação de sobrado")]
    pub service_description: String,
    #[schema(example = "instagram")]
    pub source: Option<String>,
    pub status: LeadStatus,
    /// Preenchidos na conversão em Cliente + Orçamento.
    pub client_id: Option<Uuid>,
    pub budget_id: Option<Uuid>,
    pub converted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Resultado da conversão: o lead, o cliente (reaproveitado ou criado) e o
/// orçamento pendente gerado.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadConversion {
    pub request: OrcamentoRequest,
    pub client: Client,
    pub budget: Budget,
    /// true quando um cliente já cadastrado foi reaproveitado.
    pub client_reused: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingCount {
    pub pending: i64,
}
