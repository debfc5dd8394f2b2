// src/models/jobs.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "job_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pendente,
    EmExecucao,
    Concluida,
    Cancelada,
}

impl JobStatus {
    /// Transições permitidas: pendente -> em_execucao -> concluida,
    /// com cancelamento possível enquanto a OS não terminou.
    pub fn can_transition(self, to: JobStatus) -> bool {
        use JobStatus::*;
        matches!(
            (self, to),
            (Pendente, EmExecucao) | (EmExecucao, Concluida) | (Pendente, Cancelada) | (EmExecucao, Cancelada)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Concluida | JobStatus::Cancelada)
    }
}

/// Item de serviço com o snapshot de preço congelado no momento da emissão.
/// Compartilhado entre Orçamento e OS (a conversão copia o array inteiro).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceItem {
    #[schema(example = "Estaca escavada Ø300")]
    pub description: String,
    #[schema(example = 300)]
    pub diameter_mm: i32,
    #[schema(example = "argila")]
    pub soil_type: String,
    #[schema(example = "normal")]
    pub access_difficulty: String,
    /// Quantidade de estacas.
    #[schema(example = 8)]
    pub quantity: Decimal,
    /// Profundidade de cada estaca, em metros.
    #[schema(example = 6)]
    pub depth_meters: Decimal,
    /// Preço por metro perfurado (snapshot do catálogo).
    #[schema(example = 95.0)]
    pub unit_price: Decimal,
    #[schema(example = 0.0)]
    pub discount: Decimal,
    /// quantity * depth * unit_price - discount, congelado na emissão.
    #[schema(example = 4560.0)]
    pub final_value: Decimal,
    /// Minutos de execução por metro (snapshot do catálogo).
    #[schema(example = 12.0)]
    pub minutes_per_meter: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    #[schema(example = 1042)]
    pub display_id: i32,
    pub client_id: Uuid,
    /// Denormalizado do cadastro do cliente na criação.
    pub client_name: String,
    pub team_id: Option<Uuid>,
    pub team_name: Option<String>,
    pub budget_id: Option<Uuid>,
    #[schema(value_type = Vec<ServiceItem>)]
    pub items: Json<Vec<ServiceItem>>,
    pub travel_distance_km: Option<Decimal>,
    pub travel_price: Option<Decimal>,
    pub travel_round_trip: bool,
    pub total: Decimal,
    pub status: JobStatus,
    pub scheduled_start: Option<DateTime<Utc>>,
    pub estimated_minutes: Option<i32>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub cash_transaction_id: Option<Uuid>,
    pub paid_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Item como chega da API: sem snapshot de preço. O service resolve o
/// catálogo e congela os valores antes de gravar.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceItemInput {
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,
    #[validate(range(min = 1, message = "Diâmetro inválido."))]
    pub diameter_mm: i32,
    #[validate(length(min = 1, message = "O tipo de solo é obrigatório."))]
    pub soil_type: String,
    #[validate(length(min = 1, message = "A dificuldade de acesso é obrigatória."))]
    pub access_difficulty: String,
    pub quantity: Decimal,
    pub depth_meters: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    /// Quando ausentes, vêm da matriz de preços.
    pub unit_price: Option<Decimal>,
    pub minutes_per_meter: Option<Decimal>,
}

/// Dados prontos para gravação de uma OS (nomes já denormalizados e itens já
/// precificados pelo service).
#[derive(Debug, Clone)]
pub struct JobDraft {
    pub client_id: Uuid,
    pub client_name: String,
    pub team_id: Option<Uuid>,
    pub team_name: Option<String>,
    pub budget_id: Option<Uuid>,
    pub items: Vec<ServiceItem>,
    pub travel_distance_km: Option<Decimal>,
    pub travel_price: Option<Decimal>,
    pub travel_round_trip: bool,
    pub total: Decimal,
    pub scheduled_start: Option<DateTime<Utc>>,
    pub estimated_minutes: Option<i32>,
    pub notes: Option<String>,
}

// --- Disponibilidade de agenda ---

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    /// Início do slot, "HH:MM".
    #[schema(example = "09:00")]
    pub time: String,
    /// O slot cruza uma OS já agendada.
    pub booked: bool,
    /// Uma nova OS com a duração pedida cabe começando aqui.
    pub available: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayAvailability {
    pub team_id: Uuid,
    #[schema(value_type = String, format = Date, example = "2026-03-10")]
    pub date: NaiveDate,
    /// Duração estimada usada na simulação, já arredondada para múltiplos de 30.
    pub duration_minutes: u32,
    pub slots: Vec<AvailabilitySlot>,
}

#[cfg(test)]
mod tests {
    use super::JobStatus::*;

    #[test]
    fn fluxo_normal_de_status() {
        assert!(Pendente.can_transition(EmExecucao));
        assert!(EmExecucao.can_transition(Concluida));
        assert!(!Pendente.can_transition(Concluida));
    }

    #[test]
    fn cancelamento_so_antes_de_encerrar() {
        assert!(Pendente.can_transition(Cancelada));
        assert!(EmExecucao.can_transition(Cancelada));
        assert!(!Concluida.can_transition(Cancelada));
    }

    #[test]
    fn estados_terminais_nao_saem() {
        for to in [Pendente, EmExecucao, Concluida, Cancelada] {
            assert!(!Concluida.can_transition(to));
            assert!(!Cancelada.can_transition(to));
        }
        assert!(Concluida.is_terminal());
        assert!(Cancelada.is_terminal());
        assert!(!Pendente.is_terminal());
    }
}
