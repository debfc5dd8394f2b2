// src/db/budgets_repo.rs

use sqlx::types::Json;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::budgets::{Budget, BudgetDraft, BudgetStatus},
};

const BUDGET_COLUMNS: &str = "id, display_id, client_id, client_name, team_id, team_name, items, \
     travel_distance_km, travel_price, travel_round_trip, total, status, valid_until, \
     rejection_reason, converted_job_id, notes, created_at, updated_at";

#[derive(Clone)]
pub struct BudgetsRepository {
    pool: PgPool,
}

impl BudgetsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, status: Option<BudgetStatus>, client_id: Option<Uuid>) -> Result<Vec<Budget>, AppError> {
        let budgets = sqlx::query_as::<_, Budget>(&format!(
            "SELECT {BUDGET_COLUMNS} FROM budgets \
             WHERE ($1::budget_status IS NULL OR status = $1) \
               AND ($2::uuid IS NULL OR client_id = $2) \
             ORDER BY created_at DESC"
        ))
        .bind(status)
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(budgets)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Budget>, AppError> {
        let budget =
            sqlx::query_as::<_, Budget>(&format!("SELECT {BUDGET_COLUMNS} FROM budgets WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(budget)
    }

    /// Versão com trava de linha, usada pela conversão em OS para impedir
    /// duas conversões concorrentes do mesmo orçamento.
    pub async fn find_by_id_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Budget>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let budget = sqlx::query_as::<_, Budget>(&format!(
            "SELECT {BUDGET_COLUMNS} FROM budgets WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(budget)
    }

    pub async fn insert<'e, E>(&self, executor: E, draft: &BudgetDraft) -> Result<Budget, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let budget = sqlx::query_as::<_, Budget>(&format!(
            "INSERT INTO budgets (client_id, client_name, team_id, team_name, items, \
                 travel_distance_km, travel_price, travel_round_trip, total, valid_until, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {BUDGET_COLUMNS}"
        ))
        .bind(draft.client_id)
        .bind(&draft.client_name)
        .bind(draft.team_id)
        .bind(&draft.team_name)
        .bind(Json(&draft.items))
        .bind(draft.travel_distance_km)
        .bind(draft.travel_price)
        .bind(draft.travel_round_trip)
        .bind(draft.total)
        .bind(draft.valid_until)
        .bind(&draft.notes)
        .fetch_one(executor)
        .await?;
        Ok(budget)
    }

    pub async fn update(&self, id: Uuid, draft: &BudgetDraft) -> Result<Option<Budget>, AppError> {
        let budget = sqlx::query_as::<_, Budget>(&format!(
            "UPDATE budgets \
             SET client_id = $2, client_name = $3, team_id = $4, team_name = $5, items = $6, \
                 travel_distance_km = $7, travel_price = $8, travel_round_trip = $9, total = $10, \
                 valid_until = $11, notes = $12, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {BUDGET_COLUMNS}"
        ))
        .bind(id)
        .bind(draft.client_id)
        .bind(&draft.client_name)
        .bind(draft.team_id)
        .bind(&draft.team_name)
        .bind(Json(&draft.items))
        .bind(draft.travel_distance_km)
        .bind(draft.travel_price)
        .bind(draft.travel_round_trip)
        .bind(draft.total)
        .bind(draft.valid_until)
        .bind(&draft.notes)
        .fetch_optional(&self.pool)
        .await?;
        Ok(budget)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: BudgetStatus,
        rejection_reason: Option<&str>,
    ) -> Result<Option<Budget>, AppError> {
        let budget = sqlx::query_as::<_, Budget>(&format!(
            "UPDATE budgets \
             SET status = $2, rejection_reason = $3, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {BUDGET_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .bind(rejection_reason)
        .fetch_optional(&self.pool)
        .await?;
        Ok(budget)
    }

    pub async fn mark_converted<'e, E>(&self, executor: E, id: Uuid, job_id: Uuid) -> Result<Budget, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let budget = sqlx::query_as::<_, Budget>(&format!(
            "UPDATE budgets \
             SET status = 'CONVERTIDO', converted_job_id = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {BUDGET_COLUMNS}"
        ))
        .bind(id)
        .bind(job_id)
        .fetch_one(executor)
        .await?;
        Ok(budget)
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM budgets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
