// src/db/leads_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::leads::{LeadStatus, OrcamentoRequest},
};

const LEAD_COLUMNS: &str = "id, name, email, phone, doc_number, city, service_description, source, \
     status, client_id, budget_id, converted_at, created_at";

#[derive(Clone)]
pub struct LeadsRepository {
    pool: PgPool,
}

impl LeadsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        doc_number: Option<&str>,
        city: Option<&str>,
        service_description: &str,
        source: Option<&str>,
    ) -> Result<OrcamentoRequest, AppError> {
        let request = sqlx::query_as::<_, OrcamentoRequest>(&format!(
            "INSERT INTO orcamento_requests (name, email, phone, doc_number, city, service_description, source) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {LEAD_COLUMNS}"
        ))
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(doc_number)
        .bind(city)
        .bind(service_description)
        .bind(source)
        .fetch_one(&self.pool)
        .await?;
        Ok(request)
    }

    pub async fn list(&self, status: Option<LeadStatus>) -> Result<Vec<OrcamentoRequest>, AppError> {
        let requests = sqlx::query_as::<_, OrcamentoRequest>(&format!(
            "SELECT {LEAD_COLUMNS} FROM orcamento_requests \
             WHERE ($1::lead_status IS NULL OR status = $1) \
             ORDER BY created_at DESC"
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<OrcamentoRequest>, AppError> {
        let request = sqlx::query_as::<_, OrcamentoRequest>(&format!(
            "SELECT {LEAD_COLUMNS} FROM orcamento_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(request)
    }

    /// Trava a linha durante a conversão.
    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<OrcamentoRequest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, OrcamentoRequest>(&format!(
            "SELECT {LEAD_COLUMNS} FROM orcamento_requests WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(request)
    }

    pub async fn mark_converted<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        client_id: Uuid,
        budget_id: Uuid,
    ) -> Result<OrcamentoRequest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, OrcamentoRequest>(&format!(
            "UPDATE orcamento_requests \
             SET status = 'CONVERTIDO', client_id = $2, budget_id = $3, converted_at = NOW() \
             WHERE id = $1 \
             RETURNING {LEAD_COLUMNS}"
        ))
        .bind(id)
        .bind(client_id)
        .bind(budget_id)
        .fetch_one(executor)
        .await?;
        Ok(request)
    }

    pub async fn discard(&self, id: Uuid) -> Result<Option<OrcamentoRequest>, AppError> {
        let request = sqlx::query_as::<_, OrcamentoRequest>(&format!(
            "UPDATE orcamento_requests SET status = 'DESCARTADO' WHERE id = $1 \
             RETURNING {LEAD_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(request)
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM orcamento_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn count_pending(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM orcamento_requests WHERE status = 'PENDENTE'",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
