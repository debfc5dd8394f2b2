// src/db/finance_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres, Row};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::finance::{CashKind, CashTransaction, Cashier},
};

const CASHIER_COLUMNS: &str =
    "id, opened_by, opened_by_name, opening_balance, closing_balance, status, opened_at, closed_at";

const TX_COLUMNS: &str = "id, cashier_id, kind, amount, description, job_id, created_by, created_at";

#[derive(Clone)]
pub struct FinanceRepository {
    pool: PgPool,
}

impl FinanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // --- Sessões de caixa ---

    pub async fn open_session(
        &self,
        opened_by: Option<Uuid>,
        opened_by_name: &str,
        opening_balance: Decimal,
    ) -> Result<Cashier, AppError> {
        sqlx::query_as::<_, Cashier>(&format!(
            "INSERT INTO cashiers (opened_by, opened_by_name, opening_balance) \
             VALUES ($1, $2, $3) \
             RETURNING {CASHIER_COLUMNS}"
        ))
        .bind(opened_by)
        .bind(opened_by_name)
        .bind(opening_balance)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // O índice parcial único garante no máximo uma sessão aberta
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict("Já existe um caixa aberto.".to_string());
                }
            }
            e.into()
        })
    }

    pub async fn find_open<'e, E>(&self, executor: E) -> Result<Option<Cashier>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cashier = sqlx::query_as::<_, Cashier>(&format!(
            "SELECT {CASHIER_COLUMNS} FROM cashiers WHERE status = 'ABERTO'"
        ))
        .fetch_optional(executor)
        .await?;
        Ok(cashier)
    }

    pub async fn find_session(&self, id: Uuid) -> Result<Option<Cashier>, AppError> {
        let cashier = sqlx::query_as::<_, Cashier>(&format!(
            "SELECT {CASHIER_COLUMNS} FROM cashiers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(cashier)
    }

    pub async fn list_sessions(&self) -> Result<Vec<Cashier>, AppError> {
        let cashiers = sqlx::query_as::<_, Cashier>(&format!(
            "SELECT {CASHIER_COLUMNS} FROM cashiers ORDER BY opened_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(cashiers)
    }

    pub async fn close_session(&self, id: Uuid, closing_balance: Decimal) -> Result<Cashier, AppError> {
        sqlx::query_as::<_, Cashier>(&format!(
            "UPDATE cashiers \
             SET status = 'FECHADO', closing_balance = $2, closed_at = NOW() \
             WHERE id = $1 AND status = 'ABERTO' \
             RETURNING {CASHIER_COLUMNS}"
        ))
        .bind(id)
        .bind(closing_balance)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::BusinessRule("Este caixa não está aberto.".to_string()))
    }

    /// Totais da sessão: (entradas, saídas, quantidade de lançamentos).
    pub async fn session_totals(&self, cashier_id: Uuid) -> Result<(Decimal, Decimal, i64), AppError> {
        let row = sqlx::query(
            "SELECT \
                 COALESCE(SUM(amount) FILTER (WHERE kind = 'ENTRADA'), 0) AS entradas, \
                 COALESCE(SUM(amount) FILTER (WHERE kind = 'SAIDA'), 0) AS saidas, \
                 COUNT(*) AS total \
             FROM cash_transactions WHERE cashier_id = $1",
        )
        .bind(cashier_id)
        .fetch_one(&self.pool)
        .await?;
        Ok((row.try_get("entradas")?, row.try_get("saidas")?, row.try_get("total")?))
    }

    // --- Lançamentos ---

    pub async fn insert_transaction<'e, E>(
        &self,
        executor: E,
        cashier_id: Uuid,
        kind: CashKind,
        amount: Decimal,
        description: &str,
        job_id: Option<Uuid>,
        created_by: Option<Uuid>,
    ) -> Result<CashTransaction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, CashTransaction>(&format!(
            "INSERT INTO cash_transactions (cashier_id, kind, amount, description, job_id, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {TX_COLUMNS}"
        ))
        .bind(cashier_id)
        .bind(kind)
        .bind(amount)
        .bind(description)
        .bind(job_id)
        .bind(created_by)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict(
                        "Já existe uma entrada de caixa para esta OS.".to_string(),
                    );
                }
            }
            e.into()
        })
    }

    pub async fn entrada_exists_for_job<'e, E>(&self, executor: E, job_id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM cash_transactions WHERE job_id = $1 AND kind = 'ENTRADA')",
        )
        .bind(job_id)
        .fetch_one(executor)
        .await?;
        Ok(exists)
    }

    pub async fn count_for_job(&self, job_id: Uuid) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM cash_transactions WHERE job_id = $1",
        )
        .bind(job_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn list_transactions(&self, cashier_id: Option<Uuid>) -> Result<Vec<CashTransaction>, AppError> {
        let txs = sqlx::query_as::<_, CashTransaction>(&format!(
            "SELECT {TX_COLUMNS} FROM cash_transactions \
             WHERE ($1::uuid IS NULL OR cashier_id = $1) \
             ORDER BY created_at DESC"
        ))
        .bind(cashier_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(txs)
    }

    pub async fn find_transaction(&self, id: Uuid) -> Result<Option<CashTransaction>, AppError> {
        let tx = sqlx::query_as::<_, CashTransaction>(&format!(
            "SELECT {TX_COLUMNS} FROM cash_transactions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(tx)
    }

}
