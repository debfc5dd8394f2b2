// src/services/finance_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::FinanceRepository,
    models::finance::{CashKind, CashTransaction, Cashier, CashierStatus, CashierSummary},
};

#[derive(Clone)]
pub struct FinanceService {
    pool: PgPool,
    repo: FinanceRepository,
}

impl FinanceService {
    pub fn new(pool: PgPool, repo: FinanceRepository) -> Self {
        Self { pool, repo }
    }

    // --- Sessões ---

    pub async fn open_session(
        &self,
        opened_by: Option<Uuid>,
        opened_by_name: &str,
        opening_balance: Decimal,
    ) -> Result<Cashier, AppError> {
        if opening_balance < Decimal::ZERO {
            return Err(AppError::BusinessRule(
                "O saldo inicial não pode ser negativo.".to_string(),
            ));
        }
        self.repo
            .open_session(opened_by, opened_by_name, opening_balance)
            .await
    }

    /// Fecha a sessão calculando o saldo: abertura + entradas - saídas.
    pub async fn close_session(&self, id: Uuid) -> Result<CashierSummary, AppError> {
        let cashier = self
            .repo
            .find_session(id)
            .await?
            .ok_or(AppError::NotFound("Caixa"))?;

        let (entradas, saidas, count) = self.repo.session_totals(cashier.id).await?;
        let balance = cashier.opening_balance + entradas - saidas;

        let closed = self.repo.close_session(id, balance).await?;
        Ok(CashierSummary {
            cashier: closed,
            total_entradas: entradas,
            total_saidas: saidas,
            balance,
            transaction_count: count,
        })
    }

    pub async fn list_sessions(&self) -> Result<Vec<Cashier>, AppError> {
        self.repo.list_sessions().await
    }

    pub async fn current_session(&self) -> Result<Option<CashierSummary>, AppError> {
        let Some(cashier) = self.repo.find_open(&self.pool).await? else {
            return Ok(None);
        };
        Ok(Some(self.summarize(cashier).await?))
    }

    pub async fn session_summary(&self, id: Uuid) -> Result<CashierSummary, AppError> {
        let cashier = self
            .repo
            .find_session(id)
            .await?
            .ok_or(AppError::NotFound("Caixa"))?;
        self.summarize(cashier).await
    }

    async fn summarize(&self, cashier: Cashier) -> Result<CashierSummary, AppError> {
        let (entradas, saidas, count) = self.repo.session_totals(cashier.id).await?;
        let balance = cashier.opening_balance + entradas - saidas;
        Ok(CashierSummary {
            cashier,
            total_entradas: entradas,
            total_saidas: saidas,
            balance,
            transaction_count: count,
        })
    }

    // --- Lançamentos ---

    pub async fn list_transactions(
        &self,
        cashier_id: Option<Uuid>,
    ) -> Result<Vec<CashTransaction>, AppError> {
        self.repo.list_transactions(cashier_id).await
    }

    pub async fn create_transaction(
        &self,
        kind: CashKind,
        amount: Decimal,
        description: &str,
        job_id: Option<Uuid>,
        created_by: Option<Uuid>,
    ) -> Result<CashTransaction, AppError> {
        if amount <= Decimal::ZERO {
            return Err(AppError::BusinessRule(
                "O valor do lançamento deve ser maior que zero.".to_string(),
            ));
        }

        let cashier = self
            .repo
            .find_open(&self.pool)
            .await?
            .ok_or_else(|| AppError::BusinessRule("Não há caixa aberto.".to_string()))?;

        if kind == CashKind::Entrada {
            if let Some(job_id) = job_id {
                if self.repo.entrada_exists_for_job(&self.pool, job_id).await? {
                    return Err(AppError::Conflict(
                        "Já existe uma entrada de caixa para esta OS.".to_string(),
                    ));
                }
            }
        }

        self.repo
            .insert_transaction(&self.pool, cashier.id, kind, amount, description, job_id, created_by)
            .await
    }

    /// Só remove lançamentos de sessão ainda aberta; se o lançamento era o
    /// recebimento de uma OS, desfaz o carimbo de pagamento junto.
    pub async fn delete_transaction(&self, id: Uuid) -> Result<(), AppError> {
        let transaction = self
            .repo
            .find_transaction(id)
            .await?
            .ok_or(AppError::NotFound("Lançamento"))?;

        let cashier = self
            .repo
            .find_session(transaction.cashier_id)
            .await?
            .ok_or(AppError::NotFound("Caixa"))?;
        if cashier.status != CashierStatus::Aberto {
            return Err(AppError::Conflict(
                "Lançamento de caixa fechado não pode ser excluído.".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "UPDATE jobs SET cash_transaction_id = NULL, paid_at = NULL, updated_at = NOW() \
             WHERE cash_transaction_id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM cash_transactions WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(())
    }
}
