// src/db/jobs_repo.rs

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::jobs::{Job, JobDraft, JobStatus},
};

const JOB_COLUMNS: &str = "id, display_id, client_id, client_name, team_id, team_name, budget_id, \
     items, travel_distance_km, travel_price, travel_round_trip, total, status, scheduled_start, \
     estimated_minutes, started_at, finished_at, cash_transaction_id, paid_at, notes, created_at, updated_at";

#[derive(Clone)]
pub struct JobsRepository {
    pool: PgPool,
}

impl JobsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        status: Option<JobStatus>,
        team_id: Option<Uuid>,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Job>, AppError> {
        let jobs = sqlx::query_as::<_, Job>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs \
             WHERE ($1::job_status IS NULL OR status = $1) \
               AND ($2::uuid IS NULL OR team_id = $2) \
               AND ($3::date IS NULL OR (scheduled_start AT TIME ZONE 'UTC')::date = $3) \
             ORDER BY created_at DESC"
        ))
        .bind(status)
        .bind(team_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    pub async fn list_for_client(&self, client_id: Uuid) -> Result<Vec<Job>, AppError> {
        let jobs = sqlx::query_as::<_, Job>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE client_id = $1 ORDER BY created_at DESC"
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Job>, AppError> {
        let job = sqlx::query_as::<_, Job>(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    /// OSs que ocupam a agenda da equipe no dia: agendadas e não encerradas.
    pub async fn scheduled_for_team(
        &self,
        team_id: Uuid,
        date: NaiveDate,
        exclude: Option<Uuid>,
    ) -> Result<Vec<Job>, AppError> {
        let jobs = sqlx::query_as::<_, Job>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs \
             WHERE team_id = $1 \
               AND scheduled_start IS NOT NULL \
               AND (scheduled_start AT TIME ZONE 'UTC')::date = $2 \
               AND status NOT IN ('CANCELADA', 'CONCLUIDA') \
               AND ($3::uuid IS NULL OR id <> $3) \
             ORDER BY scheduled_start ASC"
        ))
        .bind(team_id)
        .bind(date)
        .bind(exclude)
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    pub async fn insert<'e, E>(&self, executor: E, draft: &JobDraft) -> Result<Job, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let job = sqlx::query_as::<_, Job>(&format!(
            "INSERT INTO jobs (client_id, client_name, team_id, team_name, budget_id, items, \
                 travel_distance_km, travel_price, travel_round_trip, total, scheduled_start, \
                 estimated_minutes, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {JOB_COLUMNS}"
        ))
        .bind(draft.client_id)
        .bind(&draft.client_name)
        .bind(draft.team_id)
        .bind(&draft.team_name)
        .bind(draft.budget_id)
        .bind(Json(&draft.items))
        .bind(draft.travel_distance_km)
        .bind(draft.travel_price)
        .bind(draft.travel_round_trip)
        .bind(draft.total)
        .bind(draft.scheduled_start)
        .bind(draft.estimated_minutes)
        .bind(&draft.notes)
        .fetch_one(executor)
        .await?;
        Ok(job)
    }

    pub async fn update(&self, id: Uuid, draft: &JobDraft) -> Result<Option<Job>, AppError> {
        let job = sqlx::query_as::<_, Job>(&format!(
            "UPDATE jobs \
             SET client_id = $2, client_name = $3, team_id = $4, team_name = $5, items = $6, \
                 travel_distance_km = $7, travel_price = $8, travel_round_trip = $9, total = $10, \
                 scheduled_start = $11, estimated_minutes = $12, notes = $13, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {JOB_COLUMNS}"
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
        .bind(draft.scheduled_start)
        .bind(draft.estimated_minutes)
        .bind(&draft.notes)
        .fetch_optional(&self.pool)
        .await?;
        Ok(job)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: JobStatus,
        started_at: Option<DateTime<Utc>>,
        finished_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Job>, AppError> {
        let job = sqlx::query_as::<_, Job>(&format!(
            "UPDATE jobs \
             SET status = $2, \
                 started_at = COALESCE($3, started_at), \
                 finished_at = COALESCE($4, finished_at), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {JOB_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .bind(started_at)
        .bind(finished_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(job)
    }

    /// Carimba o recebimento dentro da transação de pagamento.
    pub async fn set_payment<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        cash_transaction_id: Uuid,
    ) -> Result<Job, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let job = sqlx::query_as::<_, Job>(&format!(
            "UPDATE jobs \
             SET cash_transaction_id = $2, paid_at = NOW(), updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {JOB_COLUMNS}"
        ))
        .bind(id)
        .bind(cash_transaction_id)
        .fetch_one(executor)
        .await?;
        Ok(job)
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
