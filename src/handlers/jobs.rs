// src/handlers/jobs.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::sse::{Event, KeepAlive, Sse},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use futures::stream::Stream;
use futures::StreamExt;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentStaff,
    models::jobs::{DayAvailability, Job, JobStatus, ServiceItemInput},
    services::jobs_service::JobInput,
};

// =============================================================================
//  PAYLOADS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobPayload {
    pub client_id: Uuid,
    pub team_id: Option<Uuid>,

    #[validate(length(min = 1, message = "A OS precisa de ao menos um item."))]
    pub items: Vec<ServiceItemInput>,

    pub travel_distance_km: Option<Decimal>,
    pub travel_price: Option<Decimal>,
    #[serde(default = "default_round_trip")]
    pub travel_round_trip: bool,

    pub scheduled_start: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

fn default_round_trip() -> bool {
    true
}

impl JobPayload {
    fn into_input(self) -> JobInput {
        JobInput {
            client_id: self.client_id,
            team_id: self.team_id,
            items: self.items,
            travel_distance_km: self.travel_distance_km,
            travel_price: self.travel_price,
            travel_round_trip: self.travel_round_trip,
            scheduled_start: self.scheduled_start,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransitionPayload {
    pub status: JobStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    /// Quando ausente, usa o total da OS.
    pub amount: Option<Decimal>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListJobsQuery {
    pub status: Option<JobStatus>,
    pub team_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub team_id: Uuid,
    pub date: NaiveDate,
    /// OS em replanejamento: sai da conta e empresta a duração.
    pub job_id: Option<Uuid>,
    pub duration_minutes: Option<u32>,
}

// =============================================================================
//  CRUD
// =============================================================================

// GET /api/jobs
#[utoipa::path(
    get,
    path = "/api/jobs",
    tag = "Ordens de Serviço",
    params(
        ("status" = Option<JobStatus>, Query),
        ("teamId" = Option<Uuid>, Query),
        ("date" = Option<String>, Query, description = "Dia agendado (YYYY-MM-DD)")
    ),
    responses((status = 200, description = "Lista de OSs", body = Vec<Job>))
)]
pub async fn list_jobs(
    State(app_state): State<AppState>,
    Query(query): Query<ListJobsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let jobs = app_state
        .jobs_service
        .list(query.status, query.team_id, query.date)
        .await?;
    Ok((StatusCode::OK, Json(jobs)))
}

// GET /api/jobs/{id}
#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    tag = "Ordens de Serviço",
    params(("id" = Uuid, Path)),
    responses((status = 200, description = "OS", body = Job))
)]
pub async fn get_job(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let job = app_state.jobs_service.get(id).await?;
    Ok((StatusCode::OK, Json(job)))
}

// POST /api/jobs
#[utoipa::path(
    post,
    path = "/api/jobs",
    tag = "Ordens de Serviço",
    request_body = JobPayload,
    responses((status = 201, description = "OS criada", body = Job))
)]
pub async fn create_job(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Json(payload): Json<JobPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let job = app_state.jobs_service.create(payload.into_input()).await?;
    app_state.audit.record(Some(&user), "create", "job", job.id, None);
    Ok((StatusCode::CREATED, Json(job)))
}

// PUT /api/jobs/{id}
#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    tag = "Ordens de Serviço",
    params(("id" = Uuid, Path)),
    request_body = JobPayload,
    responses((status = 200, description = "OS atualizada", body = Job))
)]
pub async fn update_job(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
    Json(payload): Json<JobPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let job = app_state.jobs_service.update(id, payload.into_input()).await?;
    app_state.audit.record(Some(&user), "update", "job", job.id, None);
    Ok((StatusCode::OK, Json(job)))
}

// PATCH /api/jobs/{id}/status
#[utoipa::path(
    patch,
    path = "/api/jobs/{id}/status",
    tag = "Ordens de Serviço",
    params(("id" = Uuid, Path)),
    request_body = TransitionPayload,
    responses(
        (status = 200, description = "Status atualizado", body = Job),
        (status = 400, description = "Transição inválida")
    )
)]
pub async fn transition_job(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransitionPayload>,
) -> Result<impl IntoResponse, AppError> {
    let job = app_state.jobs_service.transition(id, payload.status).await?;
    app_state
        .audit
        .record(Some(&user), "transition", "job", job.id, None);
    Ok((StatusCode::OK, Json(job)))
}

// DELETE /api/jobs/{id}
#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    tag = "Ordens de Serviço",
    params(("id" = Uuid, Path)),
    responses(
        (status = 204, description = "OS removida"),
        (status = 409, description = "OS não cancelada ou com lançamentos de caixa")
    )
)]
pub async fn delete_job(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.jobs_service.delete(id).await?;
    app_state.audit.record(Some(&user), "delete", "job", id, None);
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  AGENDA, PAGAMENTO, PDF
// =============================================================================

// GET /api/jobs/availability
#[utoipa::path(
    get,
    path = "/api/jobs/availability",
    tag = "Ordens de Serviço",
    params(
        ("teamId" = Uuid, Query),
        ("date" = String, Query, description = "YYYY-MM-DD"),
        ("jobId" = Option<Uuid>, Query),
        ("durationMinutes" = Option<u32>, Query)
    ),
    responses((status = 200, description = "Slots do dia para a equipe", body = DayAvailability))
)]
pub async fn availability(
    State(app_state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, AppError> {
    let day = app_state
        .jobs_service
        .availability(query.team_id, query.date, query.job_id, query.duration_minutes)
        .await?;
    Ok((StatusCode::OK, Json(day)))
}

// POST /api/jobs/{id}/payment
#[utoipa::path(
    post,
    path = "/api/jobs/{id}/payment",
    tag = "Ordens de Serviço",
    params(("id" = Uuid, Path)),
    request_body = PaymentPayload,
    responses(
        (status = 200, description = "Recebimento registrado", body = Job),
        (status = 409, description = "OS já recebida")
    )
)]
pub async fn record_payment(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
    Json(payload): Json<PaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    let (job, transaction) = app_state
        .jobs_service
        .record_payment(id, payload.amount, payload.description, Some(user.id))
        .await?;

    app_state.audit.record(
        Some(&user),
        "payment",
        "job",
        job.id,
        Some(serde_json::json!({ "cashTransactionId": transaction.id })),
    );
    Ok((StatusCode::OK, Json(job)))
}

// GET /api/jobs/{id}/pdf
#[utoipa::path(
    get,
    path = "/api/jobs/{id}/pdf",
    tag = "Ordens de Serviço",
    params(("id" = Uuid, Path)),
    responses((status = 200, description = "PDF da ordem de serviço"))
)]
pub async fn job_pdf(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let job = app_state.jobs_service.get(id).await?;
    let settings = app_state.admin_repo.get_settings().await?;
    let bytes = app_state.pdf_service.generate_job_pdf(&job, &settings)?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"os_{}.pdf\"", job.display_id),
        ),
    ];
    Ok((headers, bytes))
}

// GET /api/operations/team/{team_id}/watch (SSE)
#[utoipa::path(
    get,
    path = "/api/operations/team/{team_id}/watch",
    tag = "Ordens de Serviço",
    params(("team_id" = Uuid, Path)),
    responses((status = 200, description = "Stream de eventos das OSs da equipe (text/event-stream)"))
)]
pub async fn watch_team_jobs(
    State(app_state): State<AppState>,
    Path(team_id): Path<Uuid>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = app_state.events.subscribe_jobs();
    let stream = BroadcastStream::new(rx).filter_map(move |event| async move {
        let event = event.ok()?;
        if event.team_id != Some(team_id) {
            return None;
        }
        Event::default().json_data(&event).ok().map(Ok::<_, Infallible>)
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("keepalive"),
    )
}
