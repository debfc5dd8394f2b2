// src/handlers/budgets.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentStaff,
    models::{
        budgets::{Budget, BudgetStatus},
        jobs::{Job, ServiceItemInput},
    },
    services::budgets_service::BudgetInput,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPayload {
    pub client_id: Uuid,
    pub team_id: Option<Uuid>,

    #[validate(length(min = 1, message = "O orçamento precisa de ao menos um item."))]
    pub items: Vec<ServiceItemInput>,

    pub travel_distance_km: Option<Decimal>,
    pub travel_price: Option<Decimal>,
    #[serde(default = "default_round_trip")]
    pub travel_round_trip: bool,

    #[schema(value_type = Option<String>, format = Date)]
    pub valid_until: Option<NaiveDate>,
    pub notes: Option<String>,
}

fn default_round_trip() -> bool {
    true
}

impl BudgetPayload {
    fn into_input(self) -> BudgetInput {
        BudgetInput {
            client_id: self.client_id,
            team_id: self.team_id,
            items: self.items,
            travel_distance_km: self.travel_distance_km,
            travel_price: self.travel_price,
            travel_round_trip: self.travel_round_trip,
            valid_until: self.valid_until,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectPayload {
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertPayload {
    /// Agendamento inicial da OS criada.
    pub scheduled_start: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBudgetsQuery {
    pub status: Option<BudgetStatus>,
    pub client_id: Option<Uuid>,
}

// GET /api/budgets
#[utoipa::path(
    get,
    path = "/api/budgets",
    tag = "Orçamentos",
    params(("status" = Option<BudgetStatus>, Query), ("clientId" = Option<Uuid>, Query)),
    responses((status = 200, description = "Lista de orçamentos", body = Vec<Budget>))
)]
pub async fn list_budgets(
    State(app_state): State<AppState>,
    Query(query): Query<ListBudgetsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let budgets = app_state
        .budgets_service
        .list(query.status, query.client_id)
        .await?;
    Ok((StatusCode::OK, Json(budgets)))
}

// GET /api/budgets/{id}
#[utoipa::path(
    get,
    path = "/api/budgets/{id}",
    tag = "Orçamentos",
    params(("id" = Uuid, Path)),
    responses((status = 200, description = "Orçamento", body = Budget))
)]
pub async fn get_budget(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let budget = app_state.budgets_service.get(id).await?;
    Ok((StatusCode::OK, Json(budget)))
}

// POST /api/budgets
#[utoipa::path(
    post,
    path = "/api/budgets",
    tag = "Orçamentos",
    request_body = BudgetPayload,
    responses((status = 201, description = "Orçamento criado", body = Budget))
)]
pub async fn create_budget(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Json(payload): Json<BudgetPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let budget = app_state
        .budgets_service
        .create(payload.into_input())
        .await?;
    app_state
        .audit
        .record(Some(&user), "create", "budget", budget.id, None);
    Ok((StatusCode::CREATED, Json(budget)))
}

// PUT /api/budgets/{id}
#[utoipa::path(
    put,
    path = "/api/budgets/{id}",
    tag = "Orçamentos",
    params(("id" = Uuid, Path)),
    request_body = BudgetPayload,
    responses((status = 200, description = "Orçamento atualizado", body = Budget))
)]
pub async fn update_budget(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
    Json(payload): Json<BudgetPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let budget = app_state
        .budgets_service
        .update(id, payload.into_input())
        .await?;
    app_state
        .audit
        .record(Some(&user), "update", "budget", budget.id, None);
    Ok((StatusCode::OK, Json(budget)))
}

// POST /api/budgets/{id}/approve
#[utoipa::path(
    post,
    path = "/api/budgets/{id}/approve",
    tag = "Orçamentos",
    params(("id" = Uuid, Path)),
    responses((status = 200, description = "Orçamento aprovado", body = Budget))
)]
pub async fn approve_budget(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let budget = app_state.budgets_service.approve(id).await?;
    app_state
        .audit
        .record(Some(&user), "approve", "budget", budget.id, None);
    Ok((StatusCode::OK, Json(budget)))
}

// POST /api/budgets/{id}/reject
#[utoipa::path(
    post,
    path = "/api/budgets/{id}/reject",
    tag = "Orçamentos",
    params(("id" = Uuid, Path)),
    request_body = RejectPayload,
    responses((status = 200, description = "Orçamento rejeitado", body = Budget))
)]
pub async fn reject_budget(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectPayload>,
) -> Result<impl IntoResponse, AppError> {
    let budget = app_state
        .budgets_service
        .reject(id, payload.reason.as_deref())
        .await?;
    app_state
        .audit
        .record(Some(&user), "reject", "budget", budget.id, None);
    Ok((StatusCode::OK, Json(budget)))
}

// POST /api/budgets/{id}/convert
#[utoipa::path(
    post,
    path = "/api/budgets/{id}/convert",
    tag = "Orçamentos",
    params(("id" = Uuid, Path)),
    request_body = ConvertPayload,
    responses(
        (status = 201, description = "OS criada a partir do orçamento", body = Job),
        (status = 409, description = "Orçamento já convertido")
    )
)]
pub async fn convert_budget(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConvertPayload>,
) -> Result<impl IntoResponse, AppError> {
    let (budget, job) = app_state
        .budgets_service
        .convert(id, payload.scheduled_start)
        .await?;

    app_state.audit.record(
        Some(&user),
        "convert",
        "budget",
        budget.id,
        Some(serde_json::json!({ "jobId": job.id })),
    );
    Ok((StatusCode::CREATED, Json(job)))
}

// DELETE /api/budgets/{id}
#[utoipa::path(
    delete,
    path = "/api/budgets/{id}",
    tag = "Orçamentos",
    params(("id" = Uuid, Path)),
    responses((status = 204, description = "Orçamento removido"))
)]
pub async fn delete_budget(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.budgets_service.delete(id).await?;
    app_state.audit.record(Some(&user), "delete", "budget", id, None);
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/budgets/{id}/pdf
#[utoipa::path(
    get,
    path = "/api/budgets/{id}/pdf",
    tag = "Orçamentos",
    params(("id" = Uuid, Path)),
    responses((status = 200, description = "PDF do orçamento"))
)]
pub async fn budget_pdf(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let budget = app_state.budgets_service.get(id).await?;
    let settings = app_state.admin_repo.get_settings().await?;
    let bytes = app_state.pdf_service.generate_budget_pdf(&budget, &settings)?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"orcamento_{}.pdf\"", budget.display_id),
        ),
    ];
    Ok((headers, bytes))
}
