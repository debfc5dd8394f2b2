// src/handlers/hr.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentStaff,
    models::hr::{Employee, Team},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    #[schema(example = "Carlos Pereira")]
    pub name: String,
    #[validate(length(min = 1, message = "A função é obrigatória."))]
    #[schema(example = "operador de perfuratriz")]
    pub role: String,
    pub phone: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    #[serde(default = "default_employee_status")]
    #[schema(example = "ativo")]
    pub status: String,
}

fn default_employee_status() -> String {
    "ativo".to_string()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    #[schema(example = "Equipe Norte")]
    pub name: String,
    pub machine_id: Option<Uuid>,
    #[serde(default)]
    pub member_ids: Vec<Uuid>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

// =============================================================================
//  FUNCIONÁRIOS
// =============================================================================

// GET /api/employees
#[utoipa::path(
    get,
    path = "/api/employees",
    tag = "Equipes",
    responses((status = 200, description = "Lista de funcionários", body = Vec<Employee>))
)]
pub async fn list_employees(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let employees = app_state.hr_service.list_employees().await?;
    Ok((StatusCode::OK, Json(employees)))
}

// GET /api/employees/{id}
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    tag = "Equipes",
    params(("id" = Uuid, Path)),
    responses((status = 200, description = "Funcionário", body = Employee))
)]
pub async fn get_employee(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let employee = app_state.hr_service.get_employee(id).await?;
    Ok((StatusCode::OK, Json(employee)))
}

// POST /api/employees
#[utoipa::path(
    post,
    path = "/api/employees",
    tag = "Equipes",
    request_body = EmployeePayload,
    responses((status = 201, description = "Funcionário criado", body = Employee))
)]
pub async fn create_employee(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Json(payload): Json<EmployeePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let employee = app_state
        .hr_service
        .create_employee(
            &payload.name,
            &payload.role,
            payload.phone.as_deref(),
            payload.email.as_deref(),
            &payload.status,
        )
        .await?;
    app_state
        .audit
        .record(Some(&user), "create", "employee", employee.id, None);
    Ok((StatusCode::CREATED, Json(employee)))
}

// PUT /api/employees/{id}
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    tag = "Equipes",
    params(("id" = Uuid, Path)),
    request_body = EmployeePayload,
    responses((status = 200, description = "Funcionário atualizado", body = Employee))
)]
pub async fn update_employee(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
    Json(payload): Json<EmployeePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let employee = app_state
        .hr_service
        .update_employee(
            id,
            &payload.name,
            &payload.role,
            payload.phone.as_deref(),
            payload.email.as_deref(),
            &payload.status,
        )
        .await?;
    app_state
        .audit
        .record(Some(&user), "update", "employee", employee.id, None);
    Ok((StatusCode::OK, Json(employee)))
}

// DELETE /api/employees/{id}
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    tag = "Equipes",
    params(("id" = Uuid, Path)),
    responses(
        (status = 204, description = "Funcionário removido"),
        (status = 409, description = "Funcionário vinculado a uma equipe")
    )
)]
pub async fn delete_employee(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.hr_service.delete_employee(id).await?;
    app_state.audit.record(Some(&user), "delete", "employee", id, None);
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  EQUIPES
// =============================================================================

// GET /api/teams
#[utoipa::path(
    get,
    path = "/api/teams",
    tag = "Equipes",
    responses((status = 200, description = "Lista de equipes", body = Vec<Team>))
)]
pub async fn list_teams(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let teams = app_state.hr_service.list_teams().await?;
    Ok((StatusCode::OK, Json(teams)))
}

// GET /api/teams/{id}
#[utoipa::path(
    get,
    path = "/api/teams/{id}",
    tag = "Equipes",
    params(("id" = Uuid, Path)),
    responses((status = 200, description = "Equipe", body = Team))
)]
pub async fn get_team(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let team = app_state.hr_service.get_team(id).await?;
    Ok((StatusCode::OK, Json(team)))
}

// POST /api/teams
#[utoipa::path(
    post,
    path = "/api/teams",
    tag = "Equipes",
    request_body = TeamPayload,
    responses((status = 201, description = "Equipe criada", body = Team))
)]
pub async fn create_team(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Json(payload): Json<TeamPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let team = app_state
        .hr_service
        .create_team(&payload.name, payload.machine_id, payload.member_ids)
        .await?;
    app_state.audit.record(Some(&user), "create", "team", team.id, None);
    Ok((StatusCode::CREATED, Json(team)))
}

// PUT /api/teams/{id}
#[utoipa::path(
    put,
    path = "/api/teams/{id}",
    tag = "Equipes",
    params(("id" = Uuid, Path)),
    request_body = TeamPayload,
    responses((status = 200, description = "Equipe atualizada", body = Team))
)]
pub async fn update_team(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
    Json(payload): Json<TeamPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let team = app_state
        .hr_service
        .update_team(id, &payload.name, payload.machine_id, payload.member_ids, payload.active)
        .await?;
    app_state.audit.record(Some(&user), "update", "team", team.id, None);
    Ok((StatusCode::OK, Json(team)))
}

// DELETE /api/teams/{id}
#[utoipa::path(
    delete,
    path = "/api/teams/{id}",
    tag = "Equipes",
    params(("id" = Uuid, Path)),
    responses((status = 204, description = "Equipe removida"))
)]
pub async fn delete_team(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.hr_service.delete_team(id).await?;
    app_state.audit.record(Some(&user), "delete", "team", id, None);
    Ok(StatusCode::NO_CONTENT)
}
