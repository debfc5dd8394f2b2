// src/handlers/fleet.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentStaff,
    models::fleet::{Equipment, Machine, MaintenanceRecord},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachinePayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Perfuratriz CZM EM600")]
    pub name: String,
    pub model: Option<String>,
    pub plate: Option<String>,
    #[serde(default = "default_status")]
    #[schema(example = "disponivel")]
    pub status: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub serial_number: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenancePayload {
    #[schema(value_type = String, format = Date, example = "2026-02-15")]
    pub performed_at: NaiveDate,
    #[serde(default)]
    #[schema(example = 850.0)]
    pub cost: Decimal,
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,
}

fn default_status() -> String {
    "disponivel".to_string()
}

// =============================================================================
//  MÁQUINAS
// =============================================================================

// GET /api/machines
#[utoipa::path(
    get,
    path = "/api/machines",
    tag = "Frota",
    responses((status = 200, description = "Lista de máquinas", body = Vec<Machine>))
)]
pub async fn list_machines(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let machines = app_state.fleet_service.list_machines().await?;
    Ok((StatusCode::OK, Json(machines)))
}

// POST /api/machines
#[utoipa::path(
    post,
    path = "/api/machines",
    tag = "Frota",
    request_body = MachinePayload,
    responses((status = 201, description = "Máquina criada", body = Machine))
)]
pub async fn create_machine(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Json(payload): Json<MachinePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let machine = app_state
        .fleet_service
        .create_machine(
            &payload.name,
            payload.model.as_deref(),
            payload.plate.as_deref(),
            &payload.status,
        )
        .await?;
    app_state
        .audit
        .record(Some(&user), "create", "machine", machine.id, None);
    Ok((StatusCode::CREATED, Json(machine)))
}

// PUT /api/machines/{id}
#[utoipa::path(
    put,
    path = "/api/machines/{id}",
    tag = "Frota",
    params(("id" = Uuid, Path)),
    request_body = MachinePayload,
    responses((status = 200, description = "Máquina atualizada", body = Machine))
)]
pub async fn update_machine(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
    Json(payload): Json<MachinePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let machine = app_state
        .fleet_service
        .update_machine(
            id,
            &payload.name,
            payload.model.as_deref(),
            payload.plate.as_deref(),
            &payload.status,
        )
        .await?;
    app_state
        .audit
        .record(Some(&user), "update", "machine", machine.id, None);
    Ok((StatusCode::OK, Json(machine)))
}

// DELETE /api/machines/{id}
#[utoipa::path(
    delete,
    path = "/api/machines/{id}",
    tag = "Frota",
    params(("id" = Uuid, Path)),
    responses((status = 204, description = "Máquina removida"))
)]
pub async fn delete_machine(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.fleet_service.delete_machine(id).await?;
    app_state.audit.record(Some(&user), "delete", "machine", id, None);
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  EQUIPAMENTOS
// =============================================================================

// GET /api/equipment
#[utoipa::path(
    get,
    path = "/api/equipment",
    tag = "Frota",
    responses((status = 200, description = "Lista de equipamentos", body = Vec<Equipment>))
)]
pub async fn list_equipment(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let equipment = app_state.fleet_service.list_equipment().await?;
    Ok((StatusCode::OK, Json(equipment)))
}

// POST /api/equipment
#[utoipa::path(
    post,
    path = "/api/equipment",
    tag = "Frota",
    request_body = EquipmentPayload,
    responses((status = 201, description = "Equipamento criado", body = Equipment))
)]
pub async fn create_equipment(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Json(payload): Json<EquipmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let equipment = app_state
        .fleet_service
        .create_equipment(
            &payload.name,
            payload.serial_number.as_deref(),
            &payload.status,
            payload.notes.as_deref(),
        )
        .await?;
    app_state
        .audit
        .record(Some(&user), "create", "equipment", equipment.id, None);
    Ok((StatusCode::CREATED, Json(equipment)))
}

// PUT /api/equipment/{id}
#[utoipa::path(
    put,
    path = "/api/equipment/{id}",
    tag = "Frota",
    params(("id" = Uuid, Path)),
    request_body = EquipmentPayload,
    responses((status = 200, description = "Equipamento atualizado", body = Equipment))
)]
pub async fn update_equipment(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
    Json(payload): Json<EquipmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let equipment = app_state
        .fleet_service
        .update_equipment(
            id,
            &payload.name,
            payload.serial_number.as_deref(),
            &payload.status,
            payload.notes.as_deref(),
        )
        .await?;
    app_state
        .audit
        .record(Some(&user), "update", "equipment", equipment.id, None);
    Ok((StatusCode::OK, Json(equipment)))
}

// DELETE /api/equipment/{id}
#[utoipa::path(
    delete,
    path = "/api/equipment/{id}",
    tag = "Frota",
    params(("id" = Uuid, Path)),
    responses((status = 204, description = "Equipamento removido"))
)]
pub async fn delete_equipment(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.fleet_service.delete_equipment(id).await?;
    app_state.audit.record(Some(&user), "delete", "equipment", id, None);
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  MANUTENÇÕES
// =============================================================================

// GET /api/machines/{id}/maintenance
#[utoipa::path(
    get,
    path = "/api/machines/{id}/maintenance",
    tag = "Frota",
    params(("id" = Uuid, Path)),
    responses((status = 200, description = "Manutenções da máquina", body = Vec<MaintenanceRecord>))
)]
pub async fn list_maintenance(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let records = app_state.fleet_service.list_maintenance(id).await?;
    Ok((StatusCode::OK, Json(records)))
}

// POST /api/machines/{id}/maintenance
#[utoipa::path(
    post,
    path = "/api/machines/{id}/maintenance",
    tag = "Frota",
    params(("id" = Uuid, Path)),
    request_body = MaintenancePayload,
    responses((status = 201, description = "Manutenção registrada", body = MaintenanceRecord))
)]
pub async fn create_maintenance(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
    Json(payload): Json<MaintenancePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let record = app_state
        .fleet_service
        .create_maintenance(id, payload.performed_at, payload.cost, &payload.description)
        .await?;
    app_state
        .audit
        .record(Some(&user), "create", "maintenance", record.id, None);
    Ok((StatusCode::CREATED, Json(record)))
}

// DELETE /api/maintenance/{id}
#[utoipa::path(
    delete,
    path = "/api/maintenance/{id}",
    tag = "Frota",
    params(("id" = Uuid, Path)),
    responses((status = 204, description = "Manutenção removida"))
)]
pub async fn delete_maintenance(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.fleet_service.delete_maintenance(id).await?;
    app_state
        .audit
        .record(Some(&user), "delete", "maintenance", id, None);
    Ok(StatusCode::NO_CONTENT)
}
