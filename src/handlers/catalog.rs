// src/handlers/catalog.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError, config::AppState, middleware::auth::CurrentStaff,
    models::catalog::CatalogEntry,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPayload {
    #[validate(range(min = 1, message = "Diâmetro inválido."))]
    #[schema(example = 300)]
    pub diameter_mm: i32,
    #[validate(length(min = 1, message = "O tipo de solo é obrigatório."))]
    #[schema(example = "argila")]
    pub soil_type: String,
    #[validate(length(min = 1, message = "A dificuldade de acesso é obrigatória."))]
    #[schema(example = "normal")]
    pub access_difficulty: String,
    #[schema(example = 95.0)]
    pub price_per_meter: Decimal,
    #[schema(example = 12.0)]
    pub minutes_per_meter: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveQuery {
    pub diameter_mm: i32,
    pub soil_type: String,
    pub access_difficulty: String,
}

// GET /api/catalog
#[utoipa::path(
    get,
    path = "/api/catalog",
    tag = "Catálogo",
    responses((status = 200, description = "Matriz de preços", body = Vec<CatalogEntry>))
)]
pub async fn list_catalog(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let entries = app_state.catalog_service.list().await?;
    Ok((StatusCode::OK, Json(entries)))
}

// GET /api/catalog/resolve
#[utoipa::path(
    get,
    path = "/api/catalog/resolve",
    tag = "Catálogo",
    params(
        ("diameterMm" = i32, Query),
        ("soilType" = String, Query),
        ("accessDifficulty" = String, Query)
    ),
    responses(
        (status = 200, description = "Variação encontrada", body = CatalogEntry),
        (status = 404, description = "Sem preço para a combinação")
    )
)]
pub async fn resolve_catalog(
    State(app_state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Result<impl IntoResponse, AppError> {
    let entry = app_state
        .catalog_service
        .resolve(query.diameter_mm, &query.soil_type, &query.access_difficulty)
        .await?;
    Ok((StatusCode::OK, Json(entry)))
}

// POST /api/catalog
#[utoipa::path(
    post,
    path = "/api/catalog",
    tag = "Catálogo",
    request_body = CatalogPayload,
    responses(
        (status = 201, description = "Variação criada", body = CatalogEntry),
        (status = 409, description = "Combinação já cadastrada")
    )
)]
pub async fn create_catalog_entry(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Json(payload): Json<CatalogPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let entry = app_state
        .catalog_service
        .create(
            payload.diameter_mm,
            &payload.soil_type,
            &payload.access_difficulty,
            payload.price_per_meter,
            payload.minutes_per_meter,
        )
        .await?;
    app_state
        .audit
        .record(Some(&user), "create", "catalog_entry", entry.id, None);
    Ok((StatusCode::CREATED, Json(entry)))
}

// PUT /api/catalog/{id}
#[utoipa::path(
    put,
    path = "/api/catalog/{id}",
    tag = "Catálogo",
    params(("id" = Uuid, Path)),
    request_body = CatalogPayload,
    responses((status = 200, description = "Variação atualizada", body = CatalogEntry))
)]
pub async fn update_catalog_entry(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
    Json(payload): Json<CatalogPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let entry = app_state
        .catalog_service
        .update(
            id,
            payload.diameter_mm,
            &payload.soil_type,
            &payload.access_difficulty,
            payload.price_per_meter,
            payload.minutes_per_meter,
        )
        .await?;
    app_state
        .audit
        .record(Some(&user), "update", "catalog_entry", entry.id, None);
    Ok((StatusCode::OK, Json(entry)))
}

// DELETE /api/catalog/{id}
#[utoipa::path(
    delete,
    path = "/api/catalog/{id}",
    tag = "Catálogo",
    params(("id" = Uuid, Path)),
    responses((status = 204, description = "Variação removida"))
)]
pub async fn delete_catalog_entry(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete(id).await?;
    app_state
        .audit
        .record(Some(&user), "delete", "catalog_entry", id, None);
    Ok(StatusCode::NO_CONTENT)
}
