// src/handlers/travel.rs

use axum::{
    extract::{Path, State},
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
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentStaff,
    models::travel::{DistanceResult, LocationCapture, TravelQuote, TravelRule},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TravelRulePayload {
    #[schema(example = 2)]
    pub rule_order: i32,
    #[schema(example = 60.0)]
    pub up_to_km: Option<Decimal>,
    #[schema(example = 150.0)]
    pub price: Decimal,
    #[serde(default = "default_round_trip")]
    pub round_trip: bool,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_round_trip() -> bool {
    true
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveTravelPayload {
    #[schema(example = 42.7)]
    pub distance_km: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistancePayload {
    #[validate(length(min = 3, message = "Origem inválida."))]
    #[schema(example = "Av. Norte-Sul 500, Campinas - SP")]
    pub origin: String,
    #[validate(length(min = 3, message = "Destino inválido."))]
    #[schema(example = "Rua das Palmeiras 120, Valinhos - SP")]
    pub destination: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCapturePayload {
    #[schema(example = "Obra - Condomínio Horizonte")]
    pub label: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitCapturePayload {
    #[schema(example = -22.9064)]
    pub latitude: f64,
    #[schema(example = -47.0616)]
    pub longitude: f64,
}

// =============================================================================
//  FAIXAS DE DESLOCAMENTO
// =============================================================================

// GET /api/travel-pricing
#[utoipa::path(
    get,
    path = "/api/travel-pricing",
    tag = "Deslocamento",
    responses((status = 200, description = "Faixas cadastradas", body = Vec<TravelRule>))
)]
pub async fn list_rules(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rules = app_state.travel_service.list_rules().await?;
    Ok((StatusCode::OK, Json(rules)))
}

// POST /api/travel-pricing
#[utoipa::path(
    post,
    path = "/api/travel-pricing",
    tag = "Deslocamento",
    request_body = TravelRulePayload,
    responses((status = 201, description = "Faixa criada", body = TravelRule))
)]
pub async fn create_rule(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Json(payload): Json<TravelRulePayload>,
) -> Result<impl IntoResponse, AppError> {
    let rule = app_state
        .travel_service
        .create_rule(payload.rule_order, payload.up_to_km, payload.price, payload.round_trip)
        .await?;
    app_state
        .audit
        .record(Some(&user), "create", "travel_rule", rule.id, None);
    Ok((StatusCode::CREATED, Json(rule)))
}

// PUT /api/travel-pricing/{id}
#[utoipa::path(
    put,
    path = "/api/travel-pricing/{id}",
    tag = "Deslocamento",
    params(("id" = Uuid, Path)),
    request_body = TravelRulePayload,
    responses((status = 200, description = "Faixa atualizada", body = TravelRule))
)]
pub async fn update_rule(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
    Json(payload): Json<TravelRulePayload>,
) -> Result<impl IntoResponse, AppError> {
    let rule = app_state
        .travel_service
        .update_rule(
            id,
            payload.rule_order,
            payload.up_to_km,
            payload.price,
            payload.round_trip,
            payload.active,
        )
        .await?;
    app_state
        .audit
        .record(Some(&user), "update", "travel_rule", rule.id, None);
    Ok((StatusCode::OK, Json(rule)))
}

// DELETE /api/travel-pricing/{id}
#[utoipa::path(
    delete,
    path = "/api/travel-pricing/{id}",
    tag = "Deslocamento",
    params(("id" = Uuid, Path)),
    responses((status = 204, description = "Faixa removida"))
)]
pub async fn delete_rule(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.travel_service.delete_rule(id).await?;
    app_state
        .audit
        .record(Some(&user), "delete", "travel_rule", id, None);
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/travel-pricing/resolve
#[utoipa::path(
    post,
    path = "/api/travel-pricing/resolve",
    tag = "Deslocamento",
    request_body = ResolveTravelPayload,
    responses(
        (status = 200, description = "Preço resolvido", body = TravelQuote),
        (status = 400, description = "Nenhuma faixa cobre a distância")
    )
)]
pub async fn resolve_travel(
    State(app_state): State<AppState>,
    Json(payload): Json<ResolveTravelPayload>,
) -> Result<impl IntoResponse, AppError> {
    let quote = app_state.travel_service.quote(payload.distance_km).await?;
    Ok((StatusCode::OK, Json(quote)))
}

// POST /api/distance
#[utoipa::path(
    post,
    path = "/api/distance",
    tag = "Deslocamento",
    request_body = DistancePayload,
    responses((status = 200, description = "Distância e tempo de viagem", body = DistanceResult))
)]
pub async fn distance(
    State(app_state): State<AppState>,
    Json(payload): Json<DistancePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let result = app_state
        .travel_service
        .distance(&payload.origin, &payload.destination)
        .await?;
    Ok((StatusCode::OK, Json(result)))
}

// =============================================================================
//  CAPTURA DE LOCALIZAÇÃO
// =============================================================================

// POST /api/location-captures
#[utoipa::path(
    post,
    path = "/api/location-captures",
    tag = "Deslocamento",
    request_body = CreateCapturePayload,
    responses((status = 201, description = "Token de captura criado", body = LocationCapture))
)]
pub async fn create_capture(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Json(payload): Json<CreateCapturePayload>,
) -> Result<impl IntoResponse, AppError> {
    let capture = app_state
        .travel_service
        .create_capture(payload.label.as_deref(), Some(user.id))
        .await?;
    Ok((StatusCode::CREATED, Json(capture)))
}

// GET /api/location-captures/{token}
#[utoipa::path(
    get,
    path = "/api/location-captures/{token}",
    tag = "Deslocamento",
    params(("token" = String, Path)),
    responses(
        (status = 200, description = "Captura", body = LocationCapture),
        (status = 404, description = "Token inexistente ou expirado")
    )
)]
pub async fn get_capture(
    State(app_state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let capture = app_state.travel_service.get_capture(&token).await?;
    Ok((StatusCode::OK, Json(capture)))
}

// PUT /api/location-captures/{token} (público)
#[utoipa::path(
    put,
    path = "/api/location-captures/{token}",
    tag = "Deslocamento",
    params(("token" = String, Path)),
    request_body = SubmitCapturePayload,
    responses(
        (status = 200, description = "Coordenada registrada", body = LocationCapture),
        (status = 409, description = "Localização já capturada")
    )
)]
pub async fn submit_capture(
    State(app_state): State<AppState>,
    Path(token): Path<String>,
    Json(payload): Json<SubmitCapturePayload>,
) -> Result<impl IntoResponse, AppError> {
    let capture = app_state
        .travel_service
        .submit_capture(&token, payload.latitude, payload.longitude)
        .await?;
    Ok((StatusCode::OK, Json(capture)))
}
