// src/handlers/portal.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::PortalClient,
    models::{clients::Client, clients::PortalAuthResponse, jobs::Job},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortalLoginPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "cliente@email.com")]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordPayload {
    #[validate(length(min = 1, message = "O token é obrigatório."))]
    pub token: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// POST /api/portal/login
#[utoipa::path(
    post,
    path = "/api/portal/login",
    tag = "Portal",
    request_body = PortalLoginPayload,
    responses(
        (status = 200, description = "Token de acesso", body = PortalAuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<PortalLoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let token = app_state
        .portal_service
        .login(&payload.email, &payload.password)
        .await?;
    Ok((StatusCode::OK, Json(PortalAuthResponse { token })))
}

// POST /api/portal/forgot-password
#[utoipa::path(
    post,
    path = "/api/portal/forgot-password",
    tag = "Portal",
    request_body = ForgotPasswordPayload,
    responses((status = 200, description = "Se o e-mail existir, o link de redefinição é enviado"))
)]
pub async fn forgot_password(
    State(app_state): State<AppState>,
    Json(payload): Json<ForgotPasswordPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    app_state.portal_service.forgot_password(&payload.email).await?;
    // Resposta idêntica com ou sem cadastro
    Ok((StatusCode::OK, Json(json!({ "ok": true }))))
}

// POST /api/portal/reset-password
#[utoipa::path(
    post,
    path = "/api/portal/reset-password",
    tag = "Portal",
    request_body = ResetPasswordPayload,
    responses(
        (status = 200, description = "Senha redefinida"),
        (status = 401, description = "Token inválido ou expirado")
    )
)]
pub async fn reset_password(
    State(app_state): State<AppState>,
    Json(payload): Json<ResetPasswordPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    app_state
        .portal_service
        .reset_password(&payload.token, &payload.password)
        .await?;
    Ok((StatusCode::OK, Json(json!({ "ok": true }))))
}

// GET /api/portal/me
#[utoipa::path(
    get,
    path = "/api/portal/me",
    tag = "Portal",
    security(("portal_jwt" = [])),
    responses((status = 200, description = "Cadastro do cliente autenticado", body = Client))
)]
pub async fn me(PortalClient(client): PortalClient) -> Result<impl IntoResponse, AppError> {
    Ok((StatusCode::OK, Json(client)))
}

// GET /api/portal/jobs
#[utoipa::path(
    get,
    path = "/api/portal/jobs",
    tag = "Portal",
    security(("portal_jwt" = [])),
    responses((status = 200, description = "OSs do cliente autenticado", body = Vec<Job>))
)]
pub async fn my_jobs(
    State(app_state): State<AppState>,
    PortalClient(client): PortalClient,
) -> Result<impl IntoResponse, AppError> {
    let jobs = app_state.jobs_service.list_for_client(client.id).await?;
    Ok((StatusCode::OK, Json(jobs)))
}
