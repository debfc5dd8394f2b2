// src/handlers/admin.rs

use axum::{
    extract::{Path, Query, State},
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
    models::admin::{AuditEntry, Settings, SocialLink, User},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    pub name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[serde(default = "default_role")]
    #[schema(example = "operador")]
    pub role: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_role() -> String {
    "operador".to_string()
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPayload {
    pub company_name: Option<String>,
    pub document_number: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub pix_key: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SocialPayload {
    #[validate(length(min = 1, message = "A plataforma é obrigatória."))]
    #[schema(example = "instagram")]
    pub platform: String,
    #[validate(url(message = "A URL fornecida é inválida."))]
    #[schema(example = "https://instagram.com/perfusolo")]
    pub url: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    pub entity: Option<String>,
    pub entity_id: Option<String>,
    pub limit: Option<i64>,
}

// =============================================================================
//  USUÁRIOS
// =============================================================================

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Administração",
    responses((status = 200, description = "Usuários internos", body = Vec<User>))
)]
pub async fn list_users(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let users = app_state.admin_repo.list_users().await?;
    Ok((StatusCode::OK, Json(users)))
}

// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Administração",
    responses((status = 200, description = "Usuário autenticado", body = User))
)]
pub async fn get_me(CurrentStaff(user): CurrentStaff) -> Result<impl IntoResponse, AppError> {
    Ok((StatusCode::OK, Json(user)))
}

// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Administração",
    request_body = UserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = User),
        (status = 409, description = "E-mail já em uso")
    )
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Json(payload): Json<UserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let created = app_state
        .admin_repo
        .create_user(&payload.name, &payload.email, &payload.role)
        .await?;
    app_state.audit.record(Some(&user), "create", "user", created.id, None);
    Ok((StatusCode::CREATED, Json(created)))
}

// PUT /api/users/{id}
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Administração",
    params(("id" = Uuid, Path)),
    request_body = UserPayload,
    responses((status = 200, description = "Usuário atualizado", body = User))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
    Json(payload): Json<UserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let updated = app_state
        .admin_repo
        .update_user(id, &payload.name, &payload.email, &payload.role, payload.active)
        .await?
        .ok_or(AppError::NotFound("Usuário"))?;
    app_state.audit.record(Some(&user), "update", "user", updated.id, None);
    Ok((StatusCode::OK, Json(updated)))
}

// DELETE /api/users/{id}
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Administração",
    params(("id" = Uuid, Path)),
    responses((status = 204, description = "Usuário removido"))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if user.id == id {
        return Err(AppError::BusinessRule(
            "Você não pode remover o próprio usuário.".to_string(),
        ));
    }
    let removed = app_state.admin_repo.delete_user(id).await?;
    if removed == 0 {
        return Err(AppError::NotFound("Usuário"));
    }
    app_state.audit.record(Some(&user), "delete", "user", id, None);
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  CONFIGURAÇÕES
// =============================================================================

// GET /api/settings
#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "Administração",
    responses((status = 200, description = "Configurações da empresa", body = Settings))
)]
pub async fn get_settings(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let settings = app_state.admin_repo.get_settings().await?;
    Ok((StatusCode::OK, Json(settings)))
}

// PUT /api/settings
#[utoipa::path(
    put,
    path = "/api/settings",
    tag = "Administração",
    request_body = SettingsPayload,
    responses((status = 200, description = "Configurações atualizadas", body = Settings))
)]
pub async fn update_settings(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Json(payload): Json<SettingsPayload>,
) -> Result<impl IntoResponse, AppError> {
    let settings = app_state
        .admin_repo
        .update_settings(
            payload.company_name.as_deref(),
            payload.document_number.as_deref(),
            payload.address.as_deref(),
            payload.phone.as_deref(),
            payload.pix_key.as_deref(),
        )
        .await?;
    app_state.audit.record(Some(&user), "update", "settings", 1, None);
    Ok((StatusCode::OK, Json(settings)))
}

// =============================================================================
//  AUDITORIA
// =============================================================================

// GET /api/audit
#[utoipa::path(
    get,
    path = "/api/audit",
    tag = "Administração",
    params(
        ("entity" = Option<String>, Query),
        ("entityId" = Option<String>, Query),
        ("limit" = Option<i64>, Query)
    ),
    responses((status = 200, description = "Trilha de auditoria", body = Vec<AuditEntry>))
)]
pub async fn list_audit(
    State(app_state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query.limit.unwrap_or(100).clamp(1, 500);
    let entries = app_state
        .admin_repo
        .list_audit(query.entity.as_deref(), query.entity_id.as_deref(), limit)
        .await?;
    Ok((StatusCode::OK, Json(entries)))
}

// =============================================================================
//  REDES SOCIAIS
// =============================================================================

// GET /api/social-media
#[utoipa::path(
    get,
    path = "/api/social-media",
    tag = "Administração",
    responses((status = 200, description = "Links de redes sociais", body = Vec<SocialLink>))
)]
pub async fn list_social(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let links = app_state.admin_repo.list_social().await?;
    Ok((StatusCode::OK, Json(links)))
}

// POST /api/social-media
#[utoipa::path(
    post,
    path = "/api/social-media",
    tag = "Administração",
    request_body = SocialPayload,
    responses((status = 201, description = "Link criado", body = SocialLink))
)]
pub async fn create_social(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Json(payload): Json<SocialPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let link = app_state
        .admin_repo
        .create_social(&payload.platform, &payload.url)
        .await?;
    app_state
        .audit
        .record(Some(&user), "create", "social_link", link.id, None);
    Ok((StatusCode::CREATED, Json(link)))
}

// PUT /api/social-media/{id}
#[utoipa::path(
    put,
    path = "/api/social-media/{id}",
    tag = "Administração",
    params(("id" = Uuid, Path)),
    request_body = SocialPayload,
    responses((status = 200, description = "Link atualizado", body = SocialLink))
)]
pub async fn update_social(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
    Json(payload): Json<SocialPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let link = app_state
        .admin_repo
        .update_social(id, &payload.platform, &payload.url, payload.active)
        .await?
        .ok_or(AppError::NotFound("Link de rede social"))?;
    app_state
        .audit
        .record(Some(&user), "update", "social_link", link.id, None);
    Ok((StatusCode::OK, Json(link)))
}

// DELETE /api/social-media/{id}
#[utoipa::path(
    delete,
    path = "/api/social-media/{id}",
    tag = "Administração",
    params(("id" = Uuid, Path)),
    responses((status = 204, description = "Link removido"))
)]
pub async fn delete_social(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let removed = app_state.admin_repo.delete_social(id).await?;
    if removed == 0 {
        return Err(AppError::NotFound("Link de rede social"));
    }
    app_state
        .audit
        .record(Some(&user), "delete", "social_link", id, None);
    Ok(StatusCode::NO_CONTENT)
}
