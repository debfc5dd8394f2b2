// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{admin::User, clients::Client},
};

/// Guard da equipe interna: os headers `x-user-id` / `x-user-email` precisam
/// apontar para um usuário ativo.
pub async fn staff_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let headers = request.headers();

    let user_id = headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok());
    let email = headers
        .get("x-user-email")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let (Some(user_id), Some(email)) = (user_id, email) else {
        return Err(AppError::Unauthenticated);
    };

    let user = app_state
        .admin_repo
        .find_user(user_id)
        .await?
        .ok_or(AppError::Unauthenticated)?;

    if !user.active || !user.email.eq_ignore_ascii_case(&email) {
        return Err(AppError::Unauthenticated);
    }

    // Insere o usuário nos "extensions" da requisição
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Guard do portal do cliente: bearer JWT emitido no login.
pub async fn portal_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            let client = app_state.portal_service.validate_token(token).await?;
            request.extensions_mut().insert(client);
            return Ok(next.run(request).await);
        }
    }

    Err(AppError::InvalidToken)
}

// Extratores para obter a identidade autenticada diretamente nos handlers

pub struct CurrentStaff(pub User);

impl<S> FromRequestParts<S> for CurrentStaff
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(CurrentStaff)
            .ok_or(AppError::Unauthenticated)
    }
}

pub struct PortalClient(pub Client);

impl<S> FromRequestParts<S> for PortalClient
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Client>()
            .cloned()
            .map(PortalClient)
            .ok_or(AppError::InvalidToken)
    }
}
