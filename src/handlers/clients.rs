// src/handlers/clients.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::IntoResponse,
    Json,
};
use futures::stream::Stream;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::json;
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
    models::clients::{Client, ClientAddress, PersonType},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListClientsQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientPayload {
    pub person_type: PersonType,

    #[validate(length(min = 1, message = "O CPF/CNPJ é obrigatório."))]
    #[schema(example = "123.456.789-00")]
    pub doc_number: String,

    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    #[schema(example = "Construtora Alvorada Ltda")]
    pub name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub phone: Option<String>,

    #[serde(default)]
    pub addresses: Vec<ClientAddress>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortalPasswordPayload {
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// GET /api/clients
#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "Clientes",
    params(("search" = Option<String>, Query, description = "Nome, documento ou e-mail")),
    responses((status = 200, description = "Lista de clientes", body = Vec<Client>))
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    Query(query): Query<ListClientsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let clients = app_state
        .clients_service
        .list(query.search.as_deref())
        .await?;
    Ok((StatusCode::OK, Json(clients)))
}

// GET /api/clients/{id}
#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path)),
    responses(
        (status = 200, description = "Cliente", body = Client),
        (status = 404, description = "Não encontrado")
    )
)]
pub async fn get_client(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let client = app_state.clients_service.get(id).await?;
    Ok((StatusCode::OK, Json(client)))
}

// POST /api/clients
#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "Clientes",
    request_body = ClientPayload,
    responses(
        (status = 201, description = "Cliente criado", body = Client),
        (status = 409, description = "CPF/CNPJ já cadastrado")
    )
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Json(payload): Json<ClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let client = app_state
        .clients_service
        .create(
            payload.person_type,
            &payload.doc_number,
            &payload.name,
            payload.email.as_deref(),
            payload.phone.as_deref(),
            payload.addresses,
        )
        .await?;

    app_state
        .audit
        .record(Some(&user), "create", "client", client.id, None);
    Ok((StatusCode::CREATED, Json(client)))
}

// PUT /api/clients/{id}
#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path)),
    request_body = ClientPayload,
    responses((status = 200, description = "Cliente atualizado", body = Client))
)]
pub async fn update_client(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let client = app_state
        .clients_service
        .update(
            id,
            payload.person_type,
            &payload.doc_number,
            &payload.name,
            payload.email.as_deref(),
            payload.phone.as_deref(),
            payload.addresses,
        )
        .await?;

    app_state
        .audit
        .record(Some(&user), "update", "client", client.id, None);
    Ok((StatusCode::OK, Json(client)))
}

// DELETE /api/clients/{id}
#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path)),
    responses((status = 204, description = "Cliente removido"))
)]
pub async fn delete_client(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.clients_service.delete(id).await?;
    app_state.audit.record(Some(&user), "delete", "client", id, None);
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/clients/{id}/portal-password
#[utoipa::path(
    post,
    path = "/api/clients/{id}/portal-password",
    tag = "Clientes",
    params(("id" = Uuid, Path)),
    request_body = PortalPasswordPayload,
    responses((status = 200, description = "Senha do portal definida"))
)]
pub async fn set_portal_password(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
    Json(payload): Json<PortalPasswordPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    // Garante o 404 antes de mexer na senha
    app_state.clients_service.get(id).await?;
    app_state.portal_service.set_password(id, &payload.password).await?;

    app_state
        .audit
        .record(Some(&user), "set_portal_password", "client", id, None);
    Ok((StatusCode::OK, Json(json!({ "ok": true }))))
}

// GET /api/clients/watch (SSE)
#[utoipa::path(
    get,
    path = "/api/clients/watch",
    tag = "Clientes",
    responses((status = 200, description = "Stream de eventos de clientes (text/event-stream)"))
)]
pub async fn watch_clients(
    State(app_state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = app_state.events.subscribe_clients();
    let stream = BroadcastStream::new(rx).filter_map(|event| async move {
        let event = event.ok()?;
        Event::default().json_data(&event).ok().map(Ok::<_, Infallible>)
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("keepalive"),
    )
}
