// src/handlers/leads.rs

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
    models::leads::{LeadConversion, LeadStatus, OrcamentoRequest, PendingCount},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CapturePayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    #[schema(example = "João Batista")]
    pub name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub doc_number: Option<String>,
    pub city: Option<String>,
    #[validate(length(min = 5, message = "Descreva o serviço desejado."))]
    #[schema(example = "Preciso de 12 estacas para fundação de sobrado")]
    pub service_description: String,
    #[schema(example = "instagram")]
    pub source: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLeadsQuery {
    pub status: Option<LeadStatus>,
}

// POST /api/orcamento-requests (público)
#[utoipa::path(
    post,
    path = "/api/orcamento-requests",
    tag = "Funil",
    request_body = CapturePayload,
    responses((status = 201, description = "Pedido registrado", body = OrcamentoRequest))
)]
pub async fn capture(
    State(app_state): State<AppState>,
    Json(payload): Json<CapturePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let request = app_state
        .leads_service
        .capture(
            &payload.name,
            payload.email.as_deref(),
            payload.phone.as_deref(),
            payload.doc_number.as_deref(),
            payload.city.as_deref(),
            &payload.service_description,
            payload.source.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(request)))
}

// GET /api/orcamento-requests
#[utoipa::path(
    get,
    path = "/api/orcamento-requests",
    tag = "Funil",
    params(("status" = Option<LeadStatus>, Query)),
    responses((status = 200, description = "Pedidos de orçamento", body = Vec<OrcamentoRequest>))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    Query(query): Query<ListLeadsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let requests = app_state.leads_service.list(query.status).await?;
    Ok((StatusCode::OK, Json(requests)))
}

// GET /api/orcamento-requests/{id}
#[utoipa::path(
    get,
    path = "/api/orcamento-requests/{id}",
    tag = "Funil",
    params(("id" = Uuid, Path)),
    responses((status = 200, description = "Pedido", body = OrcamentoRequest))
)]
pub async fn get_lead(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let request = app_state.leads_service.get(id).await?;
    Ok((StatusCode::OK, Json(request)))
}

// POST /api/orcamento-requests/{id}/convert
#[utoipa::path(
    post,
    path = "/api/orcamento-requests/{id}/convert",
    tag = "Funil",
    params(("id" = Uuid, Path)),
    responses(
        (status = 201, description = "Cliente + orçamento criados", body = LeadConversion),
        (status = 409, description = "Pedido já convertido")
    )
)]
pub async fn convert_lead(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let conversion = app_state.leads_service.convert(id).await?;
    app_state.audit.record(
        Some(&user),
        "convert",
        "orcamento_request",
        id,
        Some(serde_json::json!({
            "clientId": conversion.client.id,
            "budgetId": conversion.budget.id,
            "clientReused": conversion.client_reused,
        })),
    );
    Ok((StatusCode::CREATED, Json(conversion)))
}

// POST /api/orcamento-requests/{id}/discard
#[utoipa::path(
    post,
    path = "/api/orcamento-requests/{id}/discard",
    tag = "Funil",
    params(("id" = Uuid, Path)),
    responses((status = 200, description = "Pedido descartado", body = OrcamentoRequest))
)]
pub async fn discard_lead(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let request = app_state.leads_service.discard(id).await?;
    app_state
        .audit
        .record(Some(&user), "discard", "orcamento_request", id, None);
    Ok((StatusCode::OK, Json(request)))
}

// DELETE /api/orcamento-requests/{id}
#[utoipa::path(
    delete,
    path = "/api/orcamento-requests/{id}",
    tag = "Funil",
    params(("id" = Uuid, Path)),
    responses((status = 204, description = "Pedido removido"))
)]
pub async fn delete_lead(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.leads_service.delete(id).await?;
    app_state
        .audit
        .record(Some(&user), "delete", "orcamento_request", id, None);
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/orcamento-requests/watch (SSE)
#[utoipa::path(
    get,
    path = "/api/orcamento-requests/watch",
    tag = "Funil",
    responses((status = 200, description = "Stream de eventos do funil (text/event-stream)"))
)]
pub async fn watch_leads(
    State(app_state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = app_state.events.subscribe_leads();
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

// GET /api/orcamento-requests/count/watch (SSE)
#[utoipa::path(
    get,
    path = "/api/orcamento-requests/count/watch",
    tag = "Funil",
    responses((status = 200, description = "Stream com a contagem de pendentes (text/event-stream)"))
)]
pub async fn watch_pending_count(
    State(app_state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let service = app_state.leads_service.clone();
    let initial_service = service.clone();
    let rx = app_state.events.subscribe_leads();

    // Emite a contagem atual na conexão e recalcula a cada evento do funil
    let initial = futures::stream::once(async move {
        initial_service.count_pending().await.unwrap_or(0)
    });
    let updates = BroadcastStream::new(rx).then(move |_| {
        let service = service.clone();
        async move { service.count_pending().await.unwrap_or(0) }
    });

    let stream = initial.chain(updates).filter_map(|pending| async move {
        Event::default()
            .json_data(&PendingCount { pending })
            .ok()
            .map(Ok::<_, Infallible>)
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("keepalive"),
    )
}
