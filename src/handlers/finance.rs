// src/handlers/finance.rs

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
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentStaff,
    models::finance::{CashKind, CashTransaction, Cashier, CashierSummary},
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenCashierPayload {
    #[schema(example = 200.0)]
    #[serde(default)]
    pub opening_balance: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CashTransactionPayload {
    pub kind: CashKind,
    #[schema(example = 350.0)]
    pub amount: Decimal,
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,
    pub job_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsQuery {
    pub cashier_id: Option<Uuid>,
}

// POST /api/cashiers/open
#[utoipa::path(
    post,
    path = "/api/cashiers/open",
    tag = "Caixa",
    request_body = OpenCashierPayload,
    responses(
        (status = 201, description = "Caixa aberto", body = Cashier),
        (status = 409, description = "Já existe um caixa aberto")
    )
)]
pub async fn open_cashier(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Json(payload): Json<OpenCashierPayload>,
) -> Result<impl IntoResponse, AppError> {
    let cashier = app_state
        .finance_service
        .open_session(Some(user.id), &user.name, payload.opening_balance)
        .await?;
    app_state
        .audit
        .record(Some(&user), "open", "cashier", cashier.id, None);
    Ok((StatusCode::CREATED, Json(cashier)))
}

// POST /api/cashiers/{id}/close
#[utoipa::path(
    post,
    path = "/api/cashiers/{id}/close",
    tag = "Caixa",
    params(("id" = Uuid, Path)),
    responses((status = 200, description = "Caixa fechado com o resumo", body = CashierSummary))
)]
pub async fn close_cashier(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.finance_service.close_session(id).await?;
    app_state.audit.record(Some(&user), "close", "cashier", id, None);
    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/cashiers
#[utoipa::path(
    get,
    path = "/api/cashiers",
    tag = "Caixa",
    responses((status = 200, description = "Sessões de caixa", body = Vec<Cashier>))
)]
pub async fn list_cashiers(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let cashiers = app_state.finance_service.list_sessions().await?;
    Ok((StatusCode::OK, Json(cashiers)))
}

// GET /api/cashiers/current
#[utoipa::path(
    get,
    path = "/api/cashiers/current",
    tag = "Caixa",
    responses(
        (status = 200, description = "Sessão aberta com totais", body = CashierSummary),
        (status = 404, description = "Não há caixa aberto")
    )
)]
pub async fn current_cashier(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state
        .finance_service
        .current_session()
        .await?
        .ok_or(AppError::NotFound("Caixa aberto"))?;
    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/cashiers/{id}
#[utoipa::path(
    get,
    path = "/api/cashiers/{id}",
    tag = "Caixa",
    params(("id" = Uuid, Path)),
    responses((status = 200, description = "Resumo da sessão", body = CashierSummary))
)]
pub async fn cashier_summary(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.finance_service.session_summary(id).await?;
    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/cash-transactions
#[utoipa::path(
    get,
    path = "/api/cash-transactions",
    tag = "Caixa",
    params(("cashierId" = Option<Uuid>, Query)),
    responses((status = 200, description = "Lançamentos", body = Vec<CashTransaction>))
)]
pub async fn list_cash_transactions(
    State(app_state): State<AppState>,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let transactions = app_state
        .finance_service
        .list_transactions(query.cashier_id)
        .await?;
    Ok((StatusCode::OK, Json(transactions)))
}

// POST /api/cash-transactions
#[utoipa::path(
    post,
    path = "/api/cash-transactions",
    tag = "Caixa",
    request_body = CashTransactionPayload,
    responses(
        (status = 201, description = "Lançamento criado", body = CashTransaction),
        (status = 400, description = "Não há caixa aberto"),
        (status = 409, description = "Entrada duplicada para a OS")
    )
)]
pub async fn create_cash_transaction(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Json(payload): Json<CashTransactionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let transaction = app_state
        .finance_service
        .create_transaction(
            payload.kind,
            payload.amount,
            &payload.description,
            payload.job_id,
            Some(user.id),
        )
        .await?;
    app_state
        .audit
        .record(Some(&user), "create", "cash_transaction", transaction.id, None);
    Ok((StatusCode::CREATED, Json(transaction)))
}

// DELETE /api/cash-transactions/{id}
#[utoipa::path(
    delete,
    path = "/api/cash-transactions/{id}",
    tag = "Caixa",
    params(("id" = Uuid, Path)),
    responses((status = 204, description = "Lançamento removido"))
)]
pub async fn delete_cash_transaction(
    State(app_state): State<AppState>,
    CurrentStaff(user): CurrentStaff,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.finance_service.delete_transaction(id).await?;
    app_state
        .audit
        .record(Some(&user), "delete", "cash_transaction", id, None);
    Ok(StatusCode::NO_CONTENT)
}
