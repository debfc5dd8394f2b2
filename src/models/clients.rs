// src/models/clients.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "person_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "snake_case")]
pub enum PersonType {
    Fisica,
    Juridica,
}

/// Endereço embutido no cadastro do cliente (JSONB).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientAddress {
    #[schema(example = "Obra - Condomínio Horizonte")]
    pub label: Option<String>,
    #[schema(example = "Rua das Palmeiras, 120")]
    pub street: String,
    pub district: Option<String>,
    #[schema(example = "Campinas")]
    pub city: String,
    #[schema(example = "SP")]
    pub state: String,
    #[schema(example = "13010-000")]
    pub cep: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub person_type: PersonType,
    #[schema(example = "12345678900")]
    pub doc_number: Option<String>,
    #[schema(example = "Construtora Alvorada Ltda")]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[schema(value_type = Vec<ClientAddress>)]
    pub addresses: Json<Vec<ClientAddress>>,

    // Nunca sai na API.
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password_hash: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Claims do JWT do portal do cliente.
#[derive(Debug, Serialize, Deserialize)]
pub struct PortalClaims {
    pub sub: Uuid,  // ID do cliente
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued At
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PortalAuthResponse {
    pub token: String,
}
