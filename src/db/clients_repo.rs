// src/db/clients_repo.rs

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::clients::{Client, ClientAddress, PersonType},
};

// Colunas expostas do cadastro. Os campos de redefinição de senha ficam de
// fora: só as queries do portal tocam neles.
const CLIENT_COLUMNS: &str =
    "id, person_type, doc_number, name, email, phone, addresses, password_hash, created_at, updated_at";

#[derive(Clone)]
pub struct ClientsRepository {
    pool: PgPool,
}

impl ClientsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Client>, AppError> {
        let clients = match search {
            Some(q) => {
                let term = format!("%{}%", q);
                sqlx::query_as::<_, Client>(&format!(
                    "SELECT {CLIENT_COLUMNS} FROM clients \
                     WHERE name ILIKE $1 OR doc_number ILIKE $1 OR email ILIKE $1 \
                     ORDER BY name ASC LIMIT 100"
                ))
                .bind(term)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Client>(&format!(
                    "SELECT {CLIENT_COLUMNS} FROM clients ORDER BY name ASC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(clients)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(client)
    }

    /// Busca para a heurística de de-duplicação do funil (documento já
    /// normalizado para dígitos).
    pub async fn find_by_doc_number<'e, E>(&self, executor: E, doc_number: &str) -> Result<Option<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE doc_number = $1"
        ))
        .bind(doc_number)
        .fetch_optional(executor)
        .await?;
        Ok(client)
    }

    pub async fn find_by_email<'e, E>(&self, executor: E, email: &str) -> Result<Option<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(executor)
        .await?;
        Ok(client)
    }

    pub async fn find_by_phone_digits<'e, E>(&self, executor: E, digits: &str) -> Result<Option<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients \
             WHERE regexp_replace(COALESCE(phone, ''), '\\D', '', 'g') = $1 AND $1 <> ''"
        ))
        .bind(digits)
        .fetch_optional(executor)
        .await?;
        Ok(client)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        person_type: PersonType,
        doc_number: Option<&str>,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        addresses: &[ClientAddress],
    ) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Client>(&format!(
            "INSERT INTO clients (person_type, doc_number, name, email, phone, addresses) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(person_type)
        .bind(doc_number)
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(Json(addresses))
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // Converte violação do índice único em um erro mais amigável
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict("CPF/CNPJ já cadastrado.".to_string());
                }
            }
            e.into()
        })
    }

    pub async fn update(
        &self,
        id: Uuid,
        person_type: PersonType,
        doc_number: Option<&str>,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        addresses: &[ClientAddress],
    ) -> Result<Option<Client>, AppError> {
        sqlx::query_as::<_, Client>(&format!(
            "UPDATE clients \
             SET person_type = $2, doc_number = $3, name = $4, email = $5, phone = $6, \
                 addresses = $7, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(id)
        .bind(person_type)
        .bind(doc_number)
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(Json(addresses))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict("CPF/CNPJ já cadastrado.".to_string());
                }
            }
            e.into()
        })
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_foreign_key_violation() {
                        return AppError::Conflict(
                            "Cliente possui orçamentos ou ordens de serviço vinculados.".to_string(),
                        );
                    }
                }
                AppError::from(e)
            })?;
        Ok(result.rows_affected())
    }

    // --- Portal do cliente ---

    pub async fn set_password(&self, id: Uuid, password_hash: &str) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE clients \
             SET password_hash = $2, reset_token_hash = NULL, reset_token_expires_at = NULL, \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE clients SET reset_token_hash = $2, reset_token_expires_at = $3, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Só encontra tokens ainda válidos; os expirados são tratados como inexistentes.
    pub async fn find_by_reset_token(&self, token_hash: &str) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients \
             WHERE reset_token_hash = $1 AND reset_token_expires_at > NOW()"
        ))
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;
        Ok(client)
    }
}
