// src/db/admin_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::admin::{AuditEntry, Settings, SocialLink, User},
};

const USER_COLUMNS: &str = "id, name, email, role, active, created_at, updated_at";
const AUDIT_COLUMNS: &str = "id, user_id, user_email, action, entity, entity_id, detail, created_at";
const SOCIAL_COLUMNS: &str = "id, platform, url, active, created_at, updated_at";

#[derive(Clone)]
pub struct AdminRepository {
    pool: PgPool,
}

impl AdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // --- Usuários internos ---

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    pub async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }

    pub async fn create_user(&self, name: &str, email: &str, role: &str) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, role) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        ))
        .bind(name)
        .bind(email)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict("Este e-mail já está em uso.".to_string());
                }
            }
            e.into()
        })
    }

    pub async fn update_user(
        &self,
        id: Uuid,
        name: &str,
        email: &str,
        role: &str,
        active: bool,
    ) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET name = $2, email = $3, role = $4, active = $5, updated_at = NOW() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(role)
        .bind(active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict("Este e-mail já está em uso.".to_string());
                }
            }
            e.into()
        })
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // --- Configurações (linha única) ---

    pub async fn get_settings(&self) -> Result<Settings, AppError> {
        let settings = sqlx::query_as::<_, Settings>(
            "SELECT id, company_name, document_number, address, phone, pix_key, updated_at \
             FROM settings WHERE id = 1",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(settings)
    }

    pub async fn update_settings(
        &self,
        company_name: Option<&str>,
        document_number: Option<&str>,
        address: Option<&str>,
        phone: Option<&str>,
        pix_key: Option<&str>,
    ) -> Result<Settings, AppError> {
        let settings = sqlx::query_as::<_, Settings>(
            "UPDATE settings \
             SET company_name = $1, document_number = $2, address = $3, phone = $4, pix_key = $5, \
                 updated_at = NOW() \
             WHERE id = 1 \
             RETURNING id, company_name, document_number, address, phone, pix_key, updated_at",
        )
        .bind(company_name)
        .bind(document_number)
        .bind(address)
        .bind(phone)
        .bind(pix_key)
        .fetch_one(&self.pool)
        .await?;
        Ok(settings)
    }

    // --- Auditoria ---

    pub async fn insert_audit(
        &self,
        user_id: Option<Uuid>,
        user_email: Option<&str>,
        action: &str,
        entity: &str,
        entity_id: Option<&str>,
        detail: Option<&serde_json::Value>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO audit_log (user_id, user_email, action, entity, entity_id, detail) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user_id)
        .bind(user_email)
        .bind(action)
        .bind(entity)
        .bind(entity_id)
        .bind(detail)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn list_audit(
        &self,
        entity: Option<&str>,
        entity_id: Option<&str>,
        limit: i64,
    ) -> Result<Vec<AuditEntry>, AppError> {
        let entries = sqlx::query_as::<_, AuditEntry>(&format!(
            "SELECT {AUDIT_COLUMNS} FROM audit_log \
             WHERE ($1::text IS NULL OR entity = $1) \
               AND ($2::text IS NULL OR entity_id = $2) \
             ORDER BY created_at DESC \
             LIMIT $3"
        ))
        .bind(entity)
        .bind(entity_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    // --- Redes sociais ---

    pub async fn list_social(&self) -> Result<Vec<SocialLink>, AppError> {
        let links = sqlx::query_as::<_, SocialLink>(&format!(
            "SELECT {SOCIAL_COLUMNS} FROM social_links ORDER BY platform ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(links)
    }

    pub async fn create_social(&self, platform: &str, url: &str) -> Result<SocialLink, AppError> {
        let link = sqlx::query_as::<_, SocialLink>(&format!(
            "INSERT INTO social_links (platform, url) VALUES ($1, $2) RETURNING {SOCIAL_COLUMNS}"
        ))
        .bind(platform)
        .bind(url)
        .fetch_one(&self.pool)
        .await?;
        Ok(link)
    }

    pub async fn update_social(
        &self,
        id: Uuid,
        platform: &str,
        url: &str,
        active: bool,
    ) -> Result<Option<SocialLink>, AppError> {
        let link = sqlx::query_as::<_, SocialLink>(&format!(
            "UPDATE social_links SET platform = $2, url = $3, active = $4, updated_at = NOW() \
             WHERE id = $1 RETURNING {SOCIAL_COLUMNS}"
        ))
        .bind(id)
        .bind(platform)
        .bind(url)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(link)
    }

    pub async fn delete_social(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM social_links WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
