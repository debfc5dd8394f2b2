// src/db/documents_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::documents::DocumentMeta};

const DOC_COLUMNS: &str = "id, category, owner_type, owner_id, file_name, content_type, size_bytes, \
     storage_key, uploaded_by, created_at";

#[derive(Clone)]
pub struct DocumentsRepository {
    pool: PgPool,
}

impl DocumentsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        &self,
        id: Uuid,
        category: &str,
        owner_type: Option<&str>,
        owner_id: Option<Uuid>,
        file_name: &str,
        content_type: &str,
        size_bytes: i64,
        storage_key: &str,
        uploaded_by: Option<Uuid>,
    ) -> Result<DocumentMeta, AppError> {
        let doc = sqlx::query_as::<_, DocumentMeta>(&format!(
            "INSERT INTO documents (id, category, owner_type, owner_id, file_name, content_type, \
                 size_bytes, storage_key, uploaded_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {DOC_COLUMNS}"
        ))
        .bind(id)
        .bind(category)
        .bind(owner_type)
        .bind(owner_id)
        .bind(file_name)
        .bind(content_type)
        .bind(size_bytes)
        .bind(storage_key)
        .bind(uploaded_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(doc)
    }

    pub async fn list(
        &self,
        category: Option<&str>,
        owner_type: Option<&str>,
        owner_id: Option<Uuid>,
    ) -> Result<Vec<DocumentMeta>, AppError> {
        let docs = sqlx::query_as::<_, DocumentMeta>(&format!(
            "SELECT {DOC_COLUMNS} FROM documents \
             WHERE ($1::text IS NULL OR category = $1) \
               AND ($2::text IS NULL OR owner_type = $2) \
               AND ($3::uuid IS NULL OR owner_id = $3) \
             ORDER BY created_at DESC"
        ))
        .bind(category)
        .bind(owner_type)
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(docs)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<DocumentMeta>, AppError> {
        let doc = sqlx::query_as::<_, DocumentMeta>(&format!(
            "SELECT {DOC_COLUMNS} FROM documents WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(doc)
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
