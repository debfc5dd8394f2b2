// src/db/catalog_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::catalog::CatalogEntry};

const CATALOG_COLUMNS: &str = "id, diameter_mm, soil_type, access_difficulty, price_per_meter, \
     minutes_per_meter, created_at, updated_at";

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<CatalogEntry>, AppError> {
        let entries = sqlx::query_as::<_, CatalogEntry>(&format!(
            "SELECT {CATALOG_COLUMNS} FROM catalog_entries \
             ORDER BY diameter_mm ASC, soil_type ASC, access_difficulty ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    /// Resolve a chave tripla usada na precificação de itens.
    pub async fn find_by_key(
        &self,
        diameter_mm: i32,
        soil_type: &str,
        access_difficulty: &str,
    ) -> Result<Option<CatalogEntry>, AppError> {
        let entry = sqlx::query_as::<_, CatalogEntry>(&format!(
            "SELECT {CATALOG_COLUMNS} FROM catalog_entries \
             WHERE diameter_mm = $1 AND soil_type = $2 AND access_difficulty = $3"
        ))
        .bind(diameter_mm)
        .bind(soil_type)
        .bind(access_difficulty)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    pub async fn create(
        &self,
        diameter_mm: i32,
        soil_type: &str,
        access_difficulty: &str,
        price_per_meter: Decimal,
        minutes_per_meter: Decimal,
    ) -> Result<CatalogEntry, AppError> {
        sqlx::query_as::<_, CatalogEntry>(&format!(
            "INSERT INTO catalog_entries (diameter_mm, soil_type, access_difficulty, price_per_meter, minutes_per_meter) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {CATALOG_COLUMNS}"
        ))
        .bind(diameter_mm)
        .bind(soil_type)
        .bind(access_difficulty)
        .bind(price_per_meter)
        .bind(minutes_per_meter)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict(
                        "Já existe uma variação de preço para esta combinação.".to_string(),
                    );
                }
            }
            e.into()
        })
    }

    pub async fn update(
        &self,
        id: Uuid,
        diameter_mm: i32,
        soil_type: &str,
        access_difficulty: &str,
        price_per_meter: Decimal,
        minutes_per_meter: Decimal,
    ) -> Result<Option<CatalogEntry>, AppError> {
        sqlx::query_as::<_, CatalogEntry>(&format!(
            "UPDATE catalog_entries \
             SET diameter_mm = $2, soil_type = $3, access_difficulty = $4, price_per_meter = $5, \
                 minutes_per_meter = $6, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {CATALOG_COLUMNS}"
        ))
        .bind(id)
        .bind(diameter_mm)
        .bind(soil_type)
        .bind(access_difficulty)
        .bind(price_per_meter)
        .bind(minutes_per_meter)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict(
                        "Já existe uma variação de preço para esta combinação.".to_string(),
                    );
                }
            }
            e.into()
        })
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM catalog_entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
