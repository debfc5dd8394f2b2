// src/db/travel_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::travel::{LocationCapture, TravelRule},
};

const RULE_COLUMNS: &str =
    "id, rule_order, up_to_km, price, round_trip, active, created_at, updated_at";
const CAPTURE_COLUMNS: &str =
    "id, token, label, latitude, longitude, captured_at, expires_at, created_at";

#[derive(Clone)]
pub struct TravelRepository {
    pool: PgPool,
}

impl TravelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // --- Faixas de deslocamento ---

    pub async fn list_rules(&self) -> Result<Vec<TravelRule>, AppError> {
        let rules = sqlx::query_as::<_, TravelRule>(&format!(
            "SELECT {RULE_COLUMNS} FROM travel_rules ORDER BY rule_order ASC, created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rules)
    }

    pub async fn list_active_rules(&self) -> Result<Vec<TravelRule>, AppError> {
        let rules = sqlx::query_as::<_, TravelRule>(&format!(
            "SELECT {RULE_COLUMNS} FROM travel_rules WHERE active \
             ORDER BY rule_order ASC, created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rules)
    }

    pub async fn create_rule(
        &self,
        rule_order: i32,
        up_to_km: Option<Decimal>,
        price: Decimal,
        round_trip: bool,
    ) -> Result<TravelRule, AppError> {
        let rule = sqlx::query_as::<_, TravelRule>(&format!(
            "INSERT INTO travel_rules (rule_order, up_to_km, price, round_trip) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {RULE_COLUMNS}"
        ))
        .bind(rule_order)
        .bind(up_to_km)
        .bind(price)
        .bind(round_trip)
        .fetch_one(&self.pool)
        .await?;
        Ok(rule)
    }

    pub async fn update_rule(
        &self,
        id: Uuid,
        rule_order: i32,
        up_to_km: Option<Decimal>,
        price: Decimal,
        round_trip: bool,
        active: bool,
    ) -> Result<Option<TravelRule>, AppError> {
        let rule = sqlx::query_as::<_, TravelRule>(&format!(
            "UPDATE travel_rules \
             SET rule_order = $2, up_to_km = $3, price = $4, round_trip = $5, active = $6, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {RULE_COLUMNS}"
        ))
        .bind(id)
        .bind(rule_order)
        .bind(up_to_km)
        .bind(price)
        .bind(round_trip)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rule)
    }

    pub async fn delete_rule(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM travel_rules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // --- Capturas de localização ---

    pub async fn create_capture(
        &self,
        token: &str,
        label: Option<&str>,
        expires_at: DateTime<Utc>,
        created_by: Option<Uuid>,
    ) -> Result<LocationCapture, AppError> {
        let capture = sqlx::query_as::<_, LocationCapture>(&format!(
            "INSERT INTO location_captures (token, label, expires_at, created_by) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {CAPTURE_COLUMNS}"
        ))
        .bind(token)
        .bind(label)
        .bind(expires_at)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(capture)
    }

    /// Expirados são tratados como inexistentes na leitura; a limpeza física
    /// fica com a tarefa periódica.
    pub async fn find_capture(&self, token: &str) -> Result<Option<LocationCapture>, AppError> {
        let capture = sqlx::query_as::<_, LocationCapture>(&format!(
            "SELECT {CAPTURE_COLUMNS} FROM location_captures WHERE token = $1 AND expires_at > NOW()"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(capture)
    }

    /// Grava a coordenada uma única vez (a primeira submissão vence).
    pub async fn set_coordinates(
        &self,
        token: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<LocationCapture>, AppError> {
        let capture = sqlx::query_as::<_, LocationCapture>(&format!(
            "UPDATE location_captures \
             SET latitude = $2, longitude = $3, captured_at = NOW() \
             WHERE token = $1 AND expires_at > NOW() AND captured_at IS NULL \
             RETURNING {CAPTURE_COLUMNS}"
        ))
        .bind(token)
        .bind(latitude)
        .bind(longitude)
        .fetch_optional(&self.pool)
        .await?;
        Ok(capture)
    }

    pub async fn purge_expired(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM location_captures WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
