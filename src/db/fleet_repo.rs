// src/db/fleet_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::fleet::{Equipment, Machine, MaintenanceRecord},
};

#[derive(Clone)]
pub struct FleetRepository {
    pool: PgPool,
}

impl FleetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // --- Máquinas ---

    pub async fn list_machines(&self) -> Result<Vec<Machine>, AppError> {
        let machines = sqlx::query_as::<_, Machine>(
            "SELECT id, name, model, plate, status, created_at, updated_at FROM machines ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(machines)
    }

    pub async fn find_machine(&self, id: Uuid) -> Result<Option<Machine>, AppError> {
        let machine = sqlx::query_as::<_, Machine>(
            "SELECT id, name, model, plate, status, created_at, updated_at FROM machines WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(machine)
    }

    pub async fn create_machine(
        &self,
        name: &str,
        model: Option<&str>,
        plate: Option<&str>,
        status: &str,
    ) -> Result<Machine, AppError> {
        let machine = sqlx::query_as::<_, Machine>(
            "INSERT INTO machines (name, model, plate, status) VALUES ($1, $2, $3, $4) \
             RETURNING id, name, model, plate, status, created_at, updated_at",
        )
        .bind(name)
        .bind(model)
        .bind(plate)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(machine)
    }

    pub async fn update_machine(
        &self,
        id: Uuid,
        name: &str,
        model: Option<&str>,
        plate: Option<&str>,
        status: &str,
    ) -> Result<Option<Machine>, AppError> {
        let machine = sqlx::query_as::<_, Machine>(
            "UPDATE machines SET name = $2, model = $3, plate = $4, status = $5, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING id, name, model, plate, status, created_at, updated_at",
        )
        .bind(id)
        .bind(name)
        .bind(model)
        .bind(plate)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(machine)
    }

    pub async fn delete_machine(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM machines WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_foreign_key_violation() {
                        return AppError::Conflict(
                            "Máquina vinculada a uma equipe.".to_string(),
                        );
                    }
                }
                AppError::from(e)
            })?;
        Ok(result.rows_affected())
    }

    // --- Equipamentos ---

    pub async fn list_equipment(&self) -> Result<Vec<Equipment>, AppError> {
        let equipment = sqlx::query_as::<_, Equipment>(
            "SELECT id, name, serial_number, status, notes, created_at, updated_at \
             FROM equipment ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(equipment)
    }

    pub async fn create_equipment(
        &self,
        name: &str,
        serial_number: Option<&str>,
        status: &str,
        notes: Option<&str>,
    ) -> Result<Equipment, AppError> {
        let equipment = sqlx::query_as::<_, Equipment>(
            "INSERT INTO equipment (name, serial_number, status, notes) VALUES ($1, $2, $3, $4) \
             RETURNING id, name, serial_number, status, notes, created_at, updated_at",
        )
        .bind(name)
        .bind(serial_number)
        .bind(status)
        .bind(notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(equipment)
    }

    pub async fn update_equipment(
        &self,
        id: Uuid,
        name: &str,
        serial_number: Option<&str>,
        status: &str,
        notes: Option<&str>,
    ) -> Result<Option<Equipment>, AppError> {
        let equipment = sqlx::query_as::<_, Equipment>(
            "UPDATE equipment \
             SET name = $2, serial_number = $3, status = $4, notes = $5, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING id, name, serial_number, status, notes, created_at, updated_at",
        )
        .bind(id)
        .bind(name)
        .bind(serial_number)
        .bind(status)
        .bind(notes)
        .fetch_optional(&self.pool)
        .await?;
        Ok(equipment)
    }

    pub async fn delete_equipment(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // --- Manutenções ---

    pub async fn list_maintenance(&self, machine_id: Uuid) -> Result<Vec<MaintenanceRecord>, AppError> {
        let records = sqlx::query_as::<_, MaintenanceRecord>(
            "SELECT id, machine_id, performed_at, cost, description, created_at \
             FROM maintenance_records WHERE machine_id = $1 ORDER BY performed_at DESC",
        )
        .bind(machine_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    pub async fn create_maintenance(
        &self,
        machine_id: Uuid,
        performed_at: NaiveDate,
        cost: Decimal,
        description: &str,
    ) -> Result<MaintenanceRecord, AppError> {
        sqlx::query_as::<_, MaintenanceRecord>(
            "INSERT INTO maintenance_records (machine_id, performed_at, cost, description) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, machine_id, performed_at, cost, description, created_at",
        )
        .bind(machine_id)
        .bind(performed_at)
        .bind(cost)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_foreign_key_violation() {
                    return AppError::NotFound("Máquina");
                }
            }
            e.into()
        })
    }

    pub async fn delete_maintenance(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM maintenance_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
