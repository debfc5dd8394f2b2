// src/services/fleet_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::FleetRepository,
    models::fleet::{Equipment, Machine, MaintenanceRecord},
};

#[derive(Clone)]
pub struct FleetService {
    repo: FleetRepository,
}

impl FleetService {
    pub fn new(repo: FleetRepository) -> Self {
        Self { repo }
    }

    // --- Máquinas ---

    pub async fn list_machines(&self) -> Result<Vec<Machine>, AppError> {
        self.repo.list_machines().await
    }

    pub async fn get_machine(&self, id: Uuid) -> Result<Machine, AppError> {
        self.repo
            .find_machine(id)
            .await?
            .ok_or(AppError::NotFound("Máquina"))
    }

    pub async fn create_machine(
        &self,
        name: &str,
        model: Option<&str>,
        plate: Option<&str>,
        status: &str,
    ) -> Result<Machine, AppError> {
        self.repo.create_machine(name, model, plate, status).await
    }

    pub async fn update_machine(
        &self,
        id: Uuid,
        name: &str,
        model: Option<&str>,
        plate: Option<&str>,
        status: &str,
    ) -> Result<Machine, AppError> {
        self.repo
            .update_machine(id, name, model, plate, status)
            .await?
            .ok_or(AppError::NotFound("Máquina"))
    }

    pub async fn delete_machine(&self, id: Uuid) -> Result<(), AppError> {
        let removed = self.repo.delete_machine(id).await?;
        if removed == 0 {
            return Err(AppError::NotFound("Máquina"));
        }
        Ok(())
    }

    // --- Equipamentos ---

    pub async fn list_equipment(&self) -> Result<Vec<Equipment>, AppError> {
        self.repo.list_equipment().await
    }

    pub async fn create_equipment(
        &self,
        name: &str,
        serial_number: Option<&str>,
        status: &str,
        notes: Option<&str>,
    ) -> Result<Equipment, AppError> {
        self.repo
            .create_equipment(name, serial_number, status, notes)
            .await
    }

    pub async fn update_equipment(
        &self,
        id: Uuid,
        name: &str,
        serial_number: Option<&str>,
        status: &str,
        notes: Option<&str>,
    ) -> Result<Equipment, AppError> {
        self.repo
            .update_equipment(id, name, serial_number, status, notes)
            .await?
            .ok_or(AppError::NotFound("Equipamento"))
    }

    pub async fn delete_equipment(&self, id: Uuid) -> Result<(), AppError> {
        let removed = self.repo.delete_equipment(id).await?;
        if removed == 0 {
            return Err(AppError::NotFound("Equipamento"));
        }
        Ok(())
    }

    // --- Manutenções ---

    pub async fn list_maintenance(&self, machine_id: Uuid) -> Result<Vec<MaintenanceRecord>, AppError> {
        self.get_machine(machine_id).await?;
        self.repo.list_maintenance(machine_id).await
    }

    pub async fn create_maintenance(
        &self,
        machine_id: Uuid,
        performed_at: NaiveDate,
        cost: Decimal,
        description: &str,
    ) -> Result<MaintenanceRecord, AppError> {
        if cost < Decimal::ZERO {
            return Err(AppError::BusinessRule(
                "O custo da manutenção não pode ser negativo.".to_string(),
            ));
        }
        self.repo
            .create_maintenance(machine_id, performed_at, cost, description)
            .await
    }

    pub async fn delete_maintenance(&self, id: Uuid) -> Result<(), AppError> {
        let removed = self.repo.delete_maintenance(id).await?;
        if removed == 0 {
            return Err(AppError::NotFound("Manutenção"));
        }
        Ok(())
    }
}
