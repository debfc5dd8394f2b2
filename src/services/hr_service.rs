// src/services/hr_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::HrRepository,
    models::hr::{Employee, Team},
};

#[derive(Clone)]
pub struct HrService {
    repo: HrRepository,
}

impl HrService {
    pub fn new(repo: HrRepository) -> Self {
        Self { repo }
    }

    // --- Funcionários ---

    pub async fn list_employees(&self) -> Result<Vec<Employee>, AppError> {
        self.repo.list_employees().await
    }

    pub async fn get_employee(&self, id: Uuid) -> Result<Employee, AppError> {
        self.repo
            .find_employee(id)
            .await?
            .ok_or(AppError::NotFound("Funcionário"))
    }

    pub async fn create_employee(
        &self,
        name: &str,
        role: &str,
        phone: Option<&str>,
        email: Option<&str>,
        status: &str,
    ) -> Result<Employee, AppError> {
        self.repo.create_employee(name, role, phone, email, status).await
    }

    pub async fn update_employee(
        &self,
        id: Uuid,
        name: &str,
        role: &str,
        phone: Option<&str>,
        email: Option<&str>,
        status: &str,
    ) -> Result<Employee, AppError> {
        self.repo
            .update_employee(id, name, role, phone, email, status)
            .await?
            .ok_or(AppError::NotFound("Funcionário"))
    }

    pub async fn delete_employee(&self, id: Uuid) -> Result<(), AppError> {
        if self.repo.teams_with_member(id).await? > 0 {
            return Err(AppError::Conflict(
                "Funcionário vinculado a uma equipe.".to_string(),
            ));
        }
        let removed = self.repo.delete_employee(id).await?;
        if removed == 0 {
            return Err(AppError::NotFound("Funcionário"));
        }
        Ok(())
    }

    // --- Equipes ---

    pub async fn list_teams(&self) -> Result<Vec<Team>, AppError> {
        self.repo.list_teams().await
    }

    pub async fn get_team(&self, id: Uuid) -> Result<Team, AppError> {
        self.repo.find_team(id).await?.ok_or(AppError::NotFound("Equipe"))
    }

    /// Denormaliza os nomes dos membros na própria equipe.
    pub async fn create_team(
        &self,
        name: &str,
        machine_id: Option<Uuid>,
        member_ids: Vec<Uuid>,
    ) -> Result<Team, AppError> {
        let member_names = self.resolve_members(&member_ids).await?;
        self.repo
            .create_team(name, machine_id, &member_ids, &member_names)
            .await
    }

    pub async fn update_team(
        &self,
        id: Uuid,
        name: &str,
        machine_id: Option<Uuid>,
        member_ids: Vec<Uuid>,
        active: bool,
    ) -> Result<Team, AppError> {
        let member_names = self.resolve_members(&member_ids).await?;
        self.repo
            .update_team(id, name, machine_id, &member_ids, &member_names, active)
            .await?
            .ok_or(AppError::NotFound("Equipe"))
    }

    pub async fn delete_team(&self, id: Uuid) -> Result<(), AppError> {
        let removed = self.repo.delete_team(id).await?;
        if removed == 0 {
            return Err(AppError::NotFound("Equipe"));
        }
        Ok(())
    }

    async fn resolve_members(&self, member_ids: &[Uuid]) -> Result<Vec<String>, AppError> {
        let names = self.repo.employee_names(member_ids).await?;
        if names.len() != member_ids.len() {
            return Err(AppError::NotFound("Funcionário"));
        }
        Ok(names)
    }
}
