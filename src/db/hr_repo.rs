// src/db/hr_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::hr::{Employee, Team},
};

const EMPLOYEE_COLUMNS: &str = "id, name, role, phone, email, status, created_at, updated_at";
const TEAM_COLUMNS: &str =
    "id, name, machine_id, member_ids, member_names, active, created_at, updated_at";

#[derive(Clone)]
pub struct HrRepository {
    pool: PgPool,
}

impl HrRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // --- Funcionários ---

    pub async fn list_employees(&self) -> Result<Vec<Employee>, AppError> {
        let employees = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(employees)
    }

    pub async fn find_employee(&self, id: Uuid) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(employee)
    }

    pub async fn create_employee(
        &self,
        name: &str,
        role: &str,
        phone: Option<&str>,
        email: Option<&str>,
        status: &str,
    ) -> Result<Employee, AppError> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "INSERT INTO employees (name, role, phone, email, status) VALUES ($1, $2, $3, $4, $5) \
             RETURNING {EMPLOYEE_COLUMNS}"
        ))
        .bind(name)
        .bind(role)
        .bind(phone)
        .bind(email)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(employee)
    }

    pub async fn update_employee(
        &self,
        id: Uuid,
        name: &str,
        role: &str,
        phone: Option<&str>,
        email: Option<&str>,
        status: &str,
    ) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "UPDATE employees \
             SET name = $2, role = $3, phone = $4, email = $5, status = $6, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {EMPLOYEE_COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .bind(role)
        .bind(phone)
        .bind(email)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(employee)
    }

    pub async fn delete_employee(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Quantas equipes ainda referenciam o funcionário.
    pub async fn teams_with_member(&self, employee_id: Uuid) -> Result<i64, AppError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM teams WHERE $1 = ANY(member_ids)")
                .bind(employee_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Nomes na mesma ordem dos ids recebidos, para denormalizar na equipe.
    pub async fn employee_names(&self, ids: &[Uuid]) -> Result<Vec<String>, AppError> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT name FROM employees WHERE id = ANY($1) ORDER BY array_position($1, id)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(names)
    }

    // --- Equipes ---

    pub async fn list_teams(&self) -> Result<Vec<Team>, AppError> {
        let teams = sqlx::query_as::<_, Team>(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(teams)
    }

    pub async fn find_team(&self, id: Uuid) -> Result<Option<Team>, AppError> {
        let team =
            sqlx::query_as::<_, Team>(&format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(team)
    }

    pub async fn create_team(
        &self,
        name: &str,
        machine_id: Option<Uuid>,
        member_ids: &[Uuid],
        member_names: &[String],
    ) -> Result<Team, AppError> {
        let team = sqlx::query_as::<_, Team>(&format!(
            "INSERT INTO teams (name, machine_id, member_ids, member_names) VALUES ($1, $2, $3, $4) \
             RETURNING {TEAM_COLUMNS}"
        ))
        .bind(name)
        .bind(machine_id)
        .bind(member_ids)
        .bind(member_names)
        .fetch_one(&self.pool)
        .await?;
        Ok(team)
    }

    pub async fn update_team(
        &self,
        id: Uuid,
        name: &str,
        machine_id: Option<Uuid>,
        member_ids: &[Uuid],
        member_names: &[String],
        active: bool,
    ) -> Result<Option<Team>, AppError> {
        let team = sqlx::query_as::<_, Team>(&format!(
            "UPDATE teams \
             SET name = $2, machine_id = $3, member_ids = $4, member_names = $5, active = $6, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {TEAM_COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .bind(machine_id)
        .bind(member_ids)
        .bind(member_names)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(team)
    }

    pub async fn delete_team(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_foreign_key_violation() {
                        return AppError::Conflict(
                            "Equipe vinculada a ordens de serviço.".to_string(),
                        );
                    }
                }
                AppError::from(e)
            })?;
        Ok(result.rows_affected())
    }
}
