// src/services/budgets_service.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        events::{ChangeEvent, ChangeKind, EventBus},
    },
    db::{BudgetsRepository, ClientsRepository, HrRepository, JobsRepository},
    models::{
        budgets::{Budget, BudgetDraft, BudgetStatus},
        jobs::{Job, JobDraft, ServiceItemInput},
    },
    services::{catalog_service::CatalogService, scheduling},
};

#[derive(Debug, Clone)]
pub struct BudgetInput {
    pub client_id: Uuid,
    pub team_id: Option<Uuid>,
    pub items: Vec<ServiceItemInput>,
    pub travel_distance_km: Option<Decimal>,
    pub travel_price: Option<Decimal>,
    pub travel_round_trip: bool,
    pub valid_until: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct BudgetsService {
    pool: PgPool,
    repo: BudgetsRepository,
    clients_repo: ClientsRepository,
    hr_repo: HrRepository,
    jobs_repo: JobsRepository,
    catalog: CatalogService,
    events: EventBus,
}

impl BudgetsService {
    pub fn new(
        pool: PgPool,
        repo: BudgetsRepository,
        clients_repo: ClientsRepository,
        hr_repo: HrRepository,
        jobs_repo: JobsRepository,
        catalog: CatalogService,
        events: EventBus,
    ) -> Self {
        Self {
            pool,
            repo,
            clients_repo,
            hr_repo,
            jobs_repo,
            catalog,
            events,
        }
    }

    pub async fn list(
        &self,
        status: Option<BudgetStatus>,
        client_id: Option<Uuid>,
    ) -> Result<Vec<Budget>, AppError> {
        self.repo.list(status, client_id).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Budget, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Orçamento"))
    }

    async fn build_draft(&self, input: &BudgetInput) -> Result<BudgetDraft, AppError> {
        let client = self
            .clients_repo
            .find_by_id(input.client_id)
            .await?
            .ok_or(AppError::NotFound("Cliente"))?;

        let team = match input.team_id {
            Some(team_id) => Some(
                self.hr_repo
                    .find_team(team_id)
                    .await?
                    .ok_or(AppError::NotFound("Equipe"))?,
            ),
            None => None,
        };

        let (items, items_total) = self.catalog.price_items(&input.items).await?;
        let total = items_total + input.travel_price.unwrap_or(Decimal::ZERO);

        Ok(BudgetDraft {
            client_id: client.id,
            client_name: client.name,
            team_id: team.as_ref().map(|t| t.id),
            team_name: team.map(|t| t.name),
            items,
            travel_distance_km: input.travel_distance_km,
            travel_price: input.travel_price,
            travel_round_trip: input.travel_round_trip,
            total,
            valid_until: input.valid_until,
            notes: input.notes.clone(),
        })
    }

    pub async fn create(&self, input: BudgetInput) -> Result<Budget, AppError> {
        let draft = self.build_draft(&input).await?;
        self.repo.insert(&self.pool, &draft).await
    }

    pub async fn update(&self, id: Uuid, input: BudgetInput) -> Result<Budget, AppError> {
        let current = self.get(id).await?;
        if current.status == BudgetStatus::Convertido {
            return Err(AppError::Conflict("Orçamento já convertido.".to_string()));
        }

        let draft = self.build_draft(&input).await?;
        self.repo
            .update(id, &draft)
            .await?
            .ok_or(AppError::NotFound("Orçamento"))
    }

    pub async fn approve(&self, id: Uuid) -> Result<Budget, AppError> {
        let current = self.get(id).await?;
        if current.status != BudgetStatus::Pendente {
            return Err(AppError::Conflict(
                "Apenas orçamento pendente pode ser aprovado.".to_string(),
            ));
        }
        self.repo
            .update_status(id, BudgetStatus::Aprovado, None)
            .await?
            .ok_or(AppError::NotFound("Orçamento"))
    }

    pub async fn reject(&self, id: Uuid, reason: Option<&str>) -> Result<Budget, AppError> {
        let current = self.get(id).await?;
        if current.status != BudgetStatus::Pendente {
            return Err(AppError::Conflict(
                "Apenas orçamento pendente pode ser rejeitado.".to_string(),
            ));
        }
        self.repo
            .update_status(id, BudgetStatus::Rejeitado, reason)
            .await?
            .ok_or(AppError::NotFound("Orçamento"))
    }

    /// Converte o orçamento em OS copiando o snapshot inteiro (cliente,
    /// itens, deslocamento) e gravando o vínculo nos dois sentidos, em uma
    /// única transação.
    pub async fn convert(
        &self,
        id: Uuid,
        scheduled_start: Option<DateTime<Utc>>,
    ) -> Result<(Budget, Job), AppError> {
        let mut tx = self.pool.begin().await?;

        let budget = self
            .repo
            .find_by_id_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Orçamento"))?;

        match budget.status {
            BudgetStatus::Convertido => {
                return Err(AppError::Conflict("Orçamento já convertido.".to_string()));
            }
            BudgetStatus::Rejeitado => {
                return Err(AppError::BusinessRule(
                    "Orçamento rejeitado não pode ser convertido.".to_string(),
                ));
            }
            BudgetStatus::Pendente | BudgetStatus::Aprovado => {}
        }

        let items = budget.items.0.clone();
        let estimated = scheduling::estimate_minutes(&items);

        let draft = JobDraft {
            client_id: budget.client_id,
            client_name: budget.client_name.clone(),
            team_id: budget.team_id,
            team_name: budget.team_name.clone(),
            budget_id: Some(budget.id),
            items,
            travel_distance_km: budget.travel_distance_km,
            travel_price: budget.travel_price,
            travel_round_trip: budget.travel_round_trip,
            total: budget.total,
            scheduled_start,
            estimated_minutes: (estimated > 0).then_some(estimated as i32),
            notes: budget.notes.clone(),
        };

        let job = self.jobs_repo.insert(&mut *tx, &draft).await?;
        let budget = self.repo.mark_converted(&mut *tx, id, job.id).await?;

        tx.commit().await?;

        self.events
            .publish_job(ChangeEvent::new(ChangeKind::Created, "job", job.id).for_team(job.team_id));
        Ok((budget, job))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let current = self.get(id).await?;
        if current.status == BudgetStatus::Convertido {
            return Err(AppError::Conflict(
                "Orçamento convertido não pode ser excluído.".to_string(),
            ));
        }
        self.repo.delete(id).await?;
        Ok(())
    }
}
