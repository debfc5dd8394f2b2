// src/services/jobs_service.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        events::{ChangeEvent, ChangeKind, EventBus},
    },
    db::{ClientsRepository, FinanceRepository, HrRepository, JobsRepository},
    models::{
        finance::{CashKind, CashTransaction},
        jobs::{DayAvailability, Job, JobDraft, JobStatus, ServiceItemInput},
    },
    services::{
        catalog_service::CatalogService,
        scheduling::{self, BusyInterval},
    },
};

/// Campos editáveis de uma OS, já validados pelo handler.
#[derive(Debug, Clone)]
pub struct JobInput {
    pub client_id: Uuid,
    pub team_id: Option<Uuid>,
    pub items: Vec<ServiceItemInput>,
    pub travel_distance_km: Option<Decimal>,
    pub travel_price: Option<Decimal>,
    pub travel_round_trip: bool,
    pub scheduled_start: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct JobsService {
    pool: PgPool,
    repo: JobsRepository,
    clients_repo: ClientsRepository,
    hr_repo: HrRepository,
    finance_repo: FinanceRepository,
    catalog: CatalogService,
    events: EventBus,
}

impl JobsService {
    pub fn new(
        pool: PgPool,
        repo: JobsRepository,
        clients_repo: ClientsRepository,
        hr_repo: HrRepository,
        finance_repo: FinanceRepository,
        catalog: CatalogService,
        events: EventBus,
    ) -> Self {
        Self {
            pool,
            repo,
            clients_repo,
            hr_repo,
            finance_repo,
            catalog,
            events,
        }
    }

    pub async fn list(
        &self,
        status: Option<JobStatus>,
        team_id: Option<Uuid>,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Job>, AppError> {
        self.repo.list(status, team_id, date).await
    }

    pub async fn list_for_client(&self, client_id: Uuid) -> Result<Vec<Job>, AppError> {
        self.repo.list_for_client(client_id).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Job, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound("OS"))
    }

    /// Monta o draft: copia o nome do cliente e da equipe para a OS e congela
    /// o snapshot de preço dos itens.
    async fn build_draft(&self, input: &JobInput) -> Result<JobDraft, AppError> {
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
        let estimated = scheduling::estimate_minutes(&items);

        Ok(JobDraft {
            client_id: client.id,
            client_name: client.name,
            team_id: team.as_ref().map(|t| t.id),
            team_name: team.map(|t| t.name),
            budget_id: None,
            items,
            travel_distance_km: input.travel_distance_km,
            travel_price: input.travel_price,
            travel_round_trip: input.travel_round_trip,
            total,
            scheduled_start: input.scheduled_start,
            estimated_minutes: (estimated > 0).then_some(estimated as i32),
            notes: input.notes.clone(),
        })
    }

    pub async fn create(&self, input: JobInput) -> Result<Job, AppError> {
        let draft = self.build_draft(&input).await?;
        let job = self.repo.insert(&self.pool, &draft).await?;
        self.events
            .publish_job(ChangeEvent::new(ChangeKind::Created, "job", job.id).for_team(job.team_id));
        Ok(job)
    }

    pub async fn update(&self, id: Uuid, input: JobInput) -> Result<Job, AppError> {
        let current = self.get(id).await?;
        if current.status.is_terminal() {
            return Err(AppError::BusinessRule(
                "OS concluída ou cancelada não pode ser editada.".to_string(),
            ));
        }

        let mut draft = self.build_draft(&input).await?;
        draft.budget_id = current.budget_id;

        let job = self
            .repo
            .update(id, &draft)
            .await?
            .ok_or(AppError::NotFound("OS"))?;
        self.events
            .publish_job(ChangeEvent::new(ChangeKind::Updated, "job", job.id).for_team(job.team_id));
        Ok(job)
    }

    pub async fn transition(&self, id: Uuid, to: JobStatus) -> Result<Job, AppError> {
        let current = self.get(id).await?;
        if !current.status.can_transition(to) {
            return Err(AppError::BusinessRule(
                "Transição de status inválida para esta OS.".to_string(),
            ));
        }

        let now = Utc::now();
        let started_at = (to == JobStatus::EmExecucao).then_some(now);
        let finished_at = (to == JobStatus::Concluida).then_some(now);

        let job = self
            .repo
            .update_status(id, to, started_at, finished_at)
            .await?
            .ok_or(AppError::NotFound("OS"))?;
        self.events
            .publish_job(ChangeEvent::new(ChangeKind::Updated, "job", job.id).for_team(job.team_id));
        Ok(job)
    }

    /// Exclusão permitida apenas para OS cancelada e sem lançamento de caixa.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let job = self.get(id).await?;
        if job.status != JobStatus::Cancelada {
            return Err(AppError::Conflict(
                "Apenas OS cancelada pode ser excluída.".to_string(),
            ));
        }
        if self.finance_repo.count_for_job(id).await? > 0 {
            return Err(AppError::Conflict(
                "OS possui lançamentos de caixa vinculados.".to_string(),
            ));
        }

        self.repo.delete(id).await?;
        self.events
            .publish_job(ChangeEvent::new(ChangeKind::Deleted, "job", id).for_team(job.team_id));
        Ok(())
    }

    /// Agenda do dia: slots de 30 minutos entre 06:00 e 19:30, com a ocupação
    /// das OSs não encerradas da equipe. `job_id` (replanejamento) sai da
    /// conta de ocupação e empresta sua duração estimada.
    pub async fn availability(
        &self,
        team_id: Uuid,
        date: NaiveDate,
        job_id: Option<Uuid>,
        duration_minutes: Option<u32>,
    ) -> Result<DayAvailability, AppError> {
        self.hr_repo
            .find_team(team_id)
            .await?
            .ok_or(AppError::NotFound("Equipe"))?;

        let duration = match (duration_minutes, job_id) {
            (Some(minutes), _) => minutes,
            (None, Some(job_id)) => {
                let job = self.get(job_id).await?;
                job.estimated_minutes.unwrap_or(scheduling::SLOT_MIN as i32) as u32
            }
            (None, None) => scheduling::SLOT_MIN,
        };
        let duration = scheduling::round_to_slot(duration);

        let scheduled = self.repo.scheduled_for_team(team_id, date, job_id).await?;
        let busy: Vec<BusyInterval> = scheduled.iter().filter_map(BusyInterval::from_job).collect();

        Ok(DayAvailability {
            team_id,
            date,
            duration_minutes: duration,
            slots: scheduling::build_slots(&busy, duration),
        })
    }

    /// Registra o recebimento da OS: lançamento de entrada + carimbo de
    /// pagamento na mesma transação, para nunca cobrar duas vezes.
    pub async fn record_payment(
        &self,
        id: Uuid,
        amount: Option<Decimal>,
        description: Option<String>,
        created_by: Option<Uuid>,
    ) -> Result<(Job, CashTransaction), AppError> {
        let job = self.get(id).await?;
        if job.status == JobStatus::Cancelada {
            return Err(AppError::BusinessRule(
                "OS cancelada não pode receber pagamento.".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let cashier = self
            .finance_repo
            .find_open(&mut *tx)
            .await?
            .ok_or_else(|| AppError::BusinessRule("Não há caixa aberto.".to_string()))?;

        // Checagem explícita; o índice parcial único cobre a corrida.
        if self.finance_repo.entrada_exists_for_job(&mut *tx, id).await? {
            return Err(AppError::Conflict(
                "Já existe uma entrada de caixa para esta OS.".to_string(),
            ));
        }

        let amount = amount.unwrap_or(job.total);
        if amount <= Decimal::ZERO {
            return Err(AppError::BusinessRule(
                "O valor do recebimento deve ser maior que zero.".to_string(),
            ));
        }

        let description =
            description.unwrap_or_else(|| format!("Recebimento OS #{}", job.display_id));

        let transaction = self
            .finance_repo
            .insert_transaction(
                &mut *tx,
                cashier.id,
                CashKind::Entrada,
                amount,
                &description,
                Some(id),
                created_by,
            )
            .await?;

        let job = self.repo.set_payment(&mut *tx, id, transaction.id).await?;

        tx.commit().await?;

        self.events
            .publish_job(ChangeEvent::new(ChangeKind::Updated, "job", job.id).for_team(job.team_id));
        Ok((job, transaction))
    }
}
