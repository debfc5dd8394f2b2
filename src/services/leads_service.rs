// src/services/leads_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        events::{ChangeEvent, ChangeKind, EventBus},
    },
    db::{BudgetsRepository, ClientsRepository, LeadsRepository},
    models::{
        budgets::BudgetDraft,
        clients::{Client, PersonType},
        leads::{LeadConversion, LeadStatus, OrcamentoRequest},
    },
    services::clients_service::normalize_digits,
};

#[derive(Clone)]
pub struct LeadsService {
    pool: PgPool,
    repo: LeadsRepository,
    clients_repo: ClientsRepository,
    budgets_repo: BudgetsRepository,
    events: EventBus,
}

impl LeadsService {
    pub fn new(
        pool: PgPool,
        repo: LeadsRepository,
        clients_repo: ClientsRepository,
        budgets_repo: BudgetsRepository,
        events: EventBus,
    ) -> Self {
        Self {
            pool,
            repo,
            clients_repo,
            budgets_repo,
            events,
        }
    }

    /// Captura pública do funil do site.
    pub async fn capture(
        &self,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        doc_number: Option<&str>,
        city: Option<&str>,
        service_description: &str,
        source: Option<&str>,
    ) -> Result<OrcamentoRequest, AppError> {
        let request = self
            .repo
            .insert(name, email, phone, doc_number, city, service_description, source)
            .await?;

        self.events.publish_lead(ChangeEvent::new(
            ChangeKind::Created,
            "orcamento_request",
            request.id,
        ));
        Ok(request)
    }

    pub async fn list(&self, status: Option<LeadStatus>) -> Result<Vec<OrcamentoRequest>, AppError> {
        self.repo.list(status).await
    }

    pub async fn get(&self, id: Uuid) -> Result<OrcamentoRequest, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Pedido de orçamento"))
    }

    pub async fn count_pending(&self) -> Result<i64, AppError> {
        self.repo.count_pending().await
    }

    pub async fn discard(&self, id: Uuid) -> Result<OrcamentoRequest, AppError> {
        let request = self
            .repo
            .discard(id)
            .await?
            .ok_or(AppError::NotFound("Pedido de orçamento"))?;
        self.events.publish_lead(ChangeEvent::new(
            ChangeKind::Updated,
            "orcamento_request",
            request.id,
        ));
        Ok(request)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let removed = self.repo.delete(id).await?;
        if removed == 0 {
            return Err(AppError::NotFound("Pedido de orçamento"));
        }
        self.events
            .publish_lead(ChangeEvent::new(ChangeKind::Deleted, "orcamento_request", id));
        Ok(())
    }

    /// Converte o lead em Cliente + Orçamento pendente. O cliente é
    /// de-duplicado por documento, depois e-mail, depois telefone; só cria um
    /// cadastro novo quando nada casa.
    pub async fn convert(&self, id: Uuid) -> Result<LeadConversion, AppError> {
        let mut tx = self.pool.begin().await?;

        let request = self
            .repo
            .find_by_id_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Pedido de orçamento"))?;

        match request.status {
            LeadStatus::Convertido => {
                return Err(AppError::Conflict("Pedido já convertido.".to_string()));
            }
            LeadStatus::Descartado => {
                return Err(AppError::BusinessRule(
                    "Pedido descartado não pode ser convertido.".to_string(),
                ));
            }
            LeadStatus::Pendente => {}
        }

        let (client, client_reused) = self.find_or_create_client(&mut tx, &request).await?;

        let budget_draft = BudgetDraft {
            client_id: client.id,
            client_name: client.name.clone(),
            team_id: None,
            team_name: None,
            items: Vec::new(),
            travel_distance_km: None,
            travel_price: None,
            travel_round_trip: true,
            total: rust_decimal::Decimal::ZERO,
            valid_until: None,
            notes: Some(request.service_description.clone()),
        };
        let budget = self.budgets_repo.insert(&mut *tx, &budget_draft).await?;

        let request = self
            .repo
            .mark_converted(&mut *tx, id, client.id, budget.id)
            .await?;

        tx.commit().await?;

        self.events.publish_lead(ChangeEvent::new(
            ChangeKind::Updated,
            "orcamento_request",
            request.id,
        ));
        if !client_reused {
            self.events
                .publish_client(ChangeEvent::new(ChangeKind::Created, "client", client.id));
        }

        Ok(LeadConversion {
            request,
            client,
            budget,
            client_reused,
        })
    }

    async fn find_or_create_client(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        request: &OrcamentoRequest,
    ) -> Result<(Client, bool), AppError> {
        // 1. Documento
        let doc = request.doc_number.as_deref().map(normalize_digits).unwrap_or_default();
        if !doc.is_empty() {
            if let Some(client) = self.clients_repo.find_by_doc_number(&mut **tx, &doc).await? {
                return Ok((client, true));
            }
        }

        // 2. E-mail
        if let Some(email) = request.email.as_deref() {
            if let Some(client) = self.clients_repo.find_by_email(&mut **tx, email).await? {
                return Ok((client, true));
            }
        }

        // 3. Telefone (só dígitos)
        let phone_digits = request.phone.as_deref().map(normalize_digits).unwrap_or_default();
        if !phone_digits.is_empty() {
            if let Some(client) = self
                .clients_repo
                .find_by_phone_digits(&mut **tx, &phone_digits)
                .await?
            {
                return Ok((client, true));
            }
        }

        // 4. Nada casou: cria o cadastro. CNPJ tem 14 dígitos.
        let person_type = if doc.len() == 14 {
            PersonType::Juridica
        } else {
            PersonType::Fisica
        };
        let client = self
            .clients_repo
            .create(
                &mut **tx,
                person_type,
                (!doc.is_empty()).then_some(doc.as_str()),
                &request.name,
                request.email.as_deref(),
                request.phone.as_deref(),
                &[],
            )
            .await?;
        Ok((client, false))
    }
}
