// src/services/clients_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        events::{ChangeEvent, ChangeKind, EventBus},
    },
    db::ClientsRepository,
    models::clients::{Client, ClientAddress, PersonType},
};

/// Reduz CPF/CNPJ/telefone a dígitos.
pub fn normalize_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[derive(Clone)]
pub struct ClientsService {
    pool: PgPool,
    repo: ClientsRepository,
    events: EventBus,
}

impl ClientsService {
    pub fn new(pool: PgPool, repo: ClientsRepository, events: EventBus) -> Self {
        Self { pool, repo, events }
    }

    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Client>, AppError> {
        self.repo.list(search).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Client, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Cliente"))
    }

    pub async fn create(
        &self,
        person_type: PersonType,
        doc_number: &str,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        addresses: Vec<ClientAddress>,
    ) -> Result<Client, AppError> {
        let doc = normalize_digits(doc_number);
        if doc.is_empty() {
            return Err(AppError::BusinessRule(
                "CPF/CNPJ deve conter ao menos um dígito.".to_string(),
            ));
        }

        let client = self
            .repo
            .create(&self.pool, person_type, Some(&doc), name, email, phone, &addresses)
            .await?;

        self.events
            .publish_client(ChangeEvent::new(ChangeKind::Created, "client", client.id));
        Ok(client)
    }

    pub async fn update(
        &self,
        id: Uuid,
        person_type: PersonType,
        doc_number: &str,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        addresses: Vec<ClientAddress>,
    ) -> Result<Client, AppError> {
        let doc = normalize_digits(doc_number);
        if doc.is_empty() {
            return Err(AppError::BusinessRule(
                "CPF/CNPJ deve conter ao menos um dígito.".to_string(),
            ));
        }

        let client = self
            .repo
            .update(id, person_type, Some(&doc), name, email, phone, &addresses)
            .await?
            .ok_or(AppError::NotFound("Cliente"))?;

        self.events
            .publish_client(ChangeEvent::new(ChangeKind::Updated, "client", client.id));
        Ok(client)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let removed = self.repo.delete(id).await?;
        if removed == 0 {
            return Err(AppError::NotFound("Cliente"));
        }
        self.events
            .publish_client(ChangeEvent::new(ChangeKind::Deleted, "client", id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normaliza_documentos_para_digitos() {
        assert_eq!(normalize_digits("123.456.789-00"), "12345678900");
        assert_eq!(normalize_digits("12.345.678/0001-90"), "12345678000190");
        assert_eq!(normalize_digits("(19) 99876-5432"), "19998765432");
        assert_eq!(normalize_digits("sem digitos"), "");
    }
}
