// src/services/audit_service.rs

use serde_json::Value;

use crate::{db::AdminRepository, models::admin::User};

/// Trilha de auditoria de ações mutantes. O registro é disparado em uma task
/// separada e falhas nunca chegam à requisição: só viram warning no log.
#[derive(Clone)]
pub struct AuditService {
    repo: AdminRepository,
}

impl AuditService {
    pub fn new(repo: AdminRepository) -> Self {
        Self { repo }
    }

    pub fn record(
        &self,
        user: Option<&User>,
        action: &'static str,
        entity: &'static str,
        entity_id: impl ToString,
        detail: Option<Value>,
    ) {
        let repo = self.repo.clone();
        let user_id = user.map(|u| u.id);
        let user_email = user.map(|u| u.email.clone());
        let entity_id = entity_id.to_string();

        tokio::spawn(async move {
            let result = repo
                .insert_audit(
                    user_id,
                    user_email.as_deref(),
                    action,
                    entity,
                    Some(&entity_id),
                    detail.as_ref(),
                )
                .await;
            if let Err(e) = result {
                tracing::warn!("Falha ao registrar auditoria ({} {}): {}", action, entity, e);
            }
        });
    }
}
