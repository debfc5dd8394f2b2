// src/services/mail_client.rs

use serde_json::json;
use std::time::Duration;

use crate::common::error::AppError;

/// Cliente do gateway HTTP de e-mail transacional.
#[derive(Clone)]
pub struct MailClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
    from: String,
}

impl MailClient {
    pub fn new(base_url: String, token: String, from: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                AppError::ExternalService(format!("Falha ao criar cliente de e-mail: {}", e))
            })?;

        Ok(Self {
            client,
            base_url,
            token,
            from,
        })
    }

    pub async fn send_password_reset(
        &self,
        to: &str,
        name: &str,
        reset_link: &str,
    ) -> Result<(), AppError> {
        let body = format!(
            "Olá, {}!\n\nRecebemos um pedido de redefinição de senha do portal.\n\
             Acesse o link abaixo para criar uma nova senha (válido por 2 horas):\n\n{}\n\n\
             Se você não fez este pedido, ignore esta mensagem.",
            name, reset_link
        );

        let url = format!("{}/messages", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&json!({
                "from": self.from,
                "to": to,
                "subject": "Redefinição de senha - Portal PerfuSolo",
                "body": body,
            }))
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Envio de e-mail falhou: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::ExternalService(format!(
                "Gateway de e-mail retornou {}",
                status
            )));
        }

        tracing::info!("E-mail de redefinição enviado para {}", to);
        Ok(())
    }
}
