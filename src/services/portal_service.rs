// src/services/portal_service.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, security},
    db::ClientsRepository,
    models::clients::{Client, PortalClaims},
    services::mail_client::MailClient,
};

const RESET_TOKEN_HOURS: i64 = 2;

/// Autenticação do portal do cliente: login com e-mail e senha, JWT de 7 dias
/// e redefinição de senha por token de uso único.
#[derive(Clone)]
pub struct PortalService {
    pool: PgPool,
    repo: ClientsRepository,
    mail: MailClient,
    jwt_secret: String,
    public_base_url: String,
}

impl PortalService {
    pub fn new(
        pool: PgPool,
        repo: ClientsRepository,
        mail: MailClient,
        jwt_secret: String,
        public_base_url: String,
    ) -> Self {
        Self {
            pool,
            repo,
            mail,
            jwt_secret,
            public_base_url,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let client = self
            .repo
            .find_by_email(&self.pool, email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_hash = client
            .password_hash
            .clone()
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        // Verificação de senha fora do executor async
        let is_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(client.id)
    }

    pub async fn validate_token(&self, token: &str) -> Result<Client, AppError> {
        let validation = Validation::default();
        let token_data = decode::<PortalClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::NotFound("Cliente"))
    }

    /// Define (ou redefine) a senha de acesso ao portal de um cliente.
    pub async fn set_password(&self, client_id: Uuid, password: &str) -> Result<(), AppError> {
        let password_clone = password.to_owned();
        let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        self.repo.set_password(client_id, &hashed).await
    }

    /// Gera o token de redefinição e dispara o e-mail. Sempre responde 200 ao
    /// chamador para não revelar quais e-mails têm cadastro.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AppError> {
        let Some(client) = self.repo.find_by_email(&self.pool, email).await? else {
            return Ok(());
        };

        let token = security::random_token();
        let expires_at = Utc::now() + chrono::Duration::hours(RESET_TOKEN_HOURS);
        self.repo
            .set_reset_token(client.id, &security::hash_token(&token), expires_at)
            .await?;

        let reset_link = format!("{}/portal/redefinir-senha?token={}", self.public_base_url, token);
        self.mail
            .send_password_reset(email, &client.name, &reset_link)
            .await?;

        Ok(())
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        let client = self
            .repo
            .find_by_reset_token(&security::hash_token(token))
            .await?
            .ok_or(AppError::InvalidToken)?;

        // set_password também limpa o token de redefinição
        self.set_password(client.id, new_password).await
    }

    fn create_token(&self, client_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = PortalClaims {
            sub: client_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
