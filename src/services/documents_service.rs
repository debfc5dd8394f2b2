// src/services/documents_service.rs

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::{
    common::{error::AppError, security},
    db::DocumentsRepository,
    models::documents::{DocumentMeta, SignedUrl},
    services::storage_client::StorageClient,
};

/// Validade do link de download assinado.
const SIGNED_URL_MINUTES: i64 = 15;

/// Mantém apenas caracteres seguros no nome do arquivo dentro da chave.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "arquivo".to_string()
    } else {
        cleaned
    }
}

#[derive(Clone)]
pub struct DocumentsService {
    repo: DocumentsRepository,
    storage: StorageClient,
    download_secret: String,
    public_base_url: String,
}

impl DocumentsService {
    pub fn new(
        repo: DocumentsRepository,
        storage: StorageClient,
        download_secret: String,
        public_base_url: String,
    ) -> Self {
        Self {
            repo,
            storage,
            download_secret,
            public_base_url,
        }
    }

    pub async fn list(
        &self,
        category: Option<&str>,
        owner_type: Option<&str>,
        owner_id: Option<Uuid>,
    ) -> Result<Vec<DocumentMeta>, AppError> {
        self.repo.list(category, owner_type, owner_id).await
    }

    pub async fn get(&self, id: Uuid) -> Result<DocumentMeta, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Documento"))
    }

    /// Sobe o objeto para o bucket e grava os metadados. A chave segue o
    /// padrão `categoria/{id}/{timestamp}_{nome}`.
    #[allow(clippy::too_many_arguments)]
    pub async fn upload(
        &self,
        category: &str,
        owner_type: Option<&str>,
        owner_id: Option<Uuid>,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
        uploaded_by: Option<Uuid>,
    ) -> Result<DocumentMeta, AppError> {
        if bytes.is_empty() {
            return Err(AppError::BusinessRule("Arquivo vazio.".to_string()));
        }

        let id = Uuid::new_v4();
        let storage_key = format!(
            "{}/{}/{}_{}",
            category,
            id,
            Utc::now().timestamp(),
            sanitize_file_name(file_name)
        );
        let size_bytes = bytes.len() as i64;

        self.storage.put_object(&storage_key, content_type, bytes).await?;

        match self
            .repo
            .insert(
                id,
                category,
                owner_type,
                owner_id,
                file_name,
                content_type,
                size_bytes,
                &storage_key,
                uploaded_by,
            )
            .await
        {
            Ok(meta) => Ok(meta),
            Err(e) => {
                // Evita objeto órfão no bucket quando a gravação falha
                if let Err(cleanup) = self.storage.delete_object(&storage_key).await {
                    tracing::warn!("Falha ao remover objeto órfão {}: {}", storage_key, cleanup);
                }
                Err(e)
            }
        }
    }

    /// Emite o link de download com expiração e assinatura.
    pub async fn signed_url(&self, id: Uuid) -> Result<SignedUrl, AppError> {
        let meta = self.get(id).await?;
        let expires_unix = (Utc::now() + chrono::Duration::minutes(SIGNED_URL_MINUTES)).timestamp();
        let sig = security::sign_download(&self.download_secret, &meta.storage_key, expires_unix);

        let expires_at = Utc
            .timestamp_opt(expires_unix, 0)
            .single()
            .ok_or_else(|| anyhow::anyhow!("timestamp de expiração inválido"))?;

        Ok(SignedUrl {
            url: format!(
                "{}/api/documents/{}/download?expires={}&sig={}",
                self.public_base_url, id, expires_unix, sig
            ),
            expires_at,
        })
    }

    /// Valida o link assinado e devolve os metadados + bytes do objeto.
    pub async fn download(
        &self,
        id: Uuid,
        expires_unix: i64,
        signature: &str,
    ) -> Result<(DocumentMeta, Vec<u8>), AppError> {
        let meta = self.get(id).await?;

        let valid = security::verify_download(
            &self.download_secret,
            &meta.storage_key,
            expires_unix,
            signature,
            Utc::now().timestamp(),
        );
        if !valid {
            return Err(AppError::InvalidToken);
        }

        let bytes = self.storage.get_object(&meta.storage_key).await?;
        Ok((meta, bytes))
    }

    /// Remove o objeto (melhor esforço) e os metadados.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let meta = self.get(id).await?;
        if let Err(e) = self.storage.delete_object(&meta.storage_key).await {
            tracing::warn!("Falha ao remover objeto {} do bucket: {}", meta.storage_key, e);
        }
        self.repo.delete(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitiza_nomes_de_arquivo() {
        assert_eq!(sanitize_file_name("contrato final.pdf"), "contrato_final.pdf");
        assert_eq!(sanitize_file_name("nota-fiscal_01.xml"), "nota-fiscal_01.xml");
        assert_eq!(sanitize_file_name("ç~!@#"), "_____");
        assert_eq!(sanitize_file_name(""), "arquivo");
    }
}
