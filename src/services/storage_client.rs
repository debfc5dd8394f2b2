// src/services/storage_client.rs

use std::time::Duration;

use crate::common::error::AppError;

/// Cliente do serviço externo de bucket de arquivos. Objetos são endereçados
/// pela chave completa (`categoria/{id}/{timestamp}_{nome}`).
#[derive(Clone)]
pub struct StorageClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl StorageClient {
    pub fn new(base_url: String, token: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| {
                AppError::ExternalService(format!("Falha ao criar cliente de storage: {}", e))
            })?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/objects/{}", self.base_url, key)
    }

    pub async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), AppError> {
        let response = self
            .client
            .put(self.object_url(key))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Upload falhou: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Bucket retornou {} no upload",
                response.status()
            )));
        }
        Ok(())
    }

    pub async fn get_object(&self, key: &str) -> Result<Vec<u8>, AppError> {
        let response = self
            .client
            .get(self.object_url(key))
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Download falhou: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Bucket retornou {} no download",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::ExternalService(format!("Leitura do objeto falhou: {}", e)))?;
        Ok(bytes.to_vec())
    }

    pub async fn delete_object(&self, key: &str) -> Result<(), AppError> {
        let response = self
            .client
            .delete(self.object_url(key))
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Exclusão falhou: {}", e)))?;

        if !response.status().is_success() && response.status() != reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::ExternalService(format!(
                "Bucket retornou {} na exclusão",
                response.status()
            )));
        }
        Ok(())
    }
}
