// src/services/maps_client.rs

use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

use crate::{common::error::AppError, models::travel::DistanceResult};

/// Cliente da API externa de rotas/geocodificação.
#[derive(Clone)]
pub struct MapsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteResponse {
    distance_km: f64,
    duration_minutes: i64,
}

impl MapsClient {
    pub fn new(base_url: String, api_key: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::ExternalService(format!("Falha ao criar cliente de maps: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Distância rodoviária e tempo de viagem entre dois endereços.
    pub async fn distance(&self, origin: &str, destination: &str) -> Result<DistanceResult, AppError> {
        let url = format!("{}/route", self.base_url);
        tracing::info!("Consultando distância: {} -> {}", origin, destination);

        let response = self
            .client
            .get(&url)
            .query(&[("origin", origin), ("destination", destination), ("key", &self.api_key)])
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Consulta de rota falhou: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Erro desconhecido".to_string());
            return Err(AppError::ExternalService(format!(
                "API de maps retornou {}: {}",
                status, error_text
            )));
        }

        let route: RouteResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Resposta de rota inválida: {}", e)))?;

        let distance_km = Decimal::from_f64_retain(route.distance_km)
            .ok_or_else(|| AppError::ExternalService("Distância inválida na resposta.".to_string()))?;

        Ok(DistanceResult {
            origin: origin.to_string(),
            destination: destination.to_string(),
            distance_km: distance_km.round_dp(2),
            duration_minutes: route.duration_minutes,
        })
    }
}
