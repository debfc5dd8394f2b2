// src/services/travel_service.rs

use chrono::Utc;
use moka::future::Cache;
use rust_decimal::Decimal;
use std::time::Duration;
use uuid::Uuid;

use crate::{
    common::{error::AppError, security},
    db::TravelRepository,
    models::travel::{DistanceResult, LocationCapture, TravelQuote, TravelRule},
    services::maps_client::MapsClient,
};

/// Validade do token de captura de localização.
const CAPTURE_TTL_HOURS: i64 = 24;

/// Resolve o preço de deslocamento: varre as faixas na ordem e a primeira que
/// cobre a distância (`up_to_km` nulo = faixa aberta) ganha. `round_trip`
/// dobra o preço (ida e volta).
pub fn resolve_rules(rules: &[TravelRule], distance_km: Decimal) -> Option<TravelQuote> {
    rules
        .iter()
        .find(|rule| rule.up_to_km.is_none_or(|limit| limit >= distance_km))
        .map(|rule| {
            let price = if rule.round_trip {
                rule.price * Decimal::from(2)
            } else {
                rule.price
            };
            TravelQuote {
                distance_km,
                price,
                round_trip: rule.round_trip,
                rule_id: rule.id,
            }
        })
}

#[derive(Clone)]
pub struct TravelService {
    repo: TravelRepository,
    maps: MapsClient,
    // Cache de consultas de distância: a mesma origem/destino não bate na API
    // externa duas vezes no mesmo dia de trabalho.
    distance_cache: Cache<String, DistanceResult>,
}

impl TravelService {
    pub fn new(repo: TravelRepository, maps: MapsClient) -> Self {
        let distance_cache = Cache::builder()
            .max_capacity(2_000)
            .time_to_live(Duration::from_secs(12 * 60 * 60))
            .build();
        Self {
            repo,
            maps,
            distance_cache,
        }
    }

    // --- Faixas ---

    pub async fn list_rules(&self) -> Result<Vec<TravelRule>, AppError> {
        self.repo.list_rules().await
    }

    pub async fn create_rule(
        &self,
        rule_order: i32,
        up_to_km: Option<Decimal>,
        price: Decimal,
        round_trip: bool,
    ) -> Result<TravelRule, AppError> {
        if price < Decimal::ZERO {
            return Err(AppError::BusinessRule(
                "O preço da faixa não pode ser negativo.".to_string(),
            ));
        }
        self.repo.create_rule(rule_order, up_to_km, price, round_trip).await
    }

    pub async fn update_rule(
        &self,
        id: Uuid,
        rule_order: i32,
        up_to_km: Option<Decimal>,
        price: Decimal,
        round_trip: bool,
        active: bool,
    ) -> Result<TravelRule, AppError> {
        self.repo
            .update_rule(id, rule_order, up_to_km, price, round_trip, active)
            .await?
            .ok_or(AppError::NotFound("Faixa de deslocamento"))
    }

    pub async fn delete_rule(&self, id: Uuid) -> Result<(), AppError> {
        let removed = self.repo.delete_rule(id).await?;
        if removed == 0 {
            return Err(AppError::NotFound("Faixa de deslocamento"));
        }
        Ok(())
    }

    pub async fn quote(&self, distance_km: Decimal) -> Result<TravelQuote, AppError> {
        if distance_km < Decimal::ZERO {
            return Err(AppError::BusinessRule("Distância inválida.".to_string()));
        }
        let rules = self.repo.list_active_rules().await?;
        resolve_rules(&rules, distance_km).ok_or_else(|| {
            AppError::BusinessRule("Nenhuma faixa de deslocamento cobre esta distância.".to_string())
        })
    }

    pub async fn distance(&self, origin: &str, destination: &str) -> Result<DistanceResult, AppError> {
        let key = format!("{}|{}", origin.trim().to_lowercase(), destination.trim().to_lowercase());
        let maps = self.maps.clone();
        let origin = origin.to_owned();
        let destination = destination.to_owned();

        self.distance_cache
            .try_get_with(key, async move { maps.distance(&origin, &destination).await })
            .await
            .map_err(|e| AppError::ExternalService(e.to_string()))
    }

    // --- Capturas de localização ---

    pub async fn create_capture(
        &self,
        label: Option<&str>,
        created_by: Option<Uuid>,
    ) -> Result<LocationCapture, AppError> {
        let token = security::random_token();
        let expires_at = Utc::now() + chrono::Duration::hours(CAPTURE_TTL_HOURS);
        self.repo.create_capture(&token, label, expires_at, created_by).await
    }

    pub async fn get_capture(&self, token: &str) -> Result<LocationCapture, AppError> {
        self.repo
            .find_capture(token)
            .await?
            .ok_or(AppError::NotFound("Token de captura"))
    }

    /// Endpoint público: grava a coordenada uma única vez.
    pub async fn submit_capture(
        &self,
        token: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<LocationCapture, AppError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::BusinessRule("Coordenadas inválidas.".to_string()));
        }

        match self.repo.set_coordinates(token, latitude, longitude).await? {
            Some(capture) => Ok(capture),
            None => {
                // Distingue token inexistente/expirado de captura repetida
                match self.repo.find_capture(token).await? {
                    Some(_) => Err(AppError::Conflict("Localização já capturada.".to_string())),
                    None => Err(AppError::NotFound("Token de captura")),
                }
            }
        }
    }

    pub async fn purge_expired_captures(&self) -> Result<u64, AppError> {
        self.repo.purge_expired().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn rule(order: i32, up_to_km: Option<i64>, price: i64, round_trip: bool) -> TravelRule {
        TravelRule {
            id: Uuid::new_v4(),
            rule_order: order,
            up_to_km: up_to_km.map(Decimal::from),
            price: Decimal::from(price),
            round_trip,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn primeira_faixa_que_cobre_a_distancia_ganha() {
        let rules = vec![
            rule(1, Some(30), 0, true),
            rule(2, Some(60), 150, true),
            rule(3, None, 600, true),
        ];

        let quote = resolve_rules(&rules, Decimal::from(25)).unwrap();
        assert_eq!(quote.rule_id, rules[0].id);
        assert_eq!(quote.price, Decimal::ZERO);

        let quote = resolve_rules(&rules, Decimal::from(45)).unwrap();
        assert_eq!(quote.rule_id, rules[1].id);
    }

    #[test]
    fn faixa_aberta_pega_qualquer_distancia() {
        let rules = vec![rule(1, Some(30), 100, false), rule(2, None, 600, false)];
        let quote = resolve_rules(&rules, Decimal::from(500)).unwrap();
        assert_eq!(quote.rule_id, rules[1].id);
        assert_eq!(quote.price, Decimal::from(600));
    }

    #[test]
    fn ida_e_volta_dobra_o_preco() {
        let rules = vec![rule(1, Some(100), 150, true)];
        let quote = resolve_rules(&rules, Decimal::from(80)).unwrap();
        assert_eq!(quote.price, Decimal::from(300));
        assert!(quote.round_trip);
    }

    #[test]
    fn limite_exato_ainda_pertence_a_faixa() {
        let rules = vec![rule(1, Some(60), 150, false), rule(2, None, 600, false)];
        let quote = resolve_rules(&rules, Decimal::from(60)).unwrap();
        assert_eq!(quote.rule_id, rules[0].id);
    }

    #[test]
    fn sem_faixa_aplicavel_retorna_none() {
        let rules = vec![rule(1, Some(30), 100, false)];
        assert!(resolve_rules(&rules, Decimal::from(31)).is_none());
        assert!(resolve_rules(&[], Decimal::from(1)).is_none());
    }
}
