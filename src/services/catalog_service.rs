// src/services/catalog_service.rs

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CatalogRepository,
    models::{
        catalog::CatalogEntry,
        jobs::{ServiceItem, ServiceItemInput},
    },
};

/// quantidade * profundidade * preço-por-metro - desconto.
pub fn compute_final_value(
    quantity: Decimal,
    depth_meters: Decimal,
    unit_price: Decimal,
    discount: Decimal,
) -> Decimal {
    quantity * depth_meters * unit_price - discount
}

#[derive(Clone)]
pub struct CatalogService {
    repo: CatalogRepository,
}

impl CatalogService {
    pub fn new(repo: CatalogRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<CatalogEntry>, AppError> {
        self.repo.list().await
    }

    pub async fn resolve(
        &self,
        diameter_mm: i32,
        soil_type: &str,
        access_difficulty: &str,
    ) -> Result<CatalogEntry, AppError> {
        self.repo
            .find_by_key(diameter_mm, soil_type, access_difficulty)
            .await?
            .ok_or(AppError::NotFound("Variação de preço"))
    }

    pub async fn create(
        &self,
        diameter_mm: i32,
        soil_type: &str,
        access_difficulty: &str,
        price_per_meter: Decimal,
        minutes_per_meter: Decimal,
    ) -> Result<CatalogEntry, AppError> {
        self.repo
            .create(diameter_mm, soil_type, access_difficulty, price_per_meter, minutes_per_meter)
            .await
    }

    pub async fn update(
        &self,
        id: Uuid,
        diameter_mm: i32,
        soil_type: &str,
        access_difficulty: &str,
        price_per_meter: Decimal,
        minutes_per_meter: Decimal,
    ) -> Result<CatalogEntry, AppError> {
        self.repo
            .update(id, diameter_mm, soil_type, access_difficulty, price_per_meter, minutes_per_meter)
            .await?
            .ok_or(AppError::NotFound("Variação de preço"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let removed = self.repo.delete(id).await?;
        if removed == 0 {
            return Err(AppError::NotFound("Variação de preço"));
        }
        Ok(())
    }

    /// Congela o snapshot de preço de cada item: valores ausentes vêm da
    /// matriz de preços; o valor final e o total são calculados aqui.
    pub async fn price_items(
        &self,
        inputs: &[ServiceItemInput],
    ) -> Result<(Vec<ServiceItem>, Decimal), AppError> {
        let mut items = Vec::with_capacity(inputs.len());
        let mut total = Decimal::ZERO;

        for input in inputs {
            if input.quantity <= Decimal::ZERO || input.depth_meters <= Decimal::ZERO {
                return Err(AppError::BusinessRule(
                    "Quantidade e profundidade devem ser maiores que zero.".to_string(),
                ));
            }

            let (unit_price, minutes_per_meter) =
                match (input.unit_price, input.minutes_per_meter) {
                    (Some(price), Some(minutes)) => (price, minutes),
                    _ => {
                        let entry = self
                            .repo
                            .find_by_key(input.diameter_mm, &input.soil_type, &input.access_difficulty)
                            .await?
                            .ok_or_else(|| {
                                AppError::BusinessRule(format!(
                                    "Não há preço cadastrado para Ø{}mm / {} / {}.",
                                    input.diameter_mm, input.soil_type, input.access_difficulty
                                ))
                            })?;
                        (
                            input.unit_price.unwrap_or(entry.price_per_meter),
                            input.minutes_per_meter.unwrap_or(entry.minutes_per_meter),
                        )
                    }
                };

            let final_value =
                compute_final_value(input.quantity, input.depth_meters, unit_price, input.discount);
            if final_value < Decimal::ZERO {
                return Err(AppError::BusinessRule(
                    "O desconto não pode ser maior que o valor do item.".to_string(),
                ));
            }

            total += final_value;
            items.push(ServiceItem {
                description: input.description.clone(),
                diameter_mm: input.diameter_mm,
                soil_type: input.soil_type.clone(),
                access_difficulty: input.access_difficulty.clone(),
                quantity: input.quantity,
                depth_meters: input.depth_meters,
                unit_price,
                discount: input.discount,
                final_value,
                minutes_per_meter,
            });
        }

        Ok((items, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valor_final_e_metros_vezes_preco_menos_desconto() {
        // 8 estacas * 6 m * R$ 95/m = 4560; desconto de 60
        let value = compute_final_value(
            Decimal::from(8),
            Decimal::from(6),
            Decimal::from(95),
            Decimal::from(60),
        );
        assert_eq!(value, Decimal::from(4500));
    }

    #[test]
    fn desconto_zero_preserva_o_bruto() {
        let value = compute_final_value(
            Decimal::from(2),
            Decimal::new(55, 1), // 5.5 m
            Decimal::from(100),
            Decimal::ZERO,
        );
        assert_eq!(value, Decimal::from(1100));
    }
}
