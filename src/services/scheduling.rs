// src/services/scheduling.rs
//
// Aritmética pura da agenda de equipes: estimativa de duração a partir dos
// itens da OS e varredura de slots de 30 minutos no dia de trabalho.

use chrono::Timelike;
use rust_decimal::prelude::ToPrimitive;

use crate::models::jobs::{AvailabilitySlot, Job, ServiceItem};

/// Janela de trabalho: 06:00 às 19:30.
pub const DAY_START_MIN: u32 = 6 * 60;
pub const DAY_END_MIN: u32 = 19 * 60 + 30;
/// Granularidade dos slots e intervalo mínimo entre OSs consecutivas.
pub const SLOT_MIN: u32 = 30;
pub const GAP_MIN: u32 = 30;

/// Intervalo ocupado dentro do dia, em minutos desde a meia-noite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusyInterval {
    pub start_min: u32,
    pub end_min: u32,
}

impl BusyInterval {
    /// Extrai o intervalo ocupado de uma OS agendada. OSs sem horário ou sem
    /// estimativa ocupam um slot mínimo.
    pub fn from_job(job: &Job) -> Option<Self> {
        let start = job.scheduled_start?;
        let start_min = start.hour() * 60 + start.minute();
        let duration = job.estimated_minutes.unwrap_or(SLOT_MIN as i32).max(SLOT_MIN as i32) as u32;
        Some(Self {
            start_min,
            end_min: start_min + duration,
        })
    }
}

/// Minutos estimados de execução: soma de minutos-por-metro vezes metros
/// perfurados (quantidade de estacas vezes profundidade).
pub fn estimate_minutes(items: &[ServiceItem]) -> u32 {
    let total: f64 = items
        .iter()
        .map(|item| {
            let meters = item.quantity * item.depth_meters;
            (item.minutes_per_meter * meters).to_f64().unwrap_or(0.0)
        })
        .sum();
    total.ceil().max(0.0) as u32
}

/// Arredonda a duração para cima até o múltiplo de slot.
pub fn round_to_slot(minutes: u32) -> u32 {
    let minutes = minutes.max(SLOT_MIN);
    minutes.div_ceil(SLOT_MIN) * SLOT_MIN
}

/// Duas OSs conflitam quando não há ao menos `gap` minutos entre elas,
/// em qualquer ordem.
fn conflicts(a_start: u32, a_end: u32, b_start: u32, b_end: u32, gap: u32) -> bool {
    a_start < b_end + gap && b_start < a_end + gap
}

/// Varre o dia em slots de 30 minutos.
///
/// Para cada slot reporta:
/// - `booked`: o slot cruza o intervalo bruto de alguma OS agendada;
/// - `available`: uma nova OS com `duration_minutes` cabe começando ali,
///   respeitando a janela do dia e o intervalo mínimo entre OSs.
pub fn build_slots(busy: &[BusyInterval], duration_minutes: u32) -> Vec<AvailabilitySlot> {
    let duration = round_to_slot(duration_minutes);
    let mut slots = Vec::new();

    let mut start = DAY_START_MIN;
    while start < DAY_END_MIN {
        let slot_end = start + SLOT_MIN;
        let booked = busy
            .iter()
            .any(|b| start < b.end_min && b.start_min < slot_end);

        let candidate_end = start + duration;
        let fits_in_day = candidate_end <= DAY_END_MIN;
        let available = fits_in_day
            && !busy
                .iter()
                .any(|b| conflicts(start, candidate_end, b.start_min, b.end_min, GAP_MIN));

        slots.push(AvailabilitySlot {
            time: format!("{:02}:{:02}", start / 60, start % 60),
            booked,
            available,
        });
        start += SLOT_MIN;
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn item(minutes_per_meter: i64, quantity: i64, depth: i64) -> ServiceItem {
        ServiceItem {
            description: "Estaca escavada".to_string(),
            diameter_mm: 300,
            soil_type: "argila".to_string(),
            access_difficulty: "normal".to_string(),
            quantity: Decimal::from(quantity),
            depth_meters: Decimal::from(depth),
            unit_price: Decimal::from(95),
            discount: Decimal::ZERO,
            final_value: Decimal::from(95 * quantity * depth),
            minutes_per_meter: Decimal::from(minutes_per_meter),
        }
    }

    fn slot<'a>(slots: &'a [AvailabilitySlot], time: &str) -> &'a AvailabilitySlot {
        slots.iter().find(|s| s.time == time).unwrap()
    }

    #[test]
    fn estima_minutos_somando_itens() {
        // 12 min/m * 2 estacas * 5 m = 120; + 10 min/m * 1 * 3 = 30
        let items = vec![item(12, 2, 5), item(10, 1, 3)];
        assert_eq!(estimate_minutes(&items), 150);
    }

    #[test]
    fn estimativa_vazia_e_zero() {
        assert_eq!(estimate_minutes(&[]), 0);
    }

    #[test]
    fn arredonda_para_multiplo_de_30() {
        assert_eq!(round_to_slot(0), 30);
        assert_eq!(round_to_slot(30), 30);
        assert_eq!(round_to_slot(31), 60);
        assert_eq!(round_to_slot(90), 90);
        assert_eq!(round_to_slot(91), 120);
    }

    #[test]
    fn dia_vazio_oferece_todos_os_slots_que_cabem() {
        let slots = build_slots(&[], 60);
        assert_eq!(slots.len(), 27); // 06:00 .. 19:00, de meia em meia hora
        assert_eq!(slots[0].time, "06:00");
        assert!(slots[0].available);
        assert!(!slots[0].booked);
        // 19:00 + 60min estoura a janela de 19:30
        assert!(!slot(&slots, "19:00").available);
        // 18:30 + 60min termina exatamente às 19:30
        assert!(slot(&slots, "18:30").available);
    }

    #[test]
    fn os_das_9_as_10h30_marca_tres_slots_ocupados() {
        // OS existente ocupando 09:00 - 10:30
        let busy = vec![BusyInterval {
            start_min: 9 * 60,
            end_min: 10 * 60 + 30,
        }];
        let slots = build_slots(&busy, 60);

        assert!(slot(&slots, "09:00").booked);
        assert!(slot(&slots, "09:30").booked);
        assert!(slot(&slots, "10:00").booked);
        assert!(!slot(&slots, "08:30").booked);
        assert!(!slot(&slots, "10:30").booked);

        // Nenhuma nova OS pode sobrepor a janela ocupada
        assert!(!slot(&slots, "09:00").available);
        assert!(!slot(&slots, "09:30").available);
        assert!(!slot(&slots, "10:00").available);
        // 08:00 + 60min terminaria às 09:00: sem o intervalo de 30min, conflita
        assert!(!slot(&slots, "08:00").available);
        assert!(slot(&slots, "07:30").available);
        // 10:30 começa colado no fim da OS: precisa do intervalo
        assert!(!slot(&slots, "10:30").available);
        assert!(slot(&slots, "11:00").available);
    }

    #[test]
    fn duracao_longa_reduz_os_inicios_possiveis() {
        let busy = vec![BusyInterval {
            start_min: 14 * 60,
            end_min: 15 * 60,
        }];
        // 6 horas de serviço
        let slots = build_slots(&busy, 360);
        // Começando às 08:00 terminaria 14:00, colado na OS das 14:00
        assert!(!slot(&slots, "08:00").available);
        assert!(slot(&slots, "07:00").available);
        // À tarde: 15:00 + gap -> primeiro início possível 15:30, mas
        // 15:30 + 6h = 21:30 estoura o dia
        assert!(!slot(&slots, "15:30").available);
    }

    #[test]
    fn intervalos_seguidos_respeitam_gap_dos_dois_lados() {
        let busy = vec![
            BusyInterval { start_min: 8 * 60, end_min: 9 * 60 },
            BusyInterval { start_min: 11 * 60, end_min: 12 * 60 },
        ];
        let slots = build_slots(&busy, 60);
        // Entre 09:00 e 11:00 só cabe começando 09:30 (gap depois da primeira,
        // termina 10:30, gap antes da segunda)
        assert!(slot(&slots, "09:30").available);
        assert!(!slot(&slots, "09:00").available);
        assert!(!slot(&slots, "10:00").available);
    }
}
