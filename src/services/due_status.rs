// src/services/due_status.rs
//
// Avaliação de vencimento das regras de manutenção de um veículo.
// Tudo aqui é puro: recebe um retrato dos dados e a data de hoje.

use chrono::{Months, NaiveDate};

use crate::models::{
    alert::{Alert, AlertStatus},
    maintenance::MaintenanceRecord,
    rule::MaintenanceRule,
    vehicle::Vehicle,
};

/// Faltando até esta quilometragem a regra já é "vence em breve".
pub const DUE_SOON_KM: i32 = 500;
/// Idem, em dias.
pub const DUE_SOON_DAYS: i64 = 15;

/// Resultado da avaliação de uma regra, mesmo quando está em dia.
#[derive(Debug, Clone)]
pub struct RuleAssessment<'a> {
    pub rule: &'a MaintenanceRule,
    pub status: AlertStatus,
    pub remaining_km: Option<i32>,
    pub remaining_days: Option<i64>,
    pub last: Option<&'a MaintenanceRecord>,
}

/// Junção por texto entre o serviço registrado e o item da regra:
/// um contém o outro, sem diferenciar maiúsculas.
///
/// É um acoplamento frágil ("Óleo" casa com "Troca de óleo" e com
/// "Filtro de óleo"), mas os dados não trazem chave melhor.
pub fn matches_rule(service_type: &str, item: &str) -> bool {
    let service = service_type.trim().to_lowercase();
    let item = item.trim().to_lowercase();
    if service.is_empty() || item.is_empty() {
        return false;
    }
    service.contains(&item) || item.contains(&service)
}

/// Manutenção mais recente que casa com o item. Empate de data: maior km,
/// depois a cadastrada por último.
pub fn latest_matching<'a>(
    history: &'a [MaintenanceRecord],
    item: &str,
) -> Option<&'a MaintenanceRecord> {
    history
        .iter()
        .filter(|record| matches_rule(&record.service_type, item))
        .max_by(|a, b| {
            a.performed_on
                .cmp(&b.performed_on)
                .then(a.km.cmp(&b.km))
                .then(a.created_at.cmp(&b.created_at))
        })
}

/// Próximo múltiplo do intervalo a partir do km inicial: `ceil(initial / interval) * interval`.
/// Veículo cadastrado com 0 km tem o marco em 0.
pub fn next_milestone(initial_km: i32, interval: i32) -> i32 {
    let initial = i64::from(initial_km.max(0));
    let interval_wide = i64::from(interval);
    let milestone = (initial + interval_wide - 1) / interval_wide * interval_wide;
    i32::try_from(milestone).unwrap_or(i32::MAX)
}

pub fn assess_rule<'a>(
    vehicle: &Vehicle,
    history: &'a [MaintenanceRecord],
    rule: &'a MaintenanceRule,
    today: NaiveDate,
) -> RuleAssessment<'a> {
    let last = latest_matching(history, &rule.item);
    let mut status = AlertStatus::Ok;
    let mut remaining_km = None;
    let mut remaining_days = None;

    // 1. Quilometragem
    if let Some(interval) = rule.km_interval.filter(|km| *km > 0) {
        let remaining = match last {
            Some(record) => interval - (vehicle.current_km - record.km),
            None => next_milestone(vehicle.initial_km, interval) - vehicle.current_km,
        };
        remaining_km = Some(remaining);

        if remaining <= 0 {
            status = AlertStatus::Overdue;
        } else if remaining <= DUE_SOON_KM {
            status = AlertStatus::DueSoon;
        }
    }

    // 2. Tempo (só existe referência se houver manutenção registrada)
    if let (Some(months), Some(record)) = (rule.month_interval.filter(|m| *m > 0), last) {
        let due_date = record
            .performed_on
            .checked_add_months(Months::new(months.unsigned_abs()));

        if let Some(due_date) = due_date {
            let days = (due_date - today).num_days();
            remaining_days = Some(days);

            if days <= 0 {
                status = AlertStatus::Overdue;
            } else if days <= DUE_SOON_DAYS && status != AlertStatus::Overdue {
                status = AlertStatus::DueSoon;
            }
        }
    }

    RuleAssessment { rule, status, remaining_km, remaining_days, last }
}

/// Avalia todas as regras e devolve só o que não está em dia,
/// com os atrasados na frente.
pub fn evaluate_vehicle(
    vehicle: &Vehicle,
    history: &[MaintenanceRecord],
    rules: &[MaintenanceRule],
    today: NaiveDate,
) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = rules
        .iter()
        .map(|rule| assess_rule(vehicle, history, rule, today))
        .filter(|assessment| assessment.status != AlertStatus::Ok)
        .map(|assessment| to_alert(vehicle, &assessment))
        .collect();

    sort_alerts(&mut alerts);
    alerts
}

/// Atrasados primeiro. Ordenação estável: o resto mantém a ordem das regras.
pub fn sort_alerts(alerts: &mut [Alert]) {
    alerts.sort_by_key(|alert| alert.status != AlertStatus::Overdue);
}

fn to_alert(vehicle: &Vehicle, assessment: &RuleAssessment<'_>) -> Alert {
    Alert {
        vehicle_id: vehicle.id,
        vehicle_name: vehicle.display_name(),
        rule: assessment.rule.clone(),
        status: assessment.status,
        message: alert_message(assessment),
        remaining_km: assessment.remaining_km,
        remaining_days: assessment.remaining_days,
        last_maintenance_date: assessment.last.map(|r| r.performed_on),
        last_maintenance_km: assessment.last.map(|r| r.km),
    }
}

fn alert_message(assessment: &RuleAssessment<'_>) -> String {
    let item = &assessment.rule.item;
    let km = assessment.remaining_km;
    let days = assessment.remaining_days;

    match assessment.status {
        AlertStatus::Overdue => match (km, days) {
            (Some(km), _) if km <= 0 => format!("{}: atrasada em {} km", item, -km),
            (_, Some(days)) => format!("{}: atrasada há {} dias", item, -days),
            _ => format!("{}: atrasada", item),
        },
        AlertStatus::DueSoon => match (km, days) {
            (Some(km), _) if km <= DUE_SOON_KM => format!("{}: faltam {} km", item, km),
            (_, Some(days)) => format!("{}: faltam {} dias", item, days),
            _ => format!("{}: vence em breve", item),
        },
        AlertStatus::Ok => format!("{}: em dia", item),
    }
}
