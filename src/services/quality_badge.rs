// src/services/quality_badge.rs

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    models::{
        alert::AlertStatus,
        badge::{BadgeTier, QualityBadge},
        maintenance::MaintenanceRecord,
        rule::{Criticality, MaintenanceRule},
        vehicle::Vehicle,
    },
    services::due_status::assess_rule,
};

// (críticas, altas, todas) mínimos de cada nível, do mais alto para o mais baixo
const TIER_THRESHOLDS: [(BadgeTier, f64, f64, f64); 3] = [
    (BadgeTier::Ouro, 95.0, 90.0, 85.0),
    (BadgeTier::Prata, 90.0, 80.0, 70.0),
    (BadgeTier::Bronze, 80.0, 65.0, 50.0),
];

/// Percentual em dia. Partição vazia conta como 100%.
pub fn on_time_pct(total: usize, late: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    let on_time = total.saturating_sub(late);
    (on_time as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

/// Primeiro nível cujos três mínimos são atendidos.
pub fn tier_for(pct_critical: f64, pct_high: f64, pct_all: f64) -> BadgeTier {
    TIER_THRESHOLDS
        .iter()
        .find(|(_, critical, high, all)| {
            pct_critical >= *critical && pct_high >= *high && pct_all >= *all
        })
        .map(|(tier, ..)| *tier)
        .unwrap_or(BadgeTier::Nenhum)
}

#[derive(Debug, Default)]
struct Tally {
    total: usize,
    late: usize,
}

/// Calcula o selo: cada regra é "atrasada" (vencida por km ou tempo) ou "em dia".
/// "Vence em breve" conta como em dia.
pub fn compute_badge(
    vehicle: &Vehicle,
    history: &[MaintenanceRecord],
    rules: &[MaintenanceRule],
    today: NaiveDate,
    computed_at: DateTime<Utc>,
) -> QualityBadge {
    let mut critical = Tally::default();
    let mut high = Tally::default();
    let mut all = Tally::default();
    let (mut late_medium, mut late_low) = (0, 0);

    for rule in rules {
        let late = assess_rule(vehicle, history, rule, today).status == AlertStatus::Overdue;
        let late_count = usize::from(late);

        all.total += 1;
        all.late += late_count;

        match rule.criticality {
            Criticality::Critica => {
                critical.total += 1;
                critical.late += late_count;
            }
            Criticality::Alta => {
                high.total += 1;
                high.late += late_count;
            }
            Criticality::Media => late_medium += late_count,
            Criticality::Baixa => late_low += late_count,
        }
    }

    let pct_critical = on_time_pct(critical.total, critical.late);
    let pct_high = on_time_pct(high.total, high.late);
    let pct_all = on_time_pct(all.total, all.late);

    QualityBadge {
        vehicle_id: vehicle.id,
        tier: tier_for(pct_critical, pct_high, pct_all),
        pct_critical,
        pct_high,
        pct_all,
        overdue_critical: count(critical.late),
        overdue_high: count(high.late),
        overdue_medium: count(late_medium),
        overdue_low: count(late_low),
        computed_at,
    }
}

fn count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rule::MaintenanceKind;
    use uuid::Uuid;

    fn vehicle(initial_km: i32, current_km: i32) -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            brand: "Fiat".into(),
            model: "Argo".into(),
            year: 2021,
            plate: "BRA2E19".into(),
            initial_km,
            current_km,
            revisions_fetched: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn rule(item: &str, km_interval: i32, criticality: Criticality) -> MaintenanceRule {
        MaintenanceRule {
            category: "Geral".into(),
            item: item.into(),
            description: String::new(),
            km_interval: Some(km_interval),
            month_interval: None,
            kind: MaintenanceKind::Preventiva,
            criticality,
            cost_min: None,
            cost_max: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn empty_partition_counts_as_full_compliance() {
        assert_eq!(on_time_pct(0, 0), 100.0);
        assert_eq!(on_time_pct(4, 1), 75.0);
        assert_eq!(on_time_pct(3, 3), 0.0);
    }

    #[test]
    fn tiers_follow_thresholds_from_top_down() {
        assert_eq!(tier_for(100.0, 100.0, 100.0), BadgeTier::Ouro);
        assert_eq!(tier_for(95.0, 90.0, 85.0), BadgeTier::Ouro);
        assert_eq!(tier_for(96.0, 85.0, 80.0), BadgeTier::Prata);
        assert_eq!(tier_for(80.0, 65.0, 50.0), BadgeTier::Bronze);
        assert_eq!(tier_for(100.0, 100.0, 49.9), BadgeTier::Nenhum);
    }

    #[test]
    fn raising_any_percentage_never_downgrades() {
        let steps = [0.0, 49.0, 50.0, 64.0, 65.0, 70.0, 79.0, 80.0, 85.0, 89.0, 90.0, 94.0, 95.0, 100.0];
        for &c in &steps {
            for &h in &steps {
                for &a in &steps {
                    let base = tier_for(c, h, a);
                    assert!(tier_for((c + 5.0).min(100.0), h, a) >= base);
                    assert!(tier_for(c, (h + 5.0).min(100.0), a) >= base);
                    assert!(tier_for(c, h, (a + 5.0).min(100.0)) >= base);
                }
            }
        }
    }

    #[test]
    fn vehicle_without_critical_rules_can_still_be_gold() {
        let v = vehicle(1000, 1000);
        let rules = vec![
            rule("Troca de óleo", 10000, Criticality::Alta),
            rule("Filtro de ar", 15000, Criticality::Media),
        ];
        let badge = compute_badge(&v, &[], &rules, today(), Utc::now());

        assert_eq!(badge.pct_critical, 100.0);
        assert_eq!(badge.pct_high, 100.0);
        assert_eq!(badge.pct_all, 100.0);
        assert_eq!(badge.tier, BadgeTier::Ouro);
    }

    #[test]
    fn overdue_rules_are_counted_per_criticality() {
        // Sem histórico, a partir de 1 km: marcos de 30000, 10000 e 5000 já passaram
        let v = vehicle(1, 31000);
        let rules = vec![
            rule("Pastilhas de freio", 30000, Criticality::Critica), // atrasada
            rule("Correia dentada", 60000, Criticality::Critica),    // em dia
            rule("Troca de óleo", 10000, Criticality::Alta),         // atrasada
            rule("Rodízio de pneus", 5000, Criticality::Media),      // atrasada
            rule("Palhetas", 40000, Criticality::Baixa),             // em dia
        ];
        let badge = compute_badge(&v, &[], &rules, today(), Utc::now());

        assert_eq!(badge.overdue_critical, 1);
        assert_eq!(badge.overdue_high, 1);
        assert_eq!(badge.overdue_medium, 1);
        assert_eq!(badge.overdue_low, 0);
        assert_eq!(badge.pct_critical, 50.0);
        assert_eq!(badge.pct_high, 0.0);
        assert_eq!(badge.pct_all, 40.0);
        assert_eq!(badge.tier, BadgeTier::Nenhum);
    }

    #[test]
    fn due_soon_still_counts_as_on_time() {
        let v = vehicle(1, 9800);
        let rules = vec![rule("Troca de óleo", 10000, Criticality::Critica)];
        let badge = compute_badge(&v, &[], &rules, today(), Utc::now());

        assert_eq!(badge.overdue_critical, 0);
        assert_eq!(badge.tier, BadgeTier::Ouro);
    }
}
