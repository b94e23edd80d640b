//! In-memory stores and a scripted rule provider shared by the integration tests.
#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use garagem::{
    common::error::AppError,
    db::{BadgeStore, DashboardStore, MaintenanceStore, RevisionCacheStore, VehicleStore},
    models::{
        badge::QualityBadge,
        dashboard::{FleetTotals, MonthlyCostEntry, TopServiceEntry},
        maintenance::{CreateMaintenancePayload, MaintenanceRecord, UpdateMaintenancePayload},
        rule::{Criticality, MaintenanceKind, MaintenanceRule, VehicleRevision},
        vehicle::{NewVehicle, UpdateVehiclePayload, Vehicle},
    },
    services::rule_provider::RuleProvider,
};

// ---------------------------------------------------------------------------
// Vehicles
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryVehicles {
    rows: Mutex<HashMap<Uuid, Vehicle>>,
}

impl MemoryVehicles {
    pub fn all(&self) -> Vec<Vehicle> {
        self.rows.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl VehicleStore for MemoryVehicles {
    async fn get_vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn list_vehicles(&self, user_id: Uuid) -> Result<Vec<Vehicle>, AppError> {
        let mut vehicles: Vec<Vehicle> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect();
        vehicles.sort_by_key(|v| v.created_at);
        Ok(vehicles)
    }

    async fn insert_vehicle(&self, user_id: Uuid, vehicle: &NewVehicle) -> Result<Vehicle, AppError> {
        let now = Utc::now();
        let row = Vehicle {
            id: Uuid::new_v4(),
            user_id,
            brand: vehicle.brand.clone(),
            model: vehicle.model.clone(),
            year: vehicle.year,
            plate: vehicle.plate.clone(),
            initial_km: vehicle.initial_km,
            current_km: vehicle.current_km,
            revisions_fetched: false,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_vehicle(&self, id: Uuid, patch: &UpdateVehiclePayload) -> Result<Vehicle, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.get_mut(&id).ok_or(AppError::VehicleNotFound)?;
        if let Some(brand) = &patch.brand {
            row.brand = brand.clone();
        }
        if let Some(model) = &patch.model {
            row.model = model.clone();
        }
        if let Some(year) = patch.year {
            row.year = year;
        }
        if let Some(plate) = &patch.plate {
            row.plate = plate.clone();
        }
        if let Some(km) = patch.current_km {
            row.current_km = km;
        }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_vehicle(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.rows.lock().unwrap().remove(&id).is_some())
    }
}

// ---------------------------------------------------------------------------
// Maintenances
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryMaintenances {
    rows: Mutex<Vec<MaintenanceRecord>>,
}

impl MemoryMaintenances {
    pub fn all(&self) -> Vec<MaintenanceRecord> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl MaintenanceStore for MemoryMaintenances {
    async fn list_maintenances(&self, vehicle_id: Uuid) -> Result<Vec<MaintenanceRecord>, AppError> {
        let mut records: Vec<MaintenanceRecord> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.vehicle_id == vehicle_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            b.performed_on
                .cmp(&a.performed_on)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(records)
    }

    async fn get_maintenance(&self, id: Uuid) -> Result<Option<MaintenanceRecord>, AppError> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn insert_maintenance(
        &self,
        vehicle_id: Uuid,
        payload: &CreateMaintenancePayload,
    ) -> Result<MaintenanceRecord, AppError> {
        let now = Utc::now();
        let record = MaintenanceRecord {
            id: Uuid::new_v4(),
            vehicle_id,
            performed_on: payload.performed_on,
            service_type: payload.service_type.clone(),
            km: payload.km,
            cost: payload.cost,
            notes: payload.notes.clone(),
            attachment_ref: payload.attachment_ref.clone(),
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update_maintenance(
        &self,
        id: Uuid,
        patch: &UpdateMaintenancePayload,
    ) -> Result<MaintenanceRecord, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.iter_mut().find(|r| r.id == id).ok_or(AppError::MaintenanceNotFound)?;
        if let Some(date) = patch.performed_on {
            row.performed_on = date;
        }
        if let Some(service_type) = &patch.service_type {
            row.service_type = service_type.clone();
        }
        if let Some(km) = patch.km {
            row.km = km;
        }
        if let Some(cost) = patch.cost {
            row.cost = cost;
        }
        if let Some(notes) = &patch.notes {
            row.notes = notes.clone();
        }
        if let Some(attachment_ref) = &patch.attachment_ref {
            row.attachment_ref = attachment_ref.clone();
        }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_maintenance(&self, id: Uuid) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        Ok(rows.len() < before)
    }

    async fn latest_km(&self, vehicle_id: Uuid) -> Result<Option<i32>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.vehicle_id == vehicle_id)
            .map(|r| r.km)
            .max())
    }
}

// ---------------------------------------------------------------------------
// Badges
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryBadges {
    rows: Mutex<HashMap<Uuid, QualityBadge>>,
}

impl MemoryBadges {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl BadgeStore for MemoryBadges {
    async fn get(&self, vehicle_id: Uuid) -> Result<Option<QualityBadge>, AppError> {
        Ok(self.rows.lock().unwrap().get(&vehicle_id).cloned())
    }

    async fn upsert(&self, badge: &QualityBadge) -> Result<QualityBadge, AppError> {
        self.rows.lock().unwrap().insert(badge.vehicle_id, badge.clone());
        Ok(badge.clone())
    }
}

// ---------------------------------------------------------------------------
// Revision cache
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryRevisions {
    rows: Mutex<Vec<VehicleRevision>>,
    fetched: Mutex<HashMap<Uuid, bool>>,
    pub fail_inserts: bool,
}

impl MemoryRevisions {
    pub fn failing_inserts() -> Self {
        Self { fail_inserts: true, ..Default::default() }
    }

    pub fn row_count(&self, vehicle_id: Uuid) -> usize {
        self.rows.lock().unwrap().iter().filter(|r| r.vehicle_id == vehicle_id).count()
    }

    pub fn is_fetched(&self, vehicle_id: Uuid) -> bool {
        self.fetched.lock().unwrap().get(&vehicle_id).copied().unwrap_or(false)
    }
}

#[async_trait]
impl RevisionCacheStore for MemoryRevisions {
    async fn list_by_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<VehicleRevision>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.vehicle_id == vehicle_id)
            .cloned()
            .collect())
    }

    async fn bulk_insert(&self, vehicle_id: Uuid, rules: &[MaintenanceRule]) -> Result<u64, AppError> {
        if self.fail_inserts {
            return Err(AppError::DatabaseError(sqlx::Error::PoolTimedOut));
        }
        let mut rows = self.rows.lock().unwrap();
        for rule in rules {
            rows.push(VehicleRevision {
                id: Uuid::new_v4(),
                vehicle_id,
                rule: rule.clone(),
                created_at: Utc::now(),
            });
        }
        Ok(rules.len() as u64)
    }

    async fn fetched_flag(&self, vehicle_id: Uuid) -> Result<bool, AppError> {
        Ok(self.is_fetched(vehicle_id))
    }

    async fn set_fetched_flag(&self, vehicle_id: Uuid, value: bool) -> Result<(), AppError> {
        self.fetched.lock().unwrap().insert(vehicle_id, value);
        Ok(())
    }

    async fn delete_by_vehicle(&self, vehicle_id: Uuid) -> Result<u64, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.vehicle_id != vehicle_id);
        Ok((before - rows.len()) as u64)
    }
}

// ---------------------------------------------------------------------------
// Dashboard (computed over the two memory stores)
// ---------------------------------------------------------------------------

pub struct MemoryDashboard {
    pub vehicles: Arc<MemoryVehicles>,
    pub maintenances: Arc<MemoryMaintenances>,
}

impl MemoryDashboard {
    fn records_of(&self, user_id: Uuid) -> Vec<MaintenanceRecord> {
        let owned: Vec<Uuid> = self
            .vehicles
            .all()
            .into_iter()
            .filter(|v| v.user_id == user_id)
            .map(|v| v.id)
            .collect();
        self.maintenances
            .all()
            .into_iter()
            .filter(|r| owned.contains(&r.vehicle_id))
            .collect()
    }
}

#[async_trait]
impl DashboardStore for MemoryDashboard {
    async fn fleet_totals(&self, user_id: Uuid, since: NaiveDate) -> Result<FleetTotals, AppError> {
        let records = self.records_of(user_id);
        Ok(FleetTotals {
            vehicle_count: self.vehicles.all().iter().filter(|v| v.user_id == user_id).count() as i64,
            maintenance_count: records.len() as i64,
            total_spent: records.iter().map(|r| r.cost).sum(),
            spent_last_30_days: records
                .iter()
                .filter(|r| r.performed_on >= since)
                .map(|r| r.cost)
                .sum(),
        })
    }

    async fn monthly_costs(&self, user_id: Uuid, since: NaiveDate) -> Result<Vec<MonthlyCostEntry>, AppError> {
        let mut months: Vec<MonthlyCostEntry> = Vec::new();
        let mut records = self.records_of(user_id);
        records.sort_by_key(|r| r.performed_on);
        for record in records.into_iter().filter(|r| r.performed_on >= since) {
            let month = record.performed_on.format("%Y-%m").to_string();
            match months.iter_mut().find(|m| m.month == month) {
                Some(entry) => entry.total += record.cost,
                None => months.push(MonthlyCostEntry { month, total: record.cost }),
            }
        }
        Ok(months)
    }

    async fn top_services(&self, user_id: Uuid, limit: i64) -> Result<Vec<TopServiceEntry>, AppError> {
        let mut services: Vec<TopServiceEntry> = Vec::new();
        for record in self.records_of(user_id) {
            match services.iter_mut().find(|s| s.service_type == record.service_type) {
                Some(entry) => {
                    entry.occurrences += 1;
                    entry.total_cost += record.cost;
                }
                None => services.push(TopServiceEntry {
                    service_type: record.service_type.clone(),
                    occurrences: 1,
                    total_cost: record.cost,
                }),
            }
        }
        services.sort_by(|a, b| b.total_cost.cmp(&a.total_cost));
        services.truncate(limit as usize);
        Ok(services)
    }
}

// ---------------------------------------------------------------------------
// Rule provider
// ---------------------------------------------------------------------------

/// Provider that counts calls and can be told to fail for one brand.
#[derive(Default)]
pub struct ScriptedProvider {
    pub rules: Vec<MaintenanceRule>,
    pub calls: AtomicUsize,
    pub failing_brand: Option<String>,
    pub delay: Option<Duration>,
}

impl ScriptedProvider {
    pub fn with_rules(rules: Vec<MaintenanceRule>) -> Self {
        Self { rules, ..Default::default() }
    }

    pub fn failing_for(brand: &str, rules: Vec<MaintenanceRule>) -> Self {
        Self { rules, failing_brand: Some(brand.to_string()), ..Default::default() }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RuleProvider for ScriptedProvider {
    async fn recommendations(
        &self,
        brand: &str,
        _model: &str,
        _year: i32,
    ) -> Result<Vec<MaintenanceRule>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing_brand.as_deref() == Some(brand) {
            return Err(AppError::TransientFetch(format!("API fora do ar para {}", brand)));
        }
        Ok(self.rules.clone())
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn rule(item: &str, km_interval: Option<i32>, month_interval: Option<i32>, criticality: Criticality) -> MaintenanceRule {
    MaintenanceRule {
        category: "Motor".into(),
        item: item.into(),
        description: format!("{} conforme manual", item),
        km_interval,
        month_interval,
        kind: MaintenanceKind::Preventiva,
        criticality,
        cost_min: None,
        cost_max: None,
    }
}

pub fn new_vehicle(brand: &str, initial_km: i32, current_km: i32) -> NewVehicle {
    NewVehicle {
        brand: brand.into(),
        model: "Gol".into(),
        year: 2019,
        plate: "ABC1D23".into(),
        initial_km,
        current_km,
    }
}

pub fn maintenance(service_type: &str, km: i32, performed_on: NaiveDate, cost: Decimal) -> CreateMaintenancePayload {
    CreateMaintenancePayload {
        performed_on,
        service_type: service_type.into(),
        km,
        cost,
        notes: None,
        attachment_ref: None,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
