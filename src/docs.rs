// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Vehicles ---
        handlers::vehicles::create_vehicle,
        handlers::vehicles::list_vehicles,
        handlers::vehicles::get_vehicle,
        handlers::vehicles::update_vehicle,
        handlers::vehicles::delete_vehicle,

        // --- Maintenances ---
        handlers::vehicles::create_maintenance,
        handlers::vehicles::list_maintenances,
        handlers::vehicles::update_maintenance,
        handlers::vehicles::delete_maintenance,

        // --- Rules ---
        handlers::vehicles::list_rules,
        handlers::vehicles::list_rule_categories,
        handlers::vehicles::get_revisions,
        handlers::vehicles::clear_revisions,

        // --- Alerts / Badges ---
        handlers::alerts::list_alerts,
        handlers::alerts::vehicle_alerts,
        handlers::alerts::get_badge,
        handlers::alerts::recompute_badge,

        // --- Documents ---
        handlers::documents::export_csv,
        handlers::documents::export_pdf,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
        handlers::dashboard::get_monthly_costs,
        handlers::dashboard::get_top_services,
    ),
    components(
        schemas(
            // --- Vehicles ---
            models::vehicle::Vehicle,
            models::vehicle::CreateVehiclePayload,
            models::vehicle::UpdateVehiclePayload,

            // --- Maintenances ---
            models::maintenance::MaintenanceRecord,
            models::maintenance::CreateMaintenancePayload,
            models::maintenance::UpdateMaintenancePayload,

            // --- Rules ---
            models::rule::Criticality,
            models::rule::MaintenanceKind,
            models::rule::MaintenanceRule,
            models::rule::VehicleRevision,

            // --- Alerts / Badges ---
            models::alert::AlertStatus,
            models::alert::Alert,
            models::badge::BadgeTier,
            models::badge::QualityBadge,

            // --- Dashboard ---
            models::dashboard::FleetSummary,
            models::dashboard::MonthlyCostEntry,
            models::dashboard::TopServiceEntry,
        )
    ),
    tags(
        (name = "Vehicles", description = "Cadastro de Veículos"),
        (name = "Maintenances", description = "Histórico de Manutenções"),
        (name = "Rules", description = "Regras de Manutenção e Plano da Montadora"),
        (name = "Alerts", description = "Alertas de Vencimento"),
        (name = "Badges", description = "Selo de Qualidade da Manutenção"),
        (name = "Documents", description = "Exportação do Histórico (CSV e PDF)"),
        (name = "Dashboard", description = "Indicadores da Frota")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
