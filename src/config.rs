// src/config.rs

use std::{env, str::FromStr, sync::Arc, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        BadgeRepository, DashboardRepository, MaintenanceRepository, RevisionRepository,
        VehicleRepository,
    },
    services::{
        alert_service::AlertService, badge_service::BadgeService,
        dashboard_service::DashboardService, document_service::DocumentService,
        maintenance_service::MaintenanceService, remote_rules::RemoteRuleProvider,
        revision_cache::{CachedRuleProvider, RevisionCacheService},
        rule_provider::{RuleProvider, StaticRuleProvider},
        vehicle_service::VehicleService,
    },
};

/// De onde vêm as regras de manutenção.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSource {
    Static, // Catálogo embutido
    Remote, // Plano da montadora via API externa
}

impl FromStr for RuleSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "remote" => Ok(Self::Remote),
            other => Err(anyhow::anyhow!("RULE_SOURCE inválida: '{}' (use static ou remote)", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub rule_source: RuleSource,
    // Só são exigidas na hora da chamada externa
    pub revision_api_url: Option<String>,
    pub revision_api_key: Option<String>,
    pub fonts_dir: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL deve ser definida"))?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET deve ser definido"))?;

        let rule_source = match env::var("RULE_SOURCE") {
            Ok(value) => value.parse()?,
            Err(_) => RuleSource::Static,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            rule_source,
            revision_api_url: non_empty_var("REVISION_API_URL"),
            revision_api_key: non_empty_var("REVISION_API_KEY"),
            fonts_dir: env::var("FONTS_DIR").unwrap_or_else(|_| "./fonts".to_string()),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub config: AppConfig,
    pub rule_provider: Arc<dyn RuleProvider>,
    pub vehicle_service: VehicleService,
    pub maintenance_service: MaintenanceService,
    pub alert_service: AlertService,
    pub badge_service: BadgeService,
    pub dashboard_service: DashboardService,
    pub document_service: DocumentService,
    // Só existe com RULE_SOURCE=remote
    pub revision_cache: Option<RevisionCacheService>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let vehicles = Arc::new(VehicleRepository::new(db_pool.clone()));
        let maintenances = Arc::new(MaintenanceRepository::new(db_pool.clone()));
        let badges = Arc::new(BadgeRepository::new(db_pool.clone()));
        let revisions = Arc::new(RevisionRepository::new(db_pool.clone()));
        let dashboard = Arc::new(DashboardRepository::new(db_pool.clone()));

        let (rule_provider, revision_cache) = match config.rule_source {
            RuleSource::Static => {
                let catalog: Arc<dyn RuleProvider> = Arc::new(StaticRuleProvider::new());
                (catalog, None)
            }
            RuleSource::Remote => {
                let remote: Arc<dyn RuleProvider> = Arc::new(RemoteRuleProvider::new(
                    config.revision_api_url.clone(),
                    config.revision_api_key.clone(),
                ));
                let cache = RevisionCacheService::new(revisions, remote);
                // Alertas e selo leem o plano gravado; a API só é chamada sem cache
                let cached: Arc<dyn RuleProvider> = Arc::new(CachedRuleProvider::new(cache.clone()));
                (cached, Some(cache))
            }
        };
        tracing::info!("📚 Fonte de regras: {:?}", config.rule_source);

        let vehicle_service =
            VehicleService::new(vehicles.clone(), maintenances.clone(), revision_cache.clone());
        let maintenance_service = MaintenanceService::new(vehicles.clone(), maintenances.clone());
        let alert_service =
            AlertService::new(vehicles.clone(), maintenances.clone(), rule_provider.clone());
        let badge_service = BadgeService::new(
            vehicles.clone(),
            maintenances.clone(),
            rule_provider.clone(),
            badges,
        );
        let dashboard_service = DashboardService::new(dashboard, alert_service.clone());
        let document_service =
            DocumentService::new(vehicles, maintenances, config.fonts_dir.clone());

        Ok(Self {
            db_pool,
            jwt_secret: config.jwt_secret.clone(),
            config,
            rule_provider,
            vehicle_service,
            maintenance_service,
            alert_service,
            badge_service,
            dashboard_service,
            document_service,
            revision_cache,
        })
    }
}
