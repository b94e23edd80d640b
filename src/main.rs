//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch},
    Json, Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;

use garagem::{
    config::{AppConfig, AppState},
    docs::ApiDoc,
    handlers,
    middleware::auth::auth_guard,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let config = AppConfig::from_env().expect("Falha ao ler a configuração.");
    let bind_addr = config.bind_addr.clone();

    let app_state = AppState::new(config)
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let vehicle_routes = Router::new()
        .route("/"
               ,get(handlers::vehicles::list_vehicles)
               .post(handlers::vehicles::create_vehicle)
        )
        .route("/{id}"
               ,get(handlers::vehicles::get_vehicle)
               .patch(handlers::vehicles::update_vehicle)
               .delete(handlers::vehicles::delete_vehicle)
        )
        // Histórico
        .route("/{id}/maintenances"
               ,get(handlers::vehicles::list_maintenances)
               .post(handlers::vehicles::create_maintenance)
        )
        .route("/{id}/maintenances/{maintenance_id}"
               ,patch(handlers::vehicles::update_maintenance)
               .delete(handlers::vehicles::delete_maintenance)
        )
        // Regras, revisões, alertas e selo
        .route("/{id}/rules", get(handlers::vehicles::list_rules))
        .route("/{id}/rules/categories", get(handlers::vehicles::list_rule_categories))
        .route("/{id}/revisions"
               ,get(handlers::vehicles::get_revisions)
               .delete(handlers::vehicles::clear_revisions)
        )
        .route("/{id}/alerts", get(handlers::alerts::vehicle_alerts))
        .route("/{id}/badge"
               ,get(handlers::alerts::get_badge)
               .post(handlers::alerts::recompute_badge)
        )
        // Documentos
        .route("/{id}/export.csv", get(handlers::documents::export_csv))
        .route("/{id}/export.pdf", get(handlers::documents::export_pdf))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let alert_routes = Router::new()
        .route("/", get(handlers::alerts::list_alerts))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let dashboard_routes = Router::new()
        .route("/summary", get(handlers::dashboard::get_summary))
        .route("/monthly-costs", get(handlers::dashboard::get_monthly_costs))
        .route("/top-services", get(handlers::dashboard::get_top_services))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api/vehicles", vehicle_routes)
        .nest("/api/alerts", alert_routes)
        .nest("/api/dashboard", dashboard_routes)
        .with_state(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", bind_addr);
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
