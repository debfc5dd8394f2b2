//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Router,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::{portal_guard, staff_guard};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .compact()
        .init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Limpeza periódica das capturas de localização expiradas (o Postgres não
    // tem índice TTL; a leitura já ignora expirados, aqui só removemos)
    let purge_service = app_state.travel_service.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(600));
        loop {
            interval.tick().await;
            match purge_service.purge_expired_captures().await {
                Ok(0) => {}
                Ok(n) => tracing::info!("🧹 {} capturas de localização expiradas removidas", n),
                Err(e) => tracing::warn!("Falha na limpeza de capturas expiradas: {}", e),
            }
        }
    });

    // --- Portal do cliente ---
    // Rotas autenticadas primeiro, depois as públicas (route_layer só cobre o
    // que já foi registrado)
    let portal_routes = Router::new()
        .route("/me", get(handlers::portal::me))
        .route("/jobs", get(handlers::portal::my_jobs))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            portal_guard,
        ))
        .route("/login", post(handlers::portal::login))
        .route("/forgot-password", post(handlers::portal::forgot_password))
        .route("/reset-password", post(handlers::portal::reset_password));

    let clients_routes = Router::new()
        .route(
            "/",
            get(handlers::clients::list_clients).post(handlers::clients::create_client),
        )
        .route("/watch", get(handlers::clients::watch_clients))
        .route(
            "/{id}",
            get(handlers::clients::get_client)
                .put(handlers::clients::update_client)
                .delete(handlers::clients::delete_client),
        )
        .route(
            "/{id}/portal-password",
            post(handlers::clients::set_portal_password),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            staff_guard,
        ));

    let jobs_routes = Router::new()
        .route(
            "/",
            get(handlers::jobs::list_jobs).post(handlers::jobs::create_job),
        )
        .route("/availability", get(handlers::jobs::availability))
        .route(
            "/{id}",
            get(handlers::jobs::get_job)
                .put(handlers::jobs::update_job)
                .delete(handlers::jobs::delete_job),
        )
        .route("/{id}/status", patch(handlers::jobs::transition_job))
        .route("/{id}/payment", post(handlers::jobs::record_payment))
        .route("/{id}/pdf", get(handlers::jobs::job_pdf))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            staff_guard,
        ));

    let operations_routes = Router::new()
        .route(
            "/team/{team_id}/watch",
            get(handlers::jobs::watch_team_jobs),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            staff_guard,
        ));

    let budgets_routes = Router::new()
        .route(
            "/",
            get(handlers::budgets::list_budgets).post(handlers::budgets::create_budget),
        )
        .route(
            "/{id}",
            get(handlers::budgets::get_budget)
                .put(handlers::budgets::update_budget)
                .delete(handlers::budgets::delete_budget),
        )
        .route("/{id}/approve", post(handlers::budgets::approve_budget))
        .route("/{id}/reject", post(handlers::budgets::reject_budget))
        .route("/{id}/convert", post(handlers::budgets::convert_budget))
        .route("/{id}/pdf", get(handlers::budgets::budget_pdf))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            staff_guard,
        ));

    let cashiers_routes = Router::new()
        .route("/", get(handlers::finance::list_cashiers))
        .route("/open", post(handlers::finance::open_cashier))
        .route("/current", get(handlers::finance::current_cashier))
        .route("/{id}", get(handlers::finance::cashier_summary))
        .route("/{id}/close", post(handlers::finance::close_cashier))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            staff_guard,
        ));

    let cash_tx_routes = Router::new()
        .route(
            "/",
            get(handlers::finance::list_cash_transactions)
                .post(handlers::finance::create_cash_transaction),
        )
        .route(
            "/{id}",
            axum::routing::delete(handlers::finance::delete_cash_transaction),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            staff_guard,
        ));

    let catalog_routes = Router::new()
        .route(
            "/",
            get(handlers::catalog::list_catalog).post(handlers::catalog::create_catalog_entry),
        )
        .route("/resolve", get(handlers::catalog::resolve_catalog))
        .route(
            "/{id}",
            put(handlers::catalog::update_catalog_entry)
                .delete(handlers::catalog::delete_catalog_entry),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            staff_guard,
        ));

    let machines_routes = Router::new()
        .route(
            "/",
            get(handlers::fleet::list_machines).post(handlers::fleet::create_machine),
        )
        .route(
            "/{id}",
            put(handlers::fleet::update_machine).delete(handlers::fleet::delete_machine),
        )
        .route(
            "/{id}/maintenance",
            get(handlers::fleet::list_maintenance).post(handlers::fleet::create_maintenance),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            staff_guard,
        ));

    let equipment_routes = Router::new()
        .route(
            "/",
            get(handlers::fleet::list_equipment).post(handlers::fleet::create_equipment),
        )
        .route(
            "/{id}",
            put(handlers::fleet::update_equipment).delete(handlers::fleet::delete_equipment),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            staff_guard,
        ));

    let maintenance_routes = Router::new()
        .route(
            "/{id}",
            axum::routing::delete(handlers::fleet::delete_maintenance),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            staff_guard,
        ));

    let employees_routes = Router::new()
        .route(
            "/",
            get(handlers::hr::list_employees).post(handlers::hr::create_employee),
        )
        .route(
            "/{id}",
            get(handlers::hr::get_employee)
                .put(handlers::hr::update_employee)
                .delete(handlers::hr::delete_employee),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            staff_guard,
        ));

    let teams_routes = Router::new()
        .route(
            "/",
            get(handlers::hr::list_teams).post(handlers::hr::create_team),
        )
        .route(
            "/{id}",
            get(handlers::hr::get_team)
                .put(handlers::hr::update_team)
                .delete(handlers::hr::delete_team),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            staff_guard,
        ));

    // Captura é pública; o restante do funil é interno
    let leads_routes = Router::new()
        .route("/", get(handlers::leads::list_leads))
        .route(
            "/{id}",
            get(handlers::leads::get_lead).delete(handlers::leads::delete_lead),
        )
        .route("/{id}/convert", post(handlers::leads::convert_lead))
        .route("/{id}/discard", post(handlers::leads::discard_lead))
        .route("/watch", get(handlers::leads::watch_leads))
        .route("/count/watch", get(handlers::leads::watch_pending_count))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            staff_guard,
        ))
        .route("/", post(handlers::leads::capture));

    let travel_routes = Router::new()
        .route(
            "/",
            get(handlers::travel::list_rules).post(handlers::travel::create_rule),
        )
        .route(
            "/{id}",
            put(handlers::travel::update_rule).delete(handlers::travel::delete_rule),
        )
        .route("/resolve", post(handlers::travel::resolve_travel))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            staff_guard,
        ));

    // Submissão da coordenada é pública (link aberto no celular do cliente)
    let captures_routes = Router::new()
        .route("/", post(handlers::travel::create_capture))
        .route("/{token}", get(handlers::travel::get_capture))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            staff_guard,
        ))
        .route("/{token}", put(handlers::travel::submit_capture));

    // Download com assinatura é público; o restante é interno
    let documents_routes = Router::new()
        .route(
            "/",
            get(handlers::documents::list_documents).post(handlers::documents::upload_document),
        )
        .route(
            "/{id}",
            get(handlers::documents::get_document).delete(handlers::documents::delete_document),
        )
        .route("/{id}/url", get(handlers::documents::document_url))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            staff_guard,
        ))
        .route("/{id}/download", get(handlers::documents::download_document));

    let users_routes = Router::new()
        .route(
            "/",
            get(handlers::admin::list_users).post(handlers::admin::create_user),
        )
        .route("/me", get(handlers::admin::get_me))
        .route(
            "/{id}",
            put(handlers::admin::update_user).delete(handlers::admin::delete_user),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            staff_guard,
        ));

    let settings_routes = Router::new()
        .route(
            "/",
            get(handlers::admin::get_settings).put(handlers::admin::update_settings),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            staff_guard,
        ));

    let audit_routes = Router::new()
        .route("/", get(handlers::admin::list_audit))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            staff_guard,
        ));

    let social_routes = Router::new()
        .route(
            "/",
            get(handlers::admin::list_social).post(handlers::admin::create_social),
        )
        .route(
            "/{id}",
            put(handlers::admin::update_social).delete(handlers::admin::delete_social),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            staff_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/portal", portal_routes)
        .nest("/api/clients", clients_routes)
        .nest("/api/jobs", jobs_routes)
        .nest("/api/operations", operations_routes)
        .nest("/api/budgets", budgets_routes)
        .nest("/api/cashiers", cashiers_routes)
        .nest("/api/cash-transactions", cash_tx_routes)
        .nest("/api/catalog", catalog_routes)
        .nest("/api/machines", machines_routes)
        .nest("/api/equipment", equipment_routes)
        .nest("/api/maintenance", maintenance_routes)
        .nest("/api/employees", employees_routes)
        .nest("/api/teams", teams_routes)
        .nest("/api/orcamento-requests", leads_routes)
        .nest("/api/travel-pricing", travel_routes)
        .route(
            "/api/distance",
            post(handlers::travel::distance).layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                staff_guard,
            )),
        )
        .nest("/api/location-captures", captures_routes)
        .nest("/api/documents", documents_routes)
        .nest("/api/users", users_routes)
        .nest("/api/settings", settings_routes)
        .nest("/api/audit", audit_routes)
        .nest("/api/social-media", social_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state.clone());

    // Inicia o servidor
    let addr = app_state.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
