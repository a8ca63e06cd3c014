use anyhow::Context;
use axum::Router;
use lifecycle::{
    Database,
    repository::CompetitionRepository,
    services::{LifecycleService, SystemClock},
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;

use config::Config;
use middleware::auth::ApiKeys;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::competitions::handlers::list_competitions,
        features::competitions::handlers::get_competition,
        features::competitions::handlers::propose_transition,
        features::competitions::handlers::confirm_transition,
        features::competitions::handlers::execute_transition,
    ),
    components(
        schemas(
            lifecycle::dto::competition::TransitionRequest,
            lifecycle::dto::competition::ExecuteTransitionRequest,
            lifecycle::dto::competition::CompetitionView,
            lifecycle::dto::common::PaginationMeta,
            lifecycle::models::CompetitionRecord,
            lifecycle::models::CompetitionStatus,
            lifecycle::models::Phase,
            lifecycle::services::DriftReport,
            lifecycle::services::RequirementReport,
            lifecycle::services::TransitionProposal,
            lifecycle::services::ValidationResult,
        )
    ),
    tags(
        (name = "competitions", description = "Competition timeline and phase endpoints"),
        (name = "transitions", description = "Propose, confirm and execute status changes"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting competition lifecycle service");

    let config = Config::from_env().context("Failed to load service configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let store = Arc::new(CompetitionRepository::new(db.pool().clone()));
    let service = LifecycleService::new(store, Arc::new(SystemClock));

    let reconciler = service.reconciler(config.reconciler());
    tokio::spawn(async move { reconciler.run().await });

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);

    let app = Router::new()
        .nest(
            "/api/competitions",
            features::competitions::routes::routes(api_keys),
        )
        .with_state(service)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()));

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
