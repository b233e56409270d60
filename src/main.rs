//! Community Hub Backend
//!
//! A REST backend serving an in-memory query layer over communities, quizzes
//! and session requests.

mod api;
mod config;
mod errors;
mod models;
mod query;
mod store;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use store::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Community Hub Backend");
    tracing::info!("Seed path: {:?}", config.seed_path);
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!(
        "Page size: default {}, max {}",
        config.default_page_size,
        config.max_page_size
    );

    // Load the entity store
    let datastore = store::load_datastore(config.seed_path.as_deref()).await?;
    let repo = Arc::new(Repository::new(datastore));
    tracing::info!(
        "Store ready with {} communities",
        repo.list_communities().await.len()
    );

    // Create application state
    let state = AppState {
        repo,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Datastore
        .route("/datastore", get(api::get_datastore))
        .route("/datastore/revision", get(api::get_revision))
        // Communities
        .route(
            "/communities",
            get(api::list_communities).post(api::create_community),
        )
        .route("/communities/stats", get(api::community_stats))
        .route(
            "/communities/{id}",
            get(api::get_community)
                .put(api::update_community)
                .delete(api::delete_community),
        )
        .route("/communities/{id}/reviews", post(api::add_review))
        .route("/communities/{id}/members", post(api::join_community))
        // Quizzes
        .route("/quizzes", get(api::list_quizzes))
        .route("/quizzes/stats", get(api::quiz_stats))
        .route("/quizzes/{id}", get(api::get_quiz))
        // Scheduling
        .route("/team-members", get(api::list_team_members))
        .route(
            "/sessions",
            get(api::list_sessions).post(api::create_session),
        )
        .route("/sessions/stats", get(api::session_stats))
        .route("/sessions/conflicts", post(api::check_conflict))
        .route("/sessions/{id}", get(api::get_session))
        .route("/sessions/{id}/assign", put(api::assign_session))
        .route("/sessions/{id}/reschedule", put(api::reschedule_session))
        .route("/sessions/{id}/status", put(api::update_session_status));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
