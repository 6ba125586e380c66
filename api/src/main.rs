//! Recycle API Server
//!
//! Backend for a used-electronics recycling platform: a device catalog,
//! recycle orders with an automatic estimate, and evaluator scoring that
//! sets the final price.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use sea_orm::{Database, DatabaseConnection};
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{
    PostgresDeviceRepository, PostgresEvaluationRepository, PostgresRecycleOrderRepository,
    PostgresUserRepository, SystemClock,
};
use app::{DeviceService, EvaluationService, OrderService, UserService};
use config::Config;

pub type AppUserService = UserService<PostgresUserRepository>;
pub type AppDeviceService = DeviceService<PostgresDeviceRepository, SystemClock>;
pub type AppOrderService = OrderService<
    PostgresRecycleOrderRepository,
    PostgresDeviceRepository,
    PostgresEvaluationRepository,
    SystemClock,
>;
pub type AppEvaluationService =
    EvaluationService<PostgresEvaluationRepository, PostgresRecycleOrderRepository>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<AppUserService>,
    pub device_service: Arc<AppDeviceService>,
    pub order_service: Arc<AppOrderService>,
    pub evaluation_service: Arc<AppEvaluationService>,
    pub max_page_size: u64,
}

impl AppState {
    /// Wire adapters and services on top of one connection pool
    pub fn new(db: DatabaseConnection, config: &Config) -> Self {
        let user_repo = Arc::new(PostgresUserRepository::new(db.clone()));
        let device_repo = Arc::new(PostgresDeviceRepository::new(db.clone()));
        let order_repo = Arc::new(PostgresRecycleOrderRepository::new(db.clone()));
        let evaluation_repo = Arc::new(PostgresEvaluationRepository::new(db));
        let clock = Arc::new(SystemClock);

        Self {
            user_service: Arc::new(UserService::new(
                user_repo,
                config.password_pepper.clone(),
            )),
            device_service: Arc::new(DeviceService::new(device_repo.clone(), clock.clone())),
            order_service: Arc::new(OrderService::new(
                order_repo.clone(),
                device_repo,
                evaluation_repo.clone(),
                clock,
            )),
            evaluation_service: Arc::new(EvaluationService::new(evaluation_repo, order_repo)),
            max_page_size: config.max_page_size,
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the full router: `/health` plus the `/api/v1` tree
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    // Rate limiting config: 2 req/sec sustained, burst of 5
    // Uses PeerIpKeyExtractor to get client IP from socket connection
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(2)
            .burst_size(5)
            .finish()
            .context("Failed to build governor config")?,
    );

    // Rate-limited routes (credential endpoints)
    let rate_limited_routes = Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .layer(GovernorLayer {
            config: governor_config,
        });

    let public_routes = Router::new()
        .route("/devices", get(handlers::list_devices))
        .route("/devices/:id", get(handlers::get_device));

    let admin_routes = Router::new()
        .route("/admin/devices", post(handlers::create_device))
        .route(
            "/admin/devices/:id",
            put(handlers::update_device).delete(handlers::delete_device),
        )
        .route("/admin/orders", get(handlers::list_all_orders))
        .route("/admin/orders/:id", put(handlers::update_order))
        .route(
            "/admin/evaluations",
            post(handlers::create_evaluation).get(handlers::list_evaluations),
        )
        .route(
            "/admin/evaluations/:id",
            get(handlers::get_evaluation).put(handlers::update_evaluation),
        )
        .route_layer(middleware::from_fn(auth::require_admin));

    // Protected routes; admin routes sit behind both layers
    let protected_routes = Router::new()
        .route(
            "/user/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route(
            "/orders",
            post(handlers::create_order).get(handlers::list_my_orders),
        )
        .route("/orders/:id", get(handlers::get_order))
        .route("/orders/:id/cancel", put(handlers::cancel_order))
        .route(
            "/evaluations/order/:order_id",
            get(handlers::get_order_evaluation),
        )
        .merge(admin_routes)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    let api = Router::new()
        .merge(rate_limited_routes)
        .merge(public_routes)
        .merge(protected_routes);

    Ok(Router::new()
        // Health check (no auth)
        .route("/health", get(health))
        .nest("/api/v1", api)
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,recycle_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Recycle API...");

    // Load configuration
    let config = Config::from_env()?;

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    let state = AppState::new(db, &config);

    if let Some(admin) = &config.admin {
        state
            .user_service
            .ensure_admin(&admin.username, &admin.password, &admin.phone)
            .await
            .context("Failed to bootstrap admin account")?;
    }

    let app = build_router(state)?;

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
