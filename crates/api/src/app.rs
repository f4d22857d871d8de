use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{content_items, device, health, pairing, schedules, screens};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        // Config::validate already rejected malformed origins at startup;
        // anything unparsable here is logged rather than dropped silently.
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %o, "Skipping malformed CORS origin");
                    None
                }
            })
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Pairing flow. The codes themselves are the credential: issuing and
    // polling are unauthenticated, the admin claim requires a session (the
    // AdminSession extractor on the handler), and the deprecated device-side
    // completion consumes the claimed code.
    let pairing_routes = Router::new()
        .route(
            "/api/v1/screens/unpaired",
            post(pairing::request_pairing_code),
        )
        .route(
            "/api/v1/screens/unpaired/check",
            post(pairing::check_pairing_status),
        )
        .route(
            "/api/v1/screens/pair",
            put(pairing::complete_pairing).post(pairing::claim_screen),
        );

    // Device routes, authenticated by the DeviceAuth extractor
    let device_routes = Router::new()
        .route("/api/v1/screen/content", get(device::get_content))
        .route("/api/v1/screen/heartbeat", post(device::heartbeat));

    // Admin routes, authenticated by the AdminSession extractor and scoped
    // to the session's masjid
    let admin_routes = Router::new()
        .route("/api/v1/admin/screens", get(screens::list_screens))
        .route(
            "/api/v1/admin/screens/:screen_id",
            get(screens::get_screen)
                .patch(screens::update_screen)
                .delete(screens::delete_screen),
        )
        .route(
            "/api/v1/admin/schedules",
            get(schedules::list_schedules).post(schedules::create_schedule),
        )
        .route(
            "/api/v1/admin/schedules/:schedule_id",
            get(schedules::get_schedule)
                .patch(schedules::update_schedule)
                .delete(schedules::delete_schedule),
        )
        .route(
            "/api/v1/admin/schedules/:schedule_id/default",
            post(schedules::set_default_schedule),
        )
        .route(
            "/api/v1/admin/schedules/:schedule_id/duplicate",
            post(schedules::duplicate_schedule),
        )
        .route(
            "/api/v1/admin/content",
            get(content_items::list_content_items).post(content_items::create_content_item),
        )
        .route(
            "/api/v1/admin/content/:item_id",
            get(content_items::get_content_item)
                .patch(content_items::update_content_item)
                .delete(content_items::delete_content_item),
        );

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(pairing_routes)
        .merge(device_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state)
}
