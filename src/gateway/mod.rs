//! HTTP gateway: router assembly and server startup.

pub mod error;
pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{delete, get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::handlers as users;
use crate::config::AppConfig;
use state::AppState;

fn parse_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring malformed CORS origin in config");
                None
            }
        })
        .collect()
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parse_origins(origins)))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Assembles the full route table. Split out of `run_server` so the test
/// suite can drive the router without binding a socket.
///
/// Routes whose shape is shared by differently-gated methods (e.g. public
/// GET /tests/{id} vs admin PUT/DELETE) are registered once; gating lives in
/// each handler's extractor signature.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::health::root))
        // Identity
        .route("/jwt", post(users::issue_token))
        .route(
            "/users/admin/{email}",
            get(users::admin_status).patch(users::promote_user),
        )
        .route("/loggedUser/{email}", get(users::logged_user))
        .route("/users", get(users::list_users).post(users::create_user))
        // Test catalog
        .route(
            "/tests",
            get(handlers::tests::list_tests).post(handlers::tests::create_test),
        )
        .route(
            "/tests/{id}",
            get(handlers::tests::get_test)
                .put(handlers::tests::update_test)
                .delete(handlers::tests::delete_test),
        )
        // Results
        .route("/testResults/{email}", get(handlers::results::my_results))
        .route(
            "/submit-result/{id}",
            post(handlers::results::submit_result),
        )
        // Bookings
        .route(
            "/bookedTests/{key}",
            get(handlers::bookings::my_bookings).delete(handlers::bookings::cancel_booking),
        )
        .route(
            "/reservations",
            get(handlers::bookings::list_reservations),
        )
        .route("/booked-tests", post(handlers::bookings::submit_booking))
        // Banners
        .route(
            "/banners",
            get(handlers::banners::list_banners).post(handlers::banners::create_banner),
        )
        .route("/banners/{id}", delete(handlers::banners::delete_banner))
        // Payments
        .route(
            "/create-payment-intent",
            post(handlers::payment::create_payment_intent),
        )
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        )
        .with_state(state)
}


/// Binds the configured address and serves the gateway until shutdown.
pub async fn run_server(config: &AppConfig, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = build_router(state).layer(cors_layer(&config.cors_origins));

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("gateway listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
