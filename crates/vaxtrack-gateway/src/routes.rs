//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use axum::http::HeaderValue;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use vaxtrack_auth::{IdentityGateway, ProfileRegistry};
use vaxtrack_records::Records;

use crate::handlers::{account, health, history, schedules, vaccinations};
use crate::state::GatewayState;

/// Create the gateway router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
/// - `POST /v1/account/register` - Register a new account
/// - `POST /v1/account/sign-in` - Sign in
///
/// ## Authenticated
/// - `PUT /v1/account` - Update the signed-in user
/// - `DELETE /v1/account` - Delete the signed-in user
/// - `PUT /v1/vaccinations` - Create or update a vaccination record
/// - `DELETE /v1/vaccinations/:id` - Delete a vaccination record
/// - `PUT /v1/history` - Create or update a history entry
/// - `DELETE /v1/history/:id` - Delete a history entry
/// - `GET /v1/history` - List the signed-in user's history
/// - `POST /v1/schedules` - Create an appointment
/// - `PUT /v1/schedules/:id` - Move an appointment
/// - `DELETE /v1/schedules/:id` - Delete an appointment
/// - `GET /v1/schedules` - List the signed-in user's appointments
pub fn create_router<R, I, P>(state: GatewayState<R, I, P>) -> Router
where
    R: Records + 'static,
    I: IdentityGateway + 'static,
    P: ProfileRegistry + 'static,
{
    let cors = build_cors_layer(&state.config.cors_origins);
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout = state.config.request_timeout();

    Router::new()
        .route("/health", get(health::health))
        .route("/v1/account/register", post(account::register::<R, I, P>))
        .route("/v1/account/sign-in", post(account::sign_in::<R, I, P>))
        .route(
            "/v1/account",
            put(account::update::<R, I, P>).delete(account::remove::<R, I, P>),
        )
        .route("/v1/vaccinations", put(vaccinations::save::<R, I, P>))
        .route(
            "/v1/vaccinations/:id",
            delete(vaccinations::remove::<R, I, P>),
        )
        .route(
            "/v1/history",
            put(history::save::<R, I, P>).get(history::list::<R, I, P>),
        )
        .route("/v1/history/:id", delete(history::remove::<R, I, P>))
        .route(
            "/v1/schedules",
            post(schedules::create::<R, I, P>).get(schedules::list::<R, I, P>),
        )
        .route(
            "/v1/schedules/:id",
            put(schedules::update::<R, I, P>).delete(schedules::remove::<R, I, P>),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}

/// Build the CORS layer from the configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(parsed)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
