use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::Request;
use axum::http::Response;
use axum::middleware;
use axum::middleware::Next;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::cookies::SessionTransport;
use super::handlers::admin::admin_ping;
use super::handlers::get_profile::get_profile;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::refresh_token::refresh_token;
use super::handlers::register::register;
use super::handlers::update_profile::update_profile;
use super::handlers::ApiError;
use super::middleware::authorize;
use super::middleware::mask_internal_errors;
use super::middleware::require_auth;
use crate::domain::identity::models::Role;
use crate::domain::identity::ports::AuthServicePort;

const ADMIN_ONLY: &[Role] = &[Role::Admin];

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub transport: SessionTransport,
    pub production: bool,
}

pub fn create_router(
    auth_service: Arc<dyn AuthServicePort>,
    transport: SessionTransport,
    production: bool,
) -> Router {
    let state = AppState {
        auth_service,
        transport,
        production,
    };

    // Refresh and logout stay outside the gate: an expired access token must not block them
    let public_routes = Router::new()
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/logout", post(logout))
        .route("/api/v1/auth/refresh-token", post(refresh_token));

    let protected_routes = Router::new()
        .route(
            "/api/v1/auth/profile",
            get(get_profile).put(update_profile),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Layers run bottom-up: the gate attaches the principal before the role check
    let admin_routes = Router::new()
        .route("/api/v1/admin/ping", get(admin_ping))
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            authorize(ADMIN_ONLY, req, next)
        }))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .fallback(not_found)
        .layer(middleware::map_response_with_state(
            state.clone(),
            mask_internal_errors,
        ))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
