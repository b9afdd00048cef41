//! HTTP route handlers for the registry API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health              - Liveness check
//!
//! # Clients
//! GET    /users               - All clients, insertion order
//! POST   /users               - Create a client (201)
//! GET    /users/{id}          - One client
//! PUT    /users/{id}          - Partially update a client
//! DELETE /users/{id}          - Delete a client, returning it
//!
//! # Checks
//! GET    /users/isCPF/{id}    - CPF checksum of the stored tax id
//! GET    /users/isCEP/{id}    - Resolve the stored postal code
//! ```
//!
//! Path ids that are not positive integers never match a client, so they
//! answer 404 like any unknown id.

pub mod checks;
pub mod users;

use std::any::Any;
use std::convert::Infallible;
use std::time::Duration;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum::{Router, routing::get};
use client_registry_core::ClientId;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::error::AppError;
use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the client routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/{id}",
            get(users::show).put(users::update).delete(users::delete),
        )
        .route("/users/isCPF/{id}", get(checks::tax_id))
        .route("/users/isCEP/{id}", get(checks::postal_code))
}

/// Build the full application: routes, panic recovery, request id and
/// request tracing.
///
/// Sentry layers are added by the binary on top of this.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_request(|request: &axum::http::Request<_>, _span: &Span| {
                    tracing::info!(
                        method = %request.method(),
                        path = %request.uri().path(),
                        "request received"
                    );
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}

/// Answer a panicking handler as an internal error.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "handler panicked".to_string());

    AppError::Internal(detail).into_response()
}

/// The raw `{id}` path segment.
///
/// Never rejects. A segment `Path` cannot decode (invalid UTF-8 after
/// percent-decoding) is kept in its encoded form, so it still reaches
/// [`client_id`] and answers 404 as JSON.
pub struct IdSegment(pub String);

impl<S: Send + Sync> FromRequestParts<S> for IdSegment {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(raw)) => Ok(Self(raw)),
            Err(rejection) => {
                tracing::debug!(%rejection, "Undecodable id segment");
                let raw = parts.uri.path().rsplit('/').next().unwrap_or_default();
                Ok(Self(raw.to_string()))
            }
        }
    }
}

/// Parse a path id; anything that is not a positive integer is not found.
fn client_id(raw: &str) -> Result<ClientId, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(raw.to_string()))
}
