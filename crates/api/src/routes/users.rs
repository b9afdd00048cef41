//! Client CRUD handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use client_registry_core::schema::{self, BODY_KEY};
use client_registry_core::{ClientRecord, FieldErrors};
use serde_json::Value;

use super::{IdSegment, client_id};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// List all clients.
///
/// GET /users
pub async fn list(State(state): State<AppState>) -> Json<Vec<ClientRecord>> {
    let clients = state.clients().read().await;
    Json(clients.all().to_vec())
}

/// Get one client.
///
/// GET /users/{id}
///
/// # Errors
///
/// Returns `AppError::NotFound` if no client has the id.
pub async fn show(
    State(state): State<AppState>,
    IdSegment(id): IdSegment,
) -> Result<Json<ClientRecord>> {
    let id = client_id(&id)?;
    let client = state.clients().read().await.get_by_id(id).cloned();

    client
        .map(Json)
        .ok_or_else(|| AppError::NotFound(id.to_string()))
}

/// Create a client.
///
/// POST /users
///
/// # Errors
///
/// Returns `AppError::Validation` if the payload fails the create contract.
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<ClientRecord>)> {
    let payload = json_body(payload)?;
    let new = schema::validate_create(&payload)?;

    let created = state.clients().write().await.create(new).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Partially update a client.
///
/// PUT /users/{id}
///
/// The payload is validated before the id is looked up.
///
/// # Errors
///
/// Returns `AppError::Validation` if the payload fails the update contract
/// and `AppError::NotFound` if no client has the id.
pub async fn update(
    State(state): State<AppState>,
    IdSegment(id): IdSegment,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<ClientRecord>> {
    let payload = json_body(payload)?;
    let patch = schema::validate_update(&payload)?;
    let id = client_id(&id)?;

    let updated = state.clients().write().await.update(id, patch).await?;

    updated
        .map(Json)
        .ok_or_else(|| AppError::NotFound(id.to_string()))
}

/// Delete a client and return it.
///
/// DELETE /users/{id}
///
/// # Errors
///
/// Returns `AppError::NotFound` if no client has the id.
pub async fn delete(
    State(state): State<AppState>,
    IdSegment(id): IdSegment,
) -> Result<Json<ClientRecord>> {
    let id = client_id(&id)?;

    let removed = state.clients().write().await.delete(id).await?;

    removed
        .map(Json)
        .ok_or_else(|| AppError::NotFound(id.to_string()))
}

/// Unwrap a JSON body, turning extractor rejections into field errors.
fn json_body(payload: std::result::Result<Json<Value>, JsonRejection>) -> Result<Value> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            let mut errors = FieldErrors::new();
            errors.push(BODY_KEY, rejection.body_text());
            Err(AppError::Validation(errors))
        }
    }
}
