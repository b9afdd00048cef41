//! CPF and CEP checks on stored clients.

use axum::{
    Json,
    extract::State,
};
use client_registry_core::{Address, TaxId};
use serde::Serialize;

use super::{IdSegment, client_id};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Outcome of a CPF check.
#[derive(Debug, Serialize)]
pub struct TaxIdCheck {
    /// `"valid"` or `"invalid"`.
    pub message: &'static str,
}

/// Outcome of a successful CEP lookup.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalCodeCheck {
    pub message: &'static str,
    pub postal_code: String,
    pub address: Address,
}

/// Check the stored CPF of a client.
///
/// GET /users/isCPF/{id}
///
/// # Errors
///
/// Returns `AppError::NotFound` if no client has the id.
pub async fn tax_id(
    State(state): State<AppState>,
    IdSegment(id): IdSegment,
) -> Result<Json<TaxIdCheck>> {
    let id = client_id(&id)?;
    let clients = state.clients().read().await;
    let client = clients
        .get_by_id(id)
        .ok_or_else(|| AppError::NotFound(id.to_string()))?;

    let message = if TaxId::is_valid(client.tax_id.as_str()) {
        "valid"
    } else {
        "invalid"
    };

    Ok(Json(TaxIdCheck { message }))
}

/// Resolve the stored postal code of a client.
///
/// GET /users/isCEP/{id}
///
/// # Errors
///
/// Returns `AppError::NotFound` if no client has the id and
/// `AppError::PostalLookup` if the lookup service rejects the code or fails.
pub async fn postal_code(
    State(state): State<AppState>,
    IdSegment(id): IdSegment,
) -> Result<Json<PostalCodeCheck>> {
    let id = client_id(&id)?;

    // Release the repository before going to the network
    let postal_code = {
        let clients = state.clients().read().await;
        clients
            .get_by_id(id)
            .map(|c| c.postal_code.as_str().to_owned())
            .ok_or_else(|| AppError::NotFound(id.to_string()))?
    };

    match state.postal_codes().lookup(&postal_code).await {
        Ok(address) => Ok(Json(PostalCodeCheck {
            message: "valid",
            postal_code,
            address,
        })),
        Err(source) => Err(AppError::PostalLookup {
            postal_code,
            source,
        }),
    }
}
