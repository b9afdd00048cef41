//! Postal code (CEP) lookup client.
//!
//! Talks to a ViaCEP-compatible service: `GET {base_url}/{cep}/json/`
//! answers with the street-level address, or with `{"erro": true}` when the
//! code does not exist.

use client_registry_core::{Address, PostalCode, PostalCodeError};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::config::PostalLookupConfig;

/// User agent sent to the lookup service.
const USER_AGENT: &str = concat!("client-registry/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur when looking up a postal code.
#[derive(Debug, Error)]
pub enum PostalLookupError {
    /// The stored value is not a well-formed CEP; no request was made.
    #[error("{0}")]
    InvalidPostalCode(#[from] PostalCodeError),

    /// The service does not know the postal code.
    #[error("postal code {0} not found")]
    NotFound(String),

    /// HTTP request failed (connection, timeout, body read).
    #[error("lookup request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an unexpected status.
    #[error("lookup service returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The service answered with a body we could not decode.
    #[error("unexpected lookup response: {0}")]
    Parse(String),
}

/// Client for the postal code lookup service.
#[derive(Debug, Clone)]
pub struct PostalCodeClient {
    client: reqwest::Client,
    base_url: Url,
}

impl PostalCodeClient {
    /// Create a new lookup client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build or the base URL cannot
    /// carry path segments.
    pub fn new(config: &PostalLookupConfig) -> Result<Self, PostalLookupError> {
        if config.base_url.cannot_be_a_base() {
            return Err(PostalLookupError::Parse(format!(
                "lookup base URL {} cannot carry a path",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// The URL queried for `cep`.
    #[must_use]
    pub fn lookup_url(&self, cep: &PostalCode) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(cep.as_str()).push("json").push("");
        }
        url
    }

    /// Resolve a postal code to its address.
    ///
    /// The value is checked locally first, so malformed codes never reach the
    /// network.
    ///
    /// # Errors
    ///
    /// Returns `PostalLookupError` if the code is malformed or unknown, the
    /// request fails or times out, or the response cannot be decoded.
    pub async fn lookup(&self, postal_code: &str) -> Result<Address, PostalLookupError> {
        let cep = PostalCode::parse(postal_code)?;
        let url = self.lookup_url(&cep);

        tracing::debug!(%url, "Looking up postal code");
        let response = self.client.get(url).send().await?;
        let status = response.status();

        // ViaCEP answers 400 for codes it considers malformed
        if status.as_u16() == 400 || status.as_u16() == 404 {
            return Err(PostalLookupError::NotFound(cep.into_inner()));
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PostalLookupError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ViaCepResponse = response
            .json()
            .await
            .map_err(|e| PostalLookupError::Parse(e.to_string()))?;

        if body.is_error() {
            return Err(PostalLookupError::NotFound(cep.into_inner()));
        }

        Ok(body.into_address(&cep))
    }
}

/// Raw ViaCEP payload.
#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    erro: Option<serde_json::Value>,
    #[serde(default)]
    cep: Option<String>,
    #[serde(default)]
    logradouro: Option<String>,
    #[serde(default)]
    bairro: Option<String>,
    #[serde(default)]
    localidade: Option<String>,
    #[serde(default)]
    uf: Option<String>,
}

impl ViaCepResponse {
    /// The service flags unknown codes with `"erro": true` (or `"true"`).
    fn is_error(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    fn into_address(self, cep: &PostalCode) -> Address {
        Address {
            postal_code: self.cep.unwrap_or_else(|| cep.formatted()),
            state: self.uf.unwrap_or_default(),
            city: self.localidade.unwrap_or_default(),
            neighborhood: self.bairro.unwrap_or_default(),
            street: self.logradouro.unwrap_or_default(),
        }
    }
}
