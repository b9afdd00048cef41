//! Integration test harness for the client registry.
//!
//! Each [`TestServer`] runs the real router on an ephemeral port, backed by a
//! data file in its own temporary directory and a stub postal-code service
//! that answers like ViaCEP.
//!
//! ```rust,ignore
//! let server = TestServer::start().await;
//! let resp = server.client.get(server.url("/users")).send().await?;
//! assert_eq!(resp.status(), 200);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::Path as UrlPath;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use client_registry_api::config::RegistryConfig;
use client_registry_api::state::AppState;
use serde_json::json;
use tempfile::TempDir;

/// CEP the stub resolves to an address.
pub const KNOWN_CEP: &str = "01001000";
/// CEP the stub answers with `{"erro": true}`.
pub const UNKNOWN_CEP: &str = "99999999";
/// CEP the stub answers with HTTP 500.
pub const FAILING_CEP: &str = "50000000";

/// A running registry with its data directory and stub lookup service.
pub struct TestServer {
    pub client: reqwest::Client,
    pub addr: SocketAddr,
    lookup_hits: Arc<AtomicUsize>,
    data_dir: Arc<TempDir>,
    lookup_base: url::Url,
}

impl TestServer {
    /// Start a server on a fresh data directory (seeded on first load).
    pub async fn start() -> Self {
        let data_dir = Arc::new(TempDir::new().expect("Failed to create temp dir"));
        let lookup_hits = Arc::new(AtomicUsize::new(0));
        let lookup_base = spawn_postal_stub(Arc::clone(&lookup_hits)).await;
        Self::boot(data_dir, lookup_base, lookup_hits).await
    }

    /// Start a server whose data file already holds `contents`.
    pub async fn with_data_file(contents: &str) -> Self {
        let data_dir = Arc::new(TempDir::new().expect("Failed to create temp dir"));
        std::fs::write(data_path(data_dir.path()), contents).expect("Failed to write data file");
        let lookup_hits = Arc::new(AtomicUsize::new(0));
        let lookup_base = spawn_postal_stub(Arc::clone(&lookup_hits)).await;
        Self::boot(data_dir, lookup_base, lookup_hits).await
    }

    /// Start a second server over the same data file, as after a restart.
    pub async fn restart(&self) -> Self {
        Self::boot(
            Arc::clone(&self.data_dir),
            self.lookup_base.clone(),
            Arc::clone(&self.lookup_hits),
        )
        .await
    }

    async fn boot(
        data_dir: Arc<TempDir>,
        lookup_base: url::Url,
        lookup_hits: Arc<AtomicUsize>,
    ) -> Self {
        let data_file = data_path(data_dir.path());
        let base = lookup_base.to_string();
        let config = RegistryConfig::from_lookup(|key| match key {
            "REGISTRY_DATA_FILE" => Some(data_file.display().to_string()),
            "POSTAL_LOOKUP_BASE_URL" => Some(base.clone()),
            "POSTAL_LOOKUP_TIMEOUT_SECS" => Some("2".to_string()),
            _ => None,
        })
        .expect("Failed to build config");

        let state = AppState::new(config)
            .await
            .expect("Failed to initialize state");
        let addr = serve(client_registry_api::app(state)).await;

        Self {
            client: reqwest::Client::new(),
            addr,
            lookup_hits,
            data_dir,
            lookup_base,
        }
    }

    /// Absolute URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Location of the backing data file.
    #[must_use]
    pub fn data_file(&self) -> PathBuf {
        data_path(self.data_dir.path())
    }

    /// Number of requests the stub lookup service has answered.
    #[must_use]
    pub fn lookup_hits(&self) -> usize {
        self.lookup_hits.load(Ordering::SeqCst)
    }
}

/// A create payload with a checksum-valid CPF.
#[must_use]
pub fn valid_payload() -> serde_json::Value {
    json!({
        "name": "Ana Silva",
        "email": "ana@example.com",
        "taxId": "52998224725",
        "postalCode": KNOWN_CEP
    })
}

fn data_path(dir: &Path) -> PathBuf {
    dir.join("clients.json")
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server error");
    });
    addr
}

async fn spawn_postal_stub(hits: Arc<AtomicUsize>) -> url::Url {
    let router = Router::new().route(
        "/ws/{cep}/json/",
        get(move |UrlPath(cep): UrlPath<String>| {
            hits.fetch_add(1, Ordering::SeqCst);
            async move { stub_response(&cep) }
        }),
    );
    let addr = serve(router).await;
    url::Url::parse(&format!("http://{addr}/ws")).expect("Failed to parse stub URL")
}

fn stub_response(cep: &str) -> Response {
    match cep {
        KNOWN_CEP => Json(json!({
            "cep": "01001-000",
            "logradouro": "Praça da Sé",
            "bairro": "Sé",
            "localidade": "São Paulo",
            "uf": "SP"
        }))
        .into_response(),
        FAILING_CEP => (StatusCode::INTERNAL_SERVER_ERROR, "upstream down").into_response(),
        _ => Json(json!({ "erro": true })).into_response(),
    }
}
