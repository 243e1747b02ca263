//! Reqwest-based control-plane client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use gamehub_core::config::control_plane::ControlPlaneConfig;
use gamehub_core::error::{AppError, ErrorKind};
use gamehub_core::result::AppResult;
use gamehub_core::traits::ControlPlaneClient;
use gamehub_core::types::domain::DomainInfo;
use gamehub_core::types::game_server::{CreateGameServer, GameServerDetails};
use gamehub_core::types::id::{DomainId, GameServerId};

/// HTTP client for the control-plane API.
///
/// Authenticates every request with the connector's service token.
#[derive(Debug, Clone)]
pub struct HttpControlPlaneClient {
    /// Shared reqwest client (connection pooling).
    http: reqwest::Client,
    /// API base URL without trailing slash.
    base_url: String,
    /// Bearer token for service authentication.
    api_token: String,
}

impl HttpControlPlaneClient {
    /// Create a client from configuration.
    pub fn new(config: &ControlPlaneConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Execute a GET and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        Self::decode(path, response).await
    }

    /// Execute a POST with a JSON body and decode the JSON response.
    async fn post_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.api_token)
            .json(body)
            .send()
            .await?;

        Self::decode(path, response).await
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> AppResult<T> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::not_found(format!(
                "Control plane returned 404 for {path}"
            )));
        }
        if !status.is_success() {
            return Err(AppError::control_plane(format!(
                "Control plane returned {status} for {path}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::control_plane(format!("Invalid response body for {path}: {e}")))
    }

    async fn health_probe(&self) -> bool {
        match self.http.get(self.url("/healthz")).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl ControlPlaneClient for HttpControlPlaneClient {
    async fn get_game_server(
        &self,
        domain_id: DomainId,
        game_server_id: GameServerId,
    ) -> AppResult<GameServerDetails> {
        self.get_json(&format!(
            "/domains/{domain_id}/gameservers/{game_server_id}"
        ))
        .await
    }

    async fn list_game_servers(&self, domain_id: DomainId) -> AppResult<Vec<GameServerDetails>> {
        self.get_json(&format!("/domains/{domain_id}/gameservers"))
            .await
    }

    async fn list_active_domains(&self) -> AppResult<Vec<DomainInfo>> {
        self.get_json("/domains?state=ACTIVE").await
    }

    async fn resolve_registration_token(&self, token: &str) -> AppResult<Option<DomainInfo>> {
        let result: AppResult<DomainInfo> = self
            .post_json(
                "/registration-tokens/resolve",
                &serde_json::json!({ "token": token }),
            )
            .await;

        match result {
            Ok(domain) => Ok(Some(domain)),
            // Unknown token is absence, not failure.
            Err(e) if e.kind == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn find_game_server_by_identity(
        &self,
        domain_id: DomainId,
        identity_token: &str,
    ) -> AppResult<Option<GameServerDetails>> {
        let servers: Vec<GameServerDetails> = self
            .get_json(&format!(
                "/domains/{domain_id}/gameservers?identity_token={identity_token}"
            ))
            .await?;

        if servers.len() > 1 {
            warn!(
                domain_id = %domain_id,
                count = servers.len(),
                "Multiple servers share an identity token, using the first"
            );
        }

        Ok(servers.into_iter().next())
    }

    async fn create_game_server(
        &self,
        domain_id: DomainId,
        request: CreateGameServer,
    ) -> AppResult<GameServerDetails> {
        debug!(domain_id = %domain_id, name = %request.name, "Registering game server");
        self.post_json(&format!("/domains/{domain_id}/gameservers"), &request)
            .await
    }

    async fn wait_until_healthy(&self, timeout: Duration) -> AppResult<()> {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            if self.health_probe().await {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(AppError::service_unavailable(format!(
                    "Control plane not healthy after {}s",
                    timeout.as_secs()
                )));
            }
            debug!("Control plane not healthy yet, retrying");
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    }
}
