//! Shared test doubles for connector integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{broadcast, Mutex};

use gamehub_connector::GameServerManager;
use gamehub_core::error::AppError;
use gamehub_core::events::GameEvent;
use gamehub_core::result::AppResult;
use gamehub_core::traits::{
    AdapterFactory, ControlPlaneClient, EventStream, StreamEvent,
};
use gamehub_core::types::domain::{DomainInfo, DomainState};
use gamehub_core::types::game_server::{CreateGameServer, GameServerDetails, GameServerKind};
use gamehub_core::types::id::{DomainId, GameServerId};
use gamehub_queue::InMemoryEventQueue;

/// Control plane serving canned data.
#[derive(Debug, Default)]
pub struct MockControlPlane {
    domains: Mutex<Vec<DomainInfo>>,
    servers: Mutex<Vec<(DomainId, GameServerDetails)>>,
    registration_tokens: Mutex<HashMap<String, DomainInfo>>,
    failing_domains: Mutex<HashSet<DomainId>>,
}

impl MockControlPlane {
    pub async fn add_domain(&self, domain: DomainInfo) {
        self.domains.lock().await.push(domain);
    }

    /// Insert or replace a server record.
    pub async fn put_server(&self, domain_id: DomainId, details: GameServerDetails) {
        let mut servers = self.servers.lock().await;
        servers.retain(|(_, s)| s.id != details.id);
        servers.push((domain_id, details));
    }

    pub async fn clear_servers(&self) {
        self.servers.lock().await.clear();
    }

    pub async fn server_count(&self) -> usize {
        self.servers.lock().await.len()
    }

    /// Make `list_game_servers` fail for one domain.
    pub async fn fail_domain(&self, domain_id: DomainId) {
        self.failing_domains.lock().await.insert(domain_id);
    }

    pub async fn add_registration_token(&self, token: &str, domain: DomainInfo) {
        self.registration_tokens
            .lock()
            .await
            .insert(token.to_string(), domain);
    }
}

#[async_trait]
impl ControlPlaneClient for MockControlPlane {
    async fn get_game_server(
        &self,
        domain_id: DomainId,
        game_server_id: GameServerId,
    ) -> AppResult<GameServerDetails> {
        self.servers
            .lock()
            .await
            .iter()
            .find(|(d, s)| *d == domain_id && s.id == game_server_id)
            .map(|(_, s)| s.clone())
            .ok_or_else(|| AppError::not_found("No such game server"))
    }

    async fn list_game_servers(&self, domain_id: DomainId) -> AppResult<Vec<GameServerDetails>> {
        if self.failing_domains.lock().await.contains(&domain_id) {
            return Err(AppError::control_plane("Simulated domain failure"));
        }

        Ok(self
            .servers
            .lock()
            .await
            .iter()
            .filter(|(d, _)| *d == domain_id)
            .map(|(_, s)| s.clone())
            .collect())
    }

    async fn list_active_domains(&self) -> AppResult<Vec<DomainInfo>> {
        Ok(self
            .domains
            .lock()
            .await
            .iter()
            .filter(|d| d.is_active())
            .cloned()
            .collect())
    }

    async fn resolve_registration_token(&self, token: &str) -> AppResult<Option<DomainInfo>> {
        Ok(self.registration_tokens.lock().await.get(token).cloned())
    }

    async fn find_game_server_by_identity(
        &self,
        domain_id: DomainId,
        identity_token: &str,
    ) -> AppResult<Option<GameServerDetails>> {
        Ok(self
            .servers
            .lock()
            .await
            .iter()
            .find(|(d, s)| *d == domain_id && s.identity_token.as_deref() == Some(identity_token))
            .map(|(_, s)| s.clone()))
    }

    async fn create_game_server(
        &self,
        domain_id: DomainId,
        request: CreateGameServer,
    ) -> AppResult<GameServerDetails> {
        let details = GameServerDetails {
            id: GameServerId::new(),
            name: request.name,
            kind: request.kind,
            connection_info: request.connection_info,
            identity_token: Some(request.identity_token),
            enabled: true,
            // A freshly self-registered server has never been probed.
            reachable: false,
        };
        self.servers
            .lock()
            .await
            .push((domain_id, details.clone()));
        Ok(details)
    }

    async fn wait_until_healthy(&self, _timeout: Duration) -> AppResult<()> {
        Ok(())
    }
}

/// Scriptable event stream that records starts and stops.
#[derive(Debug)]
pub struct MockStream {
    events_tx: broadcast::Sender<StreamEvent>,
    starts: AtomicUsize,
    stops: AtomicUsize,
    fail_start: bool,
}

impl MockStream {
    fn new(fail_start: bool) -> Self {
        let (events_tx, _) = broadcast::channel(32);
        Self {
            events_tx,
            starts: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
            fail_start,
        }
    }

    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    /// Emit a decoded game event to subscribers.
    pub fn emit(&self, event: GameEvent) {
        let _ = self.events_tx.send(StreamEvent::Event(event));
    }

    /// Emit a connection-level error to subscribers.
    pub fn emit_error(&self, message: &str) {
        let _ = self.events_tx.send(StreamEvent::Error {
            message: message.to_string(),
        });
    }
}

#[async_trait]
impl EventStream for MockStream {
    async fn start(&self) -> AppResult<()> {
        if self.fail_start {
            return Err(AppError::adapter("Simulated start failure"));
        }
        self.starts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> AppResult<()> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StreamEvent> {
        self.events_tx.subscribe()
    }
}

/// Adapter factory handing out [`MockStream`]s and recording every call.
#[derive(Debug, Default)]
pub struct RecordingFactory {
    created: Mutex<Vec<(GameServerId, GameServerKind)>>,
    streams: Mutex<HashMap<GameServerId, Vec<Arc<MockStream>>>>,
    fail_create: AtomicBool,
    fail_start: AtomicBool,
}

impl RecordingFactory {
    /// Make every subsequent `create` fail.
    pub fn fail_create(&self) {
        self.fail_create.store(true, Ordering::SeqCst);
    }

    /// Make every subsequently created stream fail its `start`.
    pub fn fail_start(&self) {
        self.fail_start.store(true, Ordering::SeqCst);
    }

    pub async fn create_count(&self) -> usize {
        self.created.lock().await.len()
    }

    pub async fn created_kinds(&self) -> Vec<GameServerKind> {
        self.created.lock().await.iter().map(|(_, k)| *k).collect()
    }

    /// All streams created for an id, in creation order.
    pub async fn streams_for(&self, game_server_id: GameServerId) -> Vec<Arc<MockStream>> {
        self.streams
            .lock()
            .await
            .get(&game_server_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl AdapterFactory for RecordingFactory {
    async fn create(
        &self,
        kind: GameServerKind,
        _connection_info: &serde_json::Value,
        game_server_id: GameServerId,
    ) -> AppResult<Arc<dyn EventStream>> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(AppError::adapter("Simulated connect failure"));
        }

        self.created.lock().await.push((game_server_id, kind));

        let stream = Arc::new(MockStream::new(self.fail_start.load(Ordering::SeqCst)));
        self.streams
            .lock()
            .await
            .entry(game_server_id)
            .or_default()
            .push(stream.clone());

        Ok(stream)
    }
}

/// Fully wired manager over mock collaborators.
pub struct Harness {
    pub control_plane: Arc<MockControlPlane>,
    pub factory: Arc<RecordingFactory>,
    pub queue: Arc<InMemoryEventQueue>,
    pub manager: Arc<GameServerManager>,
}

pub fn harness() -> Harness {
    let control_plane = Arc::new(MockControlPlane::default());
    let factory = Arc::new(RecordingFactory::default());
    let queue = Arc::new(InMemoryEventQueue::new());
    let manager = Arc::new(GameServerManager::new(
        control_plane.clone(),
        factory.clone(),
        queue.clone(),
    ));

    Harness {
        control_plane,
        factory,
        queue,
        manager,
    }
}

/// Give spawned forwarder tasks a chance to drain their channels.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

pub fn active_domain() -> DomainInfo {
    DomainInfo {
        id: DomainId::new(),
        name: "test-domain".to_string(),
        state: DomainState::Active,
    }
}

pub fn dialed_server(id: GameServerId, enabled: bool, reachable: bool) -> GameServerDetails {
    GameServerDetails {
        id,
        name: "test-server".to_string(),
        kind: GameServerKind::Rust,
        connection_info: serde_json::json!({ "host": "localhost", "port": 28015 }),
        identity_token: None,
        enabled,
        reachable,
    }
}

pub fn generic_server(id: GameServerId, reachable: bool) -> GameServerDetails {
    GameServerDetails {
        id,
        name: "generic-server".to_string(),
        kind: GameServerKind::Generic,
        connection_info: serde_json::json!({ "identity_token": "identity-1" }),
        identity_token: Some("identity-1".to_string()),
        enabled: true,
        reachable,
    }
}
