//! Connection registry — the single source of truth for live game-server
//! connections.
//!
//! One composite record per connection, in one map. Insert and remove are
//! single map operations, so the registry can never hold partial state
//! for an id (an emitter without a liveness timestamp, a timestamp
//! without a domain owner).

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::task::JoinHandle;

use gamehub_core::traits::EventStream;
use gamehub_core::types::id::{DomainId, GameServerId};

/// One live game-server connection.
#[derive(Debug)]
pub struct ConnectionRecord {
    /// The domain that owns the server.
    pub domain_id: DomainId,
    /// Whether the server registers itself via the identify handshake.
    /// Self-registering servers are exempt from reconciliation.
    pub self_registering: bool,
    /// The live event source. The record holds a reference; teardown is
    /// the manager's job.
    stream: Arc<dyn EventStream>,
    /// Epoch milliseconds of the most recent event (or connection start).
    /// Shared with the forwarder task, which updates it on every event.
    last_event_at: Arc<AtomicI64>,
    /// The forwarder task draining the stream into the queue.
    forwarder: JoinHandle<()>,
}

impl ConnectionRecord {
    /// Assemble a record for a freshly started connection.
    pub fn new(
        domain_id: DomainId,
        self_registering: bool,
        stream: Arc<dyn EventStream>,
        last_event_at: Arc<AtomicI64>,
        forwarder: JoinHandle<()>,
    ) -> Self {
        Self {
            domain_id,
            self_registering,
            stream,
            last_event_at,
            forwarder,
        }
    }

    /// The live event source.
    pub fn stream(&self) -> Arc<dyn EventStream> {
        self.stream.clone()
    }

    /// When the most recent event was observed.
    pub fn last_event_at(&self) -> DateTime<Utc> {
        let millis = self.last_event_at.load(Ordering::SeqCst);
        DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_else(Utc::now)
    }

    /// Overwrite the liveness timestamp.
    pub fn record_event_at(&self, at: DateTime<Utc>) {
        self.last_event_at
            .store(at.timestamp_millis(), Ordering::SeqCst);
    }

    /// Stop the forwarder task.
    pub(crate) fn abort_forwarder(&self) {
        self.forwarder.abort();
    }
}

/// Read-only snapshot of one registry entry.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    /// The connected server.
    pub game_server_id: GameServerId,
    /// The domain that owns it.
    pub domain_id: DomainId,
    /// Whether it is exempt from reconciliation.
    pub self_registering: bool,
    /// When its most recent event was observed.
    pub last_event_at: DateTime<Utc>,
}

/// Registry of all live connections, keyed by game server id.
///
/// All mutation goes through the manager's add/remove paths; other
/// components only read.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: DashMap<GameServerId, ConnectionRecord>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the displaced record if the id was
    /// already connected. The caller must tear the displaced record down.
    pub fn insert(
        &self,
        game_server_id: GameServerId,
        record: ConnectionRecord,
    ) -> Option<ConnectionRecord> {
        self.connections.insert(game_server_id, record)
    }

    /// Remove and return the record for an id, if present.
    pub fn remove(&self, game_server_id: &GameServerId) -> Option<ConnectionRecord> {
        self.connections
            .remove(game_server_id)
            .map(|(_, record)| record)
    }

    /// Whether an id is currently connected.
    pub fn contains(&self, game_server_id: &GameServerId) -> bool {
        self.connections.contains_key(game_server_id)
    }

    /// The domain owning a connected id.
    pub fn domain_of(&self, game_server_id: &GameServerId) -> Option<DomainId> {
        self.connections
            .get(game_server_id)
            .map(|record| record.domain_id)
    }

    /// When a connected id's most recent event was observed.
    pub fn last_event_at(&self, game_server_id: &GameServerId) -> Option<DateTime<Utc>> {
        self.connections
            .get(game_server_id)
            .map(|record| record.last_event_at())
    }

    /// Overwrite the liveness timestamp for an id.
    ///
    /// Returns `false` when the id is not connected.
    pub fn record_event_at(&self, game_server_id: &GameServerId, at: DateTime<Utc>) -> bool {
        match self.connections.get(game_server_id) {
            Some(record) => {
                record.record_event_at(at);
                true
            }
            None => false,
        }
    }

    /// Number of live connections.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Snapshot of all entries, for reconciliation and watchdog scans.
    pub fn snapshot(&self) -> Vec<RegistryEntry> {
        self.connections
            .iter()
            .map(|entry| RegistryEntry {
                game_server_id: *entry.key(),
                domain_id: entry.value().domain_id,
                self_registering: entry.value().self_registering,
                last_event_at: entry.value().last_event_at(),
            })
            .collect()
    }
}
