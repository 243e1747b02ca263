//! # gamehub-connector
//!
//! The game-server connection manager. Maintains a live pool of
//! connections to customer game servers, multiplexes their events into
//! the outbound queue, and keeps the pool aligned with the control
//! plane's desired state:
//!
//! - [`ConnectionRegistry`] — the single source of truth for live
//!   connections
//! - [`GameServerManager`] — add/remove/update lifecycle and the
//!   identify handshake
//! - [`Reconciler`] — periodic desired-vs-actual diff per active domain
//! - [`Watchdog`] — staleness detection and forced reconnects
//! - [`ingress`] — websocket endpoint for self-registering servers

mod forwarder;

pub mod ingress;
pub mod manager;
pub mod reconciler;
pub mod registry;
pub mod watchdog;

pub use manager::GameServerManager;
pub use reconciler::Reconciler;
pub use registry::{ConnectionRecord, ConnectionRegistry, RegistryEntry};
pub use watchdog::Watchdog;
