//! # gamehub-adapters
//!
//! Protocol adapters implementing the [`EventStream`] and
//! [`AdapterFactory`] contracts:
//!
//! - [`WsAdapter`] dials out to game servers that expose a websocket
//!   event feed (Rust, 7 Days to Die)
//! - [`GenericAdapter`] serves self-registering servers, fed by the
//!   websocket ingress through the [`GenericEventHub`]
//!
//! [`EventStream`]: gamehub_core::traits::EventStream
//! [`AdapterFactory`]: gamehub_core::traits::AdapterFactory

pub mod factory;
pub mod generic;
pub mod ws;

pub use factory::GameAdapterFactory;
pub use generic::{GenericAdapter, GenericEventHub};
pub use ws::WsAdapter;
