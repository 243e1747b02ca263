//! Shared domain types: typed identifiers and control-plane models.

pub mod domain;
pub mod game_server;
pub mod id;

pub use domain::{DomainInfo, DomainState};
pub use game_server::{CreateGameServer, GameServerDetails, GameServerKind};
pub use id::{DomainId, GameServerId};
