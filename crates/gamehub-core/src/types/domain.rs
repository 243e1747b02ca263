//! Tenant domain models as reported by the control plane.

use serde::{Deserialize, Serialize};

use super::id::DomainId;

/// Lifecycle state of a tenant domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainState {
    /// The domain is active and its servers should be connected.
    Active,
    /// The domain is disabled; its servers are not managed.
    Disabled,
    /// The domain is in maintenance; its servers are not managed.
    Maintenance,
}

/// A tenant domain as reported by the control plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainInfo {
    /// The domain identifier.
    pub id: DomainId,
    /// Human-readable domain name.
    pub name: String,
    /// Current lifecycle state.
    pub state: DomainState,
}

impl DomainInfo {
    /// Whether the connector should manage this domain's servers.
    pub fn is_active(&self) -> bool {
        self.state == DomainState::Active
    }
}
