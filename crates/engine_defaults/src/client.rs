//! Client ownership.

use engine_component::Component;
use engine_system::ClientId;
use serde::{Deserialize, Serialize};

/// Marks an entity as controlled by a connected client.
///
/// Simulate systems compare this against the client they are predicting
/// for to pick out that client's own pawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Client {
    id: u64,
}

impl Client {
    /// Create a client component.
    #[must_use]
    pub fn new(client: ClientId) -> Self {
        Self { id: client.0 }
    }

    /// The owning client.
    #[must_use]
    pub fn client(&self) -> ClientId {
        ClientId(self.id)
    }

    /// Returns `true` if `client` owns this entity.
    #[must_use]
    pub fn is_owned_by(&self, client: ClientId) -> bool {
        self.client() == client
    }
}

impl Component for Client {
    fn type_name() -> &'static str {
        "Client"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ownership() {
        let owner = Client::new(ClientId(3));
        assert_eq!(owner.client(), ClientId(3));
        assert!(owner.is_owned_by(ClientId(3)));
        assert!(!owner.is_owned_by(ClientId(4)));
    }
}
