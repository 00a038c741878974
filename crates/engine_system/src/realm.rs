//! Realm gating.
//!
//! The host tells the world, on every dispatch, whether it is currently
//! acting as a server, a client, or both (a listen server).

/// The realm(s) the host process is acting in for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Realm {
    server: bool,
    client: bool,
}

impl Realm {
    /// Acting as a dedicated server.
    pub const SERVER: Self = Self {
        server: true,
        client: false,
    };

    /// Acting as a client.
    pub const CLIENT: Self = Self {
        server: false,
        client: true,
    };

    /// Acting as both server and client.
    pub const LISTEN: Self = Self {
        server: true,
        client: true,
    };

    /// Create a realm from the host's predicates.
    #[must_use]
    pub const fn new(is_server: bool, is_client: bool) -> Self {
        Self {
            server: is_server,
            client: is_client,
        }
    }

    /// Returns `true` if the host is acting as a server.
    #[must_use]
    pub const fn is_server(self) -> bool {
        self.server
    }

    /// Returns `true` if the host is acting as a client.
    #[must_use]
    pub const fn is_client(self) -> bool {
        self.client
    }
}

/// Where a system is allowed to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RealmAffinity {
    /// Runs in every realm.
    #[default]
    Shared,
    /// Runs only while acting as a server.
    ServerOnly,
    /// Runs only while acting as a client.
    ClientOnly,
}

impl RealmAffinity {
    /// Returns `true` if a system with this affinity runs in `realm`.
    #[must_use]
    pub const fn allows(self, realm: Realm) -> bool {
        match self {
            Self::Shared => true,
            Self::ServerOnly => realm.is_server(),
            Self::ClientOnly => realm.is_client(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_runs_everywhere() {
        assert!(RealmAffinity::Shared.allows(Realm::SERVER));
        assert!(RealmAffinity::Shared.allows(Realm::CLIENT));
        assert!(RealmAffinity::Shared.allows(Realm::new(false, false)));
    }

    #[test]
    fn test_server_only() {
        assert!(RealmAffinity::ServerOnly.allows(Realm::SERVER));
        assert!(RealmAffinity::ServerOnly.allows(Realm::LISTEN));
        assert!(!RealmAffinity::ServerOnly.allows(Realm::CLIENT));
    }

    #[test]
    fn test_client_only() {
        assert!(RealmAffinity::ClientOnly.allows(Realm::CLIENT));
        assert!(RealmAffinity::ClientOnly.allows(Realm::LISTEN));
        assert!(!RealmAffinity::ClientOnly.allows(Realm::SERVER));
    }
}
