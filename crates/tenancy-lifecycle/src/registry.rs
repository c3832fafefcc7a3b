//! Tenant → database connection resolution.

use dashmap::DashMap;
use tenancy_common::{ConnectionDescriptor, TenantId};

/// Side table mapping tenants to their provisioned connection descriptors.
///
/// The request pipeline resolves a tenant's database through this table;
/// only tenants that completed provisioning (and have not been disabled or
/// torn down since) have an entry.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    entries: DashMap<TenantId, ConnectionDescriptor>,
}

impl ConnectionRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a tenant to its descriptor, replacing any previous binding.
    pub fn bind(&self, id: TenantId, descriptor: ConnectionDescriptor) {
        self.entries.insert(id, descriptor);
    }

    /// Drop a tenant's binding.
    pub fn unbind(&self, id: &TenantId) {
        self.entries.remove(id);
    }

    /// Resolve the descriptor for a tenant.
    pub fn resolve(&self, id: &TenantId) -> Option<ConnectionDescriptor> {
        self.entries.get(id).map(|e| e.value().clone())
    }

    /// Number of bound tenants.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no tenants are bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenancy_common::DatabaseProvider;

    #[test]
    fn test_bind_resolve_unbind() {
        let registry = ConnectionRegistry::new();
        let id = TenantId::parse("acme").unwrap();

        assert!(registry.resolve(&id).is_none());

        registry.bind(
            id.clone(),
            ConnectionDescriptor::new(DatabaseProvider::Sqlite, "Data Source=acme.db"),
        );
        let descriptor = registry.resolve(&id).unwrap();
        assert_eq!(descriptor.provider, DatabaseProvider::Sqlite);

        registry.unbind(&id);
        assert!(registry.resolve(&id).is_none());
        assert!(registry.is_empty());
    }
}
