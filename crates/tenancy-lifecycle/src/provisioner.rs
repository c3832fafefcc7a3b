//! Downstream resource/database provisioning boundary.
//!
//! Invoked by the manager while a tenant sits in `Pending`, `Disabling`,
//! or `Removing`. These calls are the only points where external I/O
//! happens; every failure is transient from the manager's point of view
//! and is retried by re-invoking the same operation.

use async_trait::async_trait;
use tenancy_common::{ConnectionDescriptor, DatabaseProvider, TenantId};

/// Provisioning failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProvisionError {
    /// Downstream resource temporarily unavailable.
    #[error("resource unavailable: {0}")]
    Unavailable(String),

    /// Downstream rejected the request.
    #[error("downstream rejected request: {0}")]
    Rejected(String),
}

/// Allocates and reclaims the per-tenant database/identity resources.
///
/// All three operations must be idempotent per identifier: the manager
/// re-invokes them verbatim on retry, and `deprovision` is also called for
/// tenants that never finished provisioning.
#[async_trait]
pub trait TenantProvisioner: Send + Sync {
    /// Deploy the tenant's resources and return where its data lives.
    async fn provision(&self, id: &TenantId) -> Result<ConnectionDescriptor, ProvisionError>;

    /// Take a provisioned tenant out of service, keeping its data.
    async fn deactivate(&self, id: &TenantId) -> Result<(), ProvisionError>;

    /// Tear down everything provisioned for the tenant.
    async fn deprovision(&self, id: &TenantId) -> Result<(), ProvisionError>;
}

/// Provisioner that derives connection descriptors from a template.
///
/// Useful for development and single-host deployments where every tenant
/// database lives on the same backend.
#[derive(Debug, Clone)]
pub struct StaticProvisioner {
    provider: DatabaseProvider,
    host: String,
}

impl StaticProvisioner {
    /// Provisioner handing out databases on `host`.
    pub fn new(provider: DatabaseProvider, host: impl Into<String>) -> Self {
        Self {
            provider,
            host: host.into(),
        }
    }

    fn connection_string(&self, id: &TenantId) -> String {
        match self.provider {
            DatabaseProvider::Sqlite => format!("Data Source=tenant_{id}.db"),
            DatabaseProvider::SqlServer => {
                format!("Server={};Database=tenant_{id}", self.host)
            }
            DatabaseProvider::Postgres => {
                format!("Host={};Database=tenant_{id}", self.host)
            }
        }
    }
}

#[async_trait]
impl TenantProvisioner for StaticProvisioner {
    async fn provision(&self, id: &TenantId) -> Result<ConnectionDescriptor, ProvisionError> {
        Ok(ConnectionDescriptor::new(
            self.provider,
            self.connection_string(id),
        ))
    }

    async fn deactivate(&self, _id: &TenantId) -> Result<(), ProvisionError> {
        Ok(())
    }

    async fn deprovision(&self, _id: &TenantId) -> Result<(), ProvisionError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_provisioner_descriptor() {
        let provisioner = StaticProvisioner::new(DatabaseProvider::Postgres, "db.internal");
        let id = TenantId::parse("acme").unwrap();

        let descriptor = provisioner.provision(&id).await.unwrap();
        assert_eq!(descriptor.provider, DatabaseProvider::Postgres);
        assert_eq!(descriptor.connection_string, "Host=db.internal;Database=tenant_acme");
    }
}
