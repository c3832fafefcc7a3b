//! Database provider and connection descriptors
//!
//! Each tenant gets its own database (or schema). The descriptor produced
//! by provisioning is what the request pipeline uses to route a tenant to
//! its data.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Database backend hosting a tenant's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatabaseProvider {
    /// Embedded SQLite, single-file deployments.
    Sqlite,
    /// Microsoft SQL Server.
    SqlServer,
    /// PostgreSQL.
    Postgres,
}

impl DatabaseProvider {
    /// Canonical provider name, as stored in tenant records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::SqlServer => "sqlserver",
            Self::Postgres => "postgres",
        }
    }
}

impl fmt::Display for DatabaseProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a provisioned tenant's data lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDescriptor {
    /// Backend type.
    pub provider: DatabaseProvider,
    /// Provider-specific connection string.
    pub connection_string: String,
}

impl ConnectionDescriptor {
    /// Create a descriptor.
    pub fn new(provider: DatabaseProvider, connection_string: impl Into<String>) -> Self {
        Self {
            provider,
            connection_string: connection_string.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_names() {
        assert_eq!(DatabaseProvider::Postgres.as_str(), "postgres");
        assert_eq!(DatabaseProvider::SqlServer.to_string(), "sqlserver");
    }
}
