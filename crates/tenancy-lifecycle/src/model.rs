//! Tenant record data model.

use crate::state::TenantState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tenancy_common::{ConnectionDescriptor, DatabaseProvider, TenantId};

/// Display name length bounds.
pub const MIN_NAME_LEN: usize = 2;
/// Display name length bounds.
pub const MAX_NAME_LEN: usize = 256;
/// Description length cap.
pub const MAX_DESCRIPTION_LEN: usize = 512;

/// Canonical tenant record.
///
/// `state` only changes through the lifecycle manager; `version` is the
/// optimistic-concurrency stamp bumped by the store on every save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantRecord {
    /// Tenant identifier (subdomain/slug).
    pub id: TenantId,
    /// Current lifecycle state.
    pub state: TenantState,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Free-form operator remark.
    pub remark: Option<String>,
    /// Filled once provisioning completes, cleared on teardown.
    pub connection: Option<ConnectionDescriptor>,
    /// Optimistic-concurrency stamp.
    pub version: u64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
}

impl TenantRecord {
    /// Backend provider, once provisioned.
    pub fn database_provider(&self) -> Option<DatabaseProvider> {
        self.connection.as_ref().map(|c| c.provider)
    }
}

/// Creation request for a new tenant.
///
/// The identifier is raw caller input; the manager normalizes and
/// validates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    /// Requested identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Free-form operator remark.
    pub remark: Option<String>,
}

impl CreateTenant {
    /// New request with just an identifier and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            remark: None,
        }
    }
}

/// Descriptive-field update. State and provisioning metadata are not
/// touchable through this path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New description (`Some(None)` clears it).
    pub description: Option<Option<String>>,
    /// New remark (`Some(None)` clears it).
    pub remark: Option<Option<String>>,
}

/// Validate the descriptive fields shared by create and update requests.
pub(crate) fn validate_name(name: &str) -> Result<(), String> {
    let len = name.trim().chars().count();
    if len < MIN_NAME_LEN || len > MAX_NAME_LEN {
        return Err(format!(
            "name must be {MIN_NAME_LEN} to {MAX_NAME_LEN} characters"
        ));
    }
    Ok(())
}

pub(crate) fn validate_description(description: Option<&str>) -> Result<(), String> {
    if let Some(d) = description {
        if d.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(format!(
                "description must be at most {MAX_DESCRIPTION_LEN} characters"
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_bounds() {
        assert!(validate_name("ok").is_ok());
        assert!(validate_name("x").is_err());
        assert!(validate_name(&"x".repeat(257)).is_err());
        assert!(validate_description(None).is_ok());
        let long = "x".repeat(513);
        assert!(validate_description(Some(long.as_str())).is_err());
    }

    #[test]
    fn test_record_serializes_with_state_name() {
        let record = TenantRecord {
            id: TenantId::parse("acme").unwrap(),
            state: TenantState::New,
            name: "Acme Corp".into(),
            description: None,
            remark: None,
            connection: None,
            version: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "acme");
        assert_eq!(json["state"], "New");
        assert!(json["connection"].is_null());
    }
}
