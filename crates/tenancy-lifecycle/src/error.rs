//! Error taxonomy of the lifecycle manager.

use crate::provisioner::ProvisionError;
use crate::state::TenantState;
use crate::store::StoreError;
use tenancy_common::{InvalidTenantId, TenantId};

/// Everything a lifecycle operation can fail with.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LifecycleError {
    /// The requested edge is not in the lifecycle graph. Not retryable.
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition {
        /// State the tenant is in.
        from: TenantState,
        /// State the caller asked for.
        to: TenantState,
    },

    /// Creation collision. Not retryable with the same identifier.
    #[error("tenant already exists: {0}")]
    DuplicateTenant(TenantId),

    /// Unknown identifier.
    #[error("tenant not found: {0}")]
    NotFound(TenantId),

    /// Resource deployment failed; the tenant stays in `Pending` and the
    /// call may be retried.
    #[error("provisioning failed for {id}: {source}")]
    ProvisioningFailed {
        /// Affected tenant.
        id: TenantId,
        /// Downstream failure.
        source: ProvisionError,
    },

    /// Deactivation or teardown failed; the tenant stays in `Disabling` or
    /// `Removing` and the call may be retried.
    #[error("teardown failed for {id}: {source}")]
    TeardownFailed {
        /// Affected tenant.
        id: TenantId,
        /// Downstream failure.
        source: ProvisionError,
    },

    /// Optimistic-concurrency conflict; reload and retry.
    #[error("concurrent modification of {0}")]
    ConcurrentModification(TenantId),

    /// The identifier failed slug validation.
    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidTenantId),

    /// Descriptive fields failed validation.
    #[error("invalid tenant record: {0}")]
    InvalidRecord(String),

    /// Descriptive updates are refused while a tenant is being removed.
    #[error("tenant {id} is not editable in state {state}")]
    NotEditable {
        /// Affected tenant.
        id: TenantId,
        /// State blocking the edit.
        state: TenantState,
    },

    /// Store backend failure.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl LifecycleError {
    /// Whether retrying the same call unchanged can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ProvisioningFailed { .. }
                | Self::TeardownFailed { .. }
                | Self::ConcurrentModification(_)
                | Self::Storage(_)
        )
    }
}

impl From<StoreError> for LifecycleError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(id) => Self::ConcurrentModification(id),
            StoreError::Storage(message) => Self::Storage(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryability() {
        let id = TenantId::parse("acme").unwrap();

        assert!(LifecycleError::ProvisioningFailed {
            id: id.clone(),
            source: ProvisionError::Unavailable("db down".into()),
        }
        .is_retryable());
        assert!(LifecycleError::ConcurrentModification(id.clone()).is_retryable());

        assert!(!LifecycleError::DuplicateTenant(id.clone()).is_retryable());
        assert!(!LifecycleError::InvalidTransition {
            from: TenantState::New,
            to: TenantState::Disabling,
        }
        .is_retryable());
        assert!(!LifecycleError::NotFound(id).is_retryable());
    }

    #[test]
    fn test_store_error_mapping() {
        let id = TenantId::parse("acme").unwrap();
        assert_eq!(
            LifecycleError::from(StoreError::Conflict(id.clone())),
            LifecycleError::ConcurrentModification(id)
        );
        assert!(matches!(
            LifecycleError::from(StoreError::Storage("io".into())),
            LifecycleError::Storage(_)
        ));
    }
}
