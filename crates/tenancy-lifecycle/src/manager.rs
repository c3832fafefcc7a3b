//! Tenant lifecycle manager.
//!
//! Serializes and validates every state change for a tenant and sequences
//! the side effects that accompany each transition. Operations on
//! different tenants run fully in parallel; operations on the same
//! identifier queue behind a per-tenant lock. The store's version stamp is
//! the backstop against anything slipping past the lock.

use crate::error::LifecycleError;
use crate::model::{
    CreateTenant, TenantRecord, TenantUpdate, validate_description, validate_name,
};
use crate::provisioner::TenantProvisioner;
use crate::registry::ConnectionRegistry;
use crate::state::TenantState;
use crate::store::{TenantFilter, TenantStore};
use chrono::Utc;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tenancy_common::TenantId;
use tokio::sync::Mutex;

/// What happens to a record after it reaches `Removed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TombstonePolicy {
    /// Keep the `Removed` record as a tombstone; lookups still see it.
    Retain,
    /// Hard-delete the record once teardown completes; lookups report
    /// the tenant as never having existed.
    Purge,
}

/// Manager configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Whether a `Removed` identifier may be re-created. Only meaningful
    /// with [`TombstonePolicy::Retain`]; purged identifiers are always
    /// reusable because nothing remembers them.
    pub allow_identifier_reuse: bool,
    /// Tombstone policy applied when removal completes.
    pub tombstone_policy: TombstonePolicy,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            allow_identifier_reuse: false,
            tombstone_policy: TombstonePolicy::Retain,
        }
    }
}

/// Lifecycle result type.
pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Drives tenant records through the lifecycle graph.
pub struct TenantManager {
    store: Arc<dyn TenantStore>,
    provisioner: Arc<dyn TenantProvisioner>,
    registry: Arc<ConnectionRegistry>,
    locks: DashMap<TenantId, Arc<Mutex<()>>>,
    config: ManagerConfig,
}

impl TenantManager {
    /// Manager with default configuration.
    pub fn new(store: Arc<dyn TenantStore>, provisioner: Arc<dyn TenantProvisioner>) -> Self {
        Self::with_config(store, provisioner, ManagerConfig::default())
    }

    /// Manager with explicit configuration.
    pub fn with_config(
        store: Arc<dyn TenantStore>,
        provisioner: Arc<dyn TenantProvisioner>,
        config: ManagerConfig,
    ) -> Self {
        Self {
            store,
            provisioner,
            registry: Arc::new(ConnectionRegistry::new()),
            locks: DashMap::new(),
            config,
        }
    }

    /// Connection registry fed by provisioning. The request pipeline
    /// resolves tenant databases through this.
    pub fn registry(&self) -> Arc<ConnectionRegistry> {
        Arc::clone(&self.registry)
    }

    /// Create a tenant in state `New`. No resources are deployed yet.
    pub async fn create(&self, request: CreateTenant) -> LifecycleResult<TenantRecord> {
        let id = TenantId::parse(&request.id)?;
        validate_name(&request.name).map_err(LifecycleError::InvalidRecord)?;
        validate_description(request.description.as_deref())
            .map_err(LifecycleError::InvalidRecord)?;

        let guard = self.lock_for(&id);
        let _held = guard.lock().await;

        if let Some(existing) = self.store.load(&id).await? {
            if existing.state.is_live() || !self.config.allow_identifier_reuse {
                return Err(LifecycleError::DuplicateTenant(id));
            }
            // Removed tombstone with reuse enabled: clear it out first.
            self.store.purge(&id).await?;
        }

        let now = Utc::now();
        let mut record = TenantRecord {
            id: id.clone(),
            state: TenantState::New,
            name: request.name,
            description: request.description,
            remark: request.remark,
            connection: None,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        self.store.save(&mut record).await?;

        tracing::info!(tenant = %id, "tenant created");
        Ok(record)
    }

    /// Deploy the tenant's resources.
    ///
    /// From `New` this commits `New -> Pending` and provisions; calling it
    /// again on a tenant parked in `Pending` retries the provisioning
    /// attempt without touching identity or metadata. Success commits
    /// `Pending -> Active` and binds the connection registry.
    pub async fn request_provisioning(&self, id: &TenantId) -> LifecycleResult<TenantRecord> {
        let guard = self.lock_for(id);
        let _held = guard.lock().await;

        let mut record = self.load_required(id).await?;
        match record.state {
            TenantState::New => {
                self.commit_transition(&mut record, TenantState::Pending)
                    .await?;
            }
            TenantState::Pending => {} // retry of a failed attempt
            from => {
                return Err(LifecycleError::InvalidTransition {
                    from,
                    to: TenantState::Pending,
                })
            }
        }

        self.run_provisioning(&mut record).await?;
        Ok(record)
    }

    /// Take an `Active` tenant out of service.
    ///
    /// Commits `Active -> Disabling`, deactivates downstream, then commits
    /// `Disabling -> Disabled`. A tenant parked in `Disabling` after a
    /// failed attempt retries the deactivation; it never reverts to
    /// `Active`.
    pub async fn disable(&self, id: &TenantId) -> LifecycleResult<TenantRecord> {
        let guard = self.lock_for(id);
        let _held = guard.lock().await;

        let mut record = self.load_required(id).await?;
        match record.state {
            TenantState::Active => {
                self.commit_transition(&mut record, TenantState::Disabling)
                    .await?;
            }
            TenantState::Disabling => {} // retry of a failed attempt
            from => {
                return Err(LifecycleError::InvalidTransition {
                    from,
                    to: TenantState::Disabling,
                })
            }
        }

        if let Err(source) = self.provisioner.deactivate(id).await {
            tracing::warn!(tenant = %id, error = %source, "deactivation failed");
            return Err(LifecycleError::TeardownFailed {
                id: id.clone(),
                source,
            });
        }

        self.commit_transition(&mut record, TenantState::Disabled)
            .await?;
        self.registry.unbind(id);
        Ok(record)
    }

    /// Put a `Disabled` tenant back into service.
    ///
    /// Re-enters the provisioning path (`Disabled -> Pending`, then the
    /// usual `Pending -> Active` on success) rather than jumping straight
    /// to `Active`: resources may have been reclaimed in the meantime.
    pub async fn reenable(&self, id: &TenantId) -> LifecycleResult<TenantRecord> {
        let guard = self.lock_for(id);
        let _held = guard.lock().await;

        let mut record = self.load_required(id).await?;
        match record.state {
            TenantState::Disabled => {
                self.commit_transition(&mut record, TenantState::Pending)
                    .await?;
            }
            from => {
                return Err(LifecycleError::InvalidTransition {
                    from,
                    to: TenantState::Pending,
                })
            }
        }

        self.run_provisioning(&mut record).await?;
        Ok(record)
    }

    /// Tear the tenant down.
    ///
    /// Valid from `New` (nothing was provisioned) and `Disabled`; commits
    /// `-> Removing`, deprovisions downstream, then commits
    /// `Removing -> Removed` and applies the tombstone policy. A tenant
    /// parked in `Removing` retries the teardown.
    pub async fn request_removal(&self, id: &TenantId) -> LifecycleResult<TenantRecord> {
        let guard = self.lock_for(id);
        let _held = guard.lock().await;

        let mut record = self.load_required(id).await?;
        match record.state {
            TenantState::New | TenantState::Disabled => {
                self.commit_transition(&mut record, TenantState::Removing)
                    .await?;
            }
            TenantState::Removing => {} // retry of a failed attempt
            from => {
                return Err(LifecycleError::InvalidTransition {
                    from,
                    to: TenantState::Removing,
                })
            }
        }

        if let Err(source) = self.provisioner.deprovision(id).await {
            tracing::warn!(tenant = %id, error = %source, "teardown failed");
            return Err(LifecycleError::TeardownFailed {
                id: id.clone(),
                source,
            });
        }

        record.connection = None;
        self.commit_transition(&mut record, TenantState::Removed)
            .await?;
        self.registry.unbind(id);

        if self.config.tombstone_policy == TombstonePolicy::Purge {
            self.store.purge(id).await?;
            self.locks.remove(id);
        }

        tracing::info!(tenant = %id, "tenant removed");
        Ok(record)
    }

    /// Update descriptive fields. Refused once removal has started.
    pub async fn update(&self, id: &TenantId, update: TenantUpdate) -> LifecycleResult<TenantRecord> {
        let guard = self.lock_for(id);
        let _held = guard.lock().await;

        let mut record = self.load_required(id).await?;
        if matches!(record.state, TenantState::Removing | TenantState::Removed) {
            return Err(LifecycleError::NotEditable {
                id: id.clone(),
                state: record.state,
            });
        }

        if let Some(name) = update.name {
            validate_name(&name).map_err(LifecycleError::InvalidRecord)?;
            record.name = name;
        }
        if let Some(description) = update.description {
            validate_description(description.as_deref())
                .map_err(LifecycleError::InvalidRecord)?;
            record.description = description;
        }
        if let Some(remark) = update.remark {
            record.remark = remark;
        }

        record.updated_at = Utc::now();
        self.store.save(&mut record).await?;
        Ok(record)
    }

    /// Look up a tenant. Pure read, no side effects. Whether a removed
    /// tenant shows up here depends on the tombstone policy.
    pub async fn get(&self, id: &TenantId) -> LifecycleResult<Option<TenantRecord>> {
        Ok(self.store.load(id).await?)
    }

    /// List tenants matching the filter, ordered by identifier.
    pub async fn list(&self, filter: &TenantFilter) -> LifecycleResult<Vec<TenantRecord>> {
        Ok(self.store.list(filter).await?)
    }

    /// Per-identifier lock. Entries are cheap; they are only reclaimed
    /// when a tenant is purged.
    fn lock_for(&self, id: &TenantId) -> Arc<Mutex<()>> {
        self.locks.entry(id.clone()).or_default().clone()
    }

    async fn load_required(&self, id: &TenantId) -> LifecycleResult<TenantRecord> {
        self.store
            .load(id)
            .await?
            .ok_or_else(|| LifecycleError::NotFound(id.clone()))
    }

    /// Run the provisioner for a record in `Pending` and commit `Active`
    /// on success. Cancellation before the provisioner reports back leaves
    /// the record in `Pending`; nothing past this point is committed
    /// without the completion signal.
    async fn run_provisioning(&self, record: &mut TenantRecord) -> LifecycleResult<()> {
        let id = record.id.clone();
        let descriptor = match self.provisioner.provision(&id).await {
            Ok(descriptor) => descriptor,
            Err(source) => {
                tracing::warn!(tenant = %id, error = %source, "provisioning failed");
                return Err(LifecycleError::ProvisioningFailed { id, source });
            }
        };

        record.connection = Some(descriptor.clone());
        self.commit_transition(record, TenantState::Active).await?;
        self.registry.bind(id, descriptor);
        Ok(())
    }

    /// Validate the edge against the transition table and persist it.
    async fn commit_transition(
        &self,
        record: &mut TenantRecord,
        to: TenantState,
    ) -> LifecycleResult<()> {
        let from = record.state;
        if !from.can_transition_to(to) {
            return Err(LifecycleError::InvalidTransition { from, to });
        }

        record.state = to;
        record.updated_at = Utc::now();
        self.store.save(record).await?;

        tracing::info!(tenant = %record.id, %from, %to, "state transition");
        Ok(())
    }
}
