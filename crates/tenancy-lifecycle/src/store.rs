//! Persistence boundary for tenant records.
//!
//! The manager never embeds storage mechanics; it talks to a [`TenantStore`]
//! with optimistic concurrency on the record's `version` stamp. The
//! in-memory implementation backs development and tests.

use crate::model::TenantRecord;
use crate::state::TenantState;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tenancy_common::TenantId;

/// Store result type.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The incoming record's version does not match the stored one.
    #[error("conflicting update for tenant {0}")]
    Conflict(TenantId),

    /// Backend failure.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Filter for list queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantFilter {
    /// Restrict to these states; empty means all.
    pub states: Vec<TenantState>,
}

impl TenantFilter {
    /// Match everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Match a single state.
    pub fn with_state(state: TenantState) -> Self {
        Self {
            states: vec![state],
        }
    }

    fn matches(&self, record: &TenantRecord) -> bool {
        self.states.is_empty() || self.states.contains(&record.state)
    }
}

/// Tenant record store.
#[async_trait]
pub trait TenantStore: Send + Sync {
    /// Load a record by identifier.
    async fn load(&self, id: &TenantId) -> StoreResult<Option<TenantRecord>>;

    /// Insert or update a record. The record's `version` must match the
    /// stored version (0 for inserts); on success the store bumps it.
    async fn save(&self, record: &mut TenantRecord) -> StoreResult<()>;

    /// List records matching the filter, ordered by identifier. The result
    /// is a snapshot; concurrent mutations may or may not be visible.
    async fn list(&self, filter: &TenantFilter) -> StoreResult<Vec<TenantRecord>>;

    /// Hard-delete a record. Absent identifiers are ignored. Used by the
    /// purge tombstone policy.
    async fn purge(&self, id: &TenantId) -> StoreResult<()>;
}

/// In-memory store for development and tests.
///
/// A `BTreeMap` keeps list output ordered by identifier.
#[derive(Debug, Default)]
pub struct InMemoryTenantStore {
    records: RwLock<BTreeMap<TenantId, TenantRecord>>,
}

impl InMemoryTenantStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl TenantStore for InMemoryTenantStore {
    async fn load(&self, id: &TenantId) -> StoreResult<Option<TenantRecord>> {
        Ok(self.records.read().get(id).cloned())
    }

    async fn save(&self, record: &mut TenantRecord) -> StoreResult<()> {
        let mut records = self.records.write();
        match records.get(&record.id) {
            Some(existing) if existing.version != record.version => {
                return Err(StoreError::Conflict(record.id.clone()));
            }
            None if record.version != 0 => {
                return Err(StoreError::Conflict(record.id.clone()));
            }
            _ => {}
        }
        record.version += 1;
        records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn list(&self, filter: &TenantFilter) -> StoreResult<Vec<TenantRecord>> {
        Ok(self
            .records
            .read()
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn purge(&self, id: &TenantId) -> StoreResult<()> {
        self.records.write().remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(id: &str) -> TenantRecord {
        TenantRecord {
            id: TenantId::parse(id).unwrap(),
            state: TenantState::New,
            name: format!("{id} inc"),
            description: None,
            remark: None,
            connection: None,
            version: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_save_bumps_version() {
        let store = InMemoryTenantStore::new();
        let mut rec = record("acme");

        store.save(&mut rec).await.unwrap();
        assert_eq!(rec.version, 1);

        rec.name = "Acme Corp".into();
        store.save(&mut rec).await.unwrap();
        assert_eq!(rec.version, 2);
    }

    #[tokio::test]
    async fn test_stale_save_conflicts() {
        let store = InMemoryTenantStore::new();
        let mut rec = record("acme");
        store.save(&mut rec).await.unwrap();

        let mut stale = rec.clone();
        stale.version = 0;
        assert_eq!(
            store.save(&mut stale).await,
            Err(StoreError::Conflict(rec.id.clone()))
        );

        // Inserting over a missing record with a nonzero version is also a conflict.
        let mut ghost = record("ghost");
        ghost.version = 3;
        assert!(matches!(
            store.save(&mut ghost).await,
            Err(StoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_list_is_ordered_and_filtered() {
        let store = InMemoryTenantStore::new();
        for id in ["zeta", "acme", "mid"] {
            store.save(&mut record(id)).await.unwrap();
        }

        let mut active = record("beta");
        active.state = TenantState::Active;
        store.save(&mut active).await.unwrap();

        let all = store.list(&TenantFilter::all()).await.unwrap();
        let ids: Vec<_> = all.iter().map(|r| r.id.as_str().to_owned()).collect();
        assert_eq!(ids, ["acme", "beta", "mid", "zeta"]);

        let only_new = store
            .list(&TenantFilter::with_state(TenantState::New))
            .await
            .unwrap();
        assert_eq!(only_new.len(), 3);
    }

    #[tokio::test]
    async fn test_purge_is_idempotent() {
        let store = InMemoryTenantStore::new();
        let mut rec = record("acme");
        store.save(&mut rec).await.unwrap();

        store.purge(&rec.id).await.unwrap();
        store.purge(&rec.id).await.unwrap();
        assert!(store.load(&rec.id).await.unwrap().is_none());
    }
}
