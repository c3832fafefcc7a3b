//! Tenant Lifecycle Core
//!
//! Owns the canonical state machine for tenant records and the manager
//! that drives creation, provisioning, disabling, and removal against a
//! per-tenant database/identity store.
//!
//! # Lifecycle
//!
//! ```text
//!                 ┌──────────────────────────────┐
//!                 │                              │
//!   New ──► Pending ──► Active ──► Disabling ──► Disabled
//!    │                                              │
//!    └───────────────► Removing ◄──────────────────┘
//!                         │
//!                         ▼
//!                      Removed
//! ```
//!
//! Every edge above is the only way a record changes state. Provisioning
//! (`Pending`), deactivation (`Disabling`), and teardown (`Removing`) are
//! the only points where downstream I/O happens; their failures leave the
//! record parked in the in-progress state for an idempotent retry.

#![warn(missing_docs)]

pub mod error;
pub mod manager;
pub mod model;
pub mod provisioner;
pub mod registry;
pub mod state;
pub mod store;

pub use error::LifecycleError;
pub use manager::{LifecycleResult, ManagerConfig, TenantManager, TombstonePolicy};
pub use model::{CreateTenant, TenantRecord, TenantUpdate};
pub use provisioner::{ProvisionError, StaticProvisioner, TenantProvisioner};
pub use registry::ConnectionRegistry;
pub use state::{StateCatalog, StateInfo, TenantState};
pub use store::{InMemoryTenantStore, StoreError, TenantFilter, TenantStore};
