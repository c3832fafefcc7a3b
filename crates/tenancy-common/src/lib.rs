//! Tenancy Common - Shared value objects for the tenancy platform
//!
//! This crate provides the validated primitives every other tenancy crate
//! works with:
//! - Tenant identifiers (normalized slugs)
//! - Database provider and connection descriptors

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod database;
pub mod id;

pub use database::*;
pub use id::*;
